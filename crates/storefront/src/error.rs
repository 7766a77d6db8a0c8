//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server errors to Sentry
//! before responding to the client. All route handlers return
//! `Result<T, AppError>`; errors are rendered as `{"error": .., "code": ..}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::session::SessionError;
use crate::store::{CartError, StoreError, WishlistError};

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// The storefront rejected a command.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The shopping session is no longer running.
    #[error("Session unavailable")]
    SessionClosed,

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Closed => Self::SessionClosed,
            SessionError::Store(err) => Self::Store(err),
        }
    }
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Store(err) => match err {
                StoreError::UnknownProduct(_)
                | StoreError::Wishlist(WishlistError::NotInWishlist { .. }) => {
                    StatusCode::NOT_FOUND
                }
                StoreError::InvalidLineKey(_) => StatusCode::BAD_REQUEST,
                StoreError::Cart(_)
                | StoreError::Wishlist(WishlistError::SizeSelectionRequired { .. }) => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
            },
            Self::SessionClosed => StatusCode::SERVICE_UNAVAILABLE,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Store(err) => match err {
                StoreError::UnknownProduct(_) => "unknown_product",
                StoreError::InvalidLineKey(_) => "invalid_line_key",
                StoreError::Cart(CartError::InvalidQuantity) => "invalid_quantity",
                StoreError::Cart(CartError::SizeRequired { .. }) => "size_required",
                StoreError::Cart(CartError::UnknownSize { .. }) => "unknown_size",
                StoreError::Wishlist(WishlistError::NotInWishlist { .. }) => "not_in_wishlist",
                StoreError::Wishlist(WishlistError::SizeSelectionRequired { .. }) => {
                    "size_selection_required"
                }
            },
            Self::SessionClosed => "session_closed",
            Self::NotFound(_) => "not_found",
            Self::BadRequest(_) => "bad_request",
            Self::Internal(_) => "internal",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Internal(_) | Self::SessionClosed) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Internal(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        };

        let body = Json(json!({ "error": message, "code": self.code() }));
        (self.status(), body).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for shopper actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("checkout", "Checkout requested", Some(&[("order", "VIBE-8888")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use vibe_core::ProductId;

    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("product 123".to_string());
        assert_eq!(err.to_string(), "Not found: product 123");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            let response = err.into_response();
            response.status()
        }

        assert_eq!(
            get_status(StoreError::UnknownProduct(ProductId::new(99)).into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(StoreError::Cart(CartError::InvalidQuantity).into()),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            get_status(
                StoreError::Wishlist(WishlistError::SizeSelectionRequired {
                    product_id: ProductId::new(1)
                })
                .into()
            ),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            get_status(SessionError::Closed.into()),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_codes() {
        let err = AppError::from(StoreError::Cart(CartError::SizeRequired {
            product_id: ProductId::new(3),
        }));
        assert_eq!(err.code(), "size_required");
        assert_eq!(
            AppError::from(SessionError::Store(StoreError::UnknownProduct(
                ProductId::new(1)
            )))
            .code(),
            "unknown_product"
        );
    }
}
