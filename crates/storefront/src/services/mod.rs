//! External services the storefront depends on.
//!
//! # Services
//!
//! - `payment` - Payment gateway abstraction and the simulated gateway

pub mod payment;

pub use payment::{PaymentGateway, SimulatedGateway};
