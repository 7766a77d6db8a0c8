//! Type-safe price representation using integer minor units.
//!
//! Prices are never floating point. A [`Price`] is a non-negative count of the
//! currency's smallest unit (dong for VND, cents for USD), so totals computed
//! from repeated adds and removes never drift.
//!
//! Rendering a price for people is the job of [`CurrencyCode::format`]; the
//! rest of the system only adds and multiplies integers.

use core::fmt;
use core::iter::Sum;

use serde::{Deserialize, Serialize};

/// A price in integer minor currency units.
///
/// ```
/// use vibe_core::Price;
///
/// let tee = Price::new(450_000);
/// assert_eq!(tee.times(5), Price::new(2_250_000));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(u64);

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(0);

    /// Create a price from an amount in minor units.
    #[must_use]
    pub const fn new(amount: u64) -> Self {
        Self(amount)
    }

    /// The amount in minor units.
    #[must_use]
    pub const fn amount(self) -> u64 {
        self.0
    }

    /// Multiply by a quantity, saturating at `u64::MAX`.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(u64::from(quantity)))
    }

    /// Add two prices, saturating at `u64::MAX`.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Price {
    fn from(amount: u64) -> Self {
        Self(amount)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Self::saturating_add)
    }
}

/// Error returned when a currency code is not supported.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported currency code: {0}")]
pub struct ParseCurrencyError(pub String);

/// ISO 4217 currency codes supported for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    VND,
    USD,
    EUR,
    GBP,
}

impl CurrencyCode {
    /// The ISO 4217 code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::VND => "VND",
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
        }
    }

    /// The display symbol.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::VND => "₫",
            Self::USD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }

    /// Number of minor-unit digits after the decimal separator.
    #[must_use]
    pub const fn minor_digits(self) -> u32 {
        match self {
            Self::VND => 0,
            Self::USD | Self::EUR | Self::GBP => 2,
        }
    }

    const fn group_separator(self) -> char {
        match self {
            Self::VND => '.',
            Self::USD | Self::EUR | Self::GBP => ',',
        }
    }

    /// Format a price for display.
    ///
    /// VND follows the Vietnamese convention (`1.250.000 ₫`); the others use
    /// a leading symbol and two decimals (`$12.50`).
    ///
    /// ```
    /// use vibe_core::{CurrencyCode, Price};
    ///
    /// assert_eq!(CurrencyCode::VND.format(Price::new(1_250_000)), "1.250.000 ₫");
    /// assert_eq!(CurrencyCode::USD.format(Price::new(123_456)), "$1,234.56");
    /// ```
    #[must_use]
    pub fn format(self, price: Price) -> String {
        let digits = self.minor_digits();
        let divisor = 10_u64.pow(digits);
        let major = group_thousands(price.amount() / divisor, self.group_separator());

        if digits == 0 {
            return format!("{major} {}", self.symbol());
        }

        let minor = price.amount() % divisor;
        let width = digits as usize;
        format!("{}{major}.{minor:0width$}", self.symbol())
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for CurrencyCode {
    type Err = ParseCurrencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "VND" => Ok(Self::VND),
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            "GBP" => Ok(Self::GBP),
            _ => Err(ParseCurrencyError(s.to_string())),
        }
    }
}

/// Insert `separator` between every group of three digits.
fn group_thousands(value: u64, separator: char) -> String {
    let digits = value.to_string();
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_price_sum_is_exact() {
        let total: Price = [Price::new(450_000).times(5), Price::new(780_000)]
            .into_iter()
            .sum();
        assert_eq!(total, Price::new(3_030_000));
    }

    #[test]
    fn test_price_times_saturates() {
        assert_eq!(Price::new(u64::MAX).times(2), Price::new(u64::MAX));
        assert_eq!(Price::new(10).times(0), Price::ZERO);
    }

    #[test]
    fn test_price_rejects_negative_json() {
        assert!(serde_json::from_str::<Price>("-1").is_err());
        assert_eq!(serde_json::from_str::<Price>("320000").unwrap(), Price::new(320_000));
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0, '.'), "0");
        assert_eq!(group_thousands(999, '.'), "999");
        assert_eq!(group_thousands(1_000, '.'), "1.000");
        assert_eq!(group_thousands(2_100_000, ','), "2,100,000");
    }

    #[test]
    fn test_format_vnd() {
        assert_eq!(CurrencyCode::VND.format(Price::new(450_000)), "450.000 ₫");
        assert_eq!(CurrencyCode::VND.format(Price::ZERO), "0 ₫");
    }

    #[test]
    fn test_format_two_decimal_currencies() {
        assert_eq!(CurrencyCode::USD.format(Price::new(5)), "$0.05");
        assert_eq!(CurrencyCode::EUR.format(Price::new(1_999)), "€19.99");
        assert_eq!(CurrencyCode::GBP.format(Price::new(10_000_000)), "£100,000.00");
    }

    #[test]
    fn test_currency_from_str() {
        assert_eq!("vnd".parse::<CurrencyCode>().unwrap(), CurrencyCode::VND);
        assert_eq!(" USD ".parse::<CurrencyCode>().unwrap(), CurrencyCode::USD);
        assert!("JPY".parse::<CurrencyCode>().is_err());
    }
}
