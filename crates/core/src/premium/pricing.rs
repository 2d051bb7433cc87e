//! Price strings for the paywall

use crate::billing::Offering;

/// Multiplier applied to the live price to show a struck-through "old" price.
pub const DEFAULT_OLD_PRICE_MULTIPLIER: f64 = 1.67;

/// Shown while offerings are not loaded yet.
pub const PRICE_PLACEHOLDER: &str = "...";

#[derive(Debug, Clone, PartialEq)]
pub struct PriceDisplay {
    pub price: String,
    pub old_price: String,
    pub has_price: bool,
}

impl PriceDisplay {
    /// Derive the paywall prices from the first offering, if any.
    pub fn from_offerings(offerings: &[Offering], multiplier: f64) -> Self {
        let Some(offering) = offerings.first() else {
            return Self::placeholder();
        };

        let has_price = !offering.localized_price.is_empty();
        let price = if has_price {
            offering.localized_price.clone()
        } else {
            PRICE_PLACEHOLDER.to_string()
        };

        let old_price = if offering.raw_price.is_finite()
            && offering.raw_price > 0.0
            && !offering.currency_code.is_empty()
        {
            format!(
                "{:.2} {}",
                offering.raw_price * multiplier,
                offering.currency_code
            )
        } else {
            PRICE_PLACEHOLDER.to_string()
        };

        Self {
            price,
            old_price,
            has_price,
        }
    }

    pub fn placeholder() -> Self {
        Self {
            price: PRICE_PLACEHOLDER.to_string(),
            old_price: PRICE_PLACEHOLDER.to_string(),
            has_price: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offering(localized: &str, raw: f64, currency: &str) -> Offering {
        Offering {
            product_id: "premium-access".to_string(),
            localized_price: localized.to_string(),
            raw_price: raw,
            currency_code: currency.to_string(),
        }
    }

    #[test]
    fn no_offerings_is_placeholder() {
        let d = PriceDisplay::from_offerings(&[], DEFAULT_OLD_PRICE_MULTIPLIER);
        assert_eq!(d, PriceDisplay::placeholder());
    }

    #[test]
    fn old_price_is_scaled_and_suffixed() {
        let d = PriceDisplay::from_offerings(
            &[offering("$4.99", 4.99, "USD")],
            DEFAULT_OLD_PRICE_MULTIPLIER,
        );
        assert_eq!(d.price, "$4.99");
        assert_eq!(d.old_price, "8.33 USD");
        assert!(d.has_price);
    }

    #[test]
    fn zero_price_has_no_old_price() {
        let d = PriceDisplay::from_offerings(&[offering("Free", 0.0, "USD")], 2.0);
        assert_eq!(d.price, "Free");
        assert_eq!(d.old_price, PRICE_PLACEHOLDER);
    }

    #[test]
    fn missing_localized_price() {
        let d = PriceDisplay::from_offerings(&[offering("", 990.0, "KZT")], 1.0);
        assert!(!d.has_price);
        assert_eq!(d.price, PRICE_PLACEHOLDER);
        assert_eq!(d.old_price, "990.00 KZT");
    }
}
