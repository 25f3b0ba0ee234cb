//! Dish entity - a plate listed inside a category

use super::AdminId;
use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

#[derive(Debug, Clone, PartialEq)]
pub struct Dish {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub photo_url: String,
    // always carries exactly two fractional digits
    pub price: Option<Decimal>,
    pub prep_minutes: Option<i32>,
    pub servings: Option<i32>,
    pub nutrition_info: Option<String>,
    pub created_at: DateTime<Utc>,
    pub category_id: i64,
    pub admin_id: AdminId,
}

/// Largest magnitude a `NUMERIC(8,2)` price can hold, exclusive
const PRICE_LIMIT: i64 = 1_000_000;

impl Dish {
    /// Round half away from zero to two fractional digits and pin the scale,
    /// so 12.5 is stored and served as "12.50"
    pub fn normalize_price(price: Decimal) -> Decimal {
        let mut price = price.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        price.rescale(2);
        price
    }

    pub fn price_fits(price: &Decimal) -> bool {
        Self::normalize_price(*price).abs() < Decimal::from(PRICE_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_normalize_pads_two_digits() {
        let price = Dish::normalize_price(Decimal::from_str("12.5").unwrap());
        assert_eq!(price.to_string(), "12.50");

        let price = Dish::normalize_price(Decimal::from(7));
        assert_eq!(price.to_string(), "7.00");
    }

    #[test]
    fn test_normalize_rounds_half_away_from_zero() {
        assert_eq!(
            Dish::normalize_price(Decimal::from_str("2.345").unwrap()).to_string(),
            "2.35"
        );
        assert_eq!(
            Dish::normalize_price(Decimal::from_str("2.344").unwrap()).to_string(),
            "2.34"
        );
    }

    #[test]
    fn test_price_fits_numeric_8_2() {
        assert!(Dish::price_fits(&Decimal::from_str("999999.99").unwrap()));
        assert!(!Dish::price_fits(&Decimal::from_str("999999.995").unwrap()));
        assert!(!Dish::price_fits(&Decimal::from(1_000_000)));
    }
}
