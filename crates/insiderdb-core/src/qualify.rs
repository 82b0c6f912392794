//! Pure normalization and qualification math.
//!
//! No I/O and no side effects: the parsers hand these functions raw sums and
//! the configured threshold, and get back the values that go into an
//! [`crate::InsiderTransaction`].

use rust_decimal::Decimal;

/// Arithmetic mean of the reported per-line prices.
///
/// `price_sum` is the running sum over line items that reported a price and
/// `price_count` how many did. Zero reporting line items means the filing
/// carries no price information at all, and the mean is defined as zero
/// (which in turn makes the total value zero).
#[must_use]
pub fn mean_price(price_sum: Decimal, price_count: u32) -> Decimal {
    if price_count == 0 {
        return Decimal::ZERO;
    }
    price_sum / Decimal::from(price_count)
}

/// Total transaction value, rounded to the nearest whole currency unit.
#[must_use]
pub fn total_value(shares: Decimal, price_per_share: Decimal) -> Decimal {
    (shares * price_per_share).round_dp(0)
}

/// Minimum-value significance filter.
///
/// Policy is `value < min` rejected, so a value exactly at the threshold
/// qualifies.
#[must_use]
pub fn qualifies(total_value: Decimal, min_value: Decimal) -> bool {
    total_value >= min_value
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn mean_price_averages_only_reporting_line_items() {
        // Two of three line items reported a price: (10.00 + 20.00) / 2.
        assert_eq!(mean_price(dec("30.00"), 2), dec("15.00"));
    }

    #[test]
    fn mean_price_is_zero_when_no_line_item_reports_a_price() {
        assert_eq!(mean_price(Decimal::ZERO, 0), Decimal::ZERO);
    }

    #[test]
    fn total_value_rounds_to_whole_currency_units() {
        assert_eq!(total_value(dec("61200"), dec("31.64")), dec("1936368"));
        assert_eq!(total_value(dec("3"), dec("0.335")), dec("1"));
    }

    #[test]
    fn zero_mean_price_gives_zero_total_value() {
        assert_eq!(total_value(dec("50000"), Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn value_exactly_at_threshold_qualifies() {
        let min = dec("100000");
        assert!(qualifies(dec("100000"), min));
    }

    #[test]
    fn value_below_threshold_is_rejected() {
        let min = dec("100000");
        assert!(!qualifies(dec("99999"), min));
        assert!(qualifies(dec("100001"), min));
    }
}
