use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

/// Amount validation errors; none terminate the process, the presentation
/// layer re-prompts with the message.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AmountError {
    #[error("Please enter a valid number.")]
    NotANumber,

    #[error("Amount must be greater than zero.")]
    NotPositive,

    #[error("Amount must be less than {0:.2}.")]
    AboveLimit(Decimal),
}

/// Keep money values at 2 decimal places, rounding half-up.
pub fn normalize(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Fixed 2-decimal rendering used for storage and display.
pub fn format_amount(value: Decimal) -> String {
    format!("{:.2}", value)
}

/// Parse and validate a user-supplied amount. Exactly `max_amount` is still
/// accepted; only values above it are rejected.
pub fn parse_amount(raw: &str, max_amount: Decimal) -> Result<Decimal, AmountError> {
    let value: Decimal = raw.trim().parse().map_err(|_| AmountError::NotANumber)?;
    if value <= Decimal::ZERO {
        return Err(AmountError::NotPositive);
    }
    if value > max_amount {
        return Err(AmountError::AboveLimit(max_amount));
    }
    Ok(normalize(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use test_case::test_case;

    fn max() -> Decimal {
        Decimal::new(100_000_00, 2)
    }

    #[rstest]
    #[case("10.005", "10.01")]
    #[case("2.345", "2.35")]
    #[case("2.344", "2.34")]
    #[case("10.00", "10.00")]
    #[case("7", "7.00")]
    fn test_normalize_rounds_half_up(#[case] input: &str, #[case] expected: &str) {
        let value: Decimal = input.parse().unwrap();
        assert_eq!(format_amount(normalize(value)), expected);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let value = normalize("19.995".parse().unwrap());
        assert_eq!(normalize(value), value);
    }

    #[test_case("100000.00", true ; "exactly the limit is accepted")]
    #[test_case("99999.99", true ; "below the limit")]
    #[test_case("100000.01", false ; "just above the limit")]
    #[test_case("0", false ; "zero")]
    #[test_case("0.00", false ; "zero with decimals")]
    #[test_case("-5", false ; "negative")]
    #[test_case("abc", false ; "not a number")]
    #[test_case("", false ; "empty input")]
    #[test_case("1.2.3", false ; "double decimal point")]
    fn test_parse_amount_boundaries(raw: &str, accepted: bool) {
        assert_eq!(parse_amount(raw, max()).is_ok(), accepted);
    }

    #[test]
    fn test_parse_amount_messages_are_distinct() {
        assert_eq!(
            parse_amount("abc", max()).unwrap_err().to_string(),
            "Please enter a valid number."
        );
        assert_eq!(
            parse_amount("-1", max()).unwrap_err().to_string(),
            "Amount must be greater than zero."
        );
        assert_eq!(
            parse_amount("100000.01", max()).unwrap_err().to_string(),
            "Amount must be less than 100000.00."
        );
    }

    #[test]
    fn test_parse_amount_normalizes_result() {
        assert_eq!(
            parse_amount("  12.345 ", max()).unwrap(),
            "12.35".parse::<Decimal>().unwrap()
        );
    }
}
