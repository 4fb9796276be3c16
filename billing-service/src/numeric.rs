use rust_decimal::Decimal;

use crate::error::RowParseError;

/// Parse a locale-formatted decimal string with `,` as the fractional
/// separator into an exact `Decimal`.
///
/// Accepted: an optional leading sign, ASCII digits, and at most one `,`.
/// Anything else (including `.` separators and internal whitespace) is an
/// `InvalidNumericFormat`. The value never passes through binary floating
/// point, so repeated summation stays exact.
pub fn parse_decimal(input: &str) -> Result<Decimal, RowParseError> {
    let s = input.trim();
    let unsigned = s.strip_prefix(['+', '-']).unwrap_or(s);

    let mut digits = 0usize;
    let mut separators = 0usize;
    for c in unsigned.chars() {
        match c {
            '0'..='9' => digits += 1,
            ',' => separators += 1,
            _ => return Err(RowParseError::InvalidNumericFormat(input.to_string())),
        }
    }
    if digits == 0 || separators > 1 {
        return Err(RowParseError::InvalidNumericFormat(input.to_string()));
    }

    s.replace(',', ".")
        .parse::<Decimal>()
        .map_err(|_| RowParseError::InvalidNumericFormat(input.to_string()))
}

/// Render a `Decimal` back into the `,`-separated form used on documents.
pub fn format_decimal(value: Decimal) -> String {
    value.to_string().replace('.', ",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comma_separated_decimals() {
        assert_eq!(parse_decimal("1234,5").unwrap(), "1234.5".parse().unwrap());
        assert_eq!(parse_decimal("0,00001").unwrap(), "0.00001".parse().unwrap());
        assert_eq!(parse_decimal("100").unwrap(), Decimal::from(100));
        assert_eq!(parse_decimal("-0,25").unwrap(), "-0.25".parse().unwrap());
        assert_eq!(parse_decimal("+2,50").unwrap(), "2.50".parse().unwrap());
    }

    #[test]
    fn keeps_twelve_integer_and_five_fractional_digits_exact() {
        let parsed = parse_decimal("999999999999,99999").unwrap();
        assert_eq!(parsed.to_string(), "999999999999.99999");
    }

    #[test]
    fn rejects_malformed_input() {
        for bad in ["abc", "1.5", "1,2,3", "", ",", "1 5", "12a,5", "--1,0"] {
            assert!(
                matches!(parse_decimal(bad), Err(RowParseError::InvalidNumericFormat(_))),
                "expected rejection of {bad:?}"
            );
        }
    }

    #[test]
    fn round_trips_through_locale_formatting() {
        for s in ["1234,5", "0,20000", "-7,125", "42"] {
            let parsed = parse_decimal(s).unwrap();
            let reparsed = parse_decimal(&format_decimal(parsed)).unwrap();
            assert_eq!(parsed, reparsed);
        }
    }
}
