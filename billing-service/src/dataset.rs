use billing_client::domain::NewReading;
use csv::StringRecord;
use time::{
    format_description::{well_known::Rfc3339, FormatItem},
    macros::format_description,
    Date, OffsetDateTime, PrimitiveDateTime,
};

use crate::{
    error::{BillingError, RowParseError},
    numeric,
};

const DATETIME_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
const DATE_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Parse a `;`-delimited reading dataset: one header line (ignored) followed
/// by `timestamp;usage;price` rows.
///
/// Parsing is all-or-nothing. The first malformed row aborts the dataset
/// with a `BatchParse` error carrying the 1-based data-row index and the raw
/// row content; callers only touch the store once the whole dataset parsed.
pub fn parse_dataset(raw: &str) -> Result<Vec<NewReading>, BillingError> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_reader(raw.as_bytes());

    let mut readings = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let row = i + 1;
        let record = result.map_err(|e| BillingError::BatchParse {
            row,
            raw: String::new(),
            source: RowParseError::Malformed(e.to_string()),
        })?;

        let reading = record_to_reading(&record).map_err(|source| BillingError::BatchParse {
            row,
            raw: record.iter().collect::<Vec<_>>().join(";"),
            source,
        })?;
        readings.push(reading);
    }

    Ok(readings)
}

fn record_to_reading(record: &StringRecord) -> Result<NewReading, RowParseError> {
    if record.len() != 3 {
        return Err(RowParseError::WrongColumnCount(record.len()));
    }

    let ts = parse_timestamp(&record[0])?;
    let usage = numeric::parse_decimal(&record[1])?;
    let price = numeric::parse_decimal(&record[2])?;

    Ok(NewReading { ts, usage, price })
}

/// Parse a reading timestamp. RFC 3339 is preferred; the plain
/// `YYYY-MM-DD HH:MM:SS` and bare `YYYY-MM-DD` forms that meter exports
/// commonly use are accepted and assumed to be UTC.
pub fn parse_timestamp(input: &str) -> Result<OffsetDateTime, RowParseError> {
    let s = input.trim();
    if let Ok(ts) = OffsetDateTime::parse(s, &Rfc3339) {
        return Ok(ts);
    }
    if let Ok(dt) = PrimitiveDateTime::parse(s, DATETIME_FORMAT) {
        return Ok(dt.assume_utc());
    }
    if let Ok(d) = Date::parse(s, DATE_FORMAT) {
        return Ok(d.midnight().assume_utc());
    }
    Err(RowParseError::InvalidTimestampFormat(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    const HEADER: &str = "timestamp;usage;price\n";

    #[test]
    fn parses_rows_after_header() {
        let raw = format!(
            "{HEADER}2024-01-05 10:30:00;100,00000;0,20000\n2024-01-20;50,00000;0,25000\n"
        );
        let rows = parse_dataset(&raw).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].ts, datetime!(2024-01-05 10:30:00 UTC));
        assert_eq!(rows[0].usage, "100.00000".parse().unwrap());
        assert_eq!(rows[0].price, "0.20000".parse().unwrap());
        assert_eq!(rows[1].ts, datetime!(2024-01-20 0:00 UTC));
    }

    #[test]
    fn accepts_rfc3339_timestamps() {
        let raw = format!("{HEADER}2024-03-01T06:15:00Z;1,5;0,1\n");
        let rows = parse_dataset(&raw).unwrap();
        assert_eq!(rows[0].ts, datetime!(2024-03-01 06:15:00 UTC));
    }

    #[test]
    fn header_only_dataset_yields_no_rows() {
        assert!(parse_dataset(HEADER).unwrap().is_empty());
    }

    #[test]
    fn malformed_usage_aborts_with_row_index_and_content() {
        let raw = format!("{HEADER}2024-01-05;100,0;0,2\n2024-01-06;abc;0,2\n");
        match parse_dataset(&raw) {
            Err(BillingError::BatchParse { row, raw, source }) => {
                assert_eq!(row, 2);
                assert_eq!(raw, "2024-01-06;abc;0,2");
                assert!(matches!(source, RowParseError::InvalidNumericFormat(_)));
            }
            other => panic!("expected BatchParse, got {other:?}"),
        }
    }

    #[test]
    fn malformed_timestamp_aborts_the_batch() {
        let raw = format!("{HEADER}not-a-date;1,0;0,2\n");
        match parse_dataset(&raw) {
            Err(BillingError::BatchParse { row, source, .. }) => {
                assert_eq!(row, 1);
                assert!(matches!(source, RowParseError::InvalidTimestampFormat(_)));
            }
            other => panic!("expected BatchParse, got {other:?}"),
        }
    }

    #[test]
    fn wrong_column_count_is_rejected() {
        let raw = format!("{HEADER}2024-01-05;1,0\n");
        match parse_dataset(&raw) {
            Err(BillingError::BatchParse { row, source, .. }) => {
                assert_eq!(row, 1);
                assert!(matches!(source, RowParseError::WrongColumnCount(2)));
            }
            other => panic!("expected BatchParse, got {other:?}"),
        }
    }
}
