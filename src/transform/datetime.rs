use crate::core::{PipelineError, Record, Result, Schema, Transform};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;

/// The twelve month abbreviations the export emits, case-sensitive.
const MONTHS: [(&str, u32); 12] = [
    ("Jan", 1),
    ("Feb", 2),
    ("Mar", 3),
    ("Apr", 4),
    ("May", 5),
    ("Jun", 6),
    ("Jul", 7),
    ("Aug", 8),
    ("Sep", 9),
    ("Oct", 10),
    ("Nov", 11),
    ("Dec", 12),
];

/// Normalizes the two free-form date/time columns of a renamed record.
///
/// `date` arrives as `"31st Jan 2023, 07:15:00"` or a locale variant with a
/// leading weekday token (`"Tue 31 Jan 2023"`); both collapse to `YYYY/MM/DD`
/// with day-before-month precedence. `wakeup_time` arrives as a full
/// ISO-like timestamp and is cut down to its `HH:MM:SS` characters by
/// position, a slice rather than a parse: a deviant timestamp yields
/// whatever characters sit there, matching the export's observed behavior.
pub struct DateTimeNormalizer;

/// Extracts day, month, and year around the month abbreviation, assembles
/// `DD-MM-YYYY`, and parses it day-first.
fn normalize_date(raw: &str) -> Result<String> {
    let (pos, abbrev, month) = MONTHS
        .iter()
        .find_map(|(abbrev, num)| raw.find(abbrev).map(|pos| (pos, *abbrev, *num)))
        .ok_or_else(|| {
            PipelineError::Transform(format!("no recognized month abbreviation in '{raw}'"))
        })?;

    // Day digits sit in the token just before the month, with an optional
    // ordinal suffix ("31st") and an optional weekday prefix before that.
    let day: String = raw[..pos]
        .trim_end()
        .rsplit(' ')
        .next()
        .unwrap_or("")
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if day.is_empty() {
        return Err(PipelineError::Transform(format!(
            "no day-of-month before month abbreviation in '{raw}'"
        )));
    }

    let year: String = raw[pos + abbrev.len()..]
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if year.len() != 4 {
        return Err(PipelineError::Transform(format!(
            "no four-digit year after month abbreviation in '{raw}'"
        )));
    }

    let assembled = format!("{day}-{month:02}-{year}");
    let date = NaiveDate::parse_from_str(&assembled, "%d-%m-%Y").map_err(|e| {
        PipelineError::Transform(format!("unparseable date '{raw}' (as '{assembled}'): {e}"))
    })?;
    Ok(date.format("%Y/%m/%d").to_string())
}

/// Characters 12–19 (1-indexed) of the source timestamp, i.e. `HH:MM:SS` of
/// `YYYY-MM-DDTHH:MM:SS`. Shorter input yields a shorter string, never an
/// error.
fn slice_waketime(raw: &str) -> String {
    raw.chars().skip(11).take(8).collect()
}

#[async_trait]
impl Transform for DateTimeNormalizer {
    async fn transform(&self, mut record: Record) -> Result<Vec<Record>> {
        let date = normalize_date(record.require_str("date")?)?;
        let waketime = slice_waketime(record.require_str("wakeup_time")?);

        record.set_field("date".into(), Value::String(date));
        record.set_field("wakeup_time".into(), Value::String(waketime));
        Ok(vec![record])
    }

    async fn get_output_schema(&self, input_schema: &Schema) -> Result<Schema> {
        Ok(input_schema.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn ordinal_form_parses_day_first() {
        assert_eq!(
            normalize_date("31st Jan 2023, 07:15:00").unwrap(),
            "2023/01/31"
        );
        assert_eq!(
            normalize_date("1st Feb 2023, 06:50:00").unwrap(),
            "2023/02/01"
        );
        assert_eq!(normalize_date("3rd Dec 2022, 08:05:12").unwrap(), "2022/12/03");
    }

    #[test]
    fn weekday_prefixed_form_parses_too() {
        assert_eq!(normalize_date("Tue 31 Jan 2023").unwrap(), "2023/01/31");
        assert_eq!(normalize_date("Sun 5 Mar 2023").unwrap(), "2023/03/05");
    }

    #[test]
    fn unknown_month_abbreviation_fails_the_row() {
        // Lowercase does not match the case-sensitive table.
        assert!(normalize_date("31st jan 2023, 07:15:00").is_err());
        assert!(normalize_date("31 01 2023").is_err());
    }

    #[test]
    fn invalid_calendar_date_fails_the_row() {
        assert!(normalize_date("31st Feb 2023, 07:15:00").is_err());
    }

    #[test]
    fn waketime_is_a_pure_slice_with_no_date_leakage() {
        assert_eq!(slice_waketime("2023-01-31T07:15:00"), "07:15:00");
        assert_eq!(slice_waketime("2023-12-05 23:59:59"), "23:59:59");
    }

    #[test]
    fn short_waketime_yields_garbage_not_an_error() {
        assert_eq!(slice_waketime("07:15:00"), "");
        assert_eq!(slice_waketime("2023-01-31T07:15"), "07:15");
    }

    #[tokio::test]
    async fn rewrites_both_fields_in_place() {
        let mut data = HashMap::new();
        data.insert(
            "date".to_string(),
            Value::String("31st Jan 2023, 07:15:00".to_string()),
        );
        data.insert(
            "wakeup_time".to_string(),
            Value::String("2023-01-31T07:15:00".to_string()),
        );
        data.insert("hours_slept".to_string(), Value::String("7:30".to_string()));

        let out = DateTimeNormalizer
            .transform(Record::with_data(data))
            .await
            .unwrap();
        assert_eq!(out[0].require_str("date").unwrap(), "2023/01/31");
        assert_eq!(out[0].require_str("wakeup_time").unwrap(), "07:15:00");
        assert_eq!(out[0].require_str("hours_slept").unwrap(), "7:30");
    }
}
