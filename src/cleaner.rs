//! Raw spreadsheet cleanup.
//!
//! Takes the hand-maintained tournament CSV and produces a [`Roster`] that
//! satisfies the cleaned-table invariants: trimmed cells, no fully-empty rows
//! or columns, sentinel-filled identity fields, integer day counts, and birth
//! dates normalized to `dd.mm.yyyy` where the free-form input allows it.
//!
//! Every transform is total. Bad values degrade to a sentinel, zero, or the
//! untouched input string; only structural problems (missing file, missing
//! identity headers, no day columns) abort the run.

use crate::error::Result;
use crate::roster::{split_day_labels, Participant, Roster, IDENTITY_COLUMNS, NA_SENTINEL};
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use std::path::Path;

/// Read a raw tournament CSV and apply the full cleaning pass.
pub fn clean(path: &Path) -> Result<Roster> {
    let (headers, rows) = read_raw(path)?;
    clean_table(headers, rows)
}

/// Clean an already-loaded raw table. Split out from [`clean`] so the
/// transform chain can be tested without touching the filesystem.
pub fn clean_table(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Roster> {
    let headers: Vec<String> = headers.iter().map(|h| h.trim().to_string()).collect();

    // Trim first, then drop fully-empty rows; a row of lone spaces carries
    // no data either. Dropping rows before columns keeps a column from
    // being held alive by cells in an otherwise empty row.
    let rows: Vec<Vec<String>> = rows
        .into_iter()
        .map(|row| row.iter().map(|cell| cell.trim().to_string()).collect())
        .filter(|row: &Vec<String>| row.iter().any(|cell| !cell.is_empty()))
        .collect();

    let (headers, rows) = drop_empty_columns(headers, rows);
    let day_labels = split_day_labels(&headers)?;

    let mut participants = Vec::with_capacity(rows.len());
    for row in rows {
        let cell = |i: usize| row.get(i).map(String::as_str).unwrap_or("");

        let section = capitalize_first(&fill_identity(cell(0)));
        let full_name = capitalize_first(&fill_identity(cell(1)));
        let birth_date = normalize_date(&fill_identity(cell(2)));

        let daily_counts = (0..day_labels.len())
            .map(|offset| coerce_count(cell(IDENTITY_COLUMNS.len() + offset)))
            .collect();

        participants.push(Participant {
            section,
            full_name,
            birth_date,
            daily_counts,
        });
    }

    debug!(
        "cleaned table: {} participants, {} day columns",
        participants.len(),
        day_labels.len()
    );

    Ok(Roster {
        day_labels,
        participants,
    })
}

/// Load the raw CSV as strings, rows padded to header width.
///
/// The raw file is read leniently (short rows happen when trailing commas are
/// left off in a spreadsheet export); structural checks and trimming happen
/// in [`clean_table`].
fn read_raw(path: &Path) -> Result<(Vec<String>, Vec<Vec<String>>)> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;

    let headers: Vec<String> = reader.headers()?.iter().map(String::from).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut row: Vec<String> = record.iter().map(String::from).collect();
        row.resize(headers.len(), String::new());
        rows.push(row);
    }

    Ok((headers, rows))
}

/// Remove columns whose every data cell is empty.
fn drop_empty_columns(
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
) -> (Vec<String>, Vec<Vec<String>>) {
    if rows.is_empty() {
        return (headers, rows);
    }

    let keep: Vec<bool> = (0..headers.len())
        .map(|col| rows.iter().any(|row| !row[col].is_empty()))
        .collect();

    let filter = |row: Vec<String>| -> Vec<String> {
        row.into_iter()
            .zip(&keep)
            .filter_map(|(cell, keep)| keep.then_some(cell))
            .collect()
    };

    let headers = filter(headers);
    let rows = rows.into_iter().map(filter).collect();
    (headers, rows)
}

/// Missing identity fields become the sentinel.
fn fill_identity(raw: &str) -> String {
    if raw.is_empty() {
        NA_SENTINEL.to_string()
    } else {
        raw.to_string()
    }
}

/// Uppercase the first character only, leaving the rest untouched.
/// Placeholder values ("0", empty) are passed through.
fn capitalize_first(value: &str) -> String {
    if value.is_empty() || value == "0" {
        return value.to_string();
    }
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Coerce a day cell to a non-negative integer. Empty cells count as zero,
/// fractional values truncate, anything unparseable degrades to zero.
fn coerce_count(raw: &str) -> u32 {
    if raw.is_empty() {
        return 0;
    }
    if let Ok(n) = raw.parse::<i64>() {
        return n.clamp(0, u32::MAX as i64) as u32;
    }
    if let Ok(f) = raw.parse::<f64>() {
        if f.is_finite() {
            return f.trunc().clamp(0.0, u32::MAX as f64) as u32;
        }
    }
    0
}

lazy_static! {
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
    static ref SPACED_DOT: Regex = Regex::new(r"\s*\.\s*").unwrap();
}

/// Normalize a free-form birth date to `dd.mm.yyyy`.
///
/// Handles the separator conventions seen in the raw sheets (`.`, `/`, `-`),
/// stray whitespace, trailing dots, and two-digit years (pivot at 50: `99`
/// becomes 1999, `05` becomes 2005). Anything that does not split into
/// exactly three integer fragments is returned as-is after whitespace
/// scrubbing. Calendar validity is deliberately not checked here; a `32.13.`
/// date survives cleaning and is only rejected later, by age derivation.
pub fn normalize_date(raw: &str) -> String {
    if raw.is_empty() || raw == NA_SENTINEL || raw == "0" {
        return raw.to_string();
    }

    let scrubbed = raw.trim().trim_end_matches('.');
    let scrubbed = WHITESPACE_RUN.replace_all(scrubbed, " ");
    let scrubbed = SPACED_DOT.replace_all(&scrubbed, ".");
    let scrubbed = scrubbed.trim().to_string();

    // First separator wins, checked in priority order.
    for sep in ['.', '/', '-'] {
        if !scrubbed.contains(sep) {
            continue;
        }

        let parts: Vec<&str> = scrubbed
            .split(sep)
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect();
        if parts.len() != 3 {
            return scrubbed;
        }

        let (day, month) = match (parts[0].parse::<u32>(), parts[1].parse::<u32>()) {
            (Ok(day), Ok(month)) => (day, month),
            _ => return scrubbed,
        };

        let year = match (parts[2].len(), parts[2].parse::<u32>()) {
            (4, Ok(_)) => parts[2].to_string(),
            (2, Ok(y)) if y > 50 => format!("19{:02}", y),
            (2, Ok(y)) => format!("20{:02}", y),
            _ => return scrubbed,
        };

        return format!("{:02}.{:02}.{}", day, month, year);
    }

    scrubbed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_date_dot_separator() {
        assert_eq!(normalize_date("5.3.1999"), "05.03.1999");
        assert_eq!(normalize_date("05.03.1999"), "05.03.1999");
    }

    #[test]
    fn test_normalize_date_two_digit_year_pivot() {
        assert_eq!(normalize_date("5/3/99"), "05.03.1999");
        assert_eq!(normalize_date("5-3-05"), "05.03.2005");
        assert_eq!(normalize_date("1.1.50"), "01.01.2050");
        assert_eq!(normalize_date("1.1.51"), "01.01.1951");
    }

    #[test]
    fn test_normalize_date_passthrough_values() {
        assert_eq!(normalize_date("N/A"), "N/A");
        assert_eq!(normalize_date("0"), "0");
        assert_eq!(normalize_date(""), "");
    }

    #[test]
    fn test_normalize_date_wrong_fragment_count() {
        assert_eq!(
            normalize_date("not-a-date-with-4-parts-here"),
            "not-a-date-with-4-parts-here"
        );
        assert_eq!(normalize_date("5.1999"), "5.1999");
    }

    #[test]
    fn test_normalize_date_non_integer_fragment() {
        assert_eq!(normalize_date("5.march.1999"), "5.march.1999");
        assert_eq!(normalize_date("1.2.abcd"), "1.2.abcd");
    }

    #[test]
    fn test_normalize_date_three_digit_year_unchanged() {
        assert_eq!(normalize_date("1.2.199"), "1.2.199");
    }

    #[test]
    fn test_normalize_date_whitespace_and_trailing_dots() {
        assert_eq!(normalize_date(" 1 . 2 . 1999."), "01.02.1999");
        assert_eq!(normalize_date("5.3.1999.."), "05.03.1999");
        assert_eq!(normalize_date("5.3.1999."), "05.03.1999");
    }

    #[test]
    fn test_normalize_date_trailing_separator() {
        // Empty fragments from a trailing separator are discarded.
        assert_eq!(normalize_date("5/3/1999/"), "05.03.1999");
    }

    #[test]
    fn test_normalize_date_no_calendar_validation() {
        assert_eq!(normalize_date("32.13.2000"), "32.13.2000");
    }

    #[test]
    fn test_normalize_date_separator_priority() {
        // '.' is checked before '-', so the dot split wins and fails the
        // fragment count, leaving the string alone.
        assert_eq!(normalize_date("1.2-1999"), "1.2-1999");
    }

    #[test]
    fn test_normalize_date_idempotent() {
        let inputs = [
            "5.3.1999",
            "5/3/99",
            "5-3-05",
            "N/A",
            "0",
            "",
            "32.13.2000",
            " 1 . 2 . 1999.",
            "not-a-date-with-4-parts-here",
            "5.march.1999",
            "1.2.x .",
        ];
        for input in inputs {
            let once = normalize_date(input);
            assert_eq!(normalize_date(&once), once, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn test_capitalize_first() {
        assert_eq!(capitalize_first("bob"), "Bob");
        assert_eq!(capitalize_first("đuro horvat"), "Đuro horvat");
        assert_eq!(capitalize_first("N/A"), "N/A");
        assert_eq!(capitalize_first("0"), "0");
        assert_eq!(capitalize_first(""), "");
    }

    #[test]
    fn test_coerce_count() {
        assert_eq!(coerce_count(""), 0);
        assert_eq!(coerce_count("7"), 7);
        assert_eq!(coerce_count("3.9"), 3);
        assert_eq!(coerce_count("-2"), 0);
        assert_eq!(coerce_count("puno"), 0);
    }

    fn raw(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    fn headers() -> Vec<String> {
        raw(&["Sekcija", "ImePrezime", "DatumRođenja", "Dan1", "Dan2"])
    }

    #[test]
    fn test_clean_table_end_to_end() {
        let rows = vec![
            raw(&["a", " bob", "1.1.00", "2", ""]),
            raw(&["", "carl", "", "", "5"]),
            raw(&["b", "dana", "32.13.2000", "1", "1"]),
        ];

        let roster = clean_table(headers(), rows).unwrap();
        assert_eq!(roster.day_labels, vec!["Dan1", "Dan2"]);

        let people = &roster.participants;
        assert_eq!(people[0].section, "A");
        assert_eq!(people[0].full_name, "Bob");
        assert_eq!(people[0].birth_date, "01.01.2000");
        assert_eq!(people[0].daily_counts, vec![2, 0]);

        assert_eq!(people[1].section, "N/A");
        assert_eq!(people[1].full_name, "Carl");
        assert_eq!(people[1].birth_date, "N/A");
        assert_eq!(people[1].daily_counts, vec![0, 5]);

        assert_eq!(people[2].section, "B");
        assert_eq!(people[2].full_name, "Dana");
        assert_eq!(people[2].birth_date, "32.13.2000");
        assert_eq!(people[2].daily_counts, vec![1, 1]);
    }

    #[test]
    fn test_clean_table_drops_empty_rows_and_columns() {
        let mut headers = headers();
        headers.push(String::new());
        let rows = vec![
            raw(&["a", "bob", "1.1.2000", "2", "3", ""]),
            raw(&["", "", "", "", "", ""]),
            raw(&["b", "eva", "N/A", "1", "0", ""]),
        ];

        let roster = clean_table(headers, rows).unwrap();
        assert_eq!(roster.len(), 2);
        assert_eq!(roster.day_labels, vec!["Dan1", "Dan2"]);
    }

    #[test]
    fn test_clean_table_is_idempotent() {
        let rows = vec![
            raw(&[" jungle ", " bob", "1.1.00", "2", "3"]),
            raw(&["b", "dana", "5/3/99", "1", "1"]),
        ];

        let once = clean_table(headers(), rows).unwrap();

        let rows_again: Vec<Vec<String>> = once
            .participants
            .iter()
            .map(|p| {
                let mut row = vec![p.section.clone(), p.full_name.clone(), p.birth_date.clone()];
                row.extend(p.daily_counts.iter().map(|c| c.to_string()));
                row
            })
            .collect();
        let twice = clean_table(headers(), rows_again).unwrap();

        assert_eq!(once.participants, twice.participants);
    }

    #[test]
    fn test_clean_missing_file_is_fatal() {
        let missing = std::path::Path::new("does-not-exist.csv");
        assert!(clean(missing).is_err());
    }

    #[test]
    fn test_clean_reads_short_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("raw.csv");
        std::fs::write(
            &path,
            "Sekcija,ImePrezime,DatumRođenja,Dan1,Dan2\nšuma,iva,1.1.99,4\n",
        )
        .unwrap();

        let roster = clean(&path).unwrap();
        assert_eq!(roster.participants[0].full_name, "Iva");
        assert_eq!(roster.participants[0].section, "Šuma");
        // Dan2 never has a value, so the whole column is dropped.
        assert_eq!(roster.day_labels, vec!["Dan1"]);
        assert_eq!(roster.participants[0].daily_counts, vec![4]);
    }
}
