//! The cleaned-table schema shared by the cleaner and the statistics engine.
//!
//! Both stages hand off through a CSV file with this layout: three identity
//! columns (`Sekcija`, `ImePrezime`, `DatumRođenja`) followed by one numeric
//! column per tournament day. The day-column count is discovered from the
//! header, not fixed at compile time.

use crate::error::{Result, StatsError};
use log::debug;
use std::path::Path;

/// Placeholder written into identity fields that were missing or empty.
pub const NA_SENTINEL: &str = "N/A";

/// Identity column headers, in required order.
pub const IDENTITY_COLUMNS: [&str; 3] = ["Sekcija", "ImePrezime", "DatumRođenja"];

/// Separator marking a compound section label ("Veterani - Seniori").
pub const SECTION_SEPARATOR: &str = " - ";

/// One participant row of the cleaned table.
#[derive(Debug, Clone, PartialEq)]
pub struct Participant {
    pub section: String,
    pub full_name: String,
    /// Normalized `dd.mm.yyyy`, or a sentinel when unknown.
    pub birth_date: String,
    /// One count per tournament day, same width for every row.
    pub daily_counts: Vec<u32>,
}

impl Participant {
    /// Total consumption across all days.
    pub fn total(&self) -> u32 {
        self.daily_counts.iter().sum()
    }

    /// Highest single-day consumption.
    pub fn max_day(&self) -> u32 {
        self.daily_counts.iter().copied().max().unwrap_or(0)
    }

    /// Section labels this person belongs to, compound labels split.
    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.section.split(SECTION_SEPARATOR)
    }
}

/// The cleaned table: day headers plus participant rows.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    pub day_labels: Vec<String>,
    pub participants: Vec<Participant>,
}

impl Roster {
    pub fn day_count(&self) -> usize {
        self.day_labels.len()
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// Read a cleaned table from a CSV file.
    ///
    /// Unlike the cleaner's raw input path this is strict: the identity
    /// headers must be present in order and every day cell must hold an
    /// integer. A violation means the handoff artifact is corrupt, which is
    /// fatal.
    pub fn read(path: &Path) -> Result<Roster> {
        let mut reader = csv::Reader::from_path(path)?;

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        let day_labels = split_day_labels(&headers)?;

        let mut participants = Vec::new();
        for record in reader.records() {
            let record = record?;
            let cell = |i: usize| record.get(i).unwrap_or("").trim();

            let mut daily_counts = Vec::with_capacity(day_labels.len());
            for (offset, label) in day_labels.iter().enumerate() {
                let raw = cell(IDENTITY_COLUMNS.len() + offset);
                let count = raw.parse::<u32>().map_err(|_| StatsError::InvalidCount {
                    column: label.clone(),
                    value: raw.to_string(),
                })?;
                daily_counts.push(count);
            }

            participants.push(Participant {
                section: cell(0).to_string(),
                full_name: cell(1).to_string(),
                birth_date: cell(2).to_string(),
                daily_counts,
            });
        }

        debug!(
            "read roster: {} participants, {} day columns",
            participants.len(),
            day_labels.len()
        );

        Ok(Roster {
            day_labels,
            participants,
        })
    }

    /// Write the table as CSV with the same column layout it was read from.
    pub fn write(&self, path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;

        let mut headers: Vec<&str> = IDENTITY_COLUMNS.to_vec();
        headers.extend(self.day_labels.iter().map(String::as_str));
        writer.write_record(&headers)?;

        for person in &self.participants {
            let mut row = vec![
                person.section.clone(),
                person.full_name.clone(),
                person.birth_date.clone(),
            ];
            row.extend(person.daily_counts.iter().map(|c| c.to_string()));
            writer.write_record(&row)?;
        }

        writer.flush()?;
        Ok(())
    }
}

/// Validate the identity headers and return the day-column labels after them.
pub fn split_day_labels(headers: &[String]) -> Result<Vec<String>> {
    for (idx, expected) in IDENTITY_COLUMNS.iter().enumerate() {
        match headers.get(idx) {
            Some(found) if found == expected => {}
            _ => return Err(StatsError::MissingColumn(expected.to_string())),
        }
    }

    let day_labels: Vec<String> = headers[IDENTITY_COLUMNS.len()..].to_vec();
    if day_labels.is_empty() {
        return Err(StatsError::NoDayColumns);
    }
    Ok(day_labels)
}
