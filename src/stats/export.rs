//! CSV dumps of the engine tables, for downstream tooling that wants plain
//! files instead of the workbook.

use super::TournamentTables;
use crate::error::Result;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Write every engine table as a CSV file under `dir` (created on demand).
pub fn write_csv_tables(tables: &TournamentTables, dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)?;

    write_rows(&tables.totals, &dir.join("ukupno.csv"))?;
    write_rows(&tables.max_day, &dir.join("max_dan.csv"))?;
    write_rows(&tables.consistency, &dir.join("konzistentnost.csv"))?;
    write_rows(&tables.sections, &dir.join("sekcije.csv"))?;
    write_rows(&tables.ages, &dir.join("godine.csv"))?;
    write_rows(&tables.daily, &dir.join("dani.csv"))?;
    write_rows(
        std::slice::from_ref(&tables.overview),
        &dir.join("pregled.csv"),
    )?;

    Ok(())
}

fn write_rows<T: Serialize>(rows: &[T], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
