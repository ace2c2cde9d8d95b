//! Excel report rendering.
//!
//! One workbook, one worksheet per engine table, in the order the printed
//! report has always used: overview, daily breakdown, the three individual
//! rankings, sections, ages. The engine computes everything up front; this
//! module only formats.

use crate::config::TournamentConfig;
use crate::error::Result;
use crate::stats::{
    top_with_ties, AgeBucket, DailyEntry, Overview, RankedEntry, SectionEntry, TournamentTables,
};
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet};
use std::path::Path;

/// Write the full report workbook. `top` limits the ranked sheets through
/// the tie-aware selector; zero means every row.
pub fn write_report(
    tables: &TournamentTables,
    config: &TournamentConfig,
    top: usize,
    path: &Path,
) -> Result<()> {
    let mut workbook = Workbook::new();

    write_overview_sheet(workbook.add_worksheet(), &tables.overview, config)?;
    write_daily_sheet(workbook.add_worksheet(), &tables.daily, config)?;

    write_count_ranking_sheet(
        workbook.add_worksheet(),
        "Ukupno Piva",
        "Ukupno Popijenih Piva Kroz Cijeli Teren",
        &top_with_ties(&tables.totals, top),
        config,
    )?;
    write_count_ranking_sheet(
        workbook.add_worksheet(),
        "Najviše U Danu",
        "Najviše Piva U Jednom Danu",
        &top_with_ties(&tables.max_day, top),
        config,
    )?;
    write_consistency_sheet(
        workbook.add_worksheet(),
        &top_with_ties(&tables.consistency, top),
        config,
    )?;

    write_section_sheet(workbook.add_worksheet(), &tables.sections, config)?;
    write_age_sheet(workbook.add_worksheet(), &tables.ages, config)?;

    workbook.save(path)?;
    Ok(())
}

fn title_format() -> Format {
    Format::new().set_bold()
}

fn header_format() -> Format {
    Format::new()
        .set_bold()
        .set_align(FormatAlign::Center)
        .set_border_bottom(FormatBorder::Thin)
}

fn write_headers(sheet: &mut Worksheet, row: u32, headers: &[&str]) -> Result<()> {
    let format = header_format();
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string_with_format(row, col as u16, *header, &format)?;
    }
    Ok(())
}

fn write_overview_sheet(
    sheet: &mut Worksheet,
    overview: &Overview,
    config: &TournamentConfig,
) -> Result<()> {
    sheet.set_name("Pregled")?;
    sheet.set_column_width(0, 38)?;
    sheet.set_column_width(1, 16)?;

    let section_format = Format::new().set_bold().set_border_bottom(FormatBorder::Thin);
    let label_format = Format::new().set_bold();

    let with_pct = |count: usize, pct: f64| format!("{} ({:.1}%)", count, pct);

    let rows: Vec<(&str, String)> = vec![
        ("STATISTIKE KONZUMACIJE", String::new()),
        (
            "Prosječno popijeno dnevno po osobi",
            format!("{:.2}", overview.avg_per_person_day),
        ),
        ("Ukupno popijenih piva", overview.total_consumed.to_string()),
        (
            "Prosjek piva po osobi",
            format!("{:.2}", overview.mean_total),
        ),
        (
            "Medijan piva po osobi",
            format!("{:.1}", overview.median_total),
        ),
        ("SUDJELOVANJE", String::new()),
        ("Broj sudionika", overview.participant_count.to_string()),
        (
            "Pili svaki dan",
            with_pct(overview.drank_every_day, overview.drank_every_day_pct),
        ),
        (
            "Nisu pili ništa",
            with_pct(overview.never_drank, overview.never_drank_pct),
        ),
        (
            "Aktivni sudionici",
            with_pct(
                overview.active_participants,
                overview.active_participants_pct,
            ),
        ),
        ("EKSTREMNE VRIJEDNOSTI", String::new()),
        (
            "Najviše piva u jednom danu",
            format!("{} piva", overview.max_single_day),
        ),
        (
            "Najviše piva ukupno",
            format!("{} piva", overview.max_total),
        ),
    ];

    sheet.write_string_with_format(
        0,
        0,
        &format!("{} - Pregled Statistika", config.title()),
        &title_format(),
    )?;

    for (idx, (label, value)) in rows.iter().enumerate() {
        let row = idx as u32 + 2;
        if value.is_empty() {
            sheet.write_string_with_format(row, 0, *label, &section_format)?;
            sheet.write_string_with_format(row, 1, "", &section_format)?;
        } else {
            sheet.write_string_with_format(row, 0, *label, &label_format)?;
            sheet.write_string(row, 1, value)?;
        }
    }

    Ok(())
}

fn write_daily_sheet(
    sheet: &mut Worksheet,
    daily: &[DailyEntry],
    config: &TournamentConfig,
) -> Result<()> {
    sheet.set_name("Dnevna Konzumacija")?;
    sheet.set_column_width(0, 12)?;
    sheet.set_column_width(1, 12)?;
    sheet.set_column_width(2, 18)?;
    sheet.set_column_width(3, 14)?;

    sheet.write_string_with_format(0, 0, &config.title(), &title_format())?;
    write_headers(
        sheet,
        1,
        &["Dan", "Broj Piva", "Aktivni Sudionici", "Aktivni (%)"],
    )?;

    let pct_format = Format::new().set_num_format("0.0");
    for (idx, entry) in daily.iter().enumerate() {
        let row = idx as u32 + 2;
        sheet.write_string(row, 0, &entry.day)?;
        sheet.write_number(row, 1, entry.total as f64)?;
        sheet.write_number(row, 2, entry.active_count as f64)?;
        sheet.write_number_with_format(row, 3, entry.active_pct, &pct_format)?;
    }

    Ok(())
}

fn write_count_ranking_sheet(
    sheet: &mut Worksheet,
    name: &str,
    subtitle: &str,
    entries: &[RankedEntry<u32>],
    config: &TournamentConfig,
) -> Result<()> {
    sheet.set_name(name)?;
    sheet.set_column_width(0, 8)?;
    sheet.set_column_width(1, 28)?;
    sheet.set_column_width(2, 10)?;

    sheet.write_string_with_format(
        0,
        0,
        &format!("{} - {}", config.title(), subtitle),
        &title_format(),
    )?;
    write_headers(sheet, 1, &["Mjesto", "Ime i Prezime", "Broj Piva"])?;

    for (idx, entry) in entries.iter().enumerate() {
        let row = idx as u32 + 2;
        sheet.write_string(row, 0, &format!("{}.", entry.rank))?;
        sheet.write_string(row, 1, &entry.full_name)?;
        sheet.write_number(row, 2, entry.value as f64)?;
    }

    Ok(())
}

fn write_consistency_sheet(
    sheet: &mut Worksheet,
    entries: &[RankedEntry<f64>],
    config: &TournamentConfig,
) -> Result<()> {
    sheet.set_name("Konzistentnost")?;
    sheet.set_column_width(0, 8)?;
    sheet.set_column_width(1, 28)?;
    sheet.set_column_width(2, 10)?;

    sheet.write_string_with_format(
        0,
        0,
        &format!(
            "{} - Konzistentnost Pijenja po Danima (Koeficijent Varijacije)",
            config.title()
        ),
        &title_format(),
    )?;
    write_headers(sheet, 1, &["Mjesto", "Ime i Prezime", "CV"])?;

    let cv_format = Format::new().set_num_format("0.000");
    for (idx, entry) in entries.iter().enumerate() {
        let row = idx as u32 + 2;
        sheet.write_string(row, 0, &format!("{}.", entry.rank))?;
        sheet.write_string(row, 1, &entry.full_name)?;
        sheet.write_number_with_format(row, 2, entry.value, &cv_format)?;
    }

    Ok(())
}

fn write_section_sheet(
    sheet: &mut Worksheet,
    sections: &[SectionEntry],
    config: &TournamentConfig,
) -> Result<()> {
    sheet.set_name("Sekcije")?;
    sheet.set_column_width(0, 8)?;
    sheet.set_column_width(1, 22)?;
    sheet.set_column_width(2, 12)?;
    sheet.set_column_width(3, 12)?;
    sheet.set_column_width(4, 14)?;

    sheet.write_string_with_format(
        0,
        0,
        &format!(
            "{} - Najžednija Sekcija Po Prosječnoj Konzumaciji",
            config.title()
        ),
        &title_format(),
    )?;
    write_headers(
        sheet,
        1,
        &["Mjesto", "Sekcija", "Broj Osoba", "Ukupno Piva", "Piva Po Osobi"],
    )?;

    let avg_format = Format::new().set_num_format("0.00");
    for (idx, entry) in sections.iter().enumerate() {
        let row = idx as u32 + 2;
        sheet.write_string(row, 0, &format!("{}.", entry.rank))?;
        sheet.write_string(row, 1, &entry.section)?;
        sheet.write_number(row, 2, entry.member_count as f64)?;
        sheet.write_number(row, 3, entry.total as f64)?;
        sheet.write_number_with_format(row, 4, entry.average, &avg_format)?;
    }

    Ok(())
}

fn write_age_sheet(
    sheet: &mut Worksheet,
    ages: &[AgeBucket],
    config: &TournamentConfig,
) -> Result<()> {
    sheet.set_name("Po Godinama")?;
    sheet.set_column_width(0, 10)?;
    sheet.set_column_width(1, 14)?;
    sheet.set_column_width(2, 16)?;

    sheet.write_string_with_format(
        0,
        0,
        &format!(
            "{} - Prosjek Konzumacije Piva Po Godinama Starosti",
            config.title()
        ),
        &title_format(),
    )?;
    write_headers(sheet, 1, &["Godine", "Prosjek Piva", "Broj Sudionika"])?;

    let avg_format = Format::new().set_num_format("0.00");
    for (idx, bucket) in ages.iter().enumerate() {
        let row = idx as u32 + 2;
        sheet.write_number(row, 0, bucket.age as f64)?;
        // Ages with no participants keep an empty average cell so the gap
        // stays visible in the sheet.
        if let Some(average) = bucket.average {
            sheet.write_number_with_format(row, 1, average, &avg_format)?;
        }
        sheet.write_number(row, 2, bucket.count as f64)?;
    }

    Ok(())
}
