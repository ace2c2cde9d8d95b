use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

use flunky_stats::roster::Roster;
use flunky_stats::{cleaner, stats, xlsx, TournamentConfig};

#[derive(Parser)]
#[command(name = "flunky-stats")]
#[command(about = "Clean tournament spreadsheets and generate consumption statistics", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ConfigArgs {
    /// Tournament name used in report titles
    #[arg(long, default_value = "Kordun Jesen")]
    tournament: String,

    /// Tournament year used in report titles
    #[arg(long, default_value_t = 2025)]
    year: i32,

    /// Reference date for age computation (yyyy-mm-dd)
    #[arg(long, default_value = "2025-09-20")]
    reference_date: NaiveDate,
}

impl ConfigArgs {
    fn to_config(&self) -> TournamentConfig {
        TournamentConfig::new(self.tournament.clone(), self.year, self.reference_date)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Clean a raw tournament CSV into the normalized table
    Clean {
        /// Raw input CSV
        input: PathBuf,

        /// Cleaned output CSV
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Compute statistics from a cleaned table and write the report workbook
    Analyze {
        /// Cleaned input CSV
        input: PathBuf,

        /// Output Excel workbook
        #[arg(short, long)]
        output: PathBuf,

        /// Also dump every table as CSV into this directory
        #[arg(long)]
        tables_dir: Option<PathBuf>,

        /// Limit ranked sheets to the top N places, ties included (0 = all)
        #[arg(long, default_value_t = 0)]
        top: usize,

        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Run both stages: clean, then analyze
    Run {
        /// Raw input CSV
        input: PathBuf,

        /// Where to write the cleaned intermediate CSV
        #[arg(long)]
        cleaned: PathBuf,

        /// Output Excel workbook
        #[arg(short, long)]
        output: PathBuf,

        /// Also dump every table as CSV into this directory
        #[arg(long)]
        tables_dir: Option<PathBuf>,

        /// Limit ranked sheets to the top N places, ties included (0 = all)
        #[arg(long, default_value_t = 0)]
        top: usize,

        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Display overview statistics for a cleaned table
    Info {
        /// Cleaned input CSV
        input: PathBuf,

        #[command(flatten)]
        config: ConfigArgs,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Clean { input, output } => {
            clean(&input, &output)?;
        }
        Commands::Analyze {
            input,
            output,
            tables_dir,
            top,
            config,
        } => {
            analyze(&input, &output, tables_dir.as_deref(), top, &config.to_config())?;
        }
        Commands::Run {
            input,
            cleaned,
            output,
            tables_dir,
            top,
            config,
        } => {
            clean(&input, &cleaned)?;
            analyze(&cleaned, &output, tables_dir.as_deref(), top, &config.to_config())?;
        }
        Commands::Info { input, config } => {
            info(&input, &config.to_config())?;
        }
    }

    Ok(())
}

fn clean(input: &Path, output: &Path) -> Result<()> {
    println!("Reading raw table: {}", input.display());
    let roster = cleaner::clean(input).context("Failed to clean input file")?;

    println!(
        "Cleaned {} participants across {} days",
        roster.len(),
        roster.day_count()
    );

    roster
        .write(output)
        .context("Failed to write cleaned table")?;
    println!("Wrote cleaned table: {}", output.display());

    Ok(())
}

fn analyze(
    input: &Path,
    output: &Path,
    tables_dir: Option<&Path>,
    top: usize,
    config: &TournamentConfig,
) -> Result<()> {
    println!("Reading cleaned table: {}", input.display());
    let roster = Roster::read(input).context("Failed to read cleaned table")?;
    println!(
        "Found {} participants, {} day columns",
        roster.len(),
        roster.day_count()
    );

    let tables = stats::analyze(&roster, config).context("Analysis failed")?;

    if let Some(dir) = tables_dir {
        stats::write_csv_tables(&tables, dir).context("Failed to write table CSVs")?;
        println!("Wrote table CSVs to: {}", dir.display());
    }

    println!("Writing report workbook: {}", output.display());
    xlsx::write_report(&tables, config, top, output).context("Failed to write report workbook")?;

    println!("Done!");
    Ok(())
}

fn info(input: &Path, config: &TournamentConfig) -> Result<()> {
    let roster = Roster::read(input).context("Failed to read cleaned table")?;
    let tables = stats::analyze(&roster, config).context("Analysis failed")?;
    let overview = &tables.overview;

    println!("Cleaned table: {}", input.display());
    println!("Tournament: {}", config.title());
    println!();

    println!("Participants: {}", overview.participant_count);
    println!("Days: {}", roster.day_labels.join(", "));
    println!("Total consumed: {}", overview.total_consumed);
    println!(
        "Average per person per day: {:.2}",
        overview.avg_per_person_day
    );
    println!(
        "Drank every day: {} ({:.1}%)",
        overview.drank_every_day, overview.drank_every_day_pct
    );
    println!(
        "Never drank: {} ({:.1}%)",
        overview.never_drank, overview.never_drank_pct
    );
    println!("Max in a single day: {}", overview.max_single_day);
    println!("Max total per person: {}", overview.max_total);
    println!(
        "Per-person totals: mean {:.2}, median {:.1}",
        overview.mean_total, overview.median_total
    );
    println!();

    println!("Sections: {}", tables.sections.len());
    for section in &tables.sections {
        println!(
            "  {}. {} - {} members, {} total, {:.2} per member",
            section.rank, section.section, section.member_count, section.total, section.average
        );
    }
    println!();

    if tables.ages.is_empty() {
        println!("Ages: no valid birth dates");
    } else {
        let first = tables.ages.first().map(|b| b.age).unwrap_or(0);
        let last = tables.ages.last().map(|b| b.age).unwrap_or(0);
        println!("Ages: {} to {}", first, last);
    }
    println!(
        "Ranked for consistency: {} of {}",
        tables.consistency.len(),
        roster.len()
    );

    Ok(())
}
