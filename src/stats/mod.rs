//! Statistics & ranking engine.
//!
//! Consumes a cleaned [`Roster`] and produces every table the report is
//! built from. All operations are total over a well-formed roster; rows with
//! an undefined metric (zero-mean CV, unparseable birth date) are excluded
//! from the affected table instead of failing the run. The only fatal case
//! is an empty roster.

pub mod aggregate;
pub mod export;
pub mod metrics;
pub mod ranking;

pub use aggregate::{AgeBucket, DailyEntry, Overview, SectionEntry};
pub use export::write_csv_tables;
pub use metrics::{age_on, person_metrics, PersonMetrics};
pub use ranking::{dense_ranks, rank_entries, top_with_ties, RankDirection, RankedEntry};

use crate::config::TournamentConfig;
use crate::error::{Result, StatsError};
use crate::roster::Roster;
use log::info;

/// Everything the report renderer consumes, computed in one pass.
#[derive(Debug, Clone)]
pub struct TournamentTables {
    pub overview: Overview,
    pub daily: Vec<DailyEntry>,
    pub totals: Vec<RankedEntry<u32>>,
    pub max_day: Vec<RankedEntry<u32>>,
    pub consistency: Vec<RankedEntry<f64>>,
    pub sections: Vec<SectionEntry>,
    pub ages: Vec<AgeBucket>,
}

/// Run the full engine over a cleaned roster.
pub fn analyze(roster: &Roster, config: &TournamentConfig) -> Result<TournamentTables> {
    if roster.is_empty() {
        return Err(StatsError::EmptyTable);
    }

    let totals = rank_entries(
        roster
            .participants
            .iter()
            .map(|p| (p.full_name.clone(), p.total()))
            .collect(),
        RankDirection::Descending,
    );

    let max_day = rank_entries(
        roster
            .participants
            .iter()
            .map(|p| (p.full_name.clone(), p.max_day()))
            .collect(),
        RankDirection::Descending,
    );

    // Lower CV means steadier daily consumption; undefined CVs drop out
    // before ranking so they never occupy a rank.
    let consistency = rank_entries(
        roster
            .participants
            .iter()
            .filter_map(|p| {
                person_metrics(&p.daily_counts)
                    .cv
                    .map(|cv| (p.full_name.clone(), cv))
            })
            .collect(),
        RankDirection::Ascending,
    );

    let tables = TournamentTables {
        overview: aggregate::overview(roster),
        daily: aggregate::daily_table(roster),
        totals,
        max_day,
        consistency,
        sections: aggregate::section_table(roster),
        ages: aggregate::age_table(roster, config.reference_date),
    };

    info!(
        "analyzed {}: {} participants, {} sections, {} ranked for consistency",
        config.title(),
        roster.len(),
        tables.sections.len(),
        tables.consistency.len()
    );

    Ok(tables)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::{Participant, NA_SENTINEL};

    fn person(name: &str, birth: &str, counts: &[u32]) -> Participant {
        Participant {
            section: "Sekcija".to_string(),
            full_name: name.to_string(),
            birth_date: birth.to_string(),
            daily_counts: counts.to_vec(),
        }
    }

    fn two_day_roster(participants: Vec<Participant>) -> Roster {
        Roster {
            day_labels: vec!["Dan1".to_string(), "Dan2".to_string()],
            participants,
        }
    }

    #[test]
    fn test_analyze_total_ranking_with_tie() {
        let roster = two_day_roster(vec![
            person("Bob", "01.01.2000", &[2, 0]),
            person("Carl", NA_SENTINEL, &[0, 5]),
            person("Dana", "32.13.2000", &[1, 1]),
        ]);
        let tables = analyze(&roster, &TournamentConfig::default()).unwrap();

        let summary: Vec<(u32, &str, u32)> = tables
            .totals
            .iter()
            .map(|e| (e.rank, e.full_name.as_str(), e.value))
            .collect();
        assert_eq!(
            summary,
            vec![(1, "Carl", 5), (2, "Bob", 2), (2, "Dana", 2)]
        );
    }

    #[test]
    fn test_analyze_excludes_undefined_cv_rows() {
        let roster = two_day_roster(vec![
            person("Ana", NA_SENTINEL, &[3, 3]),
            person("Boris", NA_SENTINEL, &[0, 0]),
            person("Cvita", NA_SENTINEL, &[1, 5]),
        ]);
        let tables = analyze(&roster, &TournamentConfig::default()).unwrap();

        let names: Vec<&str> = tables
            .consistency
            .iter()
            .map(|e| e.full_name.as_str())
            .collect();
        assert_eq!(names, vec!["Ana", "Cvita"]);
        assert_eq!(tables.consistency[0].rank, 1);
        assert_eq!(tables.consistency[0].value, 0.0);
    }

    #[test]
    fn test_analyze_only_valid_birth_dates_reach_age_table() {
        let roster = two_day_roster(vec![
            person("Bob", "01.01.2000", &[2, 0]),
            person("Carl", NA_SENTINEL, &[0, 5]),
            person("Dana", "32.13.2000", &[1, 1]),
        ]);
        let tables = analyze(&roster, &TournamentConfig::default()).unwrap();

        assert_eq!(tables.ages.len(), 1);
        assert_eq!(tables.ages[0].age, 25);
        assert_eq!(tables.ages[0].count, 1);
    }

    #[test]
    fn test_analyze_empty_roster_is_fatal() {
        let roster = two_day_roster(vec![]);
        assert!(matches!(
            analyze(&roster, &TournamentConfig::default()),
            Err(StatsError::EmptyTable)
        ));
    }
}
