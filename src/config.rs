use chrono::NaiveDate;

/// Tournament-level constants passed explicitly into both stages.
///
/// The reference date anchors age computation so that reruns of the same
/// input always produce the same ages.
#[derive(Debug, Clone)]
pub struct TournamentConfig {
    pub tournament_name: String,
    pub year: i32,
    pub reference_date: NaiveDate,
}

impl TournamentConfig {
    pub fn new(tournament_name: impl Into<String>, year: i32, reference_date: NaiveDate) -> Self {
        TournamentConfig {
            tournament_name: tournament_name.into(),
            year,
            reference_date,
        }
    }

    /// Title line used on report sheets, e.g. "Kordun Jesen 2025".
    pub fn title(&self) -> String {
        format!("{} {}", self.tournament_name, self.year)
    }
}

impl Default for TournamentConfig {
    fn default() -> Self {
        TournamentConfig {
            tournament_name: "Kordun Jesen".to_string(),
            year: 2025,
            // Last tournament day of the autumn season.
            reference_date: NaiveDate::from_ymd_opt(2025, 9, 20).unwrap(),
        }
    }
}
