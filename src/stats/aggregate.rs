//! Section, age, daily, and overview aggregation over a cleaned roster.

use super::metrics::age_on;
use super::ranking::{dense_ranks, RankDirection};
use crate::roster::Roster;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// One section's aggregate, ranked by per-member average.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionEntry {
    #[serde(rename = "Mjesto")]
    pub rank: u32,
    #[serde(rename = "Sekcija")]
    pub section: String,
    #[serde(rename = "BrojOsoba")]
    pub member_count: usize,
    #[serde(rename = "UkupnoPiva")]
    pub total: u32,
    #[serde(rename = "PivaPoOsobi")]
    pub average: f64,
}

/// Aggregate consumption per section.
///
/// Compound labels ("Veterani - Seniori") are split into one membership per
/// listed section: the person is counted once in each, with the full total
/// credited to each, never halved.
pub fn section_table(roster: &Roster) -> Vec<SectionEntry> {
    let mut groups: BTreeMap<String, (usize, u32)> = BTreeMap::new();
    for person in &roster.participants {
        let total = person.total();
        for section in person.sections() {
            let group = groups.entry(section.to_string()).or_default();
            group.0 += 1;
            group.1 += total;
        }
    }

    let mut entries: Vec<SectionEntry> = groups
        .into_iter()
        .map(|(section, (member_count, total))| SectionEntry {
            rank: 0,
            section,
            member_count,
            total,
            average: total as f64 / member_count as f64,
        })
        .collect();

    let averages: Vec<f64> = entries.iter().map(|entry| entry.average).collect();
    for (entry, rank) in entries
        .iter_mut()
        .zip(dense_ranks(&averages, RankDirection::Descending))
    {
        entry.rank = rank;
    }
    entries.sort_by(|a, b| a.rank.cmp(&b.rank).then_with(|| a.section.cmp(&b.section)));
    entries
}

/// Average total consumption for one integer age.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgeBucket {
    #[serde(rename = "Godine")]
    pub age: i32,
    /// `None` for ages inside the observed range with no participants, so
    /// the rendered line graph can show the gap instead of papering over it.
    #[serde(rename = "ProsjekPiva")]
    pub average: Option<f64>,
    #[serde(rename = "BrojSudionika")]
    pub count: usize,
}

/// Bucket participants by age and cover the full contiguous range from the
/// youngest to the oldest observed age. People without a derivable age are
/// left out entirely.
pub fn age_table(roster: &Roster, reference: NaiveDate) -> Vec<AgeBucket> {
    let mut groups: BTreeMap<i32, (usize, u32)> = BTreeMap::new();
    for person in &roster.participants {
        if let Some(age) = age_on(&person.birth_date, reference) {
            let group = groups.entry(age).or_default();
            group.0 += 1;
            group.1 += person.total();
        }
    }

    let (min_age, max_age) = match (groups.keys().next(), groups.keys().next_back()) {
        (Some(&min), Some(&max)) => (min, max),
        _ => return Vec::new(),
    };

    (min_age..=max_age)
        .map(|age| match groups.get(&age) {
            Some(&(count, total)) => AgeBucket {
                age,
                average: Some(total as f64 / count as f64),
                count,
            },
            None => AgeBucket {
                age,
                average: None,
                count: 0,
            },
        })
        .collect()
}

/// Totals and participation for one tournament day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyEntry {
    #[serde(rename = "Dan")]
    pub day: String,
    #[serde(rename = "UkupnoPiva")]
    pub total: u64,
    #[serde(rename = "AktivniSudionici")]
    pub active_count: usize,
    #[serde(rename = "PostotakAktivnih")]
    pub active_pct: f64,
}

/// Per-day totals and active-participant share. Active means at least one
/// beverage that day.
pub fn daily_table(roster: &Roster) -> Vec<DailyEntry> {
    let people = roster.len();
    roster
        .day_labels
        .iter()
        .enumerate()
        .map(|(idx, label)| {
            let total: u64 = roster
                .participants
                .iter()
                .map(|p| u64::from(p.daily_counts[idx]))
                .sum();
            let active_count = roster
                .participants
                .iter()
                .filter(|p| p.daily_counts[idx] > 0)
                .count();
            DailyEntry {
                day: label.clone(),
                total,
                active_count,
                active_pct: 100.0 * active_count as f64 / people as f64,
            }
        })
        .collect()
}

/// Whole-tournament scalar statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    pub participant_count: usize,
    pub day_count: usize,
    pub total_consumed: u64,
    pub avg_per_person_day: f64,
    pub drank_every_day: usize,
    pub drank_every_day_pct: f64,
    pub never_drank: usize,
    pub never_drank_pct: f64,
    pub active_participants: usize,
    pub active_participants_pct: f64,
    pub max_single_day: u32,
    pub max_total: u32,
    pub mean_total: f64,
    pub median_total: f64,
}

pub fn overview(roster: &Roster) -> Overview {
    let people = roster.len();
    let totals: Vec<u32> = roster.participants.iter().map(|p| p.total()).collect();

    let total_consumed: u64 = totals.iter().map(|&t| u64::from(t)).sum();
    let person_days = (people * roster.day_count()) as f64;

    let drank_every_day = roster
        .participants
        .iter()
        .filter(|p| p.daily_counts.iter().all(|&c| c > 0))
        .count();
    let never_drank = totals.iter().filter(|&&t| t == 0).count();
    let active_participants = people - never_drank;

    let max_single_day = roster
        .participants
        .iter()
        .map(|p| p.max_day())
        .max()
        .unwrap_or(0);

    let pct = |count: usize| 100.0 * count as f64 / people as f64;

    Overview {
        participant_count: people,
        day_count: roster.day_count(),
        total_consumed,
        avg_per_person_day: total_consumed as f64 / person_days,
        drank_every_day,
        drank_every_day_pct: pct(drank_every_day),
        never_drank,
        never_drank_pct: pct(never_drank),
        active_participants,
        active_participants_pct: pct(active_participants),
        max_single_day,
        max_total: totals.iter().copied().max().unwrap_or(0),
        mean_total: total_consumed as f64 / people as f64,
        median_total: median(&totals),
    }
}

fn median(values: &[u32]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid] as f64
    } else {
        (sorted[mid - 1] as f64 + sorted[mid] as f64) / 2.0
    }
}
