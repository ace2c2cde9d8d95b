//! Dense ("min") ranking and tie-aware top-N selection.
//!
//! Pure functions over value sequences so the ranking rules can be tested
//! without building a roster.

use serde::Serialize;

/// Which end of the scale is rank 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankDirection {
    /// Highest value ranks first (totals, single-day maximum).
    Descending,
    /// Lowest value ranks first (coefficient of variation).
    Ascending,
}

/// Assign min-ranks: tied values share a rank, the next distinct value gets
/// `1 + count of strictly better values`. Output is index-aligned with the
/// input.
pub fn dense_ranks<V: PartialOrd>(values: &[V], direction: RankDirection) -> Vec<u32> {
    values
        .iter()
        .map(|value| {
            let better = values
                .iter()
                .filter(|other| match direction {
                    RankDirection::Descending => **other > *value,
                    RankDirection::Ascending => **other < *value,
                })
                .count();
            better as u32 + 1
        })
        .collect()
}

/// One row of a ranked per-person table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry<V> {
    #[serde(rename = "Mjesto")]
    pub rank: u32,
    #[serde(rename = "ImePrezime")]
    pub full_name: String,
    #[serde(rename = "Vrijednost")]
    pub value: V,
}

/// Rank `(name, value)` pairs and return them sorted by `(rank, name)`.
pub fn rank_entries<V: PartialOrd + Copy>(
    entries: Vec<(String, V)>,
    direction: RankDirection,
) -> Vec<RankedEntry<V>> {
    let values: Vec<V> = entries.iter().map(|(_, value)| *value).collect();
    let ranks = dense_ranks(&values, direction);

    let mut ranked: Vec<RankedEntry<V>> = entries
        .into_iter()
        .zip(ranks)
        .map(|((full_name, value), rank)| RankedEntry {
            rank,
            full_name,
            value,
        })
        .collect();
    ranked.sort_by(|a, b| a.rank.cmp(&b.rank).then_with(|| a.full_name.cmp(&b.full_name)));
    ranked
}

/// Take the first `limit` rows of a `(rank, name)`-sorted table, extended to
/// every row that ties the rank found at position `limit`. A tie straddling
/// the cut is never truncated. Tables with at most `limit` rows come back
/// whole, as does everything when `limit` is zero (no limit).
pub fn top_with_ties<V: Clone>(entries: &[RankedEntry<V>], limit: usize) -> Vec<RankedEntry<V>> {
    if limit == 0 || entries.len() <= limit {
        return entries.to_vec();
    }
    let boundary = entries[limit - 1].rank;
    entries
        .iter()
        .filter(|entry| entry.rank <= boundary)
        .cloned()
        .collect()
}
