//! Ranking table ordering

use std::cmp::Ordering;
use serde::{Deserialize, Serialize};
use crate::outcome::PlayerAggregate;

/// Ranking table column to sort by, always descending
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortKey {
    Gets,
    Gives,
    Ratio,
    Wins,
}

/// Player indices in ranking order
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Standings {
    pub key: SortKey,
    pub order: Vec<usize>,
}

impl Standings {
    /// Stable: players that compare equal keep their input order. An
    /// undefined ratio ranks below every defined one.
    pub fn rank_by(aggregates: &[PlayerAggregate], key: SortKey) -> Self {
        let mut order: Vec<usize> = (0..aggregates.len()).collect();
        order.sort_by(|&a, &b| compare(&aggregates[b], &aggregates[a], key));
        Self { key, order }
    }

    /// (1-based rank, player index)
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.order.iter().enumerate().map(|(rank, &index)| (rank + 1, index))
    }
}

fn compare(a: &PlayerAggregate, b: &PlayerAggregate, key: SortKey) -> Ordering {
    match key {
        SortKey::Gets => a.gets.total_cmp(&b.gets),
        SortKey::Gives => a.gives.total_cmp(&b.gives),
        SortKey::Wins => a.wins.cmp(&b.wins),
        SortKey::Ratio => match (a.ratio, b.ratio) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            (Some(_), None) => Ordering::Greater,
            (None, Some(_)) => Ordering::Less,
            (None, None) => Ordering::Equal,
        },
    }
}
