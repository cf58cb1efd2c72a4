//! Cross-sectional top-K selection.

use std::cmp::Ordering;

/// Instruments retained by the cross-sectional ranking.
///
/// Built once per day from a single stable ascending sort of `|score|`;
/// the last `k` entries of that order are selected. Ties therefore keep
/// ascending index order, and among tied scores at the cut-off the higher
/// indices are the ones retained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    members: Vec<bool>,
    ranked: Vec<usize>,
}

impl Selection {
    /// Selects the `k` instruments with the largest absolute score.
    #[must_use]
    pub fn top_k(scores: &[f64], k: usize) -> Self {
        let mut order: Vec<usize> = (0..scores.len()).collect();
        order.sort_by(|&a, &b| compare_abs(scores[a], scores[b]));

        let mut members = vec![false; scores.len()];
        let ranked: Vec<usize> = order.iter().rev().take(k).copied().collect();
        for &idx in &ranked {
            members[idx] = true;
        }

        Self { members, ranked }
    }

    /// Selection containing every instrument.
    #[must_use]
    pub fn all(n_instruments: usize) -> Self {
        Self {
            members: vec![true; n_instruments],
            ranked: (0..n_instruments).collect(),
        }
    }

    /// Returns true when the instrument is selected.
    #[must_use]
    pub fn contains(&self, instrument: usize) -> bool {
        self.members.get(instrument).copied().unwrap_or(false)
    }

    /// Selected instruments, strongest score first.
    #[must_use]
    pub fn ranked(&self) -> &[usize] {
        &self.ranked
    }

    /// Selected instruments in ascending index order.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.members
            .iter()
            .enumerate()
            .filter_map(|(idx, &selected)| selected.then_some(idx))
    }

    /// Number of selected instruments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ranked.len()
    }

    /// Returns true when nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }
}

fn compare_abs(a: f64, b: f64) -> Ordering {
    a.abs().total_cmp(&b.abs())
}
