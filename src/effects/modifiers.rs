//! Additive stat deltas.
//!
//! `StatModifiers` is a small map from `StatKind` to a signed delta. Adding
//! the same stat twice sums the deltas. Effects, item profiles and the
//! timeline accumulator all use it.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::creatures::StatKind;

/// Signed per-stat deltas. Most effects touch four stats or fewer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatModifiers(SmallVec<[(StatKind, i32); 4]>);

impl StatModifiers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-stat modifier.
    #[must_use]
    pub fn single(stat: StatKind, delta: i32) -> Self {
        let mut mods = Self::new();
        mods.add(stat, delta);
        mods
    }

    /// Same delta on several stats.
    #[must_use]
    pub fn uniform(stats: &[StatKind], delta: i32) -> Self {
        let mut mods = Self::new();
        for &stat in stats {
            mods.add(stat, delta);
        }
        mods
    }

    /// Add a delta, summing with any existing entry for the stat.
    pub fn add(&mut self, stat: StatKind, delta: i32) {
        if delta == 0 {
            return;
        }
        match self.0.iter_mut().find(|(s, _)| *s == stat) {
            Some((_, existing)) => *existing += delta,
            None => self.0.push((stat, delta)),
        }
    }

    /// Net delta for one stat.
    #[must_use]
    pub fn get(&self, stat: StatKind) -> i32 {
        self.0
            .iter()
            .filter(|(s, _)| *s == stat)
            .map(|(_, d)| *d)
            .sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (StatKind, i32)> + '_ {
        self.0.iter().copied()
    }

    /// Fold another set of deltas into this one.
    pub fn merge(&mut self, other: &StatModifiers) {
        for (stat, delta) in other.iter() {
            self.add(stat, delta);
        }
    }

    /// Every delta multiplied by `factor` and rounded.
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        let mut out = Self::new();
        for (stat, delta) in self.iter() {
            out.add(stat, (f64::from(delta) * factor).round() as i32);
        }
        out
    }

    /// Every delta clamped to `[-limit, limit]`.
    #[must_use]
    pub fn capped(&self, limit: i32) -> Self {
        let mut out = Self::new();
        for (stat, delta) in self.iter() {
            out.add(stat, delta.clamp(-limit, limit));
        }
        out
    }

    /// True if nothing would change.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|(_, d)| *d == 0)
    }

    /// Human-readable summary such as `+3 physical attack, -2 dodge chance`.
    #[must_use]
    pub fn describe(&self) -> String {
        self.iter()
            .filter(|(_, d)| *d != 0)
            .map(|(stat, delta)| format!("{delta:+} {stat}"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromIterator<(StatKind, i32)> for StatModifiers {
    fn from_iter<I: IntoIterator<Item = (StatKind, i32)>>(iter: I) -> Self {
        let mut mods = Self::new();
        for (stat, delta) in iter {
            mods.add(stat, delta);
        }
        mods
    }
}
