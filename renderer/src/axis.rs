//! Continuous chart axes that only tick at a fixed set of values.

use plotters::coord::ranged1d::{DefaultFormatting, KeyPointHint, Ranged};
use plotters::coord::types::RangedCoordf64;
use std::ops::Range;

/// An `f64` axis whose key points are exactly the given ticks
pub struct TickAxis {
    range: RangedCoordf64,
    ticks: Vec<f64>,
}

impl TickAxis {
    /// Ticks outside `start..=end` are dropped.
    pub fn new((start, end): (f64, f64), ticks: impl IntoIterator<Item = f64>) -> Self {
        Self {
            range: (start..end).into(),
            ticks: ticks
                .into_iter()
                .filter(|tick| (start..=end).contains(tick))
                .collect(),
        }
    }

    pub fn ticks(&self) -> &[f64] {
        &self.ticks
    }
}

impl Ranged for TickAxis {
    type FormatOption = DefaultFormatting;
    type ValueType = f64;

    fn map(&self, value: &f64, limit: (i32, i32)) -> i32 {
        self.range.map(value, limit)
    }

    fn key_points<Hint: KeyPointHint>(&self, hint: Hint) -> Vec<f64> {
        if hint.max_num_points() == 0 {
            return vec![];
        }
        self.ticks.clone()
    }

    fn range(&self) -> Range<f64> {
        self.range.range()
    }
}
