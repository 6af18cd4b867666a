//! Backend independent description of a single timeline chart.
//!
//! A [TimelinePlan] holds every tick, marker and label that ends up on the image. Building it is
//! pure, so the layout rules can be checked without touching the file system.

use crate::config::{Palette, Rgb};
use itertools::Itertools;
use probe_timeline_model::{AnnotationKind, Scenario};
use serde::Serialize;

/// Distance between two X axis ticks, in seconds
pub const TICK_STEP_SECONDS: u32 = 5;
pub const X_AXIS_LABEL: &str = "Time (seconds)";
pub const SUCCESS_TICK_LABEL: &str = "True (200)";
pub const FAILURE_TICK_LABEL: &str = "False (503)";

/// Vertical extent of the plot. Leaves room around the two marker rows.
pub const Y_RANGE: (f64, f64) = (-0.2, 1.2);

/// Extra room after the last tick so markers on the edge are not clipped
const X_PADDING_SECONDS: f64 = 1.0;
/// Heights for annotation labels, all between the two marker rows
const LABEL_LEVELS: [f64; 3] = [0.75, 0.5, 0.25];
/// Horizontal gap between a reference line and its label
const LABEL_OFFSET_SECONDS: f64 = 0.4;
/// Labels starting after this share of the axis are drawn to the left of their time
const RIGHT_ANCHOR_FROM: f64 = 0.6;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YTick {
    pub level: f64,
    pub label: String,
}

/// A probe call drawn as a filled circle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub time_seconds: f64,
    pub level: f64,
    pub color: Rgb,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelAnchor {
    /// The label starts at its position and runs to the right
    Left,
    /// The label ends at its position
    Right,
}

/// An annotation label, optionally with a vertical reference line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Callout {
    pub time_seconds: f64,
    pub label: String,
    pub kind: AnnotationKind,
    pub color: Rgb,
    pub reference_line: bool,
    /// Where the label text is placed, in chart coordinates
    pub label_position: (f64, f64),
    pub anchor: LabelAnchor,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelinePlan {
    pub scenario_id: String,
    pub title: String,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    pub x_ticks: Vec<u32>,
    pub y_ticks: Vec<YTick>,
    pub markers: Vec<Marker>,
    pub callouts: Vec<Callout>,
}

impl TimelinePlan {
    pub fn from_scenario(scenario: &Scenario, palette: &Palette) -> Self {
        let axis_max = rounded_axis_max(scenario.max_time());
        let x_range = (0.0, f64::from(axis_max) + X_PADDING_SECONDS);

        let markers = scenario
            .probe_schedule()
            .iter()
            .map(|sample| Marker {
                time_seconds: sample.time_seconds(),
                level: sample.level(),
                color: palette.for_outcome(sample.outcome()),
            })
            .collect();

        let callouts = scenario
            .annotations()
            .iter()
            .sorted_by(|a, b| a.time_seconds.total_cmp(&b.time_seconds))
            .enumerate()
            .map(|(index, annotation)| {
                let level = LABEL_LEVELS[index % LABEL_LEVELS.len()];
                let anchor = if annotation.time_seconds > f64::from(axis_max) * RIGHT_ANCHOR_FROM
                {
                    LabelAnchor::Right
                } else {
                    LabelAnchor::Left
                };
                let label_x = match anchor {
                    LabelAnchor::Left => annotation.time_seconds + LABEL_OFFSET_SECONDS,
                    LabelAnchor::Right => annotation.time_seconds - LABEL_OFFSET_SECONDS,
                };

                Callout {
                    time_seconds: annotation.time_seconds,
                    label: annotation.label.clone(),
                    kind: annotation.kind,
                    color: palette.for_annotation(annotation.kind),
                    reference_line: annotation.kind.draws_marker_line(),
                    label_position: (label_x, level),
                    anchor,
                }
            })
            .collect();

        Self {
            scenario_id: scenario.id().to_string(),
            title: scenario.title().to_string(),
            x_range,
            y_range: Y_RANGE,
            x_ticks: x_axis_ticks(axis_max),
            y_ticks: vec![
                YTick {
                    level: 0.0,
                    label: FAILURE_TICK_LABEL.to_string(),
                },
                YTick {
                    level: 1.0,
                    label: SUCCESS_TICK_LABEL.to_string(),
                },
            ],
            markers,
            callouts,
        }
    }

    /// The label for a Y tick, if `level` is one of the two tick values
    pub fn y_tick_label(&self, level: f64) -> Option<&str> {
        self.y_ticks
            .iter()
            .find(|tick| (tick.level - level).abs() < f64::EPSILON)
            .map(|tick| tick.label.as_str())
    }
}

/// Round the latest time up to the next tick, never below one tick step.
pub fn rounded_axis_max(max_time: f64) -> u32 {
    let max_time = if max_time.is_finite() {
        max_time.max(0.0).ceil() as u32
    } else {
        0
    };
    max_time.div_ceil(TICK_STEP_SECONDS).max(1) * TICK_STEP_SECONDS
}

/// Every multiple of the tick step from zero up to and including `axis_max`
pub fn x_axis_ticks(axis_max: u32) -> Vec<u32> {
    (0..=axis_max)
        .step_by(TICK_STEP_SECONDS as usize)
        .collect()
}
