use probe_timeline_model::{AnnotationKind, Scenario};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default directory the diagrams are written to
pub const DEFAULT_OUTPUT_DIR: &str = "diagrams";
/// Default image width in pixels, a 10 inch figure at 100 dpi
pub const DEFAULT_WIDTH: u32 = 1000;
/// Default image height in pixels, a 4 inch figure at 100 dpi
pub const DEFAULT_HEIGHT: u32 = 400;

/// An RGB colour, independent of the drawing backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const GREEN: Rgb = Rgb(0, 128, 0);
    pub const RED: Rgb = Rgb(255, 0, 0);
    pub const BLUE: Rgb = Rgb(0, 0, 255);
    pub const PURPLE: Rgb = Rgb(128, 0, 128);
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const GREY: Rgb = Rgb(200, 200, 200);
}

impl From<Rgb> for plotters::style::RGBColor {
    fn from(value: Rgb) -> Self {
        plotters::style::RGBColor(value.0, value.1, value.2)
    }
}

/// Colours used on every diagram
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    /// Marker fill for a passing probe
    pub success: Rgb,
    /// Marker fill for a failing probe
    pub failure: Rgb,
    pub transition: Rgb,
    pub kill_decision: Rgb,
    pub grace_period_end: Rgb,
    pub observation: Rgb,
    /// Grid lines
    pub grid: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            success: Rgb::GREEN,
            failure: Rgb::RED,
            transition: Rgb::BLUE,
            kill_decision: Rgb::RED,
            grace_period_end: Rgb::BLACK,
            observation: Rgb::PURPLE,
            grid: Rgb::GREY,
        }
    }
}

impl Palette {
    pub fn for_outcome(&self, outcome: bool) -> Rgb {
        if outcome {
            self.success
        } else {
            self.failure
        }
    }

    pub fn for_annotation(&self, kind: AnnotationKind) -> Rgb {
        match kind {
            AnnotationKind::LifecycleTransition => self.transition,
            AnnotationKind::KillDecision => self.kill_decision,
            AnnotationKind::GracePeriodEnd => self.grace_period_end,
            AnnotationKind::Observation => self.observation,
        }
    }
}

/// Everything the renderer needs besides the scenario itself.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Directory the images are written to, created on demand
    pub output_dir: PathBuf,
    pub palette: Palette,
    pub width: u32,
    pub height: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            palette: Palette::default(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl RenderConfig {
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    /// Where the diagram for `scenario` is written
    pub fn output_path(&self, scenario: &Scenario) -> PathBuf {
        self.output_dir.join(scenario.output_filename())
    }
}
