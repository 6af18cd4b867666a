pub mod axis;
pub mod cli;
pub mod config;
pub mod listing;
pub mod plan;
pub mod render;
pub mod report;
pub mod run;
pub mod scenario;

pub use config::{Palette, RenderConfig, Rgb};
pub use plan::TimelinePlan;
pub use render::{RenderError, RenderedTimeline, TimelineRenderer};
pub use report::RenderReport;
