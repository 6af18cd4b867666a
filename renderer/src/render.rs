use crate::axis::TickAxis;
use crate::config::{Palette, RenderConfig};
use crate::plan::{LabelAnchor, TimelinePlan, X_AXIS_LABEL};
use log::{debug, info, warn};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::register_font;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use probe_timeline_model::Scenario;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Font family every piece of text on a chart is drawn with
pub const FONT_FAMILY: &str = "sans-serif";

static FONT_DATA: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");

const MARKER_RADIUS: u32 = 7;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to draw {path}: {message}")]
    Draw { path: PathBuf, message: String },
    #[error("Failed to load the embedded chart font")]
    Font,
}

/// A diagram that was written to disk, with the plan it was drawn from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedTimeline {
    pub scenario_id: String,
    pub output_path: PathBuf,
    pub plan: TimelinePlan,
}

/// Draws scenarios to PNG files under the configured output directory.
pub struct TimelineRenderer {
    config: RenderConfig,
}

impl TimelineRenderer {
    /// Create a renderer. Registers the embedded font with plotters, which is safe to repeat.
    pub fn new(config: RenderConfig) -> Result<Self, RenderError> {
        register_font(FONT_FAMILY, FontStyle::Normal, FONT_DATA).map_err(|_| RenderError::Font)?;

        Ok(Self { config })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn plan(&self, scenario: &Scenario) -> TimelinePlan {
        TimelinePlan::from_scenario(scenario, &self.config.palette)
    }

    /// Create the output directory if it does not exist yet.
    pub fn ensure_output_dir(&self) -> Result<(), RenderError> {
        std::fs::create_dir_all(&self.config.output_dir).map_err(|source| {
            RenderError::CreateDir {
                path: self.config.output_dir.clone(),
                source,
            }
        })
    }

    /// Render one scenario to `<output_dir>/<output_filename>`, overwriting any existing file.
    pub fn render(&self, scenario: &Scenario) -> Result<RenderedTimeline, RenderError> {
        self.ensure_output_dir()?;

        for annotation in scenario.annotations_outside_schedule() {
            warn!(
                "Annotation '{}' at {}s in scenario {} is outside the probe schedule",
                annotation.label,
                annotation.time_seconds,
                scenario.id()
            );
        }

        let plan = self.plan(scenario);
        debug!("Plan for scenario {}: {plan:?}", scenario.id());

        let output_path = self.config.output_path(scenario);
        self.draw_png(&plan, &output_path)?;
        info!(
            "Wrote scenario {} to {}",
            scenario.id(),
            output_path.display()
        );

        Ok(RenderedTimeline {
            scenario_id: scenario.id().to_string(),
            output_path,
            plan,
        })
    }

    /// Render scenarios one after the other. A failure does not stop the remaining scenarios.
    pub fn render_all(&self, scenarios: &[Scenario]) -> Vec<Result<RenderedTimeline, RenderError>> {
        scenarios
            .iter()
            .map(|scenario| self.render(scenario))
            .collect()
    }

    fn draw_png(&self, plan: &TimelinePlan, path: &Path) -> Result<(), RenderError> {
        let draw_error = |e: DrawingAreaErrorKind<_>| RenderError::Draw {
            path: path.to_path_buf(),
            message: e.to_string(),
        };

        let root =
            BitMapBackend::new(path, (self.config.width, self.config.height)).into_drawing_area();
        draw_timeline(plan, &root, &self.config.palette).map_err(draw_error)?;
        root.present().map_err(draw_error)?;

        Ok(())
    }
}

/// The X and Y axes of a plan, ticked exactly at `plan.x_ticks` and the `plan.y_ticks` levels
pub fn timeline_axes(plan: &TimelinePlan) -> (TickAxis, TickAxis) {
    (
        TickAxis::new(plan.x_range, plan.x_ticks.iter().map(|t| f64::from(*t))),
        TickAxis::new(plan.y_range, plan.y_ticks.iter().map(|t| t.level)),
    )
}

/// Draw a plan onto any plotters drawing area.
pub fn draw_timeline<DB: DrawingBackend>(
    plan: &TimelinePlan,
    root: &DrawingArea<DB, Shift>,
    palette: &Palette,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    root.fill(&WHITE)?;

    let (x_axis, y_axis) = timeline_axes(plan);

    let mut chart = ChartBuilder::on(root)
        .caption(&plan.title, (FONT_FAMILY, 20))
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(100)
        .build_cartesian_2d(x_axis, y_axis)?;

    let x_label = |t: &f64| format!("{t:.0}");
    let y_label = |level: &f64| plan.y_tick_label(*level).unwrap_or_default().to_string();
    let grid = RGBColor::from(palette.grid);

    chart
        .configure_mesh()
        .x_desc(X_AXIS_LABEL)
        .x_label_formatter(&x_label)
        .y_label_formatter(&y_label)
        .label_style((FONT_FAMILY, 13))
        .axis_desc_style((FONT_FAMILY, 14))
        .bold_line_style(grid.mix(0.5))
        .light_line_style(TRANSPARENT)
        .draw()?;

    for callout in plan.callouts.iter().filter(|c| c.reference_line) {
        let color = RGBColor::from(callout.color);
        chart.draw_series(std::iter::once(PathElement::new(
            vec![
                (callout.time_seconds, plan.y_range.0),
                (callout.time_seconds, plan.y_range.1),
            ],
            color.stroke_width(1),
        )))?;
    }

    chart.draw_series(plan.markers.iter().map(|marker| {
        Circle::new(
            (marker.time_seconds, marker.level),
            MARKER_RADIUS,
            RGBColor::from(marker.color).filled(),
        )
    }))?;

    for callout in &plan.callouts {
        let color = RGBColor::from(callout.color);
        let h_pos = match callout.anchor {
            LabelAnchor::Left => HPos::Left,
            LabelAnchor::Right => HPos::Right,
        };
        let style = TextStyle::from((FONT_FAMILY, 14).into_font())
            .color(&color)
            .pos(Pos::new(h_pos, VPos::Center));

        chart.draw_series(std::iter::once(Text::new(
            callout.label.clone(),
            callout.label_position,
            style,
        )))?;
    }

    Ok(())
}
