use crate::cli::ProbeDiagramsCli;
use crate::{listing, scenario, RenderConfig, RenderReport, TimelineRenderer};
use anyhow::bail;
use log::{debug, error};

/// Render the selected scenarios, or print them when `--list` is given.
///
/// Every scenario is attempted. Any failure makes the whole run fail once the rest are done.
pub fn run(cli: &ProbeDiagramsCli) -> anyhow::Result<()> {
    debug!("Running with {cli:?}");

    let scenarios = scenario::select(&cli.scenario)?;

    if cli.list {
        println!("{}", listing::scenario_table(&scenarios));
        return Ok(());
    }

    let config = RenderConfig {
        width: cli.width,
        height: cli.height,
        ..RenderConfig::default().with_output_dir(&cli.output_dir)
    };
    let renderer = TimelineRenderer::new(config)?;

    let total = scenarios.len();
    let mut rendered = vec![];
    let mut errors = vec![];

    for (scenario, result) in scenarios.iter().zip(renderer.render_all(&scenarios)) {
        match result {
            Ok(timeline) => rendered.push(timeline),
            Err(e) => {
                error!("Failed to render scenario {}: {e}", scenario.id());
                errors.push(format!("{}: {e}", scenario.id()));
            }
        }
    }

    if let Some(report_path) = &cli.report {
        RenderReport::new(&cli.output_dir, rendered, errors.clone()).write(report_path)?;
    }

    if !errors.is_empty() {
        bail!(
            "{} out of {} diagrams failed:\n{:#?}",
            errors.len(),
            total,
            errors
        );
    }

    println!(
        "All diagrams have been saved in the '{}' folder.",
        cli.output_dir.display()
    );

    Ok(())
}
