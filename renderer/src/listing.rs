use itertools::Itertools;
use probe_timeline_model::Scenario;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct ScenarioRow {
    #[tabled(rename = "Id")]
    id: String,
    #[tabled(rename = "Probe")]
    probe: String,
    #[tabled(rename = "Probes")]
    probes: usize,
    #[tabled(rename = "Annotations")]
    annotations: String,
    #[tabled(rename = "File")]
    file: String,
}

/// A table of the scenarios and where Kubernetes acts in each of them.
pub fn scenario_table(scenarios: &[Scenario]) -> String {
    let rows = scenarios.iter().map(|scenario| ScenarioRow {
        id: scenario.id().to_string(),
        probe: scenario.kind().to_string(),
        probes: scenario.probe_schedule().len(),
        annotations: scenario
            .annotations()
            .iter()
            .map(|a| format!("{}s {}", a.time_seconds, a.label))
            .join("\n"),
        file: scenario.output_filename().to_string(),
    });

    let mut table = Table::new(rows);
    table.with(Style::modern());
    table.to_string()
}
