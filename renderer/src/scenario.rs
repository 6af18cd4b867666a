use anyhow::Context;
use probe_timeline_model::{Scenario, ScenarioResult};

mod liveness;
mod readiness;
mod startup;

type ScenarioFn = fn() -> ScenarioResult<Scenario>;

const CATALOGUE: [(&str, ScenarioFn); 7] = [
    ("1.1", startup::app_starts_in_3s),
    ("1.2", startup::app_starts_in_8s),
    ("1.3", startup::app_starts_in_90s),
    ("2.1", readiness::short_outage),
    ("2.2", readiness::long_outage),
    ("3.1", liveness::brief_failure),
    ("3.2", liveness::persistent_failure),
];

/// Ids of every known scenario, in rendering order
pub fn scenario_ids() -> impl Iterator<Item = &'static str> {
    CATALOGUE.iter().map(|(id, _)| *id)
}

/// Build and validate every use case.
pub fn catalogue() -> anyhow::Result<Vec<Scenario>> {
    CATALOGUE
        .iter()
        .map(|(id, build)| build().with_context(|| format!("Scenario {id}")))
        .collect()
}

/// Build the scenarios with the given ids, in catalogue order. An empty selection means all.
pub fn select(ids: &[String]) -> anyhow::Result<Vec<Scenario>> {
    if let Some(unknown) = ids
        .iter()
        .find(|id| !scenario_ids().any(|known| known == id.as_str()))
    {
        anyhow::bail!(
            "Unknown scenario '{unknown}', expected one of: {}",
            scenario_ids().collect::<Vec<_>>().join(", ")
        );
    }

    Ok(catalogue()?
        .into_iter()
        .filter(|scenario| ids.is_empty() || ids.iter().any(|id| id == scenario.id()))
        .collect())
}
