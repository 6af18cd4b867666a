use probe_timeline_model::{
    EndpointBehaviour, ProbeConfig, ProbeKind, Scenario, ScenarioBuilder, ScenarioResult,
};

/// `readinessProbe` from the example deployment
pub(crate) const READINESS_PROBE: ProbeConfig = ProbeConfig {
    initial_delay_seconds: 5,
    period_seconds: 2,
    failure_threshold: 5,
    success_threshold: 1,
    termination_grace_period_seconds: None,
};

/// `/ready` answers OK for 10s, then 503 for 3s, then OK again.
pub(crate) fn short_outage() -> ScenarioResult<Scenario> {
    ScenarioBuilder::new("2.1", ProbeKind::Readiness)
        .title("Readiness Probe 2.1: Short failure, pod stays ready")
        .config(READINESS_PROBE)
        .endpoint(
            EndpointBehaviour::healthy_from(0.0)
                .failing_from(10.0)
                .healthy_again_from(13.0),
        )
        .probe_until(18.0)
        .build()
}

/// `/ready` answers OK for 10s, then 503 for 20s, then OK again.
pub(crate) fn long_outage() -> ScenarioResult<Scenario> {
    ScenarioBuilder::new("2.2", ProbeKind::Readiness)
        .title("Readiness Probe 2.2: Long failure stops traffic until the pod recovers")
        .config(READINESS_PROBE)
        .endpoint(
            EndpointBehaviour::healthy_from(0.0)
                .failing_from(10.0)
                .healthy_again_from(30.0),
        )
        .probe_until(41.0)
        .build()
}
