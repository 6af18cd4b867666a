use probe_timeline_model::{
    EndpointBehaviour, ProbeConfig, ProbeKind, Scenario, ScenarioBuilder, ScenarioResult,
};

/// `livenessProbe` from the example deployment, with the pod's `terminationGracePeriodSeconds`
pub(crate) const LIVENESS_PROBE: ProbeConfig = ProbeConfig {
    initial_delay_seconds: 10,
    period_seconds: 2,
    failure_threshold: 5,
    success_threshold: 1,
    termination_grace_period_seconds: Some(60),
};

/// `/live` answers OK for 20s, then 503 for 5s, then OK again.
pub(crate) fn brief_failure() -> ScenarioResult<Scenario> {
    ScenarioBuilder::new("3.1", ProbeKind::Liveness)
        .title("Liveness Probe 3.1: Brief failure, pod stays live")
        .config(LIVENESS_PROBE)
        .endpoint(
            EndpointBehaviour::healthy_from(0.0)
                .failing_from(20.0)
                .healthy_again_from(25.0),
        )
        .probe_until(31.0)
        .build()
}

/// `/live` answers OK for 20s, then 503 for good.
pub(crate) fn persistent_failure() -> ScenarioResult<Scenario> {
    ScenarioBuilder::new("3.2", ProbeKind::Liveness)
        .title("Liveness Probe 3.2: Persistent failure, pod is killed after the grace period")
        .config(LIVENESS_PROBE)
        .endpoint(EndpointBehaviour::healthy_from(0.0).failing_from(20.0))
        .probe_until(36.0)
        .build()
}
