use probe_timeline_model::{
    EndpointBehaviour, ProbeConfig, ProbeKind, Scenario, ScenarioBuilder, ScenarioResult,
};

/// `startupProbe` from the example deployment
pub(crate) const STARTUP_PROBE: ProbeConfig = ProbeConfig {
    initial_delay_seconds: 5,
    period_seconds: 2,
    failure_threshold: 30,
    success_threshold: 1,
    termination_grace_period_seconds: None,
};

/// The app is up before the first probe fires.
pub(crate) fn app_starts_in_3s() -> ScenarioResult<Scenario> {
    ScenarioBuilder::new("1.1", ProbeKind::Startup)
        .title("Startup Probe 1.1: App starts in 3s, pod is live at the first probe")
        .config(STARTUP_PROBE)
        .endpoint(EndpointBehaviour::healthy_from(3.0))
        .probe_until(15.0)
        .build()
}

/// The first probes fail until the app comes up.
pub(crate) fn app_starts_in_8s() -> ScenarioResult<Scenario> {
    ScenarioBuilder::new("1.2", ProbeKind::Startup)
        .title("Startup Probe 1.2: App starts in 8s, pod is live once the probe succeeds")
        .config(STARTUP_PROBE)
        .endpoint(EndpointBehaviour::healthy_from(8.0))
        .probe_until(15.0)
        .build()
}

/// The app needs longer than `failureThreshold * periodSeconds` to come up.
pub(crate) fn app_starts_in_90s() -> ScenarioResult<Scenario> {
    let until = STARTUP_PROBE.initial_delay_seconds
        + STARTUP_PROBE.failure_threshold * STARTUP_PROBE.period_seconds;

    ScenarioBuilder::new("1.3", ProbeKind::Startup)
        .title("Startup Probe 1.3: App starts in 90s, pod is killed after the failure threshold")
        .config(STARTUP_PROBE)
        .endpoint(EndpointBehaviour::healthy_from(90.0))
        .probe_until(f64::from(until))
        .build()
}
