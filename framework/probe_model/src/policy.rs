//! Where Kubernetes acts on a probe schedule.
//!
//! The kubelet only reacts to runs of consecutive results. A run of `successThreshold` passing
//! probes makes a probe pass and a run of `failureThreshold` failing probes makes it fail. The
//! functions here replay a schedule with those counters and place the annotations at the probe
//! call that completes a run.

use crate::{AnnotationEvent, AnnotationKind, ProbeConfig, ProbeKind, ProbeSample};

pub const LABEL_LIVE: &str = "k8s considers pod live";
pub const LABEL_KILL_DECISION: &str = "k8s decides to kill the pod";
pub const LABEL_KILLED: &str = "k8s kills the pod";
pub const LABEL_NO_TRAFFIC: &str = "k8s do not send traffic";
pub const LABEL_SENDS_TRAFFIC: &str = "k8s sends traffic";
pub const LABEL_ALWAYS_READY: &str = "k8s considers pod always ready";
pub const LABEL_ALWAYS_LIVE: &str = "k8s considers pod always live";

#[derive(Debug, Default)]
struct ConsecutiveCounter {
    successes: u32,
    failures: u32,
}

impl ConsecutiveCounter {
    fn observe(&mut self, sample: &ProbeSample) {
        if sample.outcome() {
            self.successes += 1;
            self.failures = 0;
        } else {
            self.failures += 1;
            self.successes = 0;
        }
    }
}

/// Compute the lifecycle annotations for a schedule of the given probe kind.
///
/// The schedule is expected in time order.
pub fn annotate(
    kind: ProbeKind,
    config: &ProbeConfig,
    schedule: &[ProbeSample],
) -> Vec<AnnotationEvent> {
    match kind {
        ProbeKind::Startup => annotate_startup(config, schedule),
        ProbeKind::Readiness => annotate_readiness(config, schedule),
        ProbeKind::Liveness => annotate_liveness(config, schedule),
    }
}

fn kill_events(config: &ProbeConfig, decided_at: f64) -> Vec<AnnotationEvent> {
    let mut events = vec![AnnotationEvent::new(
        decided_at,
        LABEL_KILL_DECISION,
        AnnotationKind::KillDecision,
    )];

    if let Some(grace) = config.termination_grace_period_seconds {
        events.push(AnnotationEvent::new(
            decided_at + f64::from(grace),
            LABEL_KILLED,
            AnnotationKind::GracePeriodEnd,
        ));
    }

    events
}

// The startup probe is switched off after it passes once, so only the first verdict counts.
fn annotate_startup(config: &ProbeConfig, schedule: &[ProbeSample]) -> Vec<AnnotationEvent> {
    let mut counter = ConsecutiveCounter::default();

    for sample in schedule {
        counter.observe(sample);

        if counter.successes >= config.success_threshold {
            return vec![AnnotationEvent::new(
                sample.time_seconds(),
                LABEL_LIVE,
                AnnotationKind::LifecycleTransition,
            )];
        }

        if counter.failures >= config.failure_threshold {
            return kill_events(config, sample.time_seconds());
        }
    }

    Vec::new()
}

fn annotate_readiness(config: &ProbeConfig, schedule: &[ProbeSample]) -> Vec<AnnotationEvent> {
    let mut counter = ConsecutiveCounter::default();
    let mut events = Vec::new();
    let mut ready = false;
    let mut ever_ready = false;
    let mut ever_dropped = false;
    let mut first_failure_while_ready = None;

    for sample in schedule {
        counter.observe(sample);

        if !sample.outcome() && ready && first_failure_while_ready.is_none() {
            first_failure_while_ready = Some(sample.time_seconds());
        }

        if !ready && counter.successes >= config.success_threshold {
            // Becoming ready for the first time is implied by the diagram
            if ever_ready {
                events.push(AnnotationEvent::new(
                    sample.time_seconds(),
                    LABEL_SENDS_TRAFFIC,
                    AnnotationKind::LifecycleTransition,
                ));
            }
            ready = true;
            ever_ready = true;
        } else if ready && counter.failures >= config.failure_threshold {
            events.push(AnnotationEvent::new(
                sample.time_seconds(),
                LABEL_NO_TRAFFIC,
                AnnotationKind::LifecycleTransition,
            ));
            ready = false;
            ever_dropped = true;
        }
    }

    if !ever_dropped {
        if let Some(time) = first_failure_while_ready {
            events.push(AnnotationEvent::new(
                time,
                LABEL_ALWAYS_READY,
                AnnotationKind::Observation,
            ));
        }
    }

    events
}

fn annotate_liveness(config: &ProbeConfig, schedule: &[ProbeSample]) -> Vec<AnnotationEvent> {
    let mut counter = ConsecutiveCounter::default();
    let mut first_failure = None;

    for sample in schedule {
        counter.observe(sample);

        if !sample.outcome() && first_failure.is_none() {
            first_failure = Some(sample.time_seconds());
        }

        if counter.failures >= config.failure_threshold {
            return kill_events(config, sample.time_seconds());
        }
    }

    first_failure
        .map(|time| {
            vec![AnnotationEvent::new(
                time,
                LABEL_ALWAYS_LIVE,
                AnnotationKind::Observation,
            )]
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{probe_schedule, EndpointBehaviour};
    use pretty_assertions::assert_eq;

    const STARTUP: ProbeConfig = ProbeConfig {
        initial_delay_seconds: 5,
        period_seconds: 2,
        failure_threshold: 30,
        success_threshold: 1,
        termination_grace_period_seconds: None,
    };

    const READINESS: ProbeConfig = ProbeConfig {
        initial_delay_seconds: 5,
        period_seconds: 2,
        failure_threshold: 5,
        success_threshold: 1,
        termination_grace_period_seconds: None,
    };

    const LIVENESS: ProbeConfig = ProbeConfig {
        initial_delay_seconds: 10,
        period_seconds: 2,
        failure_threshold: 5,
        success_threshold: 1,
        termination_grace_period_seconds: Some(60),
    };

    fn events(
        kind: ProbeKind,
        config: &ProbeConfig,
        endpoint: EndpointBehaviour,
        until: f64,
    ) -> Vec<(f64, &'static str, AnnotationKind)> {
        annotate(kind, config, &probe_schedule(config, &endpoint, until))
            .into_iter()
            .map(|e| {
                let label = [
                    LABEL_LIVE,
                    LABEL_KILL_DECISION,
                    LABEL_KILLED,
                    LABEL_NO_TRAFFIC,
                    LABEL_SENDS_TRAFFIC,
                    LABEL_ALWAYS_READY,
                    LABEL_ALWAYS_LIVE,
                ]
                .into_iter()
                .find(|l| *l == e.label)
                .expect("Unexpected label");
                (e.time_seconds, label, e.kind)
            })
            .collect()
    }

    #[test]
    fn startup_app_up_before_first_probe_is_live_at_first_probe() {
        assert_eq!(
            events(
                ProbeKind::Startup,
                &STARTUP,
                EndpointBehaviour::healthy_from(3.0),
                15.0
            ),
            vec![(5.0, LABEL_LIVE, AnnotationKind::LifecycleTransition)]
        );
    }

    #[test]
    fn startup_slow_app_is_live_at_first_success() {
        assert_eq!(
            events(
                ProbeKind::Startup,
                &STARTUP,
                EndpointBehaviour::healthy_from(8.0),
                15.0
            ),
            vec![(9.0, LABEL_LIVE, AnnotationKind::LifecycleTransition)]
        );
    }

    #[test]
    fn startup_needs_consecutive_successes_when_threshold_is_higher() {
        let config = ProbeConfig {
            success_threshold: 3,
            ..STARTUP
        };
        assert_eq!(
            events(
                ProbeKind::Startup,
                &config,
                EndpointBehaviour::healthy_from(8.0),
                20.0
            ),
            vec![(13.0, LABEL_LIVE, AnnotationKind::LifecycleTransition)]
        );
    }

    #[test]
    fn startup_never_up_is_killed_after_failure_threshold() {
        assert_eq!(
            events(
                ProbeKind::Startup,
                &STARTUP,
                EndpointBehaviour::healthy_from(90.0),
                65.0
            ),
            vec![(63.0, LABEL_KILL_DECISION, AnnotationKind::KillDecision)]
        );
    }

    #[test]
    fn startup_kill_includes_grace_period_when_configured() {
        let config = ProbeConfig {
            termination_grace_period_seconds: Some(30),
            ..STARTUP
        };
        assert_eq!(
            events(
                ProbeKind::Startup,
                &config,
                EndpointBehaviour::unavailable(),
                65.0
            ),
            vec![
                (63.0, LABEL_KILL_DECISION, AnnotationKind::KillDecision),
                (93.0, LABEL_KILLED, AnnotationKind::GracePeriodEnd),
            ]
        );
    }

    #[test]
    fn readiness_short_failure_stays_ready() {
        assert_eq!(
            events(
                ProbeKind::Readiness,
                &READINESS,
                EndpointBehaviour::healthy_from(0.0)
                    .failing_from(10.0)
                    .healthy_again_from(13.0),
                18.0
            ),
            vec![(11.0, LABEL_ALWAYS_READY, AnnotationKind::Observation)]
        );
    }

    #[test]
    fn readiness_long_failure_stops_and_restores_traffic() {
        let events = events(
            ProbeKind::Readiness,
            &READINESS,
            EndpointBehaviour::healthy_from(0.0)
                .failing_from(10.0)
                .healthy_again_from(30.0),
            41.0,
        );

        assert_eq!(
            events,
            vec![
                (19.0, LABEL_NO_TRAFFIC, AnnotationKind::LifecycleTransition),
                (31.0, LABEL_SENDS_TRAFFIC, AnnotationKind::LifecycleTransition),
            ]
        );
        assert!(events[0].0 >= 10.0 && events[0].0 < 30.0);
        assert!(events[1].0 >= 30.0);
    }

    #[test]
    fn readiness_without_failures_has_no_annotations() {
        assert!(events(
            ProbeKind::Readiness,
            &READINESS,
            EndpointBehaviour::healthy_from(0.0),
            20.0
        )
        .is_empty());
    }

    #[test]
    fn liveness_short_failure_stays_live() {
        assert_eq!(
            events(
                ProbeKind::Liveness,
                &LIVENESS,
                EndpointBehaviour::healthy_from(0.0)
                    .failing_from(20.0)
                    .healthy_again_from(25.0),
                31.0
            ),
            vec![(20.0, LABEL_ALWAYS_LIVE, AnnotationKind::Observation)]
        );
    }

    #[test]
    fn liveness_persistent_failure_kills_after_grace_period() {
        let events = events(
            ProbeKind::Liveness,
            &LIVENESS,
            EndpointBehaviour::healthy_from(0.0).failing_from(20.0),
            36.0,
        );

        assert_eq!(
            events,
            vec![
                (28.0, LABEL_KILL_DECISION, AnnotationKind::KillDecision),
                (88.0, LABEL_KILLED, AnnotationKind::GracePeriodEnd),
            ]
        );
        assert_eq!(events[1].0 - events[0].0, 60.0);
    }
}
