use crate::{ProbeConfig, ProbeSample, STATUS_OK, STATUS_UNAVAILABLE};
use serde::{Deserialize, Serialize};

/// From `from_seconds` onwards the endpoint answers with `status_code`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EndpointPhase {
    pub from_seconds: f64,
    pub status_code: u16,
}

/// What a simulated probe endpoint answers over time.
///
/// The answer at a given time comes from the latest phase that started at or before it. Before
/// the first phase the application is not up yet and the endpoint answers `503`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EndpointBehaviour {
    phases: Vec<EndpointPhase>,
}

impl EndpointBehaviour {
    /// An endpoint that never answers successfully
    pub fn unavailable() -> Self {
        Self::default()
    }

    /// An application that comes up at `from_seconds` and stays healthy
    pub fn healthy_from(from_seconds: f64) -> Self {
        Self::unavailable().then(from_seconds, STATUS_OK)
    }

    /// Switch to answering `status_code` from `from_seconds` onwards.
    pub fn then(mut self, from_seconds: f64, status_code: u16) -> Self {
        self.phases.push(EndpointPhase {
            from_seconds,
            status_code,
        });
        self
    }

    pub fn failing_from(self, from_seconds: f64) -> Self {
        self.then(from_seconds, STATUS_UNAVAILABLE)
    }

    pub fn healthy_again_from(self, from_seconds: f64) -> Self {
        self.then(from_seconds, STATUS_OK)
    }

    pub fn phases(&self) -> &[EndpointPhase] {
        &self.phases
    }

    pub fn status_at(&self, time_seconds: f64) -> u16 {
        self.phases
            .iter()
            .filter(|phase| phase.from_seconds <= time_seconds)
            .max_by(|a, b| a.from_seconds.total_cmp(&b.from_seconds))
            .map(|phase| phase.status_code)
            .unwrap_or(STATUS_UNAVAILABLE)
    }
}

/// Times at which the kubelet fires the probe, `initialDelaySeconds + k * periodSeconds`, for
/// every time strictly before `until_seconds`.
///
/// Returns nothing for a zero period, which [ProbeConfig::validate] rejects.
pub fn probe_times(config: &ProbeConfig, until_seconds: f64) -> Vec<f64> {
    if config.period_seconds == 0 {
        return Vec::new();
    }

    let start = f64::from(config.initial_delay_seconds);
    let period = f64::from(config.period_seconds);

    (0u32..)
        .map(|k| start + f64::from(k) * period)
        .take_while(|t| *t < until_seconds)
        .collect()
}

/// Sample the endpoint at every probe time.
pub fn probe_schedule(
    config: &ProbeConfig,
    endpoint: &EndpointBehaviour,
    until_seconds: f64,
) -> Vec<ProbeSample> {
    probe_times(config, until_seconds)
        .into_iter()
        .map(|t| ProbeSample::from_status_code(t, endpoint.status_at(t)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn config(initial_delay_seconds: u32) -> ProbeConfig {
        ProbeConfig {
            initial_delay_seconds,
            period_seconds: 2,
            ..Default::default()
        }
    }

    #[test]
    fn probe_times_are_half_open() {
        assert_eq!(probe_times(&config(5), 15.0), vec![5.0, 7.0, 9.0, 11.0, 13.0]);
        assert_eq!(probe_times(&config(10), 31.0).last(), Some(&30.0));
        assert!(probe_times(&config(5), 5.0).is_empty());
    }

    #[test]
    fn zero_period_yields_no_probes() {
        let config = ProbeConfig {
            period_seconds: 0,
            ..Default::default()
        };
        assert!(probe_times(&config, 100.0).is_empty());
    }

    #[test]
    fn endpoint_follows_latest_started_phase() {
        let endpoint = EndpointBehaviour::healthy_from(0.0)
            .failing_from(10.0)
            .healthy_again_from(13.0);

        assert_eq!(endpoint.status_at(9.9), STATUS_OK);
        assert_eq!(endpoint.status_at(10.0), STATUS_UNAVAILABLE);
        assert_eq!(endpoint.status_at(12.0), STATUS_UNAVAILABLE);
        assert_eq!(endpoint.status_at(13.0), STATUS_OK);
    }

    #[test]
    fn endpoint_fails_before_the_app_starts() {
        let endpoint = EndpointBehaviour::healthy_from(8.0);
        assert_eq!(endpoint.status_at(7.0), STATUS_UNAVAILABLE);
        assert_eq!(endpoint.status_at(8.0), STATUS_OK);
        assert_eq!(EndpointBehaviour::unavailable().status_at(1000.0), STATUS_UNAVAILABLE);
    }

    #[test]
    fn schedule_samples_the_endpoint() {
        let schedule = probe_schedule(&config(5), &EndpointBehaviour::healthy_from(8.0), 15.0);
        let outcomes = schedule.iter().map(|s| s.outcome()).collect::<Vec<_>>();
        assert_eq!(outcomes, vec![false, false, true, true, true]);
    }
}
