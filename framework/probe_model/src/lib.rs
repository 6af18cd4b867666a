use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

mod error;
mod policy;
mod schedule;

pub use error::ScenarioError;
pub use policy::{
    annotate, LABEL_ALWAYS_LIVE, LABEL_ALWAYS_READY, LABEL_KILLED, LABEL_KILL_DECISION,
    LABEL_LIVE, LABEL_NO_TRAFFIC, LABEL_SENDS_TRAFFIC,
};
pub use schedule::{probe_schedule, probe_times, EndpointBehaviour, EndpointPhase};

pub type ScenarioResult<T> = Result<T, ScenarioError>;

/// Status code answered by a healthy endpoint
pub const STATUS_OK: u16 = 200;
/// Status code answered by an endpoint that is not available
pub const STATUS_UNAVAILABLE: u16 = 503;

/// Whether a response code counts as a passing probe.
///
/// Kubernetes treats any code in `200..=399` as a success for HTTP probes.
pub fn is_success_status(status_code: u16) -> bool {
    (200..400).contains(&status_code)
}

/// The kind of probe a scenario demonstrates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeKind {
    Startup,
    Readiness,
    Liveness,
}

impl ProbeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProbeKind::Startup => "startup",
            ProbeKind::Readiness => "readiness",
            ProbeKind::Liveness => "liveness",
        }
    }
}

impl Display for ProbeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single simulated probe call
///
/// Samples are immutable once created. The outcome is strictly binary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProbeSample {
    time_seconds: f64,
    outcome: bool,
}

impl ProbeSample {
    pub fn new(time_seconds: f64, outcome: bool) -> Self {
        Self {
            time_seconds,
            outcome,
        }
    }

    /// Create a sample from the response code the endpoint answered with.
    pub fn from_status_code(time_seconds: f64, status_code: u16) -> Self {
        Self::new(time_seconds, is_success_status(status_code))
    }

    /// Simulated time of the probe call, in seconds since the container started
    pub fn time_seconds(&self) -> f64 {
        self.time_seconds
    }

    pub fn outcome(&self) -> bool {
        self.outcome
    }

    /// The response code this sample stands for on a diagram
    pub fn status_code(&self) -> u16 {
        if self.outcome {
            STATUS_OK
        } else {
            STATUS_UNAVAILABLE
        }
    }

    /// The outcome as a plot level, `1.0` for success and `0.0` for failure
    pub fn level(&self) -> f64 {
        if self.outcome {
            1.0
        } else {
            0.0
        }
    }
}

/// What a lifecycle annotation stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationKind {
    /// The pod changed state, for example it became live or stopped receiving traffic
    LifecycleTransition,
    /// Kubernetes decided to restart the container
    KillDecision,
    /// The termination grace period ran out and the container is killed
    GracePeriodEnd,
    /// A steady-state verdict with no state change, drawn as text only
    Observation,
}

impl AnnotationKind {
    /// Whether the annotation gets a vertical reference line as well as a label
    pub fn draws_marker_line(&self) -> bool {
        !matches!(self, AnnotationKind::Observation)
    }
}

/// A labelled moment on a probe timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationEvent {
    pub time_seconds: f64,
    pub label: String,
    pub kind: AnnotationKind,
}

impl AnnotationEvent {
    pub fn new(time_seconds: f64, label: impl Into<String>, kind: AnnotationKind) -> Self {
        Self {
            time_seconds,
            label: label.into(),
            kind,
        }
    }
}

/// Probe settings from a deployment manifest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Seconds to wait after the container starts before the first probe
    pub initial_delay_seconds: u32,
    /// Seconds between two probes
    pub period_seconds: u32,
    /// Consecutive failures before Kubernetes acts on the probe
    pub failure_threshold: u32,
    /// Consecutive successes before the probe counts as passing
    pub success_threshold: u32,
    /// Seconds between the kill decision and the forced termination
    ///
    /// Only meaningful for probes that can restart the container.
    pub termination_grace_period_seconds: Option<u32>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            initial_delay_seconds: 0,
            period_seconds: 10,
            failure_threshold: 3,
            success_threshold: 1,
            termination_grace_period_seconds: None,
        }
    }
}

impl ProbeConfig {
    /// Check the values that would make the probe schedule meaningless.
    pub fn validate(&self) -> Result<(), String> {
        if self.period_seconds == 0 {
            return Err("periodSeconds must be greater than 0".to_string());
        }
        if self.failure_threshold == 0 {
            return Err("failureThreshold must be at least 1".to_string());
        }
        if self.success_threshold == 0 {
            return Err("successThreshold must be at least 1".to_string());
        }
        Ok(())
    }
}

/// A self-contained use case that produces exactly one diagram
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scenario {
    id: String,
    title: String,
    kind: ProbeKind,
    config: ProbeConfig,
    probe_schedule: Vec<ProbeSample>,
    annotations: Vec<AnnotationEvent>,
    output_filename: String,
}

impl Scenario {
    /// Create a validated scenario.
    ///
    /// The schedule must contain at least one sample and its times must be finite, non-negative
    /// and strictly increasing.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        kind: ProbeKind,
        config: ProbeConfig,
        probe_schedule: Vec<ProbeSample>,
        annotations: Vec<AnnotationEvent>,
        output_filename: impl Into<String>,
    ) -> ScenarioResult<Self> {
        let id = id.into();
        let output_filename = output_filename.into();

        if output_filename.trim().is_empty() {
            return Err(ScenarioError::EmptyOutputFilename { id });
        }
        if let Err(reason) = config.validate() {
            return Err(ScenarioError::InvalidConfig { id, reason });
        }
        validate_schedule(&id, &probe_schedule)?;

        Ok(Self {
            id,
            title: title.into(),
            kind,
            config,
            probe_schedule,
            annotations,
            output_filename,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn kind(&self) -> ProbeKind {
        self.kind
    }

    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    pub fn probe_schedule(&self) -> &[ProbeSample] {
        &self.probe_schedule
    }

    pub fn annotations(&self) -> &[AnnotationEvent] {
        &self.annotations
    }

    pub fn output_filename(&self) -> &str {
        &self.output_filename
    }

    /// Time of the last probe call
    pub fn last_probe_time(&self) -> f64 {
        // A scenario cannot be constructed with an empty schedule
        self.probe_schedule
            .last()
            .map(|s| s.time_seconds())
            .unwrap_or_default()
    }

    /// The latest moment the diagram has to show, either a probe or an annotation
    pub fn max_time(&self) -> f64 {
        self.annotations
            .iter()
            .map(|a| a.time_seconds)
            .fold(self.last_probe_time(), f64::max)
    }

    /// Annotations that fall after the last probe call or before time zero
    ///
    /// The end of a grace period is not included when it comes after the last probe, since
    /// probing stops once the kill is decided.
    pub fn annotations_outside_schedule(&self) -> impl Iterator<Item = &AnnotationEvent> {
        let last = self.last_probe_time();
        self.annotations.iter().filter(move |a| {
            a.time_seconds < 0.0
                || (a.time_seconds > last && a.kind != AnnotationKind::GracePeriodEnd)
        })
    }
}

/// The conventional file name for a scenario diagram, e.g. `2.2-readiness.png`
pub fn default_output_filename(id: &str, kind: ProbeKind) -> String {
    format!("{id}-{kind}.png")
}

fn validate_schedule(id: &str, schedule: &[ProbeSample]) -> ScenarioResult<()> {
    if schedule.is_empty() {
        return Err(ScenarioError::EmptySchedule { id: id.to_string() });
    }

    if let Some((index, sample)) = schedule
        .iter()
        .enumerate()
        .find(|(_, s)| !s.time_seconds().is_finite() || s.time_seconds() < 0.0)
    {
        return Err(ScenarioError::InvalidTime {
            id: id.to_string(),
            index,
            time: sample.time_seconds(),
        });
    }

    if let Some((index, (previous, current))) = schedule
        .iter()
        .tuple_windows()
        .enumerate()
        .find(|(_, (previous, current))| current.time_seconds() <= previous.time_seconds())
    {
        return Err(ScenarioError::NonMonotonicSchedule {
            id: id.to_string(),
            index: index + 1,
            previous: previous.time_seconds(),
            current: current.time_seconds(),
        });
    }

    Ok(())
}

/// Builder for a [Scenario] whose samples and annotations are derived from a probe configuration.
///
/// The schedule is either generated from an [EndpointBehaviour] and a `probe_until` bound, or
/// supplied directly with [ScenarioBuilder::samples]. Annotations are always computed with
/// [annotate] so they follow the configured thresholds.
#[derive(Debug, Clone)]
pub struct ScenarioBuilder {
    id: String,
    kind: ProbeKind,
    title: Option<String>,
    config: ProbeConfig,
    endpoint: Option<EndpointBehaviour>,
    probe_until: Option<f64>,
    samples: Option<Vec<ProbeSample>>,
    output_filename: Option<String>,
}

impl ScenarioBuilder {
    pub fn new(id: &str, kind: ProbeKind) -> Self {
        Self {
            id: id.to_string(),
            kind,
            title: None,
            config: ProbeConfig::default(),
            endpoint: None,
            probe_until: None,
            samples: None,
            output_filename: None,
        }
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn config(mut self, config: ProbeConfig) -> Self {
        self.config = config;
        self
    }

    /// Describe what the simulated endpoint answers over time.
    pub fn endpoint(mut self, endpoint: EndpointBehaviour) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    /// Stop probing before this time, exclusive.
    pub fn probe_until(mut self, until_seconds: f64) -> Self {
        self.probe_until = Some(until_seconds);
        self
    }

    /// Use a literal schedule instead of generating one.
    pub fn samples(mut self, samples: Vec<ProbeSample>) -> Self {
        self.samples = Some(samples);
        self
    }

    pub fn output_filename(mut self, output_filename: &str) -> Self {
        self.output_filename = Some(output_filename.to_string());
        self
    }

    pub fn build(self) -> ScenarioResult<Scenario> {
        if let Err(reason) = self.config.validate() {
            return Err(ScenarioError::InvalidConfig {
                id: self.id,
                reason,
            });
        }

        let samples = match (self.samples, self.endpoint) {
            (Some(samples), _) => samples,
            (None, Some(endpoint)) => probe_schedule(
                &self.config,
                &endpoint,
                self.probe_until.unwrap_or_default(),
            ),
            (None, None) => Vec::new(),
        };
        validate_schedule(&self.id, &samples)?;

        let annotations = annotate(self.kind, &self.config, &samples);
        let title = self
            .title
            .unwrap_or_else(|| format!("{} probe {}", capitalise(self.kind.as_str()), self.id));
        let output_filename = self
            .output_filename
            .unwrap_or_else(|| default_output_filename(&self.id, self.kind));

        Scenario::new(
            self.id,
            title,
            self.kind,
            self.config,
            samples,
            annotations,
            output_filename,
        )
    }
}

fn capitalise(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn readiness_config() -> ProbeConfig {
        ProbeConfig {
            initial_delay_seconds: 5,
            period_seconds: 2,
            failure_threshold: 5,
            success_threshold: 1,
            termination_grace_period_seconds: None,
        }
    }

    #[test]
    fn status_codes_map_to_outcomes() {
        assert!(ProbeSample::from_status_code(1.0, 200).outcome());
        assert!(ProbeSample::from_status_code(1.0, 302).outcome());
        assert!(!ProbeSample::from_status_code(1.0, 503).outcome());
        assert!(!ProbeSample::from_status_code(1.0, 404).outcome());

        assert_eq!(ProbeSample::new(1.0, true).status_code(), 200);
        assert_eq!(ProbeSample::new(1.0, false).status_code(), 503);
        assert_eq!(ProbeSample::new(1.0, false).level(), 0.0);
    }

    #[test]
    fn empty_schedule_is_rejected() {
        let err = ScenarioBuilder::new("9.9", ProbeKind::Readiness)
            .config(readiness_config())
            .samples(vec![])
            .build()
            .unwrap_err();

        assert_eq!(
            err,
            ScenarioError::EmptySchedule {
                id: "9.9".to_string()
            }
        );
    }

    #[test]
    fn non_monotonic_schedule_is_rejected() {
        let err = ScenarioBuilder::new("9.9", ProbeKind::Readiness)
            .config(readiness_config())
            .samples(vec![
                ProbeSample::new(5.0, true),
                ProbeSample::new(7.0, true),
                ProbeSample::new(7.0, false),
            ])
            .build()
            .unwrap_err();

        assert_eq!(
            err,
            ScenarioError::NonMonotonicSchedule {
                id: "9.9".to_string(),
                index: 2,
                previous: 7.0,
                current: 7.0,
            }
        );
    }

    #[test]
    fn negative_time_is_rejected() {
        let err = Scenario::new(
            "9.9",
            "Negative",
            ProbeKind::Liveness,
            ProbeConfig::default(),
            vec![ProbeSample::new(-1.0, true)],
            vec![],
            "9.9-liveness.png",
        )
        .unwrap_err();

        assert!(matches!(err, ScenarioError::InvalidTime { index: 0, .. }));
    }

    #[test]
    fn zero_period_is_rejected_before_generating_a_schedule() {
        let err = ScenarioBuilder::new("9.9", ProbeKind::Startup)
            .config(ProbeConfig {
                period_seconds: 0,
                ..readiness_config()
            })
            .endpoint(EndpointBehaviour::healthy_from(0.0))
            .probe_until(10.0)
            .build()
            .unwrap_err();

        assert!(matches!(err, ScenarioError::InvalidConfig { .. }));
    }

    #[test]
    fn empty_output_filename_is_rejected() {
        let err = Scenario::new(
            "9.9",
            "No file",
            ProbeKind::Startup,
            ProbeConfig::default(),
            vec![ProbeSample::new(0.0, true)],
            vec![],
            " ",
        )
        .unwrap_err();

        assert!(matches!(err, ScenarioError::EmptyOutputFilename { .. }));
    }

    #[test]
    fn builder_defaults_file_name_and_title() {
        let scenario = ScenarioBuilder::new("2.1", ProbeKind::Readiness)
            .config(readiness_config())
            .endpoint(EndpointBehaviour::healthy_from(0.0))
            .probe_until(10.0)
            .build()
            .unwrap();

        assert_eq!(scenario.output_filename(), "2.1-readiness.png");
        assert_eq!(scenario.title(), "Readiness probe 2.1");
        assert_eq!(scenario.probe_schedule().len(), 3);
    }

    #[test]
    fn max_time_includes_annotations_after_last_probe() {
        let scenario = Scenario::new(
            "3.2",
            "Late kill",
            ProbeKind::Liveness,
            ProbeConfig::default(),
            vec![ProbeSample::new(10.0, true), ProbeSample::new(12.0, false)],
            vec![AnnotationEvent::new(
                72.0,
                LABEL_KILLED,
                AnnotationKind::GracePeriodEnd,
            )],
            "3.2-liveness.png",
        )
        .unwrap();

        assert_eq!(scenario.last_probe_time(), 12.0);
        assert_eq!(scenario.max_time(), 72.0);
        assert_eq!(scenario.annotations_outside_schedule().count(), 0);
    }

    #[test]
    fn late_transitions_are_outside_schedule() {
        let scenario = Scenario::new(
            "2.9",
            "Late transition",
            ProbeKind::Readiness,
            ProbeConfig::default(),
            vec![ProbeSample::new(5.0, true), ProbeSample::new(7.0, false)],
            vec![
                AnnotationEvent::new(7.0, LABEL_NO_TRAFFIC, AnnotationKind::LifecycleTransition),
                AnnotationEvent::new(40.0, LABEL_SENDS_TRAFFIC, AnnotationKind::LifecycleTransition),
                AnnotationEvent::new(-1.0, LABEL_KILLED, AnnotationKind::GracePeriodEnd),
            ],
            "2.9-readiness.png",
        )
        .unwrap();

        let outside = scenario
            .annotations_outside_schedule()
            .map(|a| a.time_seconds)
            .collect::<Vec<_>>();
        assert_eq!(outside, vec![40.0, -1.0]);
    }

    #[test]
    fn probe_kind_serialises_as_snake_case() {
        assert_eq!(
            serde_json::to_string(&ProbeKind::Readiness).unwrap(),
            "\"readiness\""
        );
        assert_eq!(
            serde_json::to_string(&AnnotationKind::GracePeriodEnd).unwrap(),
            "\"grace_period_end\""
        );
    }
}
