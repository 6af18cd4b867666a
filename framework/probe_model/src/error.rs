use thiserror::Error;

/// Reasons a scenario definition is rejected before anything is drawn.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScenarioError {
    #[error("Scenario {id} has an empty probe schedule")]
    EmptySchedule { id: String },
    #[error(
        "Scenario {id} has a non-monotonic probe schedule: sample {index} at {current}s does not come after {previous}s"
    )]
    NonMonotonicSchedule {
        id: String,
        index: usize,
        previous: f64,
        current: f64,
    },
    #[error("Scenario {id} has an invalid time {time} for sample {index}")]
    InvalidTime { id: String, index: usize, time: f64 },
    #[error("Scenario {id} has an invalid probe configuration: {reason}")]
    InvalidConfig { id: String, reason: String },
    #[error("Scenario {id} has no output filename")]
    EmptyOutputFilename { id: String },
}
