// Typed errors with thiserror. Surface meaningful messages to JS.
// See DESIGN.md: Error handling

use thiserror::Error;

use crate::types::SceneObjectId;

/// Flow engine error types.
#[derive(Error, Debug)]
pub enum FlowError {
    #[error("Step {step} is out of range for a timeline of {total} scenes")]
    OutOfRangeStep { step: usize, total: usize },

    #[error("Unknown scene object: {0}")]
    UnknownObjectId(String),

    #[error("Timeline needs at least one scene")]
    EmptyTimeline,

    #[error("Scene object {0} is not a grid group")]
    NotAGroup(SceneObjectId),

    #[error("Edge rule fans over {0}, but no member count was given for it")]
    MissingGroupCount(SceneObjectId),

    #[error("Edge rule {rule} targets step {step}, but the timeline has {total} scenes")]
    RuleStepOutOfRange {
        rule: usize,
        step: usize,
        total: usize,
    },

    #[error("Invalid layout for {object} in scene {scene}: {message}")]
    InvalidLayout {
        scene: usize,
        object: SceneObjectId,
        message: String,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for FlowError {
    fn from(err: serde_json::Error) -> Self {
        FlowError::Serialization(err.to_string())
    }
}

pub type FlowResult<T> = Result<T, FlowError>;
