use std::fmt;
use std::time::Duration;

/// Pipeline step that talks to an external model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    CardDetection,
    ShapeDetection,
    FillClassification,
    ShapeClassification,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::CardDetection => "card detection",
            Stage::ShapeDetection => "shape detection",
            Stage::FillClassification => "fill classification",
            Stage::ShapeClassification => "shape classification",
        })
    }
}

/// Errors returned by the SET pipeline.
///
/// An empty board or a card without shapes is not an error.
#[derive(thiserror::Error, Debug)]
pub enum SetError {
    #[error("{stage} failed: {source:#}")]
    DetectorFailure {
        stage: Stage,
        #[source]
        source: anyhow::Error,
    },
    #[error("malformed image: {0}")]
    MalformedImage(String),
    #[error("{stage} exceeded the time budget ({elapsed:?} > {budget:?})")]
    DetectionTimeout {
        stage: Stage,
        elapsed: Duration,
        budget: Duration,
    },
}

impl SetError {
    pub fn detector(stage: Stage, source: impl Into<anyhow::Error>) -> Self {
        SetError::DetectorFailure {
            stage,
            source: source.into(),
        }
    }
}

pub type Result<T, E = SetError> = std::result::Result<T, E>;
