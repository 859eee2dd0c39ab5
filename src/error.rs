use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The three independent analysis branches of the engine, used to attribute
/// fatal errors and warnings to their origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Branch {
    Accessibility,
    SectorView,
    NoiseExposure,
}

impl std::fmt::Display for Branch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Branch::Accessibility => write!(f, "accessibility"),
            Branch::SectorView => write!(f, "sector-view"),
            Branch::NoiseExposure => write!(f, "noise-exposure"),
        }
    }
}

/// Fatal errors. Any of these aborts the run; no partial report is produced.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine configuration is invalid (rejected before any branch runs).
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The site geometry is empty, degenerate, or contains non-finite
    /// coordinates (rejected before any branch runs).
    #[error("invalid site geometry: {0}")]
    InputGeometry(String),

    /// Branch results reference mismatched site or run identity at the
    /// aggregation join point.
    #[error("inconsistent {branch} result: {detail}")]
    Consistency { branch: Branch, detail: String },
}

/// Non-fatal conditions accumulated into the report. A run either fails with
/// an [`EngineError`] or produces a complete report carrying zero or more of
/// these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Warning {
    /// A single malformed feature was skipped (negative height, non-finite
    /// coordinates, unusable distance). `feature` is the feature's position
    /// in the input slice handed to the context store, regardless of which
    /// stage skipped it.
    DataQuality { feature: usize, detail: String },

    /// No routable network was available (or it was unusable), so the
    /// accessibility branch degraded to straight-line distances only.
    NetworkUnavailable(String),
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::DataQuality { feature, detail } => {
                write!(f, "feature {feature} skipped: {detail}")
            }
            Warning::NetworkUnavailable(detail) => write!(f, "no routable network: {detail}"),
        }
    }
}
