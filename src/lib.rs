#![doc = "Sitescore public API"]
mod access;
mod config;
mod context;
mod engine;
mod error;
mod geom;
mod graph;
mod noise;
mod report;
mod sector;

#[doc(inline)]
pub use config::EngineConfig;

#[doc(inline)]
pub use context::{
    AmenityCategory, ContextStore, Feature, FeatureGeometry, FeatureKind, LandUseCategory,
    RoadClass, RunId, Site,
};

#[doc(inline)]
pub use graph::NetworkGraph;

#[doc(inline)]
pub use access::{AccessibilityResult, CategoryAccess, Isochrone, NetworkDistance};

#[doc(inline)]
pub use sector::{SectorFeatures, SectorScore, ViewLabel};

#[doc(inline)]
pub use noise::{ExposureZone, NoiseExposure, SourceLevel};

#[doc(inline)]
pub use report::FeasibilityReport;

#[doc(inline)]
pub use error::{Branch, EngineError, Warning};

#[doc(inline)]
pub use engine::analyze;
