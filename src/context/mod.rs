mod feature;
mod site;
mod store;

pub use feature::{
    AmenityCategory, Feature, FeatureGeometry, FeatureKind, LandUseCategory, RoadClass,
};
pub use site::{RunId, Site};
pub use store::ContextStore;
