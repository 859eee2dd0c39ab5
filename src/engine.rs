use log::debug;

use crate::config::EngineConfig;
use crate::context::ContextStore;
use crate::error::EngineError;
use crate::report::{BranchOutput, FeasibilityReport};
use crate::{access, noise, sector};

/// Run the full spatial analysis for one site.
///
/// Validates the configuration up front (site geometry was already validated
/// at [`crate::Site::new`]), fans the three independent branches out across
/// the rayon pool, and joins them in the aggregator. The store is read-only
/// for the run's lifetime, so the branches share it without locks.
///
/// The engine performs no I/O and no retries; any network fetch must be
/// completed into the store before this call. Identical store + config
/// always produce an identical report.
pub fn analyze(
    store: &ContextStore,
    config: &EngineConfig,
) -> Result<FeasibilityReport, EngineError> {
    config.validate()?;
    debug!(
        "analyzing site {:?} (run {:?}): {} features, network: {}",
        store.site().id(),
        store.run_id().as_str(),
        store.features().len(),
        store.network().is_some(),
    );

    let (access_out, (sector_out, noise_out)) = rayon::join(
        || {
            let (result, warnings) = access::analyze(store, config);
            BranchOutput::stamp(store, result, warnings)
        },
        || {
            rayon::join(
                || {
                    let (sectors, aggregate) = sector::classify(store, config);
                    BranchOutput::stamp(store, (sectors, aggregate), vec![])
                },
                || {
                    let (exposure, warnings) = noise::assess(store, config);
                    BranchOutput::stamp(store, exposure, warnings)
                },
            )
        },
    );

    FeasibilityReport::assemble(store, access_out, sector_out, noise_out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{RunId, Site};
    use geo::{polygon, MultiPolygon};

    #[test]
    fn invalid_config_aborts_before_any_branch() {
        let site = Site::new(
            "LOT-1",
            MultiPolygon::new(vec![
                polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0), (x: 0.0, y: 1.0)],
            ]),
        )
        .unwrap();
        let store = ContextStore::new(site, RunId::new("r"), vec![], None);

        let mut config = EngineConfig::default();
        config.sector_count = 0;
        assert!(matches!(analyze(&store, &config), Err(EngineError::Config(_))));
    }
}
