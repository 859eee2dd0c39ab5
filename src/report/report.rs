use serde::{Deserialize, Serialize};

use crate::access::AccessibilityResult;
use crate::context::ContextStore;
use crate::error::{Branch, EngineError, Warning};
use crate::noise::NoiseExposure;
use crate::sector::{SectorScore, ViewLabel};

/// A branch result stamped with the identity of the run that produced it.
/// The aggregator refuses to merge outputs whose identities disagree.
#[derive(Debug, Clone)]
pub(crate) struct BranchOutput<T> {
    site_id: String,
    run_id: String,
    value: T,
    warnings: Vec<Warning>,
}

impl<T> BranchOutput<T> {
    /// Stamp a branch value with the store's site and run identity.
    pub(crate) fn stamp(store: &ContextStore, value: T, warnings: Vec<Warning>) -> Self {
        Self {
            site_id: store.site().id().to_owned(),
            run_id: store.run_id().as_str().to_owned(),
            value,
            warnings,
        }
    }

    /// Validate identity against the store, releasing the value and its
    /// warnings or failing with the offending branch named.
    fn release(self, store: &ContextStore, branch: Branch) -> Result<(T, Vec<Warning>), EngineError> {
        if self.site_id != store.site().id() {
            return Err(EngineError::Consistency {
                branch,
                detail: format!(
                    "site {:?} does not match run site {:?}",
                    self.site_id,
                    store.site().id()
                ),
            });
        }
        if self.run_id != store.run_id().as_str() {
            return Err(EngineError::Consistency {
                branch,
                detail: format!(
                    "run {:?} does not match current run {:?}",
                    self.run_id,
                    store.run_id().as_str()
                ),
            });
        }
        Ok((self.value, self.warnings))
    }
}

/// The engine's public result: every branch output for one site at one run,
/// immutable once produced. Either the whole report exists or none of it
/// does; non-fatal conditions land in `warnings`, never in a partial
/// report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeasibilityReport {
    pub site_id: String,
    pub run_id: String,

    pub accessibility: AccessibilityResult,

    /// One score per sector, in sector index order (length N).
    pub sectors: Vec<SectorScore>,
    pub aggregate_view: ViewLabel,

    pub noise: NoiseExposure,

    /// Store-level data-quality warnings first, then branch warnings in
    /// branch order (accessibility, sector view, noise).
    pub warnings: Vec<Warning>,
}

impl FeasibilityReport {
    /// Join point of the three branches: validate identity, merge warnings,
    /// freeze the report.
    pub(crate) fn assemble(
        store: &ContextStore,
        access: BranchOutput<AccessibilityResult>,
        sectors: BranchOutput<(Vec<SectorScore>, ViewLabel)>,
        noise: BranchOutput<NoiseExposure>,
    ) -> Result<Self, EngineError> {
        let (accessibility, access_warnings) = access.release(store, Branch::Accessibility)?;
        let ((sectors, aggregate_view), sector_warnings) =
            sectors.release(store, Branch::SectorView)?;
        let (noise, noise_warnings) = noise.release(store, Branch::NoiseExposure)?;

        let mut warnings = store.warnings().to_vec();
        warnings.extend(access_warnings);
        warnings.extend(sector_warnings);
        warnings.extend(noise_warnings);

        Ok(Self {
            site_id: store.site().id().to_owned(),
            run_id: store.run_id().as_str().to_owned(),
            accessibility,
            sectors,
            aggregate_view,
            noise,
            warnings,
        })
    }
}
