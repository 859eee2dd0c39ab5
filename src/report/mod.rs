mod report;

pub(crate) use report::BranchOutput;
pub use report::FeasibilityReport;
