//! Bootstrap & Drift Detector: builds the Knowledge Store from a
//! workspace and decides when it needs to be rebuilt.

pub mod bootstrap;
pub mod drift;
pub mod vcs;
pub mod walk;

pub use bootstrap::{run, BootstrapOptions, BootstrapReport};
pub use drift::{check as check_drift, DriftReport};
pub use vcs::{Git2Probe, VersionControlProbe};
pub use walk::discover_files;
