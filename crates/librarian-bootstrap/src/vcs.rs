//! Version-control probe: the one git touchpoint the rest of the system
//! needs, kept behind a trait per §9's "dynamic dispatch across
//! collaborators" guidance so gates and tests can inject a stub.

use std::path::Path;

pub trait VersionControlProbe: Send + Sync {
    /// Current HEAD commit, or `None` if `workspace` isn't a git repository.
    fn current_head(&self, workspace: &Path) -> Option<String>;
}

pub struct Git2Probe;

impl VersionControlProbe for Git2Probe {
    fn current_head(&self, workspace: &Path) -> Option<String> {
        let repo = git2::Repository::discover(workspace).ok()?;
        let head = repo.head().ok()?;
        head.target().map(|oid| oid.to_string())
    }
}

#[cfg(test)]
pub struct StubProbe(pub Option<String>);

#[cfg(test)]
impl VersionControlProbe for StubProbe {
    fn current_head(&self, _workspace: &Path) -> Option<String> {
        self.0.clone()
    }
}
