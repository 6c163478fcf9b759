//! Workspace/monorepo ecosystem detection.

use std::path::Path;

/// Detect which package ecosystem, if any, governs this workspace root.
pub fn detect_ecosystem(root: &Path) -> Option<Ecosystem> {
    if root.join("Cargo.toml").exists() {
        Some(Ecosystem::Cargo)
    } else if root.join("package.json").exists() {
        Some(Ecosystem::Npm)
    } else if root.join("go.mod").exists() {
        Some(Ecosystem::GoModules)
    } else if root.join("pom.xml").exists() {
        Some(Ecosystem::Maven)
    } else if root.join("build.gradle").exists() || root.join("build.gradle.kts").exists() {
        Some(Ecosystem::Gradle)
    } else {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ecosystem {
    Cargo,
    Npm,
    GoModules,
    Maven,
    Gradle,
}
