use std::fmt;

/// Build metadata captured by `build.rs` at compile time.
#[derive(Debug, Clone, Copy)]
pub struct BuildInfo {
    pub crate_version: &'static str,
    pub repo_version: &'static str,
    pub build_profile: &'static str,
    pub build_timestamp: &'static str,
    pub rust_version: &'static str,
    pub target: &'static str,
}

pub fn build_info() -> BuildInfo {
    BuildInfo {
        crate_version: env!("CARGO_PKG_VERSION"),
        repo_version: env!("REPO_VERSION"),
        build_profile: env!("BUILD_PROFILE"),
        build_timestamp: env!("BUILD_TIMESTAMP"),
        rust_version: env!("RUST_VERSION"),
        target: env!("BUILD_TARGET"),
    }
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pages-deploy {} ({}, {} build for {}, built {} with {})",
            self.crate_version,
            self.repo_version,
            self.build_profile,
            self.target,
            self.build_timestamp,
            self.rust_version
        )
    }
}
