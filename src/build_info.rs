//! Version metadata shown on the landing page and in startup logs.

/// Crate version from `Cargo.toml`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Git commit, if provided at build time through `STORAGEBOX_EXPORTER_GIT_COMMIT`.
pub const GIT_COMMIT: &str = match option_env!("STORAGEBOX_EXPORTER_GIT_COMMIT") {
    Some(commit) => commit,
    None => "unknown",
};

/// Build date, if provided at build time through `STORAGEBOX_EXPORTER_BUILD_DATE`.
pub const BUILD_DATE: &str = match option_env!("STORAGEBOX_EXPORTER_BUILD_DATE") {
    Some(date) => date,
    None => "unknown",
};
