//! Crate-wide constants.
//!
//! Centralises directory names, suffixes, environment variable
//! names and fixed error text so a rename only touches this file.

/// Directory name under the platform config dir searched by the standard resolver.
pub const CONFIG_DIR: &str = "propsd";

/// Suffix appended to a resource name to locate its override directory.
pub const OVERRIDE_DIR_SUFFIX: &str = ".d";

/// Message of the error raised for an absent resource name.
///
/// Kept byte-for-byte stable; callers match on it.
pub const NULL_RESOURCE_MESSAGE: &str = "Can not load configuration for null resource name";

// ── Environment variable names ──────────────────────────────────────

/// Platform path list of directories searched for configuration resources.
pub const ENV_SEARCH_PATH: &str = "PROPSD_PATH";
