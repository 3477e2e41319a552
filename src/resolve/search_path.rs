//! Resolve resources against an ordered list of root directories.

use std::path::{Path, PathBuf};

use super::directory::resolve_under;
use super::{Location, ResourceResolver};
use crate::constants::{CONFIG_DIR, ENV_SEARCH_PATH};
use crate::env::Env;

/// Searches each root in order; the first root containing the name wins.
///
/// Every lookup is independent, so a base file and its `.d` directory may
/// come from different roots.
#[derive(Debug, Clone, Default)]
pub struct SearchPathResolver {
    roots: Vec<PathBuf>,
}

impl SearchPathResolver {
    pub fn new(roots: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
        }
    }

    /// Roots taken from the `PROPSD_PATH` environment variable.
    pub fn from_env(env: &Env) -> Self {
        Self::new(env.paths(ENV_SEARCH_PATH))
    }

    /// The default search path:
    ///
    /// 1. `PROPSD_PATH` entries, in order
    /// 2. the current working directory
    /// 3. `~/.config/propsd/` (platform config dir)
    pub fn standard(env: &Env) -> Self {
        let mut resolver = Self::from_env(env);
        resolver.roots.push(PathBuf::from("."));
        if let Some(dir) = Self::global_config_dir() {
            resolver.roots.push(dir);
        }
        resolver
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    fn global_config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(CONFIG_DIR))
    }
}

impl ResourceResolver for SearchPathResolver {
    fn resolve(&self, name: &str) -> Option<Location> {
        self.roots
            .iter()
            .map(PathBuf::as_path)
            .find_map(|root: &Path| resolve_under(root, name))
            .map(Location::Path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_root_wins() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        std::fs::write(first.path().join("app.properties"), "a=1").unwrap();
        std::fs::write(second.path().join("app.properties"), "a=2").unwrap();

        let resolver = SearchPathResolver::new([first.path(), second.path()]);
        assert_eq!(
            resolver.resolve("app.properties"),
            Some(Location::Path(first.path().join("app.properties")))
        );
    }

    #[test]
    fn lookups_are_independent_per_name() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        std::fs::write(first.path().join("app.properties"), "a=1").unwrap();
        std::fs::create_dir(second.path().join("app.properties.d")).unwrap();

        let resolver = SearchPathResolver::new([first.path(), second.path()]);
        assert_eq!(
            resolver.resolve("app.properties.d"),
            Some(Location::Path(second.path().join("app.properties.d")))
        );
    }

    #[test]
    fn empty_search_path_resolves_nothing() {
        let resolver = SearchPathResolver::default();
        assert!(resolver.roots().is_empty());
        assert_eq!(resolver.resolve("app.properties"), None);
    }

    #[test]
    fn from_env_reads_search_path_variable() {
        let joined = std::env::join_paths(["/etc/app", "/opt/app"]).unwrap();
        let env = Env::mock([(ENV_SEARCH_PATH, joined)]);
        let resolver = SearchPathResolver::from_env(&env);
        assert_eq!(
            resolver.roots(),
            &[PathBuf::from("/etc/app"), PathBuf::from("/opt/app")]
        );
    }

    #[test]
    fn standard_appends_cwd_and_config_dir() {
        let env = Env::mock([(ENV_SEARCH_PATH, "/etc/app")]);
        let resolver = SearchPathResolver::standard(&env);
        assert_eq!(resolver.roots()[0], PathBuf::from("/etc/app"));
        assert_eq!(resolver.roots()[1], PathBuf::from("."));
        // Config dir may be absent in CI without a home directory
        if let Some(last) = resolver.roots().get(2) {
            assert!(last.ends_with(CONFIG_DIR));
        }
    }
}
