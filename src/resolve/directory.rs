//! Resolve resources relative to a single root directory.

use std::path::{Component, Path, PathBuf};

use super::{Location, ResourceResolver};

/// Resolves `name` to `root/name` when that entry exists.
#[derive(Debug, Clone)]
pub struct DirectoryResolver {
    root: PathBuf,
}

impl DirectoryResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ResourceResolver for DirectoryResolver {
    fn resolve(&self, name: &str) -> Option<Location> {
        resolve_under(&self.root, name).map(Location::Path)
    }
}

/// Join `name` onto `root` and return it if it exists.
///
/// Absolute names and names with `..` never resolve, so a resource name
/// cannot escape the root it is looked up in.
pub(crate) fn resolve_under(root: &Path, name: &str) -> Option<PathBuf> {
    if !is_contained(name) {
        return None;
    }
    let candidate = root.join(name);
    if candidate.exists() {
        tracing::trace!(name, path = %candidate.display(), "resource resolved");
        Some(candidate)
    } else {
        None
    }
}

fn is_contained(name: &str) -> bool {
    !name.is_empty()
        && Path::new(name)
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}
