//! `ConfigReader`: resolution, ordering and merging of configuration files.
//!
//! Load order (later wins):
//! 1. `<name>`, the base properties file
//! 2. `<name>.d/<digits>_*` fragments, sorted by file name

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use walkdir::WalkDir;

use super::ConfigError;
use crate::constants::OVERRIDE_DIR_SUFFIX;
use crate::env::Env;
use crate::properties::{PropertyTable, TableBuilder};
use crate::resolve::{Location, ResourceResolver, SearchPathResolver};

/// Fragment file names: one or more ASCII digits, then an underscore.
static FRAGMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+_").unwrap());

/// Merged configuration for one resource name.
///
/// All I/O happens in the constructor; afterwards the reader is a frozen
/// view over its [`PropertyTable`].
#[derive(Debug, Clone)]
pub struct ConfigReader {
    resource_name: String,
    properties: PropertyTable,
    sources: Vec<PathBuf>,
}

impl ConfigReader {
    /// Load `resource_name` from the standard search path
    /// (see [`SearchPathResolver::standard`]).
    pub fn new(resource_name: &str) -> Result<Self, ConfigError> {
        Self::with_resolver(resource_name, &SearchPathResolver::standard(&Env::real()))
    }

    /// Load `resource_name` using a caller-supplied resolver.
    ///
    /// Fails with [`ConfigError::NullResourceName`] for an empty name,
    /// [`ConfigError::NotFound`] when neither the base file nor the `.d`
    /// directory resolves, and an I/O-kind error when any resolved file
    /// cannot be read or parsed. No partial reader is ever returned.
    pub fn with_resolver<R>(resource_name: &str, resolver: &R) -> Result<Self, ConfigError>
    where
        R: ResourceResolver + ?Sized,
    {
        if resource_name.is_empty() {
            return Err(ConfigError::NullResourceName);
        }

        let base = resolver.resolve(resource_name);
        let directory = resolver.resolve(&format!("{resource_name}{OVERRIDE_DIR_SUFFIX}"));
        if base.is_none() && directory.is_none() {
            return Err(ConfigError::NotFound {
                resource: resource_name.to_string(),
            });
        }

        let mut load = Load::new(resource_name);
        if let Some(location) = base {
            let path = load.to_path(location)?;
            load.file(&path)?;
        }
        if let Some(location) = directory {
            let path = load.to_path(location)?;
            load.directory(&path)?;
        }

        let reader = load.finish();
        tracing::debug!(
            resource = resource_name,
            files = reader.sources.len(),
            keys = reader.properties.len(),
            "configuration loaded"
        );
        Ok(reader)
    }

    /// Value for `key`, or `None` when the key is not defined anywhere.
    pub fn retrieve(&self, key: &str) -> Option<&str> {
        self.properties.get(key)
    }

    /// Value for `key`, or `default` when the key is not defined.
    pub fn retrieve_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.retrieve(key).unwrap_or(default)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn resource_name(&self) -> &str {
        &self.resource_name
    }

    pub fn properties(&self) -> &PropertyTable {
        &self.properties
    }

    /// Files that contributed to the table, in load order.
    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }
}

/// In-progress load of one resource.
struct Load<'a> {
    resource: &'a str,
    builder: TableBuilder,
    sources: Vec<PathBuf>,
}

impl<'a> Load<'a> {
    fn new(resource: &'a str) -> Self {
        Self {
            resource,
            builder: TableBuilder::new(),
            sources: Vec::new(),
        }
    }

    fn to_path(&self, location: Location) -> Result<PathBuf, ConfigError> {
        location.to_path().map_err(|source| ConfigError::Location {
            resource: self.resource.to_string(),
            location,
            source,
        })
    }

    /// Read and merge one properties file. The file handle is closed
    /// before this returns, on success and on error alike.
    fn file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let bytes = std::fs::read(path).map_err(|source| ConfigError::ReadFile {
            file: file_name(path),
            path: path.to_path_buf(),
            source,
        })?;
        let entries = self
            .builder
            .merge_bytes(&bytes)
            .map_err(|source| ConfigError::ParseFile {
                file: file_name(path),
                path: path.to_path_buf(),
                source,
            })?;

        tracing::debug!(
            resource = self.resource,
            path = %path.display(),
            entries,
            "merged configuration file"
        );
        self.sources.push(path.to_path_buf());
        Ok(())
    }

    /// Merge every fragment file of an override directory.
    fn directory(&mut self, dir: &Path) -> Result<(), ConfigError> {
        for path in fragment_files(dir)? {
            self.file(&path)?;
        }
        Ok(())
    }

    fn finish(self) -> ConfigReader {
        ConfigReader {
            resource_name: self.resource.to_string(),
            properties: self.builder.build(),
            sources: self.sources,
        }
    }
}

/// List the fragment files directly inside `dir`, sorted by file name.
///
/// Entries whose name lacks the `<digits>_` prefix, names that are not
/// valid UTF-8, and subdirectories are skipped. Every other matching entry
/// is returned, readable or not.
fn fragment_files(dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let list_error = |source: std::io::Error| ConfigError::ReadDirectory {
        file: file_name(dir),
        path: dir.to_path_buf(),
        source,
    };

    let metadata = std::fs::metadata(dir).map_err(list_error)?;
    if !metadata.is_dir() {
        return Err(list_error(std::io::Error::new(
            std::io::ErrorKind::NotADirectory,
            "override location is not a directory",
        )));
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry.map_err(|e| list_error(e.into()))?;
        let path = entry.path();

        let is_fragment = entry
            .file_name()
            .to_str()
            .is_some_and(|name| FRAGMENT_RE.is_match(name));
        if !is_fragment {
            tracing::trace!(path = %path.display(), "skipping non-fragment entry");
            continue;
        }
        // Anything that is not a directory goes on to be read, so an
        // unreadable entry (dangling symlink, bad permissions) fails the load.
        if std::fs::metadata(path).is_ok_and(|m| m.is_dir()) {
            tracing::trace!(path = %path.display(), "skipping fragment-named directory");
            continue;
        }

        files.push(entry.into_path());
    }

    Ok(files)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ErrorKind;
    use crate::resolve::DirectoryResolver;
    use pretty_assertions::assert_eq;
    use std::fs;

    fn write(dir: &Path, name: &str, content: &str) {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn fragment_pattern_requires_digits_then_underscore() {
        assert!(FRAGMENT_RE.is_match("00_base.properties"));
        assert!(FRAGMENT_RE.is_match("7_x"));
        assert!(FRAGMENT_RE.is_match("123_"));
        assert!(!FRAGMENT_RE.is_match("notes.txt"));
        assert!(!FRAGMENT_RE.is_match("_00.properties"));
        assert!(!FRAGMENT_RE.is_match("00-base.properties"));
        assert!(!FRAGMENT_RE.is_match("a00_base.properties"));
        // Non-ASCII digits do not count
        assert!(!FRAGMENT_RE.is_match("٣_arabic.properties"));
    }

    #[test]
    fn fragments_load_in_name_order_regardless_of_creation_order() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "app.d/99_last", "key=ninety-nine");
        write(dir.path(), "app.d/00_first", "key=zero\nonly.first=yes");
        write(dir.path(), "app.d/50_middle", "key=fifty");

        let reader = ConfigReader::with_resolver("app", &DirectoryResolver::new(dir.path())).unwrap();
        assert_eq!(reader.retrieve("key"), Some("ninety-nine"));
        assert_eq!(reader.retrieve("only.first"), Some("yes"));

        let names: Vec<_> = reader.sources().iter().map(|p| file_name(p)).collect();
        assert_eq!(names, vec!["00_first", "50_middle", "99_last"]);
    }

    #[test]
    fn base_loads_before_fragments() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "app", "shared=base\nbase.only=1");
        write(dir.path(), "app.d/00_x", "shared=fragment");

        let reader = ConfigReader::with_resolver("app", &DirectoryResolver::new(dir.path())).unwrap();
        assert_eq!(reader.retrieve("shared"), Some("fragment"));
        assert_eq!(reader.retrieve("base.only"), Some("1"));
        assert_eq!(reader.sources()[0], dir.path().join("app"));
    }

    #[test]
    fn matching_subdirectory_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "app.d/10_nested/00_inner", "inner=1");
        write(dir.path(), "app.d/20_real", "real=1");

        let reader = ConfigReader::with_resolver("app", &DirectoryResolver::new(dir.path())).unwrap();
        assert_eq!(reader.retrieve("inner"), None);
        assert_eq!(reader.retrieve("real"), Some("1"));
        assert_eq!(reader.sources().len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn dangling_fragment_symlink_aborts_construction() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "app", "a=1");
        fs::create_dir(dir.path().join("app.d")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("missing"), dir.path().join("app.d/05_broken"))
            .unwrap();

        let err = ConfigReader::with_resolver("app", &DirectoryResolver::new(dir.path())).unwrap_err();
        assert!(matches!(err, ConfigError::ReadFile { ref file, .. } if file == "05_broken"));
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[cfg(unix)]
    #[test]
    fn fragment_symlink_to_directory_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "elsewhere/00_inner", "inner=1");
        write(dir.path(), "app.d/20_real", "real=1");
        std::os::unix::fs::symlink(dir.path().join("elsewhere"), dir.path().join("app.d/10_link"))
            .unwrap();

        let reader = ConfigReader::with_resolver("app", &DirectoryResolver::new(dir.path())).unwrap();
        assert_eq!(reader.retrieve("inner"), None);
        assert_eq!(reader.retrieve("real"), Some("1"));
    }

    #[test]
    fn empty_override_directory_yields_empty_table() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("app.d")).unwrap();

        let reader = ConfigReader::with_resolver("app", &DirectoryResolver::new(dir.path())).unwrap();
        assert!(reader.is_empty());
        assert!(reader.sources().is_empty());
    }

    #[test]
    fn override_path_that_is_a_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "app.d", "not=a directory");

        let err = ConfigReader::with_resolver("app", &DirectoryResolver::new(dir.path())).unwrap_err();
        assert!(matches!(err, ConfigError::ReadDirectory { .. }));
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn base_path_that_is_a_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("app")).unwrap();

        let err = ConfigReader::with_resolver("app", &DirectoryResolver::new(dir.path())).unwrap_err();
        assert!(matches!(err, ConfigError::ReadFile { ref file, .. } if file == "app"));
    }

    #[test]
    fn broken_fragment_aborts_construction() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "app", "a=1");
        write(dir.path(), "app.d/00_ok", "b=2");
        write(dir.path(), "app.d/10_bad", "c=\\uZZZZ");

        let err = ConfigReader::with_resolver("app", &DirectoryResolver::new(dir.path())).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.to_string().contains("10_bad"), "got: {err}");
        assert_eq!(err.path(), Some(dir.path().join("app.d/10_bad").as_path()));
    }

    #[cfg(unix)]
    #[test]
    fn closure_resolver_with_file_uri() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "app", "from.uri=yes");
        let base = dir.path().join("app");

        let resolver = |name: &str| {
            (name == "app").then(|| Location::Uri(format!("file://{}", base.display())))
        };
        let reader = ConfigReader::with_resolver("app", &resolver).unwrap();
        assert_eq!(reader.retrieve("from.uri"), Some("yes"));
    }

    #[test]
    fn untranslatable_location_is_io_error_naming_resource() {
        let resolver = |name: &str| {
            (name == "app").then(|| Location::Uri("http://example.com/app".to_string()))
        };
        let err = ConfigReader::with_resolver("app", &resolver).unwrap_err();
        assert!(matches!(err, ConfigError::Location { .. }));
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.to_string().contains("app"));
        assert!(err.to_string().contains("http"));
    }

    #[test]
    fn empty_name_fails_before_resolving() {
        let resolver = |_: &str| -> Option<Location> { panic!("resolver must not be called") };
        let err = ConfigReader::with_resolver("", &resolver).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(err.to_string(), "Can not load configuration for null resource name");
    }

    #[test]
    fn retrieve_or_falls_back_only_when_absent() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "app", "empty=\nset=value");

        let reader = ConfigReader::with_resolver("app", &DirectoryResolver::new(dir.path())).unwrap();
        assert_eq!(reader.retrieve_or("set", "fallback"), "value");
        assert_eq!(reader.retrieve_or("empty", "fallback"), "");
        assert_eq!(reader.retrieve_or("missing", "fallback"), "fallback");
        assert!(reader.contains_key("empty"));
        assert_eq!(reader.len(), 2);
        assert_eq!(reader.resource_name(), "app");
    }
}
