//! Resolved resource locations and their translation to filesystem paths.

use std::fmt;
use std::path::{Path, PathBuf};

use super::LocationError;

/// Where a resolver found a resource.
///
/// Resolvers backed by the filesystem hand out [`Location::Path`]; resolvers
/// fed from manifests or other tooling may hand out `file:` URIs instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Path(PathBuf),
    Uri(String),
}

impl Location {
    /// Translate the location into a local filesystem path.
    ///
    /// Only `file:` URIs are accepted. `file:///abs`, `file:/abs` and
    /// `file://localhost/abs` are understood; percent-escapes are decoded.
    pub fn to_path(&self) -> Result<PathBuf, LocationError> {
        match self {
            Location::Path(path) => Ok(path.clone()),
            Location::Uri(uri) => file_uri_to_path(uri),
        }
    }
}

impl From<PathBuf> for Location {
    fn from(path: PathBuf) -> Self {
        Location::Path(path)
    }
}

impl From<&Path> for Location {
    fn from(path: &Path) -> Self {
        Location::Path(path.to_path_buf())
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Path(path) => write!(f, "{}", path.display()),
            Location::Uri(uri) => f.write_str(uri),
        }
    }
}

fn file_uri_to_path(uri: &str) -> Result<PathBuf, LocationError> {
    let (scheme, rest) = uri
        .split_once(':')
        .ok_or_else(|| LocationError::MissingScheme { uri: uri.to_string() })?;

    if !scheme.eq_ignore_ascii_case("file") {
        return Err(LocationError::UnsupportedScheme {
            scheme: scheme.to_string(),
            uri: uri.to_string(),
        });
    }

    if rest.contains(['?', '#']) {
        return Err(LocationError::QueryOrFragment { uri: uri.to_string() });
    }

    let path = match rest.strip_prefix("//") {
        Some(authority_and_path) => {
            let split = authority_and_path.find('/').unwrap_or(authority_and_path.len());
            let (host, path) = authority_and_path.split_at(split);
            if !host.is_empty() && !host.eq_ignore_ascii_case("localhost") {
                return Err(LocationError::RemoteHost {
                    host: host.to_string(),
                    uri: uri.to_string(),
                });
            }
            path
        }
        None => rest,
    };

    if !path.starts_with('/') {
        return Err(LocationError::NotAbsolute { uri: uri.to_string() });
    }

    if !has_valid_escapes(path) {
        return Err(LocationError::MalformedEscape { uri: uri.to_string() });
    }

    let decoded = urlencoding::decode(path).map_err(|source| LocationError::InvalidEncoding {
        uri: uri.to_string(),
        source,
    })?;

    Ok(platform_path(&decoded))
}

/// Every `%` must introduce exactly two hex digits.
fn has_valid_escapes(path: &str) -> bool {
    let bytes = path.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = bytes.get(i + 1).is_some_and(u8::is_ascii_hexdigit)
                && bytes.get(i + 2).is_some_and(u8::is_ascii_hexdigit);
            if !valid {
                return false;
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    true
}

#[cfg(windows)]
fn platform_path(decoded: &str) -> PathBuf {
    // `/C:/dir` -> `C:/dir`
    let bytes = decoded.as_bytes();
    if bytes.len() >= 3 && bytes[0] == b'/' && bytes[1].is_ascii_alphabetic() && bytes[2] == b':' {
        return PathBuf::from(&decoded[1..]);
    }
    PathBuf::from(decoded)
}

#[cfg(not(windows))]
fn platform_path(decoded: &str) -> PathBuf {
    PathBuf::from(decoded)
}
