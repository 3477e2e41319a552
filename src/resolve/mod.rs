//! Resource resolution: mapping a resource name to a location on disk.
//!
//! [`ConfigReader`](crate::config::ConfigReader) never looks at the
//! filesystem layout itself. It asks a [`ResourceResolver`] for the base
//! name and for `<name>.d`, and treats each answer as "present at this
//! location" or "absent".

pub mod directory;
pub mod location;
pub mod search_path;

use thiserror::Error;

pub use directory::DirectoryResolver;
pub use location::Location;
pub use search_path::SearchPathResolver;

/// Looks up resources by name.
pub trait ResourceResolver {
    /// Return where `name` lives, or `None` when it does not exist.
    fn resolve(&self, name: &str) -> Option<Location>;
}

impl<F> ResourceResolver for F
where
    F: Fn(&str) -> Option<Location>,
{
    fn resolve(&self, name: &str) -> Option<Location> {
        self(name)
    }
}

/// Errors translating a [`Location`] into a filesystem path.
#[derive(Error, Debug)]
pub enum LocationError {
    #[error("location has no URI scheme: {uri}")]
    MissingScheme { uri: String },

    #[error("unsupported URI scheme '{scheme}' in {uri}")]
    UnsupportedScheme { scheme: String, uri: String },

    #[error("file URI points at remote host '{host}': {uri}")]
    RemoteHost { host: String, uri: String },

    #[error("file URI path is not absolute: {uri}")]
    NotAbsolute { uri: String },

    #[error("file URI must not carry a query or fragment: {uri}")]
    QueryOrFragment { uri: String },

    #[error("malformed percent-escape in {uri}")]
    MalformedEscape { uri: String },

    #[error("percent-escapes in {uri} do not decode to UTF-8: {source}")]
    InvalidEncoding {
        uri: String,
        source: std::string::FromUtf8Error,
    },
}
