//! propsd: layered `.properties` configuration (library crate).
//!
//! A resource name such as `app.properties` is loaded from a base file plus
//! an optional `app.properties.d/` directory of `NN_`-prefixed fragments.
//! Fragments load after the base file and in file-name order, each one
//! overriding keys defined before it.
//!
//! ```no_run
//! use propsd::ConfigReader;
//!
//! let config = ConfigReader::new("app.properties")?;
//! let url = config.retrieve("database.url");
//! # Ok::<(), propsd::ConfigError>(())
//! ```

pub mod config;
pub mod constants;
pub mod env;
pub mod properties;
pub mod resolve;

pub use config::{ConfigError, ConfigReader, ErrorKind};
pub use properties::PropertyTable;
pub use resolve::{DirectoryResolver, Location, ResourceResolver, SearchPathResolver};
