//! Kernel utilities shared across slices.
//! Keep this crate lightweight: configuration loading and, behind the `server`
//! feature, the shared API state and system routes.
//!
//! ## Config loading
//! ```rust,no_run
//! use std::path::Path;
//! use zelo_kernel::config::{ConfigFile, load_config};
//! use zelo_kernel::domain::config::ApiConfig;
//!
//! let cfg: ApiConfig = load_config(ConfigFile::Optional(Path::new("server"))).unwrap_or_default();
//! println!("listening on port {}", cfg.server.port);
//! ```

pub mod config;
#[cfg(feature = "server")]
pub mod server;

pub use zelo_domain as domain;
