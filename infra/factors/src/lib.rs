//! # Conversion Factors
//!
//! Resolves the conversion factors used by the calculators and keeps the active set
//! for a running process.
//!
//! * [`FactorLoader`] reads overrides from a remote URL (HTTP `GET`, flat JSON map)
//!   or a local JSON file. Every failure degrades to the built-in defaults and is
//!   reported as a warning on [`LoadedFactors`]; loading itself never fails.
//! * [`FactorStore`] shares the active factors across request handlers. Replacing
//!   them is last-write-wins and optionally persisted back to the override file.
//!
//! ## Example
//!
//! ```rust,no_run
//! use zelo_factors::{FactorLoader, FactorSource};
//!
//! # async fn example() {
//! let loaded = FactorLoader::new(FactorSource::File("factors.json".into())).load().await;
//! if let Some(warning) = &loaded.warning {
//!     eprintln!("using default factors: {warning}");
//! }
//! println!("citric acid factor: {}", loaded.factors.citric_acid);
//! # }
//! ```

mod error;
mod loader;
mod store;

pub use crate::error::{FactorError, FactorErrorExt};
pub use crate::loader::{FactorLoader, FactorOrigin, FactorSource, LoadedFactors};
pub use crate::store::FactorStore;
pub use zelo_domain::factors::{ConversionFactors, FactorMap};
