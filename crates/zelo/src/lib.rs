//! Facade crate for the Zelopack calculators and shared modules.
//! Re-exports domain/kernel primitives and aggregates feature initialization.
//! Keep this crate thin: it composes other crates and holds no formulas.
//!
//! ## Usage
//! - Add `zelo` with the `server` feature for the HTTP API.
//! - Call `zelo::init` (server) to register feature slices.

pub use zelo_domain as domain;
pub use zelo_factors as factors;
pub use zelo_kernel as kernel;

#[cfg(feature = "server")]
pub mod server {
    pub use zelo_kernel::server::{ApiState, ApiStateError, system_router};

    pub mod router {
        pub use zelo_calculators::server::router as calculators_router;
    }
}

/// Feature registry for runtime introspection.
pub mod features {
    pub use zelo_calculators as calculators;

    /// Build-time enabled features (by Cargo feature).
    pub const ENABLED: &[&str] = &[
        "calculators",
        #[cfg(feature = "server")]
        "server",
    ];
}

/// Initialize all enabled features for server mode.
///
/// # Errors
/// Returns an error if any feature initialization fails.
#[cfg(feature = "server")]
pub fn init(
    factors: &factors::FactorStore,
) -> Result<Vec<domain::registry::InitializedSlice>, Box<dyn std::error::Error>> {
    let slices = vec![features::calculators::init(factors.clone())?];

    Ok(slices)
}

#[cfg(test)]
mod tests {
    use super::features;

    #[test]
    fn calculators_are_always_enabled() {
        assert_eq!(features::ENABLED[0], "calculators");
        assert_eq!(features::ENABLED.contains(&"server"), cfg!(feature = "server"));
    }
}
