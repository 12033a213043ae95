//! # Calculators
//!
//! The plant's calculator formulas as a stateless library: net weight and
//! tolerance, Brix/acidity ratio, density, titratable acidity, tank dilution and
//! blending, unit conversions and the rest of the [`catalog`].
//!
//! * [`engine`] holds the pure formulas. Each validates its inputs and returns a
//!   typed result, a [`Feasibility::NotPossible`] answer, or a
//!   [`CalcError::InvalidInput`] naming the offending field.
//! * [`binder`] turns raw form fields into a [`Calculation`] and renders the
//!   result as a [`CalculationReport`].
//! * Under the `server` feature, [`server`] exposes the HTTP routes and [`init`]
//!   registers the slice with the kernel.
//!
//! ```rust
//! use zelo_calculators::engine::tank::tank_dilution;
//!
//! let dilution = tank_dilution(65.0, 11.0, 100.0).unwrap().possible().unwrap();
//! assert!((dilution.water_to_add - 490.91).abs() < 0.01);
//! ```

pub mod binder;
pub mod catalog;
pub mod engine;
mod error;
pub mod input;
pub mod outcome;
#[cfg(feature = "server")]
pub mod server;

pub use crate::binder::{Calculation, CalculationReport, CalculationRequest, calculate};
pub use crate::catalog::{CalculatorKind, Category, Descriptor};
pub use crate::error::{CalcError, CalcErrorExt};
pub use crate::input::{FieldValue, FormFields, ListItem};
pub use crate::outcome::{Feasibility, Metric, Outcome};

#[cfg(feature = "server")]
use zelo_factors::FactorStore;
#[cfg(feature = "server")]
use zelo_kernel::domain::registry::{InitializedSlice, SliceStatus};

/// Calculators feature state.
#[cfg(feature = "server")]
#[zelo_derive::zelo_slice(status = factor_status)]
pub struct Calculators {
    /// Active conversion factors, shared with the factor endpoints.
    pub factors: FactorStore,
}

#[cfg(feature = "server")]
impl Calculators {
    /// Degraded while the defaults stand in for a factor source that failed to load.
    fn factor_status(&self) -> SliceStatus {
        match self.factors.snapshot().warning {
            Some(warning) => SliceStatus::Degraded(format!("conversion factors: {warning}")),
            None => SliceStatus::Ready,
        }
    }
}

/// Initialize the calculators feature around the process-wide factor store.
///
/// # Errors
/// Currently infallible; the signature matches the other slice initializers.
#[cfg(feature = "server")]
pub fn init(factors: FactorStore) -> Result<InitializedSlice, CalcError> {
    let snapshot = factors.snapshot();
    tracing::info!(origin = %snapshot.origin, "Calculators server slice initialized");

    let slice = Calculators::new(CalculatorsInner { factors });

    Ok(InitializedSlice::new(slice))
}
