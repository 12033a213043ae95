//! Pure formula functions.
//!
//! Every function validates its own inputs and either returns a typed result, a
//! [`Feasibility::NotPossible`](crate::outcome::Feasibility) answer, or
//! [`CalcError::InvalidInput`](crate::CalcError) naming the offending field.
//! Field names are the camelCase names used by the forms.

pub mod conversion;
pub mod lab;
pub mod process;
pub mod production;
pub mod tank;
pub mod weight;
