pub mod calc;
pub mod catalog;
pub mod factors;
