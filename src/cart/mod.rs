//! The cart composition & pricing engine.
//!
//! Everything in this module is pure: no database handles, no clocks other
//! than an explicit reference instant. The service layer loads state, calls
//! in here, and persists the result.

pub mod mutation;
pub mod pricing;
pub mod signature;
pub mod totals;
pub mod types;
