//! af-core: numeric coercion shared by agriflow crates.
//!
//! Store values arrive loosely typed; these helpers turn them into finite
//! `f64`s without failing.

pub mod numeric;

pub use numeric::{finite_or_zero, parse_lenient};
