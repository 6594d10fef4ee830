//! Test support: serializable tree dumps and structural invariant checks.
//!
//! - **`normalize`**: converts a parsed tree to a stable, serializable
//!   [`Snap`](normalize::Snap) for readable assertions.
//! - **`invariants`**: runtime checks that hold for every parse of every
//!   input (spans in bounds, children contained/ordered/disjoint, strict
//!   section-level and list-indent nesting, verbatim blocks are leaves).

pub mod invariants;
pub mod normalize;

pub use invariants::check as invariants;
pub use normalize::{NodeSnap, Snap, normalize};
