//! Pure board rules.
//!
//! These functions inspect a [`Board`](crate::Board) without mutating it.
//! The engine decides what to do with their results.

pub mod boop;
pub mod lines;

pub use boop::{Boop, BoopOutcome, candidates, plan};
pub use lines::{Axis, PendingLine, is_all_cats, line_through, pending_lines, scan};
