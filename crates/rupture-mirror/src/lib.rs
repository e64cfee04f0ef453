//! Instantaneous time mirror (ITM).
//!
//! A [`ParameterMirrorController`] arms two one-shot hooks on a
//! [`SyncRegistry`](rupture_sync::SyncRegistry): a forward scaling by `f`
//! at `t0` and a reverse scaling by `1/f` at `t0 + epsilon`. Each scaling
//! multiplies the density of every owned cell by the factor squared,
//! recomputes the cell-local operators and rescales every cluster step
//! size by the inverse factor. Applying both restores the original state
//! up to rounding.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod controller;
pub mod target;

pub use controller::{apply_scaling, MirrorPair, MirrorReport, ParameterMirrorController};
pub use target::MirrorTarget;
