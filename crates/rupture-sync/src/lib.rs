//! Hooks fired collectively at named synchronization events.
//!
//! A [`SyncRegistry`] owns an ordered list of hooks. The driver calls
//! [`SyncRegistry::fire`] at each event; before any hook runs, every rank
//! agrees through a [`Collective`] on the event, the simulation time and
//! the labels of the hooks about to fire. Hooks then run in registration
//! order with mutable access to a caller-supplied context.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod collective;
pub mod event;
pub mod hook;
pub mod registry;

pub use collective::{ChannelCollective, Collective, SingleRank, SyncDigest};
pub use event::SyncEvent;
pub use hook::{Hook, HookCall, HookFn, HookMode, HookState, Schedule};
pub use registry::{FireReport, SyncRegistry, DEFAULT_TIME_TOLERANCE};
