//! Error taxonomy for the Rupture simulation core.
//!
//! Three fatal families, each unrecoverable at the point of detection:
//! configuration errors (bad input), consistency faults (a structural
//! invariant was broken by a programming defect) and collective desync
//! faults (ranks disagree about a synchronization point). None of them is
//! retried; they propagate to process termination with a descriptive
//! message. [`RuptureError`] wraps them for call sites that can see more
//! than one family.

use thiserror::Error;

use crate::friction_law::FrictionLawKind;
use crate::id::{ClusterId, Rank};

/// Bad or unsupported configuration, surfaced before any simulation step.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigurationError {
    /// The friction law is recognised but currently disabled.
    #[error("friction law {kind} is currently disabled")]
    DisabledFrictionLaw {
        /// The disabled kind.
        kind: FrictionLawKind,
    },
    /// The friction law discriminant is outside the enumeration.
    #[error("unknown friction law '{value}'")]
    UnknownFrictionLaw {
        /// The raw value read from the configuration.
        value: String,
    },
    /// A required field was absent.
    #[error("field '{field}' was not found, but it is required: {message}")]
    MissingField {
        /// Field name (lower-cased).
        field: String,
        /// What the field is needed for.
        message: String,
    },
    /// A field was present but held a value of the wrong type or range.
    #[error("invalid value for field '{field}': {reason}")]
    InvalidValue {
        /// Field name (lower-cased).
        field: String,
        /// Description of the problem.
        reason: String,
    },
    /// An enumerated field held a value outside its allowed set.
    #[error("field '{field}' had an invalid enum value: {value}")]
    InvalidEnumValue {
        /// Field name (lower-cased).
        field: String,
        /// The rejected value.
        value: String,
    },
    /// The parameter document could not be parsed.
    #[error("malformed parameter file: {reason}")]
    Malformed {
        /// Parser diagnostic.
        reason: String,
    },
    /// The parameter file could not be read.
    #[error("failed to read parameter file {path}: {reason}")]
    Io {
        /// Path that was being read.
        path: String,
        /// Underlying I/O error text.
        reason: String,
    },
}

/// A structural invariant was violated. Indicates a programming defect.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConsistencyFault {
    /// A stored neighbour ratio disagrees with the live step-size quotient.
    #[error(
        "cluster {cluster}: stored ratio to neighbour {neighbor} is {stored}, \
         live step sizes give {expected}"
    )]
    RatioMismatch {
        /// The cluster owning the neighbour record.
        cluster: ClusterId,
        /// The neighbour referenced by the record.
        neighbor: ClusterId,
        /// Ratio held in the record.
        stored: f64,
        /// `neighbor.step_size / cluster.step_size`.
        expected: f64,
    },
    /// A cluster ID was not present in the graph.
    #[error("cluster {cluster} is not part of the cluster graph")]
    UnknownCluster {
        /// The missing cluster.
        cluster: ClusterId,
    },
    /// A cluster ID was registered twice.
    #[error("cluster {cluster} registered twice")]
    DuplicateCluster {
        /// The duplicated cluster.
        cluster: ClusterId,
    },
    /// A step size was NaN, infinite, zero or negative.
    #[error("cluster {cluster}: step size must be finite and positive, got {value}")]
    InvalidStepSize {
        /// The offending cluster.
        cluster: ClusterId,
        /// The offending value.
        value: f64,
    },
    /// A rescaling factor was NaN, infinite, zero or negative.
    #[error("rescaling factor must be finite and positive, got {factor}")]
    InvalidFactor {
        /// The offending factor.
        factor: f64,
    },
    /// A product bundle part was tagged with a different variant.
    #[error("product bundle for {expected}: part '{part}' is tagged {found}")]
    BundleMismatch {
        /// The bundle's own variant.
        expected: String,
        /// Which of the four parts disagreed.
        part: &'static str,
        /// The variant the part carries.
        found: String,
    },
    /// Fault storage does not match the layout the kernel expects.
    #[error("fault storage field '{field}': {reason}")]
    StorageMismatch {
        /// The field that is missing or mis-sized.
        field: String,
        /// Description of the mismatch.
        reason: String,
    },
    /// A cluster was mid-step when a synchronization point was reached.
    #[error("cluster {cluster} is at t={time}, not at synchronization point t={sync_time}")]
    ClusterNotAtSyncPoint {
        /// The lagging or overshooting cluster.
        cluster: ClusterId,
        /// The cluster's own time.
        time: f64,
        /// The synchronization time.
        sync_time: f64,
    },
}

/// Ranks disagree about a collective synchronization point.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum CollectiveDesyncFault {
    /// A peer reached a different event.
    #[error("rank {rank}: reached event '{expected}' but rank {peer} reached '{found}'")]
    EventMismatch {
        /// Reporting rank.
        rank: Rank,
        /// Disagreeing peer.
        peer: Rank,
        /// Event on the reporting rank.
        expected: String,
        /// Event on the peer.
        found: String,
    },
    /// A peer reached the same event at a different simulation time.
    #[error(
        "rank {rank}: event '{event}' at t={expected} but rank {peer} is at t={found}"
    )]
    TimeMismatch {
        /// Reporting rank.
        rank: Rank,
        /// Disagreeing peer.
        peer: Rank,
        /// Event name.
        event: String,
        /// Time on the reporting rank.
        expected: f64,
        /// Time on the peer.
        found: f64,
    },
    /// A peer would fire a different set or order of hooks.
    #[error(
        "rank {rank}: event '{event}' fires hooks {expected:?} but rank {peer} fires {found:?}"
    )]
    HookSetMismatch {
        /// Reporting rank.
        rank: Rank,
        /// Disagreeing peer.
        peer: Rank,
        /// Event name.
        event: String,
        /// Hook labels due on the reporting rank.
        expected: Vec<String>,
        /// Hook labels due on the peer.
        found: Vec<String>,
    },
    /// A peer left the collective before reaching the event.
    #[error("rank {rank}: rank {peer} disconnected before reaching event '{event}'")]
    PeerDisconnected {
        /// Reporting rank.
        rank: Rank,
        /// Vanished peer.
        peer: Rank,
        /// Event name.
        event: String,
    },
}

/// Failures of the device memory capability.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DeviceError {
    /// The device could not satisfy an allocation.
    #[error("device allocation of {bytes} bytes failed")]
    AllocationFailed {
        /// Requested size.
        bytes: usize,
    },
    /// A pointer did not refer to a live allocation.
    #[error("device pointer {ptr:#x} does not refer to a live allocation")]
    InvalidPointer {
        /// The stale pointer.
        ptr: u64,
    },
    /// A copy would run past the end of an allocation.
    #[error("copy of {bytes} bytes exceeds allocation of {capacity} bytes")]
    OutOfBounds {
        /// Bytes requested.
        bytes: usize,
        /// Size of the allocation.
        capacity: usize,
    },
}

/// Any fatal error raised by the core.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum RuptureError {
    /// See [`ConfigurationError`].
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
    /// See [`ConsistencyFault`].
    #[error("consistency fault: {0}")]
    Consistency(#[from] ConsistencyFault),
    /// See [`CollectiveDesyncFault`].
    #[error("collective desync: {0}")]
    Desync(#[from] CollectiveDesyncFault),
    /// See [`DeviceError`].
    #[error("device: {0}")]
    Device(#[from] DeviceError),
    /// An external collaborator (numerical layer) failed.
    #[error("collaborator '{name}' failed: {reason}")]
    Collaborator {
        /// Name of the collaborator.
        name: String,
        /// Its diagnostic.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_law_names_the_kind() {
        let err = ConfigurationError::DisabledFrictionLaw {
            kind: FrictionLawKind::RateAndStateAgingNucleation,
        };
        assert_eq!(
            err.to_string(),
            "friction law RateAndStateAgingNucleation (101) is currently disabled"
        );
    }

    #[test]
    fn desync_names_rank_and_event() {
        let err = CollectiveDesyncFault::EventMismatch {
            rank: Rank(1),
            peer: Rank(0),
            expected: "synchronization_point".into(),
            found: "shutdown".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("rank 1"));
        assert!(msg.contains("synchronization_point"));
    }

    #[test]
    fn wrapping_preserves_source_message() {
        let fault = ConsistencyFault::UnknownCluster {
            cluster: ClusterId(9),
        };
        let err: RuptureError = fault.clone().into();
        assert_eq!(err, RuptureError::Consistency(fault));
        assert!(err.to_string().contains("cluster 9"));
    }
}
