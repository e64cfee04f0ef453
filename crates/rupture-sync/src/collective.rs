//! Barrier agreement between ranks before hooks fire.

use crossbeam_channel::{unbounded, Receiver, Sender};
use rupture_core::{CollectiveDesyncFault, Rank};

use crate::event::SyncEvent;

/// What one rank is about to do at a synchronization event.
#[derive(Clone, Debug, PartialEq)]
pub struct SyncDigest {
    /// The event reached.
    pub event: SyncEvent,
    /// Simulation time of the occurrence.
    pub time: f64,
    /// Labels of the hooks due, in firing order.
    pub hooks: Vec<String>,
}

/// Collective barrier across all ranks of a run.
///
/// `agree` returns only once every rank has reached the same event at the
/// same time with the same hooks due, and fails with a
/// [`CollectiveDesyncFault`] naming the first disagreeing peer otherwise.
pub trait Collective {
    /// This rank.
    fn rank(&self) -> Rank;

    /// Number of ranks.
    fn size(&self) -> usize;

    /// Exchange `digest` with every peer and compare.
    fn agree(&mut self, digest: &SyncDigest) -> Result<(), CollectiveDesyncFault>;
}

/// The trivial collective of a single-rank run.
#[derive(Clone, Copy, Debug, Default)]
pub struct SingleRank;

impl Collective for SingleRank {
    fn rank(&self) -> Rank {
        Rank(0)
    }

    fn size(&self) -> usize {
        1
    }

    fn agree(&mut self, _digest: &SyncDigest) -> Result<(), CollectiveDesyncFault> {
        Ok(())
    }
}

/// In-process ranks connected pairwise by unbounded channels.
///
/// Each rank sends its digest to every peer, then receives one digest from
/// each peer in rank order. Per-pair channels are FIFO, so the `k`-th
/// digest received from a peer is that peer's `k`-th event.
#[derive(Debug)]
pub struct ChannelCollective {
    rank: Rank,
    size: usize,
    outgoing: Vec<(Rank, Sender<SyncDigest>)>,
    incoming: Vec<(Rank, Receiver<SyncDigest>)>,
    time_tolerance: f64,
}

impl ChannelCollective {
    /// Relative tolerance when comparing event times.
    pub const TIME_TOLERANCE: f64 = 1e-12;

    /// Build a fully connected group of `size` ranks, indexed by rank.
    pub fn group(size: usize) -> Vec<Self> {
        let mut outgoing: Vec<Vec<(Rank, Sender<SyncDigest>)>> =
            (0..size).map(|_| Vec::new()).collect();
        let mut incoming: Vec<Vec<(Rank, Receiver<SyncDigest>)>> =
            (0..size).map(|_| Vec::new()).collect();
        for from in 0..size {
            for to in 0..size {
                if from == to {
                    continue;
                }
                let (tx, rx) = unbounded();
                outgoing[from].push((Rank(to as u32), tx));
                incoming[to].push((Rank(from as u32), rx));
            }
        }
        outgoing
            .into_iter()
            .zip(incoming)
            .enumerate()
            .map(|(rank, (outgoing, incoming))| Self {
                rank: Rank(rank as u32),
                size,
                outgoing,
                incoming,
                time_tolerance: Self::TIME_TOLERANCE,
            })
            .collect()
    }

    fn compare(
        &self,
        peer: Rank,
        ours: &SyncDigest,
        theirs: &SyncDigest,
    ) -> Result<(), CollectiveDesyncFault> {
        if ours.event != theirs.event {
            return Err(CollectiveDesyncFault::EventMismatch {
                rank: self.rank,
                peer,
                expected: ours.event.name().to_owned(),
                found: theirs.event.name().to_owned(),
            });
        }
        let scale = ours.time.abs().max(1.0);
        if (ours.time - theirs.time).abs() > self.time_tolerance * scale {
            return Err(CollectiveDesyncFault::TimeMismatch {
                rank: self.rank,
                peer,
                event: ours.event.name().to_owned(),
                expected: ours.time,
                found: theirs.time,
            });
        }
        if ours.hooks != theirs.hooks {
            return Err(CollectiveDesyncFault::HookSetMismatch {
                rank: self.rank,
                peer,
                event: ours.event.name().to_owned(),
                expected: ours.hooks.clone(),
                found: theirs.hooks.clone(),
            });
        }
        Ok(())
    }
}

impl Collective for ChannelCollective {
    fn rank(&self) -> Rank {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }

    fn agree(&mut self, digest: &SyncDigest) -> Result<(), CollectiveDesyncFault> {
        let disconnected = |peer: Rank| CollectiveDesyncFault::PeerDisconnected {
            rank: self.rank,
            peer,
            event: digest.event.name().to_owned(),
        };
        for (peer, tx) in &self.outgoing {
            tx.send(digest.clone()).map_err(|_| disconnected(*peer))?;
        }
        for (peer, rx) in &self.incoming {
            let theirs = rx.recv().map_err(|_| disconnected(*peer))?;
            self.compare(*peer, digest, &theirs)?;
        }
        Ok(())
    }
}
