//! Test utilities and mock collaborators for rupture development.
//!
//! Provides mock implementations of the capabilities the core consumes
//! ([`ClusterStepper`], [`OperatorRecompute`], [`DeviceMemory`]) and
//! fixtures for assembling a [`SimulationConfig`](rupture_engine::SimulationConfig).

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use rupture_core::{
    ClusterId, DeviceError, DeviceMemory, DevicePtr, OperatorRecompute, ParameterStore,
    RuptureError,
};
use rupture_engine::ClusterStepper;

/// One recorded [`ClusterStepper::advance`] call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepCall {
    pub cluster: ClusterId,
    pub time: f64,
    pub dt: f64,
}

/// Stepper reporting a constant slip rate on every fault face.
///
/// Calls are recorded into a shared log so tests can inspect them after
/// the stepper moved into a simulator.
#[derive(Clone, Debug, Default)]
pub struct MockStepper {
    faces: HashMap<ClusterId, usize>,
    slip_rate: f64,
    fail_after: Option<usize>,
    calls: Arc<Mutex<Vec<StepCall>>>,
}

impl MockStepper {
    pub fn new(slip_rate: f64) -> Self {
        Self {
            slip_rate,
            ..Self::default()
        }
    }

    /// Report `faces` slip rates for `cluster`.
    pub fn with_faces(mut self, cluster: ClusterId, faces: usize) -> Self {
        self.faces.insert(cluster, faces);
        self
    }

    /// Fail every call after the first `calls`.
    pub fn failing_after(mut self, calls: usize) -> Self {
        self.fail_after = Some(calls);
        self
    }

    /// Shared handle on the call log.
    pub fn calls(&self) -> Arc<Mutex<Vec<StepCall>>> {
        Arc::clone(&self.calls)
    }
}

impl ClusterStepper for MockStepper {
    fn advance(
        &mut self,
        cluster: ClusterId,
        time: f64,
        dt: f64,
    ) -> Result<Vec<f64>, RuptureError> {
        let mut calls = self.calls.lock().map_err(|_| RuptureError::Collaborator {
            name: "mock-stepper".to_owned(),
            reason: "call log poisoned".to_owned(),
        })?;
        if self.fail_after.is_some_and(|limit| calls.len() >= limit) {
            return Err(RuptureError::Collaborator {
                name: "mock-stepper".to_owned(),
                reason: format!("step {} of cluster {cluster} failed", calls.len()),
            });
        }
        calls.push(StepCall { cluster, time, dt });
        let faces = self.faces.get(&cluster).copied().unwrap_or(0);
        Ok(vec![self.slip_rate; faces])
    }
}

/// Operator rebuild that records which cells it was asked to touch, and
/// the density of the first one at that moment.
#[derive(Clone, Debug, Default)]
pub struct RecordingRecompute {
    log: Arc<Mutex<Vec<(Vec<usize>, Option<f64>)>>>,
}

impl RecordingRecompute {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle on the log.
    pub fn log(&self) -> Arc<Mutex<Vec<(Vec<usize>, Option<f64>)>>> {
        Arc::clone(&self.log)
    }
}

impl OperatorRecompute for RecordingRecompute {
    fn recompute_local_operators(
        &mut self,
        materials: &dyn ParameterStore,
        affected: &[usize],
    ) -> Result<(), RuptureError> {
        let mut first = None;
        materials.for_each_local_cell(&mut |index, cell| {
            if Some(&index) == affected.first() {
                first = Some(cell.rho);
            }
        });
        self.log
            .lock()
            .map_err(|_| RuptureError::Collaborator {
                name: "recording-recompute".to_owned(),
                reason: "log poisoned".to_owned(),
            })?
            .push((affected.to_vec(), first));
        Ok(())
    }
}

/// Host-memory device that counts allocations and frees.
#[derive(Debug, Default)]
pub struct CountingDevice {
    next: AtomicUsize,
    allocations: Mutex<HashMap<u64, Vec<u8>>>,
    allocs: AtomicUsize,
    frees: AtomicUsize,
    capacity: Option<usize>,
}

impl CountingDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Device that refuses allocations once `bytes` are live.
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            capacity: Some(bytes),
            ..Self::default()
        }
    }

    pub fn allocs(&self) -> usize {
        self.allocs.load(Ordering::SeqCst)
    }

    pub fn frees(&self) -> usize {
        self.frees.load(Ordering::SeqCst)
    }

    /// Allocations not yet freed.
    pub fn live(&self) -> usize {
        self.allocations.lock().map(|a| a.len()).unwrap_or(0)
    }

    /// Contents of a live allocation.
    pub fn contents(&self, ptr: DevicePtr) -> Option<Vec<u8>> {
        self.allocations.lock().ok()?.get(&ptr.0).cloned()
    }

    fn live_bytes(allocations: &HashMap<u64, Vec<u8>>) -> usize {
        allocations.values().map(Vec::len).sum()
    }
}

impl DeviceMemory for CountingDevice {
    fn alloc(&self, bytes: usize) -> Result<DevicePtr, DeviceError> {
        let mut allocations = self
            .allocations
            .lock()
            .map_err(|_| DeviceError::AllocationFailed { bytes })?;
        if let Some(capacity) = self.capacity {
            if Self::live_bytes(&allocations) + bytes > capacity {
                return Err(DeviceError::AllocationFailed { bytes });
            }
        }
        let id = (self.next.fetch_add(1, Ordering::SeqCst) as u64 + 1) * 0x1000;
        allocations.insert(id, vec![0; bytes]);
        self.allocs.fetch_add(1, Ordering::SeqCst);
        Ok(DevicePtr(id))
    }

    fn copy_to(&self, dst: DevicePtr, src: &[u8]) -> Result<(), DeviceError> {
        let mut allocations = self
            .allocations
            .lock()
            .map_err(|_| DeviceError::InvalidPointer { ptr: dst.0 })?;
        let buf = allocations
            .get_mut(&dst.0)
            .ok_or(DeviceError::InvalidPointer { ptr: dst.0 })?;
        if src.len() > buf.len() {
            return Err(DeviceError::OutOfBounds {
                bytes: src.len(),
                capacity: buf.len(),
            });
        }
        buf[..src.len()].copy_from_slice(src);
        Ok(())
    }

    fn copy_between(&self, dst: DevicePtr, src: DevicePtr, bytes: usize) -> Result<(), DeviceError> {
        let mut allocations = self
            .allocations
            .lock()
            .map_err(|_| DeviceError::InvalidPointer { ptr: src.0 })?;
        let source = allocations
            .get(&src.0)
            .ok_or(DeviceError::InvalidPointer { ptr: src.0 })?;
        if bytes > source.len() {
            return Err(DeviceError::OutOfBounds {
                bytes,
                capacity: source.len(),
            });
        }
        let data = source[..bytes].to_vec();
        let buf = allocations
            .get_mut(&dst.0)
            .ok_or(DeviceError::InvalidPointer { ptr: dst.0 })?;
        if bytes > buf.len() {
            return Err(DeviceError::OutOfBounds {
                bytes,
                capacity: buf.len(),
            });
        }
        buf[..bytes].copy_from_slice(&data);
        Ok(())
    }

    fn free(&self, ptr: DevicePtr) {
        if let Ok(mut allocations) = self.allocations.lock() {
            if allocations.remove(&ptr.0).is_some() {
                self.frees.fetch_add(1, Ordering::SeqCst);
            }
        }
    }
}
