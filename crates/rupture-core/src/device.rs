//! Device memory capability and scoped ownership of device pointer tables.
//!
//! The device API is consumed as an opaque allocate/copy/free capability
//! passed in explicitly; there is no process-wide device singleton.
//! [`BatchPointers`] owns exactly one device allocation holding a table of
//! host-side pointers. Duplicating it deep-copies the allocation
//! ([`BatchPointers::try_clone`]); dropping it always releases it.

use std::sync::Arc;

use crate::error::DeviceError;

/// Address of a device allocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DevicePtr(pub u64);

/// Allocate/copy/free primitives of an accelerator.
pub trait DeviceMemory {
    /// Allocate `bytes` of global device memory.
    fn alloc(&self, bytes: usize) -> Result<DevicePtr, DeviceError>;

    /// Copy host bytes into a device allocation.
    fn copy_to(&self, dst: DevicePtr, src: &[u8]) -> Result<(), DeviceError>;

    /// Copy `bytes` between two device allocations.
    fn copy_between(&self, dst: DevicePtr, src: DevicePtr, bytes: usize)
        -> Result<(), DeviceError>;

    /// Release an allocation. Unknown pointers are ignored.
    fn free(&self, ptr: DevicePtr);
}

const POINTER_BYTES: usize = std::mem::size_of::<u64>();

/// A host pointer table mirrored into one owned device allocation.
///
/// Empty tables own no device memory.
#[derive(Debug)]
pub struct BatchPointers<D: DeviceMemory + ?Sized> {
    pointers: Vec<u64>,
    device_ptrs: Option<DevicePtr>,
    device: Arc<D>,
}

impl<D: DeviceMemory + ?Sized> BatchPointers<D> {
    /// Upload `pointers` to a fresh device allocation.
    pub fn new(device: Arc<D>, pointers: Vec<u64>) -> Result<Self, DeviceError> {
        let mut table = Self {
            pointers,
            device_ptrs: None,
            device,
        };
        if !table.pointers.is_empty() {
            let bytes = table.byte_len();
            let ptr = table.device.alloc(bytes)?;
            // Owned from here on: an early return below still frees it.
            table.device_ptrs = Some(ptr);
            let host: Vec<u8> = table
                .pointers
                .iter()
                .flat_map(|p| p.to_le_bytes())
                .collect();
            table.device.copy_to(ptr, &host)?;
        }
        Ok(table)
    }

    /// Duplicate the table, including a deep copy of the device allocation.
    pub fn try_clone(&self) -> Result<Self, DeviceError> {
        let mut copy = Self {
            pointers: self.pointers.clone(),
            device_ptrs: None,
            device: Arc::clone(&self.device),
        };
        if let Some(src) = self.device_ptrs {
            let bytes = self.byte_len();
            let dst = copy.device.alloc(bytes)?;
            copy.device_ptrs = Some(dst);
            copy.device.copy_between(dst, src, bytes)?;
        }
        Ok(copy)
    }

    /// The device allocation, if the table is non-empty.
    pub fn device_pointers(&self) -> Option<DevicePtr> {
        self.device_ptrs
    }

    /// The host-side pointer values.
    pub fn host_pointers(&self) -> &[u64] {
        &self.pointers
    }

    /// Number of pointers in the table.
    pub fn len(&self) -> usize {
        self.pointers.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.pointers.is_empty()
    }

    fn byte_len(&self) -> usize {
        self.pointers.len() * POINTER_BYTES
    }
}

impl<D: DeviceMemory + ?Sized> Drop for BatchPointers<D> {
    fn drop(&mut self) {
        if let Some(ptr) = self.device_ptrs.take() {
            self.device.free(ptr);
        }
    }
}
