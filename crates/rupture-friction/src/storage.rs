//! Per-face fault state allocated from a layout.

use indexmap::IndexMap;
use rupture_core::ConsistencyFault;

use crate::layout::{LayoutKind, StorageLayoutDescriptor};
use crate::variant::BundleVariant;

/// Resolved position of a field inside a [`FaultStorage`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldIndex(usize);

/// Structure-of-arrays fault state: one column per layout field.
#[derive(Clone, Debug, PartialEq)]
pub struct FaultStorage {
    variant: BundleVariant,
    layout: LayoutKind,
    face_count: usize,
    columns: IndexMap<&'static str, Vec<f64>>,
}

impl FaultStorage {
    /// Allocate `face_count` faces with every field at its default.
    pub fn allocate(layout: &StorageLayoutDescriptor, face_count: usize) -> Self {
        let columns = layout
            .fields()
            .iter()
            .map(|(name, def)| (*name, vec![def.default; face_count]))
            .collect();
        Self {
            variant: layout.variant(),
            layout: layout.kind(),
            face_count,
            columns,
        }
    }

    /// Tag of the layout this storage was allocated from.
    pub fn variant(&self) -> BundleVariant {
        self.variant
    }

    /// Layout family.
    pub fn layout_kind(&self) -> LayoutKind {
        self.layout
    }

    /// Number of fault faces.
    pub fn face_count(&self) -> usize {
        self.face_count
    }

    /// Field names in storage order.
    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.keys().copied()
    }

    /// Resolve `name`.
    pub fn index(&self, name: &str) -> Result<FieldIndex, ConsistencyFault> {
        self.columns
            .get_index_of(name)
            .map(FieldIndex)
            .ok_or_else(|| ConsistencyFault::StorageMismatch {
                field: name.to_owned(),
                reason: format!("not part of the {:?} layout", self.layout),
            })
    }

    /// Column at `index`.
    pub fn values(&self, index: FieldIndex) -> &[f64] {
        &self.columns[index.0]
    }

    /// Mutable column at `index`.
    pub fn values_mut(&mut self, index: FieldIndex) -> &mut [f64] {
        &mut self.columns[index.0]
    }

    /// Value of one face.
    pub fn get(&self, index: FieldIndex, face: usize) -> f64 {
        self.columns[index.0][face]
    }

    /// Overwrite one face.
    pub fn set(&mut self, index: FieldIndex, face: usize, value: f64) {
        self.columns[index.0][face] = value;
    }

    /// Column called `name`.
    pub fn field(&self, name: &str) -> Result<&[f64], ConsistencyFault> {
        let index = self.index(name)?;
        Ok(self.values(index))
    }

    /// Set every face of `name` to `value`.
    pub fn fill(&mut self, name: &str, value: f64) -> Result<(), ConsistencyFault> {
        let index = self.index(name)?;
        self.values_mut(index).fill(value);
        Ok(())
    }

    /// Check that this storage was allocated from `layout`.
    pub fn check_layout(&self, layout: &StorageLayoutDescriptor) -> Result<(), ConsistencyFault> {
        if self.variant != layout.variant() {
            return Err(ConsistencyFault::BundleMismatch {
                expected: layout.variant().to_string(),
                part: "storage",
                found: self.variant.to_string(),
            });
        }
        for name in layout.fields().keys() {
            self.index(name)?;
        }
        Ok(())
    }
}
