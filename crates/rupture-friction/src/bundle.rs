//! The atomic product of the factory.

use rupture_core::ConsistencyFault;

use crate::initializer::ModelInitializer;
use crate::kernel::FrictionKernel;
use crate::layout::StorageLayoutDescriptor;
use crate::output::OutputManager;
use crate::storage::FaultStorage;
use crate::variant::BundleVariant;

/// Storage layout, initializer, kernel and output manager for one
/// friction model.
///
/// Only [`FrictionModelFactory`](crate::FrictionModelFactory) builds
/// bundles, and only whole: every part carries the same
/// [`BundleVariant`].
#[derive(Clone, Debug, PartialEq)]
pub struct ProductBundle {
    variant: BundleVariant,
    layout: StorageLayoutDescriptor,
    initializer: ModelInitializer,
    kernel: FrictionKernel,
    output: OutputManager,
}

/// The parts of a [`ProductBundle`] after ownership moved to the driver.
#[derive(Clone, Debug, PartialEq)]
pub struct BundleParts {
    /// Shared tag.
    pub variant: BundleVariant,
    /// Per-face field layout.
    pub layout: StorageLayoutDescriptor,
    /// Initial state.
    pub initializer: ModelInitializer,
    /// Physics update.
    pub kernel: FrictionKernel,
    /// Output strategy.
    pub output: OutputManager,
}

impl ProductBundle {
    pub(crate) fn new(
        variant: BundleVariant,
        layout: StorageLayoutDescriptor,
        initializer: ModelInitializer,
        kernel: FrictionKernel,
        output: OutputManager,
    ) -> Self {
        Self {
            variant,
            layout,
            initializer,
            kernel,
            output,
        }
    }

    /// Shared tag.
    pub fn variant(&self) -> BundleVariant {
        self.variant
    }

    /// Per-face field layout.
    pub fn layout(&self) -> &StorageLayoutDescriptor {
        &self.layout
    }

    /// Initial state.
    pub fn initializer(&self) -> &ModelInitializer {
        &self.initializer
    }

    /// Physics update.
    pub fn kernel(&self) -> &FrictionKernel {
        &self.kernel
    }

    /// Output strategy.
    pub fn output(&self) -> &OutputManager {
        &self.output
    }

    /// Check that every part carries the bundle's tag.
    pub fn verify(&self) -> Result<(), ConsistencyFault> {
        let parts = [
            ("layout", self.layout.variant()),
            ("initializer", self.initializer.variant()),
            ("kernel", self.kernel.variant()),
            ("output", self.output.variant()),
        ];
        for (part, found) in parts {
            if found != self.variant {
                return Err(ConsistencyFault::BundleMismatch {
                    expected: self.variant.to_string(),
                    part,
                    found: found.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Hand every part over to the driver.
    pub fn into_parts(self) -> BundleParts {
        BundleParts {
            variant: self.variant,
            layout: self.layout,
            initializer: self.initializer,
            kernel: self.kernel,
            output: self.output,
        }
    }
}

impl BundleParts {
    /// Allocate and initialize storage for `face_count` faces.
    pub fn allocate_storage(&self, face_count: usize) -> Result<FaultStorage, ConsistencyFault> {
        let mut storage = FaultStorage::allocate(&self.layout, face_count);
        self.initializer.initialize(&mut storage)?;
        Ok(storage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::initializer::InitializerKind;
    use crate::kernel::FrictionLaw;
    use crate::layout::LayoutKind;
    use crate::output::OutputKind;
    use rupture_config::DRConfig;
    use rupture_core::FrictionLawKind;

    fn bundle_with_kernel_variant(kernel_variant: BundleVariant) -> ProductBundle {
        let config = DRConfig::new(FrictionLawKind::NoFault);
        let variant = BundleVariant::resolve(FrictionLawKind::NoFault, false);
        ProductBundle::new(
            variant,
            StorageLayoutDescriptor::new(variant, LayoutKind::Base),
            ModelInitializer::new(variant, InitializerKind::NoFault, config.clone()),
            FrictionKernel::new(kernel_variant, FrictionLaw::NoFault, config),
            OutputManager::new(variant, OutputKind::NoFault),
        )
    }

    #[test]
    fn consistent_bundle_verifies() {
        let variant = BundleVariant::resolve(FrictionLawKind::NoFault, false);
        bundle_with_kernel_variant(variant).verify().unwrap();
    }

    #[test]
    fn mismatched_part_is_a_consistency_fault() {
        let other = BundleVariant::resolve(FrictionLawKind::LinearSlipWeakening, false);
        let err = bundle_with_kernel_variant(other).verify().unwrap_err();
        assert!(matches!(
            err,
            ConsistencyFault::BundleMismatch { part: "kernel", .. }
        ));
    }

    #[test]
    fn parts_allocate_initialized_storage() {
        let variant = BundleVariant::resolve(FrictionLawKind::NoFault, false);
        let parts = bundle_with_kernel_variant(variant).into_parts();
        let storage = parts.allocate_storage(4).unwrap();
        assert_eq!(storage.face_count(), 4);
        assert_eq!(storage.field("normal_stress").unwrap()[0], -120e6);
    }
}
