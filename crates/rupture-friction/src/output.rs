//! Fault output: which observables are recorded, and frame capture.

use indexmap::IndexMap;
use rupture_core::{ClusterId, ConsistencyFault};

use crate::layout::fields;
use crate::storage::FaultStorage;
use crate::variant::BundleVariant;

/// Output strategy matched to a kernel's observables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OutputKind {
    /// Nothing to record.
    NoFault,
    /// Slip-weakening observables.
    LinearSlipWeakening,
    /// Slip weakening plus the regularised strength.
    LinearSlipWeakeningBimaterial,
    /// Kinematic source observables.
    ImposedSlipRates,
    /// Rate-and-state observables.
    RateAndState,
    /// Rate-and-state plus temperature and pressure.
    RateAndStateThermalPressurization,
}

impl OutputKind {
    /// Recorded fields, in column order.
    pub fn columns(self) -> &'static [&'static str] {
        use fields::*;
        match self {
            Self::NoFault => &[],
            Self::LinearSlipWeakening => &[
                SLIP_RATE,
                SLIP,
                FRICTION_COEFFICIENT,
                STRENGTH,
                RUPTURE_TIME,
                PEAK_SLIP_RATE,
            ],
            Self::LinearSlipWeakeningBimaterial => &[
                SLIP_RATE,
                SLIP,
                FRICTION_COEFFICIENT,
                STRENGTH,
                RUPTURE_TIME,
                PEAK_SLIP_RATE,
                REGULARIZED_STRENGTH,
            ],
            Self::ImposedSlipRates => &[SLIP_RATE, SLIP, RUPTURE_TIME, PEAK_SLIP_RATE],
            Self::RateAndState => &[
                SLIP_RATE,
                SLIP,
                FRICTION_COEFFICIENT,
                STRENGTH,
                RUPTURE_TIME,
                PEAK_SLIP_RATE,
                STATE_VARIABLE,
            ],
            Self::RateAndStateThermalPressurization => &[
                SLIP_RATE,
                SLIP,
                FRICTION_COEFFICIENT,
                STRENGTH,
                RUPTURE_TIME,
                PEAK_SLIP_RATE,
                STATE_VARIABLE,
                TEMPERATURE,
                PRESSURE,
            ],
        }
    }
}

/// Snapshot of one cluster's fault observables.
#[derive(Clone, Debug, PartialEq)]
pub struct OutputFrame {
    /// Simulation time of the snapshot.
    pub time: f64,
    /// Cluster the faces belong to.
    pub cluster: ClusterId,
    /// One column per recorded field.
    pub columns: IndexMap<&'static str, Vec<f64>>,
}

/// Collects [`OutputFrame`]s at synchronization points.
#[derive(Clone, Debug, PartialEq)]
pub struct OutputManager {
    variant: BundleVariant,
    kind: OutputKind,
    frames: Vec<OutputFrame>,
}

impl OutputManager {
    /// Empty manager.
    pub fn new(variant: BundleVariant, kind: OutputKind) -> Self {
        Self {
            variant,
            kind,
            frames: Vec::new(),
        }
    }

    /// Bundle tag.
    pub fn variant(&self) -> BundleVariant {
        self.variant
    }

    /// Output strategy.
    pub fn kind(&self) -> OutputKind {
        self.kind
    }

    /// Snapshot `storage` of `cluster` at `time`.
    pub fn capture(
        &mut self,
        time: f64,
        cluster: ClusterId,
        storage: &FaultStorage,
    ) -> Result<(), ConsistencyFault> {
        if storage.variant() != self.variant {
            return Err(ConsistencyFault::BundleMismatch {
                expected: self.variant.to_string(),
                part: "storage",
                found: storage.variant().to_string(),
            });
        }
        let columns = self
            .kind
            .columns()
            .iter()
            .map(|&name| storage.field(name).map(|values| (name, values.to_vec())))
            .collect::<Result<IndexMap<_, _>, ConsistencyFault>>()?;
        self.frames.push(OutputFrame {
            time,
            cluster,
            columns,
        });
        Ok(())
    }

    /// Frames captured so far.
    pub fn frames(&self) -> &[OutputFrame] {
        &self.frames
    }

    /// Remove and return all captured frames.
    pub fn take_frames(&mut self) -> Vec<OutputFrame> {
        std::mem::take(&mut self.frames)
    }
}
