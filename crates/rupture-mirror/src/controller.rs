//! The paired mirror hooks.

use rupture_config::ItmConfig;
use rupture_core::{CellMaterialData, ConfigurationError, HookId, RuptureError};
use rupture_sync::{Hook, HookCall, SyncEvent, SyncRegistry};
use tracing::info;

use crate::target::MirrorTarget;

/// Handles of the two armed hooks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MirrorPair {
    /// Scaling by `f` at `t0`.
    pub forward: HookId,
    /// Scaling by `1/f` at `t0 + epsilon`.
    pub reverse: HookId,
}

/// What one scaling changed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MirrorReport {
    /// Velocity scaling factor applied.
    pub factor: f64,
    /// Owned cells whose density was rescaled.
    pub cells: usize,
    /// Clusters whose step size was rescaled.
    pub clusters: usize,
}

/// Apply one velocity scaling by `factor` to `target`.
///
/// Densities of owned cells are multiplied by `factor²`, operators are
/// recomputed, and every cluster step size is multiplied by `1/factor`.
pub fn apply_scaling<T>(target: &mut T, factor: f64) -> Result<MirrorReport, RuptureError>
where
    T: MirrorTarget + ?Sized,
{
    let squared = factor * factor;
    let mut affected = Vec::with_capacity(target.materials_mut().local_cell_count());
    target
        .materials_mut()
        .for_each_local_cell_mut(&mut |index, cell: &mut CellMaterialData| {
            cell.rho *= squared;
            affected.push(index);
        });
    target.recompute_operators(&affected)?;

    let clusters = target.clusters_mut();
    clusters.rescale_all(1.0 / factor)?;
    clusters.verify_ratios()?;
    Ok(MirrorReport {
        factor,
        cells: affected.len(),
        clusters: clusters.len(),
    })
}

/// Arms the forward and reverse scalings of an instantaneous time mirror.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParameterMirrorController {
    factor: f64,
    trigger_time: f64,
    epsilon: f64,
}

impl ParameterMirrorController {
    /// Controller scaling by `factor` at `trigger_time` and back at
    /// `trigger_time + epsilon`.
    pub fn new(factor: f64, trigger_time: f64, epsilon: f64) -> Result<Self, ConfigurationError> {
        let controller = Self {
            factor,
            trigger_time,
            epsilon,
        };
        ItmConfig {
            enabled: true,
            trigger_time,
            itm_time: epsilon,
            velocity_scaling_factor: factor,
        }
        .validate()?;
        Ok(controller)
    }

    /// Controller described by `config`, or `None` when the mirror is off.
    pub fn from_config(config: &ItmConfig) -> Result<Option<Self>, ConfigurationError> {
        if !config.enabled {
            return Ok(None);
        }
        Self::new(
            config.velocity_scaling_factor,
            config.trigger_time,
            config.itm_time,
        )
        .map(Some)
    }

    /// Forward scaling factor.
    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// Time of the forward scaling.
    pub fn trigger_time(&self) -> f64 {
        self.trigger_time
    }

    /// Time of the reverse scaling.
    pub fn reverse_time(&self) -> f64 {
        self.trigger_time + self.epsilon
    }

    /// Register both one-shot hooks on [`SyncEvent::SynchronizationPoint`].
    ///
    /// Fails when the two times are no further apart than the registry's
    /// tolerance, since both would then fire at one synchronization point.
    pub fn arm<C>(&self, registry: &mut SyncRegistry<C>) -> Result<MirrorPair, ConfigurationError>
    where
        C: MirrorTarget + 'static,
    {
        if self.epsilon <= registry.tolerance() {
            return Err(ConfigurationError::InvalidValue {
                field: "itmtime".to_owned(),
                reason: format!(
                    "{} does not separate the mirror events under time tolerance {}",
                    self.epsilon,
                    registry.tolerance()
                ),
            });
        }
        let forward = registry.register(Self::hook("itm-forward", self.factor, self.trigger_time))?;
        let reverse =
            registry.register(Self::hook("itm-reverse", 1.0 / self.factor, self.reverse_time()))?;
        info!(
            factor = self.factor,
            trigger_time = self.trigger_time,
            reverse_time = self.reverse_time(),
            "armed instantaneous time mirror"
        );
        Ok(MirrorPair { forward, reverse })
    }

    fn hook<C>(label: &'static str, factor: f64, time: f64) -> Hook<C>
    where
        C: MirrorTarget + 'static,
    {
        Hook::new(
            SyncEvent::SynchronizationPoint,
            label,
            move |call: &mut HookCall<'_, C>| {
                call.disarm();
                let rank = call.rank();
                let now = call.time();
                info!(%rank, time = now, factor, "instantaneous time mirror syncing");
                let report = apply_scaling(call.context(), factor)?;
                info!(
                    %rank,
                    cells = report.cells,
                    clusters = report.clusters,
                    "finished flipping"
                );
                Ok(())
            },
        )
        .one_shot()
        .at(time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_parameters() {
        assert!(ParameterMirrorController::new(0.0, 1.0, 0.1).is_err());
        assert!(ParameterMirrorController::new(2.0, 1.0, 0.0).is_err());
        assert!(ParameterMirrorController::new(2.0, f64::NAN, 0.1).is_err());
        assert!(ParameterMirrorController::new(2.0, 1.0, 1e-10).is_err());
        let c = ParameterMirrorController::new(2.0, 1.0, 0.25).unwrap();
        assert_eq!(c.reverse_time(), 1.25);
    }

    #[test]
    fn disabled_config_yields_no_controller() {
        assert_eq!(
            ParameterMirrorController::from_config(&ItmConfig::default()).unwrap(),
            None
        );
        let config = ItmConfig {
            enabled: true,
            velocity_scaling_factor: 3.0,
            ..ItmConfig::default()
        };
        let c = ParameterMirrorController::from_config(&config).unwrap().unwrap();
        assert_eq!(c.factor(), 3.0);
    }
}
