//! The run loop.
//!
//! # Ownership model
//!
//! [`Simulator`] owns every piece of mutable state. Hooks reach that state
//! only through the [`SimulationContext`] handed to them while the
//! registry fires, so no hook can observe a cluster mid-step.

use indexmap::IndexMap;
use rupture_core::{ClusterId, ConsistencyFault, HookId, Rank, RuptureError};
use rupture_friction::{FrictionKernel, FrictionModelFactory, OutputFrame, OutputManager};
use rupture_mirror::{MirrorPair, ParameterMirrorController};
use rupture_sync::{Collective, FireReport, Hook, SyncEvent, SyncRegistry};
use tracing::{debug, info};

use crate::config::SimulationConfig;
use crate::context::SimulationContext;
use crate::metrics::RunSummary;
use crate::stepper::ClusterStepper;

const _: () = {
    #[allow(dead_code)]
    fn assert_send<T: Send>() {}
    #[allow(dead_code)]
    fn check() {
        assert_send::<Simulator>();
    }
};

/// Drives one rank of a simulation from construction to shutdown.
///
/// # Example
///
/// ```ignore
/// let mut sim = Simulator::new(config)?;
/// let summary = sim.run()?;
/// for frame in sim.take_frames() {
///     write_frame(&frame);
/// }
/// ```
pub struct Simulator {
    context: SimulationContext,
    registry: SyncRegistry<SimulationContext>,
    collective: Box<dyn Collective + Send>,
    stepper: Box<dyn ClusterStepper + Send>,
    kernel: FrictionKernel,
    output: OutputManager,
    cluster_times: IndexMap<ClusterId, f64>,
    end_time: f64,
    mirror: Option<MirrorPair>,
    summary: RunSummary,
    finished: bool,
}

impl Simulator {
    /// Validate `config`, register its hooks, arm the time mirror if
    /// enabled and build the fault model.
    ///
    /// Fires `PreLtsInit`, `PostLtsInit`, `PreModel` and `PostModel` at
    /// time zero, each behind the collective barrier.
    pub fn new(config: SimulationConfig) -> Result<Self, RuptureError> {
        config.validate()?;
        let SimulationConfig {
            parameters,
            clusters,
            fault_faces,
            materials,
            operators,
            stepper,
            collective,
            hooks,
        } = config;

        let mut registry = SyncRegistry::new();
        for hook in hooks {
            registry.register(hook)?;
        }
        let mirror = match ParameterMirrorController::from_config(&parameters.itm)? {
            Some(controller) => Some(controller.arm(&mut registry)?),
            None => None,
        };

        let cluster_times = clusters.local_clusters().map(|c| (c.id(), 0.0)).collect();
        let bundle = FrictionModelFactory::produce(&parameters.dynamic_rupture)?;
        bundle.verify()?;
        let parts = bundle.into_parts();

        let mut sim = Self {
            context: SimulationContext {
                clusters,
                materials,
                operators,
                faults: IndexMap::new(),
                time: 0.0,
            },
            registry,
            collective,
            stepper,
            kernel: parts.kernel.clone(),
            output: parts.output.clone(),
            cluster_times,
            end_time: parameters.time_stepping.end_time,
            mirror,
            summary: RunSummary::default(),
            finished: false,
        };

        sim.fire(SyncEvent::PreLtsInit)?;
        sim.context.clusters.verify_ratios()?;
        sim.fire(SyncEvent::PostLtsInit)?;

        sim.fire(SyncEvent::PreModel)?;
        for (cluster, faces) in fault_faces {
            let storage = parts.allocate_storage(faces)?;
            debug!(%cluster, faces, "allocated fault storage");
            sim.context.faults.insert(cluster, storage);
        }
        sim.fire(SyncEvent::PostModel)?;
        Ok(sim)
    }

    /// Run to the configured end time.
    ///
    /// Calling `run` again after it returned successfully only returns the
    /// summary.
    pub fn run(&mut self) -> Result<RunSummary, RuptureError> {
        if self.finished {
            return Ok(self.summary.clone());
        }
        let rank = self.rank();
        let tolerance = self.registry.tolerance();

        self.fire(SyncEvent::SimulationStart)?;
        info!(%rank, end_time = self.end_time, "Starting simulation");

        while self.context.time < self.end_time - tolerance {
            let target = if self.registry.has_overdue_sync(self.context.time) {
                self.context.time
            } else {
                self.registry
                    .next_sync_time(self.context.time)
                    .map_or(self.end_time, |t| t.min(self.end_time))
            };
            self.advance_to(target)?;
            self.context.time = target;
            self.capture(target)?;
            self.fire(SyncEvent::SynchronizationPoint)?;
            self.summary.sync_points += 1;
            debug!(%rank, time = target, "passed synchronization point");
        }

        self.fire(SyncEvent::Shutdown)?;
        self.summary.end_time = self.context.time;
        self.finished = true;
        info!(%rank, steps = self.summary.total_steps(), "Simulation done");
        Ok(self.summary.clone())
    }

    /// Advance every local cluster to `target`, truncating the last step.
    ///
    /// A cluster whose step no longer moves its clock stops short and is
    /// reported as not having reached the synchronization point.
    fn advance_to(&mut self, target: f64) -> Result<(), RuptureError> {
        let tolerance = self.registry.tolerance();
        for (&cluster, time) in self.cluster_times.iter_mut() {
            let step = self.context.clusters.step_size(cluster)?;
            while *time < target - tolerance {
                let dt = step.min(target - *time);
                if *time + dt <= *time {
                    break;
                }
                let slip_rates = self.stepper.advance(cluster, *time, dt)?;
                if let Some(storage) = self.context.faults.get_mut(&cluster) {
                    self.kernel.evaluate(storage, *time, dt, &slip_rates)?;
                }
                *time += dt;
                *self.summary.cluster_steps.entry(cluster).or_default() += 1;
            }
            *time = settle(cluster, *time, target, tolerance)?;
        }
        Ok(())
    }

    fn capture(&mut self, time: f64) -> Result<(), RuptureError> {
        for (&cluster, storage) in &self.context.faults {
            self.output.capture(time, cluster, storage)?;
            self.summary.frames += 1;
        }
        Ok(())
    }

    fn fire(&mut self, event: SyncEvent) -> Result<FireReport, RuptureError> {
        let report = self.registry.fire(
            event,
            self.context.time,
            &mut self.context,
            &mut *self.collective,
        )?;
        self.summary.hooks_fired += report.fired.len() as u64;
        Ok(report)
    }

    /// Register a hook after construction.
    pub fn register(
        &mut self,
        hook: Hook<SimulationContext>,
    ) -> Result<HookId, RuptureError> {
        Ok(self.registry.register(hook)?)
    }

    /// This rank.
    pub fn rank(&self) -> Rank {
        self.collective.rank()
    }

    /// Current simulation time.
    pub fn time(&self) -> f64 {
        self.context.time
    }

    /// Configured end time.
    pub fn end_time(&self) -> f64 {
        self.end_time
    }

    /// Read access to the state hooks operate on.
    pub fn context(&self) -> &SimulationContext {
        &self.context
    }

    /// The hook registry.
    pub fn registry(&self) -> &SyncRegistry<SimulationContext> {
        &self.registry
    }

    /// Hooks armed for the time mirror, when enabled.
    pub fn mirror(&self) -> Option<MirrorPair> {
        self.mirror
    }

    /// The friction kernel in use.
    pub fn kernel(&self) -> &FrictionKernel {
        &self.kernel
    }

    /// Frames captured so far.
    pub fn frames(&self) -> &[OutputFrame] {
        self.output.frames()
    }

    /// Remove and return every captured frame.
    pub fn take_frames(&mut self) -> Vec<OutputFrame> {
        self.output.take_frames()
    }

    /// Counters of the run so far.
    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }
}

/// Snap a cluster clock onto the synchronization time it was advanced to.
fn settle(
    cluster: ClusterId,
    time: f64,
    sync_time: f64,
    tolerance: f64,
) -> Result<f64, ConsistencyFault> {
    if (time - sync_time).abs() > tolerance {
        return Err(ConsistencyFault::ClusterNotAtSyncPoint {
            cluster,
            time,
            sync_time,
        });
    }
    Ok(sync_time)
}

impl std::fmt::Debug for Simulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulator")
            .field("rank", &self.collective.rank())
            .field("time", &self.context.time)
            .field("end_time", &self.end_time)
            .field("variant", &self.kernel.variant())
            .field("hooks", &self.registry.len())
            .field("finished", &self.finished)
            .finish()
    }
}
