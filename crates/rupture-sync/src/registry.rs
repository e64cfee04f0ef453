//! The synchronization-point registry.

use rupture_core::{ConfigurationError, HookId, RuptureError};
use tracing::{debug, trace};

use crate::collective::{Collective, SyncDigest};
use crate::event::SyncEvent;
use crate::hook::{Hook, HookCall, HookMode, HookState};

/// Absolute tolerance for deciding whether a scheduled hook is due.
pub const DEFAULT_TIME_TOLERANCE: f64 = rupture_core::TIME_TOLERANCE;

struct Entry<C> {
    id: HookId,
    hook: Hook<C>,
    state: HookState,
}

/// Outcome of one [`SyncRegistry::fire`] pass.
#[derive(Clone, Debug, PartialEq)]
pub struct FireReport {
    /// The event fired.
    pub event: SyncEvent,
    /// Simulation time of the occurrence.
    pub time: f64,
    /// Hooks that ran, in order.
    pub fired: Vec<HookId>,
    /// Hooks disabled by this pass.
    pub disabled: Vec<HookId>,
    /// Hooks registered from inside this pass.
    pub registered: Vec<HookId>,
}

/// Ordered hooks over a shared context `C`.
///
/// Hooks fire in registration order. A disabled hook is never considered
/// again. Hooks registered while a pass runs join after it completes.
pub struct SyncRegistry<C> {
    entries: Vec<Entry<C>>,
    next_id: u64,
    tolerance: f64,
}

impl<C> Default for SyncRegistry<C> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
            tolerance: DEFAULT_TIME_TOLERANCE,
        }
    }
}

impl<C> SyncRegistry<C> {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty registry with a custom due-time tolerance.
    pub fn with_tolerance(tolerance: f64) -> Self {
        Self {
            tolerance,
            ..Self::default()
        }
    }

    /// Due-time tolerance.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Register `hook`, armed.
    pub fn register(&mut self, hook: Hook<C>) -> Result<HookId, ConfigurationError> {
        hook.schedule.validate(&hook.label)?;
        let id = HookId(self.next_id);
        self.next_id += 1;
        debug!(hook = %id, label = %hook.label, event = %hook.event, "registered hook");
        self.entries.push(Entry {
            id,
            hook,
            state: HookState::Armed,
        });
        Ok(id)
    }

    /// Disable `id`. Returns whether it was armed.
    pub fn disarm(&mut self, id: HookId) -> bool {
        match self.entries.iter_mut().find(|e| e.id == id) {
            Some(entry) if entry.state == HookState::Armed => {
                entry.state = HookState::Disabled;
                true
            }
            _ => false,
        }
    }

    /// Lifecycle state of `id`.
    pub fn state(&self, id: HookId) -> Option<HookState> {
        self.entries.iter().find(|e| e.id == id).map(|e| e.state)
    }

    /// The registered hook behind `id`.
    pub fn hook(&self, id: HookId) -> Option<&Hook<C>> {
        self.entries.iter().find(|e| e.id == id).map(|e| &e.hook)
    }

    /// Number of registered hooks, armed or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of armed hooks for `event`.
    pub fn armed_count(&self, event: SyncEvent) -> usize {
        self.entries
            .iter()
            .filter(|e| e.state == HookState::Armed && e.hook.event == event)
            .count()
    }

    /// Earliest time strictly after `after` at which an armed
    /// [`SyncEvent::SynchronizationPoint`] hook is scheduled.
    pub fn next_sync_time(&self, after: f64) -> Option<f64> {
        self.entries
            .iter()
            .filter(|e| {
                e.state == HookState::Armed && e.hook.event == SyncEvent::SynchronizationPoint
            })
            .filter_map(|e| e.hook.schedule.upcoming(after, self.tolerance))
            .min_by(f64::total_cmp)
    }

    /// Whether an armed [`SyncEvent::SynchronizationPoint`] hook was
    /// scheduled at or before `time` and has not had an occurrence yet.
    ///
    /// [`next_sync_time`](Self::next_sync_time) never reports such a hook,
    /// so the driver owes it a synchronization point at `time` itself.
    pub fn has_overdue_sync(&self, time: f64) -> bool {
        self.entries.iter().any(|e| {
            e.state == HookState::Armed
                && e.hook.event == SyncEvent::SynchronizationPoint
                && e.hook.schedule.overdue(e.hook.mode, time, self.tolerance)
        })
    }

    fn due(&self, event: SyncEvent, time: f64) -> Vec<usize> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| {
                e.state == HookState::Armed
                    && e.hook.event == event
                    && e.hook.schedule.is_due(time, self.tolerance)
            })
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Labels of the hooks that would fire for `event` at `time`.
    pub fn due_labels(&self, event: SyncEvent, time: f64) -> Vec<String> {
        self.due(event, time)
            .into_iter()
            .map(|idx| self.entries[idx].hook.label.clone())
            .collect()
    }

    /// Agree with every rank on this occurrence, then run every due hook
    /// in registration order.
    ///
    /// The first hook error aborts the pass and is returned.
    pub fn fire(
        &mut self,
        event: SyncEvent,
        time: f64,
        ctx: &mut C,
        collective: &mut dyn Collective,
    ) -> Result<FireReport, RuptureError> {
        let due = self.due(event, time);
        let digest = SyncDigest {
            event,
            time,
            hooks: due
                .iter()
                .map(|&idx| self.entries[idx].hook.label.clone())
                .collect(),
        };
        collective.agree(&digest)?;
        let rank = collective.rank();
        trace!(%rank, %event, time, due = due.len(), "synchronization point agreed");

        let mut report = FireReport {
            event,
            time,
            fired: Vec::with_capacity(due.len()),
            disabled: Vec::new(),
            registered: Vec::new(),
        };
        let mut deferred = Vec::new();
        for idx in due {
            let entry = &mut self.entries[idx];
            if entry.state != HookState::Armed {
                continue;
            }
            debug!(%rank, hook = %entry.id, label = %entry.hook.label, %event, time, "firing hook");
            let mut call = HookCall {
                hook: entry.id,
                event,
                time,
                rank,
                ctx: &mut *ctx,
                disarmed: false,
                deferred: &mut deferred,
                next_id: &mut self.next_id,
            };
            (entry.hook.callback)(&mut call)?;
            let disarmed = call.disarmed;

            report.fired.push(entry.id);
            if disarmed || entry.hook.mode == HookMode::OneShot {
                entry.state = HookState::Disabled;
                report.disabled.push(entry.id);
            } else {
                entry.hook.schedule.advance(time, self.tolerance);
            }
        }

        for (id, hook) in deferred {
            debug!(hook = %id, label = %hook.label, event = %hook.event, "registered deferred hook");
            report.registered.push(id);
            self.entries.push(Entry {
                id,
                hook,
                state: HookState::Armed,
            });
        }
        Ok(report)
    }
}

impl<C> std::fmt::Debug for SyncRegistry<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncRegistry")
            .field("hooks", &self.entries.len())
            .field("next_id", &self.next_id)
            .field("tolerance", &self.tolerance)
            .finish()
    }
}
