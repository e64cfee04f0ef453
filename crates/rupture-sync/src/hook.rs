//! Hook values, schedules and the per-call handle a hook receives.

use std::fmt;

use rupture_core::{ConfigurationError, HookId, Rank, RuptureError};

use crate::event::SyncEvent;

/// Boxed hook callback over a context of type `C`.
pub type HookFn<C> = Box<dyn FnMut(&mut HookCall<'_, C>) -> Result<(), RuptureError> + Send>;

/// Whether a hook survives its own firing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HookMode {
    /// Stays armed after firing.
    Repeating,
    /// Disabled after its first firing.
    OneShot,
}

/// Lifecycle of a registered hook.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HookState {
    /// Considered at every occurrence of its event.
    Armed,
    /// Skipped forever.
    Disabled,
}

/// Which occurrences of its event a hook is due at.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Schedule {
    /// Every occurrence.
    Always,
    /// Every occurrence at or after the given time.
    At(f64),
    /// Occurrences at or after `next`; after firing, `next` advances by
    /// whole `interval`s past the firing time.
    Every {
        /// Next due time.
        next: f64,
        /// Period.
        interval: f64,
    },
}

impl Schedule {
    /// Whether an occurrence at `time` is due, allowing `tolerance` early.
    pub fn is_due(&self, time: f64, tolerance: f64) -> bool {
        match *self {
            Self::Always => true,
            Self::At(at) => time >= at - tolerance,
            Self::Every { next, .. } => time >= next - tolerance,
        }
    }

    /// The scheduled time strictly after `after`, if any.
    pub(crate) fn upcoming(&self, after: f64, tolerance: f64) -> Option<f64> {
        match *self {
            Self::Always => None,
            Self::At(at) | Self::Every { next: at, .. } => (at > after + tolerance).then_some(at),
        }
    }

    /// Whether a scheduled time at or before `time` is still waiting for an
    /// occurrence. Repeating `At` hooks never wait: they join every later
    /// occurrence anyway.
    pub(crate) fn overdue(&self, mode: HookMode, time: f64, tolerance: f64) -> bool {
        match *self {
            Self::Always => false,
            Self::At(at) => mode == HookMode::OneShot && at <= time + tolerance,
            Self::Every { next, .. } => next <= time + tolerance,
        }
    }

    pub(crate) fn advance(&mut self, time: f64, tolerance: f64) {
        if let Self::Every { next, interval } = self {
            while *next <= time + tolerance {
                *next += *interval;
            }
        }
    }

    pub(crate) fn validate(&self, label: &str) -> Result<(), ConfigurationError> {
        let invalid = |reason: String| ConfigurationError::InvalidValue {
            field: label.to_owned(),
            reason,
        };
        match *self {
            Self::Always => Ok(()),
            Self::At(at) if !at.is_finite() => {
                Err(invalid(format!("hook time must be finite, got {at}")))
            }
            Self::At(_) => Ok(()),
            Self::Every { next, interval } => {
                if !next.is_finite() {
                    Err(invalid(format!("hook time must be finite, got {next}")))
                } else if !interval.is_finite() || interval <= 0.0 {
                    Err(invalid(format!(
                        "hook interval must be finite and positive, got {interval}"
                    )))
                } else {
                    Ok(())
                }
            }
        }
    }
}

/// A hook ready for registration.
///
/// Defaults to a repeating hook due at every occurrence of its event.
pub struct Hook<C> {
    pub(crate) event: SyncEvent,
    pub(crate) label: String,
    pub(crate) mode: HookMode,
    pub(crate) schedule: Schedule,
    pub(crate) callback: HookFn<C>,
}

impl<C> Hook<C> {
    /// A repeating hook for `event`.
    pub fn new<F>(event: SyncEvent, label: impl Into<String>, callback: F) -> Self
    where
        F: FnMut(&mut HookCall<'_, C>) -> Result<(), RuptureError> + Send + 'static,
    {
        Self {
            event,
            label: label.into(),
            mode: HookMode::Repeating,
            schedule: Schedule::Always,
            callback: Box::new(callback),
        }
    }

    /// Disable after the first firing.
    pub fn one_shot(mut self) -> Self {
        self.mode = HookMode::OneShot;
        self
    }

    /// Only due at or after `time`.
    pub fn at(mut self, time: f64) -> Self {
        self.schedule = Schedule::At(time);
        self
    }

    /// Due at `first` and every `interval` after.
    pub fn every(mut self, first: f64, interval: f64) -> Self {
        self.schedule = Schedule::Every {
            next: first,
            interval,
        };
        self
    }

    /// Triggering event.
    pub fn event(&self) -> SyncEvent {
        self.event
    }

    /// Label, compared across ranks.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Firing mode.
    pub fn mode(&self) -> HookMode {
        self.mode
    }

    /// Current schedule.
    pub fn schedule(&self) -> Schedule {
        self.schedule
    }
}

impl<C> fmt::Debug for Hook<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hook")
            .field("event", &self.event)
            .field("label", &self.label)
            .field("mode", &self.mode)
            .field("schedule", &self.schedule)
            .finish_non_exhaustive()
    }
}

/// What a hook sees while it runs.
pub struct HookCall<'a, C> {
    pub(crate) hook: HookId,
    pub(crate) event: SyncEvent,
    pub(crate) time: f64,
    pub(crate) rank: Rank,
    pub(crate) ctx: &'a mut C,
    pub(crate) disarmed: bool,
    pub(crate) deferred: &'a mut Vec<(HookId, Hook<C>)>,
    pub(crate) next_id: &'a mut u64,
}

impl<C> HookCall<'_, C> {
    /// Handle of the running hook.
    pub fn hook_id(&self) -> HookId {
        self.hook
    }

    /// The event being fired.
    pub fn event(&self) -> SyncEvent {
        self.event
    }

    /// Simulation time of the occurrence.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Rank the hook runs on.
    pub fn rank(&self) -> Rank {
        self.rank
    }

    /// Shared simulation state.
    pub fn context(&mut self) -> &mut C {
        &mut *self.ctx
    }

    /// Disable the running hook once this call returns.
    pub fn disarm(&mut self) {
        self.disarmed = true;
    }

    /// Whether [`disarm`](Self::disarm) was called.
    pub fn is_disarmed(&self) -> bool {
        self.disarmed
    }

    /// Register another hook. It takes part from the next occurrence of its
    /// event on, never in the current pass.
    pub fn register(&mut self, hook: Hook<C>) -> Result<HookId, ConfigurationError> {
        hook.schedule.validate(&hook.label)?;
        let id = HookId(*self.next_id);
        *self.next_id += 1;
        self.deferred.push((id, hook));
        Ok(id)
    }
}
