//! Call tracing for type-erased callables.
//!
//! A trait-based hook system in the same spirit as a resource tracker: [`Function::call`] runs
//! with [`NoopTracer`], whose hooks compile away after monomorphization, and
//! [`Function::call_traced`] accepts any other tracer.
//!
//! | Tracer | Purpose |
//! |--------|---------|
//! | [`NoopTracer`] | Zero-cost no-op (the default) |
//! | [`StderrTracer`] | Human-readable call log to stderr |
//! | [`ProfilingTracer`] | Per-variant call counters |
//! | [`RecordingTracer`] | Full event recording for assertions or post-mortem |
//!
//! ```
//! use functional::{Function, RecordingTracer, TraceEvent, CoreKind};
//!
//! let double: Function<'_, (i32,), i32> = Function::from_fn(|x: i32| x * 2);
//! let mut tracer = RecordingTracer::new();
//! assert_eq!(double.call_traced((4,), &mut tracer).unwrap(), 8);
//! assert_eq!(
//!     tracer.events(),
//!     &[
//!         TraceEvent::Invoke { kind: CoreKind::FreeFunction, arity: 1 },
//!         TraceEvent::Return { kind: CoreKind::FreeFunction },
//!     ]
//! );
//! ```
//!
//! [`Function::call`]: crate::Function::call
//! [`Function::call_traced`]: crate::Function::call_traced

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::{
    error::{CallError, ErrorKind},
    function::CoreKind,
};

/// Event emitted while calling a [`Function`](crate::Function).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TraceEvent {
    /// A wrapper dispatched a call to its core.
    Invoke {
        /// Variant of the core that was called.
        kind: CoreKind,
        /// Number of arguments supplied by the caller.
        arity: usize,
    },
    /// The call returned successfully.
    Return {
        kind: CoreKind,
    },
    /// The call failed.
    Error {
        kind: ErrorKind,
        message: String,
    },
    /// A receiver was offered to the core.
    Receiver {
        kind: CoreKind,
        /// Whether the core attached it.
        attached: bool,
    },
}

/// Hooks observing calls through a [`Function`](crate::Function).
///
/// All methods have default no-op implementations; tracers override only what they need.
pub trait CallTracer: std::fmt::Debug {
    /// Called before a wrapper dispatches to its core.
    ///
    /// # Arguments
    /// * `kind` - Variant of the core being called
    /// * `arity` - Number of arguments supplied by the caller
    #[inline(always)]
    fn on_invoke(&mut self, _kind: CoreKind, _arity: usize) {}

    /// Called after the core returned successfully.
    #[inline(always)]
    fn on_return(&mut self, _kind: CoreKind) {}

    /// Called when a call fails, including calls on an empty wrapper.
    #[inline(always)]
    fn on_error(&mut self, _error: &CallError) {}

    /// Called after a receiver was offered to the core.
    #[inline(always)]
    fn on_receiver(&mut self, _kind: CoreKind, _attached: bool) {}
}

// ============================================================================
// NoopTracer: zero-cost default
// ============================================================================

/// A tracer that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTracer;

impl CallTracer for NoopTracer {}

// ============================================================================
// StderrTracer: human-readable call log
// ============================================================================

/// Tracer that prints a line per event to stderr.
///
/// Output format:
/// ```text
///   >>> CALL BoundCall         arity=2
///   <<< RETURN BoundCall
///   !!! ERROR NoReceiver       method `...` called without a receiver
/// ```
#[derive(Debug)]
pub struct StderrTracer {
    /// Maximum number of lines to print before going quiet. None = unlimited.
    limit: Option<usize>,
    /// Lines printed so far.
    count: usize,
    stopped: bool,
}

impl StderrTracer {
    /// Creates a new stderr tracer with no line limit.
    #[must_use]
    pub fn new() -> Self {
        Self {
            limit: None,
            count: 0,
            stopped: false,
        }
    }

    /// Creates a new stderr tracer that stops after `limit` lines.
    #[must_use]
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            count: 0,
            stopped: false,
        }
    }

    /// Number of event lines printed so far, not counting the limit banner.
    #[must_use]
    pub fn lines_printed(&self) -> usize {
        self.count
    }

    fn emit(&mut self, line: std::fmt::Arguments<'_>) {
        if self.stopped {
            return;
        }
        if let Some(limit) = self.limit
            && self.count >= limit
        {
            eprintln!("--- trace limit reached ({limit} lines) ---");
            self.stopped = true;
            return;
        }
        eprintln!("{line}");
        self.count += 1;
    }
}

impl Default for StderrTracer {
    fn default() -> Self {
        Self::new()
    }
}

impl CallTracer for StderrTracer {
    fn on_invoke(&mut self, kind: CoreKind, arity: usize) {
        let name: &'static str = kind.into();
        self.emit(format_args!("  >>> CALL {name:<16} arity={arity}"));
    }

    fn on_return(&mut self, kind: CoreKind) {
        self.emit(format_args!("  <<< RETURN {kind}"));
    }

    fn on_error(&mut self, error: &CallError) {
        let name: &'static str = error.kind().into();
        self.emit(format_args!("  !!! ERROR {name:<16} {error}"));
    }

    fn on_receiver(&mut self, kind: CoreKind, attached: bool) {
        self.emit(format_args!("  +++ RECEIVER {kind} attached={attached}"));
    }
}

// ============================================================================
// ProfilingTracer: per-variant counters
// ============================================================================

/// Tracer that counts calls per core variant.
///
/// Retrieve results via [`ProfilingTracer::report`].
#[derive(Debug, Default)]
pub struct ProfilingTracer {
    calls: AHashMap<CoreKind, u64>,
    returns: u64,
    errors: u64,
    receivers_attached: u64,
}

/// Summary produced by [`ProfilingTracer::report`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfilingReport {
    /// Calls per core variant, sorted by descending count (ties by variant order).
    pub calls: Vec<(CoreKind, u64)>,
    /// Total number of calls dispatched to a core.
    pub total_calls: u64,
    /// Calls that returned successfully.
    pub returns: u64,
    /// Calls that failed, including calls on an empty wrapper.
    pub errors: u64,
    /// Receivers attached through `set_receiver_traced`.
    pub receivers_attached: u64,
}

impl ProfilingTracer {
    /// Creates an empty profiling tracer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a report of everything observed so far.
    #[must_use]
    pub fn report(&self) -> ProfilingReport {
        let mut calls: Vec<(CoreKind, u64)> = self.calls.iter().map(|(kind, count)| (*kind, *count)).collect();
        calls.sort_by(|(a_kind, a_count), (b_kind, b_count)| b_count.cmp(a_count).then(a_kind.cmp(b_kind)));
        ProfilingReport {
            total_calls: calls.iter().map(|(_, count)| count).sum(),
            calls,
            returns: self.returns,
            errors: self.errors,
            receivers_attached: self.receivers_attached,
        }
    }
}

impl CallTracer for ProfilingTracer {
    #[inline]
    fn on_invoke(&mut self, kind: CoreKind, _arity: usize) {
        *self.calls.entry(kind).or_insert(0) += 1;
    }

    #[inline]
    fn on_return(&mut self, _kind: CoreKind) {
        self.returns += 1;
    }

    #[inline]
    fn on_error(&mut self, _error: &CallError) {
        self.errors += 1;
    }

    fn on_receiver(&mut self, _kind: CoreKind, attached: bool) {
        if attached {
            self.receivers_attached += 1;
        }
    }
}

// ============================================================================
// RecordingTracer: full event log
// ============================================================================

/// Tracer that records every event.
#[derive(Debug, Default)]
pub struct RecordingTracer {
    events: Vec<TraceEvent>,
}

impl RecordingTracer {
    /// Creates an empty recording tracer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded events, oldest first.
    #[must_use]
    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    /// Consumes the tracer, returning the recorded events.
    #[must_use]
    pub fn into_events(self) -> Vec<TraceEvent> {
        self.events
    }

    /// Drops all recorded events.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl CallTracer for RecordingTracer {
    fn on_invoke(&mut self, kind: CoreKind, arity: usize) {
        self.events.push(TraceEvent::Invoke { kind, arity });
    }

    fn on_return(&mut self, kind: CoreKind) {
        self.events.push(TraceEvent::Return { kind });
    }

    fn on_error(&mut self, error: &CallError) {
        self.events.push(TraceEvent::Error {
            kind: error.kind(),
            message: error.to_string(),
        });
    }

    fn on_receiver(&mut self, kind: CoreKind, attached: bool) {
        self.events.push(TraceEvent::Receiver { kind, attached });
    }
}
