//! Tests for observing wrapper calls through `CallTracer` implementations.

use functional::{
    CoreKind, ErrorKind, Function, ProfilingReport, ProfilingTracer, RecordingTracer, StderrTracer, TraceEvent, bind,
    placeholders::*, shared,
};
use pretty_assertions::assert_eq;
use serde_json::json;

struct Counter {
    count: i32,
}

impl Counter {
    fn increment(&mut self, by: i32) -> i32 {
        self.count += by;
        self.count
    }
}

// =============================================================================
// RecordingTracer
// =============================================================================

/// A successful call records an invoke event followed by a return event.
#[test]
fn records_successful_call() {
    let f: Function<'_, (i32, i32), i32> = Function::from(bind(|a: i32, b: i32| a * b, (_2, _1)));
    let mut tracer = RecordingTracer::new();
    assert_eq!(f.call_traced((3, 4), &mut tracer).unwrap(), 12);
    assert_eq!(
        tracer.into_events(),
        vec![
            TraceEvent::Invoke {
                kind: CoreKind::BoundCall,
                arity: 2
            },
            TraceEvent::Return {
                kind: CoreKind::BoundCall
            },
        ]
    );
}

/// Failures are recorded with their kind and message.
#[test]
fn records_errors() {
    let mut f: Function<'_, (i32,), i32> = Function::empty();
    let mut tracer = RecordingTracer::new();

    assert!(f.call_traced((1,), &mut tracer).is_err());
    f = Function::from_method(Counter::increment);
    assert!(f.call_traced((1,), &mut tracer).is_err());

    let events = tracer.events();
    assert_eq!(events.len(), 3);
    assert_eq!(
        events[0],
        TraceEvent::Error {
            kind: ErrorKind::Uninitialized,
            message: "uninitialized callable: no function has been assigned".to_owned(),
        }
    );
    assert_eq!(
        events[1],
        TraceEvent::Invoke {
            kind: CoreKind::MethodAdapter,
            arity: 1
        }
    );
    assert!(
        matches!(&events[2], TraceEvent::Error { kind: ErrorKind::NoReceiver, .. }),
        "{events:?}"
    );
}

/// Receiver injection is recorded with whether the core attached it.
#[test]
fn records_receiver_injection() {
    let counter = shared(Counter { count: 0 });
    let mut method: Function<'_, (i32,), i32> = Function::from_method(Counter::increment);
    let mut free: Function<'_, (i32,), i32> = Function::from_fn(|x: i32| x);
    let mut tracer = RecordingTracer::new();

    assert!(method.set_receiver_traced(&counter, &mut tracer).unwrap());
    assert!(!free.set_receiver_traced(&counter, &mut tracer).unwrap());

    assert_eq!(
        tracer.events(),
        &[
            TraceEvent::Receiver {
                kind: CoreKind::MethodAdapter,
                attached: true
            },
            TraceEvent::Receiver {
                kind: CoreKind::FreeFunction,
                attached: false
            },
        ]
    );
    tracer.clear();
    assert!(tracer.events().is_empty());
}

/// Trace events serialise to JSON for offline inspection.
#[test]
fn events_serialise_to_json() {
    let event = TraceEvent::Invoke {
        kind: CoreKind::BoundCall,
        arity: 2,
    };
    assert_eq!(
        serde_json::to_value(&event).unwrap(),
        json!({"Invoke": {"kind": "BoundCall", "arity": 2}})
    );
    let error = TraceEvent::Error {
        kind: ErrorKind::ReceiverBusy,
        message: String::from("busy"),
    };
    let text = serde_json::to_string(&error).unwrap();
    let back: TraceEvent = serde_json::from_str(&text).unwrap();
    assert_eq!(back, error);
}

// =============================================================================
// ProfilingTracer
// =============================================================================

/// The profiling report counts calls per variant, most frequent first.
#[test]
fn profiling_counts_calls_per_variant() {
    let free: Function<'_, (i32,), i32> = Function::from_fn(|x: i32| x + 1);
    let bound: Function<'_, (i32,), i32> = Function::from(bind(|a: i32, b: i32| a + b, (_1, 1_i32)));
    let empty: Function<'_, (i32,), i32> = Function::empty();
    let mut tracer = ProfilingTracer::new();

    for i in 0..3 {
        bound.call_traced((i,), &mut tracer).unwrap();
    }
    free.call_traced((0,), &mut tracer).unwrap();
    assert!(empty.call_traced((0,), &mut tracer).is_err());

    assert_eq!(
        tracer.report(),
        ProfilingReport {
            calls: vec![(CoreKind::BoundCall, 3), (CoreKind::FreeFunction, 1)],
            total_calls: 4,
            returns: 4,
            errors: 1,
            receivers_attached: 0,
        }
    );
}

/// Profiling reports serialise to JSON.
#[test]
fn profiling_report_serialises() {
    let report = ProfilingTracer::new().report();
    assert_eq!(
        serde_json::to_value(&report).unwrap(),
        json!({
            "calls": [],
            "total_calls": 0,
            "returns": 0,
            "errors": 0,
            "receivers_attached": 0,
        })
    );
}

// =============================================================================
// StderrTracer
// =============================================================================

/// The stderr tracer never changes the outcome of a call, including past its line limit.
#[test]
fn stderr_tracer_is_transparent() {
    let f: Function<'_, (i32,), i32> = Function::from_fn(|x: i32| -x);
    let mut tracer = StderrTracer::with_limit(3);
    for i in 0..5 {
        assert_eq!(f.call_traced((i,), &mut tracer).unwrap(), -i);
    }
    let mut unlimited = StderrTracer::default();
    assert_eq!(f.call_traced((2,), &mut unlimited).unwrap(), -2);
}

// =============================================================================
// Kind names
// =============================================================================

/// Kinds have stable string forms, and error kinds parse back from them.
#[test]
fn kind_names_round_trip() {
    let name: &'static str = CoreKind::MethodAdapter.into();
    assert_eq!(name, "MethodAdapter");
    assert_eq!(CoreKind::BoundCall.to_string(), "BoundCall");
    assert_eq!("ReceiverMismatch".parse::<ErrorKind>(), Ok(ErrorKind::ReceiverMismatch));
    assert!("Bogus".parse::<ErrorKind>().is_err());
}
