#![doc = include_str!("../../../README.md")]

mod args;
mod bind;
mod error;
mod function;
mod invoke;
mod method;
mod placeholder;
mod slot;
mod storage;
pub mod tracer;

/// The placeholder constants, for glob import.
pub mod placeholders {
    pub use crate::placeholder::{_1, _2, _3, _4};
}

pub use crate::{
    args::{ArgList, Select},
    bind::{BindingShape, Bound, bind, bind_method},
    error::{CallError, CallResult, ErrorKind},
    function::{CoreKind, Function},
    invoke::Invoke,
    method::{Method, MethodAdapter, MethodFn, MutSelf, Receiver, RefSelf, Shared, shared},
    placeholder::{_1, _2, _3, _4, Cloned, MAX_ARITY, Placeholder},
    slot::{ByRef, Captured, Slot, SlotInfo, SlotKind, by_ref, by_value},
    storage::{Resolve, SlotList},
    tracer::{CallTracer, NoopTracer, ProfilingReport, ProfilingTracer, RecordingTracer, StderrTracer, TraceEvent},
};
