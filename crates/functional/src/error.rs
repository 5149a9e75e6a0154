use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

/// Result type alias for invoking a bound or wrapped callable.
pub type CallResult<T> = Result<T, CallError>;

/// Failure raised when a callable is invoked before it is ready.
///
/// Shape problems (wrong arity, mismatched argument types, a placeholder that points past
/// the supplied arguments) never reach this type: they are rejected by the compiler. What
/// remains are the "use before ready" cases, which only show up at invocation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallError {
    /// A [`Function`](crate::Function) was called while empty.
    Uninitialized,
    /// A method adapter was called without a receiver ever being attached.
    NoReceiver {
        /// Type name of the adapted method.
        method: &'static str,
    },
    /// The receiver was already mutably borrowed, i.e. the call re-entered its own receiver.
    ReceiverBusy {
        /// Type name of the receiver's target.
        receiver: &'static str,
    },
    /// A receiver of the wrong type was offered to a method adapter.
    ReceiverMismatch {
        /// Type name of the receiver handle the adapter expects.
        expected: &'static str,
    },
    /// A slot asked for a caller argument that another slot had already moved out.
    ///
    /// Bindings built from the provided slot types never fail this way, since a storage that
    /// moves the same argument twice is rejected at compile time. Hand-written [`Slot`]
    /// impls can still trip it.
    ///
    /// [`Slot`]: crate::Slot
    ArgumentMoved {
        /// 1-based position of the argument.
        index: usize,
    },
}

impl CallError {
    /// Returns the fieldless kind of this error, for matching without inspecting payloads.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Uninitialized => ErrorKind::Uninitialized,
            Self::NoReceiver { .. } => ErrorKind::NoReceiver,
            Self::ReceiverBusy { .. } => ErrorKind::ReceiverBusy,
            Self::ReceiverMismatch { .. } => ErrorKind::ReceiverMismatch,
            Self::ArgumentMoved { .. } => ErrorKind::ArgumentMoved,
        }
    }
}

impl fmt::Display for CallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uninitialized => f.write_str("uninitialized callable: no function has been assigned"),
            Self::NoReceiver { method } => {
                write!(f, "method `{method}` called without a receiver")
            }
            Self::ReceiverBusy { receiver } => {
                write!(f, "receiver `{receiver}` is already borrowed by an outer call")
            }
            Self::ReceiverMismatch { expected } => {
                write!(f, "receiver type mismatch: expected `{expected}`")
            }
            Self::ArgumentMoved { index } => {
                write!(f, "caller argument _{index} was already moved into another slot")
            }
        }
    }
}

impl std::error::Error for CallError {}

/// Kinds of [`CallError`].
///
/// Uses strum derives for `Display`, `FromStr` and `Into<&'static str>`; the string form is the
/// variant name (e.g. `NoReceiver` -> "NoReceiver").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr, Serialize, Deserialize)]
pub enum ErrorKind {
    Uninitialized,
    NoReceiver,
    ReceiverBusy,
    ReceiverMismatch,
    ArgumentMoved,
}
