//! Binding slots: the things a bound argument position can hold.
//!
//! Every slot type implements [`Slot<Pending>`] for the pending argument lists it can be
//! resolved against. A pending list is the caller's argument tuple with each argument wrapped
//! in `Option` (see [`ArgList::Pending`](crate::ArgList::Pending)), so a slot can move its
//! argument out:
//!
//! | Slot | Resolves to |
//! |------|-------------|
//! | [`Captured<T>`] and plain scalars, `String`, `&'static str`, `Rc<T>`, `Option<T>` | a clone of the captured value |
//! | [`ByRef<'a, T>`] | the captured `&'a T` itself |
//! | [`Placeholder<N>`] | caller argument `N`, moved |
//! | [`Cloned<N>`] | a clone of caller argument `N` |
//!
//! Because placeholders move, a caller argument needs no `Clone` impl and may be a `&mut T`.
//! The dispatch happens through trait selection, so resolving a slot never branches on its
//! kind at runtime. [`SlotKind`] is the runtime view of the same distinction, used for
//! introspection and tracing.

use std::{fmt, rc::Rc};

use serde::{Deserialize, Serialize};

use crate::{
    args::Select,
    error::{CallError, CallResult},
    placeholder::{Cloned, Placeholder},
};

/// Runtime description of a binding slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotKind {
    /// Owns a value that is cloned into every call.
    Captured,
    /// Holds a borrowed reference that is passed through unchanged.
    ByRef,
    /// Moves in the caller argument at this 1-based position.
    Placeholder(usize),
    /// Clones in the caller argument at this 1-based position.
    Cloned(usize),
}

impl SlotKind {
    /// Returns the placeholder index, or `None` for captured slots.
    #[must_use]
    pub const fn placeholder(self) -> Option<usize> {
        match self {
            Self::Placeholder(index) | Self::Cloned(index) => Some(index),
            Self::Captured | Self::ByRef => None,
        }
    }
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Captured => f.write_str("value"),
            Self::ByRef => f.write_str("ref"),
            Self::Placeholder(index) => write!(f, "_{index}"),
            Self::Cloned(index) => write!(f, "_{index}.cloned()"),
        }
    }
}

/// Static information about a slot type, independent of what it is resolved against.
pub trait SlotInfo {
    /// What kind of slot this type is.
    const KIND: SlotKind;
}

/// A slot that can be resolved against the pending argument list `Pending`.
pub trait Slot<Pending>: SlotInfo {
    /// The value handed to the target for this slot.
    type Output;

    /// Produces this slot's argument for one call.
    ///
    /// Captured slots ignore `pending`; placeholders take from it.
    fn resolve(&self, pending: &mut Pending) -> CallResult<Self::Output>;
}

impl<const N: usize> SlotInfo for Placeholder<N> {
    const KIND: SlotKind = SlotKind::Placeholder(N);
}

impl<Pending, A, const N: usize> Slot<Pending> for Placeholder<N>
where
    Pending: Select<N, Output = Option<A>>,
{
    type Output = A;

    #[inline]
    fn resolve(&self, pending: &mut Pending) -> CallResult<A> {
        pending.select_mut().take().ok_or(CallError::ArgumentMoved { index: N })
    }
}

impl<const N: usize> SlotInfo for Cloned<N> {
    const KIND: SlotKind = SlotKind::Cloned(N);
}

impl<Pending, A: Clone, const N: usize> Slot<Pending> for Cloned<N>
where
    Pending: Select<N, Output = Option<A>>,
{
    type Output = A;

    #[inline]
    fn resolve(&self, pending: &mut Pending) -> CallResult<A> {
        pending.select().as_ref().cloned().ok_or(CallError::ArgumentMoved { index: N })
    }
}

/// A value captured by the binding, cloned into each call.
///
/// Plain scalars and strings can be passed to [`bind`](crate::bind) directly; wrap anything
/// else with [`by_value`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Captured<T>(pub T);

impl<T> Captured<T> {
    /// Borrows the captured value.
    pub fn get(&self) -> &T {
        &self.0
    }

    /// Unwraps the captured value.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> SlotInfo for Captured<T> {
    const KIND: SlotKind = SlotKind::Captured;
}

impl<Pending, T: Clone> Slot<Pending> for Captured<T> {
    type Output = T;

    #[inline]
    fn resolve(&self, _pending: &mut Pending) -> CallResult<T> {
        Ok(self.0.clone())
    }
}

/// Captures `value` by value.
pub fn by_value<T>(value: T) -> Captured<T> {
    Captured(value)
}

/// A reference captured by the binding.
///
/// The target receives the reference itself, so interior mutation through it (a `Cell`, a
/// `RefCell`) is seen by the owner, and changes the owner makes between binding and calling
/// are seen by the target. The borrow checker keeps the referent alive for as long as the
/// binding, and any wrapper holding it, exists.
pub struct ByRef<'a, T: ?Sized>(&'a T);

impl<'a, T: ?Sized> ByRef<'a, T> {
    /// Wraps a reference.
    pub fn new(value: &'a T) -> Self {
        Self(value)
    }

    /// Returns the captured reference.
    pub fn get(&self) -> &'a T {
        self.0
    }
}

impl<T: ?Sized> Clone for ByRef<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized> Copy for ByRef<'_, T> {}

impl<T: ?Sized + fmt::Debug> fmt::Debug for ByRef<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ByRef").field(&self.0).finish()
    }
}

impl<T: ?Sized> SlotInfo for ByRef<'_, T> {
    const KIND: SlotKind = SlotKind::ByRef;
}

impl<'a, Pending, T: ?Sized> Slot<Pending> for ByRef<'a, T> {
    type Output = &'a T;

    #[inline]
    fn resolve(&self, _pending: &mut Pending) -> CallResult<&'a T> {
        Ok(self.0)
    }
}

/// Captures `value` by reference.
pub fn by_ref<T: ?Sized>(value: &T) -> ByRef<'_, T> {
    ByRef(value)
}

/// Implements captured-slot behaviour for `Copy` types passed to a binding directly.
macro_rules! copy_slots {
    ($($ty:ty),* $(,)?) => {$(
        impl SlotInfo for $ty {
            const KIND: SlotKind = SlotKind::Captured;
        }

        impl<Pending> Slot<Pending> for $ty {
            type Output = $ty;

            #[inline]
            fn resolve(&self, _pending: &mut Pending) -> CallResult<$ty> {
                Ok(*self)
            }
        }
    )*};
}

copy_slots!(
    bool,
    char,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    f32,
    f64,
    &'static str,
);

impl SlotInfo for String {
    const KIND: SlotKind = SlotKind::Captured;
}

impl<Pending> Slot<Pending> for String {
    type Output = Self;

    fn resolve(&self, _pending: &mut Pending) -> CallResult<Self> {
        Ok(self.clone())
    }
}

impl<T: ?Sized> SlotInfo for Rc<T> {
    const KIND: SlotKind = SlotKind::Captured;
}

impl<Pending, T: ?Sized> Slot<Pending> for Rc<T> {
    type Output = Self;

    #[inline]
    fn resolve(&self, _pending: &mut Pending) -> CallResult<Self> {
        Ok(Self::clone(self))
    }
}

impl<T> SlotInfo for Option<T> {
    const KIND: SlotKind = SlotKind::Captured;
}

impl<Pending, T: Clone> Slot<Pending> for Option<T> {
    type Output = Self;

    fn resolve(&self, _pending: &mut Pending) -> CallResult<Self> {
        Ok(self.clone())
    }
}
