//! Partial application: pairing a target with an argument storage.
//!
//! [`bind`] and [`bind_method`] produce a [`Bound`] from a target and a tuple of slots. The
//! binding's residual arity is its highest placeholder index; [`Bound::call`] takes exactly that
//! many arguments and moves them into the placeholder slots.
//!
//! ```
//! use functional::{bind, placeholders::*};
//!
//! fn describe(a: char, b: char, c: char, d: char) -> String {
//!     [a, b, c, d].iter().collect()
//! }
//!
//! let bound = bind(describe, ('a', _1, 'c', _2));
//! assert_eq!(bound.residual_arity(), 2);
//! assert_eq!(bound.call(('x', 'y')).unwrap(), "axcy");
//! ```

use std::{
    any::{Any, type_name},
    fmt,
};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::{
    args::{ArgList, Select},
    error::CallResult,
    invoke::Invoke,
    method::Method,
    placeholder::MAX_ARITY,
    slot::{Slot, SlotKind},
    storage::{Resolve, SlotList},
};

/// A target plus the argument storage bound to it.
///
/// Cloning clones both the target and every captured value; `ByRef` slots keep pointing at
/// the same referent.
#[derive(Clone)]
pub struct Bound<T, S> {
    target: T,
    slots: S,
}

impl<T, S: SlotList> Bound<T, S> {
    /// Binds `slots` to `target`.
    pub fn new(target: T, slots: S) -> Self {
        Self { target, slots }
    }

    /// Returns the bound target.
    pub fn target(&self) -> &T {
        &self.target
    }

    /// Returns the argument storage.
    pub fn slots(&self) -> &S {
        &self.slots
    }

    /// Number of slots in the storage, i.e. the number of arguments the target receives.
    pub fn arity(&self) -> usize {
        S::ARITY
    }

    /// Number of arguments [`Bound::call`] expects.
    pub fn residual_arity(&self) -> usize {
        S::RESIDUAL_ARITY
    }

    /// Kinds of the storage slots, in declared order.
    pub fn slot_kinds(&self) -> SmallVec<[SlotKind; MAX_ARITY]> {
        self.slots.slot_kinds()
    }

    /// Serialisable summary of this binding's shape.
    pub fn shape(&self) -> BindingShape {
        BindingShape {
            arity: S::ARITY,
            residual_arity: S::RESIDUAL_ARITY,
            slots: self.slots.slot_kinds(),
        }
    }

    /// Resolves the storage against `args` and calls the target.
    ///
    /// Unlike [`Bound::call`], `args` may carry more arguments than the placeholders use; the
    /// unused ones are dropped.
    pub fn eval<Args>(&self, args: Args) -> CallResult<<T as Invoke<S::Resolved>>::Output>
    where
        Args: ArgList,
        S: Resolve<Args>,
        T: Invoke<S::Resolved>,
    {
        self.slots.invoke_with(&self.target, args)
    }

    /// Calls the binding with exactly [`Bound::residual_arity`] arguments.
    ///
    /// Passing a different number of arguments is rejected at compile time.
    pub fn call<Args>(&self, args: Args) -> CallResult<<T as Invoke<S::Resolved>>::Output>
    where
        Args: ArgList,
        S: Resolve<Args>,
        T: Invoke<S::Resolved>,
    {
        assert_residual_arity::<S, Args>();
        self.eval(args)
    }

    /// Resolves only slot `K` (1-based) against `args`.
    pub fn resolve_slot<const K: usize, Args>(
        &self,
        args: Args,
    ) -> CallResult<<<S as Select<K>>::Output as Slot<Args::Pending>>::Output>
    where
        Args: ArgList,
        S: Select<K>,
        <S as Select<K>>::Output: Slot<Args::Pending>,
    {
        let mut pending = args.into_pending();
        <S as Select<K>>::select(&self.slots).resolve(&mut pending)
    }

    /// Splits the binding back into its target and storage.
    pub fn into_parts(self) -> (T, S) {
        (self.target, self.slots)
    }
}

impl<T, S: SlotList> fmt::Debug for Bound<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bound")
            .field("target", &type_name::<T>())
            .field("slots", &self.slots.slot_kinds())
            .finish()
    }
}

impl<T, S, Args> Invoke<Args> for Bound<T, S>
where
    Args: ArgList,
    S: Resolve<Args>,
    T: Invoke<S::Resolved>,
{
    type Output = T::Output;

    #[inline]
    fn invoke(&self, args: Args) -> CallResult<T::Output> {
        self.eval(args)
    }

    fn inject_receiver(&mut self, receiver: &dyn Any) -> CallResult<bool> {
        <T as Invoke<S::Resolved>>::inject_receiver(&mut self.target, receiver)
    }
}

/// Rejects, at compile time, a caller argument list whose length differs from the residual
/// arity of the storage `S`.
pub(crate) fn assert_residual_arity<S: SlotList, Args: ArgList>() {
    const {
        assert!(
            S::RESIDUAL_ARITY == Args::ARITY,
            "argument count must equal the binding's residual arity"
        );
    };
}

/// Shape of a binding: how many slots it has, how many arguments it still needs, and what
/// each slot holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingShape {
    /// Number of slots, i.e. the number of arguments the target receives.
    pub arity: usize,
    /// Number of arguments a call must supply: the highest placeholder index.
    pub residual_arity: usize,
    /// What each slot holds, in declared order.
    pub slots: SmallVec<[SlotKind; MAX_ARITY]>,
}

impl BindingShape {
    /// Distinct placeholder indices used by the binding, ascending.
    pub fn placeholders(&self) -> SmallVec<[usize; MAX_ARITY]> {
        let mut indices: SmallVec<[usize; MAX_ARITY]> = self.slots.iter().filter_map(|kind| kind.placeholder()).collect();
        indices.sort_unstable();
        indices.dedup();
        indices
    }
}

/// Binds `slots` to a free function, closure, nested binding or other [`Invoke`] target.
///
/// Each slot is a plain value, [`by_value`](crate::by_value), [`by_ref`](crate::by_ref) or a
/// placeholder.
pub fn bind<T, S: SlotList>(target: T, slots: S) -> Bound<T, S> {
    Bound::new(target, slots)
}

/// Binds `slots` to a method; slot 1 supplies the receiver.
///
/// The receiver slot resolves to a [`Receiver`](crate::Receiver): a captured
/// [`Shared`](crate::Shared) handle, a [`by_ref`](crate::by_ref) to a `RefCell`, or a
/// placeholder for a receiver passed at call time.
///
/// Both `&mut self` and `&self` methods bind; the receiver form `M` is inferred from the
/// method's signature when the binding is called.
pub fn bind_method<F, M, S: SlotList>(method: F, slots: S) -> Bound<Method<F, M>, S> {
    Bound::new(Method::new(method), slots)
}
