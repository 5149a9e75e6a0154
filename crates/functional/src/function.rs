//! The type-erased callable wrapper.
//!
//! [`Function<'a, Args, R>`] holds any callable with the parameter tuple `Args` and return type
//! `R` behind one uniform call interface: a free function or closure, a method with or
//! without its receiver, or a [`Bound`] partial application. The concrete callable lives in a
//! boxed core; cloning the wrapper deep-clones that core, so two wrappers never share state.
//!
//! ```
//! use functional::{Function, bind, placeholders::*};
//!
//! let mut f: Function<'_, (i32,), i32> = Function::empty();
//! assert!(f.call((1,)).is_err());
//!
//! f = Function::from(bind(|a: i32, b: i32| a * b, (_1, 3_i32)));
//! let g = f.clone();
//! f = Function::from_fn(|x: i32| x - 1);
//! assert_eq!(f.call((7,)).unwrap(), 6);
//! assert_eq!(g.call((7,)).unwrap(), 21);
//! ```

use std::{any::Any, fmt};

use serde::{Deserialize, Serialize};
use strum::{Display, IntoStaticStr};

use crate::{
    args::ArgList,
    bind::{Bound, assert_residual_arity},
    error::{CallError, CallResult},
    invoke::Invoke,
    method::{MethodAdapter, MethodFn, Shared},
    storage::Resolve,
    tracer::{CallTracer, NoopTracer},
};

/// Which variant of callable a [`Function`] holds.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, IntoStaticStr, Serialize, Deserialize,
)]
pub enum CoreKind {
    /// A free function, closure, or any other [`Invoke`] target called directly.
    FreeFunction,
    /// A method called on a receiver held by the core.
    MethodAdapter,
    /// A partial application.
    BoundCall,
}

/// Object-safe view of one stored callable.
trait Core<'a, Args, R> {
    /// Returns an independent copy of this core.
    fn clone_box(&self) -> BoxedCore<'a, Args, R>;

    fn invoke(&self, args: Args) -> CallResult<R>;

    /// Offers a receiver; see [`Invoke::inject_receiver`].
    fn inject_receiver(&mut self, receiver: &dyn Any) -> CallResult<bool>;

    fn kind(&self) -> CoreKind;
}

type BoxedCore<'a, Args, R> = Box<dyn Core<'a, Args, R> + 'a>;

// ============================================================================
// Core variants
// ============================================================================

struct FreeFunctionCore<F>(F);

impl<'a, Args, R, F> Core<'a, Args, R> for FreeFunctionCore<F>
where
    F: Invoke<Args, Output = R> + Clone + 'a,
{
    fn clone_box(&self) -> BoxedCore<'a, Args, R> {
        Box::new(Self(self.0.clone()))
    }

    #[inline]
    fn invoke(&self, args: Args) -> CallResult<R> {
        self.0.invoke(args)
    }

    /// Free functions have no receiver, whatever the wrapped target is.
    fn inject_receiver(&mut self, _receiver: &dyn Any) -> CallResult<bool> {
        Ok(false)
    }

    fn kind(&self) -> CoreKind {
        CoreKind::FreeFunction
    }
}

struct MethodCore<C, F, M>(MethodAdapter<C, F, M>);

impl<'a, Args, R, C, F, M> Core<'a, Args, R> for MethodCore<C, F, M>
where
    C: 'static,
    F: MethodFn<C, Args, M, Output = R> + Clone + 'a,
    M: 'a,
{
    fn clone_box(&self) -> BoxedCore<'a, Args, R> {
        Box::new(Self(self.0.clone()))
    }

    #[inline]
    fn invoke(&self, args: Args) -> CallResult<R> {
        self.0.invoke(args)
    }

    fn inject_receiver(&mut self, receiver: &dyn Any) -> CallResult<bool> {
        <MethodAdapter<C, F, M> as Invoke<Args>>::inject_receiver(&mut self.0, receiver)
    }

    fn kind(&self) -> CoreKind {
        CoreKind::MethodAdapter
    }
}

struct BoundCore<T, S>(Bound<T, S>);

impl<'a, Args, R, T, S> Core<'a, Args, R> for BoundCore<T, S>
where
    Args: ArgList,
    S: Resolve<Args> + Clone + 'a,
    T: Invoke<S::Resolved, Output = R> + Clone + 'a,
{
    fn clone_box(&self) -> BoxedCore<'a, Args, R> {
        Box::new(Self(self.0.clone()))
    }

    #[inline]
    fn invoke(&self, args: Args) -> CallResult<R> {
        self.0.eval(args)
    }

    fn inject_receiver(&mut self, receiver: &dyn Any) -> CallResult<bool> {
        <Bound<T, S> as Invoke<Args>>::inject_receiver(&mut self.0, receiver)
    }

    fn kind(&self) -> CoreKind {
        CoreKind::BoundCall
    }
}

// ============================================================================
// Function
// ============================================================================

/// A clonable, type-erased callable taking `Args` and returning `R`.
///
/// Starts empty when built with [`Function::empty`] or [`Default`]; calling an empty wrapper
/// fails with [`CallError::Uninitialized`]. Assigning a new wrapper drops the old core.
///
/// The lifetime `'a` bounds whatever the stored callable borrows, typically the referents of
/// [`by_ref`](crate::by_ref) slots.
pub struct Function<'a, Args, R> {
    core: Option<BoxedCore<'a, Args, R>>,
}

impl<'a, Args, R> Function<'a, Args, R> {
    /// Creates a wrapper with no callable.
    pub fn empty() -> Self {
        Self { core: None }
    }

    /// Wraps a free function, closure or other [`Invoke`] target.
    pub fn from_fn<F>(function: F) -> Self
    where
        F: Invoke<Args, Output = R> + Clone + 'a,
    {
        Self::from_core(FreeFunctionCore(function))
    }

    /// Wraps a method with no receiver yet.
    ///
    /// Calls fail with [`CallError::NoReceiver`] until [`Function::set_receiver`] attaches one.
    /// The method may take its receiver as `&mut self` or `&self`.
    pub fn from_method<C, F, M>(method: F) -> Self
    where
        C: 'static,
        F: MethodFn<C, Args, M, Output = R> + Clone + 'a,
        M: 'a,
    {
        Self::from_adapter(MethodAdapter::new(method))
    }

    /// Wraps a method together with the receiver it is called on.
    pub fn from_method_with<C, F, M>(method: F, receiver: Shared<C>) -> Self
    where
        C: 'static,
        F: MethodFn<C, Args, M, Output = R> + Clone + 'a,
        M: 'a,
    {
        Self::from_adapter(MethodAdapter::with_receiver(method, receiver))
    }

    /// Wraps an existing method adapter, keeping whatever receiver it has.
    pub fn from_adapter<C, F, M>(adapter: MethodAdapter<C, F, M>) -> Self
    where
        C: 'static,
        F: MethodFn<C, Args, M, Output = R> + Clone + 'a,
        M: 'a,
    {
        Self::from_core(MethodCore(adapter))
    }

    /// Wraps a partial application.
    ///
    /// `Args` must have exactly as many elements as the binding's residual arity; any other
    /// count is rejected at compile time.
    pub fn from_bound<T, S>(bound: Bound<T, S>) -> Self
    where
        Args: ArgList,
        S: Resolve<Args> + Clone + 'a,
        T: Invoke<S::Resolved, Output = R> + Clone + 'a,
    {
        assert_residual_arity::<S, Args>();
        Self::from_core(BoundCore(bound))
    }

    fn from_core(core: impl Core<'a, Args, R> + 'a) -> Self {
        Self {
            core: Some(Box::new(core)),
        }
    }

    /// Whether no callable is stored.
    pub fn is_empty(&self) -> bool {
        self.core.is_none()
    }

    /// Variant of the stored callable, or `None` when empty.
    pub fn kind(&self) -> Option<CoreKind> {
        self.core.as_ref().map(|core| core.kind())
    }

    /// Drops the stored callable, leaving the wrapper empty.
    pub fn clear(&mut self) {
        self.core = None;
    }

    /// Attaches a clone of the `receiver` handle to the stored callable.
    ///
    /// Returns `Ok(true)` if a method adapter took it and `Ok(false)` if the callable has no
    /// receiver to set (a free function, or a binding around one).
    pub fn set_receiver<C: 'static>(&mut self, receiver: &Shared<C>) -> CallResult<bool> {
        self.set_receiver_traced(receiver, &mut NoopTracer)
    }

    /// [`Function::set_receiver`], reporting the outcome to `tracer`.
    pub fn set_receiver_traced<C: 'static>(
        &mut self,
        receiver: &Shared<C>,
        tracer: &mut impl CallTracer,
    ) -> CallResult<bool> {
        let Some(core) = &mut self.core else {
            let error = CallError::Uninitialized;
            tracer.on_error(&error);
            return Err(error);
        };
        match core.inject_receiver(receiver) {
            Ok(attached) => {
                tracer.on_receiver(core.kind(), attached);
                Ok(attached)
            }
            Err(error) => {
                tracer.on_error(&error);
                Err(error)
            }
        }
    }
}

impl<Args: ArgList, R> Function<'_, Args, R> {
    /// Calls the stored callable.
    pub fn call(&self, args: Args) -> CallResult<R> {
        self.call_traced(args, &mut NoopTracer)
    }

    /// Calls the stored callable, reporting the call to `tracer`.
    pub fn call_traced(&self, args: Args, tracer: &mut impl CallTracer) -> CallResult<R> {
        let Some(core) = &self.core else {
            let error = CallError::Uninitialized;
            tracer.on_error(&error);
            return Err(error);
        };
        let kind = core.kind();
        tracer.on_invoke(kind, Args::ARITY);
        match core.invoke(args) {
            Ok(value) => {
                tracer.on_return(kind);
                Ok(value)
            }
            Err(error) => {
                tracer.on_error(&error);
                Err(error)
            }
        }
    }
}

impl<Args, R> Default for Function<'_, Args, R> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<Args, R> Clone for Function<'_, Args, R> {
    fn clone(&self) -> Self {
        Self {
            core: self.core.as_ref().map(|core| core.clone_box()),
        }
    }
}

impl<Args, R> fmt::Debug for Function<'_, Args, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            Some(kind) => f.debug_tuple("Function").field(&kind).finish(),
            None => f.write_str("Function(Empty)"),
        }
    }
}

impl<'a, T, S, Args, R> From<Bound<T, S>> for Function<'a, Args, R>
where
    Args: ArgList,
    S: Resolve<Args> + Clone + 'a,
    T: Invoke<S::Resolved, Output = R> + Clone + 'a,
{
    fn from(bound: Bound<T, S>) -> Self {
        Self::from_bound(bound)
    }
}

impl<'a, C, F, M, Args, R> From<MethodAdapter<C, F, M>> for Function<'a, Args, R>
where
    C: 'static,
    F: MethodFn<C, Args, M, Output = R> + Clone + 'a,
    M: 'a,
{
    fn from(adapter: MethodAdapter<C, F, M>) -> Self {
        Self::from_adapter(adapter)
    }
}

impl<Args: ArgList, R> Invoke<Args> for Function<'_, Args, R> {
    type Output = R;

    #[inline]
    fn invoke(&self, args: Args) -> CallResult<R> {
        self.call(args)
    }

    fn inject_receiver(&mut self, receiver: &dyn Any) -> CallResult<bool> {
        match &mut self.core {
            Some(core) => core.inject_receiver(receiver),
            None => Err(CallError::Uninitialized),
        }
    }
}
