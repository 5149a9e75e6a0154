//! Method adapters: calling `fn(&mut C, args...)` and `fn(&C, args...)` methods like free
//! functions.
//!
//! Which receiver form a method takes is recorded in a marker type parameter, [`MutSelf`] or
//! [`RefSelf`], that the compiler infers from the method's signature. A `&self` method only
//! borrows its receiver shared for the call, so it can run while another `&self` call on the
//! same receiver is in progress.
//!
//! Two shapes are provided:
//!
//! - [`Method<F, M>`] has no receiver of its own and takes it as the first call argument,
//!   giving the uniform shape `(receiver, args...)`. It is the target [`bind_method`]
//!   builds, so the receiver can be captured, captured by reference, or left as a
//!   placeholder like any other slot.
//! - [`MethodAdapter<C, F, M>`] owns an optional [`Shared<C>`] receiver and takes only the
//!   method's own arguments. The receiver can be attached at construction or later, which
//!   is how a [`Function`](crate::Function) built from a bare method gets its receiver.
//!
//! An attached receiver always wins. [`MethodAdapter::call_with_receiver`] consults its
//! fallback only when nothing was ever attached.
//!
//! [`bind_method`]: crate::bind_method

use std::{
    any::{Any, type_name},
    cell::RefCell,
    fmt,
    marker::PhantomData,
    rc::Rc,
};

use crate::{
    error::{CallError, CallResult},
    invoke::Invoke,
};

/// Shared, mutable receiver handle.
pub type Shared<C> = Rc<RefCell<C>>;

/// Wraps `value` in a [`Shared`] handle.
pub fn shared<C>(value: C) -> Shared<C> {
    Rc::new(RefCell::new(value))
}

/// A handle through which a method's receiver can be borrowed mutably for one call.
pub trait Receiver {
    /// The object methods are called on.
    type Target;

    /// Runs `f` with the target borrowed mutably.
    ///
    /// Fails with [`CallError::ReceiverBusy`] if the target is already borrowed, which happens
    /// when a method re-enters a callable bound to its own receiver.
    fn with_target<R>(&self, f: impl FnOnce(&mut Self::Target) -> R) -> CallResult<R>;

    /// Runs `f` with the target borrowed immutably.
    ///
    /// Fails with [`CallError::ReceiverBusy`] only if the target is mutably borrowed.
    fn with_target_ref<R>(&self, f: impl FnOnce(&Self::Target) -> R) -> CallResult<R>;
}

impl<C> Receiver for Rc<RefCell<C>> {
    type Target = C;

    #[inline]
    fn with_target<R>(&self, f: impl FnOnce(&mut C) -> R) -> CallResult<R> {
        borrow_target(self, f)
    }

    #[inline]
    fn with_target_ref<R>(&self, f: impl FnOnce(&C) -> R) -> CallResult<R> {
        borrow_target_ref(self, f)
    }
}

impl<C> Receiver for &RefCell<C> {
    type Target = C;

    #[inline]
    fn with_target<R>(&self, f: impl FnOnce(&mut C) -> R) -> CallResult<R> {
        borrow_target(self, f)
    }

    #[inline]
    fn with_target_ref<R>(&self, f: impl FnOnce(&C) -> R) -> CallResult<R> {
        borrow_target_ref(self, f)
    }
}

fn borrow_target<C, R>(cell: &RefCell<C>, f: impl FnOnce(&mut C) -> R) -> CallResult<R> {
    match cell.try_borrow_mut() {
        Ok(mut target) => Ok(f(&mut *target)),
        Err(_) => receiver_busy::<C, R>(),
    }
}

fn borrow_target_ref<C, R>(cell: &RefCell<C>, f: impl FnOnce(&C) -> R) -> CallResult<R> {
    match cell.try_borrow() {
        Ok(target) => Ok(f(&*target)),
        Err(_) => receiver_busy::<C, R>(),
    }
}

#[cfg(not(feature = "receiver-panic"))]
fn receiver_busy<C, R>() -> CallResult<R> {
    Err(CallError::ReceiverBusy {
        receiver: type_name::<C>(),
    })
}

#[cfg(feature = "receiver-panic")]
fn receiver_busy<C, R>() -> CallResult<R> {
    panic!("receiver `{}` is already borrowed", type_name::<C>())
}

/// Receiver form of a method taking `&mut self`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MutSelf;

/// Receiver form of a method taking `&self`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RefSelf;

/// A method of `C` taking the argument tuple `Args` after the receiver.
///
/// Implemented for every `Fn(&mut C, A1, .., An) -> R` (with `M = MutSelf`) and every
/// `Fn(&C, A1, .., An) -> R` (with `M = RefSelf`) where `n <= 4`. That covers method paths
/// such as `Counter::increment` and `Counter::get`, and closures written in the same shape.
pub trait MethodFn<C, Args, M = MutSelf> {
    /// Return type of the method.
    type Output;

    /// Calls the method on `receiver`.
    fn call_method(&self, receiver: &mut C, args: Args) -> Self::Output;

    /// Borrows the target of `receiver` the way the method needs it and calls the method.
    fn call_on<H>(&self, receiver: &H, args: Args) -> CallResult<Self::Output>
    where
        H: Receiver<Target = C> + ?Sized;
}

macro_rules! impl_method_fn {
    ($($A:ident . $idx:tt),*) => {
        impl<Func, C, Ret, $($A),*> MethodFn<C, ($($A,)*), MutSelf> for Func
        where
            Func: Fn(&mut C, $($A),*) -> Ret,
        {
            type Output = Ret;

            #[inline]
            #[allow(unused_variables)]
            fn call_method(&self, receiver: &mut C, args: ($($A,)*)) -> Ret {
                self(receiver, $(args.$idx),*)
            }

            #[inline]
            #[allow(unused_variables)]
            fn call_on<H>(&self, receiver: &H, args: ($($A,)*)) -> CallResult<Ret>
            where
                H: Receiver<Target = C> + ?Sized,
            {
                receiver.with_target(|target| self(target, $(args.$idx),*))
            }
        }

        impl<Func, C, Ret, $($A),*> MethodFn<C, ($($A,)*), RefSelf> for Func
        where
            Func: Fn(&C, $($A),*) -> Ret,
        {
            type Output = Ret;

            #[inline]
            #[allow(unused_variables)]
            fn call_method(&self, receiver: &mut C, args: ($($A,)*)) -> Ret {
                self(&*receiver, $(args.$idx),*)
            }

            #[inline]
            #[allow(unused_variables)]
            fn call_on<H>(&self, receiver: &H, args: ($($A,)*)) -> CallResult<Ret>
            where
                H: Receiver<Target = C> + ?Sized,
            {
                receiver.with_target_ref(|target| self(target, $(args.$idx),*))
            }
        }
    };
}

impl_method_fn!();
impl_method_fn!(A1.0);
impl_method_fn!(A1.0, A2.1);
impl_method_fn!(A1.0, A2.1, A3.2);
impl_method_fn!(A1.0, A2.1, A3.2, A4.3);

/// A method without a receiver, called as `(receiver, args...)`.
#[derive(Clone, Copy)]
pub struct Method<F, M = MutSelf> {
    method: F,
    form: PhantomData<fn() -> M>,
}

impl<F, M> Method<F, M> {
    /// Wraps a method.
    pub fn new(method: F) -> Self {
        Self {
            method,
            form: PhantomData,
        }
    }

    /// Returns the wrapped method.
    pub fn method(&self) -> &F {
        &self.method
    }

    /// Turns this into an adapter with `receiver` attached.
    pub fn with_receiver<C>(self, receiver: Shared<C>) -> MethodAdapter<C, F, M> {
        MethodAdapter::with_receiver(self.method, receiver)
    }
}

impl<F, M> fmt::Debug for Method<F, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Method").field("method", &type_name::<F>()).finish()
    }
}

macro_rules! impl_invoke_method {
    ($($A:ident $a:ident),*) => {
        impl<F, M, H, $($A),*> Invoke<(H, $($A,)*)> for Method<F, M>
        where
            H: Receiver,
            F: MethodFn<H::Target, ($($A,)*), M>,
        {
            type Output = <F as MethodFn<H::Target, ($($A,)*), M>>::Output;

            #[inline]
            fn invoke(&self, (receiver, $($a,)*): (H, $($A,)*)) -> CallResult<Self::Output> {
                self.method.call_on(&receiver, ($($a,)*))
            }
        }
    };
}

impl_invoke_method!();
impl_invoke_method!(A1 a1);
impl_invoke_method!(A1 a1, A2 a2);
impl_invoke_method!(A1 a1, A2 a2, A3 a3);

/// A method together with an optional attached receiver, called as `(args...)`.
///
/// Starts unbound when built with [`MethodAdapter::new`]; calling it before a receiver is
/// attached fails with [`CallError::NoReceiver`].
pub struct MethodAdapter<C, F, M = MutSelf> {
    method: F,
    receiver: Option<Shared<C>>,
    form: PhantomData<fn() -> M>,
}

impl<C, F, M> MethodAdapter<C, F, M> {
    /// Wraps a method with no receiver attached.
    pub fn new(method: F) -> Self {
        Self {
            method,
            receiver: None,
            form: PhantomData,
        }
    }

    /// Wraps a method with `receiver` attached.
    pub fn with_receiver(method: F, receiver: Shared<C>) -> Self {
        Self {
            method,
            receiver: Some(receiver),
            form: PhantomData,
        }
    }

    /// Attaches `receiver`, returning the previously attached one.
    pub fn attach_receiver(&mut self, receiver: Shared<C>) -> Option<Shared<C>> {
        self.receiver.replace(receiver)
    }

    /// Returns this adapter with `receiver` attached in place of any previous one.
    #[must_use]
    pub fn attached(mut self, receiver: Shared<C>) -> Self {
        self.receiver = Some(receiver);
        self
    }

    /// Returns the attached receiver, if any.
    pub fn receiver(&self) -> Option<&Shared<C>> {
        self.receiver.as_ref()
    }

    /// Whether a receiver is attached.
    pub fn has_receiver(&self) -> bool {
        self.receiver.is_some()
    }

    /// Returns the wrapped method.
    pub fn method(&self) -> &F {
        &self.method
    }

    /// Calls the method on the attached receiver, or on `fallback` if none was attached.
    pub fn call_with_receiver<H, Args>(
        &self,
        fallback: &H,
        args: Args,
    ) -> CallResult<<F as MethodFn<C, Args, M>>::Output>
    where
        H: Receiver<Target = C>,
        F: MethodFn<C, Args, M>,
    {
        match &self.receiver {
            Some(receiver) => self.method.call_on(receiver, args),
            None => self.method.call_on(fallback, args),
        }
    }
}

impl<C, F: Clone, M> Clone for MethodAdapter<C, F, M> {
    fn clone(&self) -> Self {
        Self {
            method: self.method.clone(),
            receiver: self.receiver.clone(),
            form: PhantomData,
        }
    }
}

impl<C, F, M> fmt::Debug for MethodAdapter<C, F, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodAdapter")
            .field("method", &type_name::<F>())
            .field("receiver", &self.receiver.as_ref().map(|_| type_name::<C>()))
            .finish()
    }
}

impl<C: 'static, F, M, Args> Invoke<Args> for MethodAdapter<C, F, M>
where
    F: MethodFn<C, Args, M>,
{
    type Output = F::Output;

    fn invoke(&self, args: Args) -> CallResult<F::Output> {
        let Some(receiver) = &self.receiver else {
            return Err(CallError::NoReceiver {
                method: type_name::<F>(),
            });
        };
        self.method.call_on(receiver, args)
    }

    fn inject_receiver(&mut self, receiver: &dyn Any) -> CallResult<bool> {
        let Some(receiver) = receiver.downcast_ref::<Shared<C>>() else {
            return Err(CallError::ReceiverMismatch {
                expected: type_name::<Shared<C>>(),
            });
        };
        self.attach_receiver(Rc::clone(receiver));
        Ok(true)
    }
}
