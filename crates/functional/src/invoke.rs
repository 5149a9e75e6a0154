//! The invocation seam shared by every callable shape.
//!
//! [`Invoke`] is what lets a storage feed its resolved arguments to "some target" without
//! knowing what the target is: a plain function or closure, a method adapter, a nested
//! binding, or a type-erased [`Function`](crate::Function).

use std::any::Any;

use crate::error::CallResult;

/// Something that can be called with the argument tuple `Args`.
pub trait Invoke<Args> {
    /// Value produced by a successful call.
    type Output;

    /// Calls the target with `args`.
    fn invoke(&self, args: Args) -> CallResult<Self::Output>;

    /// Offers a receiver handle to this callable.
    ///
    /// Returns `Ok(true)` if the receiver was attached, `Ok(false)` if this callable has no use
    /// for a receiver. Only method adapters (and bindings or wrappers around them) attach.
    fn inject_receiver(&mut self, _receiver: &dyn Any) -> CallResult<bool> {
        Ok(false)
    }
}

impl<Func, Ret> Invoke<()> for Func
where
    Func: Fn() -> Ret,
{
    type Output = Ret;

    #[inline]
    fn invoke(&self, (): ()) -> CallResult<Ret> {
        Ok(self())
    }
}

macro_rules! impl_invoke_fn {
    ($($A:ident . $idx:tt),+) => {
        impl<Func, Ret, $($A),+> Invoke<($($A,)+)> for Func
        where
            Func: Fn($($A),+) -> Ret,
        {
            type Output = Ret;

            #[inline]
            fn invoke(&self, args: ($($A,)+)) -> CallResult<Ret> {
                Ok(self($(args.$idx),+))
            }
        }
    };
}

impl_invoke_fn!(A1.0);
impl_invoke_fn!(A1.0, A2.1);
impl_invoke_fn!(A1.0, A2.1, A3.2);
impl_invoke_fn!(A1.0, A2.1, A3.2, A4.3);
