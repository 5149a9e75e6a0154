//! Caller-supplied argument lists.
//!
//! Arguments travel as plain tuples of arity 0 to [`MAX_ARITY`](crate::MAX_ARITY). The same
//! [`Select`] impls serve binding storage, since a storage is also a tuple (of slots), and the
//! pending form of an argument list, a tuple of `Option`s.

/// An ordered, fixed-length list of call arguments.
pub trait ArgList {
    /// Number of arguments in the list.
    const ARITY: usize;

    /// The same list with every argument wrapped in `Option`, so that a binding can move
    /// arguments out one at a time while it resolves its slots.
    type Pending;

    /// Returns [`Self::ARITY`].
    fn arity(&self) -> usize {
        Self::ARITY
    }

    /// Wraps every argument in `Some`.
    fn into_pending(self) -> Self::Pending;
}

impl ArgList for () {
    const ARITY: usize = 0;
    type Pending = ();

    #[inline]
    fn into_pending(self) {}
}

macro_rules! impl_arg_list {
    ($arity:literal; $($A:ident . $idx:tt),+) => {
        impl<$($A),+> ArgList for ($($A,)+) {
            const ARITY: usize = $arity;
            type Pending = ($(Option<$A>,)+);

            #[inline]
            fn into_pending(self) -> Self::Pending {
                ($(Some(self.$idx),)+)
            }
        }
    };
}

impl_arg_list!(1; A.0);
impl_arg_list!(2; A.0, B.1);
impl_arg_list!(3; A.0, B.1, C.2);
impl_arg_list!(4; A.0, B.1, C.2, D.3);

/// Typed access to position `N` (1-based) of a tuple.
///
/// There is no impl for `N == 0` or for `N` past the tuple's length, so asking for an
/// argument the caller doesn't supply is a compile error rather than a runtime one.
pub trait Select<const N: usize> {
    /// Type of the element at position `N`.
    type Output;

    /// Borrows the element at position `N`.
    fn select(&self) -> &Self::Output;

    /// Mutably borrows the element at position `N`.
    fn select_mut(&mut self) -> &mut Self::Output;
}

macro_rules! impl_select {
    ($index:literal => $field:tt: $T:ident in ($($All:ident),+)) => {
        impl<$($All),+> Select<$index> for ($($All,)+) {
            type Output = $T;

            #[inline]
            fn select(&self) -> &$T {
                &self.$field
            }

            #[inline]
            fn select_mut(&mut self) -> &mut $T {
                &mut self.$field
            }
        }
    };
}

impl_select!(1 => 0: A in (A));

impl_select!(1 => 0: A in (A, B));
impl_select!(2 => 1: B in (A, B));

impl_select!(1 => 0: A in (A, B, C));
impl_select!(2 => 1: B in (A, B, C));
impl_select!(3 => 2: C in (A, B, C));

impl_select!(1 => 0: A in (A, B, C, D));
impl_select!(2 => 1: B in (A, B, C, D));
impl_select!(3 => 2: C in (A, B, C, D));
impl_select!(4 => 3: D in (A, B, C, D));
