//! Argument storage: the fixed-arity tuple of slots a binding owns.
//!
//! A storage of arity N is a tuple `(S1, ..., SN)` where every `Si` is a [`Slot`]. Its arity
//! and slot kinds are fixed by its type, and it is never mutated after construction. At call
//! time the storage is resolved against the caller's argument tuple in declared slot order:
//! slot K always supplies the K-th argument of the target, whether captured or substituted.
//!
//! Resolution consumes the caller's arguments. Each argument may be moved into at most one
//! slot; a storage that moves the same argument twice, or both moves and clones it, fails to
//! compile as soon as it is resolved.

use smallvec::{SmallVec, smallvec};

use crate::{
    args::ArgList,
    error::CallResult,
    invoke::Invoke,
    placeholder::MAX_ARITY,
    slot::{Slot, SlotInfo, SlotKind},
};

/// Static shape of a slot tuple.
pub trait SlotList {
    /// Number of slots.
    const ARITY: usize;
    /// Number of caller arguments a call must supply: the highest placeholder index, or 0
    /// when every slot is captured.
    const RESIDUAL_ARITY: usize;

    /// Kinds of the slots, in declared order.
    fn slot_kinds(&self) -> SmallVec<[SlotKind; MAX_ARITY]>;
}

/// A slot tuple that can be resolved against the caller argument list `Args`.
pub trait Resolve<Args>: SlotList {
    /// Tuple of resolved arguments handed to the target.
    type Resolved;

    /// Resolves every slot in declared order, consuming `args`.
    fn resolve_all(&self, args: Args) -> CallResult<Self::Resolved>;

    /// Resolves every slot and calls `target` with the result.
    fn invoke_with<T>(&self, target: &T, args: Args) -> CallResult<T::Output>
    where
        T: Invoke<Self::Resolved> + ?Sized,
    {
        target.invoke(self.resolve_all(args)?)
    }
}

/// Highest placeholder index among `kinds`, usable in constant context.
const fn residual_arity(kinds: &[SlotKind]) -> usize {
    let mut max = 0;
    let mut i = 0;
    while i < kinds.len() {
        if let Some(index) = kinds[i].placeholder()
            && index > max
        {
            max = index;
        }
        i += 1;
    }
    max
}

/// Whether every argument moved by a plain placeholder is used by no other slot.
const fn moves_are_exclusive(kinds: &[SlotKind]) -> bool {
    let mut i = 0;
    while i < kinds.len() {
        if let SlotKind::Placeholder(index) = kinds[i] {
            let mut j = 0;
            while j < kinds.len() {
                if j != i
                    && let Some(other) = kinds[j].placeholder()
                    && other == index
                {
                    return false;
                }
                j += 1;
            }
        }
        i += 1;
    }
    true
}

impl SlotList for () {
    const ARITY: usize = 0;
    const RESIDUAL_ARITY: usize = 0;

    fn slot_kinds(&self) -> SmallVec<[SlotKind; MAX_ARITY]> {
        SmallVec::new()
    }
}

impl<Args: ArgList> Resolve<Args> for () {
    type Resolved = ();

    #[inline]
    fn resolve_all(&self, _args: Args) -> CallResult<()> {
        Ok(())
    }
}

macro_rules! impl_storage {
    ($arity:literal; $($S:ident . $idx:tt),+) => {
        impl<$($S: SlotInfo),+> SlotList for ($($S,)+) {
            const ARITY: usize = $arity;
            const RESIDUAL_ARITY: usize = residual_arity(&[$($S::KIND),+]);

            fn slot_kinds(&self) -> SmallVec<[SlotKind; MAX_ARITY]> {
                smallvec![$($S::KIND),+]
            }
        }

        impl<Args: ArgList, $($S: Slot<Args::Pending>),+> Resolve<Args> for ($($S,)+) {
            type Resolved = ($(<$S as Slot<Args::Pending>>::Output,)+);

            #[inline]
            fn resolve_all(&self, args: Args) -> CallResult<Self::Resolved> {
                const {
                    assert!(
                        moves_are_exclusive(&[$($S::KIND),+]),
                        "a caller argument moved by a placeholder can fill only one slot; use `_N.cloned()` to repeat it"
                    );
                };
                let mut pending = args.into_pending();
                Ok(($(self.$idx.resolve(&mut pending)?,)+))
            }
        }
    };
}

impl_storage!(1; S1.0);
impl_storage!(2; S1.0, S2.1);
impl_storage!(3; S1.0, S2.1, S3.2);
impl_storage!(4; S1.0, S2.1, S3.2, S4.3);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{by_ref, by_value, placeholder::*};

    #[test]
    fn residual_arity_is_the_highest_placeholder() {
        assert_eq!(<(i32,) as SlotList>::RESIDUAL_ARITY, 0);
        assert_eq!(<(Placeholder<1>, i32) as SlotList>::RESIDUAL_ARITY, 1);
        assert_eq!(
            <(i32, Placeholder<2>, i32, Placeholder<1>) as SlotList>::RESIDUAL_ARITY,
            2
        );
        assert_eq!(<(Placeholder<3>,) as SlotList>::RESIDUAL_ARITY, 3);
        assert_eq!(<(Cloned<4>, Placeholder<1>) as SlotList>::RESIDUAL_ARITY, 4);
        assert_eq!(<() as SlotList>::RESIDUAL_ARITY, 0);
    }

    #[test]
    fn slot_kinds_follow_declared_order() {
        let local = 7_u8;
        let slots = (_2, by_value(vec![1_u8]), by_ref(&local), _1);
        assert_eq!(
            slots.slot_kinds().as_slice(),
            &[
                SlotKind::Placeholder(2),
                SlotKind::Captured,
                SlotKind::ByRef,
                SlotKind::Placeholder(1)
            ]
        );
        assert_eq!(<(Placeholder<2>, i32, Placeholder<1>) as SlotList>::ARITY, 3);
    }

    #[test]
    fn resolve_all_substitutes_placeholders_in_slot_order() {
        let slots = ('a', _2, 'c', _1);
        let resolved = slots.resolve_all(('x', 'y')).unwrap();
        assert_eq!(resolved, ('a', 'y', 'c', 'x'));
    }

    #[test]
    fn invoke_with_forwards_resolved_arguments() {
        let slots = (_1, 10_i32);
        let sum = slots.invoke_with(&|a: i32, b: i32| a + b, (5_i32,)).unwrap();
        assert_eq!(sum, 15);
    }

    #[test]
    fn moved_arguments_fill_one_slot_each() {
        use SlotKind::{ByRef, Captured, Cloned, Placeholder};

        assert!(moves_are_exclusive(&[]));
        assert!(moves_are_exclusive(&[Placeholder(4), Placeholder(3), Placeholder(2), Placeholder(1)]));
        assert!(moves_are_exclusive(&[Cloned(1), Captured, Cloned(1), ByRef]));
        assert!(moves_are_exclusive(&[Cloned(1), Placeholder(2)]));
        assert!(!moves_are_exclusive(&[Placeholder(1), Placeholder(1)]));
        assert!(!moves_are_exclusive(&[Cloned(2), Captured, Placeholder(2)]));
    }
}
