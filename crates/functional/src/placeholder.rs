//! Positional placeholders.
//!
//! A placeholder stands in for an argument that is not known when a binding is made. `_1`
//! in slot K of a binding means "pass the caller's first argument as the K-th argument of
//! the target". The index lives entirely in the type: a placeholder is zero-sized, and a
//! placeholder pointing past the arguments a caller supplies fails to type-check.
//!
//! A plain placeholder moves the caller's argument into its slot, so it may appear only once
//! per binding. To hand the same argument to several slots, use [`Placeholder::cloned`] in
//! each of them.

use std::fmt;

/// Largest number of slots a binding, and the largest number of parameters a wrapped
/// signature, may have.
pub const MAX_ARITY: usize = 4;

/// Marks a binding slot as "filled by caller argument `N`" (1-based).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Placeholder<const N: usize>;

impl<const N: usize> Placeholder<N> {
    /// The caller-argument position this placeholder refers to.
    pub const INDEX: usize = N;

    /// Returns the 1-based caller-argument position.
    #[must_use]
    pub const fn index(self) -> usize {
        N
    }

    /// A slot that clones caller argument `N` instead of moving it.
    ///
    /// ```
    /// use functional::{bind, placeholders::*};
    ///
    /// let square = bind(|a: i32, b: i32| a * b, (_1.cloned(), _1.cloned()));
    /// assert_eq!(square.call((4,)).unwrap(), 16);
    /// ```
    #[must_use]
    pub const fn cloned(self) -> Cloned<N> {
        Cloned
    }
}

impl<const N: usize> fmt::Display for Placeholder<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "_{N}")
    }
}

/// Marks a binding slot as "filled by a clone of caller argument `N`" (1-based).
///
/// Built with [`Placeholder::cloned`]. Any number of slots may clone the same argument, but
/// an argument that some slot moves through a plain [`Placeholder`] cannot also be cloned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Cloned<const N: usize>;

impl<const N: usize> fmt::Display for Cloned<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "_{N}.cloned()")
    }
}

/// First caller argument.
pub const _1: Placeholder<1> = Placeholder;
/// Second caller argument.
pub const _2: Placeholder<2> = Placeholder;
/// Third caller argument.
pub const _3: Placeholder<3> = Placeholder;
/// Fourth caller argument.
pub const _4: Placeholder<4> = Placeholder;
