//! Resolution outcomes.
//!
//! Lookups never signal "not found" through panics or `Err`; they return a
//! [`SymbolReference`] that keeps "nothing matched" apart from "several
//! candidates matched equally well".

use smallvec::SmallVec;

/// Outcome of resolving a name, a member or a call.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SymbolReference<T> {
    Solved(T),
    Unsolved,
    /// Two or more candidates that could not be ordered.
    Ambiguous(SmallVec<[T; 2]>),
}

impl<T> SymbolReference<T> {
    #[inline]
    pub fn is_solved(&self) -> bool {
        matches!(self, Self::Solved(_))
    }

    #[inline]
    pub fn is_unsolved(&self) -> bool {
        matches!(self, Self::Unsolved)
    }

    #[inline]
    pub fn is_ambiguous(&self) -> bool {
        matches!(self, Self::Ambiguous(_))
    }

    /// The solved value, dropping the distinction between the failure kinds.
    pub fn solved(self) -> Option<T> {
        match self {
            Self::Solved(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_solved(&self) -> Option<&T> {
        match self {
            Self::Solved(value) => Some(value),
            _ => None,
        }
    }

    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> SymbolReference<U> {
        match self {
            Self::Solved(value) => SymbolReference::Solved(f(value)),
            Self::Unsolved => SymbolReference::Unsolved,
            Self::Ambiguous(values) => SymbolReference::Ambiguous(values.into_iter().map(f).collect()),
        }
    }

    /// Chain a follow-up lookup on a solved value.
    ///
    /// An ambiguous input stays ambiguous only if every candidate maps to a
    /// solved value; otherwise the chain is unsolved.
    pub fn and_then<U>(self, mut f: impl FnMut(T) -> SymbolReference<U>) -> SymbolReference<U> {
        match self {
            Self::Solved(value) => f(value),
            Self::Unsolved => SymbolReference::Unsolved,
            Self::Ambiguous(values) => {
                let mut out = SmallVec::new();
                for value in values {
                    match f(value) {
                        SymbolReference::Solved(mapped) => out.push(mapped),
                        _ => return SymbolReference::Unsolved,
                    }
                }
                SymbolReference::Ambiguous(out)
            }
        }
    }

    /// Try a fallback when unsolved. Ambiguity is kept: a fallback must not
    /// hide a real conflict.
    pub fn or_else_with(self, f: impl FnOnce() -> SymbolReference<T>) -> SymbolReference<T> {
        match self {
            Self::Unsolved => f(),
            other => other,
        }
    }
}

impl<T> From<Option<T>> for SymbolReference<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::Solved(value),
            None => Self::Unsolved,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn map_keeps_outcome_kind() {
        assert_eq!(SymbolReference::Solved(2).map(|v| v * 10), SymbolReference::Solved(20));
        assert_eq!(SymbolReference::<i32>::Unsolved.map(|v| v * 10), SymbolReference::Unsolved);
        let amb: SymbolReference<i32> = SymbolReference::Ambiguous(smallvec![1, 2]);
        assert_eq!(amb.map(|v| v + 1), SymbolReference::Ambiguous(smallvec![2, 3]));
    }

    #[test]
    fn or_else_with_only_replaces_unsolved() {
        let fallback = || SymbolReference::Solved(9);
        assert_eq!(SymbolReference::Unsolved.or_else_with(fallback), SymbolReference::Solved(9));
        assert_eq!(SymbolReference::Solved(1).or_else_with(fallback), SymbolReference::Solved(1));
        let amb: SymbolReference<i32> = SymbolReference::Ambiguous(smallvec![1, 2]);
        assert!(amb.or_else_with(fallback).is_ambiguous());
    }

    #[test]
    fn and_then_on_ambiguous() {
        let amb: SymbolReference<i32> = SymbolReference::Ambiguous(smallvec![1, 2]);
        assert!(amb.clone().and_then(SymbolReference::Solved).is_ambiguous());
        let partial = amb.and_then(|v| if v == 1 { SymbolReference::Solved(v) } else { SymbolReference::Unsolved });
        assert!(partial.is_unsolved());
    }

    #[test]
    fn from_option() {
        assert_eq!(SymbolReference::from(Some("x")).solved(), Some("x"));
        assert!(SymbolReference::<u8>::from(None).is_unsolved());
    }
}
