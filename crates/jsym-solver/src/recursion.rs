//! Re-entry guard for recursive resolution.
//!
//! Typing an expression can lead back to the same node: `var x = x;`, a
//! field initializer that reads its own field, or a lambda whose target
//! depends on the call that contains it. A [`RecursionGuard`] tracks the
//! keys currently being computed and refuses a key that is already active.
//! It also caps nesting depth and the total number of entries so a
//! pathological tree cannot exhaust the stack or spin forever.

use rustc_hash::FxHashSet;
use std::hash::Hash;

/// Limits for each recursive client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecursionProfile {
    /// Supertype walks. These keep their own visited set, so only the step
    /// budget applies.
    HierarchyWalk,
    /// `type_of` recursing through receivers, arguments and initializers.
    ExpressionResolution,
    /// Lambda target typing; every level climbs to an enclosing call,
    /// declaration or `return`.
    LambdaTarget,
}

impl RecursionProfile {
    pub const fn max_depth(self) -> u32 {
        match self {
            Self::HierarchyWalk => 256,
            Self::ExpressionResolution => 500,
            Self::LambdaTarget => 32,
        }
    }

    /// Entries allowed over the guard's lifetime (one query).
    pub const fn max_steps(self) -> u32 {
        match self {
            Self::HierarchyWalk | Self::LambdaTarget => 10_000,
            Self::ExpressionResolution => 100_000,
        }
    }
}

/// Why [`RecursionGuard::enter`] did or did not let the caller in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecursionResult {
    Entered,
    /// The key is already being computed further up the stack.
    Cycle,
    TooDeep,
    OutOfSteps,
}

impl RecursionResult {
    pub fn is_entered(self) -> bool {
        self == Self::Entered
    }

    pub fn is_cycle(self) -> bool {
        self == Self::Cycle
    }
}

/// Set of keys under computation, plus depth and step limits.
///
/// Every [`RecursionResult::Entered`] must be paired with a
/// [`leave`](Self::leave) of the same key.
#[derive(Debug)]
pub struct RecursionGuard<K: Hash + Eq + Copy> {
    active: FxHashSet<K>,
    max_depth: u32,
    steps_left: u32,
    tripped: bool,
}

impl<K: Hash + Eq + Copy> RecursionGuard<K> {
    pub fn new(max_depth: u32, max_steps: u32) -> Self {
        Self {
            active: FxHashSet::default(),
            max_depth,
            steps_left: max_steps,
            tripped: false,
        }
    }

    pub fn with_profile(profile: RecursionProfile) -> Self {
        Self::new(profile.max_depth(), profile.max_steps())
    }

    pub fn enter(&mut self, key: K) -> RecursionResult {
        if self.steps_left == 0 {
            self.tripped = true;
            return RecursionResult::OutOfSteps;
        }
        self.steps_left -= 1;
        if self.depth() >= self.max_depth {
            self.tripped = true;
            return RecursionResult::TooDeep;
        }
        if self.active.insert(key) {
            RecursionResult::Entered
        } else {
            RecursionResult::Cycle
        }
    }

    pub fn leave(&mut self, key: K) {
        let removed = self.active.remove(&key);
        debug_assert!(removed, "RecursionGuard::leave without a matching enter");
    }

    /// Number of keys currently entered.
    pub fn depth(&self) -> u32 {
        u32::try_from(self.active.len()).unwrap_or(u32::MAX)
    }

    /// Whether a depth or step limit has refused an entry. Stays set.
    pub fn is_exceeded(&self) -> bool {
        self.tripped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reentering_active_key_is_a_cycle() {
        let mut guard = RecursionGuard::<u32>::with_profile(RecursionProfile::LambdaTarget);
        assert!(guard.enter(7).is_entered());
        assert!(guard.enter(8).is_entered());
        assert!(guard.enter(7).is_cycle());
        assert_eq!(guard.depth(), 2);
        guard.leave(8);
        guard.leave(7);
        assert_eq!(guard.depth(), 0);
        assert!(!guard.is_exceeded());
        // A finished key can be entered again.
        assert!(guard.enter(7).is_entered());
        guard.leave(7);
    }

    #[test]
    fn test_depth_limit_trips() {
        let mut guard = RecursionGuard::<u32>::new(2, 100);
        assert!(guard.enter(1).is_entered());
        assert!(guard.enter(2).is_entered());
        assert_eq!(guard.enter(3), RecursionResult::TooDeep);
        guard.leave(2);
        guard.leave(1);
        assert!(guard.is_exceeded());
    }

    #[test]
    fn test_step_budget_spans_the_guard_lifetime() {
        let mut guard = RecursionGuard::<u32>::new(10, 2);
        for key in [1, 2] {
            assert!(guard.enter(key).is_entered());
            guard.leave(key);
        }
        assert_eq!(guard.enter(3), RecursionResult::OutOfSteps);
        assert!(guard.is_exceeded());
    }

    #[test]
    fn test_profiles() {
        assert!(RecursionProfile::LambdaTarget.max_depth() < RecursionProfile::ExpressionResolution.max_depth());
        assert_eq!(RecursionProfile::HierarchyWalk.max_steps(), 10_000);
    }
}
