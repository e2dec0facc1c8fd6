//! Base handle types shared by the syntax tree and everything that points
//! into it.

use serde::{Deserialize, Serialize};

/// Index of a node inside one [`NodeArena`](crate::NodeArena).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    /// Sentinel for "no node" (absent optional child, root's parent).
    pub const NONE: Self = Self(u32::MAX);

    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    #[inline]
    pub const fn is_some(self) -> bool {
        !self.is_none()
    }
}

impl Default for NodeIndex {
    fn default() -> Self {
        Self::NONE
    }
}

/// Identifies one compilation unit (one arena) inside a resolution session.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(pub u32);

/// A node handle that is unique across a whole session.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SyntaxRef {
    pub unit: UnitId,
    pub node: NodeIndex,
}

impl SyntaxRef {
    pub const fn new(unit: UnitId, node: NodeIndex) -> Self {
        Self { unit, node }
    }

    /// Another node of the same unit.
    pub const fn with_node(self, node: NodeIndex) -> Self {
        Self {
            unit: self.unit,
            node,
        }
    }
}
