//! Function-name normalization.
//!
//! Profilers record methods as a bare function name plus an optional owning
//! class. Every downstream view keys on one canonical string, so the owning
//! type is folded into the name exactly once, before anything else reads it.
//!
//! Example: `{cls: "Cache", function: "get"}` becomes `Cache::get`.

use super::schema::ProfileNode;
use log::debug;

/// Merge each node's owning type into its function name, recursively
///
/// The owning type is consumed, so normalizing an already-normalized tree
/// leaves it unchanged. Child order is preserved.
pub fn normalize_names(mut node: ProfileNode) -> ProfileNode {
    if let Some(owning_type) = node.owning_type.take() {
        node.function = format!("{}::{}", owning_type, node.function);
    }

    node.children = node.children.into_iter().map(normalize_names).collect();
    node
}

/// A profile tree whose function names are canonical
///
/// The only way to build one is through [`CallTree::new`], which normalizes
/// names; every view takes `&CallTree` and never sees raw names.
#[derive(Debug, Clone, PartialEq)]
pub struct CallTree {
    root: ProfileNode,
}

impl CallTree {
    pub fn new(raw: ProfileNode) -> Self {
        let root = normalize_names(raw);
        debug!(
            "Normalized call tree rooted at '{}' ({} nodes, depth {})",
            root.function,
            root.node_count(),
            root.max_depth()
        );
        Self { root }
    }

    pub fn root(&self) -> &ProfileNode {
        &self.root
    }
}
