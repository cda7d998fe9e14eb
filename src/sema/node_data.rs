// src/sema/node_data.rs
//! Node-level metadata written by the semantic passes.
//!
//! NodeData keeps every decoration keyed by NodeId outside the tree:
//! the scope opened at a function or program node, the type computed for
//! an expression, and its l-value flag. The symbol pass writes scopes
//! and type-node types, the type checker writes expression types and
//! l-value flags, code generation only reads.

use rustc_hash::FxHashMap;

use crate::frontend::NodeId;
use crate::sema::scope::ScopeId;
use crate::sema::type_arena::TypeId;

#[derive(Debug, Default)]
pub struct NodeData {
    scopes: FxHashMap<NodeId, ScopeId>,
    types: FxHashMap<NodeId, TypeId>,
    lvalues: FxHashMap<NodeId, bool>,
}

impl NodeData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_scope(&mut self, node: NodeId, scope: ScopeId) {
        self.scopes.insert(node, scope);
    }

    pub fn get_scope(&self, node: NodeId) -> Option<ScopeId> {
        self.scopes.get(&node).copied()
    }

    /// Scope recorded for `node`. Panics when missing: the symbol pass
    /// decorates every program and function node.
    #[track_caller]
    pub fn scope_of(&self, node: NodeId) -> ScopeId {
        match self.get_scope(node) {
            Some(scope) => scope,
            None => panic!("INTERNAL ERROR: no scope decoration on {node}"),
        }
    }

    pub fn set_type(&mut self, node: NodeId, ty: TypeId) {
        self.types.insert(node, ty);
    }

    pub fn get_type(&self, node: NodeId) -> Option<TypeId> {
        self.types.get(&node).copied()
    }

    /// Type recorded for `node`. Panics when missing: after type
    /// checking every expression node carries a type.
    #[track_caller]
    pub fn type_of(&self, node: NodeId) -> TypeId {
        match self.get_type(node) {
            Some(ty) => ty,
            None => panic!("INTERNAL ERROR: no type decoration on {node}"),
        }
    }

    pub fn set_lvalue(&mut self, node: NodeId, is_lvalue: bool) {
        self.lvalues.insert(node, is_lvalue);
    }

    pub fn is_lvalue(&self, node: NodeId) -> bool {
        self.lvalues.get(&node).copied().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sema::type_arena::TypeArena;

    #[test]
    fn decorations_are_independent_per_node() {
        let types = TypeArena::new();
        let mut data = NodeData::new();
        let a = NodeId(1);
        let b = NodeId(2);

        data.set_type(a, types.integer());
        data.set_lvalue(a, true);

        assert_eq!(data.get_type(a), Some(types.integer()));
        assert_eq!(data.get_type(b), None);
        assert!(data.is_lvalue(a));
        assert!(!data.is_lvalue(b));
    }

    #[test]
    #[should_panic(expected = "no type decoration")]
    fn type_of_panics_on_missing() {
        let data = NodeData::new();
        data.type_of(NodeId(7));
    }
}
