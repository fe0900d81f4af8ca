//! Subscript-assignment rewriting.
//!
//! The parser reads `x[i] = v` as an assignment whose target is a call to
//! the `slice` builtin, and `x[i] += v` as the compound-assignment form of
//! the same. Neither is a valid assignment target for IR construction, so
//! both are turned into a single call that carries the stored value as its
//! trailing arguments:
//!
//! ```text
//! ASSIGN(CALL(VAR("slice"), args..), value)             => CALL(VAR("slice"), args.., value)
//! ASSIGN_POST_OP(CALL(VAR("slice"), args..), value, op) => CALL(VAR("slice"), args.., value, op)
//! ```
//!
//! The result is rooted at a `CALL`, so it never matches either pattern
//! again.

use pyl_ir::{CastArena, CastKind, CastNode, Name, NodeId, StringInterner};
use smallvec::SmallVec;

use crate::{Segments, TreePattern};

/// `x[args] = value`.
pub const SLICE_ASSIGN: &str = r#"<top>ASSIGN(CALL(VAR("slice"),<args>**),<value>*)"#;

/// `x[args] op= value`.
pub const SLICE_ASSIGN_OP: &str =
    r#"<top>ASSIGN_POST_OP(CALL(VAR("slice"),<args>**),<value>*,<op>*)"#;

/// Rewrites subscript assignments into `slice` calls.
///
/// Holds the two fixed patterns and the interned names it reads bindings
/// by. Rewriting never touches the class registry.
#[derive(Clone, Debug)]
pub struct SubscriptRewriter {
    slice_assign: TreePattern,
    slice_assign_op: TreePattern,
    slice: Name,
    args: Name,
    value: Name,
    op: Name,
}

impl SubscriptRewriter {
    /// Build the rewriter, interning its names into `interner`.
    ///
    /// # Panics
    /// Panics if the built-in pattern text fails to parse.
    pub fn new(interner: &StringInterner) -> Self {
        let parse = |src: &str| {
            TreePattern::parse(src, interner)
                .unwrap_or_else(|e| panic!("built-in pattern `{src}` is malformed: {e}"))
        };
        SubscriptRewriter {
            slice_assign: parse(SLICE_ASSIGN),
            slice_assign_op: parse(SLICE_ASSIGN_OP),
            slice: interner.intern("slice"),
            args: interner.intern("args"),
            value: interner.intern("value"),
            op: interner.intern("op"),
        }
    }

    /// Rewrite `node` in place if it is a subscript assignment.
    ///
    /// Returns `true` when the node was replaced.
    pub fn rewrite_node(&self, arena: &mut CastArena, node: NodeId) -> bool {
        if let Some(segments) = self.slice_assign.matches(arena, node) {
            self.replace_with_call(arena, node, &segments, false);
            return true;
        }
        if let Some(segments) = self.slice_assign_op.matches(arena, node) {
            self.replace_with_call(arena, node, &segments, true);
            return true;
        }
        false
    }

    /// Rewrite every subscript assignment in the tree under `root`.
    ///
    /// Nodes are visited once, parents before children, so the children of
    /// a rewritten node (the original subscript arguments and value) are
    /// still searched. Returns the number of rewrites.
    #[tracing::instrument(level = "debug", skip_all, fields(root = ?root))]
    pub fn rewrite_tree(&self, arena: &mut CastArena, root: NodeId) -> usize {
        let mut rewritten = 0;
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if self.rewrite_node(arena, node) {
                rewritten += 1;
            }
            stack.extend(arena.children(node).iter().rev().copied());
        }
        tracing::debug!(rewritten, "subscript assignments rewritten");
        rewritten
    }

    fn replace_with_call(
        &self,
        arena: &mut CastArena,
        node: NodeId,
        segments: &Segments,
        with_op: bool,
    ) {
        let mut args: SmallVec<[NodeId; 8]> = SmallVec::new();
        args.push(arena.var(self.slice));
        args.extend_from_slice(segments.multiple(self.args));
        args.extend(segments.single(self.value));
        if with_op {
            args.extend(segments.single(self.op));
        }

        let span = arena.span(node);
        arena.replace(
            node,
            CastNode {
                kind: CastKind::Call,
                value: None,
                span,
            },
            &args,
        );
        tracing::trace!(?node, arity = args.len() - 1, "rewrote subscript assignment");
    }
}
