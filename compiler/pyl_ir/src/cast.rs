//! Generic abstract syntax trees.
//!
//! The parser hands the front end kind-tagged trees rather than a typed
//! AST: every node is a `CastKind`, an optional constant payload and an
//! ordered list of children. Nodes live in a `CastArena` and refer to each
//! other by `NodeId`, so a subtree can be replaced in place without
//! rebuilding its parents.

use std::fmt::{self, Write as _};

use crate::{Name, Span, StringInterner};

/// Index of a node in a `CastArena`.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct NodeId(u32);

impl NodeId {
    /// Get the index into the arena.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// Node kinds produced by the parser.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum CastKind {
    /// Literal value; the payload is in the node's `Constant`.
    Constant,
    /// Variable reference: `VAR(CONSTANT name)`.
    Var,
    /// Call: `CALL(callee, args...)`.
    Call,
    /// Plain assignment: `ASSIGN(target, value)`.
    Assign,
    /// Compound assignment: `ASSIGN_POST_OP(target, value, op)`.
    AssignPostOp,
    /// Prefix compound assignment: `ASSIGN_PRE_OP(target, value, op)`.
    AssignPreOp,
    /// Attribute access: `OBJECT_REF(object, CONSTANT field)`.
    ObjectRef,
    /// Binary operation: `BINARY_EXPR(op, lhs, rhs)`.
    BinaryExpr,
    /// Unary operation: `UNARY_EXPR(op, operand)`.
    UnaryExpr,
    /// Operator symbol; the payload is a string constant.
    Operator,
    /// Statement sequence.
    Block,
    /// Expression evaluated for effect.
    ExprStmt,
    /// `RETURN(value?)`.
    Return,
    /// `IF(cond, then, else?)`.
    If,
    /// `LOOP(cond, body)`.
    Loop,
    /// Nested function or class definition, by entity name.
    FunctionExpr,
    /// Object construction.
    New,
    /// `THROW(value)`.
    Throw,
    /// `TRY(body, handlers...)`.
    Try,
    /// No-op placeholder.
    Empty,
}

impl CastKind {
    /// All kinds, in declaration order.
    pub const ALL: [CastKind; 20] = [
        CastKind::Constant,
        CastKind::Var,
        CastKind::Call,
        CastKind::Assign,
        CastKind::AssignPostOp,
        CastKind::AssignPreOp,
        CastKind::ObjectRef,
        CastKind::BinaryExpr,
        CastKind::UnaryExpr,
        CastKind::Operator,
        CastKind::Block,
        CastKind::ExprStmt,
        CastKind::Return,
        CastKind::If,
        CastKind::Loop,
        CastKind::FunctionExpr,
        CastKind::New,
        CastKind::Throw,
        CastKind::Try,
        CastKind::Empty,
    ];

    /// Upper-case tag used in tree patterns and debug renderings.
    pub const fn tag(self) -> &'static str {
        match self {
            CastKind::Constant => "CONSTANT",
            CastKind::Var => "VAR",
            CastKind::Call => "CALL",
            CastKind::Assign => "ASSIGN",
            CastKind::AssignPostOp => "ASSIGN_POST_OP",
            CastKind::AssignPreOp => "ASSIGN_PRE_OP",
            CastKind::ObjectRef => "OBJECT_REF",
            CastKind::BinaryExpr => "BINARY_EXPR",
            CastKind::UnaryExpr => "UNARY_EXPR",
            CastKind::Operator => "OPERATOR",
            CastKind::Block => "BLOCK_STMT",
            CastKind::ExprStmt => "EXPR_STMT",
            CastKind::Return => "RETURN",
            CastKind::If => "IF_STMT",
            CastKind::Loop => "LOOP",
            CastKind::FunctionExpr => "FUNCTION_EXPR",
            CastKind::New => "NEW",
            CastKind::Throw => "THROW",
            CastKind::Try => "TRY",
            CastKind::Empty => "EMPTY",
        }
    }

    /// Inverse of [`tag`](Self::tag).
    pub fn from_tag(tag: &str) -> Option<CastKind> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }
}

/// Constant payload of a node.
///
/// Floats are stored as bits so the payload stays `Eq + Hash`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Constant {
    None,
    Bool(bool),
    Int(i64),
    Float(u64),
    Str(Name),
}

impl Constant {
    /// Build a float constant.
    #[inline]
    pub fn float(value: f64) -> Self {
        Constant::Float(value.to_bits())
    }

    /// The string payload, if this is a string constant.
    #[inline]
    pub fn as_str(self) -> Option<Name> {
        match self {
            Constant::Str(name) => Some(name),
            _ => None,
        }
    }
}

/// Per-node data other than children.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct CastNode {
    pub kind: CastKind,
    pub value: Option<Constant>,
    pub span: Span,
}

/// Children of one node: a window into `CastArena::child_lists`.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
struct ChildRange {
    start: u32,
    len: u32,
}

/// Arena holding the nodes of one entity's tree.
#[derive(Clone, Debug, Default)]
pub struct CastArena {
    /// Node data, indexed by `NodeId`.
    nodes: Vec<CastNode>,
    /// Children window for each node (parallel with `nodes`).
    children: Vec<ChildRange>,
    /// Flattened child id lists.
    child_lists: Vec<NodeId>,
}

/// Convert a length to `u32`, panicking on arenas beyond 4 billion entries.
fn to_u32(len: usize, what: &str) -> u32 {
    u32::try_from(len).unwrap_or_else(|_| panic!("too many {what}: {len} exceeds u32::MAX"))
}

impl CastArena {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of allocated nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if no nodes have been allocated.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn push_children(&mut self, children: &[NodeId]) -> ChildRange {
        if children.is_empty() {
            return ChildRange::default();
        }
        let start = to_u32(self.child_lists.len(), "child entries");
        self.child_lists.extend_from_slice(children);
        ChildRange {
            start,
            len: to_u32(children.len(), "children"),
        }
    }

    /// Allocate a node, returning its ID.
    pub fn alloc(&mut self, node: CastNode, children: &[NodeId]) -> NodeId {
        let id = NodeId(to_u32(self.nodes.len(), "nodes"));
        let range = self.push_children(children);
        self.nodes.push(node);
        self.children.push(range);
        id
    }

    /// Allocate a payload-free node with a dummy span.
    pub fn node(&mut self, kind: CastKind, children: &[NodeId]) -> NodeId {
        self.alloc(
            CastNode {
                kind,
                value: None,
                span: Span::DUMMY,
            },
            children,
        )
    }

    /// Allocate a constant leaf.
    pub fn constant(&mut self, value: Constant) -> NodeId {
        self.alloc(
            CastNode {
                kind: CastKind::Constant,
                value: Some(value),
                span: Span::DUMMY,
            },
            &[],
        )
    }

    /// Allocate `VAR(CONSTANT name)`.
    pub fn var(&mut self, name: Name) -> NodeId {
        let name_node = self.constant(Constant::Str(name));
        self.node(CastKind::Var, &[name_node])
    }

    /// Allocate an `OPERATOR` leaf carrying `symbol`.
    pub fn operator(&mut self, symbol: Name) -> NodeId {
        self.alloc(
            CastNode {
                kind: CastKind::Operator,
                value: Some(Constant::Str(symbol)),
                span: Span::DUMMY,
            },
            &[],
        )
    }

    /// Replace the node at `id` with new contents, keeping its ID.
    ///
    /// Parents referring to `id` see the new node; the old children stay
    /// allocated and may be reused as children of the replacement.
    pub fn replace(&mut self, id: NodeId, node: CastNode, children: &[NodeId]) {
        let range = self.push_children(children);
        self.nodes[id.index()] = node;
        self.children[id.index()] = range;
    }

    /// Get the node data.
    #[inline]
    pub fn get(&self, id: NodeId) -> CastNode {
        self.nodes[id.index()]
    }

    /// Get the node kind.
    #[inline]
    pub fn kind(&self, id: NodeId) -> CastKind {
        self.nodes[id.index()].kind
    }

    /// Get the constant payload.
    #[inline]
    pub fn value(&self, id: NodeId) -> Option<Constant> {
        self.nodes[id.index()].value
    }

    /// Get the source span.
    #[inline]
    pub fn span(&self, id: NodeId) -> Span {
        self.nodes[id.index()].span
    }

    /// Get the children, in order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        let range = self.children[id.index()];
        let start = range.start as usize;
        &self.child_lists[start..start + range.len as usize]
    }

    /// Get the `i`th child.
    #[inline]
    pub fn child(&self, id: NodeId, i: usize) -> Option<NodeId> {
        self.children(id).get(i).copied()
    }

    /// Render a subtree in pattern syntax, e.g. `CALL(VAR("slice"),"i")`.
    ///
    /// Constants render as their literal; other nodes render as their tag
    /// followed by their children in parentheses when they have any.
    pub fn render(&self, id: NodeId, interner: &StringInterner) -> String {
        let mut out = String::new();
        self.render_into(id, interner, &mut out);
        out
    }

    fn render_into(&self, id: NodeId, interner: &StringInterner, out: &mut String) {
        let node = self.get(id);
        if node.kind == CastKind::Constant {
            match node.value {
                Some(Constant::Str(name)) => {
                    let _ = write!(out, "{:?}", interner.lookup(name));
                }
                Some(Constant::Int(v)) => {
                    let _ = write!(out, "{v}");
                }
                Some(Constant::Float(bits)) => {
                    let _ = write!(out, "{}", f64::from_bits(bits));
                }
                Some(Constant::Bool(v)) => {
                    let _ = write!(out, "{v}");
                }
                Some(Constant::None) | None => out.push_str("None"),
            }
            return;
        }

        out.push_str(node.kind.tag());
        if let Some(Constant::Str(name)) = node.value {
            let _ = write!(out, "[{}]", interner.lookup(name));
        }
        let children = self.children(id);
        if !children.is_empty() {
            out.push('(');
            for (i, &child) in children.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                self.render_into(child, interner, out);
            }
            out.push(')');
        }
    }
}
