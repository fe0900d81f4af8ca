//! Tree patterns over `CastArena` nodes.
//!
//! # Syntax
//!
//! ```text
//! pattern := ['<' ident '>'] atom
//! atom    := '**'                       zero or more sibling nodes
//!          | '*'                        any single node
//!          | '"' text '"'               string constant
//!          | ['-'] digits               integer constant
//!          | TAG ['(' [pattern {',' pattern}] ')']
//! ```
//!
//! `TAG` is a `CastKind` tag (`CALL`, `ASSIGN`, ...). A tag without
//! parentheses matches a node of that kind whatever its children; with
//! parentheses the child list must match exactly. `<name>` binds the node
//! (or, for `**`, the run of nodes) matched by the following atom.

use pyl_ir::{CastArena, CastKind, Constant, Name, NodeId, StringInterner};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Error in pattern text.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    #[error("unexpected end of pattern at offset {offset}")]
    UnexpectedEnd { offset: usize },
    #[error("unexpected character `{found}` at offset {offset}")]
    UnexpectedChar { found: char, offset: usize },
    #[error("unknown node kind `{tag}` at offset {offset}")]
    UnknownKind { tag: String, offset: usize },
    #[error("unterminated string starting at offset {offset}")]
    UnterminatedString { offset: usize },
    #[error("integer literal out of range at offset {offset}")]
    InvalidInteger { offset: usize },
    #[error("`**` is only allowed inside a child list (offset {offset})")]
    SequenceOutsideList { offset: usize },
}

/// What a bound name captured.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Binding {
    /// A single node (`<x>*`, `<x>CALL(...)`, ...).
    Single(NodeId),
    /// A run of sibling nodes (`<x>**`), possibly empty.
    Multiple(SmallVec<[NodeId; 4]>),
}

/// Bindings produced by a successful match.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Segments {
    bindings: FxHashMap<Name, Binding>,
}

impl Segments {
    /// The raw binding for `name`.
    pub fn get(&self, name: Name) -> Option<&Binding> {
        self.bindings.get(&name)
    }

    /// The node bound by a single-node element.
    pub fn single(&self, name: Name) -> Option<NodeId> {
        match self.bindings.get(&name)? {
            Binding::Single(id) => Some(*id),
            Binding::Multiple(_) => None,
        }
    }

    /// The nodes bound by a `**` element; empty if `name` is unbound.
    pub fn multiple(&self, name: Name) -> &[NodeId] {
        match self.bindings.get(&name) {
            Some(Binding::Multiple(ids)) => ids,
            _ => &[],
        }
    }

    fn bind(&mut self, name: Option<Name>, binding: Binding) {
        if let Some(name) = name {
            self.bindings.insert(name, binding);
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Atom {
    Any,
    AnySequence,
    Str(Name),
    Int(i64),
    Node {
        kind: CastKind,
        children: Option<Vec<Element>>,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Element {
    bind: Option<Name>,
    atom: Atom,
}

/// A parsed tree pattern.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreePattern {
    source: Box<str>,
    root: Element,
}

impl TreePattern {
    /// Parse pattern text, interning bound names and string constants.
    pub fn parse(source: &str, interner: &StringInterner) -> Result<Self, PatternError> {
        let mut parser = Parser {
            src: source,
            pos: 0,
            interner,
        };
        let root = parser.element()?;
        if matches!(root.atom, Atom::AnySequence) {
            return Err(PatternError::SequenceOutsideList { offset: 0 });
        }
        parser.skip_ws();
        if let Some(found) = parser.peek() {
            return Err(PatternError::UnexpectedChar {
                found,
                offset: parser.pos,
            });
        }
        Ok(TreePattern {
            source: source.into(),
            root,
        })
    }

    /// The text this pattern was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Match the subtree rooted at `node`.
    pub fn matches(&self, arena: &CastArena, node: NodeId) -> Option<Segments> {
        let mut segments = Segments::default();
        match_element(&self.root, arena, node, &mut segments).then_some(segments)
    }
}

fn match_element(
    element: &Element,
    arena: &CastArena,
    node: NodeId,
    segments: &mut Segments,
) -> bool {
    let matched = match &element.atom {
        Atom::Any | Atom::AnySequence => true,
        Atom::Str(text) => {
            arena.kind(node) == CastKind::Constant && arena.value(node) == Some(Constant::Str(*text))
        }
        Atom::Int(v) => {
            arena.kind(node) == CastKind::Constant && arena.value(node) == Some(Constant::Int(*v))
        }
        Atom::Node { kind, children } => {
            arena.kind(node) == *kind
                && children.as_ref().map_or(true, |children| {
                    match_sequence(children, arena, arena.children(node), segments)
                })
        }
    };
    if matched {
        segments.bind(element.bind, Binding::Single(node));
    }
    matched
}

/// Match a child list, backtracking over how many nodes each `**` takes.
fn match_sequence(
    elements: &[Element],
    arena: &CastArena,
    nodes: &[NodeId],
    segments: &mut Segments,
) -> bool {
    let Some((first, rest)) = elements.split_first() else {
        return nodes.is_empty();
    };

    if first.atom == Atom::AnySequence {
        // Greedy: try the longest run first.
        for take in (0..=nodes.len()).rev() {
            let mut attempt = segments.clone();
            if match_sequence(rest, arena, &nodes[take..], &mut attempt) {
                attempt.bind(first.bind, Binding::Multiple(nodes[..take].iter().copied().collect()));
                *segments = attempt;
                return true;
            }
        }
        return false;
    }

    let Some((&node, remaining)) = nodes.split_first() else {
        return false;
    };
    let mut attempt = segments.clone();
    if match_element(first, arena, node, &mut attempt)
        && match_sequence(rest, arena, remaining, &mut attempt)
    {
        *segments = attempt;
        return true;
    }
    false
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    interner: &'a StringInterner,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn expect(&mut self, want: char) -> Result<(), PatternError> {
        match self.bump() {
            Some(c) if c == want => Ok(()),
            Some(found) => Err(PatternError::UnexpectedChar {
                found,
                offset: self.pos - found.len_utf8(),
            }),
            None => Err(PatternError::UnexpectedEnd { offset: self.pos }),
        }
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.bump();
        }
        let src = self.src;
        &src[start..self.pos]
    }

    fn element(&mut self) -> Result<Element, PatternError> {
        self.skip_ws();
        let bind = if self.peek() == Some('<') {
            self.bump();
            let name = self.take_while(|c| c.is_alphanumeric() || c == '_');
            if name.is_empty() {
                return Err(self.unexpected());
            }
            let name = self.interner.intern(name);
            self.expect('>')?;
            Some(name)
        } else {
            None
        };
        let atom = self.atom()?;
        Ok(Element { bind, atom })
    }

    fn atom(&mut self) -> Result<Atom, PatternError> {
        let start = self.pos;
        match self.peek() {
            None => Err(PatternError::UnexpectedEnd { offset: self.pos }),
            Some('*') => {
                self.bump();
                if self.peek() == Some('*') {
                    self.bump();
                    Ok(Atom::AnySequence)
                } else {
                    Ok(Atom::Any)
                }
            }
            Some('"') => {
                self.bump();
                let text = self.take_while(|c| c != '"');
                let text = self.interner.intern(text);
                if self.bump().is_none() {
                    return Err(PatternError::UnterminatedString { offset: start });
                }
                Ok(Atom::Str(text))
            }
            Some(c) if c == '-' || c.is_ascii_digit() => {
                self.bump();
                self.take_while(|c| c.is_ascii_digit());
                let value = self.src[start..self.pos]
                    .parse()
                    .map_err(|_| PatternError::InvalidInteger { offset: start })?;
                Ok(Atom::Int(value))
            }
            Some(c) if c.is_ascii_uppercase() => {
                let tag = self.take_while(|c| c.is_ascii_uppercase() || c == '_');
                let kind = CastKind::from_tag(tag).ok_or_else(|| PatternError::UnknownKind {
                    tag: tag.to_owned(),
                    offset: start,
                })?;
                let children = if self.peek() == Some('(') {
                    Some(self.children()?)
                } else {
                    None
                };
                Ok(Atom::Node { kind, children })
            }
            Some(_) => Err(self.unexpected()),
        }
    }

    fn children(&mut self) -> Result<Vec<Element>, PatternError> {
        self.expect('(')?;
        let mut children = Vec::new();
        self.skip_ws();
        if self.peek() == Some(')') {
            self.bump();
            return Ok(children);
        }
        loop {
            children.push(self.element()?);
            self.skip_ws();
            match self.bump() {
                Some(',') => {}
                Some(')') => return Ok(children),
                Some(found) => {
                    return Err(PatternError::UnexpectedChar {
                        found,
                        offset: self.pos - found.len_utf8(),
                    })
                }
                None => return Err(PatternError::UnexpectedEnd { offset: self.pos }),
            }
        }
    }

    fn unexpected(&self) -> PatternError {
        match self.peek() {
            Some(found) => PatternError::UnexpectedChar {
                found,
                offset: self.pos,
            },
            None => PatternError::UnexpectedEnd { offset: self.pos },
        }
    }
}

#[cfg(test)]
mod tests;
