#![allow(
    clippy::unwrap_used,
    reason = "test code uses unwrap for concise assertions"
)]

use pretty_assertions::assert_eq;
use pyl_ir::{CastArena, CastKind, Constant, StringInterner};

use super::*;

fn parse(src: &str, interner: &StringInterner) -> TreePattern {
    TreePattern::parse(src, interner).unwrap()
}

// Parsing

#[test]
fn parses_the_subscript_patterns() {
    let interner = StringInterner::new();
    let a = parse(r#"<top>ASSIGN(CALL(VAR("slice"),<args>**),<value>*)"#, &interner);
    let b = parse(
        r#"<top>ASSIGN_POST_OP(CALL(VAR("slice"),<args>**),<value>*,<op>*)"#,
        &interner,
    );
    assert_eq!(a.source(), r#"<top>ASSIGN(CALL(VAR("slice"),<args>**),<value>*)"#);
    assert_ne!(a, b);
}

#[test]
fn whitespace_between_elements_is_ignored() {
    let interner = StringInterner::new();
    assert!(TreePattern::parse(r#" CALL( VAR( "f" ) , * ) "#, &interner).is_ok());
}

#[test]
fn unknown_kind_is_reported_with_offset() {
    let interner = StringInterner::new();
    let err = TreePattern::parse("CALL(NOPE)", &interner).unwrap_err();
    assert_eq!(
        err,
        PatternError::UnknownKind {
            tag: "NOPE".to_owned(),
            offset: 5
        }
    );
}

#[test]
fn unterminated_string_is_reported() {
    let interner = StringInterner::new();
    let err = TreePattern::parse(r#"VAR("slice)"#, &interner).unwrap_err();
    assert_eq!(err, PatternError::UnterminatedString { offset: 4 });
}

#[test]
fn missing_close_paren_is_unexpected_end() {
    let interner = StringInterner::new();
    let err = TreePattern::parse("CALL(*,*", &interner).unwrap_err();
    assert_eq!(err, PatternError::UnexpectedEnd { offset: 8 });
}

#[test]
fn trailing_input_is_rejected() {
    let interner = StringInterner::new();
    let err = TreePattern::parse("VAR VAR", &interner).unwrap_err();
    assert_eq!(
        err,
        PatternError::UnexpectedChar {
            found: 'V',
            offset: 4
        }
    );
}

#[test]
fn top_level_sequence_is_rejected() {
    let interner = StringInterner::new();
    let err = TreePattern::parse("<xs>**", &interner).unwrap_err();
    assert_eq!(err, PatternError::SequenceOutsideList { offset: 0 });
}

// Matching

#[test]
fn binds_sequence_and_single() {
    let interner = StringInterner::new();
    let pattern = parse(r#"<top>ASSIGN(CALL(VAR("slice"),<args>**),<value>*)"#, &interner);

    let mut arena = CastArena::new();
    let slice = arena.var(interner.intern("slice"));
    let x = arena.var(interner.intern("x"));
    let i = arena.constant(Constant::Int(0));
    let call = arena.node(CastKind::Call, &[slice, x, i]);
    let v = arena.var(interner.intern("v"));
    let assign = arena.node(CastKind::Assign, &[call, v]);

    let segments = pattern.matches(&arena, assign).unwrap();
    assert_eq!(segments.single(interner.intern("top")), Some(assign));
    assert_eq!(segments.multiple(interner.intern("args")), &[x, i]);
    assert_eq!(segments.single(interner.intern("value")), Some(v));
}

#[test]
fn sequence_may_be_empty() {
    let interner = StringInterner::new();
    let pattern = parse(r#"CALL(VAR("slice"),<args>**)"#, &interner);

    let mut arena = CastArena::new();
    let slice = arena.var(interner.intern("slice"));
    let call = arena.node(CastKind::Call, &[slice]);

    let segments = pattern.matches(&arena, call).unwrap();
    assert_eq!(segments.multiple(interner.intern("args")), &[] as &[NodeId]);
    assert!(matches!(
        segments.get(interner.intern("args")),
        Some(Binding::Multiple(ids)) if ids.is_empty()
    ));
}

#[test]
fn child_count_must_match_exactly() {
    let interner = StringInterner::new();
    let pattern = parse("ASSIGN(*,*)", &interner);

    let mut arena = CastArena::new();
    let a = arena.var(interner.intern("a"));
    let b = arena.var(interner.intern("b"));
    let c = arena.var(interner.intern("c"));
    let two = arena.node(CastKind::Assign, &[a, b]);
    let three = arena.node(CastKind::Assign, &[a, b, c]);

    assert!(pattern.matches(&arena, two).is_some());
    assert!(pattern.matches(&arena, three).is_none());
}

#[test]
fn bare_tag_ignores_children() {
    let interner = StringInterner::new();
    let pattern = parse("CALL", &interner);

    let mut arena = CastArena::new();
    let f = arena.var(interner.intern("f"));
    let call = arena.node(CastKind::Call, &[f, f]);
    assert!(pattern.matches(&arena, call).is_some());
    assert!(pattern.matches(&arena, f).is_none());
}

#[test]
fn constant_text_must_match() {
    let interner = StringInterner::new();
    let pattern = parse(r#"VAR("slice")"#, &interner);

    let mut arena = CastArena::new();
    let slice = arena.var(interner.intern("slice"));
    let other = arena.var(interner.intern("slices"));
    assert!(pattern.matches(&arena, slice).is_some());
    assert!(pattern.matches(&arena, other).is_none());
}

#[test]
fn integer_constants_match() {
    let interner = StringInterner::new();
    let pattern = parse("CALL(*,-3)", &interner);

    let mut arena = CastArena::new();
    let f = arena.var(interner.intern("f"));
    let minus_three = arena.constant(Constant::Int(-3));
    let three = arena.constant(Constant::Int(3));
    let yes = arena.node(CastKind::Call, &[f, minus_three]);
    let no = arena.node(CastKind::Call, &[f, three]);
    assert!(pattern.matches(&arena, yes).is_some());
    assert!(pattern.matches(&arena, no).is_none());
}

#[test]
fn sequence_backtracks_to_satisfy_trailing_elements() {
    let interner = StringInterner::new();
    let pattern = parse(r#"CALL(<head>**,"end",<tail>**)"#, &interner);

    let mut arena = CastArena::new();
    let a = arena.constant(Constant::Int(1));
    let end = arena.constant(Constant::Str(interner.intern("end")));
    let b = arena.constant(Constant::Int(2));
    let call = arena.node(CastKind::Call, &[a, end, b]);

    let segments = pattern.matches(&arena, call).unwrap();
    assert_eq!(segments.multiple(interner.intern("head")), &[a]);
    assert_eq!(segments.multiple(interner.intern("tail")), &[b]);
}

#[test]
fn failed_match_leaves_no_bindings_behind() {
    let interner = StringInterner::new();
    let pattern = parse("BLOCK_STMT(<x>*,RETURN)", &interner);

    let mut arena = CastArena::new();
    let a = arena.var(interner.intern("a"));
    let b = arena.var(interner.intern("b"));
    let block = arena.node(CastKind::Block, &[a, b]);
    assert_eq!(pattern.matches(&arena, block), None);
}
