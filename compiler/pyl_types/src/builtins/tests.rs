use super::*;

#[test]
fn index_matches_position_in_all() {
    for (i, builtin) in BuiltinType::ALL.iter().enumerate() {
        assert_eq!(builtin.index(), i, "{builtin:?}");
    }
}

#[test]
fn names_are_unique() {
    let mut names: Vec<_> = BuiltinType::ALL.iter().map(|b| b.name()).collect();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), BuiltinType::ALL.len());
}

#[test]
fn only_root_has_no_super() {
    for builtin in BuiltinType::ALL {
        assert_eq!(
            builtin.super_type().is_none(),
            builtin == BuiltinType::Root,
            "{builtin:?}"
        );
    }
}

#[test]
fn supertypes_come_first_in_all() {
    for builtin in BuiltinType::ALL {
        if let Some(sup) = builtin.super_type() {
            assert!(sup.index() < builtin.index(), "{builtin:?} before {sup:?}");
        }
    }
}

#[test]
fn code_body_kinds_derive_from_code_body() {
    for builtin in BuiltinType::ALL {
        if builtin.is_code_body_kind() && builtin != BuiltinType::CodeBody {
            assert_eq!(builtin.super_type(), Some(BuiltinType::CodeBody));
        }
    }
    assert!(!BuiltinType::EmptyScript.is_code_body_kind());
    assert!(!BuiltinType::Object.is_code_body_kind());
}
