use super::*;

#[test]
fn plain_absolute_paths_are_unchanged() {
    assert_eq!(normalize("/p/a/x.py"), PathBuf::from("/p/a/x.py"));
}

#[test]
fn file_scheme_is_stripped() {
    assert_eq!(normalize("file:///p/a/x.py"), PathBuf::from("/p/a/x.py"));
    assert_eq!(normalize("file:/p/a/x.py"), PathBuf::from("/p/a/x.py"));
}

#[test]
fn dot_components_are_folded() {
    assert_eq!(normalize("/p/./a/../b/x.py"), PathBuf::from("/p/b/x.py"));
}

#[test]
fn parent_dir_above_root_is_dropped() {
    assert_eq!(normalize("/../x.py"), PathBuf::from("/x.py"));
}

#[test]
fn leading_parent_dir_kept_in_relative_paths() {
    assert_eq!(normalize("../lib/x.py"), PathBuf::from("../lib/x.py"));
}

#[test]
fn parent_of_entry() {
    assert_eq!(parent_dir("/p/a/x.py"), Some(PathBuf::from("/p/a")));
    assert_eq!(parent_dir("src/x.py"), Some(PathBuf::from("src")));
}

#[test]
fn bare_file_has_no_parent() {
    assert_eq!(parent_dir("x.py"), None);
    assert_eq!(parent_dir("/"), None);
}
