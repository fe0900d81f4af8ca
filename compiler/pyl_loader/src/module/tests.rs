use pretty_assertions::assert_eq;

use super::*;

#[test]
fn script_module_keeps_entry_order() {
    let module = ScriptModule::new(["/p/b.py", "/p/a.py"]);
    let paths: Vec<_> = module.entries().iter().map(ModuleEntry::path).collect();
    assert_eq!(paths, vec!["/p/b.py", "/p/a.py"]);
    assert_eq!(module.kind(), ModuleKind::Script);
}

#[test]
fn single_file_module() {
    let module = ScriptModule::file("main.py");
    assert_eq!(module.entries(), &[ModuleEntry::new("main.py")]);
}

#[test]
fn library_module_reports_its_kind_and_url() {
    let module = LibraryUrlModule::new("https://example.org/lib.zip", ["lib/os.py"]);
    assert_eq!(module.kind(), ModuleKind::LibraryUrl);
    assert_eq!(module.url(), "https://example.org/lib.zip");
    assert_eq!(module.entries().len(), 1);
}

#[test]
fn implementations_differ_between_module_types() {
    let script = ScriptModule::default();
    let library = LibraryUrlModule::new("u", Vec::<String>::new());
    assert_ne!(script.implementation(), library.implementation());
}
