#![allow(
    clippy::unwrap_used,
    reason = "test code uses unwrap for concise assertions"
)]

use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use pyl_types::{BuiltinType, ClassOrigin};

use super::*;
use crate::{LibraryUrlModule, ScriptModule};

/// Records what the registry looked like when translation started.
#[derive(Default)]
struct Recorder {
    calls: usize,
    registry_len: usize,
    app_path: Option<PathBuf>,
    placeholders_present: Vec<bool>,
    fail_with: Option<LoadError>,
}

impl Translator for Recorder {
    fn translate(
        &mut self,
        cx: &mut TranslationContext<'_>,
        modules: &[&dyn Module],
    ) -> Result<(), LoadError> {
        self.calls += 1;
        self.registry_len = cx.registry().len();
        self.app_path = cx.system_path().app_path.clone();
        self.placeholders_present = modules
            .iter()
            .flat_map(|module| module.entries())
            .map(|entry| cx.registry().class(cx.script_name(entry.path())).is_some())
            .collect();
        self.fail_with.take().map_or(Ok(()), Err)
    }
}

/// A module kind the loader does not know.
struct NotebookModule {
    entries: Vec<ModuleEntry>,
}

impl Module for NotebookModule {
    fn kind(&self) -> ModuleKind {
        ModuleKind::Unrecognized
    }

    fn implementation(&self) -> &'static str {
        "NotebookModule"
    }

    fn entries(&self) -> &[ModuleEntry] {
        &self.entries
    }
}

/// A second script module implementation.
struct SourceDirectoryModule {
    entries: Vec<ModuleEntry>,
}

impl Module for SourceDirectoryModule {
    fn kind(&self) -> ModuleKind {
        ModuleKind::Script
    }

    fn implementation(&self) -> &'static str {
        "SourceDirectoryModule"
    }

    fn entries(&self) -> &[ModuleEntry] {
        &self.entries
    }
}

fn loader() -> ProjectLoader {
    ProjectLoader::new(SharedInterner::new())
}

const BUILTINS: usize = BuiltinType::ALL.len();

// Root selection

#[test]
fn root_is_the_shortest_parent() {
    let root = select_project_root(["/p/a/x.py", "/p/ab/y.py", "/p/z.py"]);
    assert_eq!(root, Some(PathBuf::from("/p")));
}

#[test]
fn root_is_shortest_by_length_not_by_ancestry() {
    let root = select_project_root(["/home/user/proj/x.py", "/opt/y.py"]);
    assert_eq!(root, Some(PathBuf::from("/opt")));
}

#[test]
fn root_length_counts_characters_not_bytes() {
    let root = select_project_root(["/ééé/x.py", "/abcde/y.py"]);
    assert_eq!(root, Some(PathBuf::from("/ééé")));

    let root = select_project_root(["/abcd/x.py", "/日本/y.py"]);
    assert_eq!(root, Some(PathBuf::from("/日本")));
}

#[test]
fn root_ties_go_to_the_first_entry() {
    let root = select_project_root(["/b/x.py", "/a/y.py"]);
    assert_eq!(root, Some(PathBuf::from("/b")));
}

#[test]
fn entries_without_parent_are_not_candidates() {
    assert_eq!(
        select_project_root(["x.py", "/proj/src/m.py"]),
        Some(PathBuf::from("/proj/src"))
    );
    assert_eq!(select_project_root(["x.py"]), None);
    assert_eq!(select_project_root(std::iter::empty()), None);
}

#[test]
fn root_candidates_are_normalized() {
    let root = select_project_root(["file:///p/q/./r/../x.py"]);
    assert_eq!(root, Some(PathBuf::from("/p/q")));
}

// Sessions

#[test]
fn load_registers_placeholders_before_translation() {
    let mut loader = loader();
    let scripts = ScriptModule::new(["/proj/a.py", "/proj/pkg/b.py"]);
    let mut recorder = Recorder::default();

    let path = loader.load(&[&scripts], &mut recorder).unwrap();
    assert_eq!(path.app_path(), Some(Path::new("/proj")));

    assert_eq!(recorder.calls, 1);
    assert_eq!(recorder.registry_len, BUILTINS + 2);
    assert_eq!(recorder.placeholders_present, vec![true, true]);
    assert_eq!(recorder.app_path, Some(PathBuf::from("/proj")));
    assert_eq!(loader.state(), LoadState::Closed);
}

#[test]
fn placeholders_are_script_classes_under_empty_script() {
    let mut loader = loader();
    let scripts = ScriptModule::file("/proj/a.py");
    loader.load(&[&scripts], &mut Recorder::default()).unwrap();

    let registry = loader.registry();
    let name = TypeName::script(registry.interner(), "/proj/a.py");
    assert_eq!(name.as_str(registry.interner()), "script /proj/a.py");

    let class = registry.class(name).unwrap();
    assert_eq!(class.origin, ClassOrigin::Script);
    assert_eq!(
        class.super_name,
        Some(registry.builtin(BuiltinType::EmptyScript))
    );
}

#[test]
fn library_entries_get_placeholders_but_not_the_root() {
    let mut loader = loader();
    let scripts = ScriptModule::file("/proj/app/main.py");
    let library = LibraryUrlModule::new("https://example.org/std", ["/l/os.py"]);
    let mut recorder = Recorder::default();

    loader.load(&[&library, &scripts], &mut recorder).unwrap();
    assert_eq!(
        loader.system_path().app_path(),
        Some(Path::new("/proj/app"))
    );
    assert_eq!(recorder.placeholders_present, vec![true, true]);
    assert_eq!(loader.registry().len(), BUILTINS + 2);
}

#[test]
fn no_script_modules_leaves_root_unresolved() {
    let mut loader = loader();
    let library = LibraryUrlModule::new("u", ["/l/os.py"]);
    loader.load(&[&library], &mut Recorder::default()).unwrap();
    assert_eq!(loader.system_path().app_path, None);
    assert_eq!(loader.state(), LoadState::Closed);
}

#[test]
fn unsupported_module_kind_leaves_registry_unchanged() {
    let mut loader = loader();
    let scripts = ScriptModule::file("/proj/a.py");
    let notebook = NotebookModule {
        entries: vec![ModuleEntry::new("/proj/n.ipynb")],
    };
    let mut recorder = Recorder::default();

    let err = loader.load(&[&scripts, &notebook], &mut recorder).unwrap_err();
    assert_eq!(
        err,
        LoadError::UnsupportedModuleKind {
            implementation: "NotebookModule".to_owned()
        }
    );
    assert_eq!(loader.registry().len(), BUILTINS);
    assert_eq!(loader.system_path().app_path, None);
    assert_eq!(loader.state(), LoadState::Unresolved);
    assert_eq!(recorder.calls, 0);
}

#[test]
fn second_load_is_a_session_order_error() {
    let mut loader = loader();
    let scripts = ScriptModule::file("/proj/a.py");
    loader.load(&[&scripts], &mut Recorder::default()).unwrap();

    let mut recorder = Recorder::default();
    let err = loader.load(&[&scripts], &mut recorder).unwrap_err();
    assert_eq!(
        err,
        LoadError::Invariant(InvariantError::SessionOrder {
            operation: "load",
            state: "closed",
        })
    );
    assert_eq!(recorder.calls, 0);
}

#[test]
fn translator_failure_stops_in_delegated_state() {
    let mut loader = loader();
    let scripts = ScriptModule::file("/proj/a.py");
    let mut recorder = Recorder {
        fail_with: Some(LoadError::translation("syntax error in a.py")),
        ..Recorder::default()
    };

    let err = loader.load(&[&scripts], &mut recorder).unwrap_err();
    assert_eq!(err.to_string(), "translation failed: syntax error in a.py");
    assert_eq!(loader.state(), LoadState::Delegated);
    assert_eq!(loader.registry().len(), BUILTINS + 1);
}

/// Formatted `tracing` output of `run`, without ANSI colors.
fn captured_logs(run: impl FnOnce()) -> String {
    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Buffer {
        fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(bytes);
            Ok(bytes.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    let buffer = Buffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_max_level(tracing::Level::WARN)
        .with_ansi(false)
        .finish();
    tracing::subscriber::with_default(subscriber, run);

    let bytes = buffer.0.lock().unwrap().clone();
    String::from_utf8(bytes).unwrap()
}

fn mixed_modules() -> (ScriptModule, SourceDirectoryModule) {
    let scripts = ScriptModule::file("/proj/a.py");
    let directory = SourceDirectoryModule {
        entries: vec![ModuleEntry::new("/proj/lib/b.py")],
    };
    (scripts, directory)
}

#[test]
fn mixed_script_implementations_keep_the_first() {
    let mut loader = loader();
    let (scripts, directory) = mixed_modules();

    let logs = captured_logs(|| {
        loader
            .load(&[&scripts, &directory], &mut Recorder::default())
            .unwrap();
    });
    assert_eq!(loader.project_kind(), Some("ScriptModule"));
    assert_eq!(loader.system_path().app_path(), Some(Path::new("/proj")));

    assert_eq!(logs.matches("WARN").count(), 1, "{logs}");
    assert!(logs.contains("mixed script module implementations"), "{logs}");
    assert!(logs.contains("ignored=\"SourceDirectoryModule\""), "{logs}");
}

#[test]
fn mixed_module_warning_can_be_disabled() {
    let config = LoaderConfig {
        warn_on_mixed_modules: false,
        ..LoaderConfig::default()
    };
    let mut loader = ProjectLoader::with_config(SharedInterner::new(), config);
    let (scripts, directory) = mixed_modules();

    let logs = captured_logs(|| {
        loader
            .load(&[&scripts, &directory], &mut Recorder::default())
            .unwrap();
    });
    assert_eq!(loader.project_kind(), Some("ScriptModule"));
    assert_eq!(logs, "");
}

#[test]
fn same_script_implementation_does_not_warn() {
    let mut loader = loader();
    let first = ScriptModule::file("/proj/a.py");
    let second = ScriptModule::file("/proj/b.py");

    let logs = captured_logs(|| {
        loader
            .load(&[&first, &second], &mut Recorder::default())
            .unwrap();
    });
    assert_eq!(logs, "");
}

#[test]
fn configured_lib_paths_follow_the_root() {
    let config = LoaderConfig {
        lib_paths: vec![PathBuf::from("/usr/lib/py")],
        ..LoaderConfig::default()
    };
    let mut loader = ProjectLoader::with_config(SharedInterner::new(), config);
    let scripts = ScriptModule::file("/proj/a.py");
    loader.load(&[&scripts], &mut Recorder::default()).unwrap();

    let search: Vec<_> = loader.system_path().search_paths().collect();
    assert_eq!(search, vec![Path::new("/proj"), Path::new("/usr/lib/py")]);
}

#[test]
fn into_registry_keeps_loaded_classes() {
    let mut loader = loader();
    let scripts = ScriptModule::file("/proj/a.py");
    loader.load(&[&scripts], &mut Recorder::default()).unwrap();

    let registry = loader.into_registry().unwrap();
    let name = TypeName::script(registry.interner(), "/proj/a.py");
    assert!(registry.contains(name));
}

#[test]
fn failed_session_does_not_hand_out_its_registry() {
    let mut loader = loader();
    let scripts = ScriptModule::file("/proj/a.py");
    let mut recorder = Recorder {
        fail_with: Some(LoadError::translation("syntax error in a.py")),
        ..Recorder::default()
    };
    loader.load(&[&scripts], &mut recorder).unwrap_err();

    assert_eq!(
        loader.into_registry().unwrap_err(),
        InvariantError::SessionOrder {
            operation: "take the registry",
            state: "delegated",
        }
    );
}

#[test]
fn unloaded_session_does_not_hand_out_its_registry() {
    let err = loader().into_registry().unwrap_err();
    assert_eq!(
        err.to_string(),
        "cannot take the registry while the loader is unresolved"
    );
}

proptest! {
    #[test]
    fn root_is_a_shortest_candidate(
        paths in prop::collection::vec("(/[a-cé]{1,3}){1,4}\\.py", 1..8)
    ) {
        let root = select_project_root(paths.iter().map(String::as_str)).unwrap();
        let candidates: Vec<PathBuf> = paths.iter().filter_map(|p| path::parent_dir(p)).collect();
        let shortest = candidates.iter().map(|c| path_length(c)).min().unwrap();

        prop_assert!(candidates.contains(&root));
        prop_assert_eq!(path_length(&root), shortest);
        prop_assert_eq!(
            Some(&root),
            candidates.iter().find(|c| path_length(c) == shortest)
        );
    }
}
