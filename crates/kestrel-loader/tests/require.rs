//! Module resolution integration tests
//!
//! Native modules are installed through a recording plugin loader so the
//! tests do not need real shared objects; the files only have to exist.

use kestrel_loader::natives;
use kestrel_loader::platform::DYLIB_SUFFIX;
use kestrel_loader::{
    Artifact, DylibError, Evaluator, LoaderError, ModuleLoader, ModuleName, ModuleResolver, NativeHandle,
    PluginLoader, Require, Result, Value,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

#[derive(Clone, Default)]
struct RecordingPlugins {
    installed: Arc<Mutex<Vec<PathBuf>>>,
    fail: bool,
}

impl PluginLoader for RecordingPlugins {
    fn install(&self, path: &Path) -> std::result::Result<NativeHandle, DylibError> {
        if self.fail {
            return Err(DylibError::MissingEntryPoint {
                path: path.to_path_buf(),
                symbol: "kestrel_install".to_string(),
            });
        }
        self.installed.lock().unwrap().push(path.to_path_buf());
        Ok(NativeHandle::unbacked(path))
    }
}

#[derive(Default)]
struct RecordingEvaluator {
    ran: Vec<PathBuf>,
}

impl Evaluator for RecordingEvaluator {
    type Unit = PathBuf;
    type Value = Value;

    fn compile_file(&mut self, path: &Path) -> Result<Option<PathBuf>> {
        if fs::read_to_string(path)?.contains("syntax error") {
            return Err(LoaderError::evaluation(path, "unexpected token"));
        }
        Ok(Some(path.to_path_buf()))
    }

    fn call(&mut self, unit: PathBuf) -> Result<Value> {
        self.ran.push(unit);
        Ok(Value::Nil)
    }
}

fn touch(dir: &TempDir, file: &str) -> PathBuf {
    let path = dir.path().join(file);
    fs::write(&path, b"").unwrap();
    path
}

fn loader_for(dirs: &[&TempDir], plugins: &RecordingPlugins) -> ModuleLoader {
    let search_paths = dirs
        .iter()
        .map(|d| d.path().to_str().unwrap().to_string())
        .collect();
    ModuleLoader::with_plugin_loader(ModuleResolver::new(search_paths, ".kes"), Box::new(plugins.clone()))
}

#[test]
fn native_module_loads_once() {
    let dir = tempfile::tempdir().unwrap();
    let lib = touch(&dir, &format!("foo{DYLIB_SUFFIX}"));
    let plugins = RecordingPlugins::default();
    let loader = loader_for(&[&dir], &plugins);
    let mut evaluator = RecordingEvaluator::default();
    let foo = ModuleName::new("foo");

    assert_eq!(loader.require(&foo, &mut evaluator).unwrap(), Require::Resolved(foo.clone()));
    assert_eq!(*plugins.installed.lock().unwrap(), vec![lib.clone()]);
    assert!(matches!(loader.artifact(&foo), Some(Artifact::Native(h)) if h.path() == lib));

    // The second request must not look at the file system at all
    fs::remove_file(&lib).unwrap();
    assert_eq!(loader.require(&foo, &mut evaluator).unwrap(), Require::AlreadySatisfied);
    assert_eq!(
        loader.require(&ModuleName::new("FOO"), &mut evaluator).unwrap(),
        Require::AlreadySatisfied
    );
    assert_eq!(plugins.installed.lock().unwrap().len(), 1);
}

#[test]
fn missing_module() {
    let dir = tempfile::tempdir().unwrap();
    let plugins = RecordingPlugins::default();
    let loader = loader_for(&[&dir], &plugins);
    let mut evaluator = RecordingEvaluator::default();
    let bar = ModuleName::new("bar");

    assert_eq!(loader.require(&bar, &mut evaluator).unwrap(), Require::NotFound);

    let err = loader.require_or_throw(&bar, &mut evaluator).unwrap_err();
    assert!(matches!(&err, LoaderError::ModuleNotFound(name) if name == "bar"));
    assert_eq!(err.to_string(), "Cannot find module 'bar'");
    assert!(!loader.is_loaded(&bar));
}

#[test]
fn native_preferred_over_script() {
    let dir = tempfile::tempdir().unwrap();
    let lib = touch(&dir, &format!("foo{DYLIB_SUFFIX}"));
    touch(&dir, "foo.kes");
    let plugins = RecordingPlugins::default();
    let loader = loader_for(&[&dir], &plugins);
    let mut evaluator = RecordingEvaluator::default();

    loader.require_or_throw(&ModuleName::new("foo"), &mut evaluator).unwrap();

    assert_eq!(*plugins.installed.lock().unwrap(), vec![lib]);
    assert!(evaluator.ran.is_empty());
}

#[test]
fn script_in_second_directory() {
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    let script = touch(&second, "foo.kes");
    let plugins = RecordingPlugins::default();
    let loader = loader_for(&[&first, &second], &plugins);
    let mut evaluator = RecordingEvaluator::default();
    let foo = ModuleName::new("foo");

    assert_eq!(loader.require(&foo, &mut evaluator).unwrap(), Require::Resolved(foo.clone()));
    assert_eq!(evaluator.ran, vec![script.clone()]);
    assert!(matches!(loader.artifact(&foo), Some(Artifact::Script(p)) if p == script));
}

#[test]
fn earlier_directory_wins_over_native_later() {
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    let script = touch(&first, "foo.kes");
    touch(&second, &format!("foo{DYLIB_SUFFIX}"));
    let plugins = RecordingPlugins::default();
    let loader = loader_for(&[&first, &second], &plugins);
    let mut evaluator = RecordingEvaluator::default();

    loader.require(&ModuleName::new("foo"), &mut evaluator).unwrap();

    assert_eq!(evaluator.ran, vec![script]);
    assert!(plugins.installed.lock().unwrap().is_empty());
}

#[test]
fn failed_native_install_stops_search() {
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    touch(&first, &format!("foo{DYLIB_SUFFIX}"));
    touch(&first, "foo.kes");
    touch(&second, "foo.kes");
    let plugins = RecordingPlugins {
        fail: true,
        ..Default::default()
    };
    let loader = loader_for(&[&first, &second], &plugins);
    let mut evaluator = RecordingEvaluator::default();
    let foo = ModuleName::new("foo");

    let err = loader.require(&foo, &mut evaluator).unwrap_err();
    assert!(matches!(err, LoaderError::Dylib(DylibError::MissingEntryPoint { .. })));
    assert!(evaluator.ran.is_empty());
    assert!(!loader.is_loaded(&foo));
}

#[test]
fn failed_script_stays_registered() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("broken.kes"), "syntax error").unwrap();
    let plugins = RecordingPlugins::default();
    let loader = loader_for(&[&dir], &plugins);
    let mut evaluator = RecordingEvaluator::default();
    let broken = ModuleName::new("broken");

    let err = loader.require(&broken, &mut evaluator).unwrap_err();
    assert!(matches!(err, LoaderError::Evaluation { .. }));
    assert_eq!(loader.require(&broken, &mut evaluator).unwrap(), Require::AlreadySatisfied);
}

#[test]
fn independent_loaders_do_not_share_state() {
    let dir = tempfile::tempdir().unwrap();
    touch(&dir, "shared.kes");
    let plugins = RecordingPlugins::default();
    let a = loader_for(&[&dir], &plugins);
    let b = loader_for(&[&dir], &plugins);
    let mut evaluator = RecordingEvaluator::default();
    let shared = ModuleName::new("shared");

    a.require(&shared, &mut evaluator).unwrap();
    assert!(a.is_loaded(&shared));
    assert!(!b.is_loaded(&shared));
    assert_eq!(b.require(&shared, &mut evaluator).unwrap(), Require::Resolved(shared));
    assert_eq!(evaluator.ran.len(), 2);
}

#[test]
fn require_natives() {
    let dir = tempfile::tempdir().unwrap();
    touch(&dir, "util.kes");
    let plugins = RecordingPlugins::default();
    let loader = loader_for(&[&dir], &plugins);
    let mut evaluator = RecordingEvaluator::default();

    assert_eq!(
        natives::require0(&loader, &Value::from("util"), &mut evaluator).unwrap(),
        Value::Symbol(ModuleName::new("util"))
    );
    assert_eq!(
        natives::require0(&loader, &Value::Symbol(ModuleName::new("util")), &mut evaluator).unwrap(),
        Value::Nil
    );
    assert_eq!(
        natives::require0(&loader, &Value::from("nothing"), &mut evaluator).unwrap(),
        Value::Unbound
    );
    assert!(matches!(
        natives::require(&loader, &Value::from("nothing"), &mut evaluator),
        Err(LoaderError::ModuleNotFound(_))
    ));
    assert!(matches!(
        natives::require(&loader, &Value::Int(3), &mut evaluator),
        Err(LoaderError::ArgumentType { .. })
    ));
}

#[test]
fn load_lib_native() {
    let dir = tempfile::tempdir().unwrap();
    let lib = touch(&dir, &format!("direct{DYLIB_SUFFIX}"));
    let plugins = RecordingPlugins::default();
    let loader = loader_for(&[], &plugins);

    let value = natives::load_lib(&loader, &Value::from(lib.to_str().unwrap())).unwrap();
    assert!(matches!(value, Value::Native(h) if h.path() == lib));
    // Installing directly does not register a module name
    assert!(loader.cache().is_empty());
}

#[test]
fn load_runs_script() {
    let dir = tempfile::tempdir().unwrap();
    let script = touch(&dir, "main.kes");
    let mut evaluator = RecordingEvaluator::default();

    let result = natives::load(&Value::from(script.to_str().unwrap()), &mut evaluator).unwrap();
    assert_eq!(result, Some(Value::Nil));
    assert_eq!(evaluator.ran, vec![script]);
}
