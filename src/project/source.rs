//! Requiring source files into the runtime.
//!
//! A [`SourceLoader`] is the host primitive behind a load attempt: it checks
//! that a candidate exists and, if so, evaluates it. [`FsSource`] reads files
//! from disk and hands their text to a [`SourceEvaluator`].
//!
//! The bundled [`DeclarationEvaluator`] understands a small line format:
//!
//! ```text
//! # comment
//! entity Foo\Bar\Baz        # constructible, no declared parameters
//! entity Foo\Bar\Point/2    # two declared constructor parameters
//! abstract Foo\Bar\Shape    # defined, not constructible
//! require Foo\Bar\Base      # resolve another entity through the chain
//! flex Foo\Bar\Bar          # also reachable as Foo\Bar
//! ```

use std::path::{Path, PathBuf};

use indexmap::IndexSet;
use parking_lot::RwLock;
use smol_str::SmolStr;
use tracing::{debug, trace, warn};

use crate::base::is_entity_name;
use crate::error::{ConstructError, LoadError};
use crate::runtime::{EntityDef, Factory, Host, Value};

/// Host primitive used by loaders to bring a file into the runtime.
pub trait SourceLoader: Send + Sync {
    fn exists(&self, path: &Path) -> bool;

    /// Evaluate the file. Called only for paths where [`exists`](Self::exists)
    /// returned `true`.
    fn require(&self, path: &Path, host: &mut Host<'_>) -> Result<(), LoadError>;
}

/// Turns the text of a source file into entity definitions.
pub trait SourceEvaluator: Send + Sync {
    fn evaluate(&self, path: &Path, source: &str, host: &mut Host<'_>) -> Result<(), LoadError>;
}

/// Loads files from the filesystem.
///
/// Each file is evaluated successfully at most once; requiring it again is
/// a no-op. A file whose evaluation failed is not recorded as included.
#[derive(Debug, Default)]
pub struct FsSource<E> {
    evaluator: E,
    included: RwLock<IndexSet<PathBuf>>,
}

impl<E: SourceEvaluator> FsSource<E> {
    pub fn new(evaluator: E) -> Self {
        Self {
            evaluator,
            included: RwLock::new(IndexSet::new()),
        }
    }

    /// Files evaluated so far, in evaluation order.
    pub fn included_files(&self) -> Vec<PathBuf> {
        self.included.read().iter().cloned().collect()
    }

    pub fn is_included(&self, path: &Path) -> bool {
        self.included.read().contains(path)
    }
}

impl<E: SourceEvaluator> SourceLoader for FsSource<E> {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn require(&self, path: &Path, host: &mut Host<'_>) -> Result<(), LoadError> {
        if self.is_included(path) {
            trace!(path = %path.display(), "already included");
            return Ok(());
        }

        let source = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_owned(),
            source,
        })?;
        // Marked before evaluation so cyclic requires terminate.
        self.included.write().insert(path.to_owned());

        let result = self.evaluator.evaluate(path, &source, host);
        if result.is_err() {
            // evaluated again on the next require
            self.included.write().shift_remove(path);
            debug!(path = %path.display(), "evaluation failed, file not marked as included");
        }
        result
    }
}

/// Instance produced by entities defined through [`DeclarationEvaluator`].
#[derive(Clone, Debug, PartialEq)]
pub struct Instance {
    pub entity: SmolStr,
    pub arguments: Vec<Value>,
}

/// Evaluator for the line-oriented declaration format (see module docs).
#[derive(Clone, Copy, Debug, Default)]
pub struct DeclarationEvaluator;

impl DeclarationEvaluator {
    fn define(
        path: &Path,
        name: &str,
        arity: Option<usize>,
        host: &mut Host<'_>,
    ) -> Result<(), LoadError> {
        if host.is_defined(name) {
            trace!(entity = name, "already defined, skipping");
            return Ok(());
        }

        let mut def = EntityDef::new().with_origin(path);
        if let Some(arity) = arity {
            def = def.with_factory(instance_factory(name.into(), arity));
        }
        host.symbols_mut().define(name, def)?;
        Ok(())
    }
}

impl SourceEvaluator for DeclarationEvaluator {
    fn evaluate(&self, path: &Path, source: &str, host: &mut Host<'_>) -> Result<(), LoadError> {
        for (index, raw) in source.lines().enumerate() {
            let text = raw.split('#').next().unwrap_or_default().trim();
            if text.is_empty() {
                continue;
            }

            let error = |message: String| LoadError::Evaluate {
                path: path.to_owned(),
                line: index + 1,
                message,
            };
            let (keyword, operand) = match text.split_once(char::is_whitespace) {
                Some((keyword, operand)) => (keyword, operand.trim()),
                None => (text, ""),
            };

            match keyword {
                "entity" => {
                    let (name, arity) = match operand.split_once('/') {
                        Some((name, arity)) => {
                            let arity = arity
                                .parse::<usize>()
                                .map_err(|_| error(format!("invalid arity '{arity}'")))?;
                            (name, arity)
                        }
                        None => (operand, 0),
                    };
                    check_name(name).map_err(error)?;
                    Self::define(path, name, Some(arity), host)?;
                }
                "abstract" => {
                    check_name(operand).map_err(error)?;
                    Self::define(path, operand, None, host)?;
                }
                "require" => {
                    check_name(operand).map_err(error)?;
                    if !host.resolve(operand)? {
                        return Err(error(format!("required entity '{operand}' is not defined")));
                    }
                }
                "flex" => {
                    check_name(operand).map_err(error)?;
                    if !host.symbols_mut().flex_entity(operand) {
                        warn!(entity = operand, path = %path.display(), "could not flex entity");
                    }
                }
                other => return Err(error(format!("unknown declaration '{other}'"))),
            }
        }
        Ok(())
    }
}

fn check_name(name: &str) -> Result<(), String> {
    if is_entity_name(name) {
        Ok(())
    } else {
        Err(format!("invalid entity name '{name}'"))
    }
}

fn instance_factory(entity: SmolStr, arity: usize) -> Factory {
    Factory::new(arity, move |arguments| {
        if !arguments.is_empty() && arguments.len() != arity {
            return Err(ConstructError::ArgumentCount {
                expected: arity,
                got: arguments.len(),
            });
        }
        Ok(Box::new(Instance {
            entity: entity.clone(),
            arguments: arguments.to_vec(),
        }))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::Runtime;

    fn evaluate(runtime: &mut Runtime, source: &str) -> Result<(), LoadError> {
        DeclarationEvaluator.evaluate(Path::new("decl.src"), source, &mut runtime.host())
    }

    #[test]
    fn test_declarations() {
        let mut runtime = Runtime::new();
        evaluate(
            &mut runtime,
            "# shapes\n\
             abstract Geo\\Shape\n\
             entity Geo\\Point/2   # x, y\n\
             entity Geo\\Geo\n\
             flex Geo\\Geo\n",
        )
        .unwrap();

        let symbols = runtime.symbols();
        assert!(symbols.contains("Geo\\Shape"));
        assert!(symbols.contains("Geo\\Point"));
        assert_eq!(symbols.lookup("Geo"), symbols.lookup("Geo\\Geo"));

        let def = symbols.get(symbols.lookup("Geo\\Point").unwrap()).unwrap();
        assert_eq!(def.factory.as_ref().map(Factory::arity), Some(2));
        assert_eq!(def.origin.as_deref(), Some(Path::new("decl.src")));
        let shape = symbols.get(symbols.lookup("Geo\\Shape").unwrap()).unwrap();
        assert!(shape.factory.is_none());
    }

    #[test]
    fn test_redeclaration_is_ignored() {
        let mut runtime = Runtime::new();
        evaluate(&mut runtime, "entity A\\B").unwrap();
        evaluate(&mut runtime, "entity A\\B\nentity A\\B").unwrap();

        assert_eq!(runtime.symbols().len(), 1);
    }

    #[test]
    fn test_errors_report_line() {
        let mut runtime = Runtime::new();

        let err = evaluate(&mut runtime, "entity Ok\n\nentity Not-Ok").unwrap_err();
        assert!(matches!(err, LoadError::Evaluate { line: 3, .. }));

        let err = evaluate(&mut runtime, "define Foo").unwrap_err();
        assert!(err.to_string().contains("unknown declaration 'define'"));

        let err = evaluate(&mut runtime, "entity Foo/x").unwrap_err();
        assert!(err.to_string().contains("invalid arity"));
    }

    #[test]
    fn test_unresolved_require() {
        let mut runtime = Runtime::new();

        let err = evaluate(&mut runtime, "require Missing\\Base").unwrap_err();
        assert!(err.to_string().contains("Missing\\Base"));
    }

    #[test]
    fn test_instance_factory_arity() {
        let factory = instance_factory("Geo\\Point".into(), 2);

        let object = factory.construct(&[Value::from(1), Value::from(2)]).unwrap();
        let instance = object.downcast_ref::<Instance>().unwrap();
        assert_eq!(instance.entity, "Geo\\Point");
        assert_eq!(instance.arguments.len(), 2);

        assert!(factory.construct(&[]).is_ok());
        assert_eq!(
            factory.construct(&[Value::Null]).err(),
            Some(ConstructError::ArgumentCount { expected: 2, got: 1 })
        );
    }

    #[test]
    fn test_fs_source_requires_once() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("Once.src");
        std::fs::write(&file, "entity Once").unwrap();

        let source = FsSource::new(DeclarationEvaluator);
        let mut runtime = Runtime::new();

        assert!(source.exists(&file));
        assert!(!source.exists(&dir.path().join("Missing.src")));
        source.require(&file, &mut runtime.host()).unwrap();
        source.require(&file, &mut runtime.host()).unwrap();

        assert_eq!(source.included_files(), vec![file]);
        assert!(runtime.symbols().contains("Once"));
    }

    #[test]
    fn test_fs_source_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = FsSource::new(DeclarationEvaluator);
        let mut runtime = Runtime::new();

        let err = source
            .require(&dir.path().join("Gone.src"), &mut runtime.host())
            .unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn test_fs_source_failed_file_is_not_included() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("Broken.src");
        std::fs::write(&file, "bogus line\nentity Broken").unwrap();

        let source = FsSource::new(DeclarationEvaluator);
        let mut runtime = Runtime::new();

        for _ in 0..2 {
            let err = source.require(&file, &mut runtime.host()).unwrap_err();
            assert!(matches!(err, LoadError::Evaluate { line: 1, .. }));
        }
        assert!(!source.is_included(&file));
        assert!(!runtime.symbols().contains("Broken"));
    }
}
