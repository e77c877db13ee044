//! Constructing entities by name, loading them first when needed.

use std::sync::Arc;

use autoload::error::ConstructError;
use autoload::project::Instance;
use autoload::runtime::{EntityDef, Object, resolver_fn};
use autoload::{Factory, InstantiateError, Psr4Loader, Runtime, Value};
use rstest::rstest;

#[derive(Debug, PartialEq)]
struct Greeting(String);

fn greeting_factory() -> Factory {
    Factory::new(1, |args| match args {
        [] => Ok(Box::new(Greeting("hello".into()))),
        [name] => name
            .as_str()
            .map(|name| Box::new(Greeting(format!("hello {name}"))) as Object)
            .ok_or_else(|| ConstructError::InvalidArgument("name must be a string".into())),
        other => Err(ConstructError::ArgumentCount {
            expected: 1,
            got: other.len(),
        }),
    })
}

fn runtime_with_lazy_greeting() -> Runtime {
    let mut runtime = Runtime::new();
    runtime.register_resolver(
        Arc::new(resolver_fn("greetings", |entity, host| {
            if entity == "Text\\Greeting" {
                host.symbols_mut()
                    .define(entity, EntityDef::new().with_factory(greeting_factory()))?;
            }
            Ok(None)
        })),
        false,
    );
    runtime
}

#[rstest]
#[case::defaults(vec![], "hello")]
#[case::forwarded(vec![Value::from("world")], "hello world")]
fn test_instantiate_after_autoload(#[case] args: Vec<Value>, #[case] expected: &str) {
    let mut runtime = runtime_with_lazy_greeting();

    let object = runtime.instantiate("Text\\Greeting", &args).unwrap();
    assert_eq!(
        object.downcast_ref::<Greeting>(),
        Some(&Greeting(expected.to_owned()))
    );
    assert!(runtime.entity_exists("Text\\Greeting", false).unwrap());
}

#[test]
fn test_leading_separator_is_ignored() {
    let mut runtime = runtime_with_lazy_greeting();
    assert!(runtime.instantiate("\\Text\\Greeting", &[]).is_ok());
}

#[test]
fn test_factory_rejection_is_reported_as_construction_error() {
    let mut runtime = runtime_with_lazy_greeting();

    let err = runtime
        .instantiate("Text\\Greeting", &[Value::from(42)])
        .err()
        .unwrap();
    assert!(matches!(
        err,
        InstantiateError::Construction {
            source: ConstructError::InvalidArgument(_),
            ..
        }
    ));
}

#[test]
fn test_unresolvable_entity() {
    let mut runtime = runtime_with_lazy_greeting();

    let err = runtime.instantiate("Text\\Farewell", &[]).err().unwrap();
    assert_eq!(err.to_string(), "entity 'Text\\Farewell' could not be resolved");
}

#[test]
fn test_flexed_alias_instantiates_same_entity() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("lib").join("Shop").join("Shop.src");
    std::fs::create_dir_all(file.parent().unwrap()).unwrap();
    std::fs::write(&file, "entity Acme\\Shop\\Shop/1\nflex Acme\\Shop\\Shop\n").unwrap();

    let mut runtime = Runtime::new();
    let loader = Arc::new(Psr4Loader::filesystem());
    loader.add_namespace("Acme", &dir.path().join("lib").to_string_lossy(), false);
    loader.register(&mut runtime, false);

    let object = runtime.instantiate("Acme\\Shop", &[Value::from(3)]).unwrap();
    let instance = object.downcast_ref::<Instance>().unwrap();
    assert_eq!(instance.entity, "Acme\\Shop\\Shop");
    assert_eq!(instance.arguments, vec![Value::from(3)]);
}
