use builtins::config::{BuiltinsConfig, OutputTarget};
use builtins::runtime::{load_builtins, ModuleRegistryBuilder, Param, RegistryError, Signature};
use builtins::{Args, Arity, BuiltinFunction, ModuleRegistry, RuntimeError, Value};
use pretty_assertions::assert_eq;
use std::io::Write;
use std::sync::Arc;
use std::thread;

fn constant(name: &str, value: i64) -> BuiltinFunction {
    BuiltinFunction::new(
        name,
        "returns a constant",
        Signature::new(Arity::Fixed(0), vec![]),
        move |_, _| Ok(Value::from(value)),
    )
}

#[test]
fn builtins_listing_follows_registration_order() {
    let registry = builtins::create_builtin_registry(&BuiltinsConfig::default()).unwrap();
    let names: Vec<&str> = registry
        .get_module("builtins")
        .unwrap()
        .function_names()
        .collect();
    assert_eq!(
        names,
        vec![
            "abs", "pow", "round", "print", "divmod", "len", "hash", "callable", "repr", "bin",
            "oct", "hex", "ord", "chr"
        ]
    );
    assert_eq!(registry.module_names().collect::<Vec<_>>(), vec!["builtins"]);
}

#[test]
fn builtins_live_next_to_other_namespaces() {
    let mut builder = ModuleRegistryBuilder::new();
    builder
        .register("math", "math helpers", vec![constant("answer", 42)])
        .unwrap();
    load_builtins(&mut builder, &BuiltinsConfig::default()).unwrap();
    let registry = builder.build();

    let answer = registry.lookup("math", "answer").unwrap();
    assert_eq!(
        answer.invoke(&Value::none(), &Args::default()).unwrap(),
        Value::from(42i64)
    );
    assert!(registry.lookup("builtins", "abs").is_ok());
    assert!(matches!(
        registry.lookup("math", "abs"),
        Err(RuntimeError::SymbolNotFound { .. })
    ));
}

#[test]
fn loading_builtins_twice_is_fatal() {
    let mut builder = ModuleRegistry::builder();
    load_builtins(&mut builder, &BuiltinsConfig::default()).unwrap();
    let err = load_builtins(&mut builder, &BuiltinsConfig::default()).unwrap_err();
    assert_eq!(err, RegistryError::DuplicateModule("builtins".to_string()));
    assert_eq!(err.to_string(), "module 'builtins' is already registered");
}

#[test]
fn duplicate_function_names_abort_registration() {
    let mut builder = ModuleRegistry::builder();
    let err = builder
        .register("m", "", vec![constant("x", 1), constant("y", 2), constant("x", 3)])
        .unwrap_err();
    assert_eq!(
        err,
        RegistryError::DuplicateFunction {
            module: "m".to_string(),
            name: "x".to_string(),
        }
    );
    assert!(builder.build().get_module("m").is_none());
}

#[test]
fn signature_without_defaults_is_rejected_at_registration() {
    let broken = BuiltinFunction::new(
        "broken",
        "",
        Signature::new(
            Arity::Range(1, 2),
            vec![Param::required("a"), Param::required("b")],
        ),
        |_, _| Ok(Value::none()),
    );
    let err = ModuleRegistry::builder()
        .register("m", "", vec![broken])
        .unwrap_err();
    assert!(matches!(err, RegistryError::InvalidSignature { .. }));
}

#[test]
fn registry_is_shared_across_threads() {
    let registry = Arc::new(builtins::create_builtin_registry(&BuiltinsConfig::default()).unwrap());

    let handles: Vec<_> = (0..4i64)
        .map(|i| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                let abs = registry.lookup("builtins", "abs").unwrap();
                abs.invoke(&Value::none(), &Args::new(vec![Value::from(-i)]))
                    .unwrap()
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), Value::from(i as i64));
    }
}

#[test]
fn config_file_drives_registration() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
namespace = "__builtins__"
output = "stderr"
disabled = ["print", "chr"]
"#
    )
    .unwrap();

    let config = BuiltinsConfig::load_from_file(file.path()).unwrap();
    assert_eq!(config.output, OutputTarget::Stderr);

    let registry = builtins::create_builtin_registry(&config).unwrap();
    let module = registry.get_module("__builtins__").unwrap();
    assert!(module.get("print").is_none());
    assert!(module.get("chr").is_none());
    assert_eq!(module.len(), 12);
    assert!(matches!(
        registry.lookup("__builtins__", "print"),
        Err(RuntimeError::SymbolNotFound { .. })
    ));
}
