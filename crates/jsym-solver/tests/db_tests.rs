use super::*;
use crate::test_fixtures::{database, id, zoo_unit};
use jsym_syntax::{MethodData, TypeDeclData, UnitBuilder};

#[test]
fn test_add_unit_registers_types_and_members() {
    let db = database(vec![zoo_unit()]);
    assert_eq!(db.unit_count(), 1);
    assert_eq!(db.syntax_types().len(), 7);

    let dog = db.type_decl(id(&db, "zoo.Dog")).unwrap();
    assert_eq!(&*dog.name(), "Dog");
    assert_eq!(dog.fields().len(), 1);
    assert!(matches!(dog.origin(), TypeOrigin::Syntax(_)));

    let boxed = db.type_decl(id(&db, "zoo.Box")).unwrap();
    assert_eq!(boxed.methods().len(), 3);
    assert_eq!(boxed.fields().len(), 1);
}

#[test]
fn test_interface_members_get_implicit_modifiers() {
    let mut b = UnitBuilder::new(None);
    let int_ty = b.primitive(jsym_common::PrimitiveKind::Int);
    let constant = b.field(Modifiers::empty(), "LIMIT", int_ty, NodeIndex::NONE);
    let run = b.method(MethodData::new("run", NodeIndex::NONE));
    let body = b.block(vec![]);
    let helper = b.method(
        MethodData::new("helper", NodeIndex::NONE)
            .with_modifiers(Modifiers::DEFAULT)
            .with_body(body),
    );
    let nested = b.type_decl(TypeDeclData::class("Nested"));
    let task = b.type_decl(TypeDeclData::interface("Task").with_members(vec![constant, run, helper, nested]));
    let db = database(vec![b.finish(vec![task])]);

    let task = db.type_decl(id(&db, "Task")).unwrap();
    let field = db.field(task.fields()[0]).unwrap();
    assert!(field.is_static());

    let run = db.method(task.methods()[0]).unwrap();
    assert!(run.is_abstract());
    assert!(run.modifiers().contains(Modifiers::PUBLIC));
    let helper = db.method(task.methods()[1]).unwrap();
    assert!(!helper.is_abstract());
    assert!(helper.is_default());

    let nested = db.type_decl(task.member_type("Nested").unwrap()).unwrap();
    assert_eq!(&*nested.qualified_name(), "Task.Nested");
    assert_eq!(nested.enclosing(), Some(task.id()));
}

#[test]
fn test_duplicate_type_is_a_configuration_error() {
    let first = {
        let mut b = UnitBuilder::new(Some("p"));
        let a = b.type_decl(TypeDeclData::class("A"));
        b.finish(vec![a])
    };
    let second = {
        let mut b = UnitBuilder::new(Some("p"));
        let a = b.type_decl(TypeDeclData::interface("A"));
        b.finish(vec![a])
    };
    let db = database(vec![first, second]);
    assert_eq!(
        db.configuration_errors(),
        vec![ConfigurationError::DuplicateType {
            qualified_name: "p.A".to_string()
        }]
    );
    // First registration wins.
    assert!(!db.type_decl(id(&db, "p.A")).unwrap().is_interface());
}

#[test]
fn test_check_node_rejects_foreign_handles() {
    let db = database(vec![zoo_unit()]);
    let root = db.unit(UnitId(0)).unwrap().root();
    assert!(db.check_node(SyntaxRef::new(UnitId(0), root)).is_ok());
    assert_eq!(
        db.check_node(SyntaxRef::new(UnitId(3), root)),
        Err(ConfigurationError::UnknownUnit { unit: UnitId(3) })
    );
    assert!(matches!(
        db.check_node(SyntaxRef::new(UnitId(0), NodeIndex(100_000))),
        Err(ConfigurationError::ForeignNode { .. })
    ));
}

#[test]
fn test_root_and_string_types_come_from_builtins() {
    let db = database(Vec::new());
    let root = db.root_decl().unwrap();
    assert!(db.is_root(root));
    assert_eq!(&*db.type_decl(root).unwrap().qualified_name(), "java.lang.Object");
    assert_eq!(db.string_type(), Type::raw(id(&db, "java.lang.String")));
}

#[test]
fn test_errors_are_recorded_once() {
    let db = database(Vec::new());
    let error = ConfigurationError::CyclicHierarchy {
        type_name: "A".to_string(),
    };
    db.record_error(error.clone());
    db.record_error(error.clone());
    assert_eq!(db.configuration_errors(), vec![error]);
}

#[test]
fn test_options_deserialize_with_defaults() {
    let options: SolverOptions = serde_json::from_str(r#"{"memoize": false}"#).unwrap();
    assert!(!options.memoize);
    assert_eq!(options.root_type, "java.lang.Object");
    assert_eq!(options.implicit_packages, vec!["java.lang".to_string()]);
}
