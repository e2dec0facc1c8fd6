use super::*;
use crate::metadata::InMemoryMetadata;
use crate::test_fixtures::{collections, database, database_with, id, zoo_unit};
use jsym_syntax::{MethodData, TypeDeclData, UnitBuilder};

fn ctx(unit: u32) -> LookupContext {
    LookupContext::for_unit(UnitId(unit))
}

#[test]
fn test_simple_names_search_package_then_implicit_packages() {
    let db = database(vec![zoo_unit()]);
    assert_eq!(db.resolve_type_by_name("Dog", &ctx(0)), SymbolReference::Solved(id(&db, "zoo.Dog")));
    assert_eq!(
        db.resolve_type_by_name("String", &ctx(0)),
        SymbolReference::Solved(id(&db, "java.lang.String"))
    );
    assert_eq!(db.resolve_type_by_name("List", &ctx(0)), SymbolReference::Unsolved);
}

#[test]
fn test_single_import_beats_same_package() {
    let mut b = UnitBuilder::new(Some("zoo"));
    b.import("java.util.List");
    let local_list = b.type_decl(TypeDeclData::class("List"));
    let other = b.type_decl(TypeDeclData::class("Other"));
    let zoo = b.finish(vec![local_list, other]);

    let mut b = UnitBuilder::new(Some("zoo"));
    let user = b.type_decl(TypeDeclData::class("User"));
    let plain = b.finish(vec![user]);

    let db = database(vec![zoo, plain]);
    assert_eq!(
        db.resolve_type_by_name("List", &ctx(0)),
        SymbolReference::Solved(id(&db, "java.util.List"))
    );
    // Without the import the package type wins.
    assert_eq!(db.resolve_type_by_name("List", &ctx(1)), SymbolReference::Solved(id(&db, "zoo.List")));
}

#[test]
fn test_conflicting_on_demand_imports_are_ambiguous() {
    let metadata = collections()
        .with(TypeDescriptor::class("a.Widget"))
        .with(TypeDescriptor::class("b.Widget"));
    let mut b = UnitBuilder::new(None);
    b.import_on_demand("a");
    b.import_on_demand("b");
    let user = b.type_decl(TypeDeclData::class("User"));
    let db = database_with(metadata, vec![b.finish(vec![user])]);

    let SymbolReference::Ambiguous(candidates) = db.resolve_type_by_name("Widget", &ctx(0)) else {
        panic!("expected an ambiguous reference");
    };
    assert_eq!(candidates.len(), 2);
}

#[test]
fn test_member_types_shadow_top_level_types() {
    let mut b = UnitBuilder::new(Some("p"));
    let inner_node = b.type_decl(TypeDeclData::class("Node"));
    let tree = b.type_decl(TypeDeclData::class("Tree").with_members(vec![inner_node]));
    let top_node = b.type_decl(TypeDeclData::class("Node"));
    let arena = b.finish(vec![tree, top_node]);
    let db = database(vec![arena]);

    let inside = db.lookup_context(SyntaxRef::new(UnitId(0), inner_node));
    assert_eq!(inside.enclosing.len(), 2);
    assert_eq!(
        db.resolve_type_by_name("Node", &inside),
        SymbolReference::Solved(id(&db, "p.Tree.Node"))
    );
    assert_eq!(db.resolve_type_by_name("Node", &ctx(0)), SymbolReference::Solved(id(&db, "p.Node")));
    assert_eq!(
        db.resolve_type_by_name("Tree.Node", &ctx(0)),
        SymbolReference::Solved(id(&db, "p.Tree.Node"))
    );
}

#[test]
fn test_qualified_global_walks_member_types() {
    let metadata = InMemoryMetadata::new()
        .with(TypeDescriptor::class("x.Map").with_nested_type("Entry"))
        .with(TypeDescriptor::interface("x.Map.Entry"));
    let db = database_with(metadata, Vec::new());
    let entry = db.resolve_qualified_global("x.Map.Entry").unwrap();
    assert_eq!(db.member_type(id(&db, "x.Map"), "Entry"), Some(entry));
    assert_eq!(db.type_decl(entry).unwrap().enclosing(), Some(id(&db, "x.Map")));
    assert_eq!(db.resolve_qualified_global("x.Map.Missing"), None);
}

#[test]
fn test_metadata_import_is_lazy_and_stable() {
    let db = database(Vec::new());
    let before = db.store().type_count();
    let first = db.lookup_qualified("java.util.List").unwrap();
    assert!(db.store().type_count() > before);
    let after = db.store().type_count();
    assert_eq!(db.lookup_qualified("java.util.List"), Some(first));
    assert_eq!(db.store().type_count(), after);
    assert_eq!(db.lookup_qualified("java.util.Nope"), None);
}

#[test]
fn test_descriptor_name_mismatch_is_reported() {
    struct Liar;
    impl crate::metadata::MetadataProvider for Liar {
        fn lookup_by_qualified_name(&self, _: &str) -> Option<Arc<TypeDescriptor>> {
            Some(Arc::new(TypeDescriptor::class("other.Name")))
        }
    }
    let db = TypeDatabase::new(crate::db::SolverOptions::default(), Arc::new(Liar));
    assert_eq!(db.lookup_qualified("wanted.Name"), None);
    assert!(db.configuration_errors().contains(&ConfigurationError::DescriptorNameMismatch {
        requested: "wanted.Name".to_string(),
        found: "other.Name".to_string(),
    }));
}

#[test]
fn test_type_nodes_resolve_variables_and_arguments() {
    let db = database(vec![zoo_unit()]);
    let box_id = id(&db, "zoo.Box");
    let boxed = db.type_decl(box_id).unwrap();
    let value = db.field(boxed.fields()[0]).unwrap();
    let Type::TypeVariable { name, bound } = value.field_type() else {
        panic!("field should be typed by a type variable");
    };
    assert_eq!(&*name, "T");
    assert_eq!(*bound, db.root_type());

    let string_box = id(&db, "zoo.StringBox");
    assert_eq!(
        db.supertypes(string_box).to_vec(),
        vec![Type::reference(box_id, vec![db.string_type()])]
    );
}

#[test]
fn test_wrong_argument_count_falls_back_to_raw() {
    let mut b = UnitBuilder::new(Some("p"));
    let t = b.type_param("T", vec![]);
    let holder = b.type_decl(TypeDeclData::class("Holder").with_type_params(vec![t]));
    let a1 = b.class_type("String", vec![]);
    let a2 = b.class_type("String", vec![]);
    let bad = b.class_type("Holder", vec![a1, a2]);
    let field = b.field(Modifiers::empty(), "h", bad, NodeIndex::NONE);
    let user = b.type_decl(TypeDeclData::class("User").with_members(vec![field]));
    let db = database(vec![b.finish(vec![holder, user])]);

    assert_eq!(db.resolve_type_node(SyntaxRef::new(UnitId(0), bad)), Type::raw(id(&db, "p.Holder")));
}

#[test]
fn test_static_members_do_not_see_class_type_params() {
    let mut b = UnitBuilder::new(None);
    let t = b.type_param("T", vec![]);
    let inst_ty = b.class_type("T", vec![]);
    let inst = b.field(Modifiers::empty(), "a", inst_ty, NodeIndex::NONE);
    let static_ty = b.class_type("T", vec![]);
    let stat = b.field(Modifiers::STATIC, "b", static_ty, NodeIndex::NONE);
    let decl = b.type_decl(TypeDeclData::class("G").with_type_params(vec![t]).with_members(vec![inst, stat]));
    let db = database(vec![b.finish(vec![decl])]);

    assert!(db.find_type_param(SyntaxRef::new(UnitId(0), inst_ty), "T").is_some());
    assert!(db.find_type_param(SyntaxRef::new(UnitId(0), static_ty), "T").is_none());
    assert_eq!(db.resolve_type_node(SyntaxRef::new(UnitId(0), static_ty)), Type::Unknown);
}

#[test]
fn test_method_type_params_shadow_class_params() {
    let mut b = UnitBuilder::new(None);
    let class_t = b.type_param("T", vec![]);
    let number = b.class_type("Number", vec![]);
    let method_t = b.type_param("T", vec![number]);
    let ret = b.class_type("T", vec![]);
    let m = b.method(MethodData::new("pick", ret).with_type_params(vec![method_t]));
    let decl = b.type_decl(TypeDeclData::class("G").with_type_params(vec![class_t]).with_members(vec![m]));
    let db = database(vec![b.finish(vec![decl])]);

    assert_eq!(db.find_type_param(SyntaxRef::new(UnitId(0), ret), "T"), Some(SyntaxRef::new(UnitId(0), method_t)));
    let Type::TypeVariable { bound, .. } = db.resolve_type_node(SyntaxRef::new(UnitId(0), ret)) else {
        panic!("expected a type variable");
    };
    assert_eq!(*bound, Type::raw(id(&db, "java.lang.Number")));
}

#[test]
fn test_self_referential_bounds_terminate() {
    let db = database(Vec::new());
    let enum_base = id(&db, "java.lang.Enum");
    let params = db.type_params(enum_base);
    assert_eq!(params.len(), 1);
    let Type::Reference { decl, args } = &params[0].bound else {
        panic!("bound should be Enum<E>");
    };
    assert_eq!(*decl, enum_base);
    assert!(matches!(&args[0], Type::TypeVariable { bound, .. } if bound.is_unknown()));
}

#[test]
fn test_implicit_supertypes() {
    let mut b = UnitBuilder::new(None);
    let red = b.enum_constant("RED", vec![]);
    let color = b.type_decl(TypeDeclData::enumeration("Color").with_members(vec![red]));
    let plain = b.type_decl(TypeDeclData::class("Plain"));
    let marker = b.type_decl(TypeDeclData::interface("Marker"));
    let db = database(vec![b.finish(vec![color, plain, marker])]);

    let color = id(&db, "Color");
    assert_eq!(
        db.supertypes(color).to_vec(),
        vec![Type::reference(id(&db, "java.lang.Enum"), vec![Type::raw(color)])]
    );
    assert_eq!(db.supertypes(id(&db, "Plain")).to_vec(), vec![db.root_type()]);
    assert!(db.supertypes(id(&db, "Marker")).is_empty());
    assert!(db.supertypes(id(&db, "java.lang.Object")).is_empty());
    assert_eq!(
        db.supertypes(id(&db, "java.lang.Integer")).to_vec(),
        vec![Type::raw(id(&db, "java.lang.Number"))]
    );
}
