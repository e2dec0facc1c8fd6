use super::*;
use jsym_syntax::{NodeIndex, UnitId};

fn syntax_type(name: &str, node: u32) -> TypeDeclInfo {
    TypeDeclInfo {
        name: Arc::from(name),
        qualified_name: Arc::from(name),
        kind: TypeDeclKind::Class,
        modifiers: Modifiers::empty(),
        enclosing: None,
        fields: Vec::new(),
        methods: Vec::new(),
        member_types: Vec::new(),
        origin: TypeOrigin::Syntax(SyntaxRef::new(UnitId(0), NodeIndex(node))),
    }
}

#[test]
fn test_allocation_starts_at_first_valid() {
    let store = DeclarationStore::new();
    let a = store.allocate_type();
    let b = store.allocate_type();
    assert!(a.is_valid());
    assert_eq!(b.0, a.0 + 1);
}

#[test]
fn test_syntax_nodes_map_back_to_handles() {
    let store = DeclarationStore::new();
    let ty = store.allocate_type();
    let field = store.register_field(FieldInfo {
        name: Arc::from("x"),
        declaring_type: ty,
        modifiers: Modifiers::empty(),
        is_enum_constant: false,
        origin: MemberOrigin::Syntax(SyntaxRef::new(UnitId(0), NodeIndex(3))),
    });
    let mut info = syntax_type("Point", 7);
    info.fields.push(field);
    store.insert_type(ty, info);

    assert_eq!(
        store.syntax_decl(SyntaxRef::new(UnitId(0), NodeIndex(7))),
        Some(SyntaxDecl::Type(ty))
    );
    assert_eq!(
        store.syntax_decl(SyntaxRef::new(UnitId(0), NodeIndex(3))),
        Some(SyntaxDecl::Field(field))
    );
    assert_eq!(store.syntax_decl(SyntaxRef::new(UnitId(1), NodeIndex(3))), None);

    let stored = store.type_info(ty).expect("type registered");
    assert_eq!(stored.fields, vec![field]);
    assert_eq!(store.field_info(field).expect("field").declaring_type, ty);
    assert_eq!(store.type_count(), 1);
}
