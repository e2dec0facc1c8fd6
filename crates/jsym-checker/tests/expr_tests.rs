use super::*;
use crate::session::{Session, create_session};
use crate::test_fixtures::{at, metadata};
use jsym_syntax::{MethodData, Modifiers, NodeArena, NodeIndex, TypeDeclData, UnitBuilder};

#[derive(Default)]
struct Calc {
    arena: NodeArena,
    literals: Vec<(NodeIndex, &'static str)>,
    this_instance: NodeIndex,
    this_static: NodeIndex,
    length: NodeIndex,
    element: NodeIndex,
    first: NodeIndex,
    nested_element: NodeIndex,
    get: NodeIndex,
    pick_ints: NodeIndex,
    pick_nulls: NodeIndex,
    pick_explicit: NodeIndex,
    list_get: NodeIndex,
    creation: NodeIndex,
    cast: NodeIndex,
    raw_first: NodeIndex,
    names_param: NodeIndex,
    pair_field: NodeIndex,
}

/// ```text
/// package calc;
/// import java.util.List;
/// class Pair<A> { A first; A[] all; A get(); <R> R pick(R a, R b); }
/// class Calc {
///     Pair<String> pair;
///     Pair raw;
///     int[] numbers;
///     void run(List<String> names) {
///         1; 2L; 1.5; 'c'; true; "s"; null;
///         this; numbers.length; numbers[0]; pair.first; pair.all[0]; pair.get();
///         pair.pick(1, 2); pair.pick(null, null); pair.<Long>pick(null, null);
///         names.get(0); new Pair<String>(); (Object) pair; raw.first;
///     }
///     static void helper() { this; }
/// }
/// ```
fn calc() -> Calc {
    let mut out = Calc::default();
    let mut b = UnitBuilder::new(Some("calc"));
    b.import("java.util.List");

    let a = b.type_param("A", vec![]);
    let first_ty = b.class_type("A", vec![]);
    let first_field = b.field(Modifiers::empty(), "first", first_ty, NodeIndex::NONE);
    let all_elem = b.class_type("A", vec![]);
    let all_ty = b.array_type(all_elem);
    let all_field = b.field(Modifiers::empty(), "all", all_ty, NodeIndex::NONE);
    let get_ret = b.class_type("A", vec![]);
    let get = b.method(MethodData::new("get", get_ret));
    let r = b.type_param("R", vec![]);
    let ra_ty = b.class_type("R", vec![]);
    let ra = b.param("a", ra_ty);
    let rb_ty = b.class_type("R", vec![]);
    let rb = b.param("b", rb_ty);
    let pick_ret = b.class_type("R", vec![]);
    let pick = b.method(
        MethodData::new("pick", pick_ret)
            .with_type_params(vec![r])
            .with_params(vec![ra, rb]),
    );
    let pair_decl = b.type_decl(
        TypeDeclData::class("Pair")
            .with_type_params(vec![a])
            .with_members(vec![first_field, all_field, get, pick]),
    );

    let string_arg = b.class_type("String", vec![]);
    let pair_ty = b.class_type("Pair", vec![string_arg]);
    out.pair_field = b.field(Modifiers::empty(), "pair", pair_ty, NodeIndex::NONE);
    let raw_ty = b.class_type("Pair", vec![]);
    let raw_field = b.field(Modifiers::empty(), "raw", raw_ty, NodeIndex::NONE);
    let int_ty = b.primitive(PrimitiveKind::Int);
    let numbers_ty = b.array_type(int_ty);
    let numbers_field = b.field(Modifiers::empty(), "numbers", numbers_ty, NodeIndex::NONE);

    let mut exprs = Vec::new();
    for (kind, text, expected) in [
        (LiteralKind::Int, "1", "int"),
        (LiteralKind::Long, "2L", "long"),
        (LiteralKind::Double, "1.5", "double"),
        (LiteralKind::Char, "'c'", "char"),
        (LiteralKind::Boolean, "true", "boolean"),
        (LiteralKind::String, "s", "java.lang.String"),
        (LiteralKind::Null, "null", "null"),
    ] {
        let literal = b.literal(kind, text);
        out.literals.push((literal, expected));
        exprs.push(literal);
    }

    out.this_instance = b.this();
    let numbers = b.name("numbers");
    out.length = b.field_access(numbers, "length");
    let numbers = b.name("numbers");
    let zero = b.int_lit(0);
    out.element = b.array_access(numbers, zero);
    let pair = b.name("pair");
    out.first = b.field_access(pair, "first");
    let pair = b.name("pair");
    let all = b.field_access(pair, "all");
    let zero = b.int_lit(0);
    out.nested_element = b.array_access(all, zero);
    let pair = b.name("pair");
    out.get = b.call(pair, "get", vec![]);
    let pair = b.name("pair");
    let one = b.int_lit(1);
    let two = b.int_lit(2);
    out.pick_ints = b.call(pair, "pick", vec![one, two]);
    let pair = b.name("pair");
    let n1 = b.null_lit();
    let n2 = b.null_lit();
    out.pick_nulls = b.call(pair, "pick", vec![n1, n2]);
    let pair = b.name("pair");
    let n1 = b.null_lit();
    let n2 = b.null_lit();
    let long_arg = b.class_type("Long", vec![]);
    out.pick_explicit = b.add(NodeData::MethodCall(MethodCallData {
        receiver: pair,
        name: "pick".to_string(),
        args: vec![n1, n2],
        type_args: vec![long_arg],
    }));
    let names = b.name("names");
    let zero = b.int_lit(0);
    out.list_get = b.call(names, "get", vec![zero]);
    let created_arg = b.class_type("String", vec![]);
    let created_ty = b.class_type("Pair", vec![created_arg]);
    out.creation = b.new_object(created_ty, vec![]);
    let object_ty = b.class_type("Object", vec![]);
    let pair = b.name("pair");
    out.cast = b.cast(object_ty, pair);
    let raw = b.name("raw");
    out.raw_first = b.field_access(raw, "first");
    exprs.extend([
        out.this_instance,
        out.length,
        out.element,
        out.first,
        out.nested_element,
        out.get,
        out.pick_ints,
        out.pick_nulls,
        out.pick_explicit,
        out.list_get,
        out.creation,
        out.cast,
        out.raw_first,
    ]);
    let statements = exprs.into_iter().map(|e| b.expr_stmt(e)).collect();
    let body = b.block(statements);
    let string_arg = b.class_type("String", vec![]);
    let list_ty = b.class_type("List", vec![string_arg]);
    out.names_param = b.param("names", list_ty);
    let run = b.method(
        MethodData::new("run", NodeIndex::NONE)
            .with_params(vec![out.names_param])
            .with_body(body),
    );

    out.this_static = b.this();
    let stmt = b.expr_stmt(out.this_static);
    let body = b.block(vec![stmt]);
    let helper = b.method(
        MethodData::new("helper", NodeIndex::NONE)
            .with_modifiers(Modifiers::STATIC)
            .with_body(body),
    );

    let calc_decl = b.type_decl(TypeDeclData::class("Calc").with_members(vec![
        out.pair_field,
        raw_field,
        numbers_field,
        run,
        helper,
    ]));
    out.arena = b.finish(vec![pair_decl, calc_decl]);
    out
}

fn setup() -> (Session, Calc) {
    let mut fixture = calc();
    let arena = std::mem::take(&mut fixture.arena);
    (create_session(vec![arena], metadata()), fixture)
}

fn shown(session: &Session, node: NodeIndex) -> String {
    let ty = session.type_of_node(at(0, node));
    session.db().display_type(&ty).to_string()
}

#[test]
fn test_literal_types() {
    let (session, fixture) = setup();
    for &(literal, expected) in &fixture.literals {
        assert_eq!(shown(&session, literal), expected);
    }
}

#[test]
fn test_this_depends_on_static_context() {
    let (session, fixture) = setup();
    assert_eq!(shown(&session, fixture.this_instance), "calc.Calc");
    assert_eq!(session.type_of_node(at(0, fixture.this_static)), Type::Unknown);
    // Resolution still names the enclosing type.
    assert_eq!(
        session.resolve_node(at(0, fixture.this_static)).solved(),
        Some(Declaration::Type(session.db().lookup_qualified("calc.Calc").unwrap()))
    );
}

#[test]
fn test_arrays() {
    let (session, fixture) = setup();
    assert_eq!(shown(&session, fixture.length), "int");
    assert!(session.resolve_node(at(0, fixture.length)).is_unsolved());
    assert_eq!(shown(&session, fixture.element), "int");
    assert_eq!(shown(&session, fixture.nested_element), "java.lang.String");
}

#[test]
fn test_generic_members_through_receiver() {
    let (session, fixture) = setup();
    assert_eq!(shown(&session, fixture.first), "java.lang.String");
    assert_eq!(shown(&session, fixture.get), "java.lang.String");
    assert_eq!(shown(&session, fixture.list_get), "java.lang.String");
    assert_eq!(session.type_of_node(at(0, fixture.raw_first)), Type::Unknown);
    assert!(session.resolve_node(at(0, fixture.raw_first)).solved().unwrap().is_field());
}

#[test]
fn test_method_type_variables() {
    let (session, fixture) = setup();
    assert_eq!(shown(&session, fixture.pick_ints), "java.lang.Integer");
    assert_eq!(shown(&session, fixture.pick_nulls), "java.lang.Object");
    assert_eq!(shown(&session, fixture.pick_explicit), "java.lang.Long");
}

#[test]
fn test_creation_and_cast() {
    let (session, fixture) = setup();
    assert_eq!(shown(&session, fixture.creation), "calc.Pair<java.lang.String>");
    assert_eq!(
        session.resolve_node(at(0, fixture.creation)).solved(),
        Some(Declaration::Type(session.db().lookup_qualified("calc.Pair").unwrap()))
    );
    assert_eq!(shown(&session, fixture.cast), "java.lang.Object");
}

#[test]
fn test_declaration_nodes_resolve_to_themselves() {
    let (session, fixture) = setup();
    let field = session.resolve_node(at(0, fixture.pair_field)).solved().unwrap();
    assert!(field.is_field());
    assert_eq!(shown(&session, fixture.pair_field), "calc.Pair<java.lang.String>");

    let param = session.resolve_node(at(0, fixture.names_param)).solved().unwrap();
    assert!(param.is_parameter());
    assert_eq!(shown(&session, fixture.names_param), "java.util.List<java.lang.String>");
}

/// ```text
/// class Limits { static int MAX; int current; }
/// class Reader { void run() { Limits.MAX; Limits.current; Limits.current.value; } }
/// ```
#[test]
fn test_type_name_receiver_sees_static_fields_only() {
    let mut b = UnitBuilder::new(Some("calc"));
    let int = b.primitive(PrimitiveKind::Int);
    let max = b.field(Modifiers::STATIC, "MAX", int, NodeIndex::NONE);
    let int = b.primitive(PrimitiveKind::Int);
    let current = b.field(Modifiers::empty(), "current", int, NodeIndex::NONE);
    let limits = b.type_decl(TypeDeclData::class("Limits").with_members(vec![max, current]));

    let owner = b.name("Limits");
    let max_use = b.field_access(owner, "MAX");
    let owner = b.name("Limits");
    let current_use = b.field_access(owner, "current");
    let owner = b.name("Limits");
    let inner = b.field_access(owner, "current");
    let chained = b.field_access(inner, "value");
    let statements = [max_use, current_use, chained].map(|e| b.expr_stmt(e)).to_vec();
    let body = b.block(statements);
    let run = b.method(MethodData::new("run", NodeIndex::NONE).with_body(body));
    let reader = b.type_decl(TypeDeclData::class("Reader").with_members(vec![run]));
    let session = create_session(vec![b.finish(vec![limits, reader])], metadata());

    let max_decl = session.resolve_node(at(0, max)).solved().unwrap();
    assert!(max_decl.is_field());
    assert_eq!(session.resolve_node(at(0, max_use)).solved(), Some(max_decl));
    assert_eq!(session.type_of_node(at(0, max_use)), Type::Primitive(PrimitiveKind::Int));

    for node in [current_use, chained] {
        assert!(session.resolve_node(at(0, node)).is_unsolved());
        assert_eq!(session.type_of_node(at(0, node)), Type::Unknown);
    }
}
