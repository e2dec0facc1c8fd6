//! Call resolution against library types described by metadata.

mod common;

use common::{at, library, metadata};
use jsym_checker::{Declaration, MethodId, Session, SymbolReference, create_session};
use jsym_common::PrimitiveKind;
use jsym_solver::{MethodDescriptor, TypeDescriptor, TypeSig};
use jsym_syntax::{MethodCallData, MethodData, Modifiers, NodeArena, NodeData, NodeIndex, TypeDeclData, UnitBuilder};
use std::sync::Arc;

#[derive(Default)]
struct Shelf {
    arena: NodeArena,
    get: NodeIndex,
    add: NodeIndex,
    add_int: NodeIndex,
    size: NodeIndex,
    empty_static: NodeIndex,
    empty_explicit: NodeIndex,
    empty_imported: NodeIndex,
    empty_qualified: NodeIndex,
    literal_length: NodeIndex,
    value_of: NodeIndex,
    chained: NodeIndex,
    inherited: NodeIndex,
}

/// ```text
/// package app;
/// import java.util.ArrayList;
/// import java.util.Collections;
/// import static java.util.Collections.*;
/// class Shelf {
///     ArrayList<String> items;
///     void run() {
///         items.get(0); items.add("x"); items.add(1); items.size();
///         Collections.emptyList(); Collections.<String>emptyList(); emptyList();
///         java.util.Collections.emptyList();
///         "abc".length(); String.valueOf(1); items.get(0).length(); items.toString();
///     }
/// }
/// ```
fn shelf() -> Shelf {
    let mut out = Shelf::default();
    let mut b = UnitBuilder::new(Some("app"));
    b.import("java.util.ArrayList");
    b.import("java.util.Collections");
    b.import_static_on_demand("java.util.Collections");

    let string = b.class_type("String", vec![]);
    let items_ty = b.class_type("ArrayList", vec![string]);
    let items = b.field(Modifiers::empty(), "items", items_ty, NodeIndex::NONE);

    let recv = b.name("items");
    let zero = b.int_lit(0);
    out.get = b.call(recv, "get", vec![zero]);
    let recv = b.name("items");
    let x = b.string_lit("x");
    out.add = b.call(recv, "add", vec![x]);
    let recv = b.name("items");
    let one = b.int_lit(1);
    out.add_int = b.call(recv, "add", vec![one]);
    let recv = b.name("items");
    out.size = b.call(recv, "size", vec![]);

    let recv = b.name("Collections");
    out.empty_static = b.call(recv, "emptyList", vec![]);
    let recv = b.name("Collections");
    let string = b.class_type("String", vec![]);
    out.empty_explicit = b.add(NodeData::MethodCall(MethodCallData {
        receiver: recv,
        name: "emptyList".to_string(),
        args: vec![],
        type_args: vec![string],
    }));
    out.empty_imported = b.call(NodeIndex::NONE, "emptyList", vec![]);
    let java = b.name("java");
    let util = b.field_access(java, "util");
    let collections = b.field_access(util, "Collections");
    out.empty_qualified = b.call(collections, "emptyList", vec![]);

    let abc = b.string_lit("abc");
    out.literal_length = b.call(abc, "length", vec![]);
    let recv = b.name("String");
    let one = b.int_lit(1);
    out.value_of = b.call(recv, "valueOf", vec![one]);
    let recv = b.name("items");
    let zero = b.int_lit(0);
    let first = b.call(recv, "get", vec![zero]);
    out.chained = b.call(first, "length", vec![]);
    let recv = b.name("items");
    out.inherited = b.call(recv, "toString", vec![]);

    let calls = [
        out.get,
        out.add,
        out.add_int,
        out.size,
        out.empty_static,
        out.empty_explicit,
        out.empty_imported,
        out.empty_qualified,
        out.literal_length,
        out.value_of,
        out.chained,
        out.inherited,
    ];
    let statements = calls.into_iter().map(|call| b.expr_stmt(call)).collect();
    let body = b.block(statements);
    let run = b.method(MethodData::new("run", NodeIndex::NONE).with_body(body));
    let class = b.type_decl(TypeDeclData::class("Shelf").with_members(vec![items, run]));
    out.arena = b.finish(vec![class]);
    out
}

fn setup() -> (Session, Shelf) {
    let mut fixture = shelf();
    let arena = std::mem::take(&mut fixture.arena);
    (create_session(vec![arena], metadata()), fixture)
}

fn method(session: &Session, node: NodeIndex) -> MethodId {
    match session.resolve_node(at(0, node)) {
        SymbolReference::Solved(Declaration::Method(method)) => method,
        other => panic!("expected a method, got {other:?}"),
    }
}

/// `Owner.name(param, ...)` with qualified owner names.
fn describe(session: &Session, node: NodeIndex) -> String {
    let db = session.db();
    let method = db.method(method(session, node)).unwrap();
    let owner = db.type_decl(method.declaring_type()).unwrap().qualified_name();
    let params: Vec<String> = method
        .signature()
        .params
        .iter()
        .map(|p| db.display_type(p).to_string())
        .collect();
    format!("{owner}.{}({})", method.name(), params.join(", "))
}

fn shown(session: &Session, node: NodeIndex) -> String {
    let ty = session.type_of_node(at(0, node));
    session.db().display_type(&ty).to_string()
}

#[test]
fn test_most_derived_library_method_wins() {
    let (session, fixture) = setup();
    assert_eq!(describe(&session, fixture.get), "java.util.ArrayList.get(int)");
    assert_eq!(shown(&session, fixture.get), "java.lang.String");
    assert_eq!(describe(&session, fixture.size), "java.util.ArrayList.size()");
    assert_eq!(shown(&session, fixture.size), "int");
}

#[test]
fn test_interface_method_through_type_arguments() {
    let (session, fixture) = setup();
    assert_eq!(describe(&session, fixture.add), "java.util.List.add(E)");
    assert_eq!(shown(&session, fixture.add), "boolean");
    // int does not box to String.
    assert!(session.resolve_node(at(0, fixture.add_int)).is_unsolved());
}

#[test]
fn test_static_generic_method_binding() {
    let (session, fixture) = setup();
    for node in [fixture.empty_static, fixture.empty_imported, fixture.empty_qualified] {
        assert_eq!(describe(&session, node), "java.util.Collections.emptyList()");
        assert_eq!(shown(&session, node), "java.util.List<java.lang.Object>");
    }
    assert_eq!(shown(&session, fixture.empty_explicit), "java.util.List<java.lang.String>");
}

#[test]
fn test_builtin_receivers() {
    let (session, fixture) = setup();
    assert_eq!(describe(&session, fixture.literal_length), "java.lang.String.length()");
    assert_eq!(shown(&session, fixture.literal_length), "int");
    assert_eq!(describe(&session, fixture.value_of), "java.lang.String.valueOf(int)");
    assert_eq!(describe(&session, fixture.chained), "java.lang.String.length()");
    assert_eq!(describe(&session, fixture.inherited), "java.lang.Object.toString()");
    assert_eq!(shown(&session, fixture.inherited), "java.lang.String");
}

/// `static int f(int)` on `a.A`, on `b.B`, and inherited by `a.Sub extends a.A`.
fn static_owners() -> Arc<jsym_checker::InMemoryMetadata> {
    let int = TypeSig::primitive(PrimitiveKind::Int);
    let f = MethodDescriptor::new("f", int.clone()).with_params(vec![int]).as_static();
    Arc::new(
        library()
            .with(TypeDescriptor::class("a.A").with_method(f.clone()))
            .with(TypeDescriptor::class("b.B").with_method(f))
            .with(TypeDescriptor::class("a.Sub").with_superclass(TypeSig::class("a.A"))),
    )
}

/// `import static <owner>.*;` for each owner, then `f(1);` in a method body.
fn static_import_call(owners: &[&str]) -> (NodeArena, NodeIndex) {
    let mut b = UnitBuilder::new(Some("app"));
    for owner in owners {
        b.import_static_on_demand(owner);
    }
    let one = b.int_lit(1);
    let call = b.call(NodeIndex::NONE, "f", vec![one]);
    let statement = b.expr_stmt(call);
    let body = b.block(vec![statement]);
    let run = b.method(MethodData::new("run", NodeIndex::NONE).with_body(body));
    let class = b.type_decl(TypeDeclData::class("User").with_members(vec![run]));
    (b.finish(vec![class]), call)
}

#[test]
fn test_same_static_method_from_unrelated_imports_is_ambiguous() {
    let (unit, call) = static_import_call(&["a.A", "b.B"]);
    let session = create_session(vec![unit], static_owners());
    let SymbolReference::Ambiguous(candidates) = session.resolve_node(at(0, call)) else {
        panic!("expected an ambiguous call");
    };
    assert_eq!(candidates.len(), 2);
    assert_eq!(session.type_of_node(at(0, call)), jsym_checker::Type::Unknown);
}

#[test]
fn test_static_method_reached_through_two_imports_is_one_candidate() {
    let (unit, call) = static_import_call(&["a.A", "a.Sub"]);
    let session = create_session(vec![unit], static_owners());
    assert_eq!(describe(&session, call), "a.A.f(int)");
}
