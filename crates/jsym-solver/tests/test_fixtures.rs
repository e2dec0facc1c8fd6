//! Shared fixtures for the solver unit tests.

use crate::db::{SolverOptions, TypeDatabase};
use crate::metadata::{InMemoryMetadata, MethodDescriptor, TypeDescriptor, TypeParamDescriptor, TypeSig};
use crate::types::TypeDeclId;
use jsym_common::PrimitiveKind;
use jsym_syntax::{MethodData, Modifiers, NodeArena, NodeIndex, TypeDeclData, UnitBuilder};
use std::sync::Arc;

/// A few `java.util` types described as metadata.
pub(crate) fn collections() -> InMemoryMetadata {
    let e = TypeSig::var("E");
    let int = TypeSig::primitive(PrimitiveKind::Int);
    let boolean = TypeSig::primitive(PrimitiveKind::Boolean);
    InMemoryMetadata::new()
        .with(
            TypeDescriptor::interface("java.util.Collection")
                .with_type_param("E", vec![])
                .with_method(MethodDescriptor::new("size", int.clone()).as_abstract())
                .with_method(MethodDescriptor::new("add", boolean.clone()).with_params(vec![e.clone()]).as_abstract()),
        )
        .with(
            TypeDescriptor::interface("java.util.List")
                .with_type_param("E", vec![])
                .with_interface(TypeSig::generic("java.util.Collection", vec![e.clone()]))
                .with_method(MethodDescriptor::new("get", e.clone()).with_params(vec![int.clone()]).as_abstract()),
        )
        .with(
            TypeDescriptor::class("java.util.ArrayList")
                .with_type_param("E", vec![])
                .with_interface(TypeSig::generic("java.util.List", vec![e.clone()]))
                .with_method(MethodDescriptor::new("get", e.clone()).with_params(vec![int.clone()]))
                .with_method(MethodDescriptor::new("size", int)),
        )
        .with(
            TypeDescriptor::interface("java.util.function.Function")
                .with_type_param("T", vec![])
                .with_type_param("R", vec![])
                .with_method(
                    MethodDescriptor::new("apply", TypeSig::var("R"))
                        .with_params(vec![TypeSig::var("T")])
                        .as_abstract(),
                )
                .with_method(
                    MethodDescriptor::new(
                        "andThen",
                        TypeSig::generic("java.util.function.Function", vec![TypeSig::var("T"), TypeSig::var("V")]),
                    )
                    .with_type_params(vec![TypeParamDescriptor::new("V", vec![])])
                    .with_params(vec![TypeSig::generic(
                        "java.util.function.Function",
                        vec![TypeSig::var("R"), TypeSig::var("V")],
                    )])
                    .as_default(),
                ),
        )
        .with(
            TypeDescriptor::interface("java.util.Comparator")
                .with_type_param("T", vec![])
                .with_method(
                    MethodDescriptor::new("compare", TypeSig::primitive(PrimitiveKind::Int))
                        .with_params(vec![TypeSig::var("T"), TypeSig::var("T")])
                        .as_abstract(),
                )
                .with_method(
                    MethodDescriptor::new("equals", boolean)
                        .with_params(vec![TypeSig::class("java.lang.Object")])
                        .as_abstract(),
                ),
        )
}

/// ```text
/// package zoo;
/// class Animal { String name; String speak() }
/// class Dog extends Animal { static int count; }
/// interface Pet {}
/// class Puppy extends Dog implements Pet {}
/// class Box<T> { T value; T get(); <U> U map(U u); static void reset(int... xs); }
/// class NumBox<N extends Number> {}
/// class StringBox extends Box<String> {}
/// ```
pub(crate) fn zoo_unit() -> NodeArena {
    let mut b = UnitBuilder::new(Some("zoo"));

    let string_ty = b.class_type("String", vec![]);
    let name = b.field(Modifiers::empty(), "name", string_ty, NodeIndex::NONE);
    let speak_ret = b.class_type("String", vec![]);
    let speak_body = b.block(vec![]);
    let speak = b.method(MethodData::new("speak", speak_ret).with_body(speak_body));
    let animal = b.type_decl(TypeDeclData::class("Animal").with_members(vec![name, speak]));

    let animal_ref = b.class_type("Animal", vec![]);
    let int_ty = b.primitive(PrimitiveKind::Int);
    let count = b.field(Modifiers::STATIC, "count", int_ty, NodeIndex::NONE);
    let dog = b.type_decl(
        TypeDeclData::class("Dog")
            .with_extends(vec![animal_ref])
            .with_members(vec![count]),
    );

    let pet = b.type_decl(TypeDeclData::interface("Pet"));

    let dog_ref = b.class_type("Dog", vec![]);
    let pet_ref = b.class_type("Pet", vec![]);
    let puppy = b.type_decl(
        TypeDeclData::class("Puppy")
            .with_extends(vec![dog_ref])
            .with_implements(vec![pet_ref]),
    );

    let t = b.type_param("T", vec![]);
    let value_ty = b.class_type("T", vec![]);
    let value = b.field(Modifiers::empty(), "value", value_ty, NodeIndex::NONE);
    let get_ret = b.class_type("T", vec![]);
    let get = b.method(MethodData::new("get", get_ret));
    let u = b.type_param("U", vec![]);
    let u_param_ty = b.class_type("U", vec![]);
    let u_param = b.param("u", u_param_ty);
    let u_ret = b.class_type("U", vec![]);
    let map = b.method(
        MethodData::new("map", u_ret)
            .with_type_params(vec![u])
            .with_params(vec![u_param]),
    );
    let xs_ty = b.primitive(PrimitiveKind::Int);
    let xs = b.varargs_param("xs", xs_ty);
    let reset = b.method(
        MethodData::new("reset", NodeIndex::NONE)
            .with_modifiers(Modifiers::STATIC)
            .with_params(vec![xs]),
    );
    let box_decl = b.type_decl(
        TypeDeclData::class("Box")
            .with_type_params(vec![t])
            .with_members(vec![value, get, map, reset]),
    );

    let number = b.class_type("Number", vec![]);
    let n = b.type_param("N", vec![number]);
    let num_box = b.type_decl(TypeDeclData::class("NumBox").with_type_params(vec![n]));

    let string_arg = b.class_type("String", vec![]);
    let box_of_string = b.class_type("Box", vec![string_arg]);
    let string_box = b.type_decl(TypeDeclData::class("StringBox").with_extends(vec![box_of_string]));

    b.finish(vec![animal, dog, pet, puppy, box_decl, num_box, string_box])
}

/// A database over `units` with [`collections`] as metadata.
pub(crate) fn database(units: Vec<NodeArena>) -> TypeDatabase {
    database_with(collections(), units)
}

pub(crate) fn database_with(metadata: InMemoryMetadata, units: Vec<NodeArena>) -> TypeDatabase {
    let mut db = TypeDatabase::new(SolverOptions::default(), Arc::new(metadata));
    for unit in units {
        db.add_unit(unit);
    }
    db
}

/// Handle of a type that must resolve.
pub(crate) fn id(db: &TypeDatabase, qualified: &str) -> TypeDeclId {
    db.lookup_qualified(qualified)
        .unwrap_or_else(|| panic!("type {qualified} should resolve"))
}
