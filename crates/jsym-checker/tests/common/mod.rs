//! Fixtures shared by the checker's unit and integration tests.
#![allow(dead_code)]

use jsym_common::PrimitiveKind;
use jsym_solver::{InMemoryMetadata, MethodDescriptor, TypeDescriptor, TypeParamDescriptor, TypeSig};
use jsym_syntax::{NodeIndex, SyntaxRef, UnitId};
use std::sync::Arc;

/// `java.util` collections and functional interfaces described as metadata.
pub fn library() -> InMemoryMetadata {
    let e = TypeSig::var("E");
    let t = TypeSig::var("T");
    let int = TypeSig::primitive(PrimitiveKind::Int);
    let boolean = TypeSig::primitive(PrimitiveKind::Boolean);
    InMemoryMetadata::new()
        .with(
            TypeDescriptor::interface("java.util.List")
                .with_type_param("E", vec![])
                .with_method(MethodDescriptor::new("get", e.clone()).with_params(vec![int.clone()]).as_abstract())
                .with_method(MethodDescriptor::new("size", int.clone()).as_abstract())
                .with_method(MethodDescriptor::new("add", boolean.clone()).with_params(vec![e.clone()]).as_abstract())
                .with_method(
                    MethodDescriptor::new("forEach", TypeSig::Void)
                        .with_params(vec![TypeSig::generic(
                            "java.util.function.Consumer",
                            vec![TypeSig::wildcard(jsym_syntax::Variance::Super, e.clone())],
                        )])
                        .as_default(),
                ),
        )
        .with(
            TypeDescriptor::class("java.util.ArrayList")
                .with_type_param("E", vec![])
                .with_interface(TypeSig::generic("java.util.List", vec![e.clone()]))
                .with_method(MethodDescriptor::new("get", e.clone()).with_params(vec![int.clone()]))
                .with_method(MethodDescriptor::new("size", int.clone())),
        )
        .with(
            TypeDescriptor::interface("java.util.function.Function")
                .with_type_param("T", vec![])
                .with_type_param("R", vec![])
                .with_method(
                    MethodDescriptor::new("apply", TypeSig::var("R"))
                        .with_params(vec![t.clone()])
                        .as_abstract(),
                ),
        )
        .with(
            TypeDescriptor::interface("java.util.function.Consumer")
                .with_type_param("T", vec![])
                .with_method(
                    MethodDescriptor::new("accept", TypeSig::Void)
                        .with_params(vec![t.clone()])
                        .as_abstract(),
                ),
        )
        .with(
            TypeDescriptor::interface("java.util.function.Supplier")
                .with_type_param("T", vec![])
                .with_method(MethodDescriptor::new("get", t.clone()).as_abstract()),
        )
        .with(
            TypeDescriptor::interface("java.util.Comparator")
                .with_type_param("T", vec![])
                .with_method(
                    MethodDescriptor::new("compare", int.clone())
                        .with_params(vec![t.clone(), t.clone()])
                        .as_abstract(),
                )
                .with_method(
                    MethodDescriptor::new("equals", boolean)
                        .with_params(vec![TypeSig::class("java.lang.Object")])
                        .as_abstract(),
                ),
        )
        .with(
            TypeDescriptor::class("java.util.Collections")
                .with_method(
                    MethodDescriptor::new("emptyList", TypeSig::generic("java.util.List", vec![t.clone()]))
                        .with_type_params(vec![TypeParamDescriptor::new("T", vec![])])
                        .as_static(),
                )
                .with_method(
                    MethodDescriptor::new("max", int.clone())
                        .with_params(vec![int.clone(), int.clone()])
                        .as_static(),
                )
                .with_method(
                    MethodDescriptor::new("max", TypeSig::primitive(PrimitiveKind::Long))
                        .with_params(vec![
                            TypeSig::primitive(PrimitiveKind::Long),
                            TypeSig::primitive(PrimitiveKind::Long),
                        ])
                        .as_static(),
                ),
        )
}

pub fn metadata() -> Arc<InMemoryMetadata> {
    Arc::new(library())
}

/// Node `node` of the `unit`-th unit added to a session.
pub fn at(unit: u32, node: NodeIndex) -> SyntaxRef {
    SyntaxRef::new(UnitId(unit), node)
}
