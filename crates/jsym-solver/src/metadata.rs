//! Metadata-backed type definitions.
//!
//! Types that are not parsed from source (library classes, pre-compiled
//! dependencies) reach the solver as [`TypeDescriptor`] snapshots through a
//! [`MetadataProvider`]. Descriptors are plain serde data so an external
//! class-file scanner can hand over a JSON snapshot.
//!
//! Nested types use `.` in their qualified names (`java.util.Map.Entry`).

use jsym_common::PrimitiveKind;
use jsym_syntax::{TypeDeclKind, Variance};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, OnceLock};

// =============================================================================
// Signatures
// =============================================================================

/// A type as written in a metadata signature.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeSig {
    Primitive {
        name: PrimitiveKind,
    },
    Void,
    Class {
        name: String,
        #[serde(default)]
        args: Vec<TypeSig>,
    },
    Array {
        element: Box<TypeSig>,
    },
    TypeVar {
        name: String,
    },
    Wildcard {
        #[serde(default = "default_variance")]
        variance: Variance,
        #[serde(default)]
        bound: Option<Box<TypeSig>>,
    },
}

fn default_variance() -> Variance {
    Variance::Extends
}

impl TypeSig {
    pub fn class(name: &str) -> Self {
        Self::Class {
            name: name.to_string(),
            args: Vec::new(),
        }
    }

    pub fn generic(name: &str, args: Vec<TypeSig>) -> Self {
        Self::Class {
            name: name.to_string(),
            args,
        }
    }

    pub fn var(name: &str) -> Self {
        Self::TypeVar {
            name: name.to_string(),
        }
    }

    pub fn primitive(name: PrimitiveKind) -> Self {
        Self::Primitive { name }
    }

    pub fn array(element: TypeSig) -> Self {
        Self::Array {
            element: Box::new(element),
        }
    }

    pub fn wildcard(variance: Variance, bound: TypeSig) -> Self {
        Self::Wildcard {
            variance,
            bound: Some(Box::new(bound)),
        }
    }

    pub fn unbounded() -> Self {
        Self::Wildcard {
            variance: Variance::Extends,
            bound: None,
        }
    }
}

// =============================================================================
// Descriptors
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeParamDescriptor {
    pub name: String,
    #[serde(default)]
    pub bounds: Vec<TypeSig>,
}

impl TypeParamDescriptor {
    pub fn new(name: &str, bounds: Vec<TypeSig>) -> Self {
        Self {
            name: name.to_string(),
            bounds,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub ty: TypeSig,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub is_enum_constant: bool,
}

impl FieldDescriptor {
    pub fn new(name: &str, ty: TypeSig) -> Self {
        Self {
            name: name.to_string(),
            ty,
            is_static: false,
            is_enum_constant: false,
        }
    }

    /// Constant `name` of the enum `enum_name`.
    pub fn enum_constant(name: &str, enum_name: &str) -> Self {
        Self {
            name: name.to_string(),
            ty: TypeSig::class(enum_name),
            is_static: true,
            is_enum_constant: true,
        }
    }

    pub fn as_static(mut self) -> Self {
        self.is_static = true;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamDescriptor {
    /// Parameter names are often stripped from compiled metadata.
    #[serde(default)]
    pub name: Option<String>,
    pub ty: TypeSig,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDescriptor {
    pub name: String,
    #[serde(default)]
    pub type_params: Vec<TypeParamDescriptor>,
    #[serde(default)]
    pub params: Vec<ParamDescriptor>,
    pub return_type: TypeSig,
    #[serde(default)]
    pub is_abstract: bool,
    #[serde(default)]
    pub is_static: bool,
    /// The last parameter is `T...`; its signature is the array type.
    #[serde(default)]
    pub is_varargs: bool,
    #[serde(default)]
    pub is_default: bool,
}

impl MethodDescriptor {
    pub fn new(name: &str, return_type: TypeSig) -> Self {
        Self {
            name: name.to_string(),
            type_params: Vec::new(),
            params: Vec::new(),
            return_type,
            is_abstract: false,
            is_static: false,
            is_varargs: false,
            is_default: false,
        }
    }

    pub fn with_params(mut self, params: Vec<TypeSig>) -> Self {
        self.params = params
            .into_iter()
            .map(|ty| ParamDescriptor { name: None, ty })
            .collect();
        self
    }

    pub fn with_type_params(mut self, type_params: Vec<TypeParamDescriptor>) -> Self {
        self.type_params = type_params;
        self
    }

    pub fn as_abstract(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    pub fn as_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }

    pub fn as_varargs(mut self) -> Self {
        self.is_varargs = true;
        self
    }
}

/// Snapshot of one metadata-backed type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    /// Qualified name.
    pub name: String,
    pub kind: TypeDeclKind,
    #[serde(default)]
    pub type_params: Vec<TypeParamDescriptor>,
    /// `None` means the root type (or the enum base type for enums).
    #[serde(default)]
    pub superclass: Option<TypeSig>,
    #[serde(default)]
    pub interfaces: Vec<TypeSig>,
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
    #[serde(default)]
    pub methods: Vec<MethodDescriptor>,
    /// Simple names of member types; each is available under
    /// `<name>.<simple>`.
    #[serde(default)]
    pub nested_types: Vec<String>,
}

impl TypeDescriptor {
    pub fn new(name: &str, kind: TypeDeclKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            type_params: Vec::new(),
            superclass: None,
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            nested_types: Vec::new(),
        }
    }

    pub fn class(name: &str) -> Self {
        Self::new(name, TypeDeclKind::Class)
    }

    pub fn interface(name: &str) -> Self {
        Self::new(name, TypeDeclKind::Interface)
    }

    pub fn enumeration(name: &str) -> Self {
        Self::new(name, TypeDeclKind::Enum)
    }

    pub fn with_type_param(mut self, name: &str, bounds: Vec<TypeSig>) -> Self {
        self.type_params.push(TypeParamDescriptor::new(name, bounds));
        self
    }

    pub fn with_superclass(mut self, superclass: TypeSig) -> Self {
        self.superclass = Some(superclass);
        self
    }

    pub fn with_interface(mut self, interface: TypeSig) -> Self {
        self.interfaces.push(interface);
        self
    }

    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_method(mut self, method: MethodDescriptor) -> Self {
        self.methods.push(method);
        self
    }

    pub fn with_nested_type(mut self, simple_name: &str) -> Self {
        self.nested_types.push(simple_name.to_string());
        self
    }
}

// =============================================================================
// Providers
// =============================================================================

/// Source of metadata-backed types.
///
/// Implementations are queried lazily, possibly from several threads at once,
/// and must answer the same name with the same descriptor for the lifetime of
/// a session.
pub trait MetadataProvider: Send + Sync {
    fn lookup_by_qualified_name(&self, name: &str) -> Option<Arc<TypeDescriptor>>;
}

/// A provider backed by a map of descriptors.
#[derive(Clone, Debug, Default)]
pub struct InMemoryMetadata {
    types: FxHashMap<String, Arc<TypeDescriptor>>,
}

impl InMemoryMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON array of descriptors.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let descriptors: Vec<TypeDescriptor> = serde_json::from_str(json)?;
        let mut out = Self::new();
        for descriptor in descriptors {
            out.insert(descriptor);
        }
        Ok(out)
    }

    /// Add a descriptor, replacing any previous one with the same name.
    pub fn insert(&mut self, descriptor: TypeDescriptor) {
        self.types
            .insert(descriptor.name.clone(), Arc::new(descriptor));
    }

    pub fn with(mut self, descriptor: TypeDescriptor) -> Self {
        self.insert(descriptor);
        self
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl MetadataProvider for InMemoryMetadata {
    fn lookup_by_qualified_name(&self, name: &str) -> Option<Arc<TypeDescriptor>> {
        self.types.get(name).cloned()
    }
}

// =============================================================================
// Bootstrap descriptors
// =============================================================================

const OBJECT: &str = "java.lang.Object";
const STRING: &str = "java.lang.String";
const NUMBER: &str = "java.lang.Number";

/// Descriptors used when the provider does not know a core type.
pub fn builtin_descriptor(name: &str) -> Option<Arc<TypeDescriptor>> {
    static BUILTINS: OnceLock<FxHashMap<String, Arc<TypeDescriptor>>> = OnceLock::new();
    BUILTINS
        .get_or_init(|| {
            builtin_descriptors()
                .into_iter()
                .map(|descriptor| (descriptor.name.clone(), Arc::new(descriptor)))
                .collect()
        })
        .get(name)
        .cloned()
}

fn builtin_descriptors() -> Vec<TypeDescriptor> {
    use PrimitiveKind as P;

    let object = TypeSig::class(OBJECT);
    let string = TypeSig::class(STRING);
    let int = TypeSig::primitive(P::Int);
    let boolean = TypeSig::primitive(P::Boolean);

    let mut out = vec![
        TypeDescriptor::class(OBJECT)
            .with_method(MethodDescriptor::new("equals", boolean.clone()).with_params(vec![object.clone()]))
            .with_method(MethodDescriptor::new("hashCode", int.clone()))
            .with_method(MethodDescriptor::new("toString", string.clone()))
            .with_method(MethodDescriptor::new("wait", TypeSig::Void))
            .with_method(MethodDescriptor::new("notify", TypeSig::Void))
            .with_method(MethodDescriptor::new("notifyAll", TypeSig::Void)),
        TypeDescriptor::class(STRING)
            .with_method(MethodDescriptor::new("length", int.clone()))
            .with_method(MethodDescriptor::new("isEmpty", boolean.clone()))
            .with_method(MethodDescriptor::new("charAt", TypeSig::primitive(P::Char)).with_params(vec![int.clone()]))
            .with_method(MethodDescriptor::new("substring", string.clone()).with_params(vec![int.clone()]))
            .with_method(
                MethodDescriptor::new("substring", string.clone()).with_params(vec![int.clone(), int.clone()]),
            )
            .with_method(MethodDescriptor::new("concat", string.clone()).with_params(vec![string.clone()]))
            .with_method(
                MethodDescriptor::new("valueOf", string.clone())
                    .with_params(vec![int.clone()])
                    .as_static(),
            )
            .with_method(
                MethodDescriptor::new("valueOf", string.clone())
                    .with_params(vec![object.clone()])
                    .as_static(),
            ),
        TypeDescriptor::class("java.lang.Enum")
            .with_type_param("E", vec![TypeSig::generic("java.lang.Enum", vec![TypeSig::var("E")])])
            .with_method(MethodDescriptor::new("name", string.clone()))
            .with_method(MethodDescriptor::new("ordinal", int.clone()))
            .with_method(MethodDescriptor::new("compareTo", int.clone()).with_params(vec![TypeSig::var("E")])),
        TypeDescriptor::class(NUMBER)
            .with_method(MethodDescriptor::new("intValue", int.clone()).as_abstract())
            .with_method(MethodDescriptor::new("longValue", TypeSig::primitive(P::Long)).as_abstract())
            .with_method(MethodDescriptor::new("doubleValue", TypeSig::primitive(P::Double)).as_abstract()),
    ];

    for kind in P::ALL {
        let superclass = if kind.is_numeric() && kind != P::Char {
            TypeSig::class(NUMBER)
        } else {
            object.clone()
        };
        let boxed = kind.boxed_name();
        out.push(
            TypeDescriptor::class(boxed)
                .with_superclass(superclass)
                .with_method(
                    MethodDescriptor::new("valueOf", TypeSig::class(boxed))
                        .with_params(vec![TypeSig::primitive(kind)])
                        .as_static(),
                )
                .with_method(MethodDescriptor::new(&format!("{}Value", kind.name()), TypeSig::primitive(kind))),
        );
    }
    out
}

#[cfg(test)]
#[path = "../tests/metadata_tests.rs"]
mod tests;
