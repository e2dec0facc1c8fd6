//! Human-readable rendering of types, for logs and diagnostics.

use crate::db::TypeDatabase;
use crate::types::Type;
use jsym_syntax::Variance;
use std::fmt;

/// `Display` adapter returned by [`TypeDatabase::display_type`].
pub struct TypeDisplay<'a> {
    db: &'a TypeDatabase,
    ty: &'a Type,
}

impl TypeDatabase {
    /// Render `ty` with qualified names, e.g. `java.util.List<java.lang.String>`.
    pub fn display_type<'a>(&'a self, ty: &'a Type) -> TypeDisplay<'a> {
        TypeDisplay { db: self, ty }
    }
}

impl fmt::Display for TypeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_type(self.db, self.ty, f)
    }
}

fn write_type(db: &TypeDatabase, ty: &Type, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match ty {
        Type::Primitive(kind) => write!(f, "{kind}"),
        Type::Reference { decl, args } => {
            match db.type_decl(*decl) {
                Some(decl) => f.write_str(&decl.qualified_name())?,
                None => write!(f, "<type#{}>", decl.0)?,
            }
            if !args.is_empty() {
                f.write_str("<")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write_type(db, arg, f)?;
                }
                f.write_str(">")?;
            }
            Ok(())
        }
        Type::Array(element) => {
            write_type(db, element, f)?;
            f.write_str("[]")
        }
        Type::TypeVariable { name, .. } => f.write_str(name),
        Type::Wildcard { bound: None, .. } => f.write_str("?"),
        Type::Wildcard {
            bound: Some(bound),
            variance,
        } => {
            f.write_str(match variance {
                Variance::Extends => "? extends ",
                Variance::Super => "? super ",
            })?;
            write_type(db, bound, f)
        }
        Type::Void => f.write_str("void"),
        Type::Null => f.write_str("null"),
        Type::Unknown => f.write_str("<unknown>"),
    }
}
