//! Per-query resolver state.
//!
//! An [`ExprResolver`] is created for one top-level `resolve` or `type_of`
//! call and dropped afterwards. It borrows the session's read-only tables
//! and owns the recursion guards for that query, so concurrent queries never
//! share mutable state.
//!
//! The resolver is split across several files, each extending
//! `ExprResolver` with one concern:
//! - `state.rs`: names, receivers and declaration types
//! - `expr.rs`: `resolve` and `type_of` dispatch
//! - `call_checker.rs`: overload selection
//! - `lambda.rs`: lambda target typing

use jsym_binder::{Context, ScopeGraph};
use jsym_solver::{
    Declaration, FieldId, LookupContext, MemberMatch, ParamOwner, RecursionGuard, RecursionProfile,
    RecursionResult, SymbolReference, Type, TypeDatabase, TypeDeclId,
};
use jsym_syntax::{NodeData, SyntaxRef};
use tracing::trace;

/// What a recursion guard entry stands for. Expressions and declarations
/// share node handles (a `LocalVar` node is both), so they are kept apart.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Visit {
    Expr(SyntaxRef),
    Decl(SyntaxRef),
}

/// How a call or field-access receiver was classified.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Receiver {
    /// An expression with a (possibly unknown) type.
    Value(Type),
    /// A type name, as in `Math.max` or `Outer.Inner`.
    Static(TypeDeclId),
    /// A dotted prefix that names neither a value nor a type yet.
    Package(String),
    Unresolved,
}

pub struct ExprResolver<'s> {
    pub(crate) db: &'s TypeDatabase,
    pub(crate) scopes: &'s ScopeGraph,
    pub(crate) guard: RecursionGuard<Visit>,
    pub(crate) lambda_guard: RecursionGuard<SyntaxRef>,
}

impl<'s> ExprResolver<'s> {
    pub fn new(db: &'s TypeDatabase, scopes: &'s ScopeGraph) -> Self {
        Self {
            db,
            scopes,
            guard: RecursionGuard::with_profile(RecursionProfile::ExpressionResolution),
            lambda_guard: RecursionGuard::with_profile(RecursionProfile::LambdaTarget),
        }
    }

    /// Run `f` unless `key` is already being computed or a limit was hit.
    pub(crate) fn guarded<T>(&mut self, key: Visit, fallback: T, f: impl FnOnce(&mut Self) -> T) -> T {
        match self.guard.enter(key) {
            RecursionResult::Entered => {
                let out = f(self);
                self.guard.leave(key);
                out
            }
            denied => {
                trace!(?key, ?denied, "guard refused entry");
                fallback
            }
        }
    }

    /// A field reachable through the type name `owner`: static fields only.
    pub(crate) fn static_field(&self, owner: TypeDeclId, name: &str) -> Option<MemberMatch<FieldId>> {
        self.db
            .find_field(&Type::raw(owner), name)
            .filter(|found| self.db.field(found.member).is_some_and(|f| f.is_static()))
    }

    /// The context a node is evaluated in, falling back to `ctx` for nodes
    /// the scope tables cannot place.
    pub(crate) fn context_of(&self, node: SyntaxRef, ctx: Context) -> Context {
        self.scopes.context_for(self.db, node).unwrap_or(ctx)
    }

    // =========================================================================
    // Names
    // =========================================================================

    /// Variables along the scope chain first, then type names.
    pub fn lookup_name(&self, ctx: Context, name: &str) -> SymbolReference<Declaration> {
        self.scopes.lookup(self.db, ctx, name).or_else_with(|| {
            self.db
                .resolve_type_by_name(name, &self.lookup_context(ctx))
                .map(Declaration::Type)
        })
    }

    pub(crate) fn lookup_context(&self, ctx: Context) -> LookupContext {
        LookupContext {
            unit: ctx.unit,
            enclosing: self.scopes.enclosing_types(ctx),
        }
    }

    /// Classify the receiver of a field access or method call.
    pub(crate) fn classify_receiver(&mut self, receiver: SyntaxRef, ctx: Context) -> Receiver {
        let db = self.db;
        match db.node(receiver) {
            None => Receiver::Unresolved,
            Some(NodeData::Name { name }) => match self.scopes.lookup(db, ctx, name) {
                SymbolReference::Solved(variable) => {
                    Receiver::Value(self.declaration_type(variable, ctx))
                }
                SymbolReference::Ambiguous(_) => Receiver::Unresolved,
                SymbolReference::Unsolved => {
                    match db.resolve_type_by_name(name, &self.lookup_context(ctx)) {
                        SymbolReference::Solved(decl) => Receiver::Static(decl),
                        SymbolReference::Ambiguous(_) => Receiver::Unresolved,
                        SymbolReference::Unsolved => Receiver::Package(name.clone()),
                    }
                }
            },
            Some(NodeData::FieldAccess(access)) => {
                match self.classify_receiver(receiver.with_node(access.receiver), ctx) {
                    Receiver::Value(ty) => match db.find_field(&ty, &access.name) {
                        Some(found) => Receiver::Value(found.substitution.apply(&db.field_type(found.member))),
                        None => Receiver::Unresolved,
                    },
                    Receiver::Static(owner) => {
                        if let Some(found) = self.static_field(owner, &access.name) {
                            Receiver::Value(db.field_type(found.member))
                        } else if let SymbolReference::Solved(member) = db.find_member_type(owner, &access.name) {
                            Receiver::Static(member)
                        } else {
                            Receiver::Unresolved
                        }
                    }
                    Receiver::Package(prefix) => {
                        let qualified = format!("{prefix}.{}", access.name);
                        match db.resolve_qualified_global(&qualified) {
                            Some(decl) => Receiver::Static(decl),
                            None => Receiver::Package(qualified),
                        }
                    }
                    Receiver::Unresolved => Receiver::Unresolved,
                }
            }
            Some(_) => Receiver::Value(self.type_of(receiver, ctx)),
        }
    }

    // =========================================================================
    // Declaration types
    // =========================================================================

    /// Type of a variable declaration as seen from `ctx`.
    ///
    /// Types and methods are not values and have no type here.
    pub fn declaration_type(&mut self, declaration: Declaration, ctx: Context) -> Type {
        let db = self.db;
        match declaration {
            Declaration::Field(id) => self.field_type_in_context(id, ctx),
            Declaration::Parameter(param) => {
                let Some(decl) = db.parameter(param) else {
                    return Type::Unknown;
                };
                if let Some(ty) = decl.declared_type() {
                    return ty;
                }
                let ParamOwner::Lambda(lambda) = param.owner else {
                    return Type::Unknown;
                };
                self.lambda_target(lambda)
                    .and_then(|target| db.functional_signature(&target))
                    .and_then(|signature| signature.params.get(param.index as usize).cloned())
                    .unwrap_or(Type::Unknown)
            }
            Declaration::LocalVar(sref) => {
                let Some(NodeData::LocalVar(local)) = db.node(sref) else {
                    return Type::Unknown;
                };
                if local.ty.is_some() {
                    return db.resolve_type_node(sref.with_node(local.ty));
                }
                if local.initializer.is_none() {
                    return Type::Unknown;
                }
                // `var`: the initializer's type, unless it depends on itself.
                let initializer = sref.with_node(local.initializer);
                self.guarded(Visit::Decl(sref), Type::Unknown, |this| {
                    let init_ctx = this.context_of(initializer, ctx);
                    this.type_of(initializer, init_ctx)
                })
            }
            Declaration::Method(_) | Declaration::Type(_) => Type::Unknown,
        }
    }

    /// A field's type seen through the enclosing types of `ctx`, so that an
    /// inherited `T value` reads as `String value` inside a subclass of
    /// `Box<String>`.
    fn field_type_in_context(&self, field: FieldId, ctx: Context) -> Type {
        let db = self.db;
        let declared = db.field_type(field);
        let Some(owner) = db.field(field).map(|f| f.declaring_type()) else {
            return declared;
        };
        for enclosing in self.scopes.enclosing_types(ctx) {
            let Some(ty) = db.type_decl(enclosing) else {
                continue;
            };
            if let Some(entry) = db
                .supertype_closure(&ty.as_type())
                .into_iter()
                .find(|entry| entry.decl == owner)
            {
                return entry.substitution.apply(&declared);
            }
        }
        declared
    }
}

#[cfg(test)]
#[path = "../tests/state_tests.rs"]
mod tests;
