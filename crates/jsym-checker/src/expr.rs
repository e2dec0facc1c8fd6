//! Expression resolution and typing.
//!
//! `resolve` answers "which declaration does this node denote", `type_of`
//! answers "what is its static type". Both dispatch on the node kind and
//! recurse into receivers and arguments; declaration nodes resolve to
//! themselves.

use crate::state::{ExprResolver, Receiver, Visit};
use jsym_binder::Context;
use jsym_common::PrimitiveKind;
use jsym_solver::store::SyntaxDecl;
use jsym_solver::{
    Declaration, ParamOwner, ParamRef, Substitution, SymbolReference, Type,
};
use jsym_syntax::{FieldAccessData, LiteralKind, MethodCallData, NodeData, SyntaxRef};
use tracing::trace;

impl ExprResolver<'_> {
    // =========================================================================
    // resolve
    // =========================================================================

    /// The declaration `node` refers to, or the declaration it is.
    pub fn resolve(&mut self, node: SyntaxRef, ctx: Context) -> SymbolReference<Declaration> {
        let db = self.db;
        let Some(data) = db.node(node) else {
            return SymbolReference::Unsolved;
        };
        match data {
            NodeData::Name { name } => self.lookup_name(ctx, name),
            NodeData::FieldAccess(access) => self.resolve_field_access(node, access, ctx),
            NodeData::MethodCall(_) => self
                .select_call(node, ctx)
                .map(|call| Declaration::Method(call.method)),
            NodeData::This => self
                .scopes
                .type_declaration_context(ctx)
                .map(Declaration::Type)
                .into(),
            NodeData::ObjectCreation(creation) => self.resolve_type_reference(node.with_node(creation.ty)),
            NodeData::ClassType(_) => self.resolve_type_reference(node),
            NodeData::TypeDecl(_)
            | NodeData::Field(_)
            | NodeData::EnumConstant(_)
            | NodeData::Method(_) => match db.store().syntax_decl(node) {
                Some(SyntaxDecl::Type(id)) => SymbolReference::Solved(Declaration::Type(id)),
                Some(SyntaxDecl::Field(id)) => SymbolReference::Solved(Declaration::Field(id)),
                Some(SyntaxDecl::Method(id)) => SymbolReference::Solved(Declaration::Method(id)),
                None => SymbolReference::Unsolved,
            },
            NodeData::Parameter(_) => self
                .parameter_ref(node)
                .map(Declaration::Parameter)
                .into(),
            NodeData::LocalVar(_) => SymbolReference::Solved(Declaration::LocalVar(node)),
            _ => SymbolReference::Unsolved,
        }
    }

    fn resolve_field_access(
        &mut self,
        node: SyntaxRef,
        access: &FieldAccessData,
        ctx: Context,
    ) -> SymbolReference<Declaration> {
        let db = self.db;
        match self.classify_receiver(node.with_node(access.receiver), ctx) {
            Receiver::Value(ty) => db
                .find_field(&ty, &access.name)
                .map(|found| Declaration::Field(found.member))
                .into(),
            Receiver::Static(owner) => {
                if let Some(found) = self.static_field(owner, &access.name) {
                    return SymbolReference::Solved(Declaration::Field(found.member));
                }
                db.find_member_type(owner, &access.name).map(Declaration::Type)
            }
            Receiver::Package(prefix) => db
                .resolve_qualified_global(&format!("{prefix}.{}", access.name))
                .map(Declaration::Type)
                .into(),
            Receiver::Unresolved => SymbolReference::Unsolved,
        }
    }

    /// A class-type annotation as a declaration. Type variables are not
    /// declarations.
    fn resolve_type_reference(&self, sref: SyntaxRef) -> SymbolReference<Declaration> {
        let db = self.db;
        let Some(NodeData::ClassType(class)) = db.node(sref) else {
            return SymbolReference::Unsolved;
        };
        if db.find_type_param(sref, &class.name).is_some() {
            return SymbolReference::Unsolved;
        }
        db.resolve_type_by_name(&class.name, &db.lookup_context(sref))
            .map(Declaration::Type)
    }

    /// The handle of a `Parameter` node, through its method or lambda.
    pub(crate) fn parameter_ref(&self, param: SyntaxRef) -> Option<ParamRef> {
        let db = self.db;
        let arena = db.unit(param.unit)?;
        let owner = param.with_node(arena.parent(param.node));
        let (owner, params) = match db.node(owner)? {
            NodeData::Method(method) => match db.store().syntax_decl(owner)? {
                SyntaxDecl::Method(id) => (ParamOwner::Method(id), &method.params),
                _ => return None,
            },
            NodeData::Lambda(lambda) => (ParamOwner::Lambda(owner), &lambda.params),
            _ => return None,
        };
        let index = params.iter().position(|&p| p == param.node)?;
        Some(ParamRef {
            owner,
            index: index as u32,
        })
    }

    // =========================================================================
    // type_of
    // =========================================================================

    /// The static type of `node`; `Unknown` when it cannot be determined.
    pub fn type_of(&mut self, node: SyntaxRef, ctx: Context) -> Type {
        self.guarded(Visit::Expr(node), Type::Unknown, |this| this.compute_type_of(node, ctx))
    }

    fn compute_type_of(&mut self, node: SyntaxRef, ctx: Context) -> Type {
        let db = self.db;
        let Some(data) = db.node(node) else {
            return Type::Unknown;
        };
        let ty = match data {
            NodeData::Literal(literal) => self.literal_type(literal.kind),
            NodeData::Name { name } => match self.lookup_name(ctx, name) {
                SymbolReference::Solved(declaration) => self.declaration_type(declaration, ctx),
                _ => Type::Unknown,
            },
            NodeData::This => self.this_type(ctx),
            NodeData::FieldAccess(access) => self.field_access_type(node, access, ctx),
            NodeData::ArrayAccess(access) => self
                .type_of(node.with_node(access.array), ctx)
                .element_type()
                .cloned()
                .unwrap_or(Type::Unknown),
            NodeData::MethodCall(call) => self.call_type(node, call, ctx),
            NodeData::ObjectCreation(creation) => db.resolve_type_node(node.with_node(creation.ty)),
            NodeData::Cast(cast) => db.resolve_type_node(node.with_node(cast.ty)),
            NodeData::Lambda(_) => self.lambda_target(node).unwrap_or(Type::Unknown),
            NodeData::LocalVar(_) => self.declaration_type(Declaration::LocalVar(node), ctx),
            NodeData::Parameter(_) => match self.parameter_ref(node) {
                Some(param) => self.declaration_type(Declaration::Parameter(param), ctx),
                None => Type::Unknown,
            },
            NodeData::Field(_) | NodeData::EnumConstant(_) => match db.store().syntax_decl(node) {
                Some(SyntaxDecl::Field(id)) => db.field_type(id),
                _ => Type::Unknown,
            },
            NodeData::Method(_) => match db.store().syntax_decl(node) {
                Some(SyntaxDecl::Method(id)) => db.method_signature(id).return_type.clone(),
                _ => Type::Unknown,
            },
            NodeData::TypeDecl(_) => match db.store().syntax_decl(node) {
                Some(SyntaxDecl::Type(id)) => db.type_decl(id).map_or(Type::Unknown, |t| t.as_type()),
                _ => Type::Unknown,
            },
            NodeData::PrimitiveType(_)
            | NodeData::VoidType
            | NodeData::ClassType(_)
            | NodeData::ArrayType { .. }
            | NodeData::WildcardType(_) => db.resolve_type_node(node),
            _ => Type::Unknown,
        };
        trace!(unit = node.unit.0, node = node.node.0, ty = %db.display_type(&ty), "type_of");
        ty
    }

    fn literal_type(&self, kind: LiteralKind) -> Type {
        match kind {
            LiteralKind::Int => Type::Primitive(PrimitiveKind::Int),
            LiteralKind::Long => Type::Primitive(PrimitiveKind::Long),
            LiteralKind::Float => Type::Primitive(PrimitiveKind::Float),
            LiteralKind::Double => Type::Primitive(PrimitiveKind::Double),
            LiteralKind::Char => Type::Primitive(PrimitiveKind::Char),
            LiteralKind::Boolean => Type::Primitive(PrimitiveKind::Boolean),
            LiteralKind::String => self.db.string_type(),
            LiteralKind::Null => Type::Null,
        }
    }

    /// `this` has no type in a static context.
    fn this_type(&self, ctx: Context) -> Type {
        if self.scopes.is_static_context(self.db, ctx) {
            return Type::Unknown;
        }
        self.scopes
            .type_declaration_context(ctx)
            .and_then(|id| self.db.type_decl(id))
            .map_or(Type::Unknown, |decl| decl.as_type())
    }

    fn field_access_type(&mut self, node: SyntaxRef, access: &FieldAccessData, ctx: Context) -> Type {
        let db = self.db;
        match self.classify_receiver(node.with_node(access.receiver), ctx) {
            Receiver::Value(Type::Array(_)) if access.name == "length" => {
                Type::Primitive(PrimitiveKind::Int)
            }
            Receiver::Value(ty) => match db.find_field(&ty, &access.name) {
                Some(found) => found.substitution.apply(&db.field_type(found.member)),
                None => Type::Unknown,
            },
            Receiver::Static(owner) => match self.static_field(owner, &access.name) {
                Some(found) => db.field_type(found.member),
                None => Type::Unknown,
            },
            Receiver::Package(_) | Receiver::Unresolved => Type::Unknown,
        }
    }

    /// Return type of the selected method: receiver type arguments first,
    /// then the method's own type variables bound from the arguments.
    fn call_type(&mut self, node: SyntaxRef, call: &MethodCallData, ctx: Context) -> Type {
        let db = self.db;
        let Some(selected) = self.select_call(node, ctx).solved() else {
            return Type::Unknown;
        };
        let Some(method) = db.method(selected.method) else {
            return Type::Unknown;
        };
        let signature = method.signature();
        let return_type = method.return_type(&selected.substitution);
        if signature.type_params.is_empty() {
            return return_type;
        }

        let mut bindings = Substitution::new();
        if !call.type_args.is_empty() && call.type_args.len() == signature.type_params.len() {
            for (param, &arg) in signature.type_params.iter().zip(&call.type_args) {
                bindings.insert(param.name.clone(), db.resolve_type_node(node.with_node(arg)));
            }
        } else {
            for (index, arg) in selected.arg_types.iter().enumerate() {
                let Some(Type::TypeVariable { name, .. }) = selected.parameter_type(&signature.params, index) else {
                    continue;
                };
                if bindings.get(name).is_some() || !signature.type_params.iter().any(|p| p.name == *name) {
                    continue;
                }
                let bound = match arg {
                    Type::Primitive(kind) => db.boxed(*kind),
                    Type::Unknown | Type::Null | Type::Void => continue,
                    other => other.clone(),
                };
                bindings.insert(name.clone(), bound);
            }
        }
        for param in signature.type_params.iter() {
            if bindings.get(&param.name).is_none() {
                bindings.insert(param.name.clone(), db.erasure(&param.bound));
            }
        }
        bindings.apply(&return_type)
    }
}

#[cfg(test)]
#[path = "../tests/expr_tests.rs"]
mod tests;
