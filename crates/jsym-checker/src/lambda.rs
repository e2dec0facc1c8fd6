//! Lambda target typing.
//!
//! A lambda has no type of its own; it takes the type its position expects.
//! Supported positions are method arguments, initializers of explicitly
//! typed locals and fields, `return` statements, casts, and the body of an
//! enclosing lambda.

use crate::state::ExprResolver;
use jsym_solver::store::SyntaxDecl;
use jsym_solver::{RecursionResult, Type};
use jsym_syntax::{NodeData, SyntaxKind, SyntaxRef};
use tracing::trace;

impl ExprResolver<'_> {
    /// The functional type `lambda` is expected to implement, if its
    /// position determines one.
    pub fn lambda_target(&mut self, lambda: SyntaxRef) -> Option<Type> {
        match self.lambda_guard.enter(lambda) {
            RecursionResult::Entered => {
                let target = self.compute_lambda_target(lambda);
                self.lambda_guard.leave(lambda);
                trace!(unit = lambda.unit.0, node = lambda.node.0, ?target, "lambda_target");
                target
            }
            denied => {
                trace!(?denied, "lambda_target: guard refused entry");
                None
            }
        }
    }

    fn compute_lambda_target(&mut self, lambda: SyntaxRef) -> Option<Type> {
        let db = self.db;
        let arena = db.unit(lambda.unit)?;
        let parent = lambda.with_node(arena.parent(lambda.node));
        match db.node(parent)? {
            NodeData::MethodCall(call) => {
                let index = call.args.iter().position(|&arg| arg == lambda.node)?;
                let ctx = self.scopes.context_for(db, parent)?;
                let selected = self.select_call(parent, ctx).solved()?;
                let method = db.method(selected.method)?;
                let signature = method.signature();
                let param = selected.parameter_type(&signature.params, index)?;
                Some(
                    selected
                        .substitution
                        .without(&signature.type_params)
                        .apply(param),
                )
            }
            NodeData::LocalVar(local) if local.initializer == lambda.node && local.ty.is_some() => {
                Some(db.resolve_type_node(parent.with_node(local.ty)))
            }
            NodeData::Field(field) if field.initializer == lambda.node => {
                Some(db.resolve_type_node(parent.with_node(field.ty)))
            }
            NodeData::Cast(cast) if cast.expr == lambda.node => Some(db.resolve_type_node(parent.with_node(cast.ty))),
            NodeData::Return { .. } => self.return_target(parent),
            NodeData::Lambda(outer) if outer.body == lambda.node => self.functional_return(parent),
            _ => None,
        }
    }

    /// Expected type of a `return` statement: the enclosing method's return
    /// type, or the functional return type of the enclosing lambda.
    fn return_target(&mut self, ret: SyntaxRef) -> Option<Type> {
        let db = self.db;
        let arena = db.unit(ret.unit)?;
        for ancestor in arena.ancestors(ret.node) {
            match arena.kind(ancestor) {
                Some(SyntaxKind::Method) => {
                    return match db.store().syntax_decl(ret.with_node(ancestor))? {
                        SyntaxDecl::Method(id) => Some(db.method_signature(id).return_type.clone()),
                        _ => None,
                    };
                }
                Some(SyntaxKind::Lambda) => return self.functional_return(ret.with_node(ancestor)),
                _ => {}
            }
        }
        None
    }

    fn functional_return(&mut self, lambda: SyntaxRef) -> Option<Type> {
        let target = self.lambda_target(lambda)?;
        Some(self.db.functional_signature(&target)?.return_type)
    }
}

#[cfg(test)]
#[path = "../tests/lambda_tests.rs"]
mod tests;
