//! Name lookup along a scope chain.
//!
//! Frames are searched innermost first; the first frame that knows the name
//! wins. Locals and parameters therefore shadow fields, and fields of a
//! nested type shadow those of its enclosing types.

use crate::scope::{Context, Scope, ScopeId, ScopeKind};
use crate::state::{UnitScopes, bind_unit};
use jsym_common::limits::MAX_SCOPE_WALK_ITERATIONS;
use jsym_common::names::{qualifier, simple_name};
use jsym_solver::{Declaration, SymbolReference, TypeDatabase, TypeDeclId};
use jsym_syntax::{SyntaxRef, UnitId};
use smallvec::SmallVec;
use tracing::{trace, warn};

/// Scope tables of every unit of a session, indexed by [`UnitId`].
#[derive(Clone, Debug, Default)]
pub struct ScopeGraph {
    units: Vec<UnitScopes>,
}

impl ScopeGraph {
    /// Bind every unit registered in `db`.
    pub fn build(db: &TypeDatabase) -> Self {
        let units = db.units().map(|(unit, _)| bind_unit(db, unit)).collect();
        ScopeGraph { units }
    }

    pub fn unit(&self, unit: UnitId) -> Option<&UnitScopes> {
        self.units.get(unit.0 as usize)
    }

    pub fn scope(&self, ctx: Context) -> Option<&Scope> {
        self.unit(ctx.unit)?.get(ctx.scope)
    }

    /// The context in effect at a node.
    pub fn context_for(&self, db: &TypeDatabase, sref: SyntaxRef) -> Option<Context> {
        let arena = db.unit(sref.unit)?;
        let scope = self.unit(sref.unit)?.find_enclosing_scope(arena, sref.node)?;
        Some(Context::new(sref.unit, scope))
    }

    /// Frames from `ctx` outward, bounded.
    fn frames(&self, ctx: Context) -> impl Iterator<Item = &Scope> + '_ {
        let scopes = self.unit(ctx.unit);
        let mut current = ctx.scope;
        let mut steps = 0u32;
        std::iter::from_fn(move || {
            let scope = scopes?.get(current)?;
            steps += 1;
            if steps > MAX_SCOPE_WALK_ITERATIONS {
                warn!(unit = ctx.unit.0, "scope chain exceeded its walk budget");
                return None;
            }
            current = scope.parent;
            Some(scope)
        })
    }

    /// The variable (local, parameter or field) visible as `name` at `ctx`.
    pub fn lookup(&self, db: &TypeDatabase, ctx: Context, name: &str) -> SymbolReference<Declaration> {
        for frame in self.frames(ctx) {
            if let Some(declaration) = frame.get(name) {
                trace!(name, kind = ?frame.kind, "lookup: frame hit");
                return SymbolReference::Solved(declaration);
            }
            match frame.kind {
                ScopeKind::Type => {
                    if let Some(id) = frame.type_decl
                        && let Some(ty) = db.type_decl(id)
                        && let Some(found) = db.find_field(&ty.as_type(), name)
                    {
                        trace!(name, type_id = id.0, depth = found.depth, "lookup: field");
                        return SymbolReference::Solved(Declaration::Field(found.member));
                    }
                }
                ScopeKind::CompilationUnit => {
                    let imported = self.lookup_static_import(db, ctx.unit, name);
                    if !imported.is_unsolved() {
                        return imported;
                    }
                }
                _ => {}
            }
        }
        trace!(name, "lookup: unsolved");
        SymbolReference::Unsolved
    }

    /// Static fields brought in by `import static`. A single import beats
    /// on-demand imports; two distinct on-demand hits are ambiguous.
    fn lookup_static_import(&self, db: &TypeDatabase, unit: UnitId, name: &str) -> SymbolReference<Declaration> {
        let Some(arena) = db.unit(unit) else {
            return SymbolReference::Unsolved;
        };
        for import in arena.imports().filter(|i| i.is_static && !i.on_demand) {
            if simple_name(&import.name) != name {
                continue;
            }
            if let Some(owner) = qualifier(&import.name).and_then(|q| db.resolve_qualified_global(q))
                && let Some(field) = static_field(db, owner, name)
            {
                return SymbolReference::Solved(field);
            }
        }
        let mut found: SmallVec<[Declaration; 2]> = SmallVec::new();
        for import in arena.imports().filter(|i| i.is_static && i.on_demand) {
            if let Some(owner) = db.resolve_qualified_global(&import.name)
                && let Some(field) = static_field(db, owner, name)
                && !found.contains(&field)
            {
                found.push(field);
            }
        }
        match found.len() {
            0 => SymbolReference::Unsolved,
            1 => SymbolReference::Solved(found[0]),
            _ => SymbolReference::Ambiguous(found),
        }
    }

    /// Types that may own a method called without a receiver at `ctx`:
    /// the enclosing types, inner to outer.
    pub fn enclosing_types(&self, ctx: Context) -> SmallVec<[TypeDeclId; 4]> {
        self.frames(ctx)
            .filter(|frame| frame.kind == ScopeKind::Type)
            .filter_map(|frame| frame.type_decl)
            .collect()
    }

    /// Types named by static imports that can supply a member `name`:
    /// single imports of that member first, then on-demand imports.
    pub fn static_import_owners(&self, db: &TypeDatabase, unit: UnitId, name: &str) -> SmallVec<[TypeDeclId; 2]> {
        let mut owners = SmallVec::new();
        let Some(arena) = db.unit(unit) else {
            return owners;
        };
        for import in arena.imports().filter(|i| i.is_static) {
            let owner = if import.on_demand {
                db.resolve_qualified_global(&import.name)
            } else if simple_name(&import.name) == name {
                qualifier(&import.name).and_then(|q| db.resolve_qualified_global(q))
            } else {
                None
            };
            if let Some(owner) = owner
                && !owners.contains(&owner)
            {
                owners.push(owner);
            }
        }
        owners
    }

    /// Nearest enclosing type of `ctx`; seeds `this` and implicit receivers.
    pub fn type_declaration_context(&self, ctx: Context) -> Option<TypeDeclId> {
        self.enclosing_types(ctx).first().copied()
    }

    /// `true` if `ctx` lies in a static method or a static initializer.
    pub fn is_static_context(&self, db: &TypeDatabase, ctx: Context) -> bool {
        let Some(arena) = db.unit(ctx.unit) else {
            return false;
        };
        for frame in self.frames(ctx) {
            match frame.kind {
                ScopeKind::Method => {
                    return matches!(
                        arena.get_method(frame.node),
                        Some(method) if method.modifiers.contains(jsym_syntax::Modifiers::STATIC)
                    );
                }
                ScopeKind::Initializer => {
                    return matches!(
                        arena.data(frame.node),
                        Some(jsym_syntax::NodeData::Initializer(init)) if init.is_static
                    );
                }
                ScopeKind::Type => return false,
                _ => {}
            }
        }
        false
    }

    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    /// Frame count across all units.
    pub fn scope_count(&self) -> usize {
        self.units.iter().map(UnitScopes::len).sum()
    }

    pub fn root_context(&self, unit: UnitId) -> Option<Context> {
        let scopes = self.unit(unit)?;
        (!scopes.is_empty()).then_some(Context::new(unit, ScopeId(0)))
    }
}

fn static_field(db: &TypeDatabase, owner: TypeDeclId, name: &str) -> Option<Declaration> {
    let ty = db.type_decl(owner)?;
    let found = db.find_field(&ty.raw_type(), name)?;
    let field = db.field(found.member)?;
    field.is_static().then_some(Declaration::Field(found.member))
}

#[cfg(test)]
#[path = "../tests/lookup_tests.rs"]
mod tests;
