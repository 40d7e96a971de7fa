//! Lexical scope tree and symbol table.

use std::collections::HashMap;

use aspen_syntax::ast::DataType;

/// What a name is bound to. A binding's kind never changes once made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Variable,
    Constant,
    Function,
}

/// A name bound in a scope.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolInfo {
    pub name: String,
    pub kind: SymbolKind,
    pub ty: DataType,
    /// Parameter types, empty unless `kind` is `Function`.
    pub param_types: Vec<DataType>,
}

/// Index of a scope within a [`ScopeTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeId(usize);

#[derive(Debug)]
struct ScopeData {
    parent: Option<ScopeId>,
    symbols: HashMap<String, SymbolInfo>,
}

/// Parent-linked scope arena.
///
/// Scopes are created by the scope-and-type pass and persist for the
/// rest of the compilation; there is exactly one root (global) scope and
/// lookups climb parent links toward it.
#[derive(Debug, Default)]
pub struct ScopeTree {
    scopes: Vec<ScopeData>,
}

impl ScopeTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scope with the given parent (`None` for the root).
    pub fn push_scope(&mut self, parent: Option<ScopeId>) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(ScopeData {
            parent,
            symbols: HashMap::new(),
        });
        id
    }

    /// True if `name` is bound in `scope` itself; parents are not
    /// consulted.
    pub fn declared_here(&self, scope: ScopeId, name: &str) -> bool {
        self.scopes[scope.0].symbols.contains_key(name)
    }

    /// Bind a symbol in `scope`.
    pub fn insert(&mut self, scope: ScopeId, symbol: SymbolInfo) {
        self.scopes[scope.0].symbols.insert(symbol.name.clone(), symbol);
    }

    /// Resolve `name` starting at `scope` and walking parent links; the
    /// nearest enclosing binding wins.
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Option<&SymbolInfo> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let data = &self.scopes[id.0];
            if let Some(symbol) = data.symbols.get(name) {
                return Some(symbol);
            }
            current = data.parent;
        }
        None
    }

    pub fn parent(&self, scope: ScopeId) -> Option<ScopeId> {
        self.scopes[scope.0].parent
    }
}
