use std::collections::HashMap;

use crate::error::{Error, Result};

use super::SymbolInfo;

#[derive(Clone, Debug, PartialEq)]
pub struct Symbol {
    pub ty: SymbolInfo,
    pub is_const: bool,
}

pub type ScopeId = usize;

#[derive(Clone, Debug)]
struct Scope {
    symbols: HashMap<String, Symbol>,
    parent: Option<ScopeId>,
}

impl Scope {
    fn new(parent: Option<ScopeId>) -> Self {
        Self {
            symbols: HashMap::new(),
            parent,
        }
    }
}

/// Lexical scopes kept in an arena. Scopes are pushed and popped in stack
/// order, so the live scopes are always a prefix of the arena.
#[derive(Clone, Debug)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
    current: ScopeId,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::new(None)],
            current: 0,
        }
    }

    pub fn push_scope(&mut self) -> ScopeId {
        self.scopes.push(Scope::new(Some(self.current)));
        self.current = self.scopes.len() - 1;
        tracing::debug!(depth = self.depth(), "entered scope");
        self.current
    }

    /// Discards the innermost scope. The global scope is never popped.
    pub fn pop_scope(&mut self) {
        let Some(parent) = self.scopes[self.current].parent else {
            tracing::warn!("attempted to pop the global scope");
            return;
        };
        self.scopes.truncate(self.current);
        self.current = parent;
        tracing::debug!(depth = self.depth(), "left scope");
    }

    pub fn depth(&self) -> usize {
        let mut depth = 1;
        let mut scope = &self.scopes[self.current];
        while let Some(parent) = scope.parent {
            depth += 1;
            scope = &self.scopes[parent];
        }
        depth
    }

    /// Only the current scope is checked for collisions, outer bindings may be shadowed.
    pub fn declare(&mut self, name: &str, ty: SymbolInfo, is_const: bool) -> Result<()> {
        let scope = &mut self.scopes[self.current];
        if scope.symbols.contains_key(name) {
            return Err(Error::DuplicateDeclaration {
                name: name.to_string(),
            });
        }
        scope
            .symbols
            .insert(name.to_string(), Symbol { ty, is_const });
        Ok(())
    }

    pub fn resolve(&self, name: &str) -> Result<&Symbol> {
        let mut id = Some(self.current);
        while let Some(scope_id) = id {
            let scope = &self.scopes[scope_id];
            if let Some(symbol) = scope.symbols.get(name) {
                return Ok(symbol);
            }
            id = scope.parent;
        }
        Err(Error::UndeclaredVariable {
            name: name.to_string(),
        })
    }

    pub fn is_declared_in_current_scope(&self, name: &str) -> bool {
        self.scopes[self.current].symbols.contains_key(name)
    }
}
