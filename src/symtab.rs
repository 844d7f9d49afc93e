use crate::ast::Type;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SymbolError {
    #[error("symbol '{0}' already declared in this scope")]
    Duplicate(String),
    #[error("symbol '{0}' not declared")]
    Undeclared(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Variable,
    Function,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Int(i64),
    Bool(bool),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SymbolInfo {
    pub kind: SymbolKind,
    pub symbol_type: Type,
    pub value: Option<Value>,
    pub is_constant: bool,
    /// Function entries only.
    pub return_type: Option<Type>,
    pub parameters: Vec<Type>,
}

/// Scope-stack name registry. The bottom frame is the global scope and is
/// seeded at construction; `exit_scope` never removes it, so the stack is
/// never empty.
///
/// The table is a standalone service: no pipeline stage calls it. It is the
/// hook for a future semantic-checking pass between parsing and lowering.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    scopes: Vec<HashMap<String, SymbolInfo>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable {
            scopes: vec![HashMap::new()],
        }
    }

    /// Current nesting depth; 1 means only the global scope is open.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn enter_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    /// Pops the innermost scope. Popping the global scope is a no-op.
    pub fn exit_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Binds a variable in the innermost scope. Redeclaring a name already
    /// bound in that scope fails; shadowing an outer scope is fine.
    pub fn add_symbol(
        &mut self,
        name: &str,
        symbol_type: Type,
        value: Option<Value>,
        is_constant: bool,
    ) -> Result<(), SymbolError> {
        let scope = self.scopes.last_mut().unwrap();
        if scope.contains_key(name) {
            return Err(SymbolError::Duplicate(name.to_string()));
        }
        scope.insert(
            name.to_string(),
            SymbolInfo {
                kind: SymbolKind::Variable,
                symbol_type,
                value,
                is_constant,
                return_type: None,
                parameters: Vec::new(),
            },
        );
        Ok(())
    }

    /// Binds a function in the innermost scope, same duplicate rule as
    /// `add_symbol`.
    pub fn register_function(
        &mut self,
        name: &str,
        return_type: Type,
        parameters: Vec<Type>,
    ) -> Result<(), SymbolError> {
        let scope = self.scopes.last_mut().unwrap();
        if scope.contains_key(name) {
            return Err(SymbolError::Duplicate(name.to_string()));
        }
        scope.insert(
            name.to_string(),
            SymbolInfo {
                kind: SymbolKind::Function,
                symbol_type: return_type,
                value: None,
                is_constant: false,
                return_type: Some(return_type),
                parameters,
            },
        );
        Ok(())
    }

    /// Resolves a name, innermost scope first.
    pub fn lookup(&self, name: &str) -> Result<&SymbolInfo, SymbolError> {
        for scope in self.scopes.iter().rev() {
            if let Some(info) = scope.get(name) {
                return Ok(info);
            }
        }
        Err(SymbolError::Undeclared(name.to_string()))
    }

    /// Overwrites the value slot of the innermost binding of `name`.
    pub fn update_symbol(&mut self, name: &str, value: Value) -> Result<(), SymbolError> {
        for scope in self.scopes.iter_mut().rev() {
            if let Some(info) = scope.get_mut(name) {
                info.value = Some(value);
                return Ok(());
            }
        }
        Err(SymbolError::Undeclared(name.to_string()))
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}
