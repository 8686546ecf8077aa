use std::collections::HashMap;
use std::rc::Rc;

use super::types::Type;

/// Stack of lexical scopes mapping names to semantic types. A name may not
/// be bound twice in the same scope; shadowing an outer scope is fine.
pub struct ScopeStack {
    scopes: Vec<HashMap<String, Rc<Type>>>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self {
            scopes: vec![HashMap::new()],
        }
    }

    pub fn enter(&mut self) {
        self.scopes.push(HashMap::new());
    }

    pub fn exit(&mut self) {
        debug_assert!(self.scopes.len() > 1, "cannot exit the global scope");
        self.scopes.pop();
    }

    /// Bind `name` in the innermost scope. Returns false if the name is
    /// already bound there.
    pub fn add(&mut self, name: &str, ty: Rc<Type>) -> bool {
        let scope = self
            .scopes
            .last_mut()
            .unwrap_or_else(|| unreachable!("scope stack is never empty"));
        if scope.contains_key(name) {
            return false;
        }
        scope.insert(name.to_string(), ty);
        true
    }

    /// Innermost-outward lookup.
    pub fn lookup(&self, name: &str) -> Option<Rc<Type>> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name).map(Rc::clone))
    }

    /// Every visible name, for suggestion ranking.
    pub fn visible_names(&self) -> Vec<String> {
        self.scopes
            .iter()
            .flat_map(|scope| scope.keys().cloned())
            .collect()
    }
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}
