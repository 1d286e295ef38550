//! Global binding table of a compiler session.

use hashbrown::HashMap;

use crate::{String, types::Type, values::Value};

/// A resolved global: its type and its compile-time value.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub ty: Type,
    pub value: Value,
}

/// Maps identifier names to their bindings.
///
/// Bindings are never modified after insertion. Inserting a name that is
/// already bound (allowed only under `SameScopeShadowing::Allow`) replaces
/// the whole binding.
#[derive(Debug, Clone, Default)]
pub struct Globals {
    bindings: HashMap<String, Binding>,
}

impl Globals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.bindings.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Binding)> {
        self.bindings.iter().map(|(name, binding)| (name.as_str(), binding))
    }

    /// Install a binding. Callers guarantee `value` inhabits `ty`.
    pub(crate) fn insert(&mut self, name: &str, ty: Type, value: Value) {
        debug_assert_eq!(value.ty(), ty, "binding value must inhabit its type");
        self.bindings.insert(String::from(name), Binding { ty, value });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_insert_and_lookup() {
        let mut globals = Globals::new();
        assert!(globals.is_empty());

        globals.insert("x", Type::Bool, Value::Bool(true));
        assert_eq!(
            globals.get("x"),
            Some(&Binding {
                ty: Type::Bool,
                value: Value::Bool(true)
            })
        );
        assert!(globals.contains("x"));
        assert!(!globals.contains("y"));
        assert_eq!(globals.len(), 1);
    }

    #[test]
    fn test_reinsert_replaces_binding() {
        let mut globals = Globals::new();
        globals.insert("x", Type::Number, Value::Number(1.0));
        globals.insert("x", Type::String, Value::from("one"));
        assert_eq!(globals.len(), 1);
        assert_eq!(globals.get("x").map(|b| b.ty), Some(Type::String));
    }
}
