use crate::value::Value;
use std::collections::BTreeMap;
use tracing::trace;

/// The scope stack. The global scope at the bottom is never popped.
#[derive(Debug)]
pub struct Environment {
    values: Vec<BTreeMap<String, Value>>,
}

impl Default for Environment {
    fn default() -> Self {
        Environment::new()
    }
}

impl Environment {
    pub fn new() -> Environment {
        Environment {
            values: vec![BTreeMap::new()],
        }
    }
    pub fn push_scope(&mut self) {
        self.values.push(BTreeMap::new());
        trace!(depth = self.values.len(), "push scope");
    }
    pub fn pop_scope(&mut self) {
        if self.values.len() > 1 {
            self.values.pop();
        }
        trace!(depth = self.values.len(), "pop scope");
    }
    #[cfg(test)]
    pub fn depth(&self) -> usize {
        self.values.len()
    }
    /// Creates or updates `name` in the innermost scope only, so assigning to
    /// an outer name from a nested scope shadows it.
    pub fn set_variable(&mut self, name: &str, value: Value) {
        if let Some(scope) = self.values.last_mut() {
            scope.insert(name.to_string(), value);
        }
    }
    /// Searches innermost to outermost; unknown names are `null`.
    pub fn get_variable(&self, name: &str) -> Value {
        self.lookup(name).unwrap_or(Value::Null)
    }
    pub fn lookup(&self, name: &str) -> Option<Value> {
        self.values
            .iter()
            .rev()
            .find_map(|scope| scope.get(name))
            .cloned()
    }
}

#[cfg(test)]
mod environment_tests {
    use crate::environment::Environment;
    use crate::value::Value;

    fn number(value: Value) -> Option<f64> {
        match value {
            Value::Number(n) => Some(n),
            _ => None,
        }
    }

    #[test]
    fn inner_assignment_shadows() {
        let mut env = Environment::new();
        env.set_variable("x", Value::Number(1.0));
        env.push_scope();
        assert_eq!(number(env.get_variable("x")), Some(1.0));
        env.set_variable("x", Value::Number(2.0));
        assert_eq!(number(env.get_variable("x")), Some(2.0));
        env.pop_scope();
        assert_eq!(number(env.get_variable("x")), Some(1.0));
    }

    #[test]
    fn unknown_names_are_null() {
        let env = Environment::new();
        assert!(env.get_variable("nope").is_null());
        assert!(env.lookup("nope").is_none());
    }

    #[test]
    fn global_scope_survives_extra_pops() {
        let mut env = Environment::new();
        env.set_variable("g", Value::Bool(true));
        env.pop_scope();
        env.pop_scope();
        assert_eq!(env.depth(), 1);
        assert!(matches!(env.get_variable("g"), Value::Bool(true)));
    }
}
