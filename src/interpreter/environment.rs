use std::{cell::RefCell, collections::HashMap, rc::Rc};

use compact_str::{CompactString, ToCompactString};

use super::{error::RuntimeErrorKind, value::Value};

/// A handle to one scope in the chain. Clones share the same scope.
#[derive(Debug, Clone, Default)]
pub struct SharedEnvironment {
    inner: Rc<RefCell<Scope>>,
}

#[derive(Debug, Default)]
struct Scope {
    values: HashMap<CompactString, Value>,
    parent: Option<SharedEnvironment>,
}

impl SharedEnvironment {
    /// A root scope with no parent.
    pub fn new() -> Self {
        Self::default()
    }

    /// A child scope enclosed by `self`.
    pub fn new_scope(&self) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Scope {
                values: HashMap::new(),
                parent: Some(self.clone()),
            })),
        }
    }

    /// Binds `name` in this scope, overwriting any existing binding here.
    pub fn declare(&self, name: &str, value: Value) {
        self.inner
            .borrow_mut()
            .values
            .insert(name.to_compact_string(), value);
    }

    pub fn get(&self, name: &str) -> Result<Value, RuntimeErrorKind> {
        let mut current = Some(self.clone());
        while let Some(environment) = current {
            let scope = environment.inner.borrow();
            if let Some(value) = scope.values.get(name) {
                return Ok(value.clone());
            }
            current = scope.parent.clone();
        }
        Err(RuntimeErrorKind::UndefinedVariable(name.to_compact_string()))
    }

    /// Rebinds the nearest existing `name`. Never creates a binding.
    pub fn assign(&self, name: &str, value: Value) -> Result<(), RuntimeErrorKind> {
        let mut current = Some(self.clone());
        while let Some(environment) = current {
            let mut scope = environment.inner.borrow_mut();
            if let Some(slot) = scope.values.get_mut(name) {
                *slot = value;
                return Ok(());
            }
            current = scope.parent.clone();
        }
        Err(RuntimeErrorKind::UndefinedVariable(name.to_compact_string()))
    }

    pub fn contains_local(&self, name: &str) -> bool {
        self.inner.borrow().values.contains_key(name)
    }

    pub fn is_root(&self) -> bool {
        self.inner.borrow().parent.is_none()
    }
}
