use crate::ast::{ClassDecl, FunctionDecl};
use std::collections::BTreeMap;
use std::rc::Rc;

/// A class value. Every instance shares its method table.
#[derive(Clone, Debug)]
pub struct Class {
    data: Rc<ClassImpl>,
}

#[derive(Debug)]
struct ClassImpl {
    name: String,
    methods: BTreeMap<String, Rc<FunctionDecl>>,
}

impl Class {
    pub fn new(decl: &ClassDecl) -> Class {
        // Later definitions of the same name win.
        let methods = decl
            .methods
            .iter()
            .map(|method| (method.name.clone(), Rc::clone(method)))
            .collect();
        Class {
            data: Rc::new(ClassImpl {
                name: decl.name.clone(),
                methods,
            }),
        }
    }
    pub fn name(&self) -> &str {
        &self.data.name
    }
    pub fn find_method(&self, name: &str) -> Option<Rc<FunctionDecl>> {
        self.data.methods.get(name).cloned()
    }
    #[cfg(test)]
    pub fn equals(&self, other: &Class) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }
}
