use crate::callable::Function;
use crate::class::Class;
use crate::dict::Dict;
use crate::value::Value;
use std::cell::RefCell;
use std::rc::Rc;

/// An object: its own field map plus, for objects made with `new`, the class
/// whose methods it answers to. The builtin namespaces (`f`, `mem`, `sys`,
/// `asm`) are classless objects whose fields are native functions.
#[derive(Clone, Debug)]
pub struct Instance {
    data: Rc<RefCell<InstanceImpl>>,
}

#[derive(Debug)]
struct InstanceImpl {
    class: Option<Class>,
    fields: Dict,
}

impl Instance {
    pub fn new(class: Class) -> Instance {
        Instance::with_fields(Some(class), Dict::new())
    }
    pub fn with_fields(class: Option<Class>, fields: Dict) -> Instance {
        Instance {
            data: Rc::new(RefCell::new(InstanceImpl { class, fields })),
        }
    }
    /// Fields shadow methods.
    pub fn get(&self, name: &str) -> Option<Value> {
        let data = self.data.borrow();
        data.fields.get(name).or_else(|| {
            data.class
                .as_ref()
                .and_then(|class| class.find_method(name))
                .map(|method| Value::Function(Function::User(method)))
        })
    }
    pub fn set(&self, name: &str, value: Value) {
        self.data.borrow_mut().fields.insert(name, value);
    }
    #[cfg(test)]
    pub fn class(&self) -> Option<Class> {
        self.data.borrow().class.clone()
    }
    #[cfg(test)]
    pub fn equals(&self, other: &Instance) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }
}

#[cfg(test)]
mod instance_tests {
    use crate::ast::{Block, ClassDecl, FunctionDecl};
    use crate::class::Class;
    use crate::instance::Instance;
    use crate::value::Value;
    use std::rc::Rc;

    fn dog() -> Class {
        Class::new(&ClassDecl {
            name: "Dog".to_string(),
            methods: vec![Rc::new(FunctionDecl {
                name: "bark".to_string(),
                params: vec![],
                body: Some(Block::default()),
                line: 1,
            })],
            line: 1,
        })
    }

    #[test]
    fn instances_share_methods_but_not_fields() {
        let class = dog();
        let a = Instance::new(class.clone());
        let b = Instance::new(class);
        assert!(matches!(a.get("bark"), Some(Value::Function(_))));
        assert!(matches!(b.get("bark"), Some(Value::Function(_))));
        a.set("name", Value::Str("rex".to_string()));
        assert!(matches!(a.get("name"), Some(Value::Str(_))));
        assert!(b.get("name").is_none());
        assert!(!a.equals(&b));
        assert!(a.class().unwrap().equals(&b.class().unwrap()));
        assert_eq!(a.to_string(), "Dog instance");
    }

    #[test]
    fn fields_shadow_methods() {
        let a = Instance::new(dog());
        a.set("bark", Value::Number(1.0));
        assert!(matches!(a.get("bark"), Some(Value::Number(_))));
        let b = Instance::new(dog());
        assert!(matches!(b.get("bark"), Some(Value::Function(_))));
    }
}
