use std::cell::{Ref, RefCell};
use std::rc::Rc;

/// A growable list whose clones all share one backing vector, so a push
/// through any alias is visible through every other.
#[derive(Debug)]
pub struct SharedList<T> {
    data: Rc<RefCell<Vec<T>>>,
}

impl<T> Clone for SharedList<T> {
    fn clone(&self) -> SharedList<T> {
        SharedList {
            data: Rc::clone(&self.data),
        }
    }
}

impl<T> Default for SharedList<T> {
    fn default() -> Self {
        SharedList::new()
    }
}

impl<T> From<Vec<T>> for SharedList<T> {
    fn from(items: Vec<T>) -> Self {
        SharedList {
            data: Rc::new(RefCell::new(items)),
        }
    }
}

impl<T: Clone> SharedList<T> {
    pub fn get(&self, index: usize) -> Option<T> {
        self.data.borrow().get(index).cloned()
    }
}

impl<T> SharedList<T> {
    pub fn new() -> Self {
        SharedList::from(Vec::new())
    }

    pub fn push(&self, elem: T) {
        self.data.borrow_mut().push(elem);
    }

    pub fn pop(&self) -> Option<T> {
        self.data.borrow_mut().pop()
    }

    pub fn len(&self) -> usize {
        self.data.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.borrow().is_empty()
    }

    pub fn items(&self) -> Ref<Vec<T>> {
        self.data.borrow()
    }

    #[cfg(test)]
    pub fn equals(&self, other: &SharedList<T>) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }
}
