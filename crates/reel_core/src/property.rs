//! Animatable properties
//!
//! A property is a get/set pair over some externally owned value. Tweens
//! read the starting value once and write the blended value every tick.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Get/set access to an animatable value
pub trait Property<T> {
    fn get(&self) -> T;
    fn set(&self, value: T);
}

/// Property backed by a shared cell
pub struct SharedProperty<T> {
    value: Rc<RefCell<T>>,
}

impl<T: Clone> SharedProperty<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: Rc::new(RefCell::new(value)),
        }
    }
}

impl<T> Clone for SharedProperty<T> {
    fn clone(&self) -> Self {
        Self {
            value: Rc::clone(&self.value),
        }
    }
}

impl<T: Clone> Property<T> for SharedProperty<T> {
    fn get(&self) -> T {
        self.value.borrow().clone()
    }

    fn set(&self, value: T) {
        *self.value.borrow_mut() = value;
    }
}

impl<T: fmt::Debug> fmt::Debug for SharedProperty<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SharedProperty")
            .field(&*self.value.borrow())
            .finish()
    }
}

/// Property defined by a getter and setter closure
pub struct FnProperty<T> {
    getter: Box<dyn Fn() -> T>,
    setter: Box<dyn Fn(T)>,
}

impl<T> FnProperty<T> {
    pub fn new(getter: impl Fn() -> T + 'static, setter: impl Fn(T) + 'static) -> Self {
        Self {
            getter: Box::new(getter),
            setter: Box::new(setter),
        }
    }
}

impl<T> Property<T> for FnProperty<T> {
    fn get(&self) -> T {
        (self.getter)()
    }

    fn set(&self, value: T) {
        (self.setter)(value)
    }
}

impl<T, P: Property<T> + ?Sized> Property<T> for Rc<P> {
    fn get(&self) -> T {
        (**self).get()
    }

    fn set(&self, value: T) {
        (**self).set(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_shared_property_clones_share_value() {
        let a = SharedProperty::new(1.0f64);
        let b = a.clone();
        b.set(4.0);
        assert_eq!(a.get(), 4.0);
    }

    #[test]
    fn test_fn_property() {
        let store = Rc::new(Cell::new(0i32));
        let read = Rc::clone(&store);
        let write = Rc::clone(&store);
        let prop = FnProperty::new(move || read.get(), move |v| write.set(v * 2));

        prop.set(21);
        assert_eq!(prop.get(), 42);
    }
}
