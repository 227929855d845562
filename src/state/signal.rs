//! Shared reactive cells

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// A readable/writable cell shared by every clone
///
/// Writes through one handle are visible to all holders of the same cell.
pub struct Signal<T> {
    cell: Rc<RefCell<T>>,
}

impl<T> Signal<T> {
    pub fn new(value: T) -> Self {
        Self {
            cell: Rc::new(RefCell::new(value)),
        }
    }

    /// Replace the value
    pub(crate) fn set(&self, value: T) {
        *self.cell.borrow_mut() = value;
    }

    /// Read the value through a closure
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.cell.borrow())
    }

    /// Read-only view sharing this cell
    pub fn read_only(&self) -> ReadSignal<T> {
        ReadSignal {
            cell: self.cell.clone(),
        }
    }

    /// Whether both handles point at the same cell
    pub fn ptr_eq(&self, other: &Signal<T>) -> bool {
        Rc::ptr_eq(&self.cell, &other.cell)
    }
}

impl<T: Clone> Signal<T> {
    pub fn get(&self) -> T {
        self.cell.borrow().clone()
    }
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Signal").field(&self.cell.borrow()).finish()
    }
}

/// Read-only handle to a [`Signal`]
pub struct ReadSignal<T> {
    cell: Rc<RefCell<T>>,
}

impl<T> ReadSignal<T> {
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.cell.borrow())
    }

    pub fn ptr_eq(&self, other: &ReadSignal<T>) -> bool {
        Rc::ptr_eq(&self.cell, &other.cell)
    }
}

impl<T: Clone> ReadSignal<T> {
    pub fn get(&self) -> T {
        self.cell.borrow().clone()
    }
}

impl<T> Clone for ReadSignal<T> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ReadSignal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ReadSignal").field(&self.cell.borrow()).finish()
    }
}
