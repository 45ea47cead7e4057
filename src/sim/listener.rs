//! Collision listeners
//!
//! Listeners are called synchronously, in registration order, once per
//! confirmed collision.

use super::object::ObjectId;

/// Receives collision notifications
pub trait CollisionListener {
    fn on_collision(&mut self, first: ObjectId, second: ObjectId);
}

impl<F> CollisionListener for F
where
    F: FnMut(ObjectId, ObjectId),
{
    fn on_collision(&mut self, first: ObjectId, second: ObjectId) {
        self(first, second)
    }
}

/// Ordered set of listeners
#[derive(Default)]
pub struct ListenerRegistry {
    listeners: Vec<Box<dyn CollisionListener>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, listener: impl CollisionListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn notify(&mut self, first: ObjectId, second: ObjectId) {
        for listener in &mut self.listeners {
            listener.on_collision(first, second);
        }
    }
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("len", &self.listeners.len())
            .finish()
    }
}
