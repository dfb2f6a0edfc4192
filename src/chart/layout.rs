//! Chart viewport tracking and resize listeners.
//!
//! Listeners are registered through [`ChartLayout::subscribe`] and stay
//! registered exactly as long as the returned [`LayoutSubscription`] lives.
//! Everything here is single-threaded: callbacks run on the caller's thread
//! during [`ChartLayout::resize`].

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use super::path::Viewport;

type Listener = Box<dyn FnMut(&Viewport)>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
    notifying: bool,
    /// Ids dropped while their listener was detached for notification.
    retired: Vec<u64>,
}

/// Current chart viewport plus its resize listeners.
pub struct ChartLayout {
    viewport: Viewport,
    registry: Rc<RefCell<Registry>>,
}

impl ChartLayout {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            registry: Rc::new(RefCell::new(Registry::default())),
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Registers `listener` for viewport changes.
    pub fn subscribe(&self, listener: impl FnMut(&Viewport) + 'static) -> LayoutSubscription {
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.listeners.push((id, Box::new(listener)));
        LayoutSubscription {
            id,
            registry: Rc::downgrade(&self.registry),
        }
    }

    /// Re-derives the viewport from a new container size, keeping headroom.
    ///
    /// Listeners run only when the size actually changed. Returns whether it did.
    pub fn resize(&mut self, width: f64, height: f64) -> bool {
        if self.viewport.width == width && self.viewport.height == height {
            return false;
        }
        self.viewport = Viewport {
            width,
            height,
            headroom: self.viewport.headroom,
        };
        tracing::debug!(width, height, "chart viewport resized");
        self.notify();
        true
    }

    /// Number of live subscriptions.
    pub fn listener_count(&self) -> usize {
        self.registry.borrow().listeners.len()
    }

    fn notify(&self) {
        // Detach listeners so callbacks may subscribe or drop subscriptions.
        let mut detached = {
            let mut registry = self.registry.borrow_mut();
            registry.notifying = true;
            std::mem::take(&mut registry.listeners)
        };

        for (_, listener) in detached.iter_mut() {
            listener(&self.viewport);
        }

        let mut registry = self.registry.borrow_mut();
        let retired = std::mem::take(&mut registry.retired);
        detached.retain(|(id, _)| !retired.contains(id));
        detached.append(&mut registry.listeners);
        registry.listeners = detached;
        registry.notifying = false;
    }
}

/// Guard that unregisters its listener on drop.
pub struct LayoutSubscription {
    id: u64,
    registry: Weak<RefCell<Registry>>,
}

impl Drop for LayoutSubscription {
    fn drop(&mut self) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        let mut registry = registry.borrow_mut();
        registry.listeners.retain(|(id, _)| *id != self.id);
        if registry.notifying {
            registry.retired.push(self.id);
        }
    }
}
