//! Frame Dispatcher
//!
//! Produces one frame per call: every registered animation manager is
//! advanced to the frame timestamp first, then each target with a non-empty
//! view list is drawn. All views drawn in a frame therefore observe the same
//! animation state.

use std::any::Any;

use ember_animation::AnimationUpdate;
use ember_core::{TargetId, ViewId};

use crate::registry::RenderableRegistry;
use crate::renderer::FrameRenderer;

/// Something the scheduler can ask for a frame.
pub trait FrameSource: Send + 'static {
    /// Produces a frame stamped `now`. Returns whether anything was drawn.
    fn render(&mut self, now: f64) -> bool;
}

pub struct FrameDispatcher<R: FrameRenderer> {
    renderer: R,
    registry: RenderableRegistry,
    managers: Vec<Box<dyn AnimationUpdate>>,
}

impl<R: FrameRenderer> FrameDispatcher<R> {
    pub fn new(renderer: R) -> Self {
        Self::with_registry(renderer, RenderableRegistry::new())
    }

    /// Creates a dispatcher drawing the targets of an existing registry.
    pub fn with_registry(renderer: R, registry: RenderableRegistry) -> Self {
        Self {
            renderer,
            registry,
            managers: Vec::new(),
        }
    }

    #[inline]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    #[inline]
    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    #[inline]
    pub fn registry(&self) -> &RenderableRegistry {
        &self.registry
    }

    /// Sets the views drawn into `target`, replacing any previous list.
    pub fn set_renderable(&mut self, target: TargetId, views: impl IntoIterator<Item = ViewId>) {
        self.registry.set(target, views);
    }

    pub fn remove_renderable(&mut self, target: TargetId) -> bool {
        self.registry.remove(target)
    }

    /// Appends a manager; managers are updated in registration order.
    pub fn add_animation_manager(&mut self, manager: impl AnimationUpdate) {
        log::debug!("Registered animation manager '{}'", manager.name());
        self.managers.push(Box::new(manager));
    }

    /// Removes the first manager of type `T`.
    pub fn remove_animation_manager<T: AnimationUpdate>(&mut self) -> Option<T> {
        let position = self.managers.iter().position(|m| {
            let any: &dyn Any = &**m;
            any.is::<T>()
        })?;
        let manager: Box<dyn Any> = self.managers.remove(position);
        manager.downcast::<T>().ok().map(|m| *m)
    }

    pub fn animation_manager<T: AnimationUpdate>(&self) -> Option<&T> {
        self.managers.iter().find_map(|m| {
            let any: &dyn Any = &**m;
            any.downcast_ref::<T>()
        })
    }

    pub fn animation_manager_mut<T: AnimationUpdate>(&mut self) -> Option<&mut T> {
        self.managers.iter_mut().find_map(|m| {
            let any: &mut dyn Any = &mut **m;
            any.downcast_mut::<T>()
        })
    }

    #[must_use]
    pub fn animation_manager_count(&self) -> usize {
        self.managers.len()
    }
}

impl<R: FrameRenderer> FrameSource for FrameDispatcher<R> {
    fn render(&mut self, now: f64) -> bool {
        for manager in &mut self.managers {
            manager.update(now);
        }

        let renderables = self.registry.lock();
        let mut rendered = false;
        for entry in renderables.iter() {
            if entry.views.is_empty() {
                continue;
            }
            if !self.renderer.begin_frame(entry.target, now) {
                log::trace!("{} not ready; skipping this frame", entry.target);
                continue;
            }
            for &view in &entry.views {
                self.renderer.render(view);
            }
            self.renderer.end_frame();
            rendered = true;
        }
        rendered
    }
}

impl<R: FrameRenderer + std::fmt::Debug> std::fmt::Debug for FrameDispatcher<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameDispatcher")
            .field("renderer", &self.renderer)
            .field("registry", &self.registry)
            .field(
                "managers",
                &self.managers.iter().map(|m| m.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
