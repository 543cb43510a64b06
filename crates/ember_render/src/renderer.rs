use ember_core::{TargetId, ViewId};

/// Draws views into presentation targets.
///
/// Implemented by the host on top of its graphics backend. All calls happen
/// on the scheduler thread, in the order `begin_frame`, `render`* and
/// `end_frame`; `end_frame` is only called after a successful `begin_frame`.
pub trait FrameRenderer: Send + 'static {
    /// Prepares `target` for drawing. Returning `false` means the target is
    /// not ready (e.g. its surface is being resized) and it is skipped until
    /// the next frame.
    fn begin_frame(&mut self, target: TargetId, now: f64) -> bool;

    fn render(&mut self, view: ViewId);

    fn end_frame(&mut self);
}
