use std::any::Any;

/// A per-tick animation manager driven by the frame dispatcher.
///
/// `update` receives the frame timestamp in seconds. Every manager registered
/// with a dispatcher is updated once per dispatched frame, before any view is
/// drawn.
pub trait AnimationUpdate: Any + Send {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    fn update(&mut self, now: f64);
}
