use std::fmt;
use std::ops::Deref;

/// Release hook supplied by the embedding environment.
pub type ReleaseFn = Box<dyn FnOnce() + Send>;

/// A buffer whose backing memory belongs to the host.
///
/// The core reads from it but never frees it: when the buffer is dropped the
/// host-supplied release hook runs exactly once so the host can reclaim its
/// allocation. Buffers built from a plain `Vec` have no hook.
pub struct HostBuffer<T> {
    data: Box<[T]>,
    release: Option<ReleaseFn>,
}

impl<T> HostBuffer<T> {
    #[must_use]
    pub fn new(data: impl Into<Box<[T]>>) -> Self {
        Self {
            data: data.into(),
            release: None,
        }
    }

    #[must_use]
    pub fn with_release(data: impl Into<Box<[T]>>, release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            data: data.into(),
            release: Some(Box::new(release)),
        }
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }
}

impl<T> Deref for HostBuffer<T> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &[T] {
        &self.data
    }
}

impl<T> From<Vec<T>> for HostBuffer<T> {
    fn from(data: Vec<T>) -> Self {
        Self::new(data)
    }
}

impl<T> Drop for HostBuffer<T> {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for HostBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostBuffer")
            .field("len", &self.data.len())
            .field("host_owned", &self.release.is_some())
            .finish()
    }
}
