use glam::{Quat, Vec3};

/// Values that can be blended between two poses.
pub trait Interpolatable: Copy {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self;
}

impl Interpolatable for f32 {
    #[inline]
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        start + (end - start) * t
    }
}

impl Interpolatable for Vec3 {
    #[inline]
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        start.lerp(end, t)
    }
}

impl Interpolatable for Quat {
    /// Rotations always take the spherical path.
    #[inline]
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        start.slerp(end, t)
    }
}

/// Interpolates with exact endpoints: `t <= 0` yields `start` and `t >= 1`
/// yields `end` bit for bit.
#[inline]
pub fn blend<T: Interpolatable>(start: T, end: T, t: f32) -> T {
    if t <= 0.0 {
        start
    } else if t >= 1.0 {
        end
    } else {
        T::interpolate_linear(start, end, t)
    }
}
