use glam::{Quat, Vec3, Vec4};

/// Value types a [`KeyframeTrack`](crate::animation::KeyframeTrack) can hold.
pub trait Interpolatable: Copy + Clone + Sized {
    /// Number of scalars one value occupies in an authored flat buffer.
    const STRIDE: usize;

    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self;

    fn interpolate_cubic(
        v0: Self,
        out_tangent0: Self,
        in_tangent1: Self,
        v1: Self,
        t: f32,
        dt: f32,
    ) -> Self;

    /// Builds one value from exactly `STRIDE` scalars.
    fn from_slice(chunk: &[f32]) -> Self;

    /// Appends the `STRIDE` scalars of this value to `out`.
    fn extend_flat(&self, out: &mut Vec<f32>);
}

/// Hermite basis weights `(s0, s1, s2, s3)` for normalized time `t`.
#[inline]
fn hermite_basis(t: f32) -> (f32, f32, f32, f32) {
    let t2 = t * t;
    let t3 = t2 * t;

    let s2 = -2.0 * t3 + 3.0 * t2;
    let s3 = t3 - t2;
    let s0 = 1.0 - s2;
    let s1 = s3 - t2 + t;
    (s0, s1, s2, s3)
}

impl Interpolatable for f32 {
    const STRIDE: usize = 1;

    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        start + (end - start) * t
    }

    fn interpolate_cubic(v0: Self, out_tangent0: Self, in_tangent1: Self, v1: Self, t: f32, dt: f32) -> Self {
        let (s0, s1, s2, s3) = hermite_basis(t);
        let m0 = out_tangent0 * dt;
        let m1 = in_tangent1 * dt;

        s0 * v0 + s1 * m0 + s2 * v1 + s3 * m1
    }

    fn from_slice(chunk: &[f32]) -> Self {
        chunk[0]
    }

    fn extend_flat(&self, out: &mut Vec<f32>) {
        out.push(*self);
    }
}

impl Interpolatable for Vec3 {
    const STRIDE: usize = 3;

    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        start.lerp(end, t)
    }

    fn interpolate_cubic(v0: Self, out_tangent0: Self, in_tangent1: Self, v1: Self, t: f32, dt: f32) -> Self {
        let (s0, s1, s2, s3) = hermite_basis(t);
        let m0 = out_tangent0 * dt;
        let m1 = in_tangent1 * dt;

        v0 * s0 + m0 * s1 + v1 * s2 + m1 * s3
    }

    fn from_slice(chunk: &[f32]) -> Self {
        Vec3::new(chunk[0], chunk[1], chunk[2])
    }

    fn extend_flat(&self, out: &mut Vec<f32>) {
        out.extend_from_slice(&self.to_array());
    }
}

impl Interpolatable for Quat {
    const STRIDE: usize = 4;

    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        start.slerp(end, t)
    }

    fn interpolate_cubic(v0: Self, out_tangent0: Self, in_tangent1: Self, v1: Self, t: f32, dt: f32) -> Self {
        let (s0, s1, s2, s3) = hermite_basis(t);

        let v0_v = Vec4::from(v0);
        let v1_v = Vec4::from(v1);
        let m0_v = Vec4::from(out_tangent0) * dt;
        let m1_v = Vec4::from(in_tangent1) * dt;

        let result = v0_v * s0 + m0_v * s1 + v1_v * s2 + m1_v * s3;

        Quat::from_vec4(result).normalize()
    }

    fn from_slice(chunk: &[f32]) -> Self {
        // Authored as (x, y, z, w)
        Quat::from_xyzw(chunk[0], chunk[1], chunk[2], chunk[3])
    }

    fn extend_flat(&self, out: &mut Vec<f32>) {
        out.extend_from_slice(&self.to_array());
    }
}
