#![no_std]

#[cfg(feature = "std")]
extern crate std;

mod angles;
mod vector;

pub mod consts {
    pub const PITCH: usize = 0;
    pub const YAW: usize = 1;
    pub const ROLL: usize = 2;
}

pub use angles::*;
pub use vector::*;

// Rust libstd
#[cfg(feature = "std")]
mod imp {
    macro_rules! define {
        ($(fn $name:ident($($a:ident: $t:ty),* $(,)?) $(-> $r:ty)? = $func:path;)*) => (
            $(
                #[inline(always)]
                pub fn $name($($a: $t),*) $(-> $r)? {
                    $func($( $a ),*)
                }
            )*
        );
    }

    define! {
        fn cosf(x: f32) -> f32 = f32::cos;
        fn sinf(x: f32) -> f32 = f32::sin;
        fn atanf(x: f32) -> f32 = f32::atan;
        fn asinf(x: f32) -> f32 = f32::asin;
        fn sqrtf(x: f32) -> f32 = f32::sqrt;
        fn fmaxf(x: f32, y: f32) -> f32 = f32::max;
        fn fminf(x: f32, y: f32) -> f32 = f32::min;
        fn fabsf(x: f32) -> f32 = f32::abs;
        fn copysignf(x: f32, y: f32) -> f32 = f32::copysign;
        fn rintf(x: f32) -> f32 = f32::round_ties_even;

        fn cos(x: f64) -> f64 = f64::cos;
        fn sin(x: f64) -> f64 = f64::sin;
    }
}

// Rust libm
#[cfg(all(feature = "libm", not(feature = "std")))]
mod imp {
    pub use libm::asinf;
    pub use libm::atanf;
    pub use libm::copysignf;
    pub use libm::cosf;
    pub use libm::fabsf;
    pub use libm::fmaxf;
    pub use libm::fminf;
    pub use libm::rintf;
    pub use libm::sinf;
    pub use libm::sqrtf;

    pub use libm::cos;
    pub use libm::sin;
}

pub use self::imp::asinf;
pub use self::imp::atanf;
pub use self::imp::copysignf;
pub use self::imp::cosf;
pub use self::imp::fabsf;
pub use self::imp::fmaxf;
pub use self::imp::fminf;
pub use self::imp::rintf;
pub use self::imp::sinf;
pub use self::imp::sqrtf;

pub use self::imp::cos;
pub use self::imp::sin;

#[inline(always)]
pub fn pow2(x: f32) -> f32 {
    x * x
}

/// Linear interpolation, `from + frac * (to - from)`.
#[inline(always)]
pub fn lerp(from: f32, to: f32, frac: f32) -> f32 {
    from + frac * (to - from)
}
