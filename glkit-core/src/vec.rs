//! Small fixed-size float vectors.
//!
//! `Vec4` carries homogeneous coordinates: `w = 1.0` marks a point and
//! `w = 0.0` a direction.

use std::ops::{Add, AddAssign, Div, Index, IndexMut, Mul, Neg, Sub, SubAssign};

use bytemuck::{Pod, Zeroable};

use crate::error::MathError;
use crate::EPSILON;

macro_rules! impl_vector {
    ($name:ident, $n:literal, $($field:ident : $idx:literal),+) => {
        impl $name {
            #[inline]
            pub const fn new($($field: f32),+) -> Self {
                Self { $($field),+ }
            }

            #[inline]
            pub const fn splat(value: f32) -> Self {
                Self { $($field: value),+ }
            }

            #[inline]
            pub fn dot(self, rhs: Self) -> f32 {
                0.0 $(+ self.$field * rhs.$field)+
            }

            #[inline]
            pub fn length_squared(self) -> f32 {
                self.dot(self)
            }

            #[inline]
            pub fn length(self) -> f32 {
                self.length_squared().sqrt()
            }

            /// Unit vector in the same direction.
            ///
            /// The input must be non-zero; a zero vector yields NaN components.
            /// Use [`Self::try_normalize`] to get an error instead.
            #[inline]
            pub fn normalize(self) -> Self {
                self / self.length()
            }

            pub fn try_normalize(self) -> Result<Self, MathError> {
                let length = self.length();
                if length <= EPSILON || !length.is_finite() {
                    log::debug!("refusing to normalize {:?}", self);
                    return Err(MathError::ZeroLength);
                }
                Ok(self / length)
            }

            /// Componentwise product.
            #[inline]
            pub fn mul_elements(self, rhs: Self) -> Self {
                Self { $($field: self.$field * rhs.$field),+ }
            }

            #[inline]
            pub fn to_array(self) -> [f32; $n] {
                [$(self.$field),+]
            }

            pub fn approx_eq(self, other: Self, eps: f32) -> bool {
                true $(&& (self.$field - other.$field).abs() <= eps)+
            }

            #[inline]
            pub fn is_finite(self) -> bool {
                true $(&& self.$field.is_finite())+
            }
        }

        impl Add for $name {
            type Output = Self;
            #[inline]
            fn add(self, rhs: Self) -> Self {
                Self { $($field: self.$field + rhs.$field),+ }
            }
        }

        impl AddAssign for $name {
            #[inline]
            fn add_assign(&mut self, rhs: Self) {
                $(self.$field += rhs.$field;)+
            }
        }

        impl Sub for $name {
            type Output = Self;
            #[inline]
            fn sub(self, rhs: Self) -> Self {
                Self { $($field: self.$field - rhs.$field),+ }
            }
        }

        impl SubAssign for $name {
            #[inline]
            fn sub_assign(&mut self, rhs: Self) {
                $(self.$field -= rhs.$field;)+
            }
        }

        impl Mul<f32> for $name {
            type Output = Self;
            #[inline]
            fn mul(self, rhs: f32) -> Self {
                Self { $($field: self.$field * rhs),+ }
            }
        }

        impl Mul<$name> for f32 {
            type Output = $name;
            #[inline]
            fn mul(self, rhs: $name) -> $name {
                rhs * self
            }
        }

        impl Div<f32> for $name {
            type Output = Self;
            #[inline]
            fn div(self, rhs: f32) -> Self {
                Self { $($field: self.$field / rhs),+ }
            }
        }

        impl Neg for $name {
            type Output = Self;
            #[inline]
            fn neg(self) -> Self {
                Self { $($field: -self.$field),+ }
            }
        }

        impl Index<usize> for $name {
            type Output = f32;
            fn index(&self, index: usize) -> &f32 {
                match index {
                    $($idx => &self.$field,)+
                    _ => panic!("{} index out of range: {}", stringify!($name), index),
                }
            }
        }

        impl IndexMut<usize> for $name {
            fn index_mut(&mut self, index: usize) -> &mut f32 {
                match index {
                    $($idx => &mut self.$field,)+
                    _ => panic!("{} index out of range: {}", stringify!($name), index),
                }
            }
        }

        impl From<[f32; $n]> for $name {
            fn from(values: [f32; $n]) -> Self {
                Self { $($field: values[$idx]),+ }
            }
        }

        impl From<$name> for [f32; $n] {
            fn from(v: $name) -> Self {
                v.to_array()
            }
        }
    };
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct Vec4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl_vector!(Vec2, 2, x: 0, y: 1);
impl_vector!(Vec3, 3, x: 0, y: 1, z: 2);
impl_vector!(Vec4, 4, x: 0, y: 1, z: 2, w: 3);

impl Vec2 {
    pub const ZERO: Self = Self::splat(0.0);

    /// Counter-clockwise perpendicular.
    #[inline]
    pub fn perp(self) -> Self {
        Self::new(-self.y, self.x)
    }
}

impl Vec3 {
    pub const ZERO: Self = Self::splat(0.0);
    pub const X: Self = Self::new(1.0, 0.0, 0.0);
    pub const Y: Self = Self::new(0.0, 1.0, 0.0);
    pub const Z: Self = Self::new(0.0, 0.0, 1.0);

    /// Right-handed cross product: `X.cross(Y) == Z`.
    #[inline]
    pub fn cross(self, rhs: Self) -> Self {
        Self::new(
            self.y * rhs.z - self.z * rhs.y,
            self.z * rhs.x - self.x * rhs.z,
            self.x * rhs.y - self.y * rhs.x,
        )
    }

    #[inline]
    pub fn extend(self, w: f32) -> Vec4 {
        Vec4::new(self.x, self.y, self.z, w)
    }

    #[inline]
    pub fn truncate(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

impl Vec4 {
    pub const ZERO: Self = Self::splat(0.0);

    /// Homogeneous point (`w = 1`).
    #[inline]
    pub fn point(p: Vec3) -> Self {
        p.extend(1.0)
    }

    /// Homogeneous direction (`w = 0`).
    #[inline]
    pub fn direction(d: Vec3) -> Self {
        d.extend(0.0)
    }

    #[inline]
    pub fn xyz(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    /// Divides by `w`. A direction (`w = 0`) yields infinities.
    #[inline]
    pub fn dehomogenize(self) -> Vec3 {
        self.xyz() / self.w
    }
}

impl From<Vec2> for Vec3 {
    fn from(v: Vec2) -> Self {
        Vec3::new(v.x, v.y, 0.0)
    }
}
