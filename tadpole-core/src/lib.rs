#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod config;
pub mod error;
pub mod food;
pub mod frame;
pub mod geometry;
pub mod pond;
pub mod render;
pub mod tadpole;

pub use config::{Arena, PondConfig};
pub use error::{ConfigError, PondError};
pub use food::{FoodPool, FoodSlot};
pub use frame::{FrameClock, FrameRequestId, FrameTask};
pub use pond::Pond;
pub use render::{FoodShape, RenderSink, TadpoleShape};
pub use tadpole::{Arrival, Tadpole, Target, BODY_POINTS, TAIL_LENGTH};

/// Float helpers that resolve to `std` or `libm` depending on the build
pub(crate) mod math {
    #[cfg(feature = "std")]
    pub fn sqrt(v: f32) -> f32 {
        v.sqrt()
    }
    #[cfg(not(feature = "std"))]
    pub fn sqrt(v: f32) -> f32 {
        libm::sqrtf(v)
    }

    #[cfg(feature = "std")]
    pub fn sin(v: f32) -> f32 {
        v.sin()
    }
    #[cfg(not(feature = "std"))]
    pub fn sin(v: f32) -> f32 {
        libm::sinf(v)
    }

    #[cfg(feature = "std")]
    pub fn cos(v: f32) -> f32 {
        v.cos()
    }
    #[cfg(not(feature = "std"))]
    pub fn cos(v: f32) -> f32 {
        libm::cosf(v)
    }

    #[cfg(feature = "std")]
    pub fn atan2(y: f32, x: f32) -> f32 {
        y.atan2(x)
    }
    #[cfg(not(feature = "std"))]
    pub fn atan2(y: f32, x: f32) -> f32 {
        libm::atan2f(y, x)
    }

    #[cfg(feature = "std")]
    pub fn abs(v: f32) -> f32 {
        v.abs()
    }
    #[cfg(not(feature = "std"))]
    pub fn abs(v: f32) -> f32 {
        libm::fabsf(v)
    }
}

/// A 2D vector used for positions and velocities in arena units
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector2D {
    pub x: f32,
    pub y: f32,
}

impl Vector2D {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Vector of length `magnitude` pointing along `angle` (radians)
    pub fn from_polar(magnitude: f32, angle: f32) -> Self {
        Self {
            x: magnitude * math::cos(angle),
            y: magnitude * math::sin(angle),
        }
    }

    pub fn magnitude(&self) -> f32 {
        math::sqrt(self.x * self.x + self.y * self.y)
    }

    /// Heading of the vector in radians, zero for the zero vector
    pub fn angle(&self) -> f32 {
        math::atan2(self.y, self.x)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl core::ops::Add for Vector2D {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl core::ops::Sub for Vector2D {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl core::ops::Mul<f32> for Vector2D {
    type Output = Self;

    fn mul(self, scalar: f32) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
        }
    }
}

impl core::ops::AddAssign for Vector2D {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
    }
}
