use core::ops::Range;

use tadpole_shared::{PondSettings, MAX_TADPOLES};

use crate::error::ConfigError;
use crate::{math, Vector2D};

/// Rectangular swimming area spanning `0..=width` by `0..=height`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, point: Vector2D) -> bool {
        (0.0..=self.width).contains(&point.x) && (0.0..=self.height).contains(&point.y)
    }
}

/// Configuration for the pond simulation
#[derive(Debug, Clone, PartialEq)]
pub struct PondConfig {
    pub arena: Arena,
    /// Length of the head segment drawn along the heading
    pub head_length: f32,
    pub max_tadpoles: usize,
    /// Distance a tadpole swims between steering updates, drawn once per tadpole
    pub retarget_interval: Range<f32>,
    /// Magnitude range of each wander velocity component, sign is random
    pub wander_speed: Range<f32>,
    /// Per-axis distance at which a tadpole counts as having reached food
    pub arrival_epsilon: f32,
    pub food_radius_base: f32,
    pub food_radius_scale: f32,
}

impl Default for PondConfig {
    fn default() -> Self {
        Self {
            arena: Arena::new(1000.0, 600.0),
            head_length: 5.0,
            max_tadpoles: MAX_TADPOLES,
            retarget_interval: 100.0..250.0,
            wander_speed: 0.5..1.5,
            arrival_epsilon: 1.0,
            food_radius_base: 5.0,
            food_radius_scale: 1.25,
        }
    }
}

impl PondConfig {
    pub fn with_arena(width: f32, height: f32) -> Self {
        Self {
            arena: Arena::new(width, height),
            ..Self::default()
        }
    }

    /// Radius of a freshly dropped food item for a population of `tadpoles`
    pub fn food_radius(&self, tadpoles: usize) -> f32 {
        math::sqrt(tadpoles as f32) * self.food_radius_scale + self.food_radius_base
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let Arena { width, height } = self.arena;
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(ConfigError::InvalidArena { width, height });
        }

        if !(self.head_length.is_finite() && self.head_length > 0.0) {
            return Err(ConfigError::InvalidHeadLength(self.head_length));
        }

        if !is_positive_range(&self.retarget_interval) {
            return Err(ConfigError::InvalidRetargetInterval {
                start: self.retarget_interval.start,
                end: self.retarget_interval.end,
            });
        }

        if !is_positive_range(&self.wander_speed) {
            return Err(ConfigError::InvalidWanderSpeed {
                start: self.wander_speed.start,
                end: self.wander_speed.end,
            });
        }

        if !(self.arrival_epsilon.is_finite() && self.arrival_epsilon > 0.0) {
            return Err(ConfigError::InvalidArrivalEpsilon(self.arrival_epsilon));
        }

        let (base, scale) = (self.food_radius_base, self.food_radius_scale);
        if !(base.is_finite() && scale.is_finite() && base >= 0.0 && scale >= 0.0) {
            return Err(ConfigError::InvalidFoodRadius { base, scale });
        }

        Ok(())
    }
}

fn is_positive_range(range: &Range<f32>) -> bool {
    range.start.is_finite() && range.end.is_finite() && range.start > 0.0 && range.start < range.end
}

impl From<&PondSettings> for PondConfig {
    fn from(settings: &PondSettings) -> Self {
        Self {
            arena: Arena::new(settings.arena_width, settings.arena_height),
            head_length: settings.head_length,
            max_tadpoles: settings.max_tadpoles,
            ..Self::default()
        }
    }
}
