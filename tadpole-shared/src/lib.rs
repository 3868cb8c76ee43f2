#![cfg_attr(not(feature = "std"), no_std)]

use serde::{Deserialize, Serialize};

/// Upper bound on the tadpole population accepted from user input
pub const MAX_TADPOLES: usize = 500;

/// A food drop in arena-local coordinates
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FoodDrop {
    pub x: f32,
    pub y: f32,
}

impl FoodDrop {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Both coordinates are finite numbers
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Pond settings as loaded by presentation layers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PondSettings {
    pub arena_width: f32,
    pub arena_height: f32,
    pub tadpole_count: usize,
    pub head_length: f32,
    pub max_tadpoles: usize,
}

impl Default for PondSettings {
    fn default() -> Self {
        Self {
            arena_width: 1000.0,
            arena_height: 600.0,
            tadpole_count: 10,
            head_length: 5.0,
            max_tadpoles: MAX_TADPOLES,
        }
    }
}

/// Snapshot of the pond reported back to presentation layers
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PondStatus {
    pub tadpole_count: usize,
    pub free_food: usize,
    pub active_food: usize,
    pub frame: u64,
}

/// Clamp a requested tadpole count into `0..=max`
pub fn clamp_tadpole_count(requested: i64, max: usize) -> usize {
    if requested <= 0 {
        return 0;
    }
    (requested as u64).min(max as u64) as usize
}

/// Parse a tadpole count typed by a user.
///
/// Anything that is not a plain non-negative integer maps to zero, larger
/// values are clamped to `max`.
pub fn parse_tadpole_count(input: &str, max: usize) -> usize {
    let trimmed = input.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return 0;
    }
    match trimmed.parse::<u64>() {
        Ok(value) => value.min(max as u64) as usize,
        // all digits but too long for u64
        Err(_) => max,
    }
}
