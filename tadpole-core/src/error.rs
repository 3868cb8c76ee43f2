use thiserror::Error;

/// Rejected pond configuration
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("arena must have positive finite dimensions, got {width}x{height}")]
    InvalidArena { width: f32, height: f32 },

    #[error("head length must be positive and finite, got {0}")]
    InvalidHeadLength(f32),

    #[error("retarget interval must be a non-empty positive range, got {start}..{end}")]
    InvalidRetargetInterval { start: f32, end: f32 },

    #[error("wander speed must be a non-empty positive range, got {start}..{end}")]
    InvalidWanderSpeed { start: f32, end: f32 },

    #[error("arrival epsilon must be positive and finite, got {0}")]
    InvalidArrivalEpsilon(f32),

    #[error("food radius terms must be non-negative and finite, got base {base} scale {scale}")]
    InvalidFoodRadius { base: f32, scale: f32 },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PondError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("requested {requested} tadpoles, at most {max} are supported")]
    TooManyTadpoles { requested: usize, max: usize },
}
