//! Encoder configuration.
//!
//! Every threshold the fallback ladder uses lives here. All fields have
//! defaults, so a host can deserialize a partial object (e.g. only
//! `budget_chars`) and get a complete configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default maximum base64 payload length accepted by the host chat application.
pub const DEFAULT_BUDGET_CHARS: usize = 40_000;

/// Errors raised by [`EncoderConfig::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A size or budget field is zero.
    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    /// A JPEG quality is outside 1-100.
    #[error("{field} must be between 1 and 100, got {value}")]
    QualityOutOfRange { field: &'static str, value: u8 },

    /// The quality floor is above the starting quality.
    #[error("quality_floor ({floor}) must not exceed starting_quality ({starting})")]
    FloorAboveStart { floor: u8, starting: u8 },

    /// The size floor is above the initial downscale ceiling.
    #[error("size_floor_px ({floor}) must not exceed max_dimension_px ({max})")]
    SizeFloorAboveMax { floor: u32, max: u32 },
}

/// Thresholds for the adaptive encoding ladder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// Longest side after the initial downscale, applied before any encoding.
    pub max_dimension_px: u32,
    /// First JPEG quality tried once PNG doesn't fit.
    pub starting_quality: u8,
    /// Quality decrement per iteration.
    pub quality_step: u8,
    /// Lowest quality tried (inclusive) before switching to halving.
    pub quality_floor: u8,
    /// Fixed JPEG quality used while halving resolution.
    pub halving_quality: u8,
    /// Halving stops once the longest side would drop below this.
    pub size_floor_px: u32,
    /// Maximum base64 payload length in characters.
    pub budget_chars: usize,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            max_dimension_px: 800,
            starting_quality: 70,
            quality_step: 10,
            quality_floor: 30,
            halving_quality: 50,
            size_floor_px: 200,
            budget_chars: DEFAULT_BUDGET_CHARS,
        }
    }
}

impl EncoderConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Same configuration with a different budget.
    pub fn with_budget(mut self, budget_chars: usize) -> Self {
        self.budget_chars = budget_chars;
        self
    }

    /// Check every constraint the ladder relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_dimension_px == 0 {
            return Err(ConfigError::Zero {
                field: "max_dimension_px",
            });
        }
        if self.size_floor_px == 0 {
            return Err(ConfigError::Zero {
                field: "size_floor_px",
            });
        }
        if self.budget_chars == 0 {
            return Err(ConfigError::Zero {
                field: "budget_chars",
            });
        }
        if self.quality_step == 0 {
            return Err(ConfigError::Zero {
                field: "quality_step",
            });
        }

        for (field, value) in [
            ("starting_quality", self.starting_quality),
            ("quality_floor", self.quality_floor),
            ("halving_quality", self.halving_quality),
        ] {
            if !(1..=100).contains(&value) {
                return Err(ConfigError::QualityOutOfRange { field, value });
            }
        }

        if self.quality_floor > self.starting_quality {
            return Err(ConfigError::FloorAboveStart {
                floor: self.quality_floor,
                starting: self.starting_quality,
            });
        }
        if self.size_floor_px > self.max_dimension_px {
            return Err(ConfigError::SizeFloorAboveMax {
                floor: self.size_floor_px,
                max: self.max_dimension_px,
            });
        }

        Ok(())
    }

    /// JPEG qualities the quality loop tries, highest first.
    pub fn quality_ladder(&self) -> impl Iterator<Item = u8> {
        let floor = self.quality_floor;
        let step = self.quality_step.max(1);
        std::iter::successors(Some(self.starting_quality), move |&q| q.checked_sub(step))
            .take_while(move |&q| q >= floor)
    }

    /// Upper bound on encode attempts for one call: the PNG attempt, every
    /// quality step, and every halving from `max_dimension_px` down to
    /// `size_floor_px`.
    pub fn max_attempts(&self) -> usize {
        let mut halvings = 0;
        let mut edge = self.max_dimension_px;
        while edge / 2 >= self.size_floor_px && edge > 1 {
            edge /= 2;
            halvings += 1;
        }
        1 + self.quality_ladder().count() + halvings
    }
}
