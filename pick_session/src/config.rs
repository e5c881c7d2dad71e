//! Session tuning parameters.

use std::time::Duration;

use thiserror::Error;

/// Progress a contact starts with: small but non-zero, so a fresh ring is
/// visibly "alive".
pub const SEED_PROGRESS: f32 = 0.01;

/// Progress at which a contact is complete.
pub const FULL_PROGRESS: f32 = 100.0;

/// Existing contacts fall back to this when somebody new joins.
pub const REJOIN_CAP: f32 = 70.0;

/// Palette entries available to the presenter (viridis has 256).
pub const PALETTE_LEN: usize = 256;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} interval must be non-zero")]
    ZeroInterval { name: &'static str },

    #[error("palette must hold at least one colour")]
    EmptyPalette,

    #[error("progress step must be positive (got {0})")]
    NonPositiveStep(f32),

    #[error("seed progress {seed} must lie in (0, {full})")]
    SeedOutOfRange { seed: f32, full: f32 },

    #[error("rejoin cap {cap} must lie in [0, {full}]")]
    CapOutOfRange { cap: f32, full: f32 },
}

/// Configuration for a [`Session`](crate::Session).
#[derive(Clone, Debug, PartialEq)]
pub struct SessionConfig {
    pub seed_progress:     f32,
    /// Added to a contact's progress on every advance tick.
    pub progress_step:     f32,
    pub full_progress:     f32,
    pub rejoin_cap:        f32,
    /// Period of each contact's advance tick.
    pub advance_interval:  Duration,
    /// Period of the session-wide completion check.
    pub evaluate_interval: Duration,
    pub palette_len:       usize,
    /// Fixed RNG seed for reproducible draws; `None` seeds from the thread RNG.
    pub rng_seed:          Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            seed_progress:     SEED_PROGRESS,
            progress_step:     1.0,
            full_progress:     FULL_PROGRESS,
            rejoin_cap:        REJOIN_CAP,
            advance_interval:  Duration::from_millis(10),
            evaluate_interval: Duration::from_millis(200),
            palette_len:       PALETTE_LEN,
            rng_seed:          None,
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.advance_interval.is_zero() {
            return Err(ConfigError::ZeroInterval { name: "advance" });
        }
        if self.evaluate_interval.is_zero() {
            return Err(ConfigError::ZeroInterval { name: "evaluate" });
        }
        if self.palette_len == 0 {
            return Err(ConfigError::EmptyPalette);
        }
        if !(self.progress_step > 0.0) {
            return Err(ConfigError::NonPositiveStep(self.progress_step));
        }
        let full = self.full_progress;
        if !(self.seed_progress > 0.0 && self.seed_progress < full) {
            return Err(ConfigError::SeedOutOfRange { seed: self.seed_progress, full });
        }
        if !(self.rejoin_cap >= 0.0 && self.rejoin_cap <= full) {
            return Err(ConfigError::CapOutOfRange { cap: self.rejoin_cap, full });
        }
        Ok(())
    }

    /// Same configuration with a fixed RNG seed.
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert_eq!(SessionConfig::default().validate(), Ok(()));
    }

    #[test]
    fn zero_interval_rejected() {
        let cfg = SessionConfig { evaluate_interval: Duration::ZERO, ..Default::default() };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroInterval { name: "evaluate" }));
    }

    #[test]
    fn nan_step_rejected() {
        let cfg = SessionConfig { progress_step: f32::NAN, ..Default::default() };
        assert!(matches!(cfg.validate(), Err(ConfigError::NonPositiveStep(_))));
    }

    #[test]
    fn cap_above_full_rejected() {
        let cfg = SessionConfig { rejoin_cap: 120.0, ..Default::default() };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::CapOutOfRange { cap: 120.0, full: 100.0 }),
        );
    }

    #[test]
    fn error_messages_read_well() {
        let e = ConfigError::ZeroInterval { name: "advance" };
        assert_eq!(e.to_string(), "advance interval must be non-zero");
    }
}
