//! Game settings
//!
//! Loaded as JSON from LocalStorage in the browser, or from the
//! `OMEGA_FLUX_SETTINGS` environment variable natively. Missing fields take
//! their defaults; out-of-range values are clamped with a warning.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::field::{Equation, RevealPacer};

/// Hand-picked field used instead of a random one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquationOverride {
    pub i: String,
    pub j: String,
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Cells per side of the arrow grid
    pub grid_size: u32,
    /// Monte Carlo samples per score
    pub score_samples: u32,

    // === Reveal pacing ===
    /// Initial speed of the slow reveal
    pub reveal_start_speed: f64,
    /// Initial speed of the reveal after an answer
    pub answer_reveal_speed: f64,
    /// Speed multiplier per revealed arrow
    pub reveal_acceleration: f64,

    // === Presentation ===
    /// Animate the score counting up before showing the final value
    pub score_countup: bool,

    // === Debug ===
    /// Use this field every round instead of generating one
    pub override_equation: Option<EquationOverride>,
    /// Fixed RNG seed (random per session when unset)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            grid_size: GRID_SIZE,
            score_samples: SCORE_SAMPLES,

            reveal_start_speed: REVEAL_START_SPEED,
            answer_reveal_speed: ANSWER_REVEAL_SPEED,
            reveal_acceleration: REVEAL_ACCELERATION,

            score_countup: true,

            override_equation: None,
            seed: None,
        }
    }
}

impl Settings {
    /// Storage key / environment variable
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "omega_flux_settings";
    #[allow(dead_code)]
    const ENV_VAR: &'static str = "OMEGA_FLUX_SETTINGS";

    /// Parse settings JSON and clamp the result
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let settings: Settings = serde_json::from_str(json)?;
        Ok(settings.sanitized())
    }

    /// Clamp values that would break the board or the pacing
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        if self.grid_size == 0 {
            log::warn!("grid_size must be > 0, using default");
            self.grid_size = defaults.grid_size;
        } else if self.grid_size > MAX_GRID_SIZE {
            log::warn!("grid_size {} exceeds {}, clamping", self.grid_size, MAX_GRID_SIZE);
            self.grid_size = MAX_GRID_SIZE;
        }
        if self.score_samples == 0 {
            log::warn!("score_samples must be > 0, using default");
            self.score_samples = defaults.score_samples;
        }
        if !(self.reveal_start_speed.is_finite() && self.reveal_start_speed > 0.0) {
            log::warn!("reveal_start_speed must be positive, using default");
            self.reveal_start_speed = defaults.reveal_start_speed;
        }
        if !(self.answer_reveal_speed.is_finite() && self.answer_reveal_speed > 0.0) {
            log::warn!("answer_reveal_speed must be positive, using default");
            self.answer_reveal_speed = defaults.answer_reveal_speed;
        }
        if !(self.reveal_acceleration.is_finite() && self.reveal_acceleration >= 1.0) {
            log::warn!("reveal_acceleration must be >= 1, using default");
            self.reveal_acceleration = defaults.reveal_acceleration;
        }
        self
    }

    /// Pacer for the reveal that runs while the player is thinking
    pub fn slow_pacer(&self) -> RevealPacer {
        RevealPacer::new(self.reveal_start_speed, self.reveal_acceleration)
    }

    /// Pacer for the reveal that follows an answer
    pub fn fast_pacer(&self) -> RevealPacer {
        RevealPacer::new(self.answer_reveal_speed, self.reveal_acceleration)
    }

    /// The configured override equation, if any and if it parses
    pub fn override_equation(&self) -> Option<Equation> {
        let o = self.override_equation.as_ref()?;
        match Equation::parse(&o.i, &o.j) {
            Ok(equation) => Some(equation),
            Err(e) => {
                log::warn!("Ignoring override equation <{}, {}>: {}", o.i, o.j, e);
                None
            }
        }
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Invalid stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Load settings from the environment (native)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        if let Ok(json) = std::env::var(Self::ENV_VAR) {
            match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", Self::ENV_VAR);
                    return settings;
                }
                Err(e) => log::warn!("Invalid {} '{}': {}, using defaults", Self::ENV_VAR, json, e),
            }
        }
        Self::default()
    }
}
