//! Engine settings
//!
//! Validation ceilings and loop timing. Passed to the engine constructor and
//! optionally loaded from a JSON document.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SettingsError;

/// Creation-time safety ceilings.
///
/// These bound the numeric range of the closed-form motion equations. They are
/// policy, not physics: raise them if your units call for it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationPolicy {
    /// Exclusive ceiling on |velocity|
    pub max_velocity: f32,
    /// Exclusive ceiling on mass * |velocity|
    pub max_momentum: f32,
    /// Exclusive ceiling on |acceleration|
    pub max_acceleration: f32,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            max_velocity: MAX_INITIAL_VELOCITY,
            max_momentum: MAX_INITIAL_MOMENTUM,
            max_acceleration: MAX_INITIAL_ACCELERATION,
        }
    }
}

/// Engine settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Limits applied by `Engine::add`
    pub validation: ValidationPolicy,

    // === Clock ===
    /// Simulated duration of one loop segment (seconds)
    pub loop_segment_secs: f32,

    // === Collision ===
    /// Backoff subtracted from the anchor time of a ball after it bounces off
    /// a boundary (seconds, 0 disables)
    pub boundary_backoff_secs: f32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            validation: ValidationPolicy::default(),
            loop_segment_secs: LOOP_SEGMENT_SECS,
            boundary_backoff_secs: BOUNDARY_BACKOFF_SECS,
        }
    }
}

impl EngineSettings {
    /// Parse settings from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Serialize settings to pretty JSON
    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file, falling back to defaults on any failure
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    return settings;
                }
                Err(e) => log::warn!("Ignoring settings in {}: {}", path.display(), e),
            },
            Err(e) => log::debug!("No settings at {}: {}", path.display(), e),
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Check that the values are usable
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(self.loop_segment_secs.is_finite() && self.loop_segment_secs > 0.0) {
            return Err(SettingsError::Invalid(format!(
                "loop_segment_secs must be positive, got {}",
                self.loop_segment_secs
            )));
        }
        if !(self.boundary_backoff_secs.is_finite() && self.boundary_backoff_secs >= 0.0) {
            return Err(SettingsError::Invalid(format!(
                "boundary_backoff_secs must be non-negative, got {}",
                self.boundary_backoff_secs
            )));
        }

        let limits = [
            ("max_velocity", self.validation.max_velocity),
            ("max_momentum", self.validation.max_momentum),
            ("max_acceleration", self.validation.max_acceleration),
        ];
        for (name, value) in limits {
            if !(value > 0.0) {
                return Err(SettingsError::Invalid(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        Ok(())
    }
}
