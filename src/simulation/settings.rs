//! Simulation settings and normalization
//!
//! Settings are immutable snapshots: a control surface builds a
//! `SettingsPatch` from whatever raw input it has and runs it through
//! `Settings::normalized`, which is total and always yields clamped,
//! valid values.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Clamp range for the combined spawn rate, vehicles per minute
pub const MIN_SPAWN_RATE_PER_MIN: f32 = 10.0;
pub const MAX_SPAWN_RATE_PER_MIN: f32 = 120.0;

/// Clamp range for the cruising speed scale
pub const MIN_SPEED_MULTIPLIER: f32 = 0.5;
pub const MAX_SPEED_MULTIPLIER: f32 = 2.0;

/// Clamp range for the fraction of nominal spawn capacity used
pub const MIN_LANE_DENSITY: f32 = 0.2;
pub const MAX_LANE_DENSITY: f32 = 1.0;

pub const DEFAULT_SPAWN_RATE_PER_MIN: f32 = 60.0;
pub const DEFAULT_SPEED_MULTIPLIER: f32 = 1.0;
pub const DEFAULT_LANE_DENSITY: f32 = 0.6;

/// How the junction signals behave
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalMode {
    /// Alternate right-of-way between the lane pairs on a fixed cycle
    #[default]
    Auto,
    /// Signals blink: traffic crawls up to the line and yields to occupants
    Blink,
    /// Signals dark: right-of-way by intersection occupancy only
    Off,
}

impl FromStr for SignalMode {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.to_ascii_lowercase().as_str() {
            "auto" => Ok(SignalMode::Auto),
            "blink" => Ok(SignalMode::Blink),
            "off" => Ok(SignalMode::Off),
            other => anyhow::bail!("unknown signal mode: {other}"),
        }
    }
}

impl fmt::Display for SignalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalMode::Auto => write!(f, "auto"),
            SignalMode::Blink => write!(f, "blink"),
            SignalMode::Off => write!(f, "off"),
        }
    }
}

/// Validated, clamped configuration for the simulation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Combined arrival rate across all lanes, vehicles per minute
    pub spawn_rate_per_min: f32,
    /// Scale applied to every vehicle's desired cruising speed
    pub speed_multiplier: f32,
    pub signal_mode: SignalMode,
    /// Fraction of the nominal spawn capacity actually used
    pub lane_density: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            spawn_rate_per_min: DEFAULT_SPAWN_RATE_PER_MIN,
            speed_multiplier: DEFAULT_SPEED_MULTIPLIER,
            signal_mode: SignalMode::default(),
            lane_density: DEFAULT_LANE_DENSITY,
        }
    }
}

/// Raw, possibly partial settings input
///
/// Numbers may be missing or non-finite and the mode is a free-form
/// string; `Settings::normalized` coerces every field independently.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SettingsPatch {
    pub spawn_rate_per_min: Option<f32>,
    pub speed_multiplier: Option<f32>,
    pub signal_mode: Option<String>,
    pub lane_density: Option<f32>,
}

fn clamp_or(value: Option<f32>, fallback: f32, min: f32, max: f32) -> f32 {
    value.filter(|v| v.is_finite()).unwrap_or(fallback).clamp(min, max)
}

impl Settings {
    /// Build a valid settings snapshot from raw input.
    ///
    /// Total: missing or non-finite numbers and unrecognized modes fall
    /// back to defaults, everything else is clamped into range.
    pub fn normalized(patch: SettingsPatch) -> Self {
        let defaults = Settings::default();

        Self {
            spawn_rate_per_min: clamp_or(
                patch.spawn_rate_per_min,
                defaults.spawn_rate_per_min,
                MIN_SPAWN_RATE_PER_MIN,
                MAX_SPAWN_RATE_PER_MIN,
            ),
            speed_multiplier: clamp_or(
                patch.speed_multiplier,
                defaults.speed_multiplier,
                MIN_SPEED_MULTIPLIER,
                MAX_SPEED_MULTIPLIER,
            ),
            signal_mode: patch
                .signal_mode
                .as_deref()
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(defaults.signal_mode),
            lane_density: clamp_or(
                patch.lane_density,
                defaults.lane_density,
                MIN_LANE_DENSITY,
                MAX_LANE_DENSITY,
            ),
        }
    }

    /// Replace this snapshot with one where the patch's set fields win.
    pub fn with_patch(&self, patch: SettingsPatch) -> Self {
        Settings::normalized(SettingsPatch {
            spawn_rate_per_min: patch.spawn_rate_per_min.or(Some(self.spawn_rate_per_min)),
            speed_multiplier: patch.speed_multiplier.or(Some(self.speed_multiplier)),
            signal_mode: patch.signal_mode.or(Some(self.signal_mode.to_string())),
            lane_density: patch.lane_density.or(Some(self.lane_density)),
        })
    }
}
