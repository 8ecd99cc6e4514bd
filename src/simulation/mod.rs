//! Standalone junction simulation module
//!
//! This module contains all the core simulation logic and can run
//! independently of any rendering or UI layer. It can be exercised via
//! console without booting a graphical frontend.

mod lane;
mod metrics;
mod settings;
mod signals;
mod stepper;
mod types;
mod vehicle;
mod world;

// Re-export public types for external use
// These may not all be used within this crate but are part of the public API
#[allow(unused_imports)]
pub use lane::{build_lanes, Lane, LANE_CENTER_OFFSET, LANE_OVERRUN};
#[allow(unused_imports)]
pub use metrics::{Metrics, THROUGHPUT_WINDOW_MS};
#[allow(unused_imports)]
pub use settings::{
    Settings, SettingsPatch, SignalMode, DEFAULT_LANE_DENSITY, DEFAULT_SPAWN_RATE_PER_MIN,
    DEFAULT_SPEED_MULTIPLIER, MAX_LANE_DENSITY, MAX_SPAWN_RATE_PER_MIN, MAX_SPEED_MULTIPLIER,
    MIN_LANE_DENSITY, MIN_SPAWN_RATE_PER_MIN, MIN_SPEED_MULTIPLIER,
};
#[allow(unused_imports)]
pub use signals::{SignalState, PHASE_DURATION_MS};
#[allow(unused_imports)]
pub use stepper::{FixedStepper, FIXED_STEP_MS, MAX_FRAME_MS};
#[allow(unused_imports)]
pub use types::{
    Axis, LaneId, Vec2, VehicleId, CAUTION_DISTANCE, CAUTION_FACTOR, DESIRED_SPEED_MAX,
    DESIRED_SPEED_MIN, FOLLOW_SLOWDOWN_DISTANCE, MAX_ACCEL, MAX_BRAKE, MIN_GAP,
    SIGNAL_APPROACH_MARGIN, SLOWING_RATIO, STOP_EPSILON, VEHICLE_LENGTH,
};
#[allow(unused_imports)]
pub use vehicle::{LeadState, MotionState, Vehicle};
pub use world::{SimWorld, WORLD_HEIGHT, WORLD_WIDTH};
