//! Metrics aggregation derived from world state
//!
//! Read-only apart from pruning expired throughput timestamps, which
//! bounds the rolling window's size.

use super::types::STOP_EPSILON;
use super::vehicle::MotionState;
use super::world::SimWorld;

/// Rolling window over which exits count toward throughput
pub const THROUGHPUT_WINDOW_MS: u64 = 60_000;

/// Observable statistics derived from the world
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Metrics {
    pub active_vehicles: usize,
    /// Arithmetic mean speed across active vehicles, 0 when empty
    pub avg_speed: f32,
    /// Exits recorded within the rolling window
    pub throughput_per_min: usize,
    pub stopped_vehicles: usize,
}

impl SimWorld {
    /// Derive the current metrics snapshot.
    ///
    /// Prunes throughput timestamps older than the rolling window; that
    /// trim is the only mutation.
    pub fn sample_metrics(&mut self) -> Metrics {
        let now = self.time_ms;
        self.throughput_events_ms
            .retain(|&ts| now.saturating_sub(ts) <= THROUGHPUT_WINDOW_MS);

        let active_vehicles = self.vehicles.len();
        let avg_speed = if active_vehicles == 0 {
            0.0
        } else {
            self.vehicles.iter().map(|v| v.speed).sum::<f32>() / active_vehicles as f32
        };

        let stopped_vehicles = self
            .vehicles
            .iter()
            .filter(|v| v.state == MotionState::Stopped || v.speed < STOP_EPSILON)
            .count();

        Metrics {
            active_vehicles,
            avg_speed,
            throughput_per_min: self.throughput_events_ms.len(),
            stopped_vehicles,
        }
    }
}
