//! Vehicle entity and car-following dynamics
//!
//! A vehicle lives on exactly one lane and is described by its
//! s-coordinate (distance along the lane from its start). Each tick the
//! world computes a target speed for it, integrates speed and position,
//! and reclassifies its motion state.

use super::lane::Lane;
use super::settings::{Settings, SignalMode};
use super::signals::SignalState;
use super::types::{
    LaneId, VehicleId, CAUTION_DISTANCE, CAUTION_FACTOR, FOLLOW_SLOWDOWN_DISTANCE, MAX_ACCEL,
    MAX_BRAKE, MIN_GAP, SIGNAL_APPROACH_MARGIN, SLOWING_RATIO, STOP_EPSILON, VEHICLE_LENGTH,
};

/// Motion state of a vehicle, derived each tick after integration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionState {
    Moving,
    Slowing,
    Stopped,
}

/// Snapshot of the already-updated vehicle ahead in the same lane
#[derive(Debug, Clone, Copy)]
pub struct LeadState {
    pub s: f32,
    pub length: f32,
    pub speed: f32,
}

/// A vehicle in the junction simulation
#[derive(Debug, Clone)]
pub struct Vehicle {
    pub id: VehicleId,
    pub lane_id: LaneId,
    /// Distance along the owning lane from its start
    pub s: f32,
    pub speed: f32,
    /// Cruising speed this vehicle aims for on an open lane,
    /// randomized once at spawn
    pub desired_speed: f32,
    pub length: f32,
    pub state: MotionState,
    pub in_intersection: bool,
}

impl Vehicle {
    pub fn new(id: VehicleId, lane_id: LaneId, desired_speed: f32) -> Self {
        Self {
            id,
            lane_id,
            s: 0.0,
            speed: 0.0,
            desired_speed,
            length: VEHICLE_LENGTH,
            state: MotionState::Moving,
            in_intersection: false,
        }
    }

    /// Compute this tick's target speed.
    ///
    /// Precedence: desired speed, blink caution crawl, signal or occupancy
    /// hold inside the approach window, car-following against the lead
    /// vehicle. Never negative.
    pub fn target_speed(
        &self,
        lane: &Lane,
        lead: Option<LeadState>,
        settings: &Settings,
        signals: &SignalState,
        intersection_occupied: bool,
    ) -> f32 {
        let mut target = self.desired_speed;

        if settings.signal_mode == SignalMode::Blink {
            let distance_to_stop = lane.stop_line_s - self.s;
            if distance_to_stop > 0.0 && distance_to_stop < CAUTION_DISTANCE {
                target = target.min(self.desired_speed * CAUTION_FACTOR);
            }
        }

        // Approach window: from just before the stop line up to the
        // intersection entry. Holding a vehicle here stops it at the line.
        let in_approach = self.s >= lane.stop_line_s - SIGNAL_APPROACH_MARGIN
            && self.s < lane.intersection_start_s;

        if in_approach {
            match settings.signal_mode {
                SignalMode::Auto => {
                    if !signals.allows(lane.signal_group, settings.signal_mode) {
                        target = 0.0;
                    }
                }
                SignalMode::Off | SignalMode::Blink => {
                    if intersection_occupied {
                        target = 0.0;
                    }
                }
            }
        }

        if let Some(lead) = lead {
            let safe_front_s = lead.s - lead.length - MIN_GAP;
            let available = safe_front_s - self.s;
            if available <= 0.0 {
                target = 0.0;
            } else if available < FOLLOW_SLOWDOWN_DISTANCE {
                target = target.min(lead.speed * (available / FOLLOW_SLOWDOWN_DISTANCE));
            }
        }

        target.max(0.0)
    }

    /// Accelerate or brake toward the target and advance along the lane.
    pub fn integrate(&mut self, target: f32, dt_secs: f32) {
        if self.speed < target {
            self.speed = (self.speed + MAX_ACCEL * dt_secs).min(target);
        } else {
            self.speed = (self.speed - MAX_BRAKE * dt_secs).max(target);
        }

        self.s += self.speed * dt_secs;
        debug_assert!(self.s.is_finite(), "vehicle position diverged");
    }

    /// Reclassify the motion state after integration.
    /// Returns true when the vehicle counts as stopped this tick.
    pub fn classify(&mut self, target: f32) -> bool {
        if self.speed < STOP_EPSILON {
            self.state = MotionState::Stopped;
            return true;
        }

        self.state = if target < self.desired_speed * SLOWING_RATIO {
            MotionState::Slowing
        } else {
            MotionState::Moving
        };
        false
    }

    /// Whether this vehicle is inside the lane's conflict zone
    pub fn is_inside_intersection(&self, lane: &Lane) -> bool {
        self.s >= lane.intersection_start_s && self.s <= lane.intersection_end_s
    }

    /// Whether this vehicle has driven off the end of its lane
    pub fn has_exited(&self, lane: &Lane) -> bool {
        self.s > lane.length + self.length
    }
}
