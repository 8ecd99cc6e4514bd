//! Main simulation world that ties everything together
//!
//! This is the entry point for advancing the junction simulation. The
//! world is the single mutable aggregate: one `step` call runs spawning,
//! the signal machine, vehicle dynamics and despawning for one fixed
//! logical tick.

use log::debug;
use ordered_float::OrderedFloat;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::Rng;
use rand::SeedableRng;

use super::lane::{build_lanes, Lane};
use super::settings::Settings;
use super::signals::SignalState;
use super::types::{
    Axis, LaneId, VehicleId, DESIRED_SPEED_MAX, DESIRED_SPEED_MIN, MIN_GAP, VEHICLE_LENGTH,
};
use super::vehicle::{LeadState, Vehicle};

/// Default world dimensions, fixed for the process lifetime
pub const WORLD_WIDTH: f32 = 1280.0;
pub const WORLD_HEIGHT: f32 = 720.0;

/// The main simulation world
pub struct SimWorld {
    pub width: f32,
    pub height: f32,

    /// Completed logical ticks since creation or reset
    pub tick: u64,

    /// Elapsed simulation time in milliseconds
    pub time_ms: u64,

    /// While set, `step` leaves the world untouched
    pub paused: bool,

    /// All active vehicles
    pub vehicles: Vec<Vehicle>,

    /// Timestamps of vehicles that exited the map, for throughput metrics
    pub throughput_events_ms: Vec<u64>,

    /// Cumulative count of vehicle-ticks spent stopped
    pub stopped_total_ticks: u64,

    /// Signal phase state machine
    pub signals: SignalState,

    /// Next ID to assign
    next_vehicle_id: u64,

    /// Fractional spawn accumulator
    spawn_remainder: f32,

    /// Static lane geometry, in `LaneId::ALL` order
    lanes: [Lane; 4],

    /// Optional seeded RNG for reproducible simulations
    rng: Option<StdRng>,
}

impl Default for SimWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl SimWorld {
    fn new_internal(rng: Option<StdRng>) -> Self {
        Self {
            width: WORLD_WIDTH,
            height: WORLD_HEIGHT,
            tick: 0,
            time_ms: 0,
            paused: false,
            vehicles: Vec::new(),
            throughput_events_ms: Vec::new(),
            stopped_total_ticks: 0,
            signals: SignalState::new(),
            next_vehicle_id: 1,
            spawn_remainder: 0.0,
            lanes: build_lanes(WORLD_WIDTH, WORLD_HEIGHT),
            rng,
        }
    }

    pub fn new() -> Self {
        Self::new_internal(None)
    }

    /// Create a new SimWorld with a seeded RNG for reproducible simulations
    pub fn new_with_seed(seed: u64) -> Self {
        Self::new_internal(Some(StdRng::seed_from_u64(seed)))
    }

    /// Get a random value in the given range, using seeded RNG if available
    fn random_range(&mut self, range: std::ops::Range<f32>) -> f32 {
        match &mut self.rng {
            Some(rng) => rng.random_range(range),
            None => rand::rng().random_range(range),
        }
    }

    /// Choose a random element from a slice, using seeded RNG if available
    fn choose_random<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        if slice.is_empty() {
            return None;
        }
        match &mut self.rng {
            Some(rng) => slice.choose(rng),
            None => slice.choose(&mut rand::rng()),
        }
    }

    /// The four lanes of the junction, in `LaneId::ALL` order
    pub fn lanes(&self) -> &[Lane; 4] {
        &self.lanes
    }

    /// Look up a lane by id
    pub fn lane(&self, id: LaneId) -> &Lane {
        &self.lanes[id.index()]
    }

    /// Freeze or resume world mutation; the driver keeps calling `step`
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Restore the world to its initial state.
    /// Lanes, dimensions and the RNG stream are kept.
    pub fn reset(&mut self) {
        self.tick = 0;
        self.time_ms = 0;
        self.paused = false;
        self.vehicles.clear();
        self.throughput_events_ms.clear();
        self.stopped_total_ticks = 0;
        self.signals = SignalState::new();
        self.next_vehicle_id = 1;
        self.spawn_remainder = 0.0;
    }

    /// Advance the world by one fixed logical tick.
    ///
    /// Total over any settings snapshot: spawning, signal phasing, vehicle
    /// dynamics and despawning, then the tick and time counters.
    pub fn step(&mut self, settings: &Settings, dt_ms: u32) {
        if self.paused {
            return;
        }

        let dt_secs = dt_ms as f32 / 1000.0;

        self.spawn_vehicles(settings, dt_secs);
        self.signals.advance(settings.signal_mode, dt_ms);
        self.update_vehicles(settings, dt_secs, dt_ms);

        self.time_ms += dt_ms as u64;
        self.tick += 1;
    }

    /// Probabilistically inject new vehicles at lane starts.
    ///
    /// The combined arrival rate is `spawn_rate_per_min / 60 *
    /// lane_density` vehicles per second, accumulated as one fractional
    /// counter and split uniformly at random across the lanes. An
    /// injection into a lane whose entry is still blocked is dropped, not
    /// retried.
    fn spawn_vehicles(&mut self, settings: &Settings, dt_secs: f32) {
        let rate_per_sec = settings.spawn_rate_per_min / 60.0 * settings.lane_density;
        self.spawn_remainder += rate_per_sec * dt_secs;

        while self.spawn_remainder >= 1.0 {
            self.spawn_remainder -= 1.0;

            let lane_id = match self.choose_random(&LaneId::ALL) {
                Some(&id) => id,
                None => break,
            };

            let closest_s = self
                .vehicles
                .iter()
                .filter(|v| v.lane_id == lane_id)
                .map(|v| OrderedFloat(v.s))
                .min();

            if closest_s.is_some_and(|s| s < OrderedFloat(VEHICLE_LENGTH + MIN_GAP)) {
                debug!("spawn dropped, {:?} entry still blocked", lane_id);
                continue;
            }

            let desired_speed = self.random_range(DESIRED_SPEED_MIN..DESIRED_SPEED_MAX)
                * settings.speed_multiplier;

            let id = VehicleId(self.next_vehicle_id);
            self.next_vehicle_id += 1;
            self.vehicles.push(Vehicle::new(id, lane_id, desired_speed));
        }
    }

    /// Update all vehicles for one tick and despawn those past the map edge.
    fn update_vehicles(&mut self, settings: &Settings, dt_secs: f32, dt_ms: u32) {
        // Shared occupancy flag: the sole mutual-exclusion mechanism in
        // off/blink modes. Seeded from the previous tick's flags, then
        // maintained as vehicles enter and leave.
        let mut intersection_occupied = self.vehicles.iter().any(|v| v.in_intersection);

        for lane in &self.lanes {
            // Per-lane order: ascending s, walked back to front so every
            // vehicle observes the already-updated vehicle ahead of it.
            let mut order: Vec<usize> = (0..self.vehicles.len())
                .filter(|&i| self.vehicles[i].lane_id == lane.id)
                .collect();
            order.sort_by_key(|&i| OrderedFloat(self.vehicles[i].s));

            for slot in (0..order.len()).rev() {
                let index = order[slot];

                let lead = order.get(slot + 1).map(|&ahead| {
                    let v = &self.vehicles[ahead];
                    LeadState {
                        s: v.s,
                        length: v.length,
                        speed: v.speed,
                    }
                });

                let target = self.vehicles[index].target_speed(
                    lane,
                    lead,
                    settings,
                    &self.signals,
                    intersection_occupied,
                );
                self.vehicles[index].integrate(target, dt_secs);

                let was_inside = self.vehicles[index].in_intersection;
                let is_inside = self.vehicles[index].is_inside_intersection(lane);
                if is_inside && !was_inside {
                    intersection_occupied = true;
                }
                if !is_inside && was_inside {
                    // Re-scan on exit: another vehicle may still be in the box.
                    let leaving = self.vehicles[index].id;
                    intersection_occupied = self
                        .vehicles
                        .iter()
                        .any(|v| v.id != leaving && v.in_intersection);
                }
                self.vehicles[index].in_intersection = is_inside;

                if self.vehicles[index].classify(target) {
                    self.stopped_total_ticks += 1;
                }

                if self.vehicles[index].has_exited(lane) {
                    self.throughput_events_ms.push(self.time_ms + dt_ms as u64);
                }
            }
        }

        let lanes = &self.lanes;
        self.vehicles
            .retain(|v| !v.has_exited(&lanes[v.lane_id.index()]));
    }

    /// Print a summary of the world state
    pub fn print_summary(&mut self) {
        let metrics = self.sample_metrics();

        println!("=== Junction Simulation Summary ===");
        println!(
            "Tick: {} ({:.1}s simulated)",
            self.tick,
            self.time_ms as f32 / 1000.0
        );
        println!(
            "Signal: {} green ({} ms into phase)",
            self.signals.phase, self.signals.phase_elapsed_ms
        );
        println!(
            "Vehicles: {} active, {} stopped, avg speed {:.1}",
            metrics.active_vehicles, metrics.stopped_vehicles, metrics.avg_speed
        );
        println!(
            "Throughput: {} exits in the last minute",
            metrics.throughput_per_min
        );

        if !self.vehicles.is_empty() {
            println!("--- Active Vehicles ---");
            for vehicle in &self.vehicles {
                println!(
                    "  Vehicle {}: lane={:?}, s={:.1}, speed={:.1}/{:.1}, state={:?}",
                    vehicle.id.0,
                    vehicle.lane_id,
                    vehicle.s,
                    vehicle.speed,
                    vehicle.desired_speed,
                    vehicle.state
                );
            }
        }
    }

    /// Draw a visual map of the junction in the terminal
    pub fn draw_map(&self) {
        // World units per character cell
        let scale = 16.0;
        let cols = (self.width / scale) as usize + 1;
        let rows = (self.height / scale) as usize + 1;

        let mut grid = vec![vec![' '; cols]; rows];

        // Helper to convert world coords to grid coords; points in the
        // offscreen overrun fall outside and are skipped
        let to_grid = |x: f32, y: f32| -> Option<(usize, usize)> {
            if x < 0.0 || y < 0.0 {
                return None;
            }
            let col = (x / scale) as usize;
            let row = (y / scale) as usize;
            if row >= rows || col >= cols {
                return None;
            }
            Some((row, col))
        };

        // Lane guides and stop lines
        for lane in &self.lanes {
            let guide = match lane.axis {
                Axis::Horizontal => '-',
                Axis::Vertical => '|',
            };

            let mut s = 0.0;
            while s <= lane.length {
                let point = lane.point_at(s);
                if let Some((row, col)) = to_grid(point.x, point.y) {
                    if grid[row][col] == ' ' {
                        grid[row][col] = guide;
                    }
                }
                s += scale / 2.0;
            }

            let stop = lane.point_at(lane.stop_line_s);
            if let Some((row, col)) = to_grid(stop.x, stop.y) {
                grid[row][col] = '=';
            }
        }

        // Junction center
        if let Some((row, col)) = to_grid(self.width / 2.0, self.height / 2.0) {
            grid[row][col] = '+';
        }

        // Vehicles last so they overlay the guides
        for vehicle in &self.vehicles {
            let lane = self.lane(vehicle.lane_id);
            let point = lane.point_at(vehicle.s);
            if let Some((row, col)) = to_grid(point.x, point.y) {
                grid[row][col] = match vehicle.lane_id {
                    LaneId::Eastbound => '>',
                    LaneId::Westbound => '<',
                    LaneId::Southbound => 'v',
                    LaneId::Northbound => '^',
                };
            }
        }

        println!("\n=== Junction Map ===");
        println!("Legend: > < v ^ = vehicles, - | = lanes, = = stop line, + = center");
        println!();
        for row in &grid {
            let line: String = row.iter().collect();
            println!("{}", line);
        }
        println!();
    }
}
