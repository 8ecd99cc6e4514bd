//! Fixed-timestep accumulator
//!
//! Converts variable real-time frame deltas into zero or more fixed
//! logical steps, keeping the simulation deterministic regardless of how
//! irregularly the external driver calls in. Frame deltas are capped so a
//! long stall cannot trigger a catch-up spiral.

/// Length of one logical simulation step
pub const FIXED_STEP_MS: u32 = 100;

/// Largest frame delta the accumulator will accept
pub const MAX_FRAME_MS: u64 = 1000;

/// Accumulates wall-clock time and pays it out in fixed steps
#[derive(Debug, Clone, Default)]
pub struct FixedStepper {
    accumulator_ms: u64,
}

impl FixedStepper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed an elapsed real-time delta and get back how many fixed steps
    /// to run. The remainder stays accumulated for the next call.
    pub fn advance(&mut self, elapsed_ms: u64) -> u32 {
        self.accumulator_ms += elapsed_ms.min(MAX_FRAME_MS);
        let steps = self.accumulator_ms / FIXED_STEP_MS as u64;
        self.accumulator_ms -= steps * FIXED_STEP_MS as u64;
        steps as u32
    }

    /// Drop any accumulated time, e.g. after a reset or unpause.
    pub fn reset(&mut self) {
        self.accumulator_ms = 0;
    }
}
