/// Fixed timestep accumulator.
/// Keeps the spin simulation on its nominal frame interval regardless of the
/// browser's animation-frame cadence.
pub struct FixedTimestep {
    /// The fixed delta time per tick.
    dt: f32,
    /// Accumulated time from variable frame deltas.
    accumulator: f32,
}

/// Cap on catch-up steps per frame (e.g. after a backgrounded tab resumes).
const MAX_STEPS_PER_FRAME: u32 = 10;

impl FixedTimestep {
    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            accumulator: 0.0,
        }
    }

    /// Add frame time to the accumulator. Returns the number of fixed steps to run.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.max(0.0);
        self.accumulator = self.accumulator.min(self.dt * MAX_STEPS_PER_FRAME as f32);
        let steps = (self.accumulator / self.dt) as u32;
        self.accumulator -= steps as f32 * self.dt;
        steps
    }

    /// The fixed delta time.
    pub fn dt(&self) -> f32 {
        self.dt
    }
}
