use bevy::prelude::Resource;

/// Fixed-step accumulator: turns variable frame times into whole physics steps.
#[derive(Resource, Default, Debug)]
pub struct StepClock {
    accumulator: f32,
}

impl StepClock {
    /// Returns how many `fixed` steps to run for a frame of length `dt`.
    pub fn advance(&mut self, dt: f32, fixed: f32, max_substeps: u32) -> u32 {
        if fixed <= 0.0 || !dt.is_finite() || dt <= 0.0 {
            return 0;
        }
        self.accumulator += dt;
        let mut steps = 0;
        while self.accumulator >= fixed && steps < max_substeps {
            self.accumulator -= fixed;
            steps += 1;
        }
        // Too far behind: drop the backlog instead of spiralling.
        if self.accumulator >= fixed {
            self.accumulator %= fixed;
        }
        steps
    }

    pub fn pending(&self) -> f32 {
        self.accumulator
    }
}
