//! Counts particle-container collisions over a sample period

/// How long the counter accumulates before publishing a count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SamplePeriod {
    Five,
    #[default]
    Ten,
    Twenty,
}

impl SamplePeriod {
    pub const ALL: [SamplePeriod; 3] = [SamplePeriod::Five, SamplePeriod::Ten, SamplePeriod::Twenty];

    /// Length of the period, ps
    pub fn duration(self) -> f64 {
        match self {
            SamplePeriod::Five => 5.0,
            SamplePeriod::Ten => 10.0,
            SamplePeriod::Twenty => 20.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CollisionCounter {
    running: bool,
    sample_period: SamplePeriod,
    elapsed: f64,
    accumulated: usize,
    number_of_collisions: usize,
}

impl CollisionCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Starting clears the previous count and begins a fresh sample
    pub fn set_running(&mut self, running: bool) {
        if running && !self.running {
            self.number_of_collisions = 0;
            self.restart_sample();
        }
        self.running = running;
    }

    pub fn sample_period(&self) -> SamplePeriod {
        self.sample_period
    }

    pub fn set_sample_period(&mut self, sample_period: SamplePeriod) {
        if sample_period != self.sample_period {
            self.sample_period = sample_period;
            self.number_of_collisions = 0;
            self.restart_sample();
        }
    }

    /// Time into the current sample, ps
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Count published at the end of the last complete sample
    pub fn number_of_collisions(&self) -> usize {
        self.number_of_collisions
    }

    /// Adds the collisions detected during a step of `dt` ps
    pub fn step(&mut self, dt: f64, particle_container_collisions: usize) {
        if !self.running {
            return;
        }
        self.elapsed += dt;
        self.accumulated += particle_container_collisions;
        if self.elapsed >= self.sample_period.duration() {
            self.number_of_collisions = self.accumulated;
            log::debug!(
                "{} wall collisions in {:.2} ps",
                self.number_of_collisions,
                self.elapsed
            );
            self.restart_sample();
        }
    }

    fn restart_sample(&mut self) {
        self.elapsed = 0.0;
        self.accumulated = 0;
    }
}
