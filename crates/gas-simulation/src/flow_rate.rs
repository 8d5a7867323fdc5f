//! Rate at which particles cross the divider line

use std::collections::VecDeque;

use gas_physics::Particle;

#[derive(Debug, Clone, Copy, PartialEq)]
struct FlowSample {
    dt: f64,
    left_to_right: usize,
    right_to_left: usize,
}

/// Particles/ps crossing `divider_x` in each direction, averaged over a
/// sliding window of model time.
#[derive(Debug, Clone)]
pub struct ParticleFlowRate {
    divider_x: f64,
    averaging_period: f64,
    samples: VecDeque<FlowSample>,
    left_to_right: f64,
    right_to_left: f64,
}

impl ParticleFlowRate {
    pub fn new(divider_x: f64, averaging_period: f64) -> Self {
        debug_assert!(averaging_period > 0.0, "invalid averaging period: {averaging_period}");
        Self {
            divider_x,
            averaging_period,
            samples: VecDeque::new(),
            left_to_right: 0.0,
            right_to_left: 0.0,
        }
    }

    pub fn reset(&mut self) {
        self.samples.clear();
        self.left_to_right = 0.0;
        self.right_to_left = 0.0;
    }

    pub fn left_to_right(&self) -> f64 {
        self.left_to_right
    }

    pub fn right_to_left(&self) -> f64 {
        self.right_to_left
    }

    /// Records the crossings made by `particles` during their last step of `dt` ps
    pub fn step(&mut self, particles: &[Particle], dt: f64) {
        debug_assert!(dt > 0.0, "invalid dt: {dt}");
        let mut sample = FlowSample {
            dt,
            left_to_right: 0,
            right_to_left: 0,
        };
        for particle in particles {
            let was_left = particle.previous_position.x < self.divider_x;
            let is_left = particle.position.x < self.divider_x;
            match (was_left, is_left) {
                (true, false) => sample.left_to_right += 1,
                (false, true) => sample.right_to_left += 1,
                _ => {}
            }
        }
        self.samples.push_back(sample);

        // drop samples that have fallen out of the window, keeping the newest
        let mut total_dt: f64 = self.samples.iter().map(|s| s.dt).sum();
        while self.samples.len() > 1 && total_dt > self.averaging_period {
            if let Some(oldest) = self.samples.pop_front() {
                total_dt -= oldest.dt;
            }
        }

        let (l2r, r2l) = self
            .samples
            .iter()
            .fold((0, 0), |(l, r), s| (l + s.left_to_right, r + s.right_to_left));
        self.left_to_right = l2r as f64 / total_dt;
        self.right_to_left = r2l as f64 / total_dt;
    }
}
