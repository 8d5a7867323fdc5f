//! Play/pause and conversion from wall-clock seconds to model picoseconds

/// Seconds of real time per frame when single-stepping
pub const SINGLE_STEP_SECONDS: f64 = 1.0 / 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Timescale {
    #[default]
    Normal,
    Slow,
}

impl Timescale {
    /// Model time per second of real time, ps
    pub fn picoseconds_per_second(self) -> f64 {
        match self {
            Timescale::Normal => 2.5,
            Timescale::Slow => 0.25,
        }
    }

    /// Converts real seconds to model picoseconds
    pub fn model_time(self, seconds: f64) -> f64 {
        seconds * self.picoseconds_per_second()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeControls {
    pub playing: bool,
    pub timescale: Timescale,
}

impl Default for TimeControls {
    fn default() -> Self {
        Self {
            playing: true,
            timescale: Timescale::Normal,
        }
    }
}

impl TimeControls {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Model time to step for `seconds` of real time, or None while paused
    pub fn step_time(&self, seconds: f64) -> Option<f64> {
        self.playing.then(|| self.timescale.model_time(seconds))
    }

    /// Model time for one manual step, taken regardless of pause state
    pub fn single_step_time(&self) -> f64 {
        self.timescale.model_time(SINGLE_STEP_SECONDS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn timescales() {
        assert_relative_eq!(Timescale::Normal.model_time(2.0), 5.0);
        assert_relative_eq!(Timescale::Slow.model_time(2.0), 0.5);
    }

    #[test]
    fn paused_controls_do_not_step() {
        let mut time = TimeControls::default();
        assert_eq!(time.step_time(1.0), Some(2.5));
        time.playing = false;
        assert_eq!(time.step_time(1.0), None);
        assert_relative_eq!(time.single_step_time(), 2.5 / 60.0);
    }
}
