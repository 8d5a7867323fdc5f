//! Pressure gauge readout
//!
//! The gauge averages the model's pressure over a sample period and adds a
//! little jitter, so a steady pressure still looks like a live reading. The
//! jitter shrinks as the gas gets hotter.

use rand::Rng;

/// Time over which pressure is averaged before the gauge updates, ps
pub const GAUGE_SAMPLE_PERIOD: f64 = 0.75;

/// Jitter at or above `MAX_JITTER_TEMPERATURE`, kPa
pub const MIN_JITTER: f64 = 0.1;

/// Jitter at or below `MIN_JITTER_TEMPERATURE`, kPa
pub const MAX_JITTER: f64 = 5.0;

const MIN_JITTER_TEMPERATURE: f64 = 50.0;
const MAX_JITTER_TEMPERATURE: f64 = 1000.0;

const KILOPASCALS_PER_ATMOSPHERE: f64 = 101.325;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PressureUnits {
    #[default]
    Kilopascals,
    Atmospheres,
}

impl PressureUnits {
    pub fn from_kilopascals(self, kilopascals: f64) -> f64 {
        match self {
            PressureUnits::Kilopascals => kilopascals,
            PressureUnits::Atmospheres => kilopascals / KILOPASCALS_PER_ATMOSPHERE,
        }
    }
}

/// Jitter magnitude for a gas at `temperature`, kPa. Falls linearly from
/// MAX_JITTER to MIN_JITTER across the jitter temperature range.
pub fn jitter_magnitude(temperature: f64) -> f64 {
    let t = ((temperature - MIN_JITTER_TEMPERATURE) / (MAX_JITTER_TEMPERATURE - MIN_JITTER_TEMPERATURE)).clamp(0.0, 1.0);
    MAX_JITTER + t * (MIN_JITTER - MAX_JITTER)
}

#[derive(Debug, Clone, Default)]
pub struct PressureGauge {
    units: PressureUnits,
    elapsed: f64,
    weighted_sum: f64,
    /// Displayed pressure, kPa
    pressure: f64,
}

impl PressureGauge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the reading, keeping the selected units
    pub fn reset(&mut self) {
        *self = Self {
            units: self.units,
            ..Self::default()
        };
    }

    pub fn units(&self) -> PressureUnits {
        self.units
    }

    pub fn set_units(&mut self, units: PressureUnits) {
        self.units = units;
    }

    /// Displayed pressure, kPa
    pub fn pressure(&self) -> f64 {
        self.pressure
    }

    /// Displayed pressure in the selected units
    pub fn reading(&self) -> f64 {
        self.units.from_kilopascals(self.pressure)
    }

    /// Time into the current sample period, ps
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Samples `pressure` (kPa) over a step of `dt` ps. Returns true when the
    /// displayed value was updated.
    ///
    /// Zero pressure is shown immediately and without jitter. Jitter is also
    /// left off while pressure is being held constant.
    pub fn step<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        dt: f64,
        pressure: f64,
        temperature: Option<f64>,
        jitter_enabled: bool,
    ) -> bool {
        if pressure == 0.0 {
            let changed = self.pressure != 0.0;
            self.pressure = 0.0;
            self.restart_sample();
            return changed;
        }

        self.elapsed += dt;
        self.weighted_sum += pressure * dt;
        if self.elapsed < GAUGE_SAMPLE_PERIOD {
            return false;
        }

        let average = self.weighted_sum / self.elapsed;
        let jitter = match temperature {
            Some(temperature) if jitter_enabled => {
                let sign = if rng.random::<bool>() { 1.0 } else { -1.0 };
                sign * jitter_magnitude(temperature)
            }
            _ => 0.0,
        };
        self.pressure = (average + jitter).max(0.0);
        self.restart_sample();
        true
    }

    fn restart_sample(&mut self) {
        self.elapsed = 0.0;
        self.weighted_sum = 0.0;
    }
}
