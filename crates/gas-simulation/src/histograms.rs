//! Speed and kinetic-energy histograms of the particles inside the container
//!
//! Bin counts are sampled every step and averaged over a sample period, so
//! the published histograms change smoothly rather than flickering per frame.

use gas_physics::Particle;

/// Bins per histogram
pub const NUMBER_OF_BINS: usize = 19;

/// Width of a speed bin, pm/ps
pub const SPEED_BIN_WIDTH: f64 = 100.0;

/// Width of a kinetic-energy bin, AMU * pm² / ps²
pub const KINETIC_ENERGY_BIN_WIDTH: f64 = 1.0e6;

/// Time over which bin counts are averaged before publishing, ps
pub const HISTOGRAM_SAMPLE_PERIOD: f64 = 1.0;

/// Bin counts for all particles and for each species. Counts are averages
/// over a sample period, so they need not be whole numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct BinCounts {
    pub all: Vec<f64>,
    pub heavy: Vec<f64>,
    pub light: Vec<f64>,
}

impl BinCounts {
    fn zeroed() -> Self {
        Self {
            all: vec![0.0; NUMBER_OF_BINS],
            heavy: vec![0.0; NUMBER_OF_BINS],
            light: vec![0.0; NUMBER_OF_BINS],
        }
    }

    fn accumulate(&mut self, heavy: &[Particle], light: &[Particle], value: fn(&Particle) -> f64, bin_width: f64) {
        let heavy_counts = bin_counts(heavy.iter().map(value), bin_width);
        let light_counts = bin_counts(light.iter().map(value), bin_width);
        for i in 0..NUMBER_OF_BINS {
            self.heavy[i] += heavy_counts[i] as f64;
            self.light[i] += light_counts[i] as f64;
            self.all[i] += (heavy_counts[i] + light_counts[i]) as f64;
        }
    }

    fn averaged(&self, samples: usize) -> Self {
        let divide = |counts: &[f64]| -> Vec<f64> { counts.iter().map(|c| c / samples as f64).collect() };
        Self {
            all: divide(&self.all),
            heavy: divide(&self.heavy),
            light: divide(&self.light),
        }
    }

    /// Sum over every bin of `all`
    pub fn total(&self) -> f64 {
        self.all.iter().sum()
    }
}

/// Counts `values` into bins of `bin_width` starting at zero. Values past the
/// last bin are not shown on the histogram and are dropped.
pub fn bin_counts(values: impl Iterator<Item = f64>, bin_width: f64) -> [usize; NUMBER_OF_BINS] {
    debug_assert!(bin_width > 0.0, "invalid bin width: {bin_width}");
    let mut counts = [0; NUMBER_OF_BINS];
    for value in values {
        let index = (value / bin_width).floor();
        if index >= 0.0 && (index as usize) < NUMBER_OF_BINS {
            counts[index as usize] += 1;
        }
    }
    counts
}

#[derive(Debug, Clone)]
pub struct Histograms {
    elapsed: f64,
    number_of_samples: usize,
    speed_sums: BinCounts,
    kinetic_energy_sums: BinCounts,
    speed: BinCounts,
    kinetic_energy: BinCounts,
}

impl Default for Histograms {
    fn default() -> Self {
        Self {
            elapsed: 0.0,
            number_of_samples: 0,
            speed_sums: BinCounts::zeroed(),
            kinetic_energy_sums: BinCounts::zeroed(),
            speed: BinCounts::zeroed(),
            kinetic_energy: BinCounts::zeroed(),
        }
    }
}

impl Histograms {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Speed bin counts published at the end of the last sample period
    pub fn speed(&self) -> &BinCounts {
        &self.speed
    }

    /// Kinetic-energy bin counts published at the end of the last sample period
    pub fn kinetic_energy(&self) -> &BinCounts {
        &self.kinetic_energy
    }

    /// Time into the current sample period, ps
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Samples the particles after a step of `dt` ps. Returns true when a
    /// sample period completed and new bin counts were published.
    pub fn step(&mut self, dt: f64, heavy: &[Particle], light: &[Particle]) -> bool {
        self.elapsed += dt;
        self.sample(heavy, light);
        if self.elapsed < HISTOGRAM_SAMPLE_PERIOD {
            return false;
        }
        self.publish();
        true
    }

    /// Publishes the current particles as a single sample, for when the
    /// particles change while time is paused.
    pub fn update_now(&mut self, heavy: &[Particle], light: &[Particle]) {
        self.restart_sample();
        self.sample(heavy, light);
        self.publish();
    }

    fn sample(&mut self, heavy: &[Particle], light: &[Particle]) {
        self.speed_sums.accumulate(heavy, light, Particle::speed, SPEED_BIN_WIDTH);
        self.kinetic_energy_sums
            .accumulate(heavy, light, Particle::kinetic_energy, KINETIC_ENERGY_BIN_WIDTH);
        self.number_of_samples += 1;
    }

    fn publish(&mut self) {
        self.speed = self.speed_sums.averaged(self.number_of_samples);
        self.kinetic_energy = self.kinetic_energy_sums.averaged(self.number_of_samples);
        log::debug!(
            "Histograms published from {} samples over {:.2} ps",
            self.number_of_samples,
            self.elapsed
        );
        self.restart_sample();
    }

    fn restart_sample(&mut self) {
        self.elapsed = 0.0;
        self.number_of_samples = 0;
        self.speed_sums = BinCounts::zeroed();
        self.kinetic_energy_sums = BinCounts::zeroed();
    }
}
