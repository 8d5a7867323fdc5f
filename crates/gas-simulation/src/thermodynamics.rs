//! Ideal gas law, PV = NkT, in simulation units
//!
//! Pressures are in kPa; conversion to and from AMU/(pm·ps²) happens here.

use gas_physics::{ensemble, Particle, BOLTZMANN, PRESSURE_CONVERSION_SCALE};
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Temperature of everything in `sets`, or None if they are all empty
pub fn compute_temperature(sets: &[&[Particle]]) -> Option<f64> {
    let count: usize = sets.iter().map(|set| set.len()).sum();
    if count == 0 {
        return None;
    }
    let total: f64 = sets.iter().map(|set| ensemble::total_kinetic_energy(set)).sum();
    Some(gas_physics::temperature_from_kinetic_energy(total / count as f64))
}

/// P = NkT/V, kPa
pub fn compute_pressure(number_of_particles: usize, temperature: f64, volume: f64) -> f64 {
    debug_assert!(temperature >= 0.0, "invalid temperature: {temperature}");
    debug_assert!(volume > 0.0, "invalid volume: {volume}");
    number_of_particles as f64 * BOLTZMANN * temperature / volume * PRESSURE_CONVERSION_SCALE
}

/// V = NkT/P, pm³
pub fn compute_volume(number_of_particles: usize, temperature: f64, pressure: f64) -> f64 {
    debug_assert!(pressure > 0.0, "zero pressure not supported");
    number_of_particles as f64 * BOLTZMANN * temperature / (pressure / PRESSURE_CONVERSION_SCALE)
}

/// T = PV/(Nk), K
pub fn compute_desired_temperature(number_of_particles: usize, pressure: f64, volume: f64) -> f64 {
    debug_assert!(pressure > 0.0, "zero pressure not supported");
    debug_assert!(number_of_particles > 0, "empty container not supported");
    (pressure / PRESSURE_CONVERSION_SCALE) * volume / (number_of_particles as f64 * BOLTZMANN)
}

/// Draws `n` values from a Gaussian, then shifts them all so their mean is
/// exactly `mean` (to within `threshold`).
///
/// Falls back to `n` copies of `mean` if `deviation` is not a valid
/// standard deviation.
pub fn gaussian_values<R: Rng + ?Sized>(rng: &mut R, n: usize, mean: f64, deviation: f64, threshold: f64) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    let normal = match Normal::new(mean, deviation) {
        Ok(normal) => normal,
        Err(err) => {
            log::warn!("Cannot sample Gaussian with deviation {deviation}: {err}");
            return vec![mean; n];
        }
    };

    let mut values: Vec<f64> = (0..n).map(|_| normal.sample(rng)).collect();
    let emergent_mean = values.iter().sum::<f64>() / n as f64;
    let delta = mean - emergent_mean;
    for value in &mut values {
        *value += delta;
    }

    debug_assert!(
        (values.iter().sum::<f64>() / n as f64 - mean).abs() < threshold,
        "mean of Gaussian values differs from {mean}"
    );
    values
}
