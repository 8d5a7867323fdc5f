//! Physical constants for the gas simulation
//!
//! All quantities use simulation units: picometers (pm), picoseconds (ps),
//! atomic mass units (AMU) and kelvin (K). In these units 1 pm/ps is exactly
//! 1 m/s, so particle speeds read like real molecular speeds.

/// Boltzmann constant, (pm² * AMU) / (ps² * K)
/// k = 1.380649e-23 J/K divided by 1 AMU * pm²/ps² = 1.66054e-27 J
pub const BOLTZMANN: f64 = 8314.46;

/// Multiplier converting pressure from AMU / (pm * ps²) to kPa
pub const PRESSURE_CONVERSION_SCALE: f64 = 1.66e6;

/// Heavy particle mass, AMU (roughly N₂)
pub const HEAVY_PARTICLE_MASS: f64 = 28.0;

/// Heavy particle radius, pm
pub const HEAVY_PARTICLE_RADIUS: f64 = 125.0;

/// Light particle mass, AMU (roughly He)
pub const LIGHT_PARTICLE_MASS: f64 = 4.0;

/// Light particle radius, pm
pub const LIGHT_PARTICLE_RADIUS: f64 = 62.5;

/// Below this distance two particle centers are treated as coincident
/// and no contact normal exists.
pub const COINCIDENT_DISTANCE: f64 = 1e-9;

/// Root-mean-square speed |v| = sqrt(3kT / m) of a particle with the given
/// mass at the given temperature.
pub fn rms_speed(temperature: f64, mass: f64) -> f64 {
    debug_assert!(temperature >= 0.0, "invalid temperature: {temperature}");
    debug_assert!(mass > 0.0, "invalid mass: {mass}");
    (3.0 * BOLTZMANN * temperature / mass).sqrt()
}

/// Temperature corresponding to an average kinetic energy: T = (2/3) KE / k
pub fn temperature_from_kinetic_energy(average_kinetic_energy: f64) -> f64 {
    (2.0 / 3.0) * average_kinetic_energy / BOLTZMANN
}

/// Average kinetic energy corresponding to a temperature: KE = (3/2) kT
pub fn kinetic_energy_from_temperature(temperature: f64) -> f64 {
    1.5 * BOLTZMANN * temperature
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn nitrogen_speed_is_realistic() {
        // ~517 m/s for N₂ at room temperature
        let v = rms_speed(300.0, HEAVY_PARTICLE_MASS);
        assert!(v > 500.0 && v < 530.0, "v = {v}");
    }

    #[test]
    fn temperature_and_kinetic_energy_are_inverse() {
        let ke = kinetic_energy_from_temperature(412.0);
        assert_relative_eq!(temperature_from_kinetic_energy(ke), 412.0, max_relative = 1e-12);
    }

    #[test]
    fn rms_speed_reproduces_temperature() {
        let mass = LIGHT_PARTICLE_MASS;
        let v = rms_speed(250.0, mass);
        let ke = 0.5 * mass * v * v;
        assert_relative_eq!(temperature_from_kinetic_energy(ke), 250.0, max_relative = 1e-12);
    }
}
