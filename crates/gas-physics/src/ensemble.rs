//! Operations on collections of particles

use crate::bounds::Bounds;
use crate::constants::{kinetic_energy_from_temperature, temperature_from_kinetic_energy};
use crate::container::IdealGasContainer;
use crate::particle::Particle;

pub fn step_particles(particles: &mut [Particle], dt: f64) {
    for particle in particles {
        particle.step(dt);
    }
}

/// Scales every velocity by `1 + heat_cool_factor / scale`.
/// `heat_cool_factor` is in [-1, 1]: 1 is max heat, -1 max cool.
pub fn heat_cool_particles(particles: &mut [Particle], heat_cool_factor: f64, scale: f64) {
    debug_assert!((-1.0..=1.0).contains(&heat_cool_factor), "invalid heat_cool_factor: {heat_cool_factor}");
    debug_assert!(scale > 1.0, "invalid heat/cool scale: {scale}");
    let velocity_scale = 1.0 + heat_cool_factor / scale;
    for particle in particles {
        particle.scale_velocity(velocity_scale);
    }
}

/// Total kinetic energy, AMU * pm² / ps²
pub fn total_kinetic_energy(particles: &[Particle]) -> f64 {
    particles.iter().map(Particle::kinetic_energy).sum()
}

/// Temperature of a collection, or None if it is empty
pub fn temperature(particles: &[Particle]) -> Option<f64> {
    if particles.is_empty() {
        None
    } else {
        Some(temperature_from_kinetic_energy(
            total_kinetic_energy(particles) / particles.len() as f64,
        ))
    }
}

/// x coordinate of the center of mass, or None if the collection is empty
pub fn center_x_of_mass(particles: &[Particle]) -> Option<f64> {
    if particles.is_empty() {
        return None;
    }
    let (moment, mass) = particles
        .iter()
        .fold((0.0, 0.0), |(moment, mass), p| (moment + p.position.x * p.mass, mass + p.mass));
    Some(moment / mass)
}

/// Removes `n` particles from the end of the collection
pub fn remove_particles(particles: &mut Vec<Particle>, n: usize) {
    debug_assert!(n <= particles.len(), "cannot remove {n} of {} particles", particles.len());
    let keep = particles.len().saturating_sub(n);
    particles.truncate(keep);
}

/// Removes particles that lie entirely outside `bounds`.
/// Returns how many were removed.
pub fn remove_out_of_bounds(particles: &mut Vec<Particle>, bounds: &Bounds) -> usize {
    let before = particles.len();
    particles.retain(|p| {
        p.right() >= bounds.min_x()
            && p.left() <= bounds.max_x()
            && p.top() >= bounds.min_y()
            && p.bottom() <= bounds.max_y()
    });
    before - particles.len()
}

/// Moves particles that have escaped through the container's opening from
/// `inside` to `outside`, keeping the order of both. Returns how many escaped.
///
/// The escape test runs against the unmodified inside collection, then both
/// collections are rebuilt in a single pass.
pub fn escape_particles(
    container: &IdealGasContainer,
    inside: &mut Vec<Particle>,
    outside: &mut Vec<Particle>,
) -> usize {
    if !inside.iter().any(|p| container.is_escaping(p)) {
        return 0;
    }
    let (escaping, staying): (Vec<Particle>, Vec<Particle>) =
        inside.drain(..).partition(|p| container.is_escaping(p));
    *inside = staying;
    let escaped = escaping.len();
    outside.extend(escaping);
    log::debug!("{escaped} particles escaped through the lid");
    escaped
}

/// Scales each particle's distance from `right` by `ratio`, keeping the
/// particles spread over a resized container.
pub fn redistribute_particles(particles: &mut [Particle], right: f64, ratio: f64) {
    debug_assert!(ratio > 0.0, "invalid ratio: {ratio}");
    for particle in particles {
        let x = right - (right - particle.position.x) * ratio;
        particle.set_position(x, particle.position.y);
    }
}

/// Rescales speeds (directions preserved) so that the average kinetic energy
/// across all `sets` corresponds to `temperature`. Returns false if the
/// particles have no kinetic energy to scale.
pub fn set_temperature(sets: &mut [&mut [Particle]], temperature: f64) -> bool {
    debug_assert!(temperature >= 0.0 && temperature.is_finite(), "invalid temperature: {temperature}");
    let count: usize = sets.iter().map(|set| set.len()).sum();
    let total: f64 = sets.iter().map(|set| total_kinetic_energy(set)).sum();
    if count == 0 || total <= 0.0 {
        return false;
    }
    let ratio = kinetic_energy_from_temperature(temperature) / (total / count as f64);
    let speed_scale = ratio.sqrt();
    for set in sets.iter_mut() {
        for particle in set.iter_mut() {
            particle.scale_velocity(speed_scale);
        }
    }
    true
}
