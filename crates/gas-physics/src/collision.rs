//! Collision detection and response
//!
//! Particle-particle collisions are tested only between particles that share
//! a region. Pairs are processed in region order and each pair is resolved at
//! most once per contact: after resolution the pair is separating, so a
//! duplicate test from an overlapping region is a no-op. When one particle
//! overlaps several others in the same step, the first pair found wins and the
//! rest are resolved against the already-updated velocity. With a step that is
//! short compared to particle size these triple contacts are rare.

use crate::constants::COINCIDENT_DISTANCE;
use crate::container::Walls;
use crate::error::ConfigError;
use crate::particle::Particle;
use crate::region::{ParticleKey, Region, RegionConfig, RegionGrid};

/// Collisions found by one `CollisionDetector::update`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionCounts {
    pub particle_particle: usize,
    pub particle_container: usize,
}

/// Detects and resolves collisions for particles inside a container
#[derive(Debug, Clone)]
pub struct CollisionDetector {
    grid: RegionGrid,
    particle_particle_collisions_enabled: bool,
    counts: CollisionCounts,
}

impl CollisionDetector {
    pub fn new(config: RegionConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            grid: RegionGrid::new(config)?,
            particle_particle_collisions_enabled: true,
            counts: CollisionCounts::default(),
        })
    }

    pub fn reset(&mut self) {
        self.grid.clear();
        self.counts = CollisionCounts::default();
    }

    pub fn regions(&self) -> &[Region] {
        self.grid.regions()
    }

    pub fn particle_particle_collisions_enabled(&self) -> bool {
        self.particle_particle_collisions_enabled
    }

    pub fn set_particle_particle_collisions_enabled(&mut self, enabled: bool) {
        self.particle_particle_collisions_enabled = enabled;
    }

    /// Counts from the most recent update
    pub fn counts(&self) -> CollisionCounts {
        self.counts
    }

    pub fn number_of_particle_container_collisions(&self) -> usize {
        self.counts.particle_container
    }

    /// Resolves collisions among `particle_sets` and against `walls`.
    ///
    /// Only particles inside the container belong here; escaped particles fly
    /// freely and never collide.
    pub fn update<W: Walls + ?Sized>(&mut self, walls: &W, particle_sets: &mut [&mut [Particle]]) -> CollisionCounts {
        self.grid.ensure_bounds(walls.bounds());
        {
            let views: Vec<&[Particle]> = particle_sets.iter().map(|set| &**set).collect();
            self.grid.assign(&views);
        }

        let mut counts = CollisionCounts::default();

        if self.particle_particle_collisions_enabled {
            for region in self.grid.regions() {
                let keys = region.particles();
                for (i, &a) in keys.iter().enumerate() {
                    for &b in &keys[i + 1..] {
                        let (p1, p2) = pair_mut(particle_sets, a, b);
                        if walls.separated(p1.position, p2.position) {
                            continue;
                        }
                        if resolve_particle_collision(p1, p2) {
                            counts.particle_particle += 1;
                        }
                    }
                }
            }
        }

        for set in particle_sets.iter_mut() {
            for particle in set.iter_mut() {
                counts.particle_container += collide_with_walls(walls, particle);
            }
        }

        self.counts = counts;
        counts
    }
}

/// Two distinct particles borrowed mutably at once
fn pair_mut<'a>(
    sets: &'a mut [&mut [Particle]],
    a: ParticleKey,
    b: ParticleKey,
) -> (&'a mut Particle, &'a mut Particle) {
    debug_assert!(a != b, "a particle cannot collide with itself");
    if a.set == b.set {
        let set = &mut *sets[a.set];
        if a.index < b.index {
            let (lo, hi) = set.split_at_mut(b.index);
            (&mut lo[a.index], &mut hi[0])
        } else {
            let (lo, hi) = set.split_at_mut(a.index);
            (&mut hi[0], &mut lo[b.index])
        }
    } else if a.set < b.set {
        let (lo, hi) = sets.split_at_mut(b.set);
        (&mut lo[a.set][a.index], &mut hi[0][b.index])
    } else {
        let (lo, hi) = sets.split_at_mut(a.set);
        (&mut hi[0][a.index], &mut lo[b.set][b.index])
    }
}

/// Elastic collision between two overlapping disks
///
/// Velocities are split into components along the line of centers and
/// perpendicular to it. The normal components follow the 1D elastic
/// collision formula, the perpendicular components are unchanged. The disks
/// are then pushed apart along the normal, lighter one further, until they
/// just touch.
///
/// Returns false without touching either particle when they do not overlap,
/// are not approaching, or share a center.
pub fn resolve_particle_collision(p1: &mut Particle, p2: &mut Particle) -> bool {
    let delta = p1.position - p2.position;
    let distance = delta.length();
    let contact_distance = p1.radius + p2.radius;
    if distance >= contact_distance || distance < COINCIDENT_DISTANCE {
        return false;
    }

    // unit normal, pointing from p2 to p1
    let normal = delta / distance;
    if (p1.velocity - p2.velocity).dot(normal) >= 0.0 {
        return false;
    }

    let (m1, m2) = (p1.mass, p2.mass);
    let total_mass = m1 + m2;
    let v1n = p1.velocity.dot(normal);
    let v2n = p2.velocity.dot(normal);
    let v1n_after = (v1n * (m1 - m2) + 2.0 * m2 * v2n) / total_mass;
    let v2n_after = (v2n * (m2 - m1) + 2.0 * m1 * v1n) / total_mass;
    p1.velocity += normal * (v1n_after - v1n);
    p2.velocity += normal * (v2n_after - v2n);

    let overlap = contact_distance - distance;
    p1.position += normal * (overlap * m2 / total_mass);
    p2.position -= normal * (overlap * m1 / total_mass);

    true
}

/// Keeps a particle inside its walls. Returns the number of walls it hit.
///
/// A particle past a wall is moved back against it. Its velocity is
/// reflected only if it is heading into the wall; a particle already moving
/// away is just clamped and not counted.
pub fn collide_with_walls<W: Walls + ?Sized>(walls: &W, particle: &mut Particle) -> usize {
    let bounds = walls.wall_bounds_for(particle);
    let mut hits = 0;

    if particle.left() < bounds.min_x() {
        particle.position.x = bounds.min_x() + particle.radius;
        let wall_velocity = walls.left_wall_velocity();
        if walls.left_wall_does_work() {
            // reflect in the wall's frame: v' = 2·vw - v
            if particle.velocity.x < wall_velocity {
                particle.velocity.x = 2.0 * wall_velocity - particle.velocity.x;
                hits += 1;
            }
        } else if particle.velocity.x < 0.0 {
            particle.velocity.x = -particle.velocity.x;
            hits += 1;
        }
    } else if particle.right() > bounds.max_x() {
        particle.position.x = bounds.max_x() - particle.radius;
        if particle.velocity.x > 0.0 {
            particle.velocity.x = -particle.velocity.x;
            hits += 1;
        }
    }

    if particle.bottom() < bounds.min_y() {
        particle.position.y = bounds.min_y() + particle.radius;
        if particle.velocity.y < 0.0 {
            particle.velocity.y = -particle.velocity.y;
            hits += 1;
        }
    } else if particle.top() > bounds.max_y() {
        particle.position.y = bounds.max_y() - particle.radius;
        if particle.velocity.y > 0.0 {
            particle.velocity.y = -particle.velocity.y;
            hits += 1;
        }
    }

    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::Bounds;
    use crate::container::{ContainerConfig, IdealGasContainer};
    use crate::particle::Species;
    use approx::assert_relative_eq;
    use glam::DVec2;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    /// Static box used by most tests
    struct Box2 {
        bounds: Bounds,
        left_wall_velocity: f64,
        does_work: bool,
    }

    impl Box2 {
        fn new() -> Self {
            Self {
                bounds: Bounds::new(-1000.0, 0.0, 0.0, 1000.0),
                left_wall_velocity: 0.0,
                does_work: false,
            }
        }
    }

    impl Walls for Box2 {
        fn bounds(&self) -> Bounds {
            self.bounds
        }

        fn left_wall_velocity(&self) -> f64 {
            self.left_wall_velocity
        }

        fn left_wall_does_work(&self) -> bool {
            self.does_work
        }
    }

    fn total_energy(particles: &[Particle]) -> f64 {
        particles.iter().map(Particle::kinetic_energy).sum()
    }

    fn total_momentum(particles: &[Particle]) -> DVec2 {
        particles.iter().map(Particle::momentum).sum()
    }

    #[test]
    fn head_on_equal_masses_exchange_velocities() {
        let mut a = Particle::new(Species::Heavy, 28.0, 100.0).at(0.0, 0.0).moving(50.0, 0.0);
        let mut b = Particle::new(Species::Heavy, 28.0, 100.0).at(199.0, 0.0).moving(-50.0, 0.0);
        assert!(resolve_particle_collision(&mut a, &mut b));
        assert_relative_eq!(a.velocity.x, -50.0, epsilon = 1e-9);
        assert_relative_eq!(b.velocity.x, 50.0, epsilon = 1e-9);
        assert_relative_eq!(a.velocity.y, 0.0, epsilon = 1e-9);
        // pushed apart until touching
        assert_relative_eq!(a.position.distance(b.position), 200.0, epsilon = 1e-9);
    }

    #[test]
    fn oblique_collision_conserves_energy_and_momentum() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let mut a = Particle::new(Species::Heavy, rng.random_range(1.0..40.0), 60.0)
                .at(0.0, 0.0)
                .moving(rng.random_range(-600.0..600.0), rng.random_range(-600.0..600.0));
            let angle = rng.random_range(0.0..std::f64::consts::TAU);
            let offset = DVec2::from_angle(angle) * rng.random_range(10.0..119.0);
            let mut b = Particle::new(Species::Light, rng.random_range(1.0..40.0), 60.0)
                .at(offset.x, offset.y)
                .moving(rng.random_range(-600.0..600.0), rng.random_range(-600.0..600.0));

            let before = [a, b];
            if resolve_particle_collision(&mut a, &mut b) {
                let after = [a, b];
                assert_relative_eq!(total_energy(&after), total_energy(&before), max_relative = 1e-9);
                let (p0, p1) = (total_momentum(&before), total_momentum(&after));
                assert_relative_eq!(p0.x, p1.x, epsilon = 1e-5);
                assert_relative_eq!(p0.y, p1.y, epsilon = 1e-5);
                assert!(!a.overlaps(&b) || a.position.distance(b.position) > 119.999);
            }
        }
    }

    #[test]
    fn separating_or_resting_pairs_are_left_alone() {
        let mut a = Particle::new_heavy().at(0.0, 0.0).moving(-10.0, 0.0);
        let mut b = Particle::new_heavy().at(100.0, 0.0).moving(10.0, 0.0);
        assert!(!resolve_particle_collision(&mut a, &mut b));

        let mut a = Particle::new_heavy().at(0.0, 0.0);
        let mut b = Particle::new_heavy().at(100.0, 0.0);
        assert!(!resolve_particle_collision(&mut a, &mut b));
        assert_eq!(a.position, DVec2::ZERO);
    }

    #[test]
    fn coincident_centers_are_skipped() {
        let mut a = Particle::new_heavy().at(5.0, 5.0).moving(10.0, 0.0);
        let mut b = Particle::new_heavy().at(5.0, 5.0).moving(-10.0, 0.0);
        assert!(!resolve_particle_collision(&mut a, &mut b));
    }

    #[test]
    fn stationary_wall_reflects_without_energy_change() {
        let walls = Box2::new();
        let mut p = Particle::new_heavy().at(-100.0, 500.0).moving(300.0, 0.0);
        let energy = p.kinetic_energy();
        assert_eq!(collide_with_walls(&walls, &mut p), 1);
        assert_eq!(p.velocity, DVec2::new(-300.0, 0.0));
        assert_eq!(p.position.x, -125.0);
        assert_relative_eq!(p.kinetic_energy(), energy);
    }

    #[test]
    fn corner_hit_counts_both_walls() {
        let walls = Box2::new();
        let mut p = Particle::new_heavy().at(-990.0, 10.0).moving(-5.0, -5.0);
        assert_eq!(collide_with_walls(&walls, &mut p), 2);
        assert_eq!(p.velocity, DVec2::new(5.0, 5.0));
    }

    #[test]
    fn clamped_particle_moving_away_is_not_counted() {
        let walls = Box2::new();
        let mut p = Particle::new_heavy().at(-10.0, 500.0).moving(-300.0, 0.0);
        assert_eq!(collide_with_walls(&walls, &mut p), 0);
        assert_eq!(p.position.x, -125.0);
        assert_eq!(p.velocity.x, -300.0);
    }

    #[test]
    fn closing_left_wall_that_does_work_speeds_particles_up() {
        let walls = Box2 {
            left_wall_velocity: 100.0,
            does_work: true,
            ..Box2::new()
        };
        let mut p = Particle::new_heavy().at(-950.0, 500.0).moving(-300.0, 0.0);
        assert_eq!(collide_with_walls(&walls, &mut p), 1);
        assert_relative_eq!(p.velocity.x, 500.0);
    }

    #[test]
    fn opening_left_wall_that_does_work_slows_particles_down() {
        let walls = Box2 {
            left_wall_velocity: -100.0,
            does_work: true,
            ..Box2::new()
        };
        let mut p = Particle::new_heavy().at(-950.0, 500.0).moving(-300.0, 0.0);
        collide_with_walls(&walls, &mut p);
        assert_relative_eq!(p.velocity.x, 100.0);
    }

    #[test]
    fn left_wall_without_work_only_reflects() {
        let walls = Box2 {
            left_wall_velocity: 100.0,
            ..Box2::new()
        };
        let mut p = Particle::new_heavy().at(-950.0, 500.0).moving(-300.0, 0.0);
        collide_with_walls(&walls, &mut p);
        assert_relative_eq!(p.velocity.x, 300.0);
    }

    #[test]
    fn update_resolves_pairs_across_particle_sets() {
        let walls = Box2::new();
        let mut detector = CollisionDetector::new(RegionConfig::new(400.0, 100.0).unwrap()).unwrap();
        let mut heavy = vec![Particle::new(Species::Heavy, 10.0, 50.0).at(-500.0, 500.0).moving(20.0, 0.0)];
        let mut light = vec![Particle::new(Species::Light, 10.0, 50.0).at(-401.0, 500.0).moving(-20.0, 0.0)];
        let counts = detector.update(&walls, &mut [&mut heavy[..], &mut light[..]]);
        assert_eq!(counts.particle_particle, 1);
        assert_eq!(counts.particle_container, 0);
        assert_relative_eq!(heavy[0].velocity.x, -20.0, epsilon = 1e-9);
        assert_relative_eq!(light[0].velocity.x, 20.0, epsilon = 1e-9);
    }

    #[test]
    fn pairs_are_not_resolved_when_disabled() {
        let walls = Box2::new();
        let mut detector = CollisionDetector::new(RegionConfig::default()).unwrap();
        detector.set_particle_particle_collisions_enabled(false);
        let mut particles = vec![
            Particle::new_heavy().at(-500.0, 500.0).moving(20.0, 0.0),
            Particle::new_heavy().at(-300.0, 500.0).moving(-20.0, 0.0),
        ];
        let counts = detector.update(&walls, &mut [&mut particles[..]]);
        assert_eq!(counts.particle_particle, 0);
        assert_eq!(particles[0].velocity.x, 20.0);
    }

    #[test]
    fn update_keeps_particles_in_the_container() {
        let mut container = IdealGasContainer::new(ContainerConfig::default()).unwrap();
        container.step(1.0);
        let mut detector = CollisionDetector::new(RegionConfig::default()).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let mut particles: Vec<Particle> = (0..300)
            .map(|_| {
                let mut p = Particle::new_heavy().at(
                    rng.random_range(-9800.0..-200.0),
                    rng.random_range(200.0..8500.0),
                );
                p.set_velocity_polar(500.0, rng.random_range(0.0..std::f64::consts::TAU));
                p
            })
            .collect();
        let bounds = container.inner_bounds();
        for _ in 0..200 {
            for p in &mut particles {
                p.step(0.5);
            }
            detector.update(&container, &mut [&mut particles[..]]);
            for p in &particles {
                assert!(p.left() >= bounds.min_x() - 1e-9 && p.right() <= bounds.max_x() + 1e-9);
                assert!(p.bottom() >= bounds.min_y() - 1e-9 && p.top() <= bounds.max_y() + 1e-9);
            }
        }
        assert!(detector.number_of_particle_container_collisions() > 0 || detector.counts().particle_particle > 0);
    }
}
