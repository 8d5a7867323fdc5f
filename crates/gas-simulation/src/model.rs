//! Ideal-gas model
//!
//! Owns the heavy and light particles (inside the container and escaped),
//! the container and the collision detector, and derives temperature and
//! pressure from them every step.

use gas_physics::{
    ensemble, rms_speed, CollisionDetector, IdealGasContainer, Particle, ParticleInstance, Species,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::collision_counter::CollisionCounter;
use crate::error::SimulationError;
use crate::histograms::Histograms;
use crate::hold_constant::{HoldConstant, Oops};
use crate::params::SimulationParams;
use crate::pressure_gauge::PressureGauge;
use crate::thermodynamics::{
    compute_desired_temperature, compute_pressure, compute_temperature, compute_volume, gaussian_values,
};
use crate::time::TimeControls;

/// Relative spread of the temperatures drawn for a group of new particles
const TEMPERATURE_DEVIATION: f64 = 0.2;

/// Allowed error between requested and achieved mean temperature, K
const TEMPERATURE_MEAN_THRESHOLD: f64 = 1e-3;

/// Decimal places kept when computing a container width from a volume
const WIDTH_DECIMALS: i32 = 5;

/// What happened during one `IdealGasModel::step`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    pub oops: Option<Oops>,
    pub lid_blown_off: bool,
    pub particle_particle_collisions: usize,
    pub particle_container_collisions: usize,
    /// Particles that left through the lid opening
    pub escaped: usize,
    /// Escaped particles that left the model bounds and were discarded
    pub removed_out_of_bounds: usize,
    /// A histogram sample period completed
    pub histograms_updated: bool,
    /// The pressure gauge reading changed
    pub pressure_gauge_updated: bool,
}

pub struct IdealGasModel {
    params: SimulationParams,
    container: IdealGasContainer,
    collision_detector: CollisionDetector,
    collision_counter: CollisionCounter,
    histograms: Histograms,
    pressure_gauge: PressureGauge,
    time_controls: TimeControls,
    rng: StdRng,

    heavy_particles: Vec<Particle>,
    light_particles: Vec<Particle>,
    heavy_particles_outside: Vec<Particle>,
    light_particles_outside: Vec<Particle>,

    temperature: Option<f64>,
    pressure: f64,
    /// Pressure is only computed once a particle has hit a wall after the
    /// container was last empty.
    pressure_enabled: bool,
    hold_constant: HoldConstant,
    held_pressure: f64,
    heat_cool_factor: f64,
    initial_temperature: f64,
    initial_temperature_controlled: bool,
    elapsed_time: f64,
}

impl IdealGasModel {
    pub fn new(params: SimulationParams) -> Result<Self, SimulationError> {
        let container = IdealGasContainer::new(params.container)?;
        let mut collision_detector = CollisionDetector::new(params.regions)?;
        collision_detector.set_particle_particle_collisions_enabled(params.particle_particle_collisions_enabled);
        let rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        log::info!(
            "✓ Ideal gas model created (container {} x {} pm, seed {:?})",
            container.width(),
            container.height(),
            params.seed
        );

        Ok(Self {
            initial_temperature: params.initial_temperature.default,
            params,
            container,
            collision_detector,
            collision_counter: CollisionCounter::new(),
            histograms: Histograms::new(),
            pressure_gauge: PressureGauge::new(),
            time_controls: TimeControls::default(),
            rng,
            heavy_particles: Vec::new(),
            light_particles: Vec::new(),
            heavy_particles_outside: Vec::new(),
            light_particles_outside: Vec::new(),
            temperature: None,
            pressure: 0.0,
            pressure_enabled: false,
            hold_constant: HoldConstant::Nothing,
            held_pressure: 0.0,
            heat_cool_factor: 0.0,
            initial_temperature_controlled: false,
            elapsed_time: 0.0,
        })
    }

    pub fn reset(&mut self) {
        self.container.reset();
        self.collision_detector.reset();
        self.collision_detector
            .set_particle_particle_collisions_enabled(self.params.particle_particle_collisions_enabled);
        self.collision_counter.reset();
        self.histograms.reset();
        self.pressure_gauge.reset();
        self.time_controls.reset();
        self.heavy_particles.clear();
        self.light_particles.clear();
        self.heavy_particles_outside.clear();
        self.light_particles_outside.clear();
        self.temperature = None;
        self.pressure = 0.0;
        self.pressure_enabled = false;
        self.hold_constant = HoldConstant::Nothing;
        self.held_pressure = 0.0;
        self.heat_cool_factor = 0.0;
        self.initial_temperature = self.params.initial_temperature.default;
        self.initial_temperature_controlled = false;
        self.elapsed_time = 0.0;
        log::info!("Ideal gas model reset");
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    pub fn container(&self) -> &IdealGasContainer {
        &self.container
    }

    pub fn collision_detector(&self) -> &CollisionDetector {
        &self.collision_detector
    }

    pub fn set_particle_particle_collisions_enabled(&mut self, enabled: bool) {
        self.collision_detector.set_particle_particle_collisions_enabled(enabled);
    }

    pub fn collision_counter(&self) -> &CollisionCounter {
        &self.collision_counter
    }

    pub fn collision_counter_mut(&mut self) -> &mut CollisionCounter {
        &mut self.collision_counter
    }

    pub fn histograms(&self) -> &Histograms {
        &self.histograms
    }

    pub fn pressure_gauge(&self) -> &PressureGauge {
        &self.pressure_gauge
    }

    pub fn pressure_gauge_mut(&mut self) -> &mut PressureGauge {
        &mut self.pressure_gauge
    }

    pub fn time_controls(&self) -> &TimeControls {
        &self.time_controls
    }

    pub fn time_controls_mut(&mut self) -> &mut TimeControls {
        &mut self.time_controls
    }

    /// Model time stepped since creation or the last reset, ps
    pub fn elapsed_time(&self) -> f64 {
        self.elapsed_time
    }

    // Particles

    pub fn heavy_particles(&self) -> &[Particle] {
        &self.heavy_particles
    }

    pub fn light_particles(&self) -> &[Particle] {
        &self.light_particles
    }

    pub fn heavy_particles_outside(&self) -> &[Particle] {
        &self.heavy_particles_outside
    }

    pub fn light_particles_outside(&self) -> &[Particle] {
        &self.light_particles_outside
    }

    /// Particles of `species` inside the container
    pub fn number_of_particles(&self, species: Species) -> usize {
        match species {
            Species::Heavy => self.heavy_particles.len(),
            Species::Light => self.light_particles.len(),
            Species::Diffusion1 | Species::Diffusion2 => 0,
        }
    }

    pub fn total_number_of_particles(&self) -> usize {
        self.heavy_particles.len() + self.light_particles.len()
    }

    /// Render snapshot of every particle, inside and outside the container
    pub fn instances(&self) -> Vec<ParticleInstance> {
        self.heavy_particles
            .iter()
            .chain(&self.light_particles)
            .chain(&self.heavy_particles_outside)
            .chain(&self.light_particles_outside)
            .map(Particle::instance)
            .collect()
    }

    /// Adds particles through the pump hose or removes them from the end, so
    /// that the container holds `count` particles of `species`.
    pub fn set_number_of_particles(&mut self, species: Species, count: usize) -> Result<Option<Oops>, SimulationError> {
        let max = self.params.max_particles_per_species;
        if count > max {
            return Err(SimulationError::CountOutOfRange { species, count, max });
        }
        let current = match species {
            Species::Heavy | Species::Light => self.number_of_particles(species),
            _ => return Err(SimulationError::InvalidSpecies(species)),
        };

        if count > current {
            self.add_particles(species, count - current);
        } else if count < current {
            ensemble::remove_particles(self.particles_mut(species), current - count);
            log::debug!("Removed {} {:?} particles", current - count, species);
        } else {
            return Ok(None);
        }

        self.temperature = self.compute_actual_temperature();
        if !self.time_controls.playing {
            self.histograms.update_now(&self.heavy_particles, &self.light_particles);
        }
        Ok(self.check_empty_container())
    }

    fn particles_mut(&mut self, species: Species) -> &mut Vec<Particle> {
        match species {
            Species::Light => &mut self.light_particles,
            _ => &mut self.heavy_particles,
        }
    }

    fn add_particles(&mut self, species: Species, n: usize) {
        let initial_temperature = self.initial_temperature();

        // a group gets some deviation so its motion looks less wave-like,
        // while keeping the requested mean temperature
        let temperatures =
            if n != 1 && self.collision_detector.particle_particle_collisions_enabled() {
                gaussian_values(
                    &mut self.rng,
                    n,
                    initial_temperature,
                    TEMPERATURE_DEVIATION * initial_temperature,
                    TEMPERATURE_MEAN_THRESHOLD,
                )
            } else {
                vec![initial_temperature; n]
            };

        let config = species.default_config();
        let origin = self.container.injection_point(config.radius);
        let dispersion = self.params.pump_dispersion_angle;

        let mut added = Vec::with_capacity(n);
        for temperature in temperatures {
            let mut particle = Particle::new(species, config.mass, config.radius);
            particle.set_position(origin.x, origin.y);
            let angle = std::f64::consts::PI - dispersion / 2.0 + self.rng.random::<f64>() * dispersion;
            particle.set_velocity_polar(rms_speed(temperature.max(0.0), config.mass), angle);
            added.push(particle);
        }
        self.particles_mut(species).extend(added);
        log::debug!("Pumped {n} {species:?} particles in at {initial_temperature:.1} K");
    }

    /// Temperature for new particles: the user's setting if it is in
    /// control, otherwise the current temperature, otherwise the default
    pub fn initial_temperature(&self) -> f64 {
        if self.initial_temperature_controlled {
            self.initial_temperature
        } else {
            self.temperature.unwrap_or(self.params.initial_temperature.default)
        }
    }

    pub fn set_initial_temperature(&mut self, temperature: f64) {
        self.initial_temperature = self.params.initial_temperature.clamp(temperature);
    }

    pub fn set_initial_temperature_controlled(&mut self, controlled: bool) {
        self.initial_temperature_controlled = controlled;
    }

    /// Scales inside particles' distance from the right wall by `ratio`
    pub fn redistribute_particles(&mut self, ratio: f64) {
        let right = self.container.right();
        ensemble::redistribute_particles(&mut self.heavy_particles, right, ratio);
        ensemble::redistribute_particles(&mut self.light_particles, right, ratio);
    }

    // Thermodynamic state

    /// K, None when the container is empty
    pub fn temperature(&self) -> Option<f64> {
        self.temperature
    }

    /// kPa
    pub fn pressure(&self) -> f64 {
        self.pressure
    }

    /// pm³
    pub fn volume(&self) -> f64 {
        self.container.volume()
    }

    pub fn is_pressure_enabled(&self) -> bool {
        self.pressure_enabled
    }

    pub fn hold_constant(&self) -> HoldConstant {
        self.hold_constant
    }

    /// Pressure pinned by a pressure hold mode, kPa
    pub fn held_pressure(&self) -> Option<f64> {
        self.hold_constant.holds_pressure().then_some(self.held_pressure)
    }

    /// Selects what to hold constant.
    ///
    /// Modes that need particles fall back to Nothing with an oops when the
    /// container is empty. Pressure modes are refused while pressure is zero.
    pub fn set_hold_constant(&mut self, hold_constant: HoldConstant) -> Result<Option<Oops>, SimulationError> {
        if self.total_number_of_particles() == 0 {
            if let Some(oops) = hold_constant.empty_container_oops() {
                log::warn!("Oops! {oops}");
                self.hold_constant = HoldConstant::Nothing;
                return Ok(Some(oops));
            }
        }
        if hold_constant.holds_pressure() {
            if self.pressure == 0.0 {
                log::warn!("Cannot hold {hold_constant:?} while pressure is zero");
                return Err(SimulationError::ZeroPressure);
            }
            self.held_pressure = self.pressure;
        }
        log::debug!("Holding {hold_constant:?} constant");
        self.hold_constant = hold_constant;
        Ok(None)
    }

    pub fn heat_cool_factor(&self) -> f64 {
        self.heat_cool_factor
    }

    /// 1 is maximum heat, -1 maximum cool, 0 neither
    pub fn set_heat_cool_factor(&mut self, factor: f64) {
        self.heat_cool_factor = factor.clamp(-1.0, 1.0);
    }

    // Container

    /// Starts an animated resize. Returns false if the hold-constant mode
    /// fixes the volume.
    pub fn resize_container(&mut self, width: f64) -> bool {
        if !self.hold_constant.allows_resize() {
            log::warn!("Container cannot be resized while holding {:?} constant", self.hold_constant);
            return false;
        }
        self.container.resize(width);
        true
    }

    pub fn set_lid_width(&mut self, lid_width: f64) {
        self.container.set_lid_width(lid_width);
    }

    pub fn blow_lid_off(&mut self) -> bool {
        self.container.blow_lid_off()
    }

    pub fn return_lid(&mut self) {
        self.container.return_lid();
    }

    // Time

    /// Advances by `seconds` of real time. The container width animates even
    /// while paused; model time only steps while playing.
    pub fn advance(&mut self, seconds: f64) -> Result<Option<StepReport>, SimulationError> {
        if !(seconds.is_finite() && seconds > 0.0) {
            return Err(SimulationError::InvalidTimeStep(seconds));
        }
        let animation_dt = self.time_controls.timescale.model_time(seconds);
        let previous_width = self.container.width();
        let resized = self.container.step_width(animation_dt);

        match self.time_controls.step_time(seconds) {
            Some(dt) => self.step(dt).map(Some),
            None => {
                if resized {
                    self.redistribute_particles(self.container.width() / previous_width);
                    // settle the wall so it does not carry velocity into the next step
                    self.container.step(animation_dt);
                }
                Ok(None)
            }
        }
    }

    /// One frame of model time, regardless of pause state
    pub fn single_step(&mut self) -> Result<StepReport, SimulationError> {
        let dt = self.time_controls.single_step_time();
        self.container.step_width(dt);
        self.step(dt)
    }

    /// Steps model time by `dt` ps
    pub fn step(&mut self, dt: f64) -> Result<StepReport, SimulationError> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(SimulationError::InvalidTimeStep(dt));
        }
        let mut report = StepReport::default();

        if self.heat_cool_factor != 0.0 && self.hold_constant.allows_heat_cool() {
            let scale = self.params.heat_cool_scale;
            ensemble::heat_cool_particles(&mut self.heavy_particles, self.heat_cool_factor, scale);
            ensemble::heat_cool_particles(&mut self.light_particles, self.heat_cool_factor, scale);
        }

        ensemble::step_particles(&mut self.heavy_particles, dt);
        ensemble::step_particles(&mut self.light_particles, dt);
        ensemble::step_particles(&mut self.heavy_particles_outside, dt);
        ensemble::step_particles(&mut self.light_particles_outside, dt);

        if self.container.is_lid_open() {
            report.escaped = ensemble::escape_particles(
                &self.container,
                &mut self.heavy_particles,
                &mut self.heavy_particles_outside,
            ) + ensemble::escape_particles(
                &self.container,
                &mut self.light_particles,
                &mut self.light_particles_outside,
            );
        }

        self.container.step(dt);

        let counts = self
            .collision_detector
            .update(&self.container, &mut [&mut self.heavy_particles[..], &mut self.light_particles[..]]);
        report.particle_particle_collisions = counts.particle_particle;
        report.particle_container_collisions = counts.particle_container;

        let model_bounds = self.container.model_bounds();
        report.removed_out_of_bounds = ensemble::remove_out_of_bounds(&mut self.heavy_particles_outside, &model_bounds)
            + ensemble::remove_out_of_bounds(&mut self.light_particles_outside, &model_bounds);

        self.collision_counter.step(dt, counts.particle_container);

        if report.escaped > 0 {
            report.oops = self.check_empty_container();
        }

        self.temperature = self.compute_actual_temperature();

        if !self.pressure_enabled && counts.particle_container > 0 && self.total_number_of_particles() > 0 {
            self.pressure_enabled = true;
            log::debug!("First wall collision, pressure enabled");
        }
        self.update_pressure();

        let (changed, oops) = self.compensate_for_hold_constant();
        if changed {
            self.temperature = self.compute_actual_temperature();
            self.update_pressure();
        }
        report.oops = report.oops.or(oops);

        if self.pressure_enabled && self.pressure > self.params.max_pressure && self.container.blow_lid_off() {
            log::warn!(
                "Pressure {:.0} kPa exceeds {:.0} kPa",
                self.pressure,
                self.params.max_pressure
            );
            report.lid_blown_off = true;
        }

        report.histograms_updated = self.histograms.step(dt, &self.heavy_particles, &self.light_particles);
        report.pressure_gauge_updated = self.pressure_gauge.step(
            &mut self.rng,
            dt,
            self.pressure,
            self.temperature,
            !self.hold_constant.holds_pressure(),
        );

        self.elapsed_time += dt;
        Ok(report)
    }

    fn compute_actual_temperature(&self) -> Option<f64> {
        compute_temperature(&[&self.heavy_particles, &self.light_particles])
    }

    fn update_pressure(&mut self) {
        if !self.pressure_enabled {
            return;
        }
        self.pressure = match self.temperature {
            Some(temperature) => compute_pressure(self.total_number_of_particles(), temperature, self.volume()),
            None => 0.0,
        };
    }

    /// An empty container has no temperature or pressure, and cannot have
    /// either held constant.
    fn check_empty_container(&mut self) -> Option<Oops> {
        if self.total_number_of_particles() > 0 {
            return None;
        }
        self.temperature = None;
        self.pressure = 0.0;
        self.pressure_enabled = false;
        let oops = self.hold_constant.empty_container_oops()?;
        log::warn!("Oops! {oops}");
        self.hold_constant = HoldConstant::Nothing;
        Some(oops)
    }

    /// Adjusts volume or temperature to keep the held pressure. Returns
    /// whether anything was adjusted, and the oops raised if the adjustment
    /// was impossible.
    fn compensate_for_hold_constant(&mut self) -> (bool, Option<Oops>) {
        let n = self.total_number_of_particles();
        if n == 0 || !self.pressure_enabled {
            return (false, None);
        }
        let Some(temperature) = self.temperature else {
            return (false, None);
        };

        match self.hold_constant {
            HoldConstant::PressureAtConstantTemperature => {
                let volume = compute_volume(n, temperature, self.held_pressure);
                let mut width = round_to(volume / (self.container.height() * self.container.depth()), WIDTH_DECIMALS);
                let range = self.container.width_range();
                let mut oops = None;
                if !range.contains(width) {
                    let condition = if width > range.max {
                        Oops::PressureLarge
                    } else {
                        Oops::PressureSmall
                    };
                    log::warn!("Oops! {condition} (width {width} pm, range [{}, {}])", range.min, range.max);
                    self.hold_constant = HoldConstant::Nothing;
                    width = range.clamp(width);
                    oops = Some(condition);
                }
                self.container.resize_immediately(width);
                (true, oops)
            }
            HoldConstant::PressureAtConstantVolume => {
                let desired = compute_desired_temperature(n, self.held_pressure, self.volume());
                let changed = ensemble::set_temperature(
                    &mut [&mut self.heavy_particles[..], &mut self.light_particles[..]],
                    desired,
                );
                (changed, None)
            }
            HoldConstant::Nothing | HoldConstant::Volume | HoldConstant::Temperature => (false, None),
        }
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn model() -> IdealGasModel {
        IdealGasModel::new(SimulationParams::default().with_seed(11)).unwrap()
    }

    /// Steps until the pressure gate opens
    fn run_until_pressure(model: &mut IdealGasModel) {
        for _ in 0..10_000 {
            model.step(0.1).unwrap();
            if model.is_pressure_enabled() {
                return;
            }
        }
        panic!("no wall collision");
    }

    #[test]
    fn new_particles_leave_the_hose_leftward() {
        let mut m = model();
        assert_eq!(m.set_number_of_particles(Species::Heavy, 20), Ok(None));
        let origin = m.container().injection_point(125.0);
        for p in m.heavy_particles() {
            assert_eq!(p.position, origin);
            assert!(p.velocity.x < 0.0);
        }
    }

    #[test]
    fn group_keeps_mean_temperature() {
        let mut m = model();
        m.set_number_of_particles(Species::Heavy, 200).unwrap();
        let temperatures: Vec<f64> = m
            .heavy_particles()
            .iter()
            .map(|p| gas_physics::temperature_from_kinetic_energy(p.kinetic_energy()))
            .collect();
        let mean = temperatures.iter().sum::<f64>() / temperatures.len() as f64;
        assert_relative_eq!(mean, 300.0, max_relative = 1e-6);
        assert!(temperatures.iter().any(|t| (t - 300.0).abs() > 1.0));
    }

    #[test]
    fn without_particle_collisions_all_speeds_match() {
        let mut m = IdealGasModel::new(SimulationParams::default().with_seed(1).without_particle_collisions()).unwrap();
        m.set_number_of_particles(Species::Light, 10).unwrap();
        let speed = rms_speed(300.0, gas_physics::LIGHT_PARTICLE_MASS);
        for p in m.light_particles() {
            assert_relative_eq!(p.speed(), speed, max_relative = 1e-12);
        }
    }

    #[test]
    fn count_limits() {
        let mut m = model();
        assert!(matches!(
            m.set_number_of_particles(Species::Heavy, 1001),
            Err(SimulationError::CountOutOfRange { .. })
        ));
        assert_eq!(
            m.set_number_of_particles(Species::Diffusion1, 1),
            Err(SimulationError::InvalidSpecies(Species::Diffusion1))
        );
    }

    #[test]
    fn removal_takes_from_the_end() {
        let mut m = model();
        m.set_number_of_particles(Species::Heavy, 5).unwrap();
        let first = m.heavy_particles()[0];
        m.set_number_of_particles(Species::Heavy, 1).unwrap();
        assert_eq!(m.heavy_particles(), &[first]);
    }

    #[test]
    fn initial_temperature_source() {
        let mut m = model();
        assert_eq!(m.initial_temperature(), 300.0);
        m.set_number_of_particles(Species::Heavy, 10).unwrap();
        m.set_heat_cool_factor(1.0);
        for _ in 0..20 {
            m.step(0.05).unwrap();
        }
        let current = m.temperature().unwrap();
        assert!(current > 300.0);
        assert_eq!(m.initial_temperature(), current);

        m.set_initial_temperature(5000.0);
        m.set_initial_temperature_controlled(true);
        assert_eq!(m.initial_temperature(), 1000.0);
    }

    #[test]
    fn heating_is_ignored_while_temperature_is_held() {
        let mut m = model();
        m.set_number_of_particles(Species::Heavy, 1).unwrap();
        m.set_hold_constant(HoldConstant::Temperature).unwrap();
        m.set_heat_cool_factor(1.0);
        let speed = m.heavy_particles()[0].speed();
        m.step(0.01).unwrap();
        assert_relative_eq!(m.heavy_particles()[0].speed(), speed, max_relative = 1e-12);
    }

    #[test]
    fn resize_is_refused_while_volume_is_held() {
        let mut m = model();
        m.set_number_of_particles(Species::Heavy, 1).unwrap();
        m.set_hold_constant(HoldConstant::Volume).unwrap();
        assert!(!m.resize_container(6000.0));
        assert_eq!(m.container().desired_width(), 10000.0);
    }

    #[test]
    fn pressure_modes_need_pressure() {
        let mut m = model();
        m.set_number_of_particles(Species::Heavy, 10).unwrap();
        assert_eq!(
            m.set_hold_constant(HoldConstant::PressureAtConstantVolume),
            Err(SimulationError::ZeroPressure)
        );
        assert_eq!(m.hold_constant(), HoldConstant::Nothing);

        run_until_pressure(&mut m);
        let pressure = m.pressure();
        assert_eq!(m.set_hold_constant(HoldConstant::PressureAtConstantVolume), Ok(None));
        assert_eq!(m.held_pressure(), Some(pressure));
    }

    #[test]
    fn emptying_the_container_drops_the_hold() {
        let mut m = model();
        m.set_number_of_particles(Species::Light, 10).unwrap();
        run_until_pressure(&mut m);
        m.set_hold_constant(HoldConstant::PressureAtConstantTemperature).unwrap();
        assert_eq!(m.set_number_of_particles(Species::Light, 0), Ok(Some(Oops::PressureEmpty)));
        assert_eq!(m.hold_constant(), HoldConstant::Nothing);
        assert_eq!(m.pressure(), 0.0);
        assert_eq!(m.temperature(), None);
        assert!(!m.is_pressure_enabled());
    }

    #[test]
    fn paused_resize_redistributes_particles() {
        let mut m = model();
        m.set_number_of_particles(Species::Heavy, 1).unwrap();
        m.time_controls_mut().playing = false;
        let x = m.heavy_particles()[0].position.x;
        m.resize_container(9000.0);
        assert_eq!(m.advance(0.1), Ok(None));
        let ratio = m.container().width() / 10000.0;
        assert!(ratio < 1.0);
        assert_relative_eq!(m.heavy_particles()[0].position.x, x * ratio);
        assert_eq!(m.elapsed_time(), 0.0);
    }

    #[test]
    fn single_step_ignores_pause() {
        let mut m = model();
        m.time_controls_mut().playing = false;
        m.single_step().unwrap();
        assert_relative_eq!(m.elapsed_time(), 2.5 / 60.0);
    }

    #[test]
    fn invalid_time_steps_are_rejected() {
        let mut m = model();
        assert_eq!(m.step(0.0), Err(SimulationError::InvalidTimeStep(0.0)));
        assert!(m.advance(f64::NAN).is_err());
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut m = model();
        m.set_number_of_particles(Species::Heavy, 50).unwrap();
        run_until_pressure(&mut m);
        m.set_heat_cool_factor(-0.5);
        m.blow_lid_off();
        m.reset();
        assert_eq!(m.total_number_of_particles(), 0);
        assert_eq!(m.temperature(), None);
        assert_eq!(m.pressure(), 0.0);
        assert_eq!(m.heat_cool_factor(), 0.0);
        assert!(m.container().lid_is_on());
        assert!(m.instances().is_empty());
    }

    #[test]
    fn rounding_keeps_five_decimals() {
        assert_eq!(round_to(1.234567891, 5), 1.23457);
    }
}
