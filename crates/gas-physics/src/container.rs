//! Container geometry
//!
//! The ideal-gas container is a box with a fixed right wall, floor and
//! height, a movable left wall and a lid that can be slid open or blown off.
//! Geometry refers to the inner surfaces of the walls; wall thickness only
//! matters for placing particles at the pump hose.

use glam::DVec2;

use crate::bounds::Bounds;
use crate::error::ConfigError;
use crate::particle::Particle;

/// Wall surfaces consumed by collision detection
pub trait Walls {
    /// Bounds used to partition space into collision regions
    fn bounds(&self) -> Bounds;

    /// Walls that confine `particle`
    fn wall_bounds_for(&self, _particle: &Particle) -> Bounds {
        self.bounds()
    }

    /// Velocity of the left wall along x, pm/ps. Positive when closing.
    fn left_wall_velocity(&self) -> f64 {
        0.0
    }

    /// Whether the left wall transfers energy to particles it hits
    fn left_wall_does_work(&self) -> bool {
        false
    }

    /// Whether a barrier separates two positions, so particles there cannot touch
    fn separated(&self, _a: DVec2, _b: DVec2) -> bool {
        false
    }
}

/// Inclusive range of allowed container widths, pm
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WidthRange {
    pub min: f64,
    pub max: f64,
    pub default: f64,
}

impl WidthRange {
    pub fn contains(&self, width: f64) -> bool {
        width >= self.min && width <= self.max
    }

    pub fn clamp(&self, width: f64) -> f64 {
        width.clamp(self.min, self.max)
    }
}

/// Container dimensions and behavior
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerConfig {
    /// Bottom-right inner corner, pm
    pub position: DVec2,
    pub width_range: WidthRange,
    pub height: f64,
    /// Depth into the screen, only used for volume
    pub depth: f64,
    pub wall_thickness: f64,
    /// Smallest lid width, which is the widest the opening gets
    pub min_lid_width: f64,
    /// Part of the top next to the right wall that the opening never reaches
    pub opening_right_inset: f64,
    /// Fastest the left wall animates toward a requested width, pm/ps
    pub wall_speed_limit: f64,
    pub left_wall_does_work: bool,
    /// How far beyond the container escaped particles are still tracked
    pub model_bounds_margin: f64,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            position: DVec2::ZERO,
            width_range: WidthRange {
                min: 5000.0,
                max: 15000.0,
                default: 10000.0,
            },
            height: 8750.0,
            depth: 8750.0,
            wall_thickness: 75.0,
            min_lid_width: 500.0,
            opening_right_inset: 1000.0,
            wall_speed_limit: 500.0,
            left_wall_does_work: false,
            model_bounds_margin: 10000.0,
        }
    }
}

impl ContainerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let range = self.width_range;
        if !(range.min > 0.0 && range.min <= range.default && range.default <= range.max) {
            return Err(ConfigError::InvalidWidthRange {
                min: range.min,
                max: range.max,
                default: range.default,
            });
        }
        for (name, value) in [
            ("height", self.height),
            ("depth", self.depth),
            ("wall_thickness", self.wall_thickness),
            ("wall_speed_limit", self.wall_speed_limit),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidDimension { name, value });
            }
        }
        if !(self.model_bounds_margin.is_finite() && self.model_bounds_margin >= 0.0) {
            return Err(ConfigError::InvalidDimension {
                name: "model_bounds_margin",
                value: self.model_bounds_margin,
            });
        }
        let smallest_max_lid = range.min - self.opening_right_inset;
        if self.min_lid_width < 0.0 || self.opening_right_inset < 0.0 || smallest_max_lid < self.min_lid_width {
            return Err(ConfigError::InvalidLidRange {
                min: self.min_lid_width,
                max: smallest_max_lid,
            });
        }
        Ok(())
    }
}

/// The ideal-gas container
#[derive(Debug, Clone)]
pub struct IdealGasContainer {
    config: ContainerConfig,
    width: f64,
    desired_width: f64,
    previous_left: f64,
    left_wall_velocity: f64,
    lid_width: f64,
    lid_is_on: bool,
}

impl IdealGasContainer {
    pub fn new(config: ContainerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let width = config.width_range.default;
        let mut container = Self {
            config,
            width,
            desired_width: width,
            previous_left: 0.0,
            left_wall_velocity: 0.0,
            lid_width: 0.0,
            lid_is_on: true,
        };
        container.previous_left = container.left();
        container.lid_width = container.max_lid_width();
        Ok(container)
    }

    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    pub fn reset(&mut self) {
        self.width = self.config.width_range.default;
        self.desired_width = self.width;
        self.previous_left = self.left();
        self.left_wall_velocity = 0.0;
        self.lid_is_on = true;
        self.lid_width = self.max_lid_width();
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    /// Width the left wall is animating toward
    pub fn desired_width(&self) -> f64 {
        self.desired_width
    }

    pub fn width_range(&self) -> WidthRange {
        self.config.width_range
    }

    pub fn height(&self) -> f64 {
        self.config.height
    }

    pub fn depth(&self) -> f64 {
        self.config.depth
    }

    pub fn wall_thickness(&self) -> f64 {
        self.config.wall_thickness
    }

    pub fn right(&self) -> f64 {
        self.config.position.x
    }

    pub fn left(&self) -> f64 {
        self.right() - self.width
    }

    pub fn bottom(&self) -> f64 {
        self.config.position.y
    }

    pub fn top(&self) -> f64 {
        self.bottom() + self.config.height
    }

    /// Volume, pm³
    pub fn volume(&self) -> f64 {
        self.width * self.config.height * self.config.depth
    }

    pub fn inner_bounds(&self) -> Bounds {
        Bounds::new(self.left(), self.bottom(), self.right(), self.top())
    }

    /// Particles outside the container are removed once they leave these bounds
    pub fn model_bounds(&self) -> Bounds {
        let margin = self.config.model_bounds_margin;
        let max_left = self.right() - self.config.width_range.max;
        Bounds::new(max_left, self.bottom(), self.right(), self.top()).with_margins(margin, 0.0, margin, margin)
    }

    /// Requests an animated resize. The width is clamped to its range and the
    /// left wall moves there through `step_width`.
    pub fn resize(&mut self, width: f64) {
        self.desired_width = self.config.width_range.clamp(width);
    }

    /// Jumps to `width` (clamped) without animation or wall motion.
    pub fn resize_immediately(&mut self, width: f64) {
        let width = self.config.width_range.clamp(width);
        self.set_width_preserving_opening(width);
        self.desired_width = width;
        self.previous_left = self.left();
        self.left_wall_velocity = 0.0;
    }

    /// Moves the left wall toward the desired width at no more than the
    /// configured speed. Returns whether the width changed.
    pub fn step_width(&mut self, dt: f64) -> bool {
        debug_assert!(dt >= 0.0, "invalid dt: {dt}");
        let delta = self.desired_width - self.width;
        if delta == 0.0 {
            return false;
        }
        let max_delta = self.config.wall_speed_limit * dt;
        let width = if delta.abs() <= max_delta {
            self.desired_width
        } else {
            self.width + max_delta.copysign(delta)
        };
        self.set_width_preserving_opening(width);
        true
    }

    /// Derives the left wall velocity from its displacement since the
    /// previous call.
    pub fn step(&mut self, dt: f64) {
        debug_assert!(dt > 0.0, "invalid dt: {dt}");
        let left = self.left();
        self.left_wall_velocity = (left - self.previous_left) / dt;
        self.previous_left = left;
    }

    fn set_width_preserving_opening(&mut self, width: f64) {
        let opening_width = self.max_lid_width() - self.lid_width;
        self.width = width;
        self.lid_width = (self.max_lid_width() - opening_width).clamp(self.min_lid_width(), self.max_lid_width());
    }

    pub fn lid_width(&self) -> f64 {
        self.lid_width
    }

    pub fn min_lid_width(&self) -> f64 {
        self.config.min_lid_width
    }

    /// Lid width that closes the opening completely
    pub fn max_lid_width(&self) -> f64 {
        self.width - self.config.opening_right_inset
    }

    /// Slides the lid. The width is clamped to [min, max].
    pub fn set_lid_width(&mut self, lid_width: f64) {
        self.lid_width = lid_width.clamp(self.min_lid_width(), self.max_lid_width());
    }

    pub fn lid_is_on(&self) -> bool {
        self.lid_is_on
    }

    /// Detaches the lid. Returns false if it was already off.
    pub fn blow_lid_off(&mut self) -> bool {
        if !self.lid_is_on {
            return false;
        }
        self.lid_is_on = false;
        log::info!("Lid blown off the container");
        true
    }

    /// Puts the lid back, fully closed
    pub fn return_lid(&mut self) {
        if !self.lid_is_on {
            log::info!("Lid returned to the container");
        }
        self.lid_is_on = true;
        self.lid_width = self.max_lid_width();
    }

    pub fn is_lid_open(&self) -> bool {
        !self.lid_is_on || self.lid_width < self.max_lid_width()
    }

    pub fn opening_left(&self) -> f64 {
        if self.lid_is_on {
            self.left() + self.lid_width
        } else {
            self.left()
        }
    }

    pub fn opening_right(&self) -> f64 {
        if self.lid_is_on {
            self.right() - self.config.opening_right_inset
        } else {
            self.right()
        }
    }

    pub fn opening_width(&self) -> f64 {
        (self.opening_right() - self.opening_left()).max(0.0)
    }

    /// Whether a particle has cleared the top through the opening
    pub fn is_escaping(&self, particle: &Particle) -> bool {
        self.is_lid_open()
            && particle.top() > self.top()
            && particle.left() > self.opening_left()
            && particle.right() < self.opening_right()
    }

    /// Where the pump hose meets the outside of the right wall
    pub fn hose_position(&self) -> DVec2 {
        DVec2::new(
            self.right() + self.config.wall_thickness,
            self.bottom() + self.config.height / 2.0,
        )
    }

    /// Starting center for a pumped particle, just inside the right wall
    pub fn injection_point(&self, radius: f64) -> DVec2 {
        let hose = self.hose_position();
        DVec2::new(hose.x - self.config.wall_thickness - radius, hose.y)
    }
}

impl Walls for IdealGasContainer {
    fn bounds(&self) -> Bounds {
        self.inner_bounds()
    }

    fn left_wall_velocity(&self) -> f64 {
        self.left_wall_velocity
    }

    fn left_wall_does_work(&self) -> bool {
        self.config.left_wall_does_work
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn container() -> IdealGasContainer {
        IdealGasContainer::new(ContainerConfig::default()).unwrap()
    }

    #[test]
    fn default_geometry() {
        let c = container();
        assert_eq!(c.width(), 10000.0);
        assert_eq!(c.left(), -10000.0);
        assert_eq!(c.top(), 8750.0);
        assert_relative_eq!(c.volume(), 10000.0 * 8750.0 * 8750.0);
        assert!(c.lid_is_on());
        assert!(!c.is_lid_open());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = ContainerConfig::default();
        config.width_range.default = 20000.0;
        assert!(matches!(
            IdealGasContainer::new(config),
            Err(ConfigError::InvalidWidthRange { .. })
        ));

        let mut config = ContainerConfig::default();
        config.min_lid_width = 4500.0;
        assert!(matches!(
            IdealGasContainer::new(config),
            Err(ConfigError::InvalidLidRange { .. })
        ));
    }

    #[test]
    fn resize_is_clamped_and_animated() {
        let mut c = container();
        c.resize(1.0);
        assert_eq!(c.desired_width(), 5000.0);
        assert!(c.step_width(1.0));
        assert_relative_eq!(c.width(), 9500.0);
        for _ in 0..20 {
            c.step_width(1.0);
        }
        assert_eq!(c.width(), 5000.0);
        assert!(!c.step_width(1.0));
    }

    #[test]
    fn wall_velocity_follows_left_wall() {
        let mut c = container();
        c.resize(9000.0);
        c.step_width(1.0);
        c.step(1.0);
        // narrower container: left wall moved right, i.e. closing
        assert_relative_eq!(c.left_wall_velocity(), 500.0);
        c.step(1.0);
        assert_eq!(c.left_wall_velocity(), 0.0);
    }

    #[test]
    fn immediate_resize_has_no_wall_motion() {
        let mut c = container();
        c.resize_immediately(20000.0);
        assert_eq!(c.width(), 15000.0);
        c.step(0.1);
        assert_eq!(c.left_wall_velocity(), 0.0);
    }

    #[test]
    fn lid_width_is_clamped() {
        let mut c = container();
        c.set_lid_width(0.0);
        assert_eq!(c.lid_width(), c.min_lid_width());
        assert!(c.is_lid_open());
        c.set_lid_width(1e9);
        assert_eq!(c.lid_width(), c.max_lid_width());
        assert!(!c.is_lid_open());
    }

    #[test]
    fn resizing_preserves_the_opening() {
        let mut c = container();
        c.set_lid_width(c.max_lid_width() - 2000.0);
        c.resize_immediately(12000.0);
        assert_relative_eq!(c.opening_width(), 2000.0);

        // a closed lid stays closed
        c.return_lid();
        c.resize_immediately(6000.0);
        assert!(!c.is_lid_open());
    }

    #[test]
    fn blown_lid_opens_the_whole_top() {
        let mut c = container();
        assert!(c.blow_lid_off());
        assert!(!c.blow_lid_off());
        assert!(c.is_lid_open());
        assert_eq!(c.opening_left(), c.left());
        assert_eq!(c.opening_right(), c.right());
        c.return_lid();
        assert!(!c.is_lid_open());
    }

    #[test]
    fn escaping_requires_an_open_lid() {
        let mut c = container();
        let p = Particle::new_heavy().at(-5000.0, c.top() + 10.0);
        assert!(!c.is_escaping(&p));
        c.set_lid_width(c.min_lid_width());
        assert!(c.is_escaping(&p));
        let under_lid = Particle::new_heavy().at(c.left() + 100.0, c.top() + 10.0);
        assert!(!c.is_escaping(&under_lid));
    }

    #[test]
    fn injection_point_is_inside_right_wall() {
        let c = container();
        let p = c.injection_point(125.0);
        assert_eq!(p, DVec2::new(-125.0, 4375.0));
        assert!(c.inner_bounds().contains_point(p));
    }

    #[test]
    fn model_bounds_enclose_the_largest_container() {
        let c = container();
        let model = c.model_bounds();
        assert_eq!(model.min_x(), -25000.0);
        assert_eq!(model.max_x(), 10000.0);
        assert_eq!(model.min_y(), 0.0);
        assert_eq!(model.max_y(), 18750.0);
    }
}
