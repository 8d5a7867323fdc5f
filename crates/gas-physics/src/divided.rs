//! Fixed-size container split in half by a removable divider

use glam::DVec2;

use crate::bounds::Bounds;
use crate::container::Walls;
use crate::error::ConfigError;
use crate::particle::Particle;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DividedContainerConfig {
    /// Bottom-left inner corner, pm
    pub position: DVec2,
    pub width: f64,
    pub height: f64,
    pub wall_thickness: f64,
    pub divider_thickness: f64,
}

impl Default for DividedContainerConfig {
    fn default() -> Self {
        Self {
            position: DVec2::ZERO,
            width: 16000.0,
            height: 8750.0,
            wall_thickness: 75.0,
            divider_thickness: 75.0,
        }
    }
}

impl DividedContainerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("width", self.width),
            ("height", self.height),
            ("wall_thickness", self.wall_thickness),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidDimension { name, value });
            }
        }
        if !(self.divider_thickness >= 0.0 && self.divider_thickness < self.width) {
            return Err(ConfigError::InvalidDimension {
                name: "divider_thickness",
                value: self.divider_thickness,
            });
        }
        Ok(())
    }
}

/// Container for the diffusion experiment
#[derive(Debug, Clone)]
pub struct DividedContainer {
    config: DividedContainerConfig,
    has_divider: bool,
}

impl DividedContainer {
    pub fn new(config: DividedContainerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            has_divider: true,
        })
    }

    pub fn config(&self) -> &DividedContainerConfig {
        &self.config
    }

    pub fn reset(&mut self) {
        self.has_divider = true;
    }

    pub fn has_divider(&self) -> bool {
        self.has_divider
    }

    /// Inserts or removes the divider. Returns whether anything changed.
    pub fn set_has_divider(&mut self, has_divider: bool) -> bool {
        if self.has_divider == has_divider {
            return false;
        }
        self.has_divider = has_divider;
        log::info!("Divider {}", if has_divider { "restored" } else { "removed" });
        true
    }

    pub fn height(&self) -> f64 {
        self.config.height
    }

    pub fn width(&self) -> f64 {
        self.config.width
    }

    pub fn inner_bounds(&self) -> Bounds {
        let p = self.config.position;
        Bounds::new(p.x, p.y, p.x + self.config.width, p.y + self.config.height)
    }

    /// Center of the divider
    pub fn divider_x(&self) -> f64 {
        self.config.position.x + self.config.width / 2.0
    }

    pub fn left_bounds(&self) -> Bounds {
        let b = self.inner_bounds();
        Bounds::new(
            b.min_x(),
            b.min_y(),
            self.divider_x() - self.config.divider_thickness / 2.0,
            b.max_y(),
        )
    }

    pub fn right_bounds(&self) -> Bounds {
        let b = self.inner_bounds();
        Bounds::new(
            self.divider_x() + self.config.divider_thickness / 2.0,
            b.min_y(),
            b.max_x(),
            b.max_y(),
        )
    }

    fn is_left_of_divider(&self, x: f64) -> bool {
        x < self.divider_x()
    }
}

impl Walls for DividedContainer {
    fn bounds(&self) -> Bounds {
        self.inner_bounds()
    }

    fn wall_bounds_for(&self, particle: &Particle) -> Bounds {
        if !self.has_divider {
            self.inner_bounds()
        } else if self.is_left_of_divider(particle.position.x) {
            self.left_bounds()
        } else {
            self.right_bounds()
        }
    }

    fn separated(&self, a: DVec2, b: DVec2) -> bool {
        self.has_divider && self.is_left_of_divider(a.x) != self.is_left_of_divider(b.x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn halves_exclude_the_divider() {
        let c = DividedContainer::new(DividedContainerConfig::default()).unwrap();
        assert_eq!(c.divider_x(), 8000.0);
        assert_eq!(c.left_bounds().max_x(), 7962.5);
        assert_eq!(c.right_bounds().min_x(), 8037.5);
    }

    #[test]
    fn wall_bounds_depend_on_the_divider() {
        let mut c = DividedContainer::new(DividedContainerConfig::default()).unwrap();
        let left = Particle::new_heavy().at(1000.0, 1000.0);
        let right = Particle::new_heavy().at(15000.0, 1000.0);
        assert_eq!(c.wall_bounds_for(&left), c.left_bounds());
        assert_eq!(c.wall_bounds_for(&right), c.right_bounds());
        assert!(c.separated(left.position, right.position));

        assert!(c.set_has_divider(false));
        assert!(!c.set_has_divider(false));
        assert_eq!(c.wall_bounds_for(&left), c.inner_bounds());
        assert!(!c.separated(left.position, right.position));
    }

    #[test]
    fn invalid_divider_is_rejected() {
        let config = DividedContainerConfig {
            divider_thickness: -1.0,
            ..Default::default()
        };
        assert!(DividedContainer::new(config).is_err());
    }
}
