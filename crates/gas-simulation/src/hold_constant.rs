//! Hold-constant modes and the conditions that break them

use std::fmt;

/// Which ideal-gas quantity the model keeps fixed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HoldConstant {
    #[default]
    Nothing,
    /// The container cannot be resized
    Volume,
    /// Heating and cooling are disabled
    Temperature,
    /// Pressure is pinned by resizing the container
    PressureAtConstantTemperature,
    /// Pressure is pinned by rescaling particle speeds
    PressureAtConstantVolume,
}

impl HoldConstant {
    pub fn holds_pressure(self) -> bool {
        matches!(
            self,
            HoldConstant::PressureAtConstantTemperature | HoldConstant::PressureAtConstantVolume
        )
    }

    /// Condition raised when this mode is active with no particles in the container
    pub fn empty_container_oops(self) -> Option<Oops> {
        match self {
            HoldConstant::Temperature => Some(Oops::TemperatureEmpty),
            HoldConstant::PressureAtConstantTemperature | HoldConstant::PressureAtConstantVolume => {
                Some(Oops::PressureEmpty)
            }
            HoldConstant::Nothing | HoldConstant::Volume => None,
        }
    }

    /// Whether the user may resize the container
    pub fn allows_resize(self) -> bool {
        !matches!(
            self,
            HoldConstant::Volume | HoldConstant::PressureAtConstantTemperature
        )
    }

    pub fn allows_heat_cool(self) -> bool {
        self != HoldConstant::Temperature
    }
}

/// A hold-constant mode became physically inconsistent.
///
/// The model has already switched back to [`HoldConstant::Nothing`] when
/// one of these is reported; the caller only needs to tell the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Oops {
    TemperatureEmpty,
    PressureEmpty,
    PressureLarge,
    PressureSmall,
}

impl fmt::Display for Oops {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Oops::TemperatureEmpty => "Temperature cannot be held constant when the container is empty.",
            Oops::PressureEmpty => "Pressure cannot be held constant when the container is empty.",
            Oops::PressureLarge => "Pressure cannot be held constant. Volume would be too large.",
            Oops::PressureSmall => "Pressure cannot be held constant. Volume would be too small.",
        };
        f.write_str(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_container_conditions() {
        assert_eq!(HoldConstant::Nothing.empty_container_oops(), None);
        assert_eq!(HoldConstant::Volume.empty_container_oops(), None);
        assert_eq!(
            HoldConstant::Temperature.empty_container_oops(),
            Some(Oops::TemperatureEmpty)
        );
        assert_eq!(
            HoldConstant::PressureAtConstantVolume.empty_container_oops(),
            Some(Oops::PressureEmpty)
        );
    }

    #[test]
    fn resize_and_heat_permissions() {
        assert!(HoldConstant::Nothing.allows_resize());
        assert!(!HoldConstant::Volume.allows_resize());
        assert!(!HoldConstant::PressureAtConstantTemperature.allows_resize());
        assert!(HoldConstant::PressureAtConstantVolume.allows_resize());
        assert!(!HoldConstant::Temperature.allows_heat_cool());
        assert!(HoldConstant::PressureAtConstantVolume.allows_heat_cool());
    }

    #[test]
    fn oops_messages_are_user_facing() {
        assert!(Oops::PressureLarge.to_string().contains("too large"));
        assert!(Oops::PressureSmall.to_string().contains("too small"));
    }
}
