use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::extensions::easing::Easing;

/// Tuning for one wheel. Every field has a default, so a JSON config only
/// needs the values it overrides.
///
/// Angular velocities are in rad/s; frictions are the fraction of velocity
/// retained per nominal frame (`fixed_dt`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpinConfig {
    /// Fixed timestep in seconds (default: 1/60).
    pub fixed_dt: f32,
    pub wheel_friction: f64,
    pub marker_friction: f64,
    /// Wheel spin imparted when the result arrives (negative = opposite to the marker).
    pub wheel_launch_velocity: f64,
    pub marker_launch_velocity: f64,
    /// Speeds below this snap to zero.
    pub rest_velocity: f64,
    /// Marker speed below which convergence begins.
    pub convergence_epsilon: f64,
    /// Angular distance (rad) at which the marker snaps onto the target.
    pub align_tolerance: f64,
    /// Fraction of the remaining error removed per tick while converging.
    pub blend_factor: f64,
    /// Peak settle offset in radians.
    pub bounce_amplitude: f64,
    /// Half-oscillations during the settle.
    pub bounce_count: f32,
    /// Settle duration in seconds.
    pub settle_duration: f32,
    /// Envelope shape for the settle decay.
    pub settle_easing: Easing,
    /// Longest free spin (seconds) before convergence is forced.
    pub max_free_spin: f32,
    /// Seconds to wait for the result authority before aborting.
    ///
    /// Counted in simulated time, i.e. summed tick `dt`s. The runner caps
    /// catch-up steps per frame, so a throttled or backgrounded tab stretches
    /// this in wall-clock time; hosts that need a hard deadline should also
    /// abort the request themselves and report it through `fail`.
    pub authority_timeout: f32,
    /// Pause between a finished spin and the next auto spin.
    pub auto_spin_delay: f32,
    /// Number of past outcomes kept.
    pub history_len: usize,
    pub chip_values: Vec<u64>,
    /// Index into `chip_values` selected at start.
    pub default_chip: usize,
    pub starting_balance: u64,
    /// Angle (wheel frame) where sector 0 begins.
    pub rotation_offset: f64,
    /// Square world size in render units; the wheel sits at its center.
    pub world_size: f32,
    /// Radius of the marker's track in render units.
    pub track_radius: f32,
}

impl Default for SpinConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            wheel_friction: 0.990,
            marker_friction: 0.984,
            wheel_launch_velocity: -12.0,
            marker_launch_velocity: 24.0,
            rest_velocity: 0.01,
            convergence_epsilon: 1.2,
            align_tolerance: 0.025,
            blend_factor: 0.09,
            bounce_amplitude: 0.06,
            bounce_count: 3.0,
            settle_duration: 0.7,
            settle_easing: Easing::Linear,
            max_free_spin: 15.0,
            authority_timeout: 8.0,
            auto_spin_delay: 3.0,
            history_len: 10,
            chip_values: vec![1, 5, 10, 25, 100, 500],
            default_chip: 2,
            starting_balance: 1000,
            rotation_offset: 0.0,
            world_size: 800.0,
            track_radius: 264.0,
        }
    }
}

impl SpinConfig {
    /// Parse and validate a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SpinConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        unit_range("wheel_friction", self.wheel_friction)?;
        unit_range("marker_friction", self.marker_friction)?;
        unit_range("blend_factor", self.blend_factor)?;

        positive("fixed_dt", self.fixed_dt as f64)?;
        positive("convergence_epsilon", self.convergence_epsilon)?;
        positive("align_tolerance", self.align_tolerance)?;
        positive("settle_duration", self.settle_duration as f64)?;
        positive("max_free_spin", self.max_free_spin as f64)?;
        positive("authority_timeout", self.authority_timeout as f64)?;
        positive("history_len", self.history_len as f64)?;
        positive("track_radius", self.track_radius as f64)?;
        non_negative("rest_velocity", self.rest_velocity)?;
        non_negative("bounce_amplitude", self.bounce_amplitude)?;
        non_negative("bounce_count", self.bounce_count as f64)?;
        non_negative("auto_spin_delay", self.auto_spin_delay as f64)?;

        if self.chip_values.is_empty() || self.chip_values.contains(&0) {
            return Err(ConfigError::InvalidChips);
        }
        if self.default_chip >= self.chip_values.len() {
            return Err(ConfigError::DefaultChipOutOfRange {
                index: self.default_chip,
                count: self.chip_values.len(),
            });
        }
        Ok(())
    }
}

fn unit_range(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value < 1.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfUnitRange { field, value })
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        SpinConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = SpinConfig::from_json(r#"{ "blend_factor": 0.1, "settle_easing": "quad_out" }"#)
            .unwrap();
        assert_eq!(config.blend_factor, 0.1);
        assert_eq!(config.settle_easing, Easing::QuadOut);
        assert_eq!(config.history_len, 10);
        assert_eq!(config.chip_values, vec![1, 5, 10, 25, 100, 500]);
    }

    #[test]
    fn rejects_friction_outside_unit_range() {
        let err = SpinConfig::from_json(r#"{ "marker_friction": 1.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::OutOfUnitRange { field: "marker_friction", .. }));
    }

    #[test]
    fn rejects_bad_default_chip() {
        let config = SpinConfig {
            chip_values: vec![5],
            default_chip: 1,
            ..SpinConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DefaultChipOutOfRange { index: 1, count: 1 })
        ));
    }

    #[test]
    fn rejects_garbage_json() {
        assert!(matches!(SpinConfig::from_json("{"), Err(ConfigError::Parse(_))));
    }
}
