use std::f64::consts::PI;

use crate::core::angle::AngleModel;
use crate::extensions::easing::{ease, Easing};

/// Result of one settle tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SettleStep {
    Bouncing { offset: f64 },
    Finished,
}

/// Largest bounce that keeps the marker inside its sector.
pub fn max_amplitude(sector_angle: f64, align_tolerance: f64) -> f64 {
    (sector_angle / 2.0 - align_tolerance).max(0.0)
}

/// Decaying oscillation around the snapped resting angle.
///
/// `offset(t) = A · sin(t/D · n · π) · (1 − easing(t/D))`, added to the
/// wheel-relative rest angle. The marker rides the wheel throughout.
#[derive(Debug, Clone)]
pub struct SettleController {
    rest: f64,
    amplitude: f64,
    bounce_count: f32,
    duration: f32,
    easing: Easing,
    elapsed: f32,
}

impl SettleController {
    /// `rest` is the unwrapped wheel-relative angle the marker converged to.
    pub fn new(rest: f64, amplitude: f64, bounce_count: f32, duration: f32, easing: Easing) -> Self {
        Self {
            rest,
            amplitude,
            bounce_count,
            duration,
            easing,
            elapsed: 0.0,
        }
    }

    pub fn rest(&self) -> f64 {
        self.rest
    }

    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Offset from the rest angle at `t` seconds into the settle.
    pub fn offset_at(&self, t: f32) -> f64 {
        if self.duration <= 0.0 || t >= self.duration {
            return 0.0;
        }
        let p = (t / self.duration).max(0.0);
        let envelope = ease(1.0, 0.0, p, self.easing) as f64;
        let wave = (p as f64 * self.bounce_count as f64 * PI).sin();
        self.amplitude * wave * envelope
    }

    /// Advance one tick. The wheel must already have been advanced for this tick.
    pub fn step(&mut self, angles: &mut AngleModel, dt: f32) -> SettleStep {
        self.elapsed += dt;
        let offset = self.offset_at(self.elapsed);
        angles.marker.angle = angles.wheel.angle + self.rest + offset;
        angles.marker.angular_velocity = angles.wheel.angular_velocity;
        if self.is_finished() {
            SettleStep::Finished
        } else {
            SettleStep::Bouncing { offset }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::TAU;

    const DT: f32 = 1.0 / 60.0;

    fn controller() -> SettleController {
        SettleController::new(1.0, 0.06, 3.0, 0.7, Easing::Linear)
    }

    #[test]
    fn offset_starts_and_ends_at_rest() {
        let s = controller();
        assert_eq!(s.offset_at(0.0), 0.0);
        assert_eq!(s.offset_at(0.7), 0.0);
        assert_eq!(s.offset_at(5.0), 0.0);
    }

    #[test]
    fn offset_matches_formula() {
        let s = controller();
        let t = 0.1_f32;
        let p = (t / 0.7) as f64;
        let expected = 0.06 * (p * 3.0 * PI).sin() * (1.0 - p);
        assert!((s.offset_at(t) - expected).abs() < 1e-6);
    }

    #[test]
    fn offset_never_exceeds_amplitude() {
        let s = controller();
        for i in 0..100 {
            let t = i as f32 * 0.007;
            assert!(s.offset_at(t).abs() <= 0.06 + 1e-12);
        }
    }

    #[test]
    fn finishes_exactly_at_rest() {
        let mut angles = AngleModel::new(0.99, 0.98);
        angles.wheel.angle = 3.0;
        let mut s = controller();
        let mut ticks = 0;
        while s.step(&mut angles, DT) != SettleStep::Finished {
            ticks += 1;
            assert!(ticks < 100);
        }
        assert!((angles.marker.angle - 4.0).abs() < 1e-12);
        assert!(ticks >= 40);
    }

    #[test]
    fn amplitude_cap_keeps_sector() {
        let sa = TAU / 37.0;
        let cap = max_amplitude(sa, 0.025);
        assert!(cap < sa / 2.0);
        assert_eq!(max_amplitude(0.01, 0.025), 0.0);
    }
}
