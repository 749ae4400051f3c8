use std::f64::consts::PI;

use crate::core::angle::{wrap_to_pi, AngleModel};

/// Extra ticks allowed on top of the pure-blend bound, to absorb the
/// marker's residual relative velocity.
pub const CONVERGE_SLACK_FRAMES: u32 = 120;

/// One pure blend step: the remaining error after moving `blend` of the way.
#[inline]
pub fn blend_step(delta: f64, blend: f64) -> f64 {
    delta * (1.0 - blend)
}

/// Upper bound on pure blend steps needed to bring `|delta0|` within `tolerance`.
pub fn frame_bound(delta0: f64, blend: f64, tolerance: f64) -> u32 {
    let d = delta0.abs();
    if d <= tolerance {
        return 0;
    }
    ((d / tolerance).ln() / (1.0 / (1.0 - blend)).ln()).ceil() as u32
}

/// Result of one convergence tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConvergenceStep {
    Approaching { remaining: f64 },
    /// Marker snapped exactly onto the target.
    Aligned,
}

/// Steers the marker onto a sector center in the wheel's frame.
///
/// The marker is tracked by its unwrapped angle relative to the wheel, so a
/// wheel that is still turning carries the target along with it. The relative
/// velocity left over from the free spin bleeds off by `blend` each tick while
/// the position error shrinks by the same factor.
#[derive(Debug, Clone)]
pub struct ConvergenceController {
    target: f64,
    relative: f64,
    relative_velocity: f64,
    blend: f64,
    tolerance: f64,
    frames: u32,
    max_frames: u32,
}

impl ConvergenceController {
    /// `target` is the wheel-relative sector center.
    pub fn new(target: f64, angles: &AngleModel, blend: f64, tolerance: f64) -> Self {
        Self {
            target,
            relative: angles.marker_relative_unwrapped(),
            relative_velocity: angles.relative_velocity(),
            blend,
            tolerance,
            frames: 0,
            max_frames: frame_bound(PI, blend, tolerance) + CONVERGE_SLACK_FRAMES,
        }
    }

    /// Shortest signed distance from the marker to the target.
    pub fn remaining(&self) -> f64 {
        wrap_to_pi(self.target - self.relative)
    }

    pub fn frames(&self) -> u32 {
        self.frames
    }

    pub fn max_frames(&self) -> u32 {
        self.max_frames
    }

    /// Unwrapped wheel-relative marker angle.
    pub fn relative(&self) -> f64 {
        self.relative
    }

    /// Advance one tick. The wheel must already have been advanced for this tick.
    pub fn step(&mut self, angles: &mut AngleModel, dt: f32) -> ConvergenceStep {
        self.frames += 1;
        self.relative_velocity *= 1.0 - self.blend;
        self.relative += self.relative_velocity * dt as f64;

        let delta = self.remaining();
        let result = if delta.abs() <= self.tolerance || self.frames >= self.max_frames {
            if delta.abs() > self.tolerance {
                log::warn!(
                    "convergence forced after {} frames ({:.4} rad left)",
                    self.frames,
                    delta
                );
            }
            self.relative += delta;
            self.relative_velocity = 0.0;
            ConvergenceStep::Aligned
        } else {
            self.relative += delta * self.blend;
            ConvergenceStep::Approaching {
                remaining: self.remaining(),
            }
        };

        angles.marker.angle = angles.wheel.angle + self.relative;
        angles.marker.angular_velocity = angles.wheel.angular_velocity + self.relative_velocity;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::angle::normalize_angle;

    const DT: f32 = 1.0 / 60.0;
    const BLEND: f64 = 0.09;
    const TOL: f64 = 0.025;

    fn run(angles: &mut AngleModel, target: f64) -> u32 {
        let mut ctl = ConvergenceController::new(target, angles, BLEND, TOL);
        loop {
            if ctl.step(angles, DT) == ConvergenceStep::Aligned {
                return ctl.frames();
            }
            assert!(ctl.frames() < ctl.max_frames());
        }
    }

    #[test]
    fn pure_blend_meets_frame_bound() {
        for i in 0..=40 {
            let delta0 = -PI + i as f64 * (2.0 * PI / 40.0);
            let bound = frame_bound(delta0, BLEND, TOL);
            let mut delta = delta0;
            let mut frames = 0;
            while delta.abs() > TOL {
                delta = blend_step(delta, BLEND);
                frames += 1;
            }
            assert!(frames <= bound, "delta0={delta0} took {frames} > {bound}");
        }
    }

    #[test]
    fn frame_bound_is_zero_inside_tolerance() {
        assert_eq!(frame_bound(0.01, BLEND, TOL), 0);
        assert!(frame_bound(PI, BLEND, TOL) > 0);
    }

    #[test]
    fn stationary_marker_reaches_target() {
        let mut angles = AngleModel::new(0.99, 0.98);
        angles.marker.angle = 2.5;
        let target = 0.3;
        let frames = run(&mut angles, target);
        assert!(frames <= frame_bound(PI, BLEND, TOL));
        assert!((normalize_angle(angles.marker.angle) - target).abs() < 1e-9);
    }

    #[test]
    fn takes_shortest_path() {
        let mut angles = AngleModel::new(0.99, 0.98);
        angles.marker.angle = 6.0;
        let mut ctl = ConvergenceController::new(0.2, &angles, BLEND, TOL);
        ctl.step(&mut angles, DT);
        // 6.0 -> 0.2 is shorter forwards through 2π
        assert!(angles.marker.angle > 6.0);
    }

    #[test]
    fn target_rides_a_turning_wheel() {
        let mut angles = AngleModel::new(0.99, 0.98);
        angles.wheel.angular_velocity = -3.0;
        angles.marker.angle = 1.0;
        angles.marker.angular_velocity = 0.5;
        let target = 4.0;
        let mut ctl = ConvergenceController::new(target, &angles, BLEND, TOL);
        loop {
            angles.wheel.angle += angles.wheel.angular_velocity * DT as f64;
            if ctl.step(&mut angles, DT) == ConvergenceStep::Aligned {
                break;
            }
        }
        let rel = normalize_angle(angles.marker.angle - angles.wheel.angle);
        assert!((rel - target).abs() < 1e-9, "rel = {rel}");
        assert_eq!(angles.marker.angular_velocity, angles.wheel.angular_velocity);
    }

    #[test]
    fn marker_never_jumps() {
        let mut angles = AngleModel::new(0.99, 0.98);
        angles.marker.angle = 0.0;
        let mut ctl = ConvergenceController::new(PI - 0.01, &angles, BLEND, TOL);
        let mut last = angles.marker.angle;
        while ctl.step(&mut angles, DT) != ConvergenceStep::Aligned {
            assert!((angles.marker.angle - last).abs() <= PI * BLEND + 1e-9);
            last = angles.marker.angle;
        }
        assert!((angles.marker.angle - last).abs() <= TOL + 1e-9);
    }
}
