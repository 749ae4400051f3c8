use crate::core::angle::{AngleModel, RotatingBody};

/// Advances rotating bodies with frame-rate independent exponential decay.
///
/// Friction is expressed per nominal frame; a step of `dt` seconds applies
/// `friction^(dt / nominal_dt)`, so two half-length steps decay exactly like
/// one full step.
#[derive(Debug, Clone, Copy)]
pub struct Integrator {
    nominal_dt: f32,
    /// Speeds below this (rad/s) snap to zero.
    rest_velocity: f64,
}

impl Integrator {
    pub fn new(nominal_dt: f32, rest_velocity: f64) -> Self {
        Self {
            nominal_dt,
            rest_velocity,
        }
    }

    /// Move `body` by its velocity, then decay the velocity.
    pub fn advance(&self, body: &mut RotatingBody, dt: f32) {
        if body.is_at_rest() || dt <= 0.0 {
            return;
        }
        body.angle += body.angular_velocity * dt as f64;

        let frames = (dt / self.nominal_dt) as f64;
        body.angular_velocity *= body.friction.powf(frames);
        if body.angular_velocity.abs() < self.rest_velocity {
            body.angular_velocity = 0.0;
        }
    }

    /// Advance both bodies independently.
    pub fn advance_all(&self, model: &mut AngleModel, dt: f32) {
        self.advance(&mut model.wheel, dt);
        self.advance(&mut model.marker, dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn advance_moves_then_decays() {
        let integrator = Integrator::new(DT, 1e-4);
        let mut body = RotatingBody::new(0.0, 0.9).with_velocity(6.0);
        integrator.advance(&mut body, DT);
        assert!((body.angle - 0.1).abs() < 1e-6);
        assert!((body.angular_velocity - 5.4).abs() < 1e-6);
    }

    #[test]
    fn decay_is_frame_rate_independent() {
        let integrator = Integrator::new(DT, 0.0);
        let mut a = RotatingBody::new(0.0, 0.95).with_velocity(10.0);
        let mut b = a;
        integrator.advance(&mut a, DT);
        integrator.advance(&mut b, DT / 2.0);
        integrator.advance(&mut b, DT / 2.0);
        assert!((a.angular_velocity - b.angular_velocity).abs() < 1e-5);
    }

    #[test]
    fn slow_body_comes_to_rest() {
        let integrator = Integrator::new(DT, 0.05);
        let mut body = RotatingBody::new(1.0, 0.5).with_velocity(0.08);
        integrator.advance(&mut body, DT);
        assert!(body.is_at_rest());
        // A resting body no longer moves
        let angle = body.angle;
        integrator.advance(&mut body, DT);
        assert_eq!(body.angle, angle);
    }

    #[test]
    fn negative_velocity_decays_toward_zero() {
        let integrator = Integrator::new(DT, 1e-3);
        let mut body = RotatingBody::new(0.0, 0.99).with_velocity(-12.0);
        for _ in 0..60 {
            integrator.advance(&mut body, DT);
        }
        assert!(body.angle < 0.0);
        assert!(body.angular_velocity < 0.0 && body.angular_velocity > -12.0);
    }
}
