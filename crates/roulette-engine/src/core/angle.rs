use std::f64::consts::{PI, TAU};

/// Wrap an angle into (-π, π]. Used for shortest-path angular differences.
#[inline]
pub fn wrap_to_pi(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped > PI {
        wrapped - TAU
    } else {
        wrapped
    }
}

/// Normalize an angle into [0, 2π).
#[inline]
pub fn normalize_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// A rotating body with unbounded angle and exponentially decaying velocity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotatingBody {
    /// Angle in radians. Never wrapped, so rendered motion stays continuous.
    pub angle: f64,
    /// Angular velocity in radians per second.
    pub angular_velocity: f64,
    /// Velocity retained per nominal frame, in (0, 1).
    pub friction: f64,
}

impl RotatingBody {
    pub fn new(angle: f64, friction: f64) -> Self {
        Self {
            angle,
            angular_velocity: 0.0,
            friction,
        }
    }

    pub fn with_velocity(mut self, angular_velocity: f64) -> Self {
        self.angular_velocity = angular_velocity;
        self
    }

    pub fn is_at_rest(&self) -> bool {
        self.angular_velocity == 0.0
    }

    pub fn is_finite(&self) -> bool {
        self.angle.is_finite() && self.angular_velocity.is_finite()
    }
}

/// Angular state of the two animated bodies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleModel {
    pub wheel: RotatingBody,
    pub marker: RotatingBody,
}

impl AngleModel {
    pub fn new(wheel_friction: f64, marker_friction: f64) -> Self {
        Self {
            wheel: RotatingBody::new(0.0, wheel_friction),
            marker: RotatingBody::new(0.0, marker_friction),
        }
    }

    /// Marker angle in the wheel's frame, in [0, 2π).
    pub fn marker_relative(&self) -> f64 {
        normalize_angle(self.marker.angle - self.wheel.angle)
    }

    /// Unwrapped marker angle in the wheel's frame.
    pub fn marker_relative_unwrapped(&self) -> f64 {
        self.marker.angle - self.wheel.angle
    }

    /// Relative angular velocity of the marker against the wheel.
    pub fn relative_velocity(&self) -> f64 {
        self.marker.angular_velocity - self.wheel.angular_velocity
    }

    pub fn is_finite(&self) -> bool {
        self.wheel.is_finite() && self.marker.is_finite()
    }
}
