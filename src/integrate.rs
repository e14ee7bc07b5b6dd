//! Integrators over [`LinearState`] and [`AngularState`]: Euler,
//! semi-implicit Euler, position-based Verlet, and RK4, plus a small
//! exp-map quaternion update for angular state. Each integrator is a pure
//! function over `(state, dt)`, like every other routine in [`crate::numal`].

use crate::numal::quat;
use crate::numal::vec3::length;
use crate::numal::{Quat, Vec3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearState {
    pub position: Vec3,
    pub velocity: Vec3,
    pub acceleration: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngularState {
    pub orientation: Quat,
    pub angular_velocity: Vec3,
    pub angular_acceleration: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Euler,
    SemiImplicit,
    Verlet,
    Rk4,
}

/// `v <- v + a*dt; p <- p + v_prev*dt` — position advances on the
/// pre-update velocity.
pub fn euler(state: &LinearState, dt: f32) -> LinearState {
    let v_prev = state.velocity;
    let velocity = state.velocity + state.acceleration * dt;
    let position = state.position + v_prev * dt;
    LinearState { position, velocity, acceleration: state.acceleration }
}

/// `v <- v + a*dt; p <- p + v*dt` — position advances on the post-update
/// velocity, the usual choice for stable game-loop integration.
pub fn semi_implicit(state: &LinearState, dt: f32) -> LinearState {
    let velocity = state.velocity + state.acceleration * dt;
    let position = state.position + velocity * dt;
    LinearState { position, velocity, acceleration: state.acceleration }
}

/// Position-based Verlet: `p_next = 2p - p_prev + a*dt^2`. The caller owns
/// `p_prev`; this crate holds no implicit history.
pub fn verlet(position: Vec3, prev_position: Vec3, acceleration: Vec3, dt: f32) -> Vec3 {
    position * 2.0 - prev_position + acceleration * (dt * dt)
}

/// Standard 4-stage RK4 over `(p, v)` with `a` held constant across `dt`.
pub fn rk4(state: &LinearState, dt: f32) -> LinearState {
    let a = state.acceleration;
    let deriv = |v: Vec3| -> (Vec3, Vec3) { (v, a) };

    let (k1p, k1v) = deriv(state.velocity);
    let (k2p, k2v) = deriv(state.velocity + k1v * (dt * 0.5));
    let (k3p, k3v) = deriv(state.velocity + k2v * (dt * 0.5));
    let (k4p, k4v) = deriv(state.velocity + k3v * dt);

    let position = state.position + (k1p + k2p * 2.0 + k3p * 2.0 + k4p) * (dt / 6.0);
    let velocity = state.velocity + (k1v + k2v * 2.0 + k3v * 2.0 + k4v) * (dt / 6.0);
    LinearState { position, velocity, acceleration: a }
}

/// Dispatches on `method`. Verlet has no velocity term in its own recipe,
/// so the returned `velocity` is the secant estimate `(p_next - p)/dt`,
/// purely informational — callers that want exact Verlet history should
/// call [`verlet`] directly and keep their own `p_prev`.
pub fn integrate(method: Method, state: &LinearState, prev_position: Option<Vec3>, dt: f32) -> LinearState {
    match method {
        Method::Euler => euler(state, dt),
        Method::SemiImplicit => semi_implicit(state, dt),
        Method::Verlet => {
            let prev = prev_position.unwrap_or(state.position - state.velocity * dt);
            let next = verlet(state.position, prev, state.acceleration, dt);
            let velocity = if dt != 0.0 { (next - state.position) / dt } else { state.velocity };
            LinearState { position: next, velocity, acceleration: state.acceleration }
        }
        Method::Rk4 => rk4(state, dt),
    }
}

/// `q_next = normalize(delta_q(omega, dt) * q)` where `delta_q` is the
/// exp-map quaternion for the angular velocity over `dt`. Angular velocity
/// itself advances by constant angular acceleration first.
pub fn integrate_angular(state: &AngularState, dt: f32) -> AngularState {
    let angular_velocity = state.angular_velocity + state.angular_acceleration * dt;
    let angle = length(angular_velocity) * dt;
    let delta = quat::from_axis_angle(angular_velocity, angle);
    let orientation = delta * state.orientation;
    AngularState { orientation, angular_velocity, angular_acceleration: state.angular_acceleration }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec3, b: Vec3, eps: f32) -> bool {
        (a - b).norm() <= eps
    }

    #[test]
    fn euler_matches_hand_computed_step() {
        let state = LinearState {
            position: Vec3::new(0.0, 0.0, 0.0),
            velocity: Vec3::new(1.0, 0.0, 0.0),
            acceleration: Vec3::new(0.0, -1.0, 0.0),
        };
        let next = euler(&state, 1.0);
        assert!(close(next.position, Vec3::new(1.0, 0.0, 0.0), 1.0e-6));
        assert!(close(next.velocity, Vec3::new(1.0, -1.0, 0.0), 1.0e-6));
    }

    #[test]
    fn semi_implicit_uses_updated_velocity_for_position() {
        let state = LinearState {
            position: Vec3::new(0.0, 0.0, 0.0),
            velocity: Vec3::new(1.0, 0.0, 0.0),
            acceleration: Vec3::new(0.0, -1.0, 0.0),
        };
        let next = semi_implicit(&state, 1.0);
        assert!(close(next.position, Vec3::new(1.0, -1.0, 0.0), 1.0e-6));
    }

    #[test]
    fn verlet_matches_constant_acceleration_trajectory() {
        // p(t) = 0.5*a*t^2, sampled at integer steps with dt=1, a=(0,-1,0).
        let a = Vec3::new(0.0, -1.0, 0.0);
        let p_prev = Vec3::new(0.0, 0.0, 0.0); // p(-1) would be 0.5 under this model's symmetric assumption
        let p0 = Vec3::new(0.0, 0.0, 0.0);
        let p1 = verlet(p0, p_prev, a, 1.0);
        assert!(close(p1, Vec3::new(0.0, -1.0, 0.0), 1.0e-6));
    }

    #[test]
    fn rk4_matches_analytic_constant_acceleration_solution() {
        let state = LinearState {
            position: Vec3::new(0.0, 0.0, 0.0),
            velocity: Vec3::new(0.0, 0.0, 0.0),
            acceleration: Vec3::new(0.0, -9.8, 0.0),
        };
        let dt = 1.0;
        let next = rk4(&state, dt);
        // Exact for constant acceleration: p = 0.5*a*t^2, v = a*t.
        assert!(close(next.position, Vec3::new(0.0, -4.9, 0.0), 1.0e-4));
        assert!(close(next.velocity, Vec3::new(0.0, -9.8, 0.0), 1.0e-4));
    }

    #[test]
    fn integrate_angular_small_step_matches_axis_angle_update() {
        let state = AngularState {
            orientation: Quat::identity(),
            angular_velocity: Vec3::new(0.0, 0.0, 1.0),
            angular_acceleration: Vec3::zeros(),
        };
        let next = integrate_angular(&state, 0.1);
        let expected = quat::from_axis_angle(Vec3::new(0.0, 0.0, 1.0), 0.1);
        assert!(next.orientation.angle_to(&expected) < 1.0e-5);
    }
}
