//! Easing curves and the progress spring

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// CSS-style `cubic-bezier(x1, y1, x2, y2)` timing function
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CubicBezier {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl CubicBezier {
    /// Fast start, long soft landing; used by every entrance reveal
    pub const OUT_EXPO: CubicBezier = CubicBezier::new(0.16, 1.0, 0.3, 1.0);

    pub const fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    fn sample(a1: f32, a2: f32, t: f32) -> f32 {
        // B(t) for P0 = 0, P3 = 1
        let u = 1.0 - t;
        3.0 * u * u * t * a1 + 3.0 * u * t * t * a2 + t * t * t
    }

    fn slope(a1: f32, a2: f32, t: f32) -> f32 {
        let u = 1.0 - t;
        3.0 * u * u * a1 + 6.0 * u * t * (a2 - a1) + 3.0 * t * t * (1.0 - a2)
    }

    /// Curve parameter whose x equals `x`
    fn solve_t(&self, x: f32) -> f32 {
        // Newton first, bisection if the slope flattens out
        let mut t = x;
        for _ in 0..8 {
            let err = Self::sample(self.x1, self.x2, t) - x;
            if err.abs() < 1e-6 {
                return t;
            }
            let d = Self::slope(self.x1, self.x2, t);
            if d.abs() < 1e-6 {
                break;
            }
            t = (t - err / d).clamp(0.0, 1.0);
        }

        let (mut lo, mut hi) = (0.0f32, 1.0f32);
        t = x;
        for _ in 0..32 {
            let value = Self::sample(self.x1, self.x2, t);
            if (value - x).abs() < 1e-6 {
                break;
            }
            if value < x {
                lo = t;
            } else {
                hi = t;
            }
            t = (lo + hi) / 2.0;
        }
        t
    }

    /// Eased progress for linear progress `x` in 0..=1
    pub fn apply(&self, x: f32) -> f32 {
        let x = x.clamp(0.0, 1.0);
        if x == 0.0 || x == 1.0 {
            return x;
        }
        Self::sample(self.y1, self.y2, self.solve_t(x))
    }
}

/// Damped spring chasing a target, integrated at a fixed step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spring {
    pub stiffness: f32,
    pub damping: f32,
    pub rest_delta: f32,
    value: f32,
    velocity: f32,
    target: f32,
    accumulator: f32,
    /// Output is clamped into this range
    bounds: Option<(f32, f32)>,
}

impl Spring {
    pub fn new(stiffness: f32, damping: f32, rest_delta: f32) -> Self {
        Self {
            stiffness,
            damping,
            rest_delta,
            value: 0.0,
            velocity: 0.0,
            target: 0.0,
            accumulator: 0.0,
            bounds: None,
        }
    }

    /// The scroll-progress spring: overdamped and clamped to 0..=1
    pub fn progress() -> Self {
        Self::new(PROGRESS_STIFFNESS, PROGRESS_DAMPING, PROGRESS_REST_DELTA).bounded(0.0, 1.0)
    }

    pub fn bounded(mut self, min: f32, max: f32) -> Self {
        self.bounds = Some((min, max));
        self.value = self.clamp(self.value);
        self
    }

    fn clamp(&self, v: f32) -> f32 {
        match self.bounds {
            Some((min, max)) => v.clamp(min, max),
            None => v,
        }
    }

    pub fn set_target(&mut self, target: f32) {
        self.target = self.clamp(target);
    }

    /// Jump straight to `value` with no motion
    pub fn snap_to(&mut self, value: f32) {
        self.value = self.clamp(value);
        self.target = self.value;
        self.velocity = 0.0;
        self.accumulator = 0.0;
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn is_at_rest(&self) -> bool {
        self.value == self.target && self.velocity == 0.0
    }

    /// Advance by a frame's worth of time; returns the new value
    pub fn advance(&mut self, dt: f32) -> f32 {
        if self.is_at_rest() {
            self.accumulator = 0.0;
            return self.value;
        }
        self.accumulator += dt.clamp(0.0, 0.1);

        let mut substeps = 0;
        while self.accumulator >= SPRING_DT && substeps < MAX_SPRING_SUBSTEPS {
            self.integrate(SPRING_DT);
            self.accumulator -= SPRING_DT;
            substeps += 1;
        }
        if substeps == MAX_SPRING_SUBSTEPS {
            // Long frame: drop the backlog instead of catching up
            self.accumulator = 0.0;
        }

        if (self.value - self.target).abs() < self.rest_delta
            && self.velocity.abs() < self.rest_delta
        {
            self.value = self.target;
            self.velocity = 0.0;
        }
        self.value
    }

    fn integrate(&mut self, dt: f32) {
        // Semi-implicit Euler, unit mass
        let force = -self.stiffness * (self.value - self.target) - self.damping * self.velocity;
        self.velocity += force * dt;
        let next = self.value + self.velocity * dt;
        let clamped = self.clamp(next);
        if clamped != next {
            self.velocity = 0.0;
        }
        self.value = clamped;
    }
}
