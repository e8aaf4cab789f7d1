//! Ambient particle field
//!
//! A small pool of gold motes drifting up the page. The pool is a plain
//! `Vec` with a hard cap; dead particles are removed with `swap_remove`
//! so a frame costs O(live) no matter how many die at once.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::viewport::ViewportSize;
use crate::consts::*;
use crate::settings::Settings;

/// Halo radius relative to the core disc
pub const HALO_SCALE: f32 = 3.0;
/// Peak alpha of the core disc
pub const CORE_ALPHA: f32 = 0.15;
/// Peak alpha of the halo
pub const HALO_ALPHA: f32 = 0.03;

/// Share of lifetime spent fading in
const FADE_IN_END: f32 = 0.1;
/// Share of lifetime after which the particle fades out
const FADE_OUT_START: f32 = 0.8;
/// Horizontal wander: `sin(age * WANDER_FREQ) * WANDER_AMP` px per frame
const WANDER_FREQ: f32 = 0.01;
const WANDER_AMP: f32 = 0.1;

/// A single mote
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    /// Core disc radius (px)
    pub size: f32,
    /// Px per frame, negative is up
    pub vertical_speed: f32,
    /// Px per frame
    pub horizontal_speed: f32,
    pub opacity: f32,
    /// Frames lived
    pub age: u32,
    /// Frames until expiry
    pub max_age: u32,
}

impl Particle {
    /// Fraction of lifetime used, 0..=1
    pub fn life_ratio(&self) -> f32 {
        if self.max_age == 0 {
            return 1.0;
        }
        (self.age as f32 / self.max_age as f32).min(1.0)
    }

    /// Advance one frame
    fn advance(&mut self) {
        self.age += 1;
        self.pos.x += self.horizontal_speed + (self.age as f32 * WANDER_FREQ).sin() * WANDER_AMP;
        self.pos.y += self.vertical_speed;
        self.opacity = lifetime_opacity(self.life_ratio());
    }

    /// Expired, or drifted above the top edge
    pub fn is_dead(&self) -> bool {
        self.age >= self.max_age || self.pos.y < -PARTICLE_EDGE_MARGIN
    }
}

/// Opacity envelope: ramp in over the first 10%, hold, fade over the last 20%
pub fn lifetime_opacity(ratio: f32) -> f32 {
    let ratio = ratio.clamp(0.0, 1.0);
    if ratio < FADE_IN_END {
        ratio / FADE_IN_END
    } else if ratio > FADE_OUT_START {
        (1.0 - ratio) / (1.0 - FADE_OUT_START)
    } else {
        1.0
    }
}

/// One filled circle to draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub center: Vec2,
    pub radius: f32,
    pub alpha: f32,
}

/// Tunables pulled from [`Settings`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldConfig {
    pub cap: usize,
    pub spawn_chance: f64,
    pub min_viewport_width: f32,
    pub reduced_motion: bool,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            cap: PARTICLE_CAP,
            spawn_chance: PARTICLE_SPAWN_CHANCE,
            min_viewport_width: PARTICLE_MIN_VIEWPORT_WIDTH,
            reduced_motion: false,
        }
    }
}

impl FieldConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            cap: settings.particle_cap(),
            spawn_chance: PARTICLE_SPAWN_CHANCE,
            min_viewport_width: settings.particle_min_width,
            reduced_motion: settings.reduced_motion,
        }
    }
}

/// Bounded, pooled particle simulation
#[derive(Debug, Clone)]
pub struct ParticleField {
    particles: Vec<Particle>,
    config: FieldConfig,
    surface: ViewportSize,
    rng: Pcg32,
    spawned_total: u64,
    removed_total: u64,
}

impl ParticleField {
    pub fn new(config: FieldConfig, surface: ViewportSize, seed: u64) -> Self {
        let field = Self {
            particles: Vec::with_capacity(config.cap),
            config,
            surface,
            rng: Pcg32::seed_from_u64(seed),
            spawned_total: 0,
            removed_total: 0,
        };
        if !field.is_active() {
            log::info!(
                "Particle field disabled (reduced_motion: {}, width: {})",
                config.reduced_motion,
                surface.width
            );
        }
        field
    }

    /// False under reduced motion or on narrow viewports
    pub fn is_active(&self) -> bool {
        !self.config.reduced_motion
            && self.config.cap > 0
            && self.surface.width >= self.config.min_viewport_width
    }

    /// Resize the drawing surface; live particles are kept
    pub fn resize(&mut self, surface: ViewportSize) {
        let was_active = self.is_active();
        self.surface = surface;
        if was_active != self.is_active() {
            log::debug!("Particle field active: {}", self.is_active());
        }
    }

    pub fn surface(&self) -> ViewportSize {
        self.surface
    }

    /// Spawn at most one particle if the population is under the cap and the
    /// per-frame gate passes
    pub fn try_spawn(&mut self) -> bool {
        if self.particles.len() >= self.config.cap {
            return false;
        }
        if !self.rng.random_bool(self.config.spawn_chance.clamp(0.0, 1.0)) {
            return false;
        }
        let particle = Particle {
            pos: Vec2::new(
                self.rng.random::<f32>() * self.surface.width,
                self.surface.height + PARTICLE_EDGE_MARGIN,
            ),
            size: self.rng.random::<f32>() * 1.5 + 0.5,
            vertical_speed: -(self.rng.random::<f32>() * 0.3 + 0.1),
            horizontal_speed: (self.rng.random::<f32>() - 0.5) * 0.2,
            opacity: 0.0,
            age: 0,
            max_age: self.rng.random_range(300..900),
        };
        self.insert(particle)
    }

    /// Add a particle directly; refused at the cap
    pub fn insert(&mut self, particle: Particle) -> bool {
        if self.particles.len() >= self.config.cap {
            return false;
        }
        self.particles.push(particle);
        self.spawned_total += 1;
        true
    }

    /// Advance one frame. Returns the number of particles removed.
    pub fn step(&mut self) -> usize {
        if !self.is_active() {
            return 0;
        }
        self.try_spawn();

        let mut removed = 0;
        // Walk backwards so the element swapped into slot `i` has already
        // been advanced this frame
        let mut i = self.particles.len();
        while i > 0 {
            i -= 1;
            let particle = &mut self.particles[i];
            particle.advance();
            if particle.is_dead() {
                self.particles.swap_remove(i);
                removed += 1;
            }
        }
        self.removed_total += removed as u64;
        removed
    }

    /// Live particles to render; empty while the field is disabled
    pub fn particles(&self) -> &[Particle] {
        if self.is_active() {
            &self.particles
        } else {
            &[]
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn cap(&self) -> usize {
        self.config.cap
    }

    /// Core disc and halo for every visible particle
    pub fn sprites(&self) -> impl Iterator<Item = Sprite> + '_ {
        self.particles().iter().flat_map(|p| {
            [
                Sprite {
                    center: p.pos,
                    radius: p.size,
                    alpha: p.opacity * CORE_ALPHA,
                },
                Sprite {
                    center: p.pos,
                    radius: p.size * HALO_SCALE,
                    alpha: p.opacity * HALO_ALPHA,
                },
            ]
        })
    }

    /// Drop every particle (teardown)
    pub fn clear(&mut self) {
        self.removed_total += self.particles.len() as u64;
        self.particles.clear();
    }

    pub fn spawned_total(&self) -> u64 {
        self.spawned_total
    }

    pub fn removed_total(&self) -> u64 {
        self.removed_total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const WIDE: ViewportSize = ViewportSize {
        width: 1440.0,
        height: 900.0,
    };

    fn always_spawn() -> FieldConfig {
        FieldConfig {
            spawn_chance: 1.0,
            ..Default::default()
        }
    }

    fn never_spawn() -> FieldConfig {
        FieldConfig {
            spawn_chance: 0.0,
            ..Default::default()
        }
    }

    fn particle(y: f32, age: u32, max_age: u32) -> Particle {
        Particle {
            pos: Vec2::new(100.0, y),
            size: 1.0,
            vertical_speed: -0.2,
            horizontal_speed: 0.0,
            opacity: 0.0,
            age,
            max_age,
        }
    }

    #[test]
    fn test_opacity_envelope() {
        assert_eq!(lifetime_opacity(0.0), 0.0);
        assert!((lifetime_opacity(0.05) - 0.5).abs() < 1e-6);
        assert_eq!(lifetime_opacity(0.1), 1.0);
        assert_eq!(lifetime_opacity(0.5), 1.0);
        assert_eq!(lifetime_opacity(0.8), 1.0);
        assert!((lifetime_opacity(0.9) - 0.5).abs() < 1e-5);
        assert!(lifetime_opacity(1.0).abs() < 1e-6);
    }

    #[test]
    fn test_population_never_exceeds_cap() {
        let mut field = ParticleField::new(always_spawn(), WIDE, 7);
        for frame in 1..=500 {
            field.step();
            assert!(field.len() <= PARTICLE_CAP);
            if frame == PARTICLE_CAP {
                // Nothing can expire before 300 frames
                assert_eq!(field.len(), PARTICLE_CAP);
            }
        }
    }

    #[test]
    fn test_spawn_is_noop_at_cap() {
        let mut field = ParticleField::new(always_spawn(), WIDE, 1);
        for _ in 0..PARTICLE_CAP {
            assert!(field.insert(particle(500.0, 0, 600)));
        }
        assert!(!field.try_spawn());
        assert!(!field.insert(particle(500.0, 0, 600)));
        assert_eq!(field.spawned_total(), PARTICLE_CAP as u64);
    }

    #[test]
    fn test_spawn_rate_is_sparse() {
        let mut field = ParticleField::new(FieldConfig::default(), WIDE, 99);
        for _ in 0..100 {
            field.step();
        }
        // ~3 expected at 3% over 100 frames; never a burst
        assert!(field.len() < 15, "spawned {}", field.len());
    }

    #[test]
    fn test_spawned_below_bottom_edge() {
        let mut field = ParticleField::new(always_spawn(), WIDE, 3);
        assert!(field.try_spawn());
        let p = field.particles()[0];
        assert_eq!(p.pos.y, WIDE.height + PARTICLE_EDGE_MARGIN);
        assert!(p.vertical_speed < 0.0);
        assert!((300..900).contains(&p.max_age));
        assert!((0.5..2.0).contains(&p.size));
    }

    #[test]
    fn test_expired_particle_removed() {
        let mut field = ParticleField::new(never_spawn(), WIDE, 0);
        field.insert(particle(500.0, 9, 10));
        field.insert(particle(500.0, 0, 600));
        assert_eq!(field.step(), 1);
        assert_eq!(field.len(), 1);
        assert_eq!(field.particles()[0].max_age, 600);
    }

    #[test]
    fn test_upward_exit_removed() {
        let mut field = ParticleField::new(never_spawn(), WIDE, 0);
        field.insert(particle(-9.9, 0, 600));
        assert_eq!(field.step(), 1);
        assert!(field.is_empty());
    }

    #[test]
    fn test_reduced_motion_disables() {
        let config = FieldConfig {
            reduced_motion: true,
            ..always_spawn()
        };
        let mut field = ParticleField::new(config, WIDE, 0);
        for _ in 0..50 {
            field.step();
        }
        assert!(field.is_empty());
        assert_eq!(field.sprites().count(), 0);
    }

    #[test]
    fn test_narrow_viewport_disables_and_resize_keeps_state() {
        let mut field = ParticleField::new(always_spawn(), WIDE, 0);
        for _ in 0..10 {
            field.step();
        }
        let live = field.len();
        assert!(live > 0);

        field.resize(ViewportSize::new(500.0, 900.0));
        assert!(!field.is_active());
        assert!(field.particles().is_empty());
        assert_eq!(field.step(), 0);

        field.resize(ViewportSize::new(1920.0, 1080.0));
        assert!(field.is_active());
        assert_eq!(field.particles().len(), live);
    }

    #[test]
    fn test_sprites_core_and_halo() {
        let mut field = ParticleField::new(never_spawn(), WIDE, 0);
        let mut p = particle(500.0, 0, 100);
        p.opacity = 1.0;
        field.insert(p);
        let sprites: Vec<_> = field.sprites().collect();
        assert_eq!(sprites.len(), 2);
        assert_eq!(sprites[0].alpha, CORE_ALPHA);
        assert_eq!(sprites[1].radius, HALO_SCALE);
        assert_eq!(sprites[1].alpha, HALO_ALPHA);
    }

    #[test]
    fn test_seed_is_reproducible() {
        let mut a = ParticleField::new(always_spawn(), WIDE, 42);
        let mut b = ParticleField::new(always_spawn(), WIDE, 42);
        for _ in 0..30 {
            a.step();
            b.step();
        }
        assert_eq!(a.particles(), b.particles());
    }

    proptest! {
        #[test]
        fn prop_swap_removal_removes_exactly_the_dead(
            specs in prop::collection::vec((0u32..20, 1u32..20, -20.0f32..900.0), 0..PARTICLE_CAP)
        ) {
            let mut field = ParticleField::new(never_spawn(), WIDE, 0);
            for &(age, max_age, y) in &specs {
                field.insert(particle(y, age, max_age));
            }
            let before = field.len();

            // Predict survivors independently of removal order
            let survivors: Vec<(u32, u32)> = specs
                .iter()
                .filter_map(|&(age, max_age, y)| {
                    let age = age + 1;
                    let y = y - 0.2;
                    (age < max_age && y >= -PARTICLE_EDGE_MARGIN).then_some((age, max_age))
                })
                .collect();

            let removed = field.step();
            prop_assert_eq!(before - removed, field.len());
            prop_assert_eq!(field.len(), survivors.len());
            prop_assert!(field.particles().iter().all(|p| !p.is_dead()));

            let mut got: Vec<(u32, u32)> = field.particles().iter().map(|p| (p.age, p.max_age)).collect();
            let mut want = survivors;
            got.sort();
            want.sort();
            prop_assert_eq!(got, want);
        }

        #[test]
        fn prop_population_bounded(seed in any::<u64>(), frames in 1usize..400) {
            let mut field = ParticleField::new(always_spawn(), WIDE, seed);
            for _ in 0..frames {
                field.step();
                prop_assert!(field.len() <= field.cap());
            }
        }
    }
}
