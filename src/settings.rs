//! Viewer preferences
//!
//! Persisted separately from page content in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Presentation settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    // === Motion ===
    /// Reduced motion (no particles, no decorative loops). The platform
    /// layer also ORs in the OS `prefers-reduced-motion` query.
    pub reduced_motion: bool,
    /// Ambient particle field
    pub particles: bool,
    /// Particle population cap
    pub max_particles: usize,
    /// Narrowest viewport (CSS px) that still gets particles
    pub particle_min_width: f32,

    // === Layout ===
    /// Per-card stacking offset in px
    pub card_offset: u32,
    /// Headline rotation period
    pub name_rotate_interval_ms: f64,

    // === Admin ===
    /// Let the admin panel open when no secret was compiled in
    pub allow_unprotected_admin: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            reduced_motion: false,
            particles: true,
            max_particles: PARTICLE_CAP,
            particle_min_width: PARTICLE_MIN_VIEWPORT_WIDTH,

            card_offset: CARD_OFFSET_PX,
            name_rotate_interval_ms: NAME_ROTATE_INTERVAL_MS,

            allow_unprotected_admin: false,
        }
    }
}

impl Settings {
    /// Effective particle toggle (respects reduced_motion)
    pub fn effective_particles(&self) -> bool {
        self.particles && !self.reduced_motion
    }

    /// Effective headline rotation (respects reduced_motion)
    pub fn effective_name_rotation(&self) -> bool {
        !self.reduced_motion
    }

    /// Effective particle count cap; zero when particles are off
    pub fn particle_cap(&self) -> usize {
        if !self.effective_particles() {
            0
        } else {
            self.max_particles
        }
    }

    /// LocalStorage key
    pub const STORAGE_KEY: &'static str = "stackfolio_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage
            && let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY)
        {
            match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
                Err(e) => log::warn!("Discarding unreadable settings: {}", e),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.particle_cap(), 40);
        assert_eq!(s.card_offset, 32);
        assert_eq!(s.name_rotate_interval_ms, 3500.0);
        assert!(!s.allow_unprotected_admin);
    }

    #[test]
    fn test_reduced_motion_wins() {
        let s = Settings {
            reduced_motion: true,
            ..Default::default()
        };
        assert!(!s.effective_particles());
        assert!(!s.effective_name_rotation());
        assert_eq!(s.particle_cap(), 0);
    }

    #[test]
    fn test_particles_off_zeroes_cap() {
        let s = Settings {
            particles: false,
            ..Default::default()
        };
        assert_eq!(s.particle_cap(), 0);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let s: Settings = serde_json::from_str(r#"{"reducedMotion":true,"cardOffset":24}"#)
            .expect("valid json");
        assert!(s.reduced_motion);
        assert_eq!(s.card_offset, 24);
        assert_eq!(s.max_particles, PARTICLE_CAP);
    }
}
