//! Environment-gated entry to the content editor

use crate::error::AdminError;

/// Secret baked in at build time, if any
pub fn configured_secret() -> Option<String> {
    option_env!("STACKFOLIO_ADMIN_SECRET")
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Keyboard state needed to recognise the hidden editor shortcut
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyChord<'a> {
    pub key: &'a str,
    pub ctrl: bool,
    pub shift: bool,
}

/// Ctrl+Shift+E opens the editor
pub fn is_editor_shortcut(chord: KeyChord<'_>) -> bool {
    chord.ctrl && chord.shift && chord.key.eq_ignore_ascii_case("e")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminGate {
    secret: Option<String>,
    allow_unprotected: bool,
    unlocked: bool,
}

impl AdminGate {
    pub fn new(secret: Option<String>, allow_unprotected: bool) -> Self {
        if secret.is_none() && allow_unprotected {
            log::warn!("Admin editor is running without a secret");
        }
        Self {
            secret,
            allow_unprotected,
            unlocked: false,
        }
    }

    /// Gate configured from the build environment and settings
    pub fn from_env(allow_unprotected: bool) -> Self {
        Self::new(configured_secret(), allow_unprotected)
    }

    /// Whether the viewer has to type the secret
    pub fn requires_secret(&self) -> bool {
        self.secret.is_some()
    }

    /// Try to open the editor. With no secret configured only the explicit
    /// unprotected opt-in lets it open.
    pub fn unlock(&mut self, input: Option<&str>) -> Result<(), AdminError> {
        match (&self.secret, input) {
            (Some(secret), Some(given)) if given == secret => {}
            (Some(_), _) => {
                log::warn!("Admin unlock rejected");
                return Err(AdminError::WrongSecret);
            }
            (None, _) if self.allow_unprotected => {}
            (None, _) => return Err(AdminError::Locked),
        }
        self.unlocked = true;
        log::info!("Admin editor unlocked");
        Ok(())
    }

    pub fn lock(&mut self) {
        self.unlocked = false;
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }
}
