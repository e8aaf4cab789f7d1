//! Fallback rendering around a risky visual subtree
//!
//! A failed subtree is replaced by a static fallback and stays replaced
//! until the viewer asks for a retry. The rest of the page keeps running.

use crate::error::PortfolioResult;

/// Default fallback text
pub const FALLBACK_MESSAGE: &str = "This section failed to load.";
pub const RETRY_LABEL: &str = "Retry";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundaryState {
    Healthy,
    Failed { message: String },
}

#[derive(Debug, Clone)]
pub struct Boundary {
    name: String,
    state: BoundaryState,
    failures: u32,
}

impl Boundary {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: BoundaryState::Healthy,
            failures: 0,
        }
    }

    /// Run `render` while healthy; on error (or while failed) produce the
    /// fallback instead
    pub fn render<T>(
        &mut self,
        render: impl FnOnce() -> PortfolioResult<T>,
        fallback: impl FnOnce(&str) -> T,
    ) -> T {
        if let BoundaryState::Failed { message } = &self.state {
            return fallback(message);
        }
        match render() {
            Ok(value) => value,
            Err(e) => {
                let message = e.to_string();
                log::error!("Boundary '{}' caught: {}", self.name, message);
                self.failures += 1;
                let out = fallback(&message);
                self.state = BoundaryState::Failed { message };
                out
            }
        }
    }

    /// Clear the failure so the next render tries the subtree again
    pub fn retry(&mut self) {
        if self.is_failed() {
            log::info!("Boundary '{}' retrying", self.name);
        }
        self.state = BoundaryState::Healthy;
    }

    pub fn state(&self) -> &BoundaryState {
        &self.state
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.state, BoundaryState::Failed { .. })
    }

    pub fn failures(&self) -> u32 {
        self.failures
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PortfolioError;
    use std::cell::Cell;

    #[test]
    fn test_healthy_passes_through() {
        let mut b = Boundary::new("hero");
        let out = b.render(|| Ok(5), |_| 0);
        assert_eq!(out, 5);
        assert!(!b.is_failed());
    }

    #[test]
    fn test_failure_sticks_until_retry() {
        let mut b = Boundary::new("filter");
        let calls = Cell::new(0);
        let failing = || {
            calls.set(calls.get() + 1);
            Err::<&str, _>(PortfolioError::render("no canvas"))
        };

        assert_eq!(b.render(failing, |_| "fallback"), "fallback");
        assert!(b.is_failed());
        assert!(matches!(b.state(), BoundaryState::Failed { message } if message.contains("no canvas")));

        // Failed boundaries do not re-run the subtree
        assert_eq!(b.render(failing, |_| "fallback"), "fallback");
        assert_eq!(calls.get(), 1);

        b.retry();
        assert_eq!(b.render(|| Ok("live"), |_| "fallback"), "live");
        assert_eq!(b.failures(), 1);
    }
}
