//! Page navigation as an explicit state machine.
//!
//! Two pages, two navigation triggers. Every trigger is valid from every
//! page; rendering is the caller's business.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

/// Dashboard pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    /// "Home": descriptive analytics
    Analytics,
    Prediction,
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Page::Analytics => f.write_str("Home"),
            Page::Prediction => f.write_str("Prediction"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RouteError {
    #[error("page not found: {0}")]
    PageNotFound(String),
}

/// Navigation buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Home,
    Prediction,
}

impl Trigger {
    pub fn target(&self) -> Page {
        match self {
            Trigger::Home => Page::Analytics,
            Trigger::Prediction => Page::Prediction,
        }
    }
}

impl FromStr for Trigger {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "home" | "analytics" => Ok(Trigger::Home),
            "predict" | "prediction" => Ok(Trigger::Prediction),
            other => Err(RouteError::PageNotFound(other.to_string())),
        }
    }
}

/// One applied trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: Page,
    pub to: Page,
}

impl Transition {
    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

/// Current page plus navigation history length.
#[derive(Debug, Clone)]
pub struct Router {
    current: Page,
    transitions: u64,
}

impl Router {
    /// Starts on the analytics page.
    pub fn new() -> Self {
        Self {
            current: Page::Analytics,
            transitions: 0,
        }
    }

    pub fn current(&self) -> Page {
        self.current
    }

    pub fn transitions(&self) -> u64 {
        self.transitions
    }

    pub fn handle(&mut self, trigger: Trigger) -> Transition {
        let transition = Transition {
            from: self.current,
            to: trigger.target(),
        };
        self.current = transition.to;
        self.transitions += 1;

        debug!(from = %transition.from, to = %transition.to, "Navigated");
        transition
    }

    /// Navigate by page name, as typed by the analyst.
    pub fn navigate(&mut self, page: &str) -> Result<Transition, RouteError> {
        let trigger = page.parse::<Trigger>()?;
        Ok(self.handle(trigger))
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_on_analytics() {
        let router = Router::new();
        assert_eq!(router.current(), Page::Analytics);
        assert_eq!(router.transitions(), 0);
    }

    #[test]
    fn test_transitions() {
        let mut router = Router::new();

        let t = router.handle(Trigger::Prediction);
        assert_eq!(
            t,
            Transition {
                from: Page::Analytics,
                to: Page::Prediction
            }
        );
        assert!(t.changed());

        // Re-pressing the current page's button re-renders it.
        let t = router.handle(Trigger::Prediction);
        assert!(!t.changed());
        assert_eq!(router.current(), Page::Prediction);

        router.handle(Trigger::Home);
        assert_eq!(router.current(), Page::Analytics);
        assert_eq!(router.transitions(), 3);
    }

    #[test]
    fn test_navigate_by_name() {
        let mut router = Router::new();

        assert_eq!(router.navigate("predict").unwrap().to, Page::Prediction);
        assert_eq!(router.navigate("Home").unwrap().to, Page::Analytics);

        let err = router.navigate("settings").unwrap_err();
        assert_eq!(err, RouteError::PageNotFound("settings".to_string()));
        assert_eq!(err.to_string(), "page not found: settings");
        // A failed navigation leaves the state alone.
        assert_eq!(router.current(), Page::Analytics);
        assert_eq!(router.transitions(), 2);
    }
}
