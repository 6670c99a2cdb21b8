//! Route targets and the navigation collaborator that consumes them.

use shared::error::ErrorReason;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Error(ErrorReason),
    Dashboard,
    Form,
    Player,
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Error(reason) => format!("/errors/{}", reason.code()),
            Route::Dashboard => "/dashboard".to_string(),
            Route::Form => "/form".to_string(),
            Route::Player => "/player".to_string(),
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Redirect {
    pub to: Route,
    /// Adds a history entry instead of replacing the current one.
    pub push: bool,
}

impl Redirect {
    pub fn push(to: Route) -> Self {
        Self { to, push: true }
    }
}

pub trait Navigator {
    fn navigate(&mut self, redirect: Redirect);
}

/// In-memory history stack.
#[derive(Debug, Default, Clone)]
pub struct History {
    entries: Vec<Route>,
}

impl History {
    pub fn entries(&self) -> &[Route] {
        &self.entries
    }

    pub fn current(&self) -> Option<Route> {
        self.entries.last().copied()
    }
}

impl Navigator for History {
    fn navigate(&mut self, redirect: Redirect) {
        debug!(route = %redirect.to, push = redirect.push, "navigating");
        if !redirect.push {
            self.entries.pop();
        }
        self.entries.push(redirect.to);
    }
}
