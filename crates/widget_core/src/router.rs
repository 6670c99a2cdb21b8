//! Redirect-on-load: picks the first screen from the LTI role and the video lifecycle.

use shared::{
    domain::{LtiRole, SessionContext, Video, VideoState},
    error::ErrorReason,
};
use tracing::{info, warn};

use crate::navigation::{Navigator, Redirect, Route};

/// Pure decision over `(role, video.state)`.
///
/// Instructors land on the dashboard for every state that is neither ready nor
/// pending, including `error`, so they can see the failure and upload again.
pub fn resolve_redirect(role: LtiRole, video: Option<&Video>) -> Route {
    if role == LtiRole::Error {
        return Route::Error(ErrorReason::Lti);
    }

    let Some(video) = video else {
        warn!(?role, "lti session without a video");
        return Route::Error(ErrorReason::Lti);
    };

    match (role, video.state) {
        (_, VideoState::Ready) => Route::Player,
        (LtiRole::Instructor, VideoState::Pending) => Route::Form,
        (LtiRole::Instructor, _) => Route::Dashboard,
        _ => Route::Error(ErrorReason::NotFound),
    }
}

pub fn redirect_for(session: &SessionContext) -> Redirect {
    Redirect::push(resolve_redirect(session.role, session.video.as_ref()))
}

/// Issues the load redirect at most once for the lifetime of a mount.
#[derive(Debug, Default)]
pub struct RedirectOnLoad {
    issued: Option<Route>,
}

impl RedirectOnLoad {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the route navigated to, or `None` if this mount already redirected.
    pub fn mount<N: Navigator>(&mut self, session: &SessionContext, navigator: &mut N) -> Option<Route> {
        if self.issued.is_some() {
            return None;
        }
        let redirect = redirect_for(session);
        info!(role = ?session.role, route = %redirect.to, "redirecting on load");
        navigator.navigate(redirect);
        self.issued = Some(redirect.to);
        Some(redirect.to)
    }
}

#[cfg(test)]
#[path = "tests/router_tests.rs"]
mod tests;
