//! Route protection.
//!
//! `guard` is a pure function of the requested route and the current
//! session. It holds no state of its own.

use super::{Session, SessionStatus};

/// Navigation targets of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    SignIn,
    SignUp,
    ForgotPassword,
    Profile,
    Search,
    Trends,
    PostToot,
    PostedToots,
    History,
    About,
}

impl Route {
    /// Routes shown in the navigation bar, in order.
    pub const NAV: [Route; 7] = [
        Route::Home,
        Route::Search,
        Route::Trends,
        Route::PostToot,
        Route::History,
        Route::PostedToots,
        Route::About,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Route::Home => "Home",
            Route::SignIn => "Sign In",
            Route::SignUp => "Create Account",
            Route::ForgotPassword => "Reset Password",
            Route::Profile => "Profile",
            Route::Search => "Search",
            Route::Trends => "Trends",
            Route::PostToot => "Post Toot",
            Route::PostedToots => "My Toots",
            Route::History => "History",
            Route::About => "About",
        }
    }

    /// Requires an authenticated session to render.
    pub fn is_protected(&self) -> bool {
        matches!(
            self,
            Route::Profile
                | Route::Search
                | Route::Trends
                | Route::PostToot
                | Route::PostedToots
                | Route::History
        )
    }

    /// Only meaningful for signed-out users.
    pub fn is_guest_only(&self) -> bool {
        matches!(self, Route::SignIn)
    }

    /// Next entry in the navigation bar (wrapping around)
    pub fn next(&self) -> Self {
        Self::step(*self, 1)
    }

    /// Previous entry in the navigation bar (wrapping around)
    pub fn prev(&self) -> Self {
        Self::step(*self, Self::NAV.len() - 1)
    }

    fn step(from: Route, by: usize) -> Self {
        match Self::NAV.iter().position(|r| *r == from) {
            Some(i) => Self::NAV[(i + by) % Self::NAV.len()],
            None => Route::Home,
        }
    }
}

/// What to show for a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Render the requested route
    Render(Route),
    /// Verification pending: show a neutral placeholder and stay put
    Loading,
    /// Navigate here instead; the requested target is discarded
    Redirect(Route),
}

pub fn guard(route: Route, session: &Session) -> GuardDecision {
    let status = session.status();

    if route.is_protected() {
        return match status {
            SessionStatus::Unknown | SessionStatus::Verifying => GuardDecision::Loading,
            SessionStatus::Unauthenticated => GuardDecision::Redirect(Route::SignIn),
            SessionStatus::Authenticated => GuardDecision::Render(route),
        };
    }

    if route.is_guest_only() && status == SessionStatus::Authenticated {
        return GuardDecision::Redirect(Route::Home);
    }

    GuardDecision::Render(route)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthState;
    use crate::models::{User, UserId};

    fn session(state: AuthState) -> Session {
        Session {
            state,
            last_error: None,
        }
    }

    fn authenticated() -> Session {
        session(AuthState::Authenticated(User {
            id: UserId::from(1),
            name: "Ann".to_string(),
            email: "a@x.com".to_string(),
        }))
    }

    fn all_routes() -> Vec<Route> {
        [
            Route::Home,
            Route::SignIn,
            Route::SignUp,
            Route::ForgotPassword,
            Route::Profile,
            Route::Search,
            Route::Trends,
            Route::PostToot,
            Route::PostedToots,
            Route::History,
            Route::About,
        ]
        .to_vec()
    }

    #[test]
    fn test_pending_never_renders_protected_content() {
        for state in [AuthState::Unknown, AuthState::Verifying] {
            let s = session(state);
            for route in all_routes().into_iter().filter(Route::is_protected) {
                assert_eq!(guard(route, &s), GuardDecision::Loading, "{:?}", route);
            }
        }
    }

    #[test]
    fn test_redirects_to_sign_in_iff_unauthenticated() {
        let states = [
            session(AuthState::Unknown),
            session(AuthState::Verifying),
            session(AuthState::Unauthenticated),
            authenticated(),
        ];
        for s in &states {
            for route in all_routes().into_iter().filter(Route::is_protected) {
                let redirected = guard(route, s) == GuardDecision::Redirect(Route::SignIn);
                assert_eq!(
                    redirected,
                    s.status() == SessionStatus::Unauthenticated,
                    "{:?} {:?}",
                    route,
                    s.status()
                );
            }
        }
    }

    #[test]
    fn test_authenticated_renders_requested_route() {
        let s = authenticated();
        assert_eq!(guard(Route::Trends, &s), GuardDecision::Render(Route::Trends));
        assert_eq!(guard(Route::Profile, &s), GuardDecision::Render(Route::Profile));
    }

    #[test]
    fn test_public_routes_always_render() {
        for s in [session(AuthState::Verifying), session(AuthState::Unauthenticated), authenticated()] {
            for route in [Route::Home, Route::About, Route::SignUp, Route::ForgotPassword] {
                assert_eq!(guard(route, &s), GuardDecision::Render(route));
            }
        }
    }

    #[test]
    fn test_sign_in_redirects_home_when_logged_in() {
        assert_eq!(
            guard(Route::SignIn, &authenticated()),
            GuardDecision::Redirect(Route::Home)
        );
        assert_eq!(
            guard(Route::SignIn, &session(AuthState::Unauthenticated)),
            GuardDecision::Render(Route::SignIn)
        );
    }

    #[test]
    fn test_nav_next_prev_wrap() {
        assert_eq!(Route::Home.next(), Route::Search);
        assert_eq!(Route::About.next(), Route::Home);
        assert_eq!(Route::Home.prev(), Route::About);
        assert_eq!(Route::Search.prev(), Route::Home);
        // Off-bar routes fall back to Home
        assert_eq!(Route::SignIn.next(), Route::Home);
    }
}
