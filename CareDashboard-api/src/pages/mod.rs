//! Dashboard pages
//!
//! Every page is a [`RouteGuard`] wrapping exactly one dashboard view. The
//! guard takes no configuration of its own: the role it enforces is the one
//! its child declares.

use std::env;

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use tracing::debug;

use care_dashboard_domain::auth::logging::{log_access_denied, log_login_redirect};
use care_dashboard_domain::auth::UserInfo;
use care_dashboard_domain::entities::UserRole;

mod views;

pub use views::{DashboardView, DoctorDashboard, PatientDashboard, VhvDashboard};

/// Login page used when `LOGIN_URL` is unset
pub const DEFAULT_LOGIN_URL: &str = "/login";

/// Outcome of a guard check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Render the child view
    Allow,
    /// No session; send the visitor to the login page
    RedirectToLogin,
    /// Signed in without the required role
    Forbidden,
}

/// Authentication and authorization guard around a single dashboard view
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RouteGuard<V: DashboardView> {
    child: V,
}

impl<V: DashboardView> RouteGuard<V> {
    /// Wrap a view
    pub fn new(child: V) -> Self {
        Self { child }
    }

    /// The wrapped view
    pub fn child(&self) -> &V {
        &self.child
    }

    /// Role enforced by this guard
    pub fn required_role(&self) -> UserRole {
        V::ROLE
    }

    /// Decide what a visitor with the given session gets
    pub fn decide(&self, user: Option<&UserInfo>) -> GuardDecision {
        let Some(user) = user else {
            return GuardDecision::RedirectToLogin;
        };

        let allowed = user
            .roles
            .iter()
            .filter_map(|role| role.parse::<UserRole>().ok())
            .any(|role| role == V::ROLE || role == UserRole::Admin);

        if allowed {
            GuardDecision::Allow
        } else {
            GuardDecision::Forbidden
        }
    }

    /// Produce the page response for a visitor
    pub fn respond(&self, user: Option<&UserInfo>) -> Response {
        match (self.decide(user), user) {
            (GuardDecision::Allow, Some(user)) => {
                debug!("Rendering {} for user {}", V::TITLE, user.user_id);
                Html(self.child.render(user)).into_response()
            },
            (GuardDecision::Forbidden, Some(user)) => {
                log_access_denied(&user.user_id, V::PATH, &[V::ROLE.to_string()]);
                (StatusCode::FORBIDDEN, Html(forbidden_page(V::ROLE))).into_response()
            },
            _ => {
                log_login_redirect(V::PATH, "No valid session");
                Redirect::to(&login_redirect_url(V::PATH)).into_response()
            }
        }
    }
}

/// Doctor dashboard page
pub fn doctor_dashboard_page() -> RouteGuard<DoctorDashboard> {
    RouteGuard::new(DoctorDashboard)
}

/// Patient dashboard page
pub fn patient_dashboard_page() -> RouteGuard<PatientDashboard> {
    RouteGuard::new(PatientDashboard)
}

/// VHV dashboard page
pub fn vhv_dashboard_page() -> RouteGuard<VhvDashboard> {
    RouteGuard::new(VhvDashboard)
}

/// Login URL with the page to return to
pub fn login_redirect_url(return_to: &str) -> String {
    let login = env::var("LOGIN_URL").unwrap_or_else(|_| DEFAULT_LOGIN_URL.to_string());
    let separator = if login.contains('?') { '&' } else { '?' };
    format!("{}{}redirect={}", login, separator, urlencoding::encode(return_to))
}

fn forbidden_page(role: UserRole) -> String {
    views::page_shell(
        "Access denied",
        &format!(
            "<main class=\"forbidden\"><h1>Access denied</h1>\
             <p>This page is only available to the {} role.</p></main>",
            escape_html(role.as_str())
        ),
    )
}

/// Escape text for HTML element content and attribute values
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header;

    fn user(roles: &[&str]) -> UserInfo {
        UserInfo {
            user_id: "u-1".to_string(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
            email: None,
            name: None,
            auth_source: "test".to_string(),
        }
    }

    #[test]
    fn test_each_page_wraps_its_own_view() {
        assert_eq!(doctor_dashboard_page().child(), &DoctorDashboard);
        assert_eq!(patient_dashboard_page().child(), &PatientDashboard);
        assert_eq!(vhv_dashboard_page().child(), &VhvDashboard);
        assert_eq!(vhv_dashboard_page().required_role(), UserRole::Vhv);
    }

    #[test]
    fn test_guard_decisions() {
        let page = doctor_dashboard_page();

        assert_eq!(page.decide(None), GuardDecision::RedirectToLogin);
        assert_eq!(page.decide(Some(&user(&["doctor"]))), GuardDecision::Allow);
        assert_eq!(page.decide(Some(&user(&["admin"]))), GuardDecision::Allow);
        assert_eq!(page.decide(Some(&user(&["patient"]))), GuardDecision::Forbidden);
        assert_eq!(page.decide(Some(&user(&[]))), GuardDecision::Forbidden);
    }

    #[test]
    fn test_vhv_alias_role_is_accepted() {
        let page = vhv_dashboard_page();
        assert_eq!(page.decide(Some(&user(&["village_health_volunteer"]))), GuardDecision::Allow);
    }

    #[test]
    fn test_respond_statuses() {
        let page = patient_dashboard_page();

        let redirect = page.respond(None);
        assert_eq!(redirect.status(), StatusCode::SEE_OTHER);
        let location = redirect.headers().get(header::LOCATION).unwrap().to_str().unwrap();
        assert!(location.ends_with("redirect=%2Fpatient%2Fdashboard"));

        assert_eq!(page.respond(Some(&user(&["doctor"]))).status(), StatusCode::FORBIDDEN);
        assert_eq!(page.respond(Some(&user(&["patient"]))).status(), StatusCode::OK);
    }

    // Sole writer of LOGIN_URL in this crate's unit tests; cases run in sequence
    #[test]
    fn test_login_redirect_url_from_env() {
        std::env::remove_var("LOGIN_URL");
        assert_eq!(login_redirect_url("/a b?c=d"), "/login?redirect=%2Fa%20b%3Fc%3Dd");

        std::env::set_var("LOGIN_URL", "/auth?next=1");
        assert_eq!(
            login_redirect_url("/vhv/dashboard"),
            "/auth?next=1&redirect=%2Fvhv%2Fdashboard"
        );

        std::env::set_var("LOGIN_URL", "https://id.example.org/sign-in");
        assert_eq!(
            login_redirect_url("/doctor/dashboard"),
            "https://id.example.org/sign-in?redirect=%2Fdoctor%2Fdashboard"
        );

        std::env::remove_var("LOGIN_URL");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#x27;Jerry&#x27;&lt;/a&gt;");
    }
}
