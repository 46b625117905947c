//! Role-specific dashboard views
//!
//! Each view renders the page shell for one role. The widgets inside the
//! sections are served by the front end.

use care_dashboard_domain::auth::UserInfo;
use care_dashboard_domain::entities::UserRole;

use super::escape_html;

/// A dashboard rendered for one role
pub trait DashboardView: Default + Send + Sync + 'static {
    /// Role the view is built for
    const ROLE: UserRole;

    /// Page title
    const TITLE: &'static str;

    /// Route the view is mounted at
    const PATH: &'static str;

    /// Section headings hosted by the view
    fn sections(&self) -> &'static [&'static str];

    /// Render the page for a signed-in user
    fn render(&self, user: &UserInfo) -> String {
        let role = Self::ROLE.as_str();
        let sections: String = self
            .sections()
            .iter()
            .map(|heading| {
                format!(
                    "<section class=\"panel\" data-section=\"{}\"><h2>{}</h2></section>",
                    section_id(heading),
                    escape_html(heading)
                )
            })
            .collect();

        page_shell(
            Self::TITLE,
            &format!(
                "<main class=\"dashboard dashboard-{role}\" data-role=\"{role}\">\
                 <header><h1>{title}</h1><p class=\"greeting\">Welcome, {name}</p></header>\
                 {sections}</main>",
                role = role,
                title = escape_html(Self::TITLE),
                name = escape_html(user.display_name()),
                sections = sections,
            ),
        )
    }
}

fn section_id(heading: &str) -> String {
    heading
        .chars()
        .filter_map(|c| match c {
            c if c.is_ascii_alphanumeric() => Some(c.to_ascii_lowercase()),
            ' ' | '-' => Some('-'),
            _ => None,
        })
        .collect()
}

/// Wrap a body fragment in a complete HTML document
pub(crate) fn page_shell(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{} | CareDashboard</title>\n\
         <style>body{{font-family:system-ui,sans-serif;margin:2rem}}.panel{{border:1px solid #ddd;border-radius:8px;padding:1rem;margin:1rem 0}}</style>\n\
         </head>\n<body>\n{}\n</body>\n</html>\n",
        escape_html(title),
        body
    )
}

/// Dashboard for doctors
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DoctorDashboard;

impl DashboardView for DoctorDashboard {
    const ROLE: UserRole = UserRole::Doctor;
    const TITLE: &'static str = "Doctor Dashboard";
    const PATH: &'static str = "/doctor/dashboard";

    fn sections(&self) -> &'static [&'static str] {
        &["Patients", "Appointments", "VHV Referrals"]
    }
}

/// Dashboard for patients
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PatientDashboard;

impl DashboardView for PatientDashboard {
    const ROLE: UserRole = UserRole::Patient;
    const TITLE: &'static str = "Patient Dashboard";
    const PATH: &'static str = "/patient/dashboard";

    fn sections(&self) -> &'static [&'static str] {
        &["My Appointments", "Health Records", "My Care Team"]
    }
}

/// Dashboard for village health volunteers
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct VhvDashboard;

impl DashboardView for VhvDashboard {
    const ROLE: UserRole = UserRole::Vhv;
    const TITLE: &'static str = "VHV Dashboard";
    const PATH: &'static str = "/vhv/dashboard";

    fn sections(&self) -> &'static [&'static str] {
        &["Assigned Households", "Home Visits", "Referrals"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: Option<&str>) -> UserInfo {
        UserInfo {
            user_id: "user-1".to_string(),
            roles: vec!["doctor".to_string()],
            email: None,
            name: name.map(String::from),
            auth_source: "test".to_string(),
        }
    }

    #[test]
    fn test_render_contains_title_greeting_and_sections() {
        let html = DoctorDashboard.render(&user(Some("Dr. Somchai")));

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Doctor Dashboard | CareDashboard</title>"));
        assert!(html.contains("Welcome, Dr. Somchai"));
        assert!(html.contains("data-role=\"doctor\""));
        assert!(html.contains("data-section=\"vhv-referrals\""));
    }

    #[test]
    fn test_render_escapes_user_data() {
        let html = PatientDashboard.render(&user(Some("<script>alert(1)</script>")));

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    }

    #[test]
    fn test_greeting_falls_back_to_user_id() {
        let html = VhvDashboard.render(&user(None));
        assert!(html.contains("Welcome, user-1"));
    }

    #[test]
    fn test_views_declare_their_roles() {
        assert_eq!(DoctorDashboard::ROLE, UserRole::Doctor);
        assert_eq!(PatientDashboard::ROLE, UserRole::Patient);
        assert_eq!(VhvDashboard::ROLE, UserRole::Vhv);
        assert_eq!(VhvDashboard::PATH, "/vhv/dashboard");
    }
}
