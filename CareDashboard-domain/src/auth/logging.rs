use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};
use tracing::{info, warn};

/// Types of authentication events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthEventType {
    /// Bearer token validation
    TokenValidation,
    /// Role check passed
    AccessGranted,
    /// Access denied to resource
    AccessDenied,
    /// Page visitor sent to the login page
    LoginRedirect,
}

impl std::fmt::Display for AuthEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthEventType::TokenValidation => write!(f, "TOKEN_VALIDATION"),
            AuthEventType::AccessGranted => write!(f, "ACCESS_GRANTED"),
            AuthEventType::AccessDenied => write!(f, "ACCESS_DENIED"),
            AuthEventType::LoginRedirect => write!(f, "LOGIN_REDIRECT"),
        }
    }
}

/// Authentication event record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthEvent {
    /// Type of authentication event
    pub event_type: AuthEventType,
    /// User ID (if available)
    pub user_id: Option<String>,
    /// Timestamp when the event occurred
    pub timestamp: DateTime<Utc>,
    /// User agent string from the client
    pub user_agent: Option<String>,
    /// Whether the event was successful
    pub success: bool,
    /// Additional details about the event
    pub details: Option<String>,
    /// The resource being accessed (if applicable)
    pub resource: Option<String>,
    /// Duration of the operation in milliseconds (if applicable)
    pub duration_ms: Option<u64>,
    /// Authentication method used (jwt, cookie, rbac, guard)
    pub auth_method: Option<String>,
}

impl AuthEvent {
    /// Create a new authentication event
    pub fn new(event_type: AuthEventType, user_id: Option<&str>, success: bool) -> Self {
        Self {
            event_type,
            user_id: user_id.map(String::from),
            timestamp: Utc::now(),
            user_agent: None,
            success,
            details: None,
            resource: None,
            duration_ms: None,
            auth_method: None,
        }
    }

    /// Set the user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set the details
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Set the resource
    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    /// Set the duration
    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    /// Set the authentication method
    pub fn with_auth_method(mut self, auth_method: impl Into<String>) -> Self {
        self.auth_method = Some(auth_method.into());
        self
    }
}

/// Log an authentication event
pub fn log_auth_event(event: AuthEvent) {
    let user_id = event.user_id.as_deref().unwrap_or("anonymous");
    let status = if event.success { "SUCCESS" } else { "FAILURE" };

    if event.success {
        info!(
            target: "auth_audit",
            event_type = %event.event_type,
            user_id,
            status,
            resource = event.resource.as_deref(),
            auth_method = event.auth_method.as_deref(),
            duration_ms = event.duration_ms,
            user_agent = event.user_agent.as_deref(),
            "AUTH-LOG {}",
            event.details.as_deref().unwrap_or("")
        );
    } else {
        warn!(
            target: "auth_audit",
            event_type = %event.event_type,
            user_id,
            status,
            resource = event.resource.as_deref(),
            auth_method = event.auth_method.as_deref(),
            duration_ms = event.duration_ms,
            user_agent = event.user_agent.as_deref(),
            "AUTH-LOG {}",
            event.details.as_deref().unwrap_or("")
        );
    }
}

/// Log an access denied event
pub fn log_access_denied(user_id: &str, resource: &str, required_roles: &[String]) {
    let details = format!("Required roles: {}", required_roles.join(", "));

    let event = AuthEvent::new(AuthEventType::AccessDenied, Some(user_id), false)
        .with_resource(resource)
        .with_details(details)
        .with_auth_method("rbac");

    log_auth_event(event);
}

/// Log a page visitor being redirected to login
pub fn log_login_redirect(resource: &str, reason: &str) {
    let event = AuthEvent::new(AuthEventType::LoginRedirect, None, false)
        .with_resource(resource)
        .with_details(reason)
        .with_auth_method("guard");

    log_auth_event(event);
}
