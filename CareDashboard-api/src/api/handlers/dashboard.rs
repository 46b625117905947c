use axum::{response::Response, Extension};
use tracing::instrument;

use care_dashboard_domain::auth::UserInfo;

use crate::pages::{doctor_dashboard_page, patient_dashboard_page, vhv_dashboard_page};

fn session(user: &Option<Extension<UserInfo>>) -> Option<&UserInfo> {
    user.as_ref().map(|Extension(user)| user)
}

/// Doctor dashboard page
#[instrument(skip_all)]
pub async fn doctor_dashboard(user: Option<Extension<UserInfo>>) -> Response {
    doctor_dashboard_page().respond(session(&user))
}

/// Patient dashboard page
#[instrument(skip_all)]
pub async fn patient_dashboard(user: Option<Extension<UserInfo>>) -> Response {
    patient_dashboard_page().respond(session(&user))
}

/// Village health volunteer dashboard page
#[instrument(skip_all)]
pub async fn vhv_dashboard(user: Option<Extension<UserInfo>>) -> Response {
    vhv_dashboard_page().respond(session(&user))
}
