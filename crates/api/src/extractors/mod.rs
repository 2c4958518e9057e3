//! Custom Axum extractors.

pub mod caller;
pub mod incident_form;
pub mod json;

pub use caller::{authenticate, bearer_token, AuthenticatedCaller};
pub use incident_form::IncidentForm;
pub use json::ApiJson;
