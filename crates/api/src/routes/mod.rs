//! HTTP route handlers.
//!
//! Handlers extract the caller and the request, call one service method, and
//! map the result. Authorization decisions live in the services.

pub mod attendance;
pub mod auth;
pub mod clients;
pub mod dashboard;
pub mod guards;
pub mod health;
pub mod incident_categories;
pub mod incidents;
pub mod locations;
pub mod schedules;
pub mod shifts;
pub mod users;
