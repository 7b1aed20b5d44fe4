//! # Admin API
//!
//! Thin client for the event backend used by the dashboards: bearer-token login, ticket review
//! and activation, dashboard stats. A 401/403 on any authenticated call clears the stored token
//! and surfaces [`AdminApiError::SessionExpired`].

pub mod client;
pub mod config;
pub mod tickets;
pub mod token;

pub use client::{AdminApiClient, AdminApiError};
pub use config::{AdminApiConfig, EnvAdminApiConfig, DEFAULT_API_BASE_URL};
pub use tickets::{
    ActionResult, Activation, Approval, PhoneCheck, Ticket, TicketStatus, TicketSummary, TicketType,
};
pub use token::TokenStore;
