//! Application layer services implementing business logic.
//!
//! Services consume repository traits and give HTTP handlers and the admin
//! CLI a narrow API.
//!
//! # Available Services
//!
//! - [`services::redirect_service::RedirectService`] - Device-aware redirect resolution and click counting
//! - [`services::link_service::LinkService`] - Smart link and text-QR creation and retrieval
//! - [`services::auth_service::AuthService`] - API token authentication

pub mod services;
