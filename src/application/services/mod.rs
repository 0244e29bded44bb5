//! Business logic services for the application layer.

pub mod auth_service;
pub mod link_service;
pub mod redirect_service;

pub use auth_service::{AuthService, Owner, hash_token};
pub use link_service::{LinkService, SmartLinkDraft};
pub use redirect_service::{RedirectService, Resolution};
