//! Domain layer containing business entities and logic.
//!
//! This module implements the core domain logic following Clean Architecture principles.
//! It defines entities, repository interfaces, and the device classifier,
//! independent of infrastructure concerns.
//!
//! # Architecture
//!
//! - [`device`] - User-Agent to [`device::DeviceCategory`] classification
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//!
//! # Redirect Flow
//!
//! 1. HTTP handler receives `GET /{short_id}`
//! 2. [`device::classify`] derives the device category from `User-Agent`
//! 3. [`crate::application::services::RedirectService`] looks up the record and
//!    picks a destination
//! 4. The click counter is incremented through [`repositories::LinkRepository`]

pub mod device;
pub mod entities;
pub mod repositories;
