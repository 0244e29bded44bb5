//! Core domain entities representing the business data model.
//!
//! Entities are plain data structures. Selection of a redirect target lives on
//! [`Destinations`] because it depends only on the record itself.
//!
//! # Entity Types
//!
//! - [`SmartLink`] - A stored smart-link or text-QR record
//! - [`NewSmartLink`] - Input for creating a record
//! - [`Destinations`] - Per-platform redirect targets

pub mod smart_link;

pub use smart_link::{DestinationChoice, Destinations, LinkMode, NewSmartLink, SmartLink};
