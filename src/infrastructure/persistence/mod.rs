//! Repository implementations.
//!
//! Concrete implementations of domain repository traits.
//!
//! # Repositories
//!
//! - [`PgLinkRepository`] / [`PgTokenRepository`] - PostgreSQL via SQLx
//! - [`MemoryLinkRepository`] / [`MemoryTokenRepository`] - in-process `DashMap` stores

pub mod memory_link_repository;
pub mod memory_token_repository;
pub mod pg_link_repository;
pub mod pg_token_repository;

pub use memory_link_repository::MemoryLinkRepository;
pub use memory_token_repository::MemoryTokenRepository;
pub use pg_link_repository::PgLinkRepository;
pub use pg_token_repository::PgTokenRepository;
