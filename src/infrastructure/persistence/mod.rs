//! Repository implementations.
//!
//! Concrete implementations of the domain repository traits.
//!
//! # Repositories
//!
//! - [`PgLinkRepository`] - link storage, handle namespace and counters (PostgreSQL)
//! - [`PgClickRepository`] - click events (PostgreSQL)
//! - [`MemoryStore`] - both traits in process memory, for tests and local runs

pub mod memory_store;
pub mod pg_click_repository;
pub mod pg_link_repository;

pub use memory_store::MemoryStore;
pub use pg_click_repository::PgClickRepository;
pub use pg_link_repository::PgLinkRepository;
