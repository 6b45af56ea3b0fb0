//! Core domain entities.
//!
//! Entities are plain data structures without persistence concerns. Records
//! that are created by the service have a separate input type:
//!
//! - [`Link`] / [`NewLink`] - a shortened URL mapping
//! - [`Click`] / [`NewClick`] - one resolution of a link
//! - [`RegisterLink`] - unvalidated caller input for link registration

pub mod click;
pub mod link;

pub use click::{Click, NewClick};
pub use link::{Link, NewLink, RegisterLink};
