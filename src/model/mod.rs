//! Domain types, their API views, and the stores that hold them.

pub mod api;
pub mod choice;
pub mod eligibility;
pub mod id;
pub mod question;
pub mod store;
