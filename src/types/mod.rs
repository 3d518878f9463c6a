//! Shared types for DRY compliance.

mod pagination;
mod response;

pub use pagination::ListParams;
pub use response::NoContent;
