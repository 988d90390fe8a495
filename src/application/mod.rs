//! Application layer: loading layouts and wiring them to the domain

pub mod error;
pub mod error_ext;
pub mod layout;

pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
