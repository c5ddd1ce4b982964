//! Upload policy
//!
//! Decides, per upload category, where a file is stored, how its stored name
//! is derived, how large it may be and which content types are accepted.

pub mod category;
pub mod error;
pub mod naming;
pub mod store;

pub use category::UploadCategory;
pub use error::UploadError;
pub use naming::generate_filename;
pub use store::{StoredFile, UploadHandler, UploadStore};
