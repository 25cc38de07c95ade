pub mod domain;
pub mod error;
pub mod version;

pub use domain::*;
pub use error::{CoreError, Result};
pub use version::Version;
