pub mod errors;
pub mod id;
pub mod time;

pub use errors::{CollabError, ConfigError, StitchflowError};
pub use id::{new_id, ProjectId};
pub use time::{format_epoch_ms, now_epoch_ms};

pub type Result<T> = std::result::Result<T, StitchflowError>;
