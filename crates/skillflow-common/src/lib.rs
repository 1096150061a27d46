pub mod errors;
pub mod id;
pub mod types;

pub use errors::{ConfigError, SkillflowError};
pub use id::{new_correlation_id, next_id, ConversationId};
pub use types::{UserContext, UserProfile, UserRole};

pub type Result<T> = std::result::Result<T, SkillflowError>;
