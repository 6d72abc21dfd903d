// Services layer - Business logic and orchestration
pub mod authorizer;
pub mod identity;
pub mod session_store;

pub use authorizer::has_permission;
pub use identity::IdentityService;
pub use session_store::{SessionStore, DEFAULT_IDLE_TIMEOUT};
