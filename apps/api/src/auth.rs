mod onboarding;
mod redirect;
mod session;

pub use onboarding::onboarding_handler;
pub use session::{logout_handler, me_handler, session_exchange_handler};

pub const SESSION_USER_KEY: &str = "user_identity";
