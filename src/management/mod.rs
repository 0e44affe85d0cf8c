mod flow;
mod token;

pub use flow::AuthError;
pub use flow::AuthFlow;
pub use flow::CallbackParams;
pub use flow::LoginRedirect;
pub use flow::STATE_KEY;
pub use flow::TokenGrant;
pub use token::EXPIRY_MARGIN_SECS;
pub use token::TokenStore;
