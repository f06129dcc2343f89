pub mod mock;
pub mod openrouter;
pub mod prompts;

pub use mock::MockProvider;
pub use openrouter::{OpenRouterConfig, OpenRouterProvider};
