pub mod error;
pub mod refresh_window;
pub mod token;
pub mod token_cache;
pub mod token_context;
