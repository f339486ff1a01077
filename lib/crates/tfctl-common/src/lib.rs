pub mod state_layout;
pub mod types;

pub use state_layout::{bucket_for, state_key};
pub use types::*;
