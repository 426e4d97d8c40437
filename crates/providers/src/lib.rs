//! Model provider implementations for tsprompt.
//!
//! All providers implement the `tsprompt_core::Provider` trait.
//! The router selects the correct provider based on configuration.

pub mod mock;
pub mod openai_compat;
pub mod router;

pub use mock::MockProvider;
pub use openai_compat::OpenAiCompatProvider;
pub use router::{MOCK_PROVIDER, ProviderRouter};
