//! Token and chain catalog

pub mod token_registry;

pub use token_registry::TokenRegistry;
