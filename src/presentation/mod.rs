// Presentation layer - HTTP surface for previews and instantiation
pub mod app_state;
pub mod error;
pub mod handlers;
