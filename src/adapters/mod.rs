// Adapters layer: concrete implementations for external systems.
// Local artifact storage lives under config::cli next to the CLI config.

pub mod http;
