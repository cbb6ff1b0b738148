//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared utilities (load_planner, read_profile)
//! - `analyze` - Profile analysis
//! - `export` - Summary report export
//! - `rules` - Rule catalog and config inspection
//! - `serve` - Web server command

pub mod analyze;
pub mod core;
pub mod export;
pub mod rules;
pub mod serve;

// Re-export command functions for main.rs
pub use analyze::*;
pub use core::*;
pub use export::*;
pub use rules::*;
pub use serve::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
