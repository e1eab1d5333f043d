//! TUI module for interactive terminal interfaces.
//!
//! Uses `ratatui` + `crossterm` for rendering.

/// Filtered movie browser with on-demand detail lookups.
pub mod movie_browser;
/// People browser with category toggles and a rating chart.
pub mod people_browser;

pub use movie_browser::run_movie_browser;
pub use people_browser::run_people_browser;
