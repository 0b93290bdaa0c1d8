//! Centralized constants used across the application.
//!
//! This module contains magic numbers and configuration values that are used
//! in multiple places or would benefit from being named constants.

/// Default window width in pixels
pub const DEFAULT_WINDOW_WIDTH: f32 = 1600.0;

/// Default window height in pixels
pub const DEFAULT_WINDOW_HEIGHT: f32 = 900.0;

/// Width of the planner side panel in pixels
pub const PLANNER_PANEL_WIDTH: f32 = 260.0;

/// Number of undo states kept when the config does not say otherwise
pub const DEFAULT_MAXIMUM_SAVED_STATES: usize = 10;

/// Display color for models loaded without one (bone white)
pub const DEFAULT_MODEL_COLOR: [f32; 4] = [0.89, 0.85, 0.79, 1.0];
