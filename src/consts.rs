//! Shared numeric constants.

// ── Game defaults ───────────────────────────────────────────────

pub const DEFAULT_FPS: f64 = 60.0;

pub const DEFAULT_GAME_WIDTH: f64 = 480.0;

pub const DEFAULT_GAME_HEIGHT: f64 = 340.0;

pub const DEFAULT_ZOOM: f64 = 1.0;

// ── Element defaults ────────────────────────────────────────────

pub const DEFAULT_ELEMENT_SIZE: f64 = 16.0;

pub const DEFAULT_ELEMENT_KIND: &str = "element";

// ── Motion ──────────────────────────────────────────────────────

/// Distance of one leg of a constant-speed sweep. A non-zero speed is a
/// repeating linear move this far in the direction of travel.
pub const SPEED_SWEEP_DISTANCE: f64 = 9999.0;

// ── Collisions ──────────────────────────────────────────────────

/// Pattern that matches every element.
pub const MATCH_EVERYTHING: &str = "*";
