//! Game configuration: serde defaults plus an environment overlay.
//!
//! Environment variables (all optional, unparseable values are ignored):
//!
//! | Variable | Field |
//! |---|---|
//! | `SPRITEKIT_FPS` | `fps` |
//! | `SPRITEKIT_ZOOM` | `zoom` |
//! | `SPRITEKIT_WIDTH` | `width` |
//! | `SPRITEKIT_HEIGHT` | `height` |
//! | `SPRITEKIT_COLLISION_INTERVAL_MS` | `collision_interval_ms` |

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_FPS, DEFAULT_GAME_HEIGHT, DEFAULT_GAME_WIDTH, DEFAULT_ZOOM};
use crate::error::GameError;
use crate::geometry::Point;
use crate::motion::AxisRange;
use crate::selector::Selector;

const FPS_ENV: &str = "SPRITEKIT_FPS";
const ZOOM_ENV: &str = "SPRITEKIT_ZOOM";
const WIDTH_ENV: &str = "SPRITEKIT_WIDTH";
const HEIGHT_ENV: &str = "SPRITEKIT_HEIGHT";
const COLLISION_INTERVAL_ENV: &str = "SPRITEKIT_COLLISION_INTERVAL_MS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Frames per second. Drives collision polling and camera follow.
    pub fps: f64,
    pub width: f64,
    pub height: f64,
    /// Rendered scale. 0 collapses every element to an empty rectangle.
    pub zoom: f64,
    /// Viewport position on the host page.
    pub origin: Point,
    pub scroll_x: AxisRange,
    pub scroll_y: AxisRange,
    /// Fixed collision polling interval. Follows the frame rate when unset.
    pub collision_interval_ms: Option<f64>,
    /// Restricts collision candidates to elements matching this selector.
    pub collision_root: Option<String>,
    /// Initial game state.
    pub state: Option<String>,
}

impl Default for GameConfig {
    fn default() -> Self {
        let scroll = AxisRange { min: Some(0.0), max: None };
        Self {
            fps: DEFAULT_FPS,
            width: DEFAULT_GAME_WIDTH,
            height: DEFAULT_GAME_HEIGHT,
            zoom: DEFAULT_ZOOM,
            origin: Point::default(),
            scroll_x: scroll,
            scroll_y: scroll,
            collision_interval_ms: None,
            collision_root: None,
            state: None,
        }
    }
}

impl GameConfig {
    /// Defaults overlaid with the environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().with_env()
    }

    /// Overlay environment variables onto `self`.
    #[must_use]
    pub fn with_env(mut self) -> Self {
        self.fps = env_parse(FPS_ENV, self.fps);
        self.zoom = env_parse(ZOOM_ENV, self.zoom);
        self.width = env_parse(WIDTH_ENV, self.width);
        self.height = env_parse(HEIGHT_ENV, self.height);
        if let Some(ms) = env_value::<f64>(COLLISION_INTERVAL_ENV) {
            self.collision_interval_ms = Some(ms);
        }
        self
    }

    /// # Errors
    ///
    /// Returns the first invalid field as a [`GameError`].
    pub fn validate(&self) -> Result<(), GameError> {
        validate_fps(self.fps)?;
        validate_zoom(self.zoom)?;
        self.scroll_x.validate()?;
        self.scroll_y.validate()?;
        if let Some(ms) = self.collision_interval_ms {
            collision_interval(ms)?;
        }
        self.collision_root()?;
        Ok(())
    }

    /// Parsed `collision_root`.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Selector`] for a malformed selector.
    pub fn collision_root(&self) -> Result<Option<Selector>, GameError> {
        match &self.collision_root {
            Some(raw) => Ok(Some(Selector::parse(raw)?)),
            None => Ok(None),
        }
    }

    #[must_use]
    pub fn frame_interval(&self) -> Duration {
        frame_interval(self.fps)
    }
}

pub(crate) fn validate_fps(fps: f64) -> Result<(), GameError> {
    if fps.is_finite() && fps > 0.0 {
        Ok(())
    } else {
        Err(GameError::InvalidFrameRate(fps))
    }
}

pub(crate) fn validate_zoom(zoom: f64) -> Result<(), GameError> {
    if zoom.is_finite() && zoom >= 0.0 {
        Ok(())
    } else {
        Err(GameError::InvalidZoom(zoom))
    }
}

/// One frame at `fps`, never shorter than a nanosecond.
pub(crate) fn frame_interval(fps: f64) -> Duration {
    match Duration::try_from_secs_f64(1.0 / fps) {
        Ok(interval) => interval.max(Duration::from_nanos(1)),
        Err(_) => Duration::MAX,
    }
}

pub(crate) fn collision_interval(ms: f64) -> Result<Duration, GameError> {
    if !(ms.is_finite() && ms > 0.0) {
        return Err(GameError::InvalidInterval(ms));
    }
    match Duration::try_from_secs_f64(ms / 1000.0) {
        Ok(interval) => Ok(interval.max(Duration::from_nanos(1))),
        Err(_) => Err(GameError::InvalidInterval(ms)),
    }
}

/// Parse an env var, falling back to `default` when unset or unparseable.
pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy,
{
    env_value(key).unwrap_or(default)
}

fn env_value<T: FromStr>(key: &str) -> Option<T> {
    match std::env::var(key).map(|raw| raw.trim().parse::<T>()) {
        Ok(Ok(value)) => Some(value),
        _ => None,
    }
}
