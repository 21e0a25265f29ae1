//! Frame clock
//!
//! The scheduler never measures wall time. It asks a [`Clock`] for the
//! current frame and converts durations with the clock's frame rate, so a
//! given timeline always produces the same frame-by-frame output.

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::cell::Cell;

/// Source of the current frame and second/frame conversions
pub trait Clock {
    /// The frame currently being produced
    fn current_frame(&self) -> u64;

    /// Number of frames covering `seconds`, rounded up
    fn seconds_to_frames(&self, seconds: f64) -> u64;

    /// Duration of `frames` in seconds
    fn frames_to_seconds(&self, frames: u64) -> f64;
}

/// Lookup of named frame events
pub trait FrameEvents {
    /// Frame at which the named event fires, if known yet
    fn frame_for_event(&self, name: &str) -> Option<u64>;

    /// Called once when a waiter starts waiting for `name` at `frame`.
    ///
    /// Registries that create events on first use override this. The default
    /// is a plain lookup.
    fn register(&self, name: &str, frame: u64) -> Option<u64> {
        let _ = frame;
        self.frame_for_event(name)
    }
}

/// Playback settings
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct PlaybackConfig {
    /// Frames per second
    #[serde(default = "default_fps")]
    pub fps: f64,
    /// Frame playback starts from
    #[serde(default)]
    pub start_frame: u64,
}

fn default_fps() -> f64 {
    30.0
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            start_frame: 0,
        }
    }
}

/// Fixed-rate clock advanced manually by the host
#[derive(Debug)]
pub struct PlaybackClock {
    fps: f64,
    frame: Cell<u64>,
}

impl PlaybackClock {
    /// Create a clock at frame 0
    pub fn new(fps: f64) -> Result<Self> {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(CoreError::InvalidFrameRate(fps));
        }
        Ok(Self {
            fps,
            frame: Cell::new(0),
        })
    }

    pub fn from_config(config: &PlaybackConfig) -> Result<Self> {
        let clock = Self::new(config.fps)?;
        clock.seek(config.start_frame);
        Ok(clock)
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }

    /// Move to the next frame and return it
    pub fn advance(&self) -> u64 {
        let next = self.frame.get() + 1;
        self.frame.set(next);
        next
    }

    /// Jump to an absolute frame
    pub fn seek(&self, frame: u64) {
        self.frame.set(frame);
    }

    /// Current playback position in seconds
    pub fn time(&self) -> f64 {
        self.frames_to_seconds(self.frame.get())
    }
}

impl Clock for PlaybackClock {
    fn current_frame(&self) -> u64 {
        self.frame.get()
    }

    fn seconds_to_frames(&self, seconds: f64) -> u64 {
        if seconds <= 0.0 || !seconds.is_finite() {
            return 0;
        }
        (seconds * self.fps).ceil() as u64
    }

    fn frames_to_seconds(&self, frames: u64) -> f64 {
        frames as f64 / self.fps
    }
}
