//! Reel Core
//!
//! Host-facing building blocks shared by the Reel animation runtime:
//!
//! - **Clock**: frame source and second/frame conversion
//! - **Time Events**: named frames that animations can wait for
//! - **Properties**: get/set access to animated values
//! - **Values**: colors, vectors, rectangles and spacing
//!
//! # Example
//!
//! ```rust
//! use reel_core::{Clock, PlaybackClock};
//!
//! let clock = PlaybackClock::new(30.0).unwrap();
//! assert_eq!(clock.seconds_to_frames(1.0), 30);
//!
//! clock.advance();
//! assert_eq!(clock.current_frame(), 1);
//! ```

pub mod clock;
pub mod color;
pub mod error;
pub mod geometry;
pub mod property;
pub mod time_events;

pub use clock::{Clock, FrameEvents, PlaybackClock, PlaybackConfig};
pub use color::Color;
pub use error::{CoreError, Result};
pub use geometry::{Rect, Spacing, Vector2};
pub use property::{FnProperty, Property, SharedProperty};
pub use time_events::{TimeEvent, TimeEvents};
