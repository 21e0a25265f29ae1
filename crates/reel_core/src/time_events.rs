//! Named time events
//!
//! A time event marks a frame that animation code can wait for by name. The
//! first time code waits for an event, the event is registered at that frame
//! with a zero offset. Editors then move the event by changing its offset,
//! and every waiter picks up the new target on its next tick.

use crate::clock::FrameEvents;
use rustc_hash::FxHashMap;
use std::cell::{Cell, RefCell};

/// A time event at runtime
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimeEvent {
    /// Name of the event
    pub name: String,
    /// Frame at which the event was first awaited
    pub initial_frame: u64,
    /// Frame at which the event fires
    pub target_frame: u64,
    /// Distance between the initial and target frame
    pub offset: u64,
}

/// Registry of time events for one timeline
#[derive(Debug)]
pub struct TimeEvents {
    lookup: RefCell<FxHashMap<String, TimeEvent>>,
    /// Keep event targets in place when their registration frame moves
    preserve_timing: Cell<bool>,
}

impl TimeEvents {
    pub fn new() -> Self {
        Self {
            lookup: RefCell::new(FxHashMap::default()),
            preserve_timing: Cell::new(true),
        }
    }

    /// Load events with known target frames, keeping offsets of events that
    /// were already registered
    pub fn load<I, S>(&self, events: I)
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        let mut lookup = self.lookup.borrow_mut();
        let previous = std::mem::take(&mut *lookup);
        for (name, target_frame) in events {
            let name = name.into();
            let event = match previous.get(&name) {
                Some(prev) => TimeEvent {
                    target_frame,
                    ..prev.clone()
                },
                None => TimeEvent {
                    name: name.clone(),
                    initial_frame: 0,
                    target_frame,
                    offset: 0,
                },
            };
            lookup.insert(name, event);
        }
    }

    pub fn get(&self, name: &str) -> Option<TimeEvent> {
        self.lookup.borrow().get(name).cloned()
    }

    /// All events, sorted by target frame
    pub fn to_vec(&self) -> Vec<TimeEvent> {
        let mut events: Vec<_> = self.lookup.borrow().values().cloned().collect();
        events.sort_by(|a, b| a.target_frame.cmp(&b.target_frame).then(a.name.cmp(&b.name)));
        events
    }

    /// Change the offset of a registered event
    ///
    /// Returns false if the event is unknown or the offset is unchanged.
    pub fn set_offset(&self, name: &str, offset: u64, preserve: bool) -> bool {
        let mut lookup = self.lookup.borrow_mut();
        let Some(event) = lookup.get_mut(name) else {
            return false;
        };
        if event.offset == offset {
            return false;
        }
        self.preserve_timing.set(preserve);
        event.offset = offset;
        event.target_frame = event.initial_frame + offset;
        tracing::debug!(event = %name, target = event.target_frame, "time event moved");
        true
    }

    /// Register an event awaited at `frame` and return its target frame
    pub fn register_at(&self, name: &str, frame: u64) -> u64 {
        let mut lookup = self.lookup.borrow_mut();
        let preserve = self.preserve_timing.get();
        let event = lookup.entry(name.to_string()).or_insert_with(|| TimeEvent {
            name: name.to_string(),
            initial_frame: frame,
            target_frame: frame,
            offset: 0,
        });

        if event.initial_frame != frame {
            event.initial_frame = frame;
        }
        if preserve {
            event.offset = event.target_frame.saturating_sub(event.initial_frame);
        }
        let target = event.initial_frame + event.offset;
        if !preserve {
            event.target_frame = target;
        }
        event.target_frame
    }
}

impl Default for TimeEvents {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameEvents for TimeEvents {
    fn frame_for_event(&self, name: &str) -> Option<u64> {
        self.lookup.borrow().get(name).map(|event| event.target_frame)
    }

    fn register(&self, name: &str, frame: u64) -> Option<u64> {
        Some(self.register_at(name, frame))
    }
}
