//! Cooperative threads
//!
//! Animations are written as async blocks that suspend at well-defined points
//! and are resumed once per frame by a [`Scheduler`]. There is no OS-level
//! concurrency: the scheduler polls each task on the calling thread, in
//! registration order.
//!
//! # Example
//!
//! ```rust
//! use reel_animation::flow::wait_for;
//! use reel_animation::threading::{cancel, join, spawn, threadable, Scheduler};
//! use reel_core::PlaybackClock;
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let clock = Rc::new(PlaybackClock::new(30.0).unwrap());
//! let mut scheduler = Scheduler::new(clock.clone());
//! let fired = Rc::new(Cell::new(false));
//!
//! let flag = fired.clone();
//! scheduler.spawn(threadable("root", async move {
//!     let slow = spawn(threadable("slow", async move {
//!         wait_for(2.0).await;
//!         flag.set(true);
//!     }))
//!     .await;
//!     let killer = spawn(threadable("killer", async move {
//!         wait_for(1.0).await;
//!         cancel([slow]).await;
//!     }))
//!     .await;
//!     join(true, [slow, killer]).await;
//! }));
//!
//! scheduler.run_until_idle(|| { clock.advance(); }).unwrap();
//! assert!(!fired.get());
//! ```

mod cancel;
mod context;
mod join;
mod scheduler;
mod signal;
mod spawn;
mod thread;

pub use cancel::cancel;
pub use context::ThreadContext;
pub use join::{join, join_all, join_any};
pub use scheduler::{schedule, schedule_with, Scheduler, TickReport};
pub use spawn::{spawn, suspend};
pub use thread::{threadable, BoxFuture, TaskId, TaskState, Thread};
