//! SLAM map localization handshake.
//!
//! [`SlamChecker`] wraps an optional [`SlamLocalizer`] and turns its two
//! notifications ("map loading failed", "mapping completed") into a single
//! completion callback or a [`LocalizationFuture`].
//!
//! ## State machine
//!
//! `Idle -> Listening -> Finished`. Stopping a listening checker returns it
//! to `Idle` without invoking the callback. A finished checker, or one whose
//! localizer reports it already finished, refuses new attempts.
//!
//! There is no built-in timeout. Wrap the future in `tokio::time::timeout`
//! (dropping it stops the attempt) or call [`SlamChecker::stop`] yourself.

mod checker;
mod localizer;

pub use checker::{CheckerState, LocalizationFuture, SlamCheckError, SlamChecker};
pub use localizer::{Listener, ListenerId, ListenerRegistry, LocalizerEvent, SlamLocalizer};
