//! One-shot "try to localize this map" handshake.
//!
//! A [`SlamChecker`] subscribes to a localizer's completion and failure
//! notifications, asks it to load a map and reports exactly one boolean
//! outcome. Subscriptions live in a guard that detaches both listeners when
//! the attempt finishes, is stopped, or the session is dropped.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::task::{Context, Poll};

use tokio::sync::oneshot;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{ListenerId, LocalizerEvent, SlamLocalizer};

/// Errors from starting a localization attempt.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlamCheckError {
    #[error("localizer already finished an attempt; checker/localizer pairs are single-use")]
    ReuseError,
    #[error("a localization attempt is already in flight")]
    AlreadyListening,
}

/// Lifecycle of a checker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CheckerState {
    Idle,
    Listening,
    Finished,
}

type Completion = Box<dyn FnOnce(bool) + Send>;

/// Both listeners of one attempt; detached on drop.
struct Subscription {
    localizer: Arc<dyn SlamLocalizer>,
    listeners: [(LocalizerEvent, ListenerId); 2],
}

impl Subscription {
    /// Register both listeners. Must be called with the session unlocked: the
    /// localizer may notify from inside `add_listener`.
    fn attach(
        localizer: &Arc<dyn SlamLocalizer>,
        session: &Arc<Mutex<Session>>,
        attempt: u64,
    ) -> Self {
        let on = |event: LocalizerEvent, success: bool| {
            let session: Weak<Mutex<Session>> = Arc::downgrade(session);
            let id = localizer.add_listener(
                event,
                Arc::new(move || {
                    if let Some(session) = session.upgrade() {
                        finish(&session, attempt, success);
                    }
                }),
            );
            (event, id)
        };

        Self {
            listeners: [
                on(LocalizerEvent::MapLoadingFailed, false),
                on(LocalizerEvent::MappingCompleted, true),
            ],
            localizer: Arc::clone(localizer),
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        for (event, id) in self.listeners {
            self.localizer.remove_listener(event, id);
        }
    }
}

struct Session {
    state: CheckerState,
    /// Bumped by every started attempt; listeners and futures only act on
    /// the attempt they were created for.
    attempt: u64,
    subscription: Option<Subscription>,
    on_done: Option<Completion>,
}

impl Session {
    fn is_listening_for(&self, attempt: u64) -> bool {
        self.state == CheckerState::Listening && self.attempt == attempt
    }
}

fn lock(session: &Mutex<Session>) -> MutexGuard<'_, Session> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Resolve `attempt`. Only the first caller wins; the guard is released
/// and the callback invoked with no lock held.
fn finish(session: &Mutex<Session>, attempt: u64, success: bool) {
    let (subscription, on_done) = {
        let mut s = lock(session);
        if !s.is_listening_for(attempt) {
            return;
        }
        s.state = CheckerState::Finished;
        (s.subscription.take(), s.on_done.take())
    };
    drop(subscription);
    log::debug!("slam localization finished (success={success})");
    if let Some(on_done) = on_done {
        on_done(success);
    }
}

/// Detach listeners; a pending attempt goes back to idle without a callback.
///
/// With `Some(attempt)` nothing happens unless that attempt is still the
/// current one.
fn stop(session: &Mutex<Session>, attempt: Option<u64>) {
    let (subscription, on_done) = {
        let mut s = lock(session);
        if attempt.is_some_and(|a| a != s.attempt) {
            return;
        }
        if s.state == CheckerState::Listening {
            log::debug!("slam localization cancelled");
            s.state = CheckerState::Idle;
        }
        (s.subscription.take(), s.on_done.take())
    };
    drop(subscription);
    drop(on_done);
}

/// Drives a single localization attempt on a [`SlamLocalizer`].
pub struct SlamChecker {
    localizer: Option<Arc<dyn SlamLocalizer>>,
    session: Arc<Mutex<Session>>,
}

impl SlamChecker {
    /// Create a checker. A present localizer is told not to start loading on
    /// its own; the checker decides when loading begins.
    pub fn new(localizer: Option<Arc<dyn SlamLocalizer>>) -> Self {
        if let Some(localizer) = &localizer {
            localizer.set_initialize_on_start(false);
        }
        Self {
            localizer,
            session: Arc::new(Mutex::new(Session {
                state: CheckerState::Idle,
                attempt: 0,
                subscription: None,
                on_done: None,
            })),
        }
    }

    /// Checker with no localization subsystem; every attempt fails at once.
    pub fn without_localizer() -> Self {
        Self::new(None)
    }

    pub fn state(&self) -> CheckerState {
        lock(&self.session).state
    }

    #[inline]
    pub fn has_localizer(&self) -> bool {
        self.localizer.is_some()
    }

    /// Try to localize against the map at `map_path`.
    ///
    /// Without a localizer `on_done(false)` runs synchronously. Otherwise the
    /// call returns immediately and `on_done` runs once, on the localizer's
    /// notification thread, unless [`stop`](Self::stop) is called first.
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip(self, on_done)))]
    pub fn try_localize_map<F>(&self, map_path: &str, on_done: F) -> Result<(), SlamCheckError>
    where
        F: FnOnce(bool) + Send + 'static,
    {
        self.start(map_path, Box::new(on_done)).map(|_| ())
    }

    /// Start an attempt and return its number, or `None` when there is no
    /// localizer and `on_done(false)` already ran.
    ///
    /// The session lock is only held to reserve, install or roll back; the
    /// localizer is always called unlocked.
    fn start(&self, map_path: &str, on_done: Completion) -> Result<Option<u64>, SlamCheckError> {
        let Some(localizer) = &self.localizer else {
            log::debug!("no localizer available, skipping {map_path}");
            on_done(false);
            return Ok(None);
        };

        let attempt = {
            let mut s = lock(&self.session);
            match s.state {
                CheckerState::Listening => return Err(SlamCheckError::AlreadyListening),
                CheckerState::Finished => return Err(SlamCheckError::ReuseError),
                CheckerState::Idle => {}
            }
            s.attempt += 1;
            s.state = CheckerState::Listening;
            s.on_done = Some(on_done);
            s.attempt
        };

        if localizer.is_finished() {
            log::warn!("refusing to reuse a finished localizer for {map_path}");
            stop(&self.session, Some(attempt));
            return Err(SlamCheckError::ReuseError);
        }

        let subscription = Subscription::attach(localizer, &self.session, attempt);
        let subscription = {
            let mut s = lock(&self.session);
            if s.is_listening_for(attempt) {
                s.subscription = Some(subscription);
                None
            } else {
                Some(subscription)
            }
        };
        if let Some(subscription) = subscription {
            // Stopped or already resolved while subscribing.
            drop(subscription);
            return Ok(Some(attempt));
        }

        log::debug!("loading slam map {map_path}");
        localizer.load_slam_map(map_path);
        Ok(Some(attempt))
    }

    /// Future flavour of [`try_localize_map`](Self::try_localize_map).
    ///
    /// Resolves to `Some(outcome)`, or `None` if the attempt was stopped.
    /// Dropping the future stops the attempt, but never a later one.
    pub fn localize(&self, map_path: &str) -> Result<LocalizationFuture, SlamCheckError> {
        let (tx, rx) = oneshot::channel();
        let attempt = self.start(
            map_path,
            Box::new(move |success| {
                let _ = tx.send(success);
            }),
        )?;
        Ok(LocalizationFuture {
            rx,
            session: Arc::clone(&self.session),
            attempt,
        })
    }

    /// Stop listening. Idempotent and safe to call from a notification.
    ///
    /// Does not cancel the localizer's own work; a pending callback will
    /// simply never fire.
    pub fn stop(&self) {
        stop(&self.session, None);
    }
}

impl std::fmt::Debug for SlamChecker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlamChecker")
            .field("has_localizer", &self.has_localizer())
            .field("state", &self.state())
            .finish()
    }
}

/// Single-resolution outcome of [`SlamChecker::localize`].
#[must_use = "dropping the future stops the localization attempt"]
pub struct LocalizationFuture {
    rx: oneshot::Receiver<bool>,
    session: Arc<Mutex<Session>>,
    attempt: Option<u64>,
}

impl LocalizationFuture {
    /// Stop listening; the future then resolves to `None`. Has no effect once
    /// the checker has moved on to another attempt.
    pub fn cancel(&self) {
        if let Some(attempt) = self.attempt {
            stop(&self.session, Some(attempt));
        }
    }
}

impl std::fmt::Debug for LocalizationFuture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalizationFuture")
            .field("attempt", &self.attempt)
            .finish_non_exhaustive()
    }
}

impl Future for LocalizationFuture {
    type Output = Option<bool>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx).poll(cx).map(Result::ok)
    }
}

impl Drop for LocalizationFuture {
    fn drop(&mut self) {
        self.cancel();
    }
}
