//! Sequential delivery driver
//!
//! Walks a [`Session`] from its cursor to the end, one entry at a time:
//! decompress, hand to the sink, wait the fixed step delay, advance. A
//! [`PauseHandle`] can be triggered from any task; the driver looks at it once
//! per step, so the entry being delivered when the pause arrives always
//! completes. Calling [`SequentialDriver::run`] again continues from the
//! stored cursor.
//!
//! The run state moves through `Idle -> Running -> {Paused, Done}` and from
//! `Paused` back to `Running` on the next run. A run whose future is dropped
//! part way through leaves the session `Paused` at its cursor.


use crate::config::DeliveryConfig;
use crate::error::Result;
use crate::session::Session;
use crate::sink::{Delivery, DeliverySink};
use crate::types::{Event, RunState, RunSummary};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

/// Cooperative pause flag shared between the driver and whoever controls it
#[derive(Clone, Debug, Default)]
pub struct PauseHandle {
    requested: Arc<AtomicBool>,
}

impl PauseHandle {
    /// Ask the driver to stop before the next entry
    pub fn pause(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }

    /// Whether a pause has been requested and not yet cleared by a new run
    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    fn clear(&self) {
        self.requested.store(false, Ordering::SeqCst);
    }
}

/// Holds a session in `Running` for the lifetime of one run
///
/// If the run is dropped before it settles the session, the session falls
/// back to `Paused` at its cursor and a `Paused` event is sent.
struct RunningGuard<'a> {
    session: &'a mut Session,
    event_tx: &'a broadcast::Sender<Event>,
}

impl<'a> RunningGuard<'a> {
    fn enter(session: &'a mut Session, event_tx: &'a broadcast::Sender<Event>) -> Self {
        session.set_state(RunState::Running);
        Self { session, event_tx }
    }
}

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        if self.session.state() != RunState::Running {
            return;
        }
        let at = self.session.cursor();
        self.session.set_state(RunState::Paused);
        warn!(at, "delivery run dropped before finishing, session left paused");
        self.event_tx.send(Event::Paused { at }).ok();
    }
}

/// Drives the one-at-a-time delivery of a session's entries
pub struct SequentialDriver {
    step_delay: Duration,
    pause: PauseHandle,
    event_tx: broadcast::Sender<Event>,
}

impl SequentialDriver {
    /// Create a driver with the given delivery settings and event buffer size
    pub fn new(config: &DeliveryConfig, event_capacity: usize) -> Self {
        let (event_tx, _rx) = broadcast::channel(event_capacity.max(1));
        Self {
            step_delay: config.step_delay,
            pause: PauseHandle::default(),
            event_tx,
        }
    }

    /// Subscribe to driver events
    ///
    /// Each subscriber gets its own receiver. A subscriber that falls more
    /// than the channel capacity behind loses the oldest events.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// Handle that pauses this driver
    pub fn pause_handle(&self) -> PauseHandle {
        self.pause.clone()
    }

    /// Request a pause at the next step boundary
    pub fn pause(&self) {
        self.pause.pause();
    }

    /// Fixed wait after each delivered entry
    pub fn step_delay(&self) -> Duration {
        self.step_delay
    }

    /// Deliver entries from the session's cursor until the end or a pause
    ///
    /// Any pending pause request is cleared on entry, so this is both "start"
    /// and "continue". On error the run stops at the failing entry, the
    /// session is left `Paused` there and the error is returned; nothing is
    /// retried. Dropping the returned future mid-run also leaves the session
    /// `Paused` at the stored cursor, so a later run continues from there.
    pub async fn run(&self, session: &mut Session, sink: &dyn DeliverySink) -> Result<RunSummary> {
        let started_at = session.cursor();
        let mut summary = RunSummary {
            started_at,
            delivered: 0,
            cursor: started_at,
            paused: false,
        };

        if session.is_empty() || session.state() == RunState::Done {
            debug!(
                state = ?session.state(),
                entries = session.len(),
                "nothing to deliver"
            );
            return Ok(summary);
        }

        self.pause.clear();
        let mut guard = RunningGuard::enter(session, &self.event_tx);
        let session = &mut *guard.session;
        self.emit_event(Event::Started {
            from: started_at,
            total: session.len(),
        });
        info!(from = started_at, total = session.len(), "delivery started");

        for index in started_at..session.len() {
            if self.pause.is_requested() {
                session.set_state(RunState::Paused);
                summary.paused = true;
                info!(index, "delivery paused at index");
                self.emit_event(Event::Paused { at: index });
                return Ok(summary);
            }

            match self.step(session, index, sink).await {
                Ok(delivery) => {
                    session.set_cursor(index + 1);
                    summary.delivered += 1;
                    summary.cursor = index + 1;
                    self.emit_event(Event::Delivered {
                        index,
                        name: delivery.name,
                        bytes: delivery.bytes,
                        at: chrono::Utc::now(),
                    });
                }
                Err(e) => {
                    session.set_state(RunState::Paused);
                    error!(index, error = %e, "delivery failed, aborting remaining entries");
                    self.emit_event(Event::Failed {
                        index,
                        error: e.to_string(),
                    });
                    return Err(e);
                }
            }

            tokio::time::sleep(self.step_delay).await;
        }

        session.set_state(RunState::Done);
        info!(delivered = summary.delivered, "all entries delivered");
        self.emit_event(Event::Completed {
            delivered: summary.delivered,
        });
        Ok(summary)
    }

    async fn step(
        &self,
        session: &Session,
        index: usize,
        sink: &dyn DeliverySink,
    ) -> Result<Delivery> {
        let Some(entry) = session.get(index) else {
            return Err(crate::error::SessionError::IndexOutOfRange {
                index,
                len: session.len(),
            }
            .into());
        };
        let name = entry.download_name().to_string();
        info!(index, name = %name, "delivering entry");

        let bytes = entry.content.materialize_async().await?;
        sink.deliver(&name, &bytes).await
    }

    fn emit_event(&self, event: Event) {
        // No subscribers is fine
        self.event_tx.send(event).ok();
    }
}
