//! Watering session
//!
//! Tracks one recipient watering one gift.
//!
//! # State Flow
//!
//! ```text
//! Pending(0) ─advance()─> Pending(1) ─ ... ─advance()─> Completed ──> CompletionEvent
//!                                                          │
//!                                                          └─ persist(&event) -> EntryId
//! ```
//!
//! # Persistence
//!
//! The session id is the id of the garden entry it plants. Retrying
//! `persist` after a failure writes under the same id, so a gift is planted
//! at most once no matter how often the write is attempted. A failed persist
//! never takes the bloom back.

use std::fmt;
use std::sync::Arc;

use tracing::instrument;
use uuid::Uuid;

pub mod progress;
pub mod state;

pub use self::progress::{Progress, ProgressObserver};
pub use self::state::{CompletionEvent, Phase, Reveal};
use crate::context::GiftContext;
use crate::error::Error;
use crate::garden::{EntryId, GardenEntry};
use crate::gift::GiftDescriptor;
use crate::util::unix_time;

/// One recipient watering one gift.
///
/// [`WateringSession::advance`] and [`WateringSession::persist`] take
/// `&mut self`; share a session across tasks behind a `tokio::sync::Mutex`.
pub struct WateringSession {
    /// Session id, also the id of the garden entry it plants
    id: Uuid,
    /// Collaborators
    context: GiftContext,
    /// The gift
    descriptor: GiftDescriptor,
    /// Stored entry this gift was opened from
    source: Option<EntryId>,
    /// Waterings done
    completed: u32,
    /// Set once the flower blooms
    completion: Option<CompletionEvent>,
    /// Set once the gift is planted
    persisted: bool,
    /// Presentation hook
    observer: Option<Arc<dyn ProgressObserver>>,
}

impl WateringSession {
    /// Create a new session in `Pending(0)`.
    ///
    /// A zero watering count cannot come out of [`GiftDescriptor::new`]; if
    /// one ever does, the session starts completed and its event is
    /// available from [`WateringSession::completion`].
    pub fn new(context: GiftContext, descriptor: GiftDescriptor, source: Option<EntryId>) -> Self {
        let id = Uuid::new_v4();

        let completion = (descriptor.required_interactions() == 0).then(|| CompletionEvent {
            session_id: id,
            descriptor: descriptor.clone(),
            completed_at: unix_time(),
        });

        tracing::debug!(
            "Starting watering session {} for {} ({} waterings)",
            id,
            descriptor.flower(),
            descriptor.required_interactions()
        );

        Self {
            id,
            context,
            descriptor,
            source,
            completed: 0,
            completion,
            persisted: false,
            observer: None,
        }
    }

    /// Attach a progress observer
    pub fn with_observer(mut self, observer: Arc<dyn ProgressObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Session id
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Id of the garden entry this session plants
    pub fn entry_id(&self) -> EntryId {
        self.id.into()
    }

    /// The gift
    pub fn descriptor(&self) -> &GiftDescriptor {
        &self.descriptor
    }

    /// Stored entry this gift was opened from
    pub fn source(&self) -> Option<EntryId> {
        self.source
    }

    /// Waterings done
    pub fn completed_interactions(&self) -> u32 {
        self.completed
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        match self.completion {
            Some(_) => Phase::Completed,
            None => Phase::Pending(self.completed),
        }
    }

    /// Completion event, once bloomed
    pub fn completion(&self) -> Option<&CompletionEvent> {
        self.completion.as_ref()
    }

    /// Whether the gift is planted in the garden
    pub fn is_persisted(&self) -> bool {
        self.persisted
    }

    /// Current progress
    pub fn progress(&self) -> Progress {
        Progress {
            completed: self.completed,
            required: self.descriptor.required_interactions(),
        }
    }

    /// Water once.
    ///
    /// Returns the completion event on the watering that makes the flower
    /// bloom and `None` on every other call, including every call after
    /// blooming.
    pub fn advance(&mut self) -> Option<CompletionEvent> {
        let event = if self.completion.is_some() {
            None
        } else {
            self.completed += 1;

            if self.completed >= self.descriptor.required_interactions() {
                let event = CompletionEvent {
                    session_id: self.id,
                    descriptor: self.descriptor.clone(),
                    completed_at: unix_time(),
                };

                tracing::info!(
                    "Watering session {} bloomed after {} waterings",
                    self.id,
                    self.completed
                );

                self.completion = Some(event.clone());
                Some(event)
            } else {
                None
            }
        };

        if let Some(observer) = &self.observer {
            observer.on_progress(&self.progress());
        }

        event
    }

    /// Plant the bloomed gift in the owner's garden.
    ///
    /// Safe to call again after any failure. Once planted, further calls
    /// return the same entry id without writing.
    ///
    /// # Errors
    ///
    /// - [`Error::SessionMismatch`] if `event` came from another session
    /// - [`Error::NotCompleted`] if the flower has not bloomed
    /// - [`Error::IdentityUnavailable`] if there is no owner yet
    /// - [`Error::Timeout`] if the identity or the store does not answer in time
    /// - [`Error::Database`] if the store rejects the write
    #[instrument(skip_all, fields(session_id = %self.id))]
    pub async fn persist(&mut self, event: &CompletionEvent) -> Result<EntryId, Error> {
        if event.session_id != self.id {
            return Err(Error::SessionMismatch);
        }

        if self.completion.is_none() {
            return Err(Error::NotCompleted);
        }

        let entry_id = self.entry_id();

        if self.persisted {
            tracing::debug!("Gift {} already planted", entry_id);
            return Ok(entry_id);
        }

        let timeout = self.context.persist_timeout;
        let owner = tokio::time::timeout(timeout, self.context.owner_id())
            .await
            .map_err(|_| Error::Timeout(timeout))??;

        let entry = GardenEntry {
            id: entry_id,
            owner,
            descriptor: self.descriptor.clone(),
            source: self.source,
            received_at: event.completed_at,
        };

        let inserted = tokio::time::timeout(timeout, self.context.localstore.add_garden_entry(entry))
            .await
            .map_err(|_| Error::Timeout(timeout))??;

        if inserted {
            tracing::info!("Planted gift {} in garden", entry_id);
        } else {
            tracing::debug!("Gift {} was planted by an earlier attempt", entry_id);
        }

        self.persisted = true;

        if let Some(source) = self.source {
            // Best-effort: the gift is already planted
            match tokio::time::timeout(
                timeout,
                self.context
                    .localstore
                    .mark_reference_consumed(&source, &entry_id),
            )
            .await
            {
                Ok(Ok(())) => (),
                Ok(Err(e)) => {
                    tracing::warn!(
                        "Failed to mark stored gift {} as consumed: {}",
                        source,
                        e
                    );
                }
                Err(_) => {
                    tracing::warn!(
                        "Timed out after {:?} marking stored gift {} as consumed",
                        timeout,
                        source
                    );
                }
            }
        }

        Ok(entry_id)
    }
}

impl fmt::Debug for WateringSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WateringSession")
            .field("id", &self.id)
            .field("descriptor", &self.descriptor)
            .field("source", &self.source)
            .field("phase", &self.phase())
            .field("persisted", &self.persisted)
            .finish()
    }
}
