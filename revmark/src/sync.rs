//! Sync controller.
//!
//! Owns the Presentation and everything that must stay consistent with it:
//! the host view, the persisted field text, the id allocator, and the
//! process-wide selection. User actions are normalised into a single
//! [`HostAction`] enum and each maps to exactly one Presentation operation or
//! one pure view-local update.
//!
//! Change notifications are drained immediately after every mutating call —
//! view reconciliation and the auto-save decision both happen inside the same
//! logical turn, before the action handler returns. Only the persistence
//! round-trip itself suspends independently: auto-saves are spawned
//! fire-and-forget, so callers must not assume the write has landed when a
//! mutation returns, and a persist already in flight is never aborted by a
//! later mutation (last writer wins on the field).

use std::collections::HashSet;

use thiserror::Error;
use tokio::task::JoinHandle;

use revmark_core::codec;
use revmark_core::ids::{self, IdAllocator};
use revmark_core::presentation::{ChangeEvent, ChangeFeed, Presentation};
use revmark_core::{Annotation, Context, Payload, VisualId};

use crate::config::{Config, Frequency};
use crate::field::{FieldError, ReviewField};
use crate::host::AnnotationHost;

/// All user actions the host view can surface.
///
/// Marked `#[non_exhaustive]` so hosts gaining new affordances (resolve,
/// reply threads) can grow this enum without breaking existing handlers.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum HostAction {
    /// Per-line "add annotation" affordance was used.
    Add { context: Context, text: String },
    /// An inline edit on an existing annotation was accepted.
    Edit { id: VisualId, text: String },
    /// Sidebar delete was clicked.
    Delete { id: VisualId },
    /// Sidebar drag/drop requested a new position.
    Move { id: VisualId, position: usize },
    /// Sidebar row was clicked to scroll the marker into view.
    Navigate { id: VisualId },
    /// Selection changed (`None` clears it).
    Select { id: Option<VisualId> },
    /// "Remove all annotations" was requested.
    Clear,
    /// Explicit load from the review field (the manual-open path).
    Load,
    /// Explicit save to the review field (the manual-save path).
    Save,
}

/// Errors from the load and save paths.
///
/// Local Presentation operations never fail on valid input; only the gateway
/// round-trip and payload serialization can.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Field(#[from] FieldError),

    #[error("payload encode failed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Orchestrates Presentation ⇄ view ⇄ field consistency for one session.
pub struct SyncController<H, F> {
    presentation: Presentation,
    changes: ChangeFeed,
    ids: IdAllocator,
    host: H,
    field: F,
    config: Config,
    /// Ids with a live view node. Drives the edit-in-place vs. mount
    /// decision during reconciliation.
    mounted: HashSet<VisualId>,
    /// Process-wide "currently selected annotation".
    selected: Option<VisualId>,
    /// Auto-saves still in flight; awaited only by [`flush`](Self::flush).
    in_flight: Vec<JoinHandle<()>>,
}

impl<H, F> SyncController<H, F>
where
    H: AnnotationHost,
    F: ReviewField + Clone + 'static,
{
    pub fn new(host: H, field: F, config: Config) -> Self {
        let mut presentation = Presentation::new();
        let changes = presentation.subscribe();
        Self {
            presentation,
            changes,
            ids: IdAllocator::new(),
            host,
            field,
            config,
            mounted: HashSet::new(),
            selected: None,
            in_flight: Vec::new(),
        }
    }

    /// Dispatches one user action.
    ///
    /// Mutating actions have reconciled the view (and scheduled any auto-save)
    /// by the time this returns. Only `Load` and `Save` can fail; everything
    /// else degrades to a no-op on stale input (an id the view still knew but
    /// the Presentation no longer holds).
    pub async fn handle(&mut self, action: HostAction) -> Result<(), SyncError> {
        match action {
            HostAction::Add { context, text } => {
                let id = self.ids.next();
                self.presentation
                    .add_or_replace(Annotation::new(id, context, text));
                self.drain();
            }
            HostAction::Edit { id, text } => {
                let Some(existing) = self.presentation.get(id) else {
                    tracing::debug!(%id, "edit for unknown annotation dropped");
                    return Ok(());
                };
                let context = existing.context.clone();
                self.presentation
                    .add_or_replace(Annotation::new(id, context, text));
                self.drain();
            }
            HostAction::Delete { id } => {
                self.presentation.remove(id);
                self.drain();
            }
            HostAction::Move { id, position } => {
                self.presentation.move_to(id, position);
                // Reorder bypasses the change feed: the sidebar row moves
                // here, directly, and content consumers stay quiet because
                // nothing about the annotation itself changed.
                if let Some(index) = self.presentation.index_of(id) {
                    self.host.move_row(id, index);
                    if self.config.save_frequency == Frequency::Auto {
                        self.spawn_persist();
                    }
                }
            }
            HostAction::Navigate { id } => self.host.reveal(id),
            HostAction::Select { id } => self.select(id),
            HostAction::Clear => {
                self.presentation.remove_all();
                self.drain();
            }
            HostAction::Load => self.load().await?,
            HostAction::Save => self.persist_now().await?,
        }
        Ok(())
    }

    /// Replaces the session with whatever the review field currently holds.
    ///
    /// Ordering matters: the outgoing Presentation is torn down first and its
    /// remove-all notification fully processed, so the old and new view trees
    /// never coexist. Then the allocator reseeds from the incoming payload
    /// (scan complete before any new id can be issued), and only then does
    /// the fresh Presentation import and announce its annotations.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Field`] when the fetch fails. An absent or
    /// malformed block is not an error: the whole text becomes envelope and
    /// the session starts empty.
    pub async fn load(&mut self) -> Result<(), SyncError> {
        let text = self.field.fetch_text().await?;

        self.presentation.remove_all();
        self.drain();

        let payload = match codec::decode(&text) {
            Some(decoded) => {
                self.ids.init(ids::seed_for(&decoded.payload));
                match serde_json::from_value::<Payload>(decoded.payload) {
                    Ok(payload) => payload,
                    Err(err) => {
                        tracing::warn!(%err, "embedded block does not match payload schema");
                        Payload::default()
                    }
                }
            }
            None => {
                self.ids.init(ids::DEFAULT_SEED);
                Payload::default()
            }
        };

        let mut fresh = Presentation::new();
        self.changes = fresh.subscribe();
        self.presentation = fresh;
        self.presentation.import(payload);
        self.drain();
        Ok(())
    }

    /// Persists the current state and waits for the write to land.
    pub async fn persist_now(&mut self) -> Result<(), SyncError> {
        persist(&self.field, &self.presentation.export()).await
    }

    /// Awaits every auto-save still in flight.
    ///
    /// For hosts that want to quiesce before page unload. Mutation paths
    /// never call this.
    pub async fn flush(&mut self) {
        for handle in self.in_flight.drain(..) {
            let _ = handle.await;
        }
    }

    /// Current Presentation state, for hosts and tests.
    pub fn presentation(&self) -> &Presentation {
        &self.presentation
    }

    pub fn selected(&self) -> Option<VisualId> {
        self.selected
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Processes every pending change notification.
    ///
    /// Called immediately after each mutating Presentation call, so delivery
    /// completes within the same logical turn as the mutation.
    fn drain(&mut self) {
        while let Ok(event) = self.changes.try_recv() {
            self.apply(event);
        }
    }

    /// Reconciles the view with one change notification, then decides on
    /// persistence. Idempotent against redundant notifications.
    fn apply(&mut self, event: ChangeEvent) {
        for removed in &event.removed {
            if self.mounted.remove(&removed.id) {
                self.host.detach_marker(removed.id);
                self.host.remove_row(removed.id);
            }
            if self.selected == Some(removed.id) {
                self.selected = None;
            }
        }

        for added in &event.added {
            if self.mounted.contains(&added.id) {
                // Edit-in-place: the view node already exists.
                self.host.set_marker_text(added.id, &added.text);
            } else if let Some(index) = self.presentation.index_of(added.id) {
                self.host.attach_marker(added);
                self.host.insert_row(index, added);
                self.mounted.insert(added.id);
            }
        }

        let changed = !event.added.is_empty() || !event.removed.is_empty();
        if changed && self.config.save_frequency == Frequency::Auto {
            self.spawn_persist();
        }
    }

    /// Fire-and-forget persistence off the current state snapshot.
    ///
    /// Failures are logged and not retried. The snapshot is taken now; the
    /// fetch/write cycle runs whenever the task gets scheduled.
    fn spawn_persist(&mut self) {
        let snapshot = self.presentation.export();
        let field = self.field.clone();
        self.in_flight.retain(|handle| !handle.is_finished());
        self.in_flight.push(tokio::spawn(async move {
            if let Err(err) = persist(&field, &snapshot).await {
                tracing::warn!(%err, "auto-save failed");
            }
        }));
    }

    /// Moves the selection, clearing the previous highlight first.
    /// Selecting the already-selected id is a no-op.
    fn select(&mut self, id: Option<VisualId>) {
        if self.selected == id {
            return;
        }
        if let Some(previous) = self.selected.take() {
            self.host.set_highlight(previous, false);
        }
        if let Some(next) = id {
            if self.presentation.index_of(next).is_some() {
                self.host.set_highlight(next, true);
                self.selected = Some(next);
            }
        }
    }
}

/// One read-modify-write persistence cycle.
///
/// Fetch the field, lift out the envelope (an absent or corrupt block means
/// the whole text is envelope), re-encode with `payload` in place of whatever
/// block was there, write back. No transactional guarantee: a concurrent
/// external edit between fetch and write is overwritten.
pub async fn persist<F>(field: &F, payload: &Payload) -> Result<(), SyncError>
where
    F: ReviewField + ?Sized,
{
    let text = field.fetch_text().await?;
    let envelope = match codec::decode(&text) {
        Some(decoded) => decoded.envelope,
        None => text,
    };
    let updated = codec::encode(&envelope, payload)?;
    field.write_text(&updated).await?;
    Ok(())
}
