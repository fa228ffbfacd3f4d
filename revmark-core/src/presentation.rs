//! The ordered, authoritative annotation collection and its change feed.
//!
//! `Presentation` is the single source of truth for one review session. Every
//! consumer — view reconciliation, persistence — reacts to the same typed
//! change notifications rather than diffing collection state themselves.
//!
//! Notifications ride a `tokio::sync::mpsc` unbounded channel, one receiver
//! per subscriber. Each mutating operation sends at most one event, and the
//! send completes before the operation returns, so a consumer that drains its
//! feed immediately after calling a mutation observes the full delta within
//! the same logical turn. Unbounded is appropriate here for the same reason
//! as the input event bus: producers run at user-action rate and consumers
//! drain every turn.

use tokio::sync::mpsc;

use crate::payload::Payload;
use crate::types::{Annotation, VisualId};

/// Flat description of one mutation's delta.
///
/// Not a diff against internally retained prior state — the Presentation
/// keeps none. Consumers must be idempotent against redundant notifications
/// (an `added` entry for an annotation whose view already exists means
/// "update in place").
#[derive(Debug, Clone, Default)]
pub struct ChangeEvent {
    /// Annotations added or overwritten by this mutation.
    pub added: Vec<Annotation>,
    /// Annotations removed by this mutation.
    pub removed: Vec<Annotation>,
}

/// Receiving half of a change subscription.
pub type ChangeFeed = mpsc::UnboundedReceiver<ChangeEvent>;

/// Ordered collection of annotations, unique by id.
///
/// Order is significant: it drives both the sidebar display order and the
/// order of records in the persisted payload. Insertion order is preserved
/// except across an explicit [`move_to`](Presentation::move_to).
#[derive(Debug, Default)]
pub struct Presentation {
    visuals: Vec<Annotation>,
    subscribers: Vec<mpsc::UnboundedSender<ChangeEvent>>,
}

impl Presentation {
    /// Creates an empty presentation with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a change listener and returns its feed.
    ///
    /// Subscribe before mutating: events sent while nobody listens are gone.
    pub fn subscribe(&mut self) -> ChangeFeed {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    /// Sends `event` to every live subscriber, pruning closed ones.
    fn notify(&mut self, event: ChangeEvent) {
        self.subscribers
            .retain(|tx| tx.send(event.clone()).is_ok());
    }

    /// Adds `visual`, or overwrites the text of the annotation already
    /// holding its id.
    ///
    /// The replace case keeps the annotation's position; the add case
    /// appends. Either way one notification fires with `added = [visual]`,
    /// so consumers treat "already on screen" as update-in-place.
    pub fn add_or_replace(&mut self, visual: Annotation) {
        match self.visuals.iter_mut().find(|v| v.id == visual.id) {
            Some(existing) => existing.text = visual.text.clone(),
            None => self.visuals.push(visual.clone()),
        }
        self.notify(ChangeEvent {
            added: vec![visual],
            removed: Vec::new(),
        });
    }

    /// Removes the annotation with `id`, notifying `removed = [it]`.
    ///
    /// Silent no-op when the id is absent — no notification fires.
    pub fn remove(&mut self, id: VisualId) {
        let Some(index) = self.index_of(id) else {
            return;
        };
        let removed = self.visuals.remove(index);
        self.notify(ChangeEvent {
            added: Vec::new(),
            removed: vec![removed],
        });
    }

    /// Moves the annotation with `id` to `position`, clamped to the valid
    /// insertion range. Relative order of all other annotations is preserved.
    ///
    /// Deliberately emits no generic change notification: reorder is a pure
    /// ordering concern and the sidebar-originated move path updates the view
    /// directly. Content consumers never see the annotation change because it
    /// doesn't — same id, same text, same context.
    pub fn move_to(&mut self, id: VisualId, position: usize) {
        let Some(from) = self.index_of(id) else {
            return;
        };
        let visual = self.visuals.remove(from);
        let to = position.min(self.visuals.len());
        self.visuals.insert(to, visual);
    }

    /// Removes every annotation in one notification (`removed = all`).
    ///
    /// Fires even when already empty — the import teardown path counts on
    /// exactly one event per call, and consumers are idempotent by contract.
    pub fn remove_all(&mut self) {
        let removed = std::mem::take(&mut self.visuals);
        self.notify(ChangeEvent {
            added: Vec::new(),
            removed,
        });
    }

    /// Replaces the whole sequence with the annotations `payload` encodes,
    /// in payload order, ids trusted as-is.
    ///
    /// One notification fires with `added = all new annotations`. The caller
    /// must have torn down the previous session first (`remove_all` on the
    /// outgoing presentation, its notification fully processed) and must have
    /// reseeded the id allocator from this payload before constructing any
    /// further annotations.
    pub fn import(&mut self, payload: Payload) {
        let added = payload.into_visuals();
        self.visuals = added.clone();
        self.notify(ChangeEvent {
            added,
            removed: Vec::new(),
        });
    }

    /// Serializes the current sequence into the shape [`import`] accepts.
    ///
    /// `import(export())` reproduces the same ids, contexts, text, and order.
    ///
    /// [`import`]: Presentation::import
    pub fn export(&self) -> Payload {
        Payload::from_visuals(&self.visuals)
    }

    /// Current position of `id`, or `None` when absent.
    pub fn index_of(&self, id: VisualId) -> Option<usize> {
        self.visuals.iter().position(|v| v.id == id)
    }

    /// The annotation with `id`, or `None` when absent.
    pub fn get(&self, id: VisualId) -> Option<&Annotation> {
        self.visuals.iter().find(|v| v.id == id)
    }

    pub fn len(&self) -> usize {
        self.visuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visuals.is_empty()
    }

    /// Annotations in display order.
    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.visuals.iter()
    }
}
