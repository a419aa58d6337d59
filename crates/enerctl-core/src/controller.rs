// ── Resource controller ──
//
// Owns the list / draft / editor / status state for one entity type and
// drives the fetch, edit, validate, submit, refresh cycle. State lives in
// a `watch` channel so any number of views can follow it.
//
// Network operations are single-flight: while one is outstanding, another
// is turned away with `Outcome::Busy`. Every request races the
// controller's cancellation token, so a response that lands after
// `shutdown()` is dropped without touching state.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use enerctl_api::ApiClient;
use serde_json::Value;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{CoreError, ErrorKind};
use crate::model::EntityId;
use crate::normalize::decode_items;
use crate::resource::Resource;

// ── Status ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Error,
}

/// Transient feedback shown above the list until dismissed or replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
    /// What went wrong, for error messages raised by a failed request
    /// or validation.
    pub cause: Option<ErrorKind>,
}

impl StatusMessage {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Success,
            text: text.into(),
            cause: None,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            text: text.into(),
            cause: None,
        }
    }

    /// Error status for `err`: the backend's message if it sent one,
    /// otherwise `fallback`.
    pub fn failure(err: &CoreError, fallback: &str) -> Self {
        Self {
            kind: StatusKind::Error,
            text: err.status_text(fallback),
            cause: Some(err.kind()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == StatusKind::Error
    }
}

// ── State ───────────────────────────────────────────────────────────

/// Everything a view needs to render one resource screen.
#[derive(Debug, Clone)]
pub struct ResourceState<T> {
    /// Last successfully fetched collection.
    pub items: Vec<T>,
    /// Record being created or edited.
    pub draft: T,
    /// Set while editing an existing record; `None` means create.
    pub editing_id: Option<EntityId>,
    pub editor_open: bool,
    /// A network operation is outstanding.
    pub loading: bool,
    pub status: Option<StatusMessage>,
}

impl<T: Default> Default for ResourceState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            draft: T::default(),
            editing_id: None,
            editor_open: false,
            loading: false,
            status: None,
        }
    }
}

impl<T> ResourceState<T> {
    pub fn is_editing(&self) -> bool {
        self.editing_id.is_some()
    }
}

/// How an operation ended. Failures are already reflected in the
/// state's status message; the outcome lets callers pick an exit path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Done,
    /// Required fields were blank; nothing was sent.
    Invalid,
    /// The backend or transport rejected the request.
    Failed,
    /// Another operation was still in flight; nothing was sent.
    Busy,
    /// The controller shut down before the response arrived.
    Cancelled,
}

impl Outcome {
    pub fn is_done(self) -> bool {
        self == Self::Done
    }
}

// ── Controller ──────────────────────────────────────────────────────

/// Generic CRUD controller for one [`Resource`] collection.
///
/// Cheaply cloneable via `Arc`.
pub struct ResourceController<T: Resource> {
    inner: Arc<Inner<T>>,
}

impl<T: Resource> Clone for ResourceController<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct Inner<T: Resource> {
    api: ApiClient,
    state: watch::Sender<Arc<ResourceState<T>>>,
    in_flight: AtomicBool,
    cancel: CancellationToken,
}

/// Held for the lifetime of one network operation. Dropping it clears
/// the loading flag and releases the single-flight slot, whatever path
/// the operation took out.
struct FlightGuard<'a, T: Resource> {
    inner: &'a Inner<T>,
}

impl<T: Resource> Drop for FlightGuard<'_, T> {
    fn drop(&mut self) {
        self.inner
            .state
            .send_modify(|s| Arc::make_mut(s).loading = false);
        self.inner.in_flight.store(false, Ordering::Release);
    }
}

impl<T: Resource> ResourceController<T> {
    /// Build a controller over `api`. `cancel` is usually a child of the
    /// console-wide token so one shutdown stops every controller.
    pub fn new(api: ApiClient, cancel: CancellationToken) -> Self {
        let (state, _) = watch::channel(Arc::new(ResourceState::default()));
        Self {
            inner: Arc::new(Inner {
                api,
                state,
                in_flight: AtomicBool::new(false),
                cancel,
            }),
        }
    }

    // ── Observation ──────────────────────────────────────────────────

    /// Follow state changes.
    pub fn subscribe(&self) -> watch::Receiver<Arc<ResourceState<T>>> {
        self.inner.state.subscribe()
    }

    /// Current state.
    pub fn snapshot(&self) -> Arc<ResourceState<T>> {
        Arc::clone(&self.inner.state.borrow())
    }

    /// Look up a loaded item by id.
    pub fn find(&self, id: &EntityId) -> Option<T> {
        self.inner
            .state
            .borrow()
            .items
            .iter()
            .find(|item| item.id() == Some(id))
            .cloned()
    }

    pub fn is_shut_down(&self) -> bool {
        self.inner.cancel.is_cancelled()
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Initial load when a view mounts.
    pub async fn activate(&self) -> Outcome {
        debug!(resource = T::PLURAL, "activating");
        self.refresh().await
    }

    /// Stop all outstanding and future network work. Responses that
    /// arrive afterwards are discarded.
    pub fn shutdown(&self) {
        self.inner.cancel.cancel();
    }

    // ── Network operations ───────────────────────────────────────────

    /// Reload the collection. On failure the list is cleared and an
    /// error status is set.
    pub async fn refresh(&self) -> Outcome {
        let Some(_guard) = self.begin() else {
            return self.rejected_outcome();
        };
        self.load_items().await
    }

    /// Validate the draft and send it: PUT when editing, POST otherwise.
    ///
    /// On success the collection is reloaded and the editor closed with a
    /// fresh draft. On failure the editor stays open with the draft
    /// intact so the operator can correct and retry.
    pub async fn submit(&self) -> Outcome {
        let (draft, editing_id) = {
            let state = self.inner.state.borrow();
            (state.draft.clone(), state.editing_id.clone())
        };

        let missing = draft.missing_fields();
        if !missing.is_empty() {
            let names: Vec<&str> = missing.iter().map(|f| T::field_label(*f)).collect();
            debug!(resource = T::SINGULAR, ?missing, "draft incomplete");
            self.set_status(StatusMessage {
                cause: Some(ErrorKind::Validation),
                ..StatusMessage::error(format!(
                    "Fill in all required fields: {}.",
                    names.join(", ")
                ))
            });
            return Outcome::Invalid;
        }

        let Some(_guard) = self.begin() else {
            return self.rejected_outcome();
        };

        let api = &self.inner.api;
        let result = match &editing_id {
            Some(id) => {
                self.race(api.put_item::<Value, _>(T::COLLECTION, &id.to_string(), &draft))
                    .await
            }
            None => self.race(api.post::<Value, _>(T::COLLECTION, &draft)).await,
        };
        let Some(result) = result else {
            return Outcome::Cancelled;
        };

        match result {
            Ok(_) => {
                let verb = if editing_id.is_some() { "updated" } else { "created" };
                info!(resource = T::SINGULAR, id = ?editing_id, "{verb}");
                self.set_status(StatusMessage::success(format!(
                    "{} {verb} successfully.",
                    T::TITLE
                )));

                if self.load_items().await == Outcome::Cancelled {
                    return Outcome::Cancelled;
                }
                self.update(|s| {
                    s.editor_open = false;
                    s.editing_id = None;
                    s.draft = T::default();
                });
                Outcome::Done
            }
            Err(e) => {
                let err = CoreError::from(e);
                warn!(resource = T::SINGULAR, error = %err, "save failed");
                self.set_status(StatusMessage::failure(
                    &err,
                    &format!("Failed to save {}.", T::SINGULAR),
                ));
                Outcome::Failed
            }
        }
    }

    /// Delete one record and reload the collection.
    ///
    /// Confirmation is the caller's job; by the time this runs the
    /// operator has already agreed.
    pub async fn remove(&self, id: &EntityId) -> Outcome {
        let Some(_guard) = self.begin() else {
            return self.rejected_outcome();
        };

        let id_segment = id.to_string();
        let delete = self.inner.api.delete_item(T::COLLECTION, &id_segment);
        let Some(result) = self.race(delete).await else {
            return Outcome::Cancelled;
        };

        match result {
            Ok(()) => {
                info!(resource = T::SINGULAR, %id, "deleted");
                self.set_status(StatusMessage::success(format!(
                    "{} deleted successfully.",
                    T::TITLE
                )));
                match self.load_items().await {
                    Outcome::Cancelled => Outcome::Cancelled,
                    _ => Outcome::Done,
                }
            }
            Err(e) => {
                let err = CoreError::from(e);
                warn!(resource = T::SINGULAR, %id, error = %err, "delete failed");
                self.set_status(StatusMessage::failure(
                    &err,
                    &format!("Failed to delete {}.", T::SINGULAR),
                ));
                Outcome::Failed
            }
        }
    }

    // ── Editor ───────────────────────────────────────────────────────

    /// Open the editor on a blank draft.
    pub fn open_create_editor(&self) {
        self.update(|s| {
            s.draft = T::default();
            s.editing_id = None;
            s.editor_open = true;
        });
    }

    /// Open the editor on a copy of `item`.
    pub fn open_edit_editor(&self, item: &T) {
        let item = item.clone();
        self.update(|s| {
            s.editing_id = item.id().cloned();
            s.draft = item;
            s.editor_open = true;
        });
    }

    /// Overwrite one draft field.
    pub fn update_draft_field(&self, field: T::Field, value: &str) -> Result<(), CoreError> {
        let mut result = Ok(());
        self.update(|s| result = s.draft.set_field(field, value));
        result
    }

    /// Close the editor and discard the draft.
    pub fn close_editor(&self) {
        self.update(|s| {
            s.editor_open = false;
            s.editing_id = None;
            s.draft = T::default();
        });
    }

    pub fn dismiss_status(&self) {
        self.update(|s| s.status = None);
    }

    // ── Internals ────────────────────────────────────────────────────

    fn update(&self, f: impl FnOnce(&mut ResourceState<T>)) {
        self.inner.state.send_modify(|s| f(Arc::make_mut(s)));
    }

    fn set_status(&self, status: StatusMessage) {
        self.update(|s| s.status = Some(status));
    }

    /// Claim the single-flight slot and raise the loading flag.
    fn begin(&self) -> Option<FlightGuard<'_, T>> {
        if self.inner.cancel.is_cancelled() {
            return None;
        }
        self.inner
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        self.update(|s| s.loading = true);
        Some(FlightGuard { inner: &self.inner })
    }

    fn rejected_outcome(&self) -> Outcome {
        if self.inner.cancel.is_cancelled() {
            Outcome::Cancelled
        } else {
            debug!(resource = T::PLURAL, "operation already in flight");
            Outcome::Busy
        }
    }

    /// Run `fut` unless the controller shuts down first.
    async fn race<F, R>(&self, fut: F) -> Option<R>
    where
        F: Future<Output = R>,
    {
        tokio::select! {
            biased;
            () = self.inner.cancel.cancelled() => None,
            result = fut => Some(result),
        }
    }

    /// Fetch and publish the collection. Caller holds the flight guard.
    async fn load_items(&self) -> Outcome {
        let Some(result) = self.race(self.inner.api.get::<Value>(T::COLLECTION)).await else {
            return Outcome::Cancelled;
        };

        match result {
            Ok(body) => {
                let items: Vec<T> = decode_items(body, T::EMBEDDED_KEY);
                debug!(resource = T::PLURAL, count = items.len(), "collection loaded");
                self.update(|s| s.items = items);
                Outcome::Done
            }
            Err(e) => {
                let err = CoreError::from(e);
                warn!(resource = T::PLURAL, error = %err, "load failed");
                self.update(|s| {
                    s.items.clear();
                    s.status = Some(StatusMessage::failure(
                        &err,
                        &format!("Failed to load {}.", T::PLURAL),
                    ));
                });
                Outcome::Failed
            }
        }
    }
}
