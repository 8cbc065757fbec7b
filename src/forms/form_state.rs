//! Form state management: field registry and mutation state machine

use super::field::{Field, FieldSpec, FieldValue};
use super::observer::{FormEvent, FormObserver, SubscriptionId};
use crate::config::FormConfig;
use crate::error::FormResult;
use indexmap::IndexMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::Instrument;
use uuid::Uuid;

/// Per-field bookkeeping
#[derive(Debug)]
struct FieldSlot<T> {
    /// Snapshot taken at registration, restored by reset and clear
    initial: Field<T>,
    current: Field<T>,
    touched: bool,
    error: Option<String>,
    /// Write generation; a validation result is kept only if it is unchanged
    revision: u64,
}

/// A validation launched against a snapshot of a field
struct ValidationJob<T> {
    field: Field<T>,
    revision: u64,
}

struct Registry<T> {
    slots: IndexMap<String, FieldSlot<T>>,
    observers: Vec<(SubscriptionId, Arc<dyn FormObserver>)>,
    next_subscription: u64,
}

impl<T: FieldValue> Registry<T> {
    /// Bump the field's revision and snapshot it for validation
    fn launch(&mut self, key: &str) -> Option<ValidationJob<T>> {
        let slot = self.slots.get_mut(key)?;
        slot.revision += 1;
        Some(ValidationJob {
            field: slot.current.clone(),
            revision: slot.revision,
        })
    }

    fn restore_initial(&mut self) {
        for slot in self.slots.values_mut() {
            slot.current = slot.initial.clone();
            slot.touched = false;
            slot.revision += 1;
        }
    }
}

struct Shared<T> {
    id: Uuid,
    config: FormConfig,
    registry: Mutex<Registry<T>>,
}

/// Validations spawned by a mutation.
///
/// Mutations never wait for their validations. Await [`settled`](Self::settled)
/// to wait for them; dropping the handle leaves them running.
#[derive(Debug, Default)]
pub struct PendingValidation {
    handle: Option<JoinHandle<()>>,
}

impl PendingValidation {
    /// Whether any validation was spawned
    pub fn is_pending(&self) -> bool {
        self.handle.is_some()
    }

    /// Wait until the spawned validations have written their results
    pub async fn settled(self) {
        if let Some(handle) = self.handle {
            if let Err(e) = handle.await {
                tracing::warn!("Validation task failed: {e}");
            }
        }
    }
}

/// A set of named fields with their values, touched flags and errors.
///
/// `Form` is a cheap handle; clones share the same state. Fields are kept in
/// registration order. Operations that trigger validation spawn it onto the
/// current tokio runtime and return immediately.
pub struct Form<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for Form<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T: FieldValue> Default for Form<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: FieldValue> Form<T> {
    pub fn new() -> Self {
        Self::with_config(FormConfig::default())
    }

    /// Create an empty form using the given generic messages
    pub fn with_config(config: FormConfig) -> Self {
        Self {
            shared: Arc::new(Shared {
                id: Uuid::new_v4(),
                config,
                registry: Mutex::new(Registry {
                    slots: IndexMap::new(),
                    observers: Vec::new(),
                    next_subscription: 0,
                }),
            }),
        }
    }

    /// Build a form from field specs, registering them in order
    pub fn from_specs(specs: impl IntoIterator<Item = FieldSpec<T>>) -> FormResult<Self> {
        Self::from_specs_with_config(specs, FormConfig::default())
    }

    pub fn from_specs_with_config(
        specs: impl IntoIterator<Item = FieldSpec<T>>,
        config: FormConfig,
    ) -> FormResult<Self> {
        let form = Self::with_config(config);
        for spec in specs {
            form.register(spec, false)?;
        }
        Ok(form)
    }

    fn registry(&self) -> MutexGuard<'_, Registry<T>> {
        self.shared
            .registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Unique id of this form, usable as a render key
    pub fn id(&self) -> Uuid {
        self.shared.id
    }

    pub fn config(&self) -> &FormConfig {
        &self.shared.config
    }

    // ---- Field registry ----

    /// Register a field and return it.
    ///
    /// Registering a key that already exists changes nothing and returns the
    /// live field. Unless `skip_initial_validation` is set, the initial value
    /// is validated in the background.
    pub fn register(
        &self,
        spec: FieldSpec<T>,
        skip_initial_validation: bool,
    ) -> FormResult<Field<T>> {
        let field = spec.into_field()?;
        let key = field.key.clone();

        let job = {
            let mut registry = self.registry();
            if let Some(slot) = registry.slots.get(&key) {
                tracing::debug!("Field {key} already registered on form {}", self.id());
                return Ok(slot.current.clone());
            }
            registry.slots.insert(
                key.clone(),
                FieldSlot {
                    initial: field.clone(),
                    current: field.clone(),
                    touched: false,
                    error: None,
                    revision: 0,
                },
            );
            if skip_initial_validation {
                None
            } else {
                registry.launch(&key)
            }
        };

        tracing::debug!("Registered field {key} on form {}", self.id());
        self.emit(FormEvent::Registered { key });
        if let Some(job) = job {
            self.spawn_validation(vec![job]);
        }
        Ok(field)
    }

    /// Registered keys in registration order
    pub fn keys(&self) -> Vec<String> {
        self.registry().slots.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.registry().slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry().slots.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.registry().slots.contains_key(key)
    }

    /// The live field for a key
    pub fn field(&self, key: &str) -> Option<Field<T>> {
        self.registry()
            .slots
            .get(key)
            .map(|slot| slot.current.clone())
    }

    /// The snapshot taken when the key was registered
    pub fn initial(&self, key: &str) -> Option<Field<T>> {
        self.registry()
            .slots
            .get(key)
            .map(|slot| slot.initial.clone())
    }

    pub fn value(&self, key: &str) -> Option<T> {
        self.registry()
            .slots
            .get(key)
            .map(|slot| slot.current.value.clone())
    }

    // ---- Mutations ----

    /// Set values for the given keys and mark them touched.
    ///
    /// Unknown keys are ignored. Unless `skip_validation` is set, the changed
    /// fields are revalidated in the background, in the order given.
    pub fn update<I, K>(&self, changes: I, skip_validation: bool) -> PendingValidation
    where
        I: IntoIterator<Item = (K, T)>,
        K: AsRef<str>,
    {
        // Collect first; a lazy iterator may read this form
        let changes: Vec<(K, T)> = changes.into_iter().collect();
        let (keys, jobs) = {
            let mut registry = self.registry();
            let mut keys: Vec<String> = Vec::new();
            for (key, value) in changes {
                let key = key.as_ref();
                let Some(slot) = registry.slots.get_mut(key) else {
                    tracing::debug!("Ignoring update for unregistered field {key}");
                    continue;
                };
                slot.current.value = value;
                slot.touched = true;
                slot.revision += 1;
                if !keys.iter().any(|k| k == key) {
                    keys.push(key.to_string());
                }
            }

            let jobs: Vec<ValidationJob<T>> = if skip_validation {
                Vec::new()
            } else {
                keys.iter().filter_map(|key| registry.launch(key)).collect()
            };
            (keys, jobs)
        };

        if keys.is_empty() {
            return PendingValidation::default();
        }

        self.emit(FormEvent::Updated { keys });
        self.spawn_validation(jobs)
    }

    /// Set a single value; shorthand for a one-entry [`update`](Self::update)
    pub fn set(&self, key: &str, value: T) -> PendingValidation {
        self.update([(key, value)], false)
    }

    /// Restore initial values and clear touched flags and errors.
    ///
    /// Errors are not recomputed, so the form reads as valid until the next
    /// [`validate`](Self::validate). In-flight validations are discarded.
    pub fn reset(&self) {
        {
            let mut registry = self.registry();
            registry.restore_initial();
            for slot in registry.slots.values_mut() {
                slot.error = None;
            }
        }

        tracing::debug!("Reset form {}", self.id());
        self.emit(FormEvent::Reset);
    }

    /// Restore initial values, clear touched flags and revalidate every field
    /// against its restored value.
    pub fn clear(&self) -> PendingValidation {
        let jobs = {
            let mut registry = self.registry();
            registry.restore_initial();
            let keys: Vec<String> = registry.slots.keys().cloned().collect();
            let jobs: Vec<ValidationJob<T>> =
                keys.iter().filter_map(|key| registry.launch(key)).collect();
            jobs
        };

        tracing::debug!("Cleared form {}", self.id());
        self.emit(FormEvent::Cleared);
        self.spawn_validation(jobs)
    }

    pub fn untouch(&self, key: &str) {
        let found = {
            let mut registry = self.registry();
            match registry.slots.get_mut(key) {
                Some(slot) => {
                    slot.touched = false;
                    true
                }
                None => false,
            }
        };

        if found {
            self.emit(FormEvent::Untouched {
                keys: vec![key.to_string()],
            });
        }
    }

    pub fn untouch_all(&self) {
        let keys = {
            let mut registry = self.registry();
            for slot in registry.slots.values_mut() {
                slot.touched = false;
            }
            registry.slots.keys().cloned().collect::<Vec<_>>()
        };

        self.emit(FormEvent::Untouched { keys });
    }

    // ---- Validation ----

    /// Revalidate every field, one at a time in registration order
    pub async fn validate(&self) {
        for key in self.keys() {
            self.validate_field(&key).await;
        }
    }

    /// Revalidate one field's current value and store the result.
    ///
    /// Returns the error stored for the field afterwards; `None` for an
    /// unknown key. A result overtaken by a newer change is not stored, and
    /// the newer stored error is returned instead.
    pub async fn validate_field(&self, key: &str) -> Option<String> {
        let job = {
            let mut registry = self.registry();
            registry.launch(key)
        }?;
        self.run(job).await
    }

    async fn run(&self, job: ValidationJob<T>) -> Option<String> {
        let error = job.field.validate(&self.shared.config).await;
        if self.commit(&job.field.key, job.revision, error.clone()) {
            error
        } else {
            self.error(&job.field.key)
        }
    }

    /// Write a result unless the field changed since the validation started
    fn commit(&self, key: &str, revision: u64, error: Option<String>) -> bool {
        {
            let mut registry = self.registry();
            let Some(slot) = registry.slots.get_mut(key) else {
                return false;
            };
            if slot.revision != revision {
                tracing::debug!(
                    "Discarding stale validation of {key} (revision {revision}, current {})",
                    slot.revision
                );
                return false;
            }
            slot.error = error.clone();
        }

        self.emit(FormEvent::Validated {
            key: key.to_string(),
            error,
        });
        true
    }

    fn spawn_validation(&self, jobs: Vec<ValidationJob<T>>) -> PendingValidation {
        if jobs.is_empty() {
            return PendingValidation::default();
        }

        let runtime = match Handle::try_current() {
            Ok(runtime) => runtime,
            Err(_) => {
                tracing::warn!(
                    "No tokio runtime; skipping validation of {} field(s) on form {}",
                    jobs.len(),
                    self.id()
                );
                return PendingValidation::default();
            }
        };

        let form = self.clone();
        let span = tracing::debug_span!("validation", form = %self.id());
        let handle = runtime.spawn(
            async move {
                for job in jobs {
                    form.run(job).await;
                }
            }
            .instrument(span),
        );

        PendingValidation {
            handle: Some(handle),
        }
    }

    // ---- Derived state ----

    /// Error of every field in registration order; `None` means no error
    pub fn errors(&self) -> IndexMap<String, Option<String>> {
        self.registry()
            .slots
            .iter()
            .map(|(key, slot)| (key.clone(), slot.error.clone()))
            .collect()
    }

    pub fn error(&self, key: &str) -> Option<String> {
        self.registry()
            .slots
            .get(key)
            .and_then(|slot| slot.error.clone())
    }

    /// Touched flag of every field in registration order
    pub fn touched(&self) -> IndexMap<String, bool> {
        self.registry()
            .slots
            .iter()
            .map(|(key, slot)| (key.clone(), slot.touched))
            .collect()
    }

    pub fn is_touched(&self, key: &str) -> bool {
        self.registry()
            .slots
            .get(key)
            .is_some_and(|slot| slot.touched)
    }

    pub fn any_touched(&self) -> bool {
        self.registry().slots.values().any(|slot| slot.touched)
    }

    /// True when no field holds an error. Reads the last computed errors
    /// without validating.
    pub fn is_valid(&self) -> bool {
        self.registry()
            .slots
            .values()
            .all(|slot| slot.error.is_none())
    }

    // ---- Observers ----

    pub fn subscribe(&self, observer: Arc<dyn FormObserver>) -> SubscriptionId {
        let mut registry = self.registry();
        registry.next_subscription += 1;
        let id = SubscriptionId(registry.next_subscription);
        registry.observers.push((id, observer));
        id
    }

    /// Remove an observer; returns false if it was not subscribed
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut registry = self.registry();
        let before = registry.observers.len();
        registry.observers.retain(|(existing, _)| *existing != id);
        registry.observers.len() != before
    }

    fn emit(&self, event: FormEvent) {
        let observers: Vec<Arc<dyn FormObserver>> = self
            .registry()
            .observers
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect();
        for observer in observers {
            observer.notify(&event);
        }
    }
}

impl<T: FieldValue + std::fmt::Debug> std::fmt::Debug for Form<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let registry = self.registry();
        f.debug_struct("Form")
            .field("id", &self.shared.id)
            .field("fields", &registry.slots)
            .finish()
    }
}
