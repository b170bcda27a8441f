// src/forms/mod.rs
//! Create / update / view / delete modals. Each one validates before it
//! touches the network, reports through the notifier and tells its listener
//! when it succeeded.

pub mod modal;
pub mod reference;
pub mod schema;

use serde_json::{Map, Value};
use std::sync::Arc;
use validator::Validate;

use crate::entities::{Entity, EntityKind};
use crate::error::{ClientError, ClientResult};
use crate::gateway::{unwrap_data, Gateway};
use crate::notify::Notifier;
use crate::status::status_badge;
use crate::table::cell_text;
use crate::validator::validate_values;

pub use modal::{ModalKind, ModalListener, ModalPhase, NoopListener};
pub use reference::{load_references, RefOption, ReferenceData};
pub use schema::{FieldKind, FieldSpec, FormSchema};

// ==================== SHARED MODAL PLUMBING ====================

struct ModalCore<T: Entity> {
    gateway: Gateway<T>,
    notifier: Arc<dyn Notifier>,
    listener: Arc<dyn ModalListener>,
    phase: ModalPhase,
}

impl<T: Entity> ModalCore<T> {
    fn new(gateway: Gateway<T>, notifier: Arc<dyn Notifier>, listener: Arc<dyn ModalListener>) -> Self {
        Self { gateway, notifier, listener, phase: ModalPhase::Closed }
    }

    fn ensure_ready(&self) -> ClientResult<()> {
        if self.phase.can_submit() {
            Ok(())
        } else {
            Err(ClientError::validation("The form is not ready"))
        }
    }

    fn close(&mut self) {
        if self.phase.is_open() {
            self.phase = ModalPhase::Closed;
            self.listener.on_close();
        }
    }

    /// Toast, listener, close: in that order.
    async fn succeed(&mut self, kind: ModalKind, message: String) {
        self.notifier.success(&message);
        self.listener.on_success(kind).await;
        self.close();
    }

    fn fail(&mut self, err: ClientError) -> ClientError {
        tracing::warn!("{} submit failed: {}", T::KIND.label(), err);
        self.phase = ModalPhase::Ready;
        self.notifier.error(&err.user_message());
        err
    }

    /// Record passed by the caller, or the detail endpoint when there is none.
    async fn load_record(&self, id: i64, record: Option<&T>) -> ClientResult<Map<String, Value>> {
        let value = match record {
            Some(record) => serde_json::to_value(record)?,
            None => unwrap_data(self.gateway.get_detail(id).await?),
        };
        match value {
            Value::Object(map) => Ok(map),
            _ => Err(ClientError::not_found(T::KIND.label(), id)),
        }
    }
}

/// Schema checks first (one aggregate message), then the typed draft's own rules.
fn prepare_draft<T: Entity>(values: &Map<String, Value>, modal: ModalKind) -> ClientResult<T::Draft> {
    let config = T::config();
    let result = validate_values(&config.form, values, modal);
    if !result.is_valid() {
        return Err(result.to_client_error());
    }

    let draft: T::Draft = serde_json::from_value(Value::Object(values.clone()))
        .map_err(|e| ClientError::validation(format!("Invalid form data: {}", e)))?;
    draft.validate()?;
    Ok(draft)
}

fn set_field(
    schema: &FormSchema,
    values: &mut Map<String, Value>,
    key: &str,
    value: Value,
) -> ClientResult<()> {
    if schema.field(key).is_none() {
        return Err(ClientError::validation(format!("Unknown field '{}'", key)));
    }
    values.insert(key.to_string(), value);
    Ok(())
}

// ==================== CREATE ====================

pub struct CreateForm<T: Entity> {
    core: ModalCore<T>,
    values: Map<String, Value>,
    references: ReferenceData,
}

impl<T: Entity> CreateForm<T> {
    pub fn new(gateway: Gateway<T>, notifier: Arc<dyn Notifier>, listener: Arc<dyn ModalListener>) -> Self {
        Self {
            core: ModalCore::new(gateway, notifier, listener),
            values: Map::new(),
            references: ReferenceData::default(),
        }
    }

    pub fn phase(&self) -> ModalPhase {
        self.core.phase
    }

    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    pub fn references(&self) -> &ReferenceData {
        &self.references
    }

    pub fn options(&self, kind: EntityKind) -> &[RefOption] {
        self.references.options(kind)
    }

    pub async fn open(&mut self) {
        self.core.phase = ModalPhase::Loading;
        let schema = self.core.gateway.config().form.clone();
        self.values = schema.blank_values();
        self.references = load_references(
            self.core.gateway.resource().transport(),
            &schema.references(),
            self.core.notifier.as_ref(),
        )
        .await;
        self.core.phase = ModalPhase::Ready;
    }

    pub fn set(&mut self, key: &str, value: Value) -> ClientResult<()> {
        set_field(&self.core.gateway.config().form, &mut self.values, key, value)
    }

    /// Same as `set`, from text typed by the user.
    pub fn set_input(&mut self, key: &str, raw: &str) -> ClientResult<()> {
        let value = self.core.gateway.config().form.parse_input(key, raw)?;
        self.set(key, value)
    }

    pub async fn submit(&mut self) -> ClientResult<()> {
        self.core.ensure_ready()?;

        let draft = match prepare_draft::<T>(&self.values, ModalKind::Create) {
            Ok(draft) => draft,
            Err(err) => {
                self.core.notifier.error(&err.user_message());
                return Err(err);
            }
        };

        self.core.phase = ModalPhase::Submitting;
        tracing::debug!("Creating {}", T::KIND.label());
        match self.core.gateway.create(&draft).await {
            Ok(_) => {
                let message = format!("{} created successfully", T::KIND.label());
                self.core.succeed(ModalKind::Create, message).await;
                Ok(())
            }
            Err(err) => Err(self.core.fail(err)),
        }
    }

    pub fn close(&mut self) {
        self.core.close();
    }
}

// ==================== UPDATE ====================

pub struct UpdateForm<T: Entity> {
    core: ModalCore<T>,
    id: i64,
    original: Map<String, Value>,
    values: Map<String, Value>,
    references: ReferenceData,
}

impl<T: Entity> UpdateForm<T> {
    pub fn new(gateway: Gateway<T>, notifier: Arc<dyn Notifier>, listener: Arc<dyn ModalListener>) -> Self {
        Self {
            core: ModalCore::new(gateway, notifier, listener),
            id: 0,
            original: Map::new(),
            values: Map::new(),
            references: ReferenceData::default(),
        }
    }

    pub fn phase(&self) -> ModalPhase {
        self.core.phase
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    pub fn references(&self) -> &ReferenceData {
        &self.references
    }

    /// Keys whose value differs from the loaded record.
    pub fn changed_fields(&self) -> Vec<&str> {
        self.values
            .iter()
            .filter(|(key, value)| self.original.get(key.as_str()) != Some(*value))
            .map(|(key, _)| key.as_str())
            .collect()
    }

    /// Loads the record and the dropdown lists side by side. If the record
    /// cannot be loaded the modal closes again.
    pub async fn open(&mut self, id: i64, record: Option<&T>) -> ClientResult<()> {
        self.core.phase = ModalPhase::Loading;
        self.id = id;

        let schema = self.core.gateway.config().form.clone();
        let kinds = schema.references();
        let (loaded, references) = futures::join!(
            self.core.load_record(id, record),
            load_references(
                self.core.gateway.resource().transport(),
                &kinds,
                self.core.notifier.as_ref(),
            )
        );
        self.references = references;

        match loaded {
            Ok(values) => {
                self.original = values.clone();
                self.values = values;
                self.core.phase = ModalPhase::Ready;
                Ok(())
            }
            Err(err) => {
                tracing::warn!("Failed to load {} {}: {}", T::KIND.label(), id, err);
                self.core.notifier.error(&err.user_message());
                self.core.close();
                Err(err)
            }
        }
    }

    pub fn set(&mut self, key: &str, value: Value) -> ClientResult<()> {
        set_field(&self.core.gateway.config().form, &mut self.values, key, value)
    }

    pub fn set_input(&mut self, key: &str, raw: &str) -> ClientResult<()> {
        let value = self.core.gateway.config().form.parse_input(key, raw)?;
        self.set(key, value)
    }

    /// Sends the whole merged record, so fields the form never showed keep
    /// their loaded values.
    pub async fn submit(&mut self) -> ClientResult<()> {
        self.core.ensure_ready()?;

        if let Err(err) = prepare_draft::<T>(&self.values, ModalKind::Update) {
            self.core.notifier.error(&err.user_message());
            return Err(err);
        }

        self.core.phase = ModalPhase::Submitting;
        tracing::debug!(
            "Updating {} {} ({} changed fields)",
            T::KIND.label(),
            self.id,
            self.changed_fields().len()
        );
        let body = Value::Object(self.body());
        match self.core.gateway.update(self.id, &body).await {
            Ok(_) => {
                let message = format!("{} updated successfully", T::KIND.label());
                self.core.succeed(ModalKind::Update, message).await;
                Ok(())
            }
            Err(err) => Err(self.core.fail(err)),
        }
    }

    /// Merged values minus blank secrets, which the backend would read as "clear it".
    fn body(&self) -> Map<String, Value> {
        let schema = &self.core.gateway.config().form;
        let mut body = self.values.clone();
        for field in schema.fields.iter().filter(|f| f.kind == FieldKind::Secret) {
            let blank = match body.get(field.key) {
                None | Some(Value::Null) => true,
                Some(Value::String(s)) => s.trim().is_empty(),
                Some(_) => false,
            };
            if blank {
                body.remove(field.key);
            }
        }
        body
    }

    pub fn close(&mut self) {
        self.core.close();
    }
}

// ==================== VIEW ====================

/// Read-only details. Never submits.
pub struct ViewModal<T: Entity> {
    core: ModalCore<T>,
    record: Option<Map<String, Value>>,
    references: ReferenceData,
}

impl<T: Entity> ViewModal<T> {
    pub fn new(gateway: Gateway<T>, notifier: Arc<dyn Notifier>, listener: Arc<dyn ModalListener>) -> Self {
        Self {
            core: ModalCore::new(gateway, notifier, listener),
            record: None,
            references: ReferenceData::default(),
        }
    }

    pub fn phase(&self) -> ModalPhase {
        self.core.phase
    }

    pub async fn open(&mut self, id: i64, record: Option<&T>) -> ClientResult<()> {
        self.core.phase = ModalPhase::Loading;
        let kinds = self.core.gateway.config().form.references();
        let (loaded, references) = futures::join!(
            self.core.load_record(id, record),
            load_references(
                self.core.gateway.resource().transport(),
                &kinds,
                self.core.notifier.as_ref(),
            )
        );
        self.references = references;

        match loaded {
            Ok(values) => {
                self.record = Some(values);
                self.core.phase = ModalPhase::Ready;
                Ok(())
            }
            Err(err) => {
                self.core.notifier.error(&err.user_message());
                self.core.close();
                Err(err)
            }
        }
    }

    /// `(label, text)` per form field; selects show the referenced name when known.
    pub fn details(&self) -> Vec<(&'static str, String)> {
        let record = match &self.record {
            Some(record) => record,
            None => return Vec::new(),
        };
        let config = self.core.gateway.config();

        config
            .form
            .fields
            .iter()
            .filter(|field| field.kind != FieldKind::Secret)
            .map(|field| {
                let value = record.get(field.key);
                let text = match field.kind {
                    FieldKind::Status => {
                        let code = value.and_then(Value::as_i64).unwrap_or(0);
                        status_badge(code, config.inactive_tone).label.to_string()
                    }
                    FieldKind::Select(kind) => {
                        let id = value.and_then(Value::as_i64).unwrap_or(0);
                        match self.references.label_of(kind, id) {
                            Some(label) => label.to_string(),
                            None => cell_text(value),
                        }
                    }
                    _ => cell_text(value),
                };
                (field.label, text)
            })
            .collect()
    }

    pub fn close(&mut self) {
        self.core.close();
    }
}

// ==================== DELETE ====================

/// Yes/no gate in front of `delete(id)`.
pub struct DeleteConfirm<T: Entity> {
    core: ModalCore<T>,
    target: Option<i64>,
}

impl<T: Entity> DeleteConfirm<T> {
    pub fn new(gateway: Gateway<T>, notifier: Arc<dyn Notifier>, listener: Arc<dyn ModalListener>) -> Self {
        Self {
            core: ModalCore::new(gateway, notifier, listener),
            target: None,
        }
    }

    pub fn phase(&self) -> ModalPhase {
        self.core.phase
    }

    pub fn open(&mut self, id: i64) {
        self.target = Some(id);
        self.core.phase = ModalPhase::Ready;
    }

    pub fn prompt(&self) -> String {
        match self.target {
            Some(id) => format!(
                "Are you sure you want to delete {} #{}?",
                T::KIND.label().to_lowercase(),
                id
            ),
            None => String::new(),
        }
    }

    pub async fn confirm(&mut self) -> ClientResult<()> {
        self.core.ensure_ready()?;
        let id = self
            .target
            .ok_or_else(|| ClientError::validation("Nothing selected to delete"))?;

        self.core.phase = ModalPhase::Submitting;
        match self.core.gateway.delete(id).await {
            Ok(_) => {
                let message = format!("{} deleted successfully", T::KIND.label());
                self.core.succeed(ModalKind::DeleteConfirm, message).await;
                self.target = None;
                Ok(())
            }
            Err(err) => Err(self.core.fail(err)),
        }
    }

    pub fn cancel(&mut self) {
        self.target = None;
        self.core.close();
    }
}
