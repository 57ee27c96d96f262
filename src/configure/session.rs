use super::descriptor::{DeploymentDescriptor, deploy_path};
use super::schema::{FormField, FormKind, FormSchema};
use super::values::FormValues;
use crate::canvas::{BlockId, BlockInstance};
use ahash::AHashMap;
use serde::Serialize;

/// Quiet period after the last edit before an agent form is saved.
pub const AUTOSAVE_DELAY_MS: u64 = 1000;

/// Trailing-edge debounce driven by caller-supplied millisecond stamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Debounce {
    delay_ms: u64,
    last_change: Option<u64>,
}

impl Debounce {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            last_change: None,
        }
    }

    /// Records an edit, restarting the quiet period.
    pub fn touch(&mut self, now_ms: u64) {
        self.last_change = Some(now_ms);
    }

    pub fn is_pending(&self) -> bool {
        self.last_change.is_some()
    }

    pub fn cancel(&mut self) {
        self.last_change = None;
    }

    /// True exactly once per burst of edits, after the quiet period has passed.
    pub fn fire(&mut self, now_ms: u64) -> bool {
        match self.last_change {
            Some(at) if now_ms.saturating_sub(at) >= self.delay_ms => {
                self.last_change = None;
                true
            }
            _ => false,
        }
    }
}

/// A user-added field on a start block form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtraField {
    pub key: String,
    pub label: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedConfiguration {
    pub block_id: BlockId,
    pub values: FormValues,
    pub saved_at: u64,
    pub descriptor: DeploymentDescriptor,
}

/// Saved agent forms, one per agent block.
#[derive(Debug, Default)]
pub struct ConfigurationStore {
    saved: AHashMap<BlockId, SavedConfiguration>,
}

impl ConfigurationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn save(&mut self, block_id: &BlockId, values: &FormValues, now_ms: u64) -> &SavedConfiguration {
        log::debug!("Saving configuration for '{}'", block_id);
        let saved = SavedConfiguration {
            block_id: block_id.clone(),
            values: values.clone(),
            saved_at: now_ms,
            descriptor: DeploymentDescriptor::for_agent(values, block_id),
        };
        self.saved.insert(block_id.clone(), saved);
        &self.saved[block_id]
    }

    pub fn get(&self, block_id: &BlockId) -> Option<&SavedConfiguration> {
        self.saved.get(block_id)
    }

    /// The saved values for a block, or an empty form.
    pub fn load(&self, block_id: &BlockId) -> FormValues {
        self.saved
            .get(block_id)
            .map(|s| s.values.clone())
            .unwrap_or_default()
    }

    pub fn remove(&mut self, block_id: &BlockId) -> Option<SavedConfiguration> {
        self.saved.remove(block_id)
    }

    pub fn len(&self) -> usize {
        self.saved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.saved.is_empty()
    }
}

/// The side panel opened for the selected block.
#[derive(Debug, Clone)]
pub struct FormSession {
    block_id: BlockId,
    schema: FormSchema,
    values: FormValues,
    active_tab: Option<String>,
    extra_fields: Vec<ExtraField>,
    next_extra: usize,
    autosave: Debounce,
}

impl FormSession {
    /// Opens the form for `block`. Agent forms resume from their saved values.
    pub fn open(block: &BlockInstance, store: &ConfigurationStore) -> Self {
        let kind = FormKind::of(block);
        let schema = FormSchema::for_kind(kind);
        let values = if kind == FormKind::Agent {
            store.load(&block.id)
        } else {
            FormValues::new()
        };
        let active_tab = schema.default_tab().map(str::to_string);
        Self {
            block_id: block.id.clone(),
            schema,
            values,
            active_tab,
            extra_fields: Vec::new(),
            next_extra: 0,
            autosave: Debounce::new(AUTOSAVE_DELAY_MS),
        }
    }

    pub fn block_id(&self) -> &BlockId {
        &self.block_id
    }

    pub fn kind(&self) -> FormKind {
        self.schema.kind
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn active_tab(&self) -> Option<&str> {
        self.active_tab.as_deref()
    }

    /// Switches sub-tab. Unknown tabs are ignored.
    pub fn select_tab(&mut self, tab: &str) -> bool {
        if !self.schema.tabs().contains(&tab) {
            return false;
        }
        self.active_tab = Some(tab.to_string());
        true
    }

    /// Fields shown right now, for the active tab.
    pub fn fields(&self) -> &[FormField] {
        self.schema.fields(self.active_tab.as_deref())
    }

    pub fn set_value(&mut self, key: &str, value: impl Into<String>, now_ms: u64) {
        self.values.set(key, value);
        if self.kind() == FormKind::Agent {
            self.autosave.touch(now_ms);
        }
    }

    pub fn extra_fields(&self) -> &[ExtraField] {
        &self.extra_fields
    }

    /// Appends an empty free-text field. Only start forms accept them.
    pub fn add_extra_field(&mut self) -> Option<&ExtraField> {
        if !self.schema.accepts_extra_fields() {
            return None;
        }
        let key = format!("extra_{}", self.next_extra);
        self.next_extra += 1;
        self.extra_fields.push(ExtraField {
            key,
            label: String::new(),
        });
        self.extra_fields.last()
    }

    pub fn rename_extra_field(&mut self, index: usize, label: &str) -> bool {
        match self.extra_fields.get_mut(index) {
            Some(field) => {
                field.label = label.to_string();
                true
            }
            None => false,
        }
    }

    /// Drops an extra field together with anything typed into it.
    pub fn remove_extra_field(&mut self, index: usize) -> Option<ExtraField> {
        if index >= self.extra_fields.len() {
            return None;
        }
        let field = self.extra_fields.remove(index);
        self.values.remove(&field.key);
        Some(field)
    }

    /// The deployment descriptor, for agent forms.
    pub fn descriptor(&self) -> Option<DeploymentDescriptor> {
        (self.kind() == FormKind::Agent)
            .then(|| DeploymentDescriptor::for_agent(&self.values, &self.block_id))
    }

    pub fn deploy_path(&self) -> String {
        deploy_path(&self.values, Some(&self.block_id))
    }

    /// Saves an agent form once edits have gone quiet. Returns whether it saved.
    pub fn poll_autosave(&mut self, now_ms: u64, store: &mut ConfigurationStore) -> bool {
        if self.kind() != FormKind::Agent || !self.autosave.fire(now_ms) {
            return false;
        }
        store.save(&self.block_id, &self.values, now_ms);
        true
    }

    /// Saves an agent form immediately, cancelling any pending autosave.
    pub fn save(&mut self, now_ms: u64, store: &mut ConfigurationStore) -> bool {
        if self.kind() != FormKind::Agent {
            return false;
        }
        self.autosave.cancel();
        store.save(&self.block_id, &self.values, now_ms);
        true
    }
}
