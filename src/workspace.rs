//! The builder's state in one owned value.
//!
//! A [`Workspace`] ties together the canvas, the drag controller, the side
//! panel form of the selected block and the repository the workflow deploys
//! to. The UI holds one and routes everything through it.

use crate::canvas::{BlockInstance, CanvasModel};
use crate::configure::{ConfigurationStore, FormKind, FormSession};
use crate::controller::{CanvasEvent, ControllerOutcome, DragController};
use crate::dispatch::{self, ActionDispatcher, Droplet};
use crate::error::DispatchError;
use crate::registry::Registry;
use serde_json::Value;

#[derive(Debug, Default)]
pub struct Workspace {
    registry: Registry,
    canvas: CanvasModel,
    controller: DragController,
    configurations: ConfigurationStore,
    form: Option<FormSession>,
    repo_name: Option<String>,
    submitting: bool,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_canvas(canvas: CanvasModel) -> Self {
        Self {
            canvas,
            ..Self::default()
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn canvas(&self) -> &CanvasModel {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut CanvasModel {
        &mut self.canvas
    }

    pub fn controller(&self) -> &DragController {
        &self.controller
    }

    pub fn configurations(&self) -> &ConfigurationStore {
        &self.configurations
    }

    /// The side panel form of the selected block, if one is open.
    pub fn form(&self) -> Option<&FormSession> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut FormSession> {
        self.form.as_mut()
    }

    pub fn repo_name(&self) -> Option<&str> {
        self.repo_name.as_deref()
    }

    pub fn set_repo_name(&mut self, repo: impl Into<String>) {
        self.repo_name = Some(repo.into());
    }

    /// Whether an external action is in flight.
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Routes a canvas event through the controller. Selecting a block opens its form.
    pub fn handle(&mut self, event: CanvasEvent, now_ms: u64) -> ControllerOutcome {
        let outcome = self.controller.handle(&mut self.canvas, event);
        if let ControllerOutcome::Selected(id) = &outcome {
            self.open_form(id, now_ms);
        }
        outcome
    }

    /// Selects a block directly and opens its form.
    pub fn select(&mut self, id: &str, now_ms: u64) -> Option<&BlockInstance> {
        self.canvas.select_block(id)?;
        self.open_form(id, now_ms);
        self.canvas.block(id)
    }

    fn open_form(&mut self, id: &str, now_ms: u64) {
        if self.form.as_ref().is_some_and(|f| f.block_id().as_str() == id) {
            return;
        }
        self.close_form(now_ms);
        if let Some(block) = self.canvas.block(id) {
            self.form = Some(FormSession::open(block, &self.configurations));
        }
    }

    /// Closes the open form, keeping what was typed into an agent form.
    pub fn close_form(&mut self, now_ms: u64) {
        if let Some(mut form) = self.form.take() {
            if !form.values().is_empty() {
                form.save(now_ms, &mut self.configurations);
            }
        }
    }

    /// Drives the form autosave. Call periodically with the current time.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        match self.form.as_mut() {
            Some(form) => form.poll_autosave(now_ms, &mut self.configurations),
            None => false,
        }
    }

    /// Removes a block, its connections, its saved configuration and its form.
    pub fn remove_block(&mut self, id: &str) -> Option<BlockInstance> {
        let removed = self.canvas.remove_block(id)?;
        if self.form.as_ref().is_some_and(|f| f.block_id() == &removed.id) {
            self.form = None;
        }
        self.configurations.remove(&removed.id);
        self.controller.reset();
        Some(removed)
    }

    pub async fn create_repository(
        &mut self,
        dispatcher: &dyn ActionDispatcher,
        name: &str,
    ) -> Result<String, DispatchError> {
        self.submitting = true;
        let result = dispatch::create_repository(dispatcher, name).await;
        self.submitting = false;

        let repo = result?;
        self.repo_name = Some(repo.clone());
        Ok(repo)
    }

    /// Saves and submits the open agent form, deploying the generated code.
    pub async fn submit_agent(
        &mut self,
        dispatcher: &dyn ActionDispatcher,
        github_user: Option<&str>,
        now_ms: u64,
    ) -> Result<Value, DispatchError> {
        let Some(form) = self.form.as_mut().filter(|f| f.kind() == FormKind::Agent) else {
            return Err(DispatchError::InvalidInput(
                "Select an agent block to submit its configuration".to_string(),
            ));
        };
        form.save(now_ms, &mut self.configurations);
        let path = form.deploy_path();
        let Some(descriptor) = form.descriptor() else {
            return Err(DispatchError::InvalidInput(
                "Select an agent block to submit its configuration".to_string(),
            ));
        };

        self.submitting = true;
        let result = dispatch::submit_agent(
            dispatcher,
            &descriptor,
            self.repo_name.as_deref(),
            &path,
            github_user,
        )
        .await;
        self.submitting = false;
        result
    }

    /// Configures CI/CD for the workflow's repository.
    pub async fn publish(&mut self, dispatcher: &dyn ActionDispatcher) -> Result<Value, DispatchError> {
        self.submitting = true;
        let result = dispatch::configure_ci_cd(dispatcher, self.repo_name.as_deref()).await;
        self.submitting = false;
        result
    }

    /// Creates a droplet for the repository and registers its deploy key.
    pub async fn provision(&mut self, dispatcher: &dyn ActionDispatcher) -> Result<Droplet, DispatchError> {
        self.submitting = true;
        let result = async {
            let repo = self.repo_name.as_deref();
            let droplet = dispatch::create_droplet(dispatcher, repo).await?;
            dispatch::set_deploy_key(dispatcher, repo, &droplet).await?;
            Ok::<_, DispatchError>(droplet)
        }
        .await;
        self.submitting = false;
        result
    }
}
