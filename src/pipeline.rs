//! Live preview and autosave pipeline for the resume form
//!
//! Every form mutation captures a fresh snapshot, re-renders the preview with
//! the active template and writes the snapshot to the autosave slot. Rendering
//! and persistence are independent steps: a failed write is reported in the
//! outcome but never holds back the preview.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::errors::{ResumeError, Result};
use crate::models::{FormSnapshot, TemplateVariant};
use crate::storage::SlotStore;
use crate::templates;

/// Anything the pipeline can capture a snapshot from
pub trait SnapshotSource {
    fn snapshot(&self) -> FormSnapshot;
}

impl SnapshotSource for FormSnapshot {
    fn snapshot(&self) -> FormSnapshot {
        self.clone()
    }
}

/// Preview state owned by the page controller for the whole session
#[derive(Debug, Clone)]
pub struct PageState {
    pub active_template: TemplateVariant,
    /// Snapshot taken by the most recent form input
    pub last_snapshot: FormSnapshot,
    /// Current preview markup, replaced wholesale on every update
    pub preview: String,
}

impl PageState {
    pub fn new(active_template: TemplateVariant) -> Self {
        Self {
            active_template,
            last_snapshot: FormSnapshot::new(),
            preview: String::new(),
        }
    }

    fn rerender(&mut self) {
        self.preview = templates::render(&self.active_template, &self.last_snapshot);
    }
}

/// Result of one pass through the pipeline
#[derive(Debug)]
pub struct PipelineOutcome {
    pub persist_error: Option<ResumeError>,
}

impl PipelineOutcome {
    pub fn is_saved(&self) -> bool {
        self.persist_error.is_none()
    }
}

pub struct FormPreviewPipeline {
    store: Arc<dyn SlotStore>,
}

impl FormPreviewPipeline {
    pub fn new(store: Arc<dyn SlotStore>) -> Self {
        Self { store }
    }

    /// Capture, render, replace the preview, then save.
    pub async fn on_form_input(
        &self,
        state: &mut PageState,
        form: &impl SnapshotSource,
    ) -> PipelineOutcome {
        state.last_snapshot = form.snapshot();
        state.rerender();

        let persist_error = self.persist(&state.last_snapshot).await.err();
        if let Some(ref e) = persist_error {
            warn!("Autosave failed, preview kept up to date: {}", e);
        }

        PipelineOutcome { persist_error }
    }

    /// Switch templates and re-render the last snapshot. Nothing is re-read or saved.
    pub fn on_template_change(&self, state: &mut PageState, variant: TemplateVariant) {
        debug!("Template changed {} -> {}", state.active_template, variant);
        state.active_template = variant;
        state.rerender();
    }

    /// Serialize `snapshot` into the autosave slot, overwriting any prior value
    pub async fn persist(&self, snapshot: &FormSnapshot) -> Result<()> {
        let json = snapshot.to_json()?;
        self.store.write(FormSnapshot::STORAGE_KEY, &json).await
    }

    /// Read back the last autosaved snapshot, if any
    pub async fn restore(&self) -> Result<Option<FormSnapshot>> {
        match self.store.read(FormSnapshot::STORAGE_KEY).await? {
            Some(json) => {
                let snapshot = FormSnapshot::from_json(&json)?;
                info!("Restored autosaved snapshot with {} fields", snapshot.len());
                Ok(Some(snapshot))
            }
            None => Ok(None),
        }
    }

    pub async fn clear_saved(&self) -> Result<bool> {
        self.store.remove(FormSnapshot::STORAGE_KEY).await
    }
}
