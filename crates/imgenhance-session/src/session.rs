// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Enhancement session — the explicit state object behind the UI.
//
// Lifecycle: NoImage → Loaded → Rendering → Rendered. A parameter change
// marks the session dirty and (with auto-render on) renders again; loading a
// new image discards the previous image, parameters and render entirely.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use imgenhance_core::error::{EnhanceError, Result};
use imgenhance_core::{
    EnhancementParams, EnhancerConfig, ImageId, ParamName, SessionState, SubscriptionId,
};
use imgenhance_pipeline::{DecodeLimits, ExportedImage, ImageBuffer, RenderResult};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::events::{ObserverRegistry, SessionEvent};

/// The currently loaded source image.
#[derive(Debug, Clone)]
struct SourceImage {
    id: ImageId,
    buffer: Arc<ImageBuffer>,
    loaded_at: DateTime<Utc>,
}

/// Metadata about the loaded image, for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageInfo {
    pub image_id: ImageId,
    pub width: u32,
    pub height: u32,
    pub loaded_at: DateTime<Utc>,
}

/// Serialisable view of the session for UI bridges.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub image: Option<ImageInfo>,
    pub params: EnhancementParams,
    /// Slider captions, e.g. `("Brightness", "150%")`, in slider order.
    pub captions: Vec<(String, String)>,
    pub dirty: bool,
    pub last_generation: Option<u64>,
    pub last_sha256: Option<String>,
    pub export_file_name: String,
}

/// Single-image enhancement session.
#[derive(Debug)]
pub struct EnhancerSession {
    config: EnhancerConfig,
    source: Option<SourceImage>,
    params: EnhancementParams,
    state: SessionState,
    dirty: bool,
    generation: u64,
    last_render: Option<RenderResult>,
    observers: ObserverRegistry,
}

impl EnhancerSession {
    pub fn new(config: EnhancerConfig) -> Self {
        Self {
            config,
            source: None,
            params: EnhancementParams::default(),
            state: SessionState::NoImage,
            dirty: false,
            generation: 0,
            last_render: None,
            observers: ObserverRegistry::default(),
        }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn params(&self) -> &EnhancementParams {
        &self.params
    }

    pub fn config(&self) -> &EnhancerConfig {
        &self.config
    }

    /// Whether the current image/parameters have not been rendered yet.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn image_id(&self) -> Option<ImageId> {
        self.source.as_ref().map(|source| source.id)
    }

    /// The decoded source image, if one is loaded.
    pub fn source(&self) -> Option<&ImageBuffer> {
        self.source.as_ref().map(|source| source.buffer.as_ref())
    }

    /// Shared handle to the source image, for handing to a background renderer.
    pub fn source_handle(&self) -> Option<Arc<ImageBuffer>> {
        self.source.as_ref().map(|source| Arc::clone(&source.buffer))
    }

    /// The most recent completed render, which may be stale if the session is dirty.
    pub fn last_render(&self) -> Option<&RenderResult> {
        self.last_render.as_ref()
    }

    // -- Observers ------------------------------------------------------------

    /// Register a callback for every session event.
    pub fn subscribe(
        &mut self,
        observer: impl Fn(&SessionEvent) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.observers.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    // -- Commands -------------------------------------------------------------

    /// Decode `bytes` and make it the session's image, resetting all
    /// parameters.
    ///
    /// On a decode error nothing changes: the previous image (or lack of one)
    /// stays in place.
    ///
    /// Only decoding can fail this call. Once the image decodes, the load
    /// succeeds; an auto-render error after that leaves the session `Loaded`
    /// and dirty.
    #[instrument(skip(self, bytes), fields(data_len = bytes.len()))]
    pub fn load_image(&mut self, bytes: &[u8]) -> Result<ImageId> {
        let buffer = match ImageBuffer::decode_with_limits(bytes, DecodeLimits::from(&self.config)) {
            Ok(buffer) => buffer,
            Err(err) => {
                warn!(error = %err, "Image rejected; keeping previous state");
                return Err(err);
            }
        };

        let source = SourceImage {
            id: ImageId::new(),
            buffer: Arc::new(buffer),
            loaded_at: Utc::now(),
        };
        let image_id = source.id;
        let (width, height) = source.buffer.dimensions();

        // Dropping the previous source and render releases the old buffers.
        self.source = Some(source);
        self.last_render = None;
        self.params = EnhancementParams::default();
        self.dirty = true;
        info!(%image_id, width, height, "Image loaded");

        self.observers.emit(&SessionEvent::ImageLoaded {
            image_id,
            width,
            height,
        });
        self.transition(SessionState::Loaded);

        // The image is in place even if the first render fails; the failure
        // is reported through `RenderFailed` and a later render can retry.
        if let Err(err) = self.render_if_auto() {
            warn!(%image_id, error = %err, "Image loaded but initial render failed");
        }
        Ok(image_id)
    }

    /// Set one parameter (clamped to its range) and return the stored value.
    #[instrument(skip(self))]
    pub fn set_param(&mut self, name: ParamName, value: f32) -> Result<f32> {
        let previous = self.params.get(name);
        let stored = self.params.set(name, value);
        if stored != value {
            debug!(%name, requested = value, stored, "Parameter clamped");
        }

        if stored != previous {
            self.mark_dirty();
        }
        self.observers
            .emit(&SessionEvent::ParamChanged { name, value: stored });

        self.render_if_auto()?;
        Ok(stored)
    }

    /// [`set_param`](Self::set_param) with the parameter given by name.
    pub fn set_param_by_name(&mut self, name: &str, value: f32) -> Result<f32> {
        let name: ParamName = name.parse()?;
        self.set_param(name, value)
    }

    /// Put every parameter back to its default.
    #[instrument(skip(self))]
    pub fn reset_params(&mut self) -> Result<()> {
        if !self.params.is_identity() {
            self.params = EnhancementParams::default();
            self.mark_dirty();
        }
        info!("Parameters reset");
        self.observers.emit(&SessionEvent::ParamsReset);

        self.render_if_auto()
    }

    /// Render the current image with the current parameters.
    ///
    /// Idempotent: when nothing changed since the last render, the cached
    /// result is returned without recomputing.
    #[instrument(skip(self))]
    pub fn render(&mut self) -> Result<&RenderResult> {
        let Some(source) = self.source.clone() else {
            return Err(EnhanceError::NoImageLoaded);
        };
        if !self.dirty && self.last_render.is_some() {
            return self.last_render.as_ref().ok_or(EnhanceError::NoImageLoaded);
        }

        self.generation += 1;
        let generation = self.generation;
        self.transition(SessionState::Rendering);

        let computed =
            RenderResult::compute(source.id, generation, &source.buffer, self.params, &self.config);
        self.finish_render(generation, computed)
    }

    /// Record the outcome of render `generation`. A failure returns the
    /// session to `Loaded` and keeps it dirty so the next render retries.
    fn finish_render(
        &mut self,
        generation: u64,
        computed: Result<RenderResult>,
    ) -> Result<&RenderResult> {
        match computed {
            Ok(result) => {
                self.dirty = false;
                self.observers.emit(&SessionEvent::RenderCompleted {
                    image_id: result.image_id,
                    generation,
                    sha256: result.encoded.sha256.clone(),
                });
                self.transition(SessionState::Rendered);
                Ok(&*self.last_render.insert(result))
            }
            Err(err) => {
                warn!(generation, error = %err, "Render failed");
                self.observers.emit(&SessionEvent::RenderFailed {
                    generation,
                    error: err.to_string(),
                });
                self.transition(SessionState::Loaded);
                Err(err)
            }
        }
    }

    /// Encoded bytes of the current render, rendering first if needed.
    ///
    /// The bytes are exactly those produced by the render the preview shows.
    #[instrument(skip(self))]
    pub fn export_image(&mut self) -> Result<ExportedImage> {
        let exported = self.render()?.encoded.clone();
        info!(file_name = %exported.file_name, bytes = exported.bytes.len(), "Export ready");
        self.observers.emit(&SessionEvent::Exported {
            file_name: exported.file_name.clone(),
            sha256: exported.sha256.clone(),
        });
        Ok(exported)
    }

    /// Drop the image and everything derived from it.
    pub fn clear(&mut self) {
        if self.source.is_none() {
            return;
        }
        self.source = None;
        self.last_render = None;
        self.params = EnhancementParams::default();
        self.dirty = false;
        info!("Session cleared");
        self.observers.emit(&SessionEvent::ImageCleared);
        self.transition(SessionState::NoImage);
    }

    // -- Snapshots ------------------------------------------------------------

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state,
            image: self.source.as_ref().map(|source| ImageInfo {
                image_id: source.id,
                width: source.buffer.width(),
                height: source.buffer.height(),
                loaded_at: source.loaded_at,
            }),
            params: self.params,
            captions: ParamName::ALL
                .iter()
                .map(|name| {
                    (
                        name.label().to_owned(),
                        name.format_value(self.params.get(*name)),
                    )
                })
                .collect(),
            dirty: self.dirty,
            last_generation: self.last_render.as_ref().map(|r| r.generation),
            last_sha256: self.last_render.as_ref().map(|r| r.encoded.sha256.clone()),
            export_file_name: self.config.export_file_name(),
        }
    }

    pub fn snapshot_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.snapshot())?)
    }

    // -- Internals ------------------------------------------------------------

    fn mark_dirty(&mut self) {
        self.dirty = true;
        // With auto-render on, the next render moves Rendered straight to Rendering.
        if self.state == SessionState::Rendered && !self.config.auto_render {
            self.transition(SessionState::Loaded);
        }
    }

    fn render_if_auto(&mut self) -> Result<()> {
        if self.config.auto_render && self.source.is_some() {
            self.render()?;
        }
        Ok(())
    }

    fn transition(&mut self, to: SessionState) {
        let from = self.state;
        if from == to {
            return;
        }
        self.state = to;
        debug!(?from, ?to, "Session state changed");
        self.observers.emit(&SessionEvent::StateChanged { from, to });
    }
}

impl Default for EnhancerSession {
    fn default() -> Self {
        Self::new(EnhancerConfig::default())
    }
}
