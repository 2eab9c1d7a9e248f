// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Background renderer — runs renders on the blocking pool so a UI thread never
// waits on pixel work, and publishes only the newest result for the image that
// is currently loaded.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use imgenhance_core::error::{EnhanceError, Result};
use imgenhance_core::{EnhancementParams, EnhancerConfig, ImageId};
use imgenhance_pipeline::{ExportedImage, ImageBuffer, RenderResult};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

type SourceSlot = Option<(ImageId, Arc<ImageBuffer>)>;
type DisplaySlot = Option<Arc<RenderResult>>;

/// What happened to a submitted render once it finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// The result is now the displayed render.
    Published(u64),
    /// A newer render (or a different image) got there first; the result was dropped.
    Superseded(u64),
}

impl RenderOutcome {
    pub fn generation(&self) -> u64 {
        match self {
            Self::Published(generation) | Self::Superseded(generation) => *generation,
        }
    }
}

/// Last-write-wins renderer shared between the UI and worker tasks.
///
/// Cloning is cheap; all clones share the same source, generation counter and
/// display slot.
#[derive(Debug, Clone)]
pub struct BackgroundRenderer {
    config: Arc<EnhancerConfig>,
    source: Arc<watch::Sender<SourceSlot>>,
    next_generation: Arc<AtomicU64>,
    display: Arc<watch::Sender<DisplaySlot>>,
}

impl BackgroundRenderer {
    pub fn new(config: EnhancerConfig) -> Self {
        Self {
            config: Arc::new(config),
            source: Arc::new(watch::Sender::new(None)),
            next_generation: Arc::new(AtomicU64::new(0)),
            display: Arc::new(watch::Sender::new(None)),
        }
    }

    /// Swap in a new source image. Whatever was displayed for the previous
    /// image is cleared, and renders still running for it will be discarded.
    ///
    /// The swap happens under the display lock, the same lock `offer` holds
    /// while checking the source, so a render can never land between the
    /// source change and the clear.
    pub fn load_image(&self, image_id: ImageId, buffer: Arc<ImageBuffer>) {
        info!(%image_id, width = buffer.width(), height = buffer.height(), "Background source replaced");
        self.display.send_modify(|displayed| {
            self.source.send_replace(Some((image_id, buffer)));
            *displayed = None;
        });
    }

    pub fn image_id(&self) -> Option<ImageId> {
        self.source.borrow().as_ref().map(|(id, _)| *id)
    }

    /// Queue a render of the current image with `params`.
    ///
    /// Must be called from within a Tokio runtime. The returned handle
    /// resolves once the render has finished and either been published or
    /// dropped as stale.
    #[instrument(skip(self))]
    pub fn submit(&self, params: EnhancementParams) -> Result<JoinHandle<Result<RenderOutcome>>> {
        let Some((image_id, source)) = self.source.borrow().clone() else {
            return Err(EnhanceError::NoImageLoaded);
        };
        let generation = self.next_generation.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(%image_id, generation, "Render submitted");

        let renderer = self.clone();
        Ok(tokio::spawn(async move {
            let config = Arc::clone(&renderer.config);
            let computed = tokio::task::spawn_blocking(move || {
                RenderResult::compute(image_id, generation, &source, params, &config)
            })
            .await
            .map_err(|err| {
                warn!(generation, error = %err, "Render task did not complete");
                EnhanceError::RenderCancelled
            })?;

            let result = computed?;
            let outcome = if renderer.offer(result) {
                RenderOutcome::Published(generation)
            } else {
                RenderOutcome::Superseded(generation)
            };
            Ok::<_, EnhanceError>(outcome)
        }))
    }

    /// Publish `result` if it belongs to the current image and is newer than
    /// what is displayed. Returns whether it was published.
    pub(crate) fn offer(&self, result: RenderResult) -> bool {
        let generation = result.generation;
        let image_id = result.image_id;
        let mut result = Some(result);

        let published = self.display.send_if_modified(|displayed| {
            let current_image = self.source.borrow().as_ref().map(|(id, _)| *id);
            if current_image != Some(image_id) {
                return false;
            }
            if displayed
                .as_ref()
                .is_some_and(|shown| shown.generation >= generation)
            {
                return false;
            }
            *displayed = result.take().map(Arc::new);
            true
        });

        if published {
            debug!(%image_id, generation, "Render published");
        } else {
            debug!(%image_id, generation, "Stale render discarded");
        }
        published
    }

    /// Watch the display slot for newly published renders.
    pub fn subscribe(&self) -> watch::Receiver<DisplaySlot> {
        self.display.subscribe()
    }

    /// The currently displayed render, if any.
    pub fn latest(&self) -> Option<Arc<RenderResult>> {
        self.display.borrow().clone()
    }

    /// Encoded bytes of the displayed render, i.e. exactly what the user sees.
    pub fn export_latest(&self) -> Result<ExportedImage> {
        self.latest()
            .map(|render| render.encoded.clone())
            .ok_or(EnhanceError::NoImageLoaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use imgenhance_core::ParamName;

    fn source() -> Arc<ImageBuffer> {
        Arc::new(
            ImageBuffer::from_rgba(2, 1, vec![100, 100, 100, 255, 20, 40, 60, 255]).unwrap(),
        )
    }

    fn compute(image_id: ImageId, generation: u64, brightness: f32) -> RenderResult {
        let params = EnhancementParams::default().with(ParamName::Brightness, brightness);
        RenderResult::compute(image_id, generation, &source(), params, &EnhancerConfig::default())
            .unwrap()
    }

    #[tokio::test]
    async fn submit_without_image_fails() {
        let renderer = BackgroundRenderer::new(EnhancerConfig::default());
        let err = renderer.submit(EnhancementParams::default()).unwrap_err();
        assert!(matches!(err, EnhanceError::NoImageLoaded));
        assert!(matches!(renderer.export_latest(), Err(EnhanceError::NoImageLoaded)));
    }

    #[tokio::test]
    async fn submitted_render_is_published() {
        let renderer = BackgroundRenderer::new(EnhancerConfig::default());
        let image_id = ImageId::new();
        renderer.load_image(image_id, source());
        let mut updates = renderer.subscribe();

        let params = EnhancementParams::default().with(ParamName::Brightness, 150.0);
        let outcome = renderer.submit(params).unwrap().await.unwrap().unwrap();
        assert_eq!(outcome, RenderOutcome::Published(1));

        updates.changed().await.unwrap();
        let shown = updates.borrow().clone().unwrap();
        assert_eq!(shown.image_id, image_id);
        assert_eq!(shown.buffer.pixel(0, 0), [150, 150, 150, 255]);
        assert_eq!(renderer.export_latest().unwrap(), shown.encoded);
    }

    #[tokio::test]
    async fn newest_of_many_submissions_wins() {
        let renderer = BackgroundRenderer::new(EnhancerConfig::default());
        renderer.load_image(ImageId::new(), source());

        let handles: Vec<_> = [110.0, 120.0, 130.0, 140.0]
            .into_iter()
            .map(|b| {
                let params = EnhancementParams::default().with(ParamName::Brightness, b);
                renderer.submit(params).unwrap()
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let latest = renderer.latest().unwrap();
        assert_eq!(latest.generation, 4);
        assert_eq!(latest.params.brightness(), 140.0);
    }

    #[tokio::test]
    async fn late_older_result_is_discarded() {
        let renderer = BackgroundRenderer::new(EnhancerConfig::default());
        let image_id = ImageId::new();
        renderer.load_image(image_id, source());

        assert!(renderer.offer(compute(image_id, 2, 180.0)));
        assert!(!renderer.offer(compute(image_id, 1, 120.0)));
        assert_eq!(renderer.latest().unwrap().generation, 2);
    }

    #[tokio::test]
    async fn result_for_replaced_image_is_discarded() {
        let renderer = BackgroundRenderer::new(EnhancerConfig::default());
        let old_image = ImageId::new();
        renderer.load_image(old_image, source());
        assert!(renderer.offer(compute(old_image, 1, 150.0)));

        let new_image = ImageId::new();
        renderer.load_image(new_image, source());
        assert!(renderer.latest().is_none());
        assert!(!renderer.offer(compute(old_image, 2, 160.0)));
        assert_eq!(renderer.image_id(), Some(new_image));

        let outcome = renderer
            .submit(EnhancementParams::default())
            .unwrap()
            .await
            .unwrap()
            .unwrap();
        assert_eq!(outcome, RenderOutcome::Published(3));
        assert_eq!(renderer.latest().unwrap().image_id, new_image);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn display_never_shows_a_replaced_image() {
        let renderer = BackgroundRenderer::new(EnhancerConfig::default());

        for round in 0..20 {
            renderer.load_image(ImageId::new(), source());
            let in_flight: Vec<_> = (0..4)
                .map(|i| {
                    let params = EnhancementParams::default()
                        .with(ParamName::Brightness, 100.0 + (round * 4 + i) as f32);
                    renderer.submit(params).unwrap()
                })
                .collect();

            let current = ImageId::new();
            renderer.load_image(current, source());
            let fresh = renderer.submit(EnhancementParams::default()).unwrap();

            for handle in in_flight {
                handle.await.unwrap().unwrap();
            }
            let outcome = fresh.await.unwrap().unwrap();
            assert!(matches!(outcome, RenderOutcome::Published(_)));
            assert_eq!(renderer.latest().unwrap().image_id, current);
        }
    }
}
