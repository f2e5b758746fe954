//! The editing session: parameter store plus render scheduling.
//!
//! A [`Session`] owns everything that lives for one editing run: the
//! decoded source, the slider values, the committed and draft output size,
//! the panel flag, and the live rendered surface. All mutation goes through
//! its methods, which normalize input instead of rejecting it, then issue an
//! explicit render request when a committed value changed.
//!
//! # Rendering
//!
//! Every request reads the whole committed snapshot and redraws from the
//! source (see [`render`](crate::render::render)). A request whose
//! [`RenderKey`] equals the key of the live surface is skipped, since it
//! would produce identical pixels.
//!
//! # Resize
//!
//! Width/height edits land in a draft. [`Session::apply_resize`] commits the
//! draft; with `resize.live = true` every edit commits immediately. Load and
//! reset set the draft and the committed size together.

use crate::config::EditorConfig;
use crate::events::EditorEvent;
use crate::export::{self, ExportError, ExportOutcome, FileSink};
use crate::fingerprint::RenderKey;
use crate::imaging::{
    Adjustment, AdjustmentSet, Axis, Dimensions, FilterPipeline, ImageBackend, SourceImage,
    Surface, normalize_dimension,
};
use crate::render;

/// Whether an image is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionStatus {
    #[default]
    Empty,
    Loaded,
}

/// Result of dispatching one event.
#[derive(Debug, Clone, PartialEq)]
pub enum EventOutcome {
    Loaded(Option<Dimensions>),
    Adjusted(Adjustment, f64),
    SizeEdited(Axis, u32),
    Resized(Dimensions),
    Reset,
    PanelToggled(bool),
    Exported(ExportOutcome),
}

pub struct Session<B: ImageBackend> {
    backend: B,
    config: EditorConfig,
    source: Option<SourceImage>,
    adjustments: AdjustmentSet,
    output_size: Dimensions,
    draft_size: Dimensions,
    status: SessionStatus,
    panel_visible: bool,
    surface: Option<Surface>,
    surface_key: Option<RenderKey>,
    render_count: usize,
}

impl<B: ImageBackend> Session<B> {
    pub fn new(backend: B, config: EditorConfig) -> Self {
        let panel_visible = config.panel.visible;
        Self {
            backend,
            config,
            source: None,
            adjustments: AdjustmentSet::default(),
            output_size: Dimensions::new(1, 1),
            draft_size: Dimensions::new(1, 1),
            status: SessionStatus::Empty,
            panel_visible,
            surface: None,
            surface_key: None,
            render_count: 0,
        }
    }

    // =========================================================================
    // Parameter operations
    // =========================================================================

    /// Decode and install a new source.
    ///
    /// Empty input and decode failures leave the session untouched and
    /// return `None`. On success the output size is reset to the natural
    /// size and the image is rendered.
    pub fn load_image(&mut self, bytes: &[u8]) -> Option<Dimensions> {
        if bytes.is_empty() {
            log::debug!("load ignored: no data");
            return None;
        }
        // Decode fully before touching state so a failure commits nothing.
        let source = match self.backend.decode(bytes) {
            Ok(source) => source,
            Err(e) => {
                log::warn!("upload had no effect: {e}");
                return None;
            }
        };
        let natural = source.natural_size();
        log::info!("loaded {natural} image ({} bytes)", bytes.len());

        self.source = Some(source);
        self.output_size = natural;
        self.draft_size = natural;
        self.status = SessionStatus::Loaded;
        self.request_render();
        Some(natural)
    }

    /// Clamp and store a slider value, then render. Returns the stored value.
    pub fn set_adjustment(&mut self, kind: Adjustment, value: f64) -> f64 {
        let stored = self.adjustments.set(kind, value);
        if stored != value {
            log::debug!("{kind} {value} clamped to {stored}");
        }
        self.request_render();
        stored
    }

    /// Store a normalized resize field value. Returns the normalized value.
    pub fn set_output_size(&mut self, axis: Axis, raw: &str) -> u32 {
        let value = normalize_dimension(raw);
        self.draft_size = self.draft_size.with(axis, value);
        if self.config.resize.live {
            self.apply_resize();
        }
        value
    }

    /// Commit the draft size and render. No-op without a loaded image.
    pub fn apply_resize(&mut self) {
        if self.status != SessionStatus::Loaded {
            return;
        }
        self.output_size = self.draft_size;
        self.request_render();
    }

    /// Restore default adjustments and, with a source loaded, its natural size.
    pub fn reset(&mut self) {
        self.adjustments = AdjustmentSet::default();
        if let Some(natural) = self.natural_size() {
            self.output_size = natural;
            self.draft_size = natural;
        }
        self.request_render();
    }

    pub fn toggle_panel(&mut self) -> bool {
        self.panel_visible = !self.panel_visible;
        self.panel_visible
    }

    pub fn set_panel_visible(&mut self, visible: bool) {
        self.panel_visible = visible;
    }

    /// Route one input event to the matching operation.
    ///
    /// `Export` needs a sink, so it goes through `sink`.
    pub fn dispatch(
        &mut self,
        event: EditorEvent,
        sink: &mut impl FileSink,
    ) -> Result<EventOutcome, ExportError> {
        let outcome = match event {
            EditorEvent::Load(bytes) => EventOutcome::Loaded(self.load_image(&bytes)),
            EditorEvent::SetAdjustment { kind, value } => {
                EventOutcome::Adjusted(kind, self.set_adjustment(kind, value))
            }
            EditorEvent::SetOutputSize { axis, raw } => {
                EventOutcome::SizeEdited(axis, self.set_output_size(axis, &raw))
            }
            EditorEvent::ApplyResize => {
                self.apply_resize();
                EventOutcome::Resized(self.output_size)
            }
            EditorEvent::Reset => {
                self.reset();
                EventOutcome::Reset
            }
            EditorEvent::TogglePanel => EventOutcome::PanelToggled(self.toggle_panel()),
            EditorEvent::Export => EventOutcome::Exported(self.export(sink)?),
        };
        Ok(outcome)
    }

    // =========================================================================
    // Rendering and export
    // =========================================================================

    /// Redraw the live surface from the committed snapshot.
    ///
    /// Skipped when nothing is loaded or the snapshot matches the live
    /// surface. A backend failure is logged and leaves the previous surface.
    pub fn request_render(&mut self) {
        let Some(source) = self.source.as_ref() else {
            return;
        };
        let key = RenderKey::new(source.id(), self.output_size, self.adjustments);
        if self.surface.is_some() && self.surface_key.as_ref() == Some(&key) {
            log::debug!("render skipped: snapshot unchanged");
            return;
        }

        match render::render(
            &self.backend,
            Some(source),
            self.output_size,
            &self.adjustments,
        ) {
            Ok(surface) => {
                self.surface = surface;
                self.surface_key = Some(key);
                self.render_count += 1;
            }
            Err(e) => log::warn!("render failed: {e}"),
        }
    }

    /// Encode the live surface as PNG and deliver it under the configured name.
    pub fn export(&self, sink: &mut impl FileSink) -> Result<ExportOutcome, ExportError> {
        export::export(
            &self.backend,
            self.surface.as_ref(),
            sink,
            &self.config.export.file_name,
        )
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn adjustments(&self) -> &AdjustmentSet {
        &self.adjustments
    }

    /// Committed output size.
    pub fn output_size(&self) -> Dimensions {
        self.output_size
    }

    /// Resize field values, committed or not.
    pub fn draft_size(&self) -> Dimensions {
        self.draft_size
    }

    pub fn natural_size(&self) -> Option<Dimensions> {
        self.source.as_ref().map(SourceImage::natural_size)
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn source(&self) -> Option<&SourceImage> {
        self.source.as_ref()
    }

    /// The live rendered surface, if anything has been drawn.
    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    /// Pipeline composed from the current sliders.
    pub fn pipeline(&self) -> FilterPipeline {
        FilterPipeline::from_adjustments(&self.adjustments)
    }

    pub fn panel_visible(&self) -> bool {
        self.panel_visible
    }

    /// Number of redraws actually performed.
    pub fn render_count(&self) -> usize {
        self.render_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::tests::MemorySink;
    use crate::imaging::RustBackend;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};
    use crate::test_helpers::{gradient_image, png_bytes};

    fn mock_session(dims: Vec<Dimensions>) -> Session<MockBackend> {
        Session::new(MockBackend::with_dimensions(dims), EditorConfig::default())
    }

    fn loaded_mock(width: u32, height: u32) -> Session<MockBackend> {
        let mut session = mock_session(vec![Dimensions::new(width, height)]);
        session.load_image(b"upload");
        session
    }

    fn last_draw(session: &Session<MockBackend>) -> RecordedOp {
        session
            .backend
            .get_operations()
            .into_iter()
            .rev()
            .find(|op| matches!(op, RecordedOp::Draw { .. }))
            .expect("no draw recorded")
    }

    // =========================================================================
    // Loading
    // =========================================================================

    #[test]
    fn new_session_is_empty() {
        let session = mock_session(vec![]);
        assert_eq!(session.status(), SessionStatus::Empty);
        assert!(session.source().is_none());
        assert!(session.surface().is_none());
        assert!(session.adjustments().is_default());
        assert!(session.panel_visible());
    }

    #[test]
    fn load_sets_natural_size_and_renders() {
        let session = loaded_mock(800, 600);
        assert_eq!(session.status(), SessionStatus::Loaded);
        assert_eq!(session.output_size(), Dimensions::new(800, 600));
        assert_eq!(session.draft_size(), Dimensions::new(800, 600));
        assert_eq!(session.natural_size(), Some(Dimensions::new(800, 600)));
        assert_eq!(session.render_count(), 1);
        assert!(matches!(
            last_draw(&session),
            RecordedOp::Draw {
                width: 800,
                height: 600,
                ..
            }
        ));
    }

    #[test]
    fn load_without_data_changes_nothing() {
        let mut session = mock_session(vec![Dimensions::new(10, 10)]);
        assert_eq!(session.load_image(&[]), None);
        assert_eq!(session.status(), SessionStatus::Empty);
        assert!(session.backend.get_operations().is_empty());
    }

    #[test]
    fn decode_failure_keeps_previous_state() {
        // One queued result: the first load succeeds, the second fails.
        let mut session = loaded_mock(64, 48);
        session.set_adjustment(Adjustment::Warm, 30.0);

        assert_eq!(session.load_image(b"broken"), None);

        assert_eq!(session.status(), SessionStatus::Loaded);
        assert_eq!(session.natural_size(), Some(Dimensions::new(64, 48)));
        assert_eq!(session.adjustments().get(Adjustment::Warm), 30.0);
    }

    #[test]
    fn decode_failure_on_empty_session_stays_unloaded() {
        let mut session = mock_session(vec![]);
        assert_eq!(session.load_image(b"garbage"), None);
        assert_eq!(session.status(), SessionStatus::Empty);
    }

    #[test]
    fn new_upload_replaces_source_and_size() {
        let mut session = mock_session(vec![Dimensions::new(30, 20), Dimensions::new(800, 600)]);
        session.load_image(b"first");
        session.set_output_size(Axis::Width, "400");
        session.apply_resize();

        assert_eq!(session.output_size(), Dimensions::new(400, 20));

        session.load_image(b"second");

        assert_eq!(session.output_size(), Dimensions::new(800, 600));
        assert_eq!(
            session.source().unwrap().id(),
            crate::fingerprint::content_hash(b"second")
        );
    }

    // =========================================================================
    // Adjustments
    // =========================================================================

    #[test]
    fn set_adjustment_clamps_and_renders() {
        let mut session = loaded_mock(10, 10);
        assert_eq!(session.set_adjustment(Adjustment::Brightness, 500.0), 100.0);
        assert_eq!(session.adjustments().get(Adjustment::Brightness), 100.0);
        assert_eq!(session.render_count(), 2);
        assert!(matches!(
            last_draw(&session),
            RecordedOp::Draw { pipeline, .. } if pipeline.starts_with("brightness(200%)")
        ));
    }

    #[test]
    fn set_adjustment_without_image_stores_but_does_not_draw() {
        let mut session = mock_session(vec![]);
        assert_eq!(session.set_adjustment(Adjustment::Hue, -200.0), -180.0);
        assert_eq!(session.adjustments().get(Adjustment::Hue), -180.0);
        assert_eq!(session.render_count(), 0);
        assert!(session.surface().is_none());
    }

    #[test]
    fn brightness_floor_is_zero_percent() {
        let mut session = loaded_mock(10, 10);
        session.set_adjustment(Adjustment::Brightness, -100.0);
        assert!(session.pipeline().to_string().starts_with("brightness(0%)"));
    }

    #[test]
    fn unchanged_snapshot_is_not_redrawn() {
        let mut session = loaded_mock(10, 10);
        session.set_adjustment(Adjustment::Blur, 3.0);
        session.set_adjustment(Adjustment::Blur, 3.0);
        session.request_render();
        assert_eq!(session.render_count(), 2);
        assert_eq!(session.backend.draw_count(), 2);
    }

    #[test]
    fn clamped_duplicate_is_not_redrawn() {
        let mut session = loaded_mock(10, 10);
        session.set_adjustment(Adjustment::Cool, 100.0);
        session.set_adjustment(Adjustment::Cool, 250.0);
        assert_eq!(session.render_count(), 2);
    }

    // =========================================================================
    // Resize
    // =========================================================================

    #[test]
    fn size_edits_wait_for_apply() {
        let mut session = loaded_mock(800, 600);
        assert_eq!(session.set_output_size(Axis::Width, "400"), 400);
        assert_eq!(session.set_output_size(Axis::Height, "300"), 300);

        assert_eq!(session.draft_size(), Dimensions::new(400, 300));
        assert_eq!(session.output_size(), Dimensions::new(800, 600));
        assert_eq!(session.render_count(), 1);

        session.apply_resize();
        assert_eq!(session.output_size(), Dimensions::new(400, 300));
        assert_eq!(session.render_count(), 2);
        assert!(matches!(
            last_draw(&session),
            RecordedOp::Draw {
                width: 400,
                height: 300,
                ..
            }
        ));
    }

    #[test]
    fn slider_render_ignores_uncommitted_size() {
        let mut session = loaded_mock(800, 600);
        session.set_output_size(Axis::Width, "12");
        session.set_adjustment(Adjustment::Contrast, 20.0);
        assert!(matches!(
            last_draw(&session),
            RecordedOp::Draw { width: 800, .. }
        ));
    }

    #[test]
    fn invalid_size_input_becomes_one() {
        let mut session = loaded_mock(800, 600);
        assert_eq!(session.set_output_size(Axis::Width, "0"), 1);
        assert_eq!(session.set_output_size(Axis::Height, "-20"), 1);
        session.apply_resize();
        assert_eq!(session.output_size(), Dimensions::new(1, 1));

        assert_eq!(session.set_output_size(Axis::Width, "wide"), 1);
        assert_eq!(session.set_output_size(Axis::Height, ""), 1);
    }

    #[test]
    fn live_resize_commits_immediately() {
        let mut config = EditorConfig::default();
        config.resize.live = true;
        let mut session = Session::new(
            MockBackend::with_dimensions(vec![Dimensions::new(800, 600)]),
            config,
        );
        session.load_image(b"upload");

        session.set_output_size(Axis::Width, "200");
        assert_eq!(session.output_size(), Dimensions::new(200, 600));
        assert_eq!(session.render_count(), 2);
    }

    #[test]
    fn apply_without_image_is_noop() {
        let mut session = mock_session(vec![]);
        session.set_output_size(Axis::Width, "50");
        session.apply_resize();
        assert_eq!(session.output_size(), Dimensions::new(1, 1));
        assert!(session.backend.get_operations().is_empty());
    }

    // =========================================================================
    // Reset
    // =========================================================================

    #[test]
    fn reset_restores_defaults_and_natural_size() {
        let mut session = loaded_mock(800, 600);
        for kind in Adjustment::ALL {
            session.set_adjustment(kind, 15.0);
        }
        session.set_output_size(Axis::Width, "400");
        session.set_output_size(Axis::Height, "300");
        session.apply_resize();
        assert_eq!(session.output_size(), Dimensions::new(400, 300));

        session.reset();

        assert!(session.adjustments().is_default());
        assert_eq!(session.output_size(), Dimensions::new(800, 600));
        assert_eq!(session.draft_size(), Dimensions::new(800, 600));
        assert!(matches!(
            last_draw(&session),
            RecordedOp::Draw {
                width: 800,
                height: 600,
                ..
            }
        ));
    }

    #[test]
    fn reset_without_image_only_clears_adjustments() {
        let mut session = mock_session(vec![]);
        session.set_adjustment(Adjustment::Saturation, 50.0);
        session.set_output_size(Axis::Width, "90");
        session.reset();
        assert!(session.adjustments().is_default());
        assert_eq!(session.draft_size(), Dimensions::new(90, 1));
        assert!(session.surface().is_none());
    }

    // =========================================================================
    // Panel, dispatch, export
    // =========================================================================

    #[test]
    fn panel_toggles() {
        let mut session = mock_session(vec![]);
        assert!(!session.toggle_panel());
        assert!(session.toggle_panel());
        session.set_panel_visible(false);
        assert!(!session.panel_visible());
    }

    #[test]
    fn panel_starts_from_config() {
        let mut config = EditorConfig::default();
        config.panel.visible = false;
        let session = Session::new(MockBackend::new(), config);
        assert!(!session.panel_visible());
    }

    #[test]
    fn dispatch_routes_events() {
        let mut session = mock_session(vec![Dimensions::new(80, 60)]);
        let mut sink = MemorySink::default();

        let outcomes: Vec<EventOutcome> = [
            EditorEvent::Load(b"bytes".to_vec()),
            EditorEvent::SetAdjustment {
                kind: Adjustment::Warm,
                value: 140.0,
            },
            EditorEvent::SetOutputSize {
                axis: Axis::Width,
                raw: "40".into(),
            },
            EditorEvent::ApplyResize,
            EditorEvent::TogglePanel,
            EditorEvent::Reset,
        ]
        .into_iter()
        .map(|e| session.dispatch(e, &mut sink).unwrap())
        .collect();

        assert_eq!(
            outcomes,
            vec![
                EventOutcome::Loaded(Some(Dimensions::new(80, 60))),
                EventOutcome::Adjusted(Adjustment::Warm, 100.0),
                EventOutcome::SizeEdited(Axis::Width, 40),
                EventOutcome::Resized(Dimensions::new(40, 60)),
                EventOutcome::PanelToggled(false),
                EventOutcome::Reset,
            ]
        );
    }

    #[test]
    fn export_without_image_reports_nothing() {
        let session = mock_session(vec![]);
        let mut sink = MemorySink::default();
        assert_eq!(
            session.export(&mut sink).unwrap(),
            ExportOutcome::NothingToExport
        );
        assert!(sink.deliveries.is_empty());
    }

    #[test]
    fn export_uses_configured_name_and_live_size() {
        let mut config = EditorConfig::default();
        config.export.file_name = "out.png".into();
        let mut session = Session::new(
            MockBackend::with_dimensions(vec![Dimensions::new(50, 40)]),
            config,
        );
        session.load_image(b"upload");
        session.set_output_size(Axis::Height, "20");
        session.apply_resize();

        let mut sink = MemorySink::default();
        session
            .dispatch(EditorEvent::Export, &mut sink)
            .unwrap();

        assert_eq!(sink.deliveries[0].0, "out.png");
        assert!(
            session
                .backend
                .get_operations()
                .contains(&RecordedOp::EncodePng {
                    width: 50,
                    height: 20
                })
        );
    }

    // =========================================================================
    // Real backend
    // =========================================================================

    #[test]
    fn default_render_matches_source_pixels() {
        let pixels = gradient_image(80, 60);
        let mut session = Session::new(RustBackend::new(), EditorConfig::default());
        session.load_image(&png_bytes(&pixels));
        assert_eq!(session.surface().unwrap().pixels(), &pixels);
    }

    #[test]
    fn repeated_edits_do_not_compound() {
        let pixels = gradient_image(40, 30);
        let mut session = Session::new(RustBackend::new(), EditorConfig::default());
        session.load_image(&png_bytes(&pixels));

        session.set_adjustment(Adjustment::Blur, 4.0);
        session.set_adjustment(Adjustment::Brightness, -60.0);
        session.set_output_size(Axis::Width, "7");
        session.apply_resize();
        session.reset();

        assert_eq!(session.surface().unwrap().pixels(), &pixels);
    }
}
