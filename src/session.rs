use crate::color::Color;
use crate::config::{MAX_BRUSH_WIDTH, MIN_BRUSH_WIDTH, SessionConfig};
use crate::error::{ExportResult, HistoryResult, SessionResult, SurfaceResult};
use crate::event::{EventBus, EventHandler, SessionEvent};
use crate::export::{ExportSink, ExportedImage, export_png};
use crate::history::History;
use crate::input::InputEvent;
use crate::surface::{Background, FontSpec, PixelBuffer, RasterSurface};
use crate::tools::{TextRequest, Tool, ToolContext, ToolId, ToolResponse, ToolSettings, ToolType};
use egui::{Key, Modifiers, Pos2};
use log::{debug, error, info};

/// Owns the surface, the history and the active tool, and routes every
/// input event through them.
pub struct DrawingSession {
    config: SessionConfig,
    surface: RasterSurface,
    history: History,
    tool: ToolType,
    settings: ToolSettings,
    background_id: String,
    background: Background,
    /// Rendered background, kept in sync with the surface size
    underlay: Option<PixelBuffer>,
    events: EventBus,
    export_sink: Option<Box<dyn ExportSink>>,
    last_pointer: Option<Pos2>,
    pending_text: Option<TextRequest>,
}

impl std::fmt::Debug for DrawingSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrawingSession")
            .field("tool", &self.tool.id())
            .field("settings", &self.settings)
            .field("background", &self.background_id)
            .field("undo_len", &self.history.undo_len())
            .field("redo_len", &self.history.redo_len())
            .finish_non_exhaustive()
    }
}

impl DrawingSession {
    /// Creates a session over a blank surface of `logical_w` × `logical_h`
    /// points and records it as the history floor.
    pub fn new(logical_w: f32, logical_h: f32, pixels_per_point: f32, config: SessionConfig) -> SessionResult<Self> {
        config.validate()?;
        let surface = RasterSurface::new(logical_w, logical_h, pixels_per_point)?;
        let mut history = History::new(config.history_depth);
        history.reset(&surface)?;

        let background = Background::from_id(&config.default_background).unwrap_or(Background::Transparent);
        let underlay = background.render(surface.width(), surface.height());
        info!(
            "Starting drawing session {}x{} @ {}",
            surface.width(),
            surface.height(),
            pixels_per_point
        );
        Ok(Self {
            settings: ToolSettings::from_config(&config),
            background_id: config.default_background.clone(),
            background,
            underlay,
            surface,
            history,
            tool: ToolType::new(ToolId::Brush),
            events: EventBus::new(),
            export_sink: None,
            last_pointer: None,
            pending_text: None,
            config,
        })
    }

    /// A session with the default configuration at density 1
    pub fn with_size(logical_w: f32, logical_h: f32) -> SessionResult<Self> {
        Self::new(logical_w, logical_h, 1.0, SessionConfig::default())
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn surface(&self) -> &RasterSurface {
        &self.surface
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn settings(&self) -> &ToolSettings {
        &self.settings
    }

    pub fn tool(&self) -> &ToolType {
        &self.tool
    }

    pub fn tool_id(&self) -> ToolId {
        self.tool.id()
    }

    pub fn color(&self) -> Color {
        self.settings.color
    }

    pub fn brush_width(&self) -> u32 {
        self.settings.brush_width
    }

    pub fn fill_mode(&self) -> bool {
        self.settings.fill_mode
    }

    pub fn background(&self) -> &Background {
        &self.background
    }

    pub fn background_id(&self) -> &str {
        &self.background_id
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// The text placement waiting for a submit or cancel
    pub fn pending_text(&self) -> Option<&TextRequest> {
        self.pending_text.as_ref()
    }

    /// Subscribe a handler to session events
    pub fn subscribe(&self, handler: Box<dyn EventHandler>) {
        self.events.subscribe(handler);
    }

    pub fn set_export_sink(&mut self, sink: Box<dyn ExportSink>) {
        self.export_sink = Some(sink);
    }

    /// Background, committed and preview layers flattened for display
    pub fn composite(&self) -> PixelBuffer {
        self.surface.composite(self.underlay.as_ref())
    }

    fn split(&mut self) -> (&mut ToolType, ToolContext<'_>) {
        (
            &mut self.tool,
            ToolContext {
                surface: &mut self.surface,
                settings: &self.settings,
            },
        )
    }

    fn emit_history(&self) {
        self.events.emit(SessionEvent::HistoryChanged {
            undo_len: self.history.undo_len(),
            redo_len: self.history.redo_len(),
        });
    }

    fn record_commit(&mut self) {
        if let Err(err) = self.history.snapshot(&self.surface) {
            error!("Failed to record history: {}", err);
            return;
        }
        let tool = self.tool.id();
        info!("Committed {} edit", tool.name());
        self.events.emit(SessionEvent::Committed { tool });
        self.emit_history();
    }

    fn apply(&mut self, response: ToolResponse) {
        match response {
            ToolResponse::None => {}
            ToolResponse::Committed => self.record_commit(),
            ToolResponse::ColorPicked(color) => {
                self.update_color(color);
                if self.config.pick_switches_to_brush {
                    self.set_tool(ToolId::Brush);
                }
            }
            ToolResponse::TextRequested(request) => {
                self.pending_text = Some(request.clone());
                self.events.emit(SessionEvent::TextRequested(request));
            }
        }
    }

    /// Finalizes or discards whatever the active tool is in the middle of.
    fn interrupt(&mut self) {
        let (tool, mut ctx) = self.split();
        let response = tool.deactivate(&mut ctx);
        self.surface.clear_preview();
        self.pending_text = None;
        self.apply(response);
    }

    // Settings

    pub fn set_tool(&mut self, id: ToolId) {
        let old = self.tool.id();
        if old == id {
            return;
        }
        self.interrupt();
        self.tool = ToolType::new(id);
        info!("Tool changed: {} -> {}", old.name(), id.name());
        self.events.emit(SessionEvent::ToolChanged { old, new: id });
    }

    fn update_color(&mut self, color: Color) {
        if self.settings.color != color {
            self.settings.color = color;
            self.events.emit(SessionEvent::ColorChanged(color));
        }
    }

    /// Sets the drawing color from `#RRGGBB`; anything else selects the
    /// default color. Returns the color now in effect.
    pub fn set_color(&mut self, hex: &str) -> Color {
        let color = Color::parse_or(hex, self.config.default_color);
        self.update_color(color);
        color
    }

    /// Returns the width actually applied after clamping.
    pub fn set_brush_width(&mut self, width: u32) -> u32 {
        let width = width.clamp(MIN_BRUSH_WIDTH, MAX_BRUSH_WIDTH);
        if self.settings.brush_width != width {
            self.settings.brush_width = width;
            self.events.emit(SessionEvent::BrushWidthChanged(width));
        }
        width
    }

    pub fn set_fill_mode(&mut self, filled: bool) {
        if self.settings.fill_mode != filled {
            self.settings.fill_mode = filled;
            self.events.emit(SessionEvent::FillModeChanged(filled));
        }
    }

    /// Applies a background preset or `#RRGGBB`. Unknown ids are ignored and
    /// return false.
    pub fn set_background(&mut self, id: &str) -> bool {
        let Some(background) = Background::from_id(id) else {
            debug!("Unknown background '{}'", id);
            return false;
        };
        self.underlay = background.render(self.surface.width(), self.surface.height());
        self.background = background;
        self.background_id = id.to_owned();
        self.events.emit(SessionEvent::BackgroundChanged(id.to_owned()));
        true
    }

    // History

    /// Returns whether anything changed.
    pub fn undo(&mut self) -> HistoryResult<bool> {
        self.interrupt();
        let changed = self.history.undo(&mut self.surface)?;
        if changed {
            self.emit_history();
        }
        Ok(changed)
    }

    /// Returns whether anything changed.
    pub fn redo(&mut self) -> HistoryResult<bool> {
        self.interrupt();
        let changed = self.history.redo(&mut self.surface)?;
        if changed {
            self.emit_history();
        }
        Ok(changed)
    }

    /// Wipes the committed layer and records a single history entry.
    pub fn clear(&mut self) -> HistoryResult<()> {
        self.interrupt();
        let fill = if self.config.clear_to_background {
            self.background.base_color()
        } else {
            None
        };
        self.surface.clear(fill);
        self.history.snapshot(&self.surface)?;
        info!("Cleared canvas");
        self.events.emit(SessionEvent::Cleared);
        self.emit_history();
        Ok(())
    }

    // Input

    pub fn handle_input(&mut self, event: &InputEvent) {
        match event {
            InputEvent::PointerDown { pos, modifiers } => self.pointer_down(*pos, *modifiers),
            InputEvent::PointerMove { pos, modifiers } => self.pointer_move(*pos, *modifiers),
            InputEvent::PointerUp { pos, modifiers } => self.pointer_up(*pos, *modifiers),
            InputEvent::DoubleClick { .. } => self.double_click(),
            InputEvent::PointerLeave => self.pointer_leave(),
            InputEvent::KeyDown { key: Key::Escape, .. } => self.cancel(),
            InputEvent::KeyDown { .. } => {}
        }
    }

    pub fn pointer_down(&mut self, pos: Pos2, modifiers: Modifiers) {
        self.last_pointer = Some(pos);
        let (tool, mut ctx) = self.split();
        let response = tool.on_pointer_down(pos, modifiers, &mut ctx);
        self.apply(response);
    }

    pub fn pointer_move(&mut self, pos: Pos2, modifiers: Modifiers) {
        self.last_pointer = Some(pos);
        let (tool, mut ctx) = self.split();
        let response = tool.on_pointer_move(pos, modifiers, &mut ctx);
        self.apply(response);
    }

    pub fn pointer_up(&mut self, pos: Pos2, modifiers: Modifiers) {
        self.last_pointer = Some(pos);
        let (tool, mut ctx) = self.split();
        let response = tool.on_pointer_up(pos, modifiers, &mut ctx);
        self.apply(response);
    }

    pub fn double_click(&mut self) {
        let (tool, mut ctx) = self.split();
        let response = tool.on_double_click(&mut ctx);
        self.apply(response);
    }

    /// The pointer left the canvas: finish as if released where it was last
    /// seen.
    pub fn pointer_leave(&mut self) {
        if let Some(pos) = self.last_pointer {
            self.pointer_up(pos, Modifiers::NONE);
        }
    }

    /// Escape
    pub fn cancel(&mut self) {
        self.pending_text = None;
        let (tool, mut ctx) = self.split();
        let response = tool.on_cancel(&mut ctx);
        self.apply(response);
    }

    // Text entry

    /// Places `text` at the pending placement. Returns whether anything was
    /// committed.
    pub fn submit_text(&mut self, text: &str, font_size: f32, font_family: &str) -> bool {
        if self.pending_text.take().is_none() {
            debug!("No text placement is pending");
            return false;
        }
        let font = FontSpec::new(font_size, font_family);
        let (tool, mut ctx) = self.split();
        let response = match tool.as_text_tool_mut() {
            Some(text_tool) => text_tool.submit(text, font, &mut ctx),
            None => ToolResponse::None,
        };
        let committed = response == ToolResponse::Committed;
        self.apply(response);
        committed
    }

    pub fn cancel_text(&mut self) {
        if self.pending_text.take().is_some() {
            let (tool, mut ctx) = self.split();
            if let Some(text_tool) = tool.as_text_tool_mut() {
                text_tool.on_cancel(&mut ctx);
            }
        }
    }

    // Viewport and export

    /// Resizes the surface for a new viewport, stretching the drawing to fit.
    /// Returns whether anything changed.
    pub fn resize_viewport(&mut self, logical_w: f32, logical_h: f32, pixels_per_point: f32) -> SurfaceResult<bool> {
        let target = (
            (logical_w * pixels_per_point).round() as u32,
            (logical_h * pixels_per_point).round() as u32,
        );
        let unchanged = self.surface.pixels_per_point() == pixels_per_point
            && target == (self.surface.width(), self.surface.height());
        if unchanged {
            return Ok(false);
        }
        self.interrupt();
        self.surface.resize(logical_w, logical_h, pixels_per_point)?;
        self.underlay = self.background.render(self.surface.width(), self.surface.height());
        self.events.emit(SessionEvent::ViewportResized {
            width: self.surface.width(),
            height: self.surface.height(),
            pixels_per_point,
        });
        Ok(true)
    }

    /// Encodes the drawing and hands it to the export sink.
    pub fn save(&mut self) -> ExportResult<ExportedImage> {
        let underlay = if self.config.export.flatten_background {
            self.underlay.as_ref()
        } else {
            None
        };
        let image = export_png(
            &self.surface,
            underlay,
            self.config.export.scale,
            &self.config.export.file_name,
        )?;
        if let Some(sink) = self.export_sink.as_mut() {
            sink.on_image_generated(&image);
        }
        self.events.emit(SessionEvent::ImageExported {
            file_name: image.file_name.clone(),
            width: image.width,
            height: image.height,
            bytes: image.bytes.len(),
        });
        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HistoryError;
    use crate::history::Snapshot;
    use egui::pos2;

    #[test]
    fn failed_undo_keeps_the_last_good_state() {
        let mut session = DrawingSession::with_size(40.0, 40.0).expect("session");
        session.pointer_down(pos2(5.0, 5.0), Modifiers::NONE);
        session.pointer_move(pos2(30.0, 30.0), Modifiers::NONE);
        session.pointer_up(pos2(30.0, 30.0), Modifiers::NONE);

        // Stack: floor, stroke, corrupt entry, current
        session.history.push_snapshot(Snapshot::from_png(vec![0x89, b'P', b'N', b'G', 0, 1], 40, 40));
        session.history.snapshot(&session.surface).expect("capture");
        let before = session.surface.committed().clone();
        let undo_len = session.history.undo_len();

        let err = session.undo().expect_err("corrupt entry");
        assert!(matches!(err, HistoryError::Restore(_)));
        assert_eq!(session.surface.committed(), &before);
        assert!(!before.is_clear());
        assert_eq!(session.history.undo_len(), undo_len);
        assert!(!session.can_redo());
    }
}
