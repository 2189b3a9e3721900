use crate::config::SessionConfig;
use crate::error::SessionResult;
use crate::event::LoggingEventHandler;
use crate::export::{ExportSink, ExportedImage};
use crate::input::{InputEvent, InputHandler};
use crate::panels::{central_panel, text_entry_window, tools_panel};
use crate::session::DrawingSession;
use crate::texture::CanvasTexture;
use crate::tools::ToolId;
use egui::{Key, Rect};
use std::path::PathBuf;

/// Initial canvas size before the first layout pass
const INITIAL_CANVAS: (f32, f32) = (800.0, 600.0);

/// Largest logical canvas, however big the window gets
const MAX_CANVAS: (f32, f32) = (1400.0, 900.0);

/// User choices restored across restarts.
#[derive(serde::Deserialize, serde::Serialize, Debug, Clone)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct Preferences {
    pub tool: ToolId,
    pub color: String,
    pub brush_width: u32,
    pub fill_mode: bool,
    pub background: String,
}

impl Default for Preferences {
    fn default() -> Self {
        let config = SessionConfig::default();
        Self {
            tool: ToolId::Brush,
            color: config.default_color.to_hex(),
            brush_width: config.default_brush_width,
            fill_mode: false,
            background: config.default_background,
        }
    }
}

/// Writes exported images into a directory on disk.
pub struct FileExportSink {
    dir: PathBuf,
}

impl FileExportSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ExportSink for FileExportSink {
    fn on_image_generated(&mut self, image: &ExportedImage) {
        let path = self.dir.join(&image.file_name);
        match std::fs::write(&path, &image.bytes) {
            Ok(()) => log::info!("Saved {}", path.display()),
            Err(err) => log::error!("Could not write {}: {}", path.display(), err),
        }
    }
}

/// State of the text-entry window while the text tool waits for input
#[derive(Debug, Clone)]
pub struct TextEntry {
    pub text: String,
    pub font_size: f32,
    pub font_family: String,
}

pub struct SketchApp {
    session: DrawingSession,
    input: InputHandler,
    texture: CanvasTexture,
    text_entry: Option<TextEntry>,
    status: Option<String>,
}

impl SketchApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>, config: SessionConfig) -> SessionResult<Self> {
        let preferences: Preferences = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();
        let ppp = cc.egui_ctx.pixels_per_point();
        let mut app = Self::with_session(DrawingSession::new(INITIAL_CANVAS.0, INITIAL_CANVAS.1, ppp, config)?);
        app.apply_preferences(&preferences);
        Ok(app)
    }

    pub fn with_session(mut session: DrawingSession) -> Self {
        session.subscribe(Box::new(LoggingEventHandler));
        session.set_export_sink(Box::new(FileExportSink::new(".")));
        Self {
            session,
            input: InputHandler::new(Rect::NOTHING),
            texture: CanvasTexture::new("sketchpad-canvas"),
            text_entry: None,
            status: None,
        }
    }

    fn apply_preferences(&mut self, preferences: &Preferences) {
        self.session.set_color(&preferences.color);
        self.session.set_brush_width(preferences.brush_width);
        self.session.set_fill_mode(preferences.fill_mode);
        self.session.set_background(&preferences.background);
        self.session.set_tool(preferences.tool);
    }

    fn preferences(&self) -> Preferences {
        Preferences {
            tool: self.session.tool_id(),
            color: self.session.color().to_hex(),
            brush_width: self.session.brush_width(),
            fill_mode: self.session.fill_mode(),
            background: self.session.background_id().to_owned(),
        }
    }

    pub fn session(&self) -> &DrawingSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut DrawingSession {
        self.texture.invalidate();
        &mut self.session
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = Some(status.into());
    }

    pub fn text_entry_mut(&mut self) -> Option<&mut TextEntry> {
        self.text_entry.as_mut()
    }

    pub fn undo(&mut self) {
        if let Err(err) = self.session_mut().undo() {
            self.set_status(format!("Undo failed: {err}"));
        }
    }

    pub fn redo(&mut self) {
        if let Err(err) = self.session_mut().redo() {
            self.set_status(format!("Redo failed: {err}"));
        }
    }

    pub fn clear(&mut self) {
        if let Err(err) = self.session_mut().clear() {
            self.set_status(format!("Clear failed: {err}"));
        }
    }

    pub fn save_image(&mut self) {
        match self.session.save() {
            Ok(image) => self.set_status(format!("Saved {} ({}x{})", image.file_name, image.width, image.height)),
            Err(err) => self.set_status(format!("Save failed: {err}")),
        }
    }

    /// Keeps the surface the same size as the canvas area on screen, up to
    /// [`MAX_CANVAS`].
    pub fn sync_viewport(&mut self, canvas_rect: Rect, pixels_per_point: f32) {
        self.input.set_canvas_rect(canvas_rect);
        let size = canvas_rect.size();
        if size.x < 1.0 || size.y < 1.0 {
            return;
        }
        let (width, height) = (size.x.min(MAX_CANVAS.0), size.y.min(MAX_CANVAS.1));
        match self.session.resize_viewport(width, height, pixels_per_point) {
            Ok(true) => self.texture.invalidate(),
            Ok(false) => {}
            Err(err) => log::warn!("Ignoring viewport size: {}", err),
        }
    }

    /// Translates this frame's egui input and feeds it to the session.
    /// Presses are dropped unless the canvas itself is under the pointer, so
    /// clicks on floating windows never reach the tools.
    pub fn handle_input(&mut self, ctx: &egui::Context, canvas_hovered: bool) {
        let events = self.input.process_input(ctx);
        let typing = ctx.wants_keyboard_input();
        for event in events {
            match &event {
                InputEvent::KeyDown { key, modifiers } => {
                    if typing || self.handle_shortcut(*key, *modifiers) {
                        continue;
                    }
                }
                InputEvent::PointerDown { .. } | InputEvent::DoubleClick { .. } if !canvas_hovered => continue,
                _ => {}
            }
            self.session_mut().handle_input(&event);
        }
    }

    fn handle_shortcut(&mut self, key: Key, modifiers: egui::Modifiers) -> bool {
        if modifiers.command && key == Key::Z {
            if modifiers.shift {
                self.redo();
            } else {
                self.undo();
            }
            return true;
        }
        if modifiers.command && key == Key::Y {
            self.redo();
            return true;
        }
        if modifiers.any() {
            return false;
        }
        let mut letters = key.name().chars();
        match (letters.next(), letters.next()) {
            (Some(letter), None) => match ToolId::from_hotkey(letter) {
                Some(tool) => {
                    self.session_mut().set_tool(tool);
                    true
                }
                None => false,
            },
            _ => false,
        }
    }

    /// Opens or closes the text window to follow the session's pending
    /// request.
    pub fn sync_text_entry(&mut self) {
        match (self.session.pending_text(), self.text_entry.is_some()) {
            (Some(request), false) => {
                self.text_entry = Some(TextEntry {
                    text: String::new(),
                    font_size: request.font_size,
                    font_family: request.font_family.clone(),
                });
            }
            (None, true) => self.text_entry = None,
            _ => {}
        }
    }

    pub fn submit_text(&mut self) {
        if let Some(entry) = self.text_entry.take() {
            self.session_mut().submit_text(&entry.text, entry.font_size, &entry.font_family);
        }
    }

    pub fn cancel_text(&mut self) {
        self.text_entry = None;
        self.session_mut().cancel_text();
    }

    /// Paints the composited canvas into `rect`.
    pub fn paint_canvas(&mut self, ctx: &egui::Context, painter: &egui::Painter, rect: Rect) {
        let session = &self.session;
        let texture = self.texture.update(ctx, || session.composite());
        let uv = Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
        let size = session.surface().logical_size();
        painter.image(
            texture,
            Rect::from_min_size(rect.min, size),
            uv,
            egui::Color32::WHITE,
        );
    }
}

impl eframe::App for SketchApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, &self.preferences());
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        tools_panel(self, ctx);
        central_panel(self, ctx);
        self.sync_text_entry();
        text_entry_window(self, ctx);
    }
}
