#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod color;
pub mod config;
pub mod error;
pub mod event;
pub mod export;
pub mod fill;
pub mod geometry;
pub mod history;
pub mod input;
pub mod panels;
pub mod session;
pub mod surface;
pub mod texture;
pub mod tools;

pub use app::SketchApp;
pub use color::Color;
pub use config::SessionConfig;
pub use error::{ExportError, HistoryError, SessionError, SurfaceError};
pub use event::{EventBus, EventHandler, SessionEvent};
pub use export::{ExportSink, ExportedImage};
pub use history::History;
pub use input::{InputEvent, InputHandler};
pub use session::DrawingSession;
pub use surface::RasterSurface;
pub use tools::{Tool, ToolId, ToolType};
