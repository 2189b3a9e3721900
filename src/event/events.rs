use crate::color::Color;
use crate::tools::{TextRequest, ToolId};

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    ToolChanged {
        old: ToolId,
        new: ToolId,
    },
    ColorChanged(Color),
    BrushWidthChanged(u32),
    FillModeChanged(bool),
    BackgroundChanged(String),
    /// A tool finalized an edit and a snapshot was recorded
    Committed {
        tool: ToolId,
    },
    HistoryChanged {
        undo_len: usize,
        redo_len: usize,
    },
    TextRequested(TextRequest),
    Cleared,
    ViewportResized {
        width: u32,
        height: u32,
        pixels_per_point: f32,
    },
    ImageExported {
        file_name: String,
        width: u32,
        height: u32,
        bytes: usize,
    },
}
