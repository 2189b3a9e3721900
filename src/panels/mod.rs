mod central_panel;
mod text_entry;
mod tools_panel;

pub use central_panel::central_panel;
pub use text_entry::text_entry_window;
pub use tools_panel::tools_panel;
