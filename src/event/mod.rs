mod bus;
mod events;
mod handlers;

pub use bus::EventBus;
pub use events::SessionEvent;
pub use handlers::{EventLog, LoggingEventHandler};

/// Receives every event broadcast by a session
pub trait EventHandler {
    fn handle_event(&mut self, event: &SessionEvent);
}

impl<F: FnMut(&SessionEvent)> EventHandler for F {
    fn handle_event(&mut self, event: &SessionEvent) {
        self(event)
    }
}
