use egui::{Context, Key, Modifiers, PointerButton, Pos2, Rect};

/// Canvas input after translation out of egui: positions are logical and
/// relative to the canvas' top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown { pos: Pos2, modifiers: Modifiers },
    PointerMove { pos: Pos2, modifiers: Modifiers },
    PointerUp { pos: Pos2, modifiers: Modifiers },
    DoubleClick { pos: Pos2 },
    /// The pointer left the canvas while a button was held
    PointerLeave,
    KeyDown { key: Key, modifiers: Modifiers },
}

/// The slice of one egui frame's input the canvas cares about
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointerFrame {
    /// Pointer position in screen coordinates
    pub hover: Option<Pos2>,
    pub pressed: bool,
    pub released: bool,
    pub double_clicked: bool,
    pub modifiers: Modifiers,
    pub keys: Vec<Key>,
}

impl PointerFrame {
    pub fn from_input(input: &egui::InputState) -> Self {
        let keys = input
            .events
            .iter()
            .filter_map(|event| match event {
                egui::Event::Key {
                    key,
                    pressed: true,
                    repeat: false,
                    ..
                } => Some(*key),
                _ => None,
            })
            .collect();
        Self {
            hover: input.pointer.hover_pos(),
            pressed: input.pointer.button_pressed(PointerButton::Primary),
            released: input.pointer.button_released(PointerButton::Primary),
            double_clicked: input.pointer.button_double_clicked(PointerButton::Primary),
            modifiers: input.modifiers,
            keys,
        }
    }
}

/// Handles converting raw egui input into canvas InputEvents
#[derive(Debug, Clone)]
pub struct InputHandler {
    canvas_rect: Rect,
    last_pos: Option<Pos2>,
    /// A press started on the canvas and has not been released yet
    dragging: bool,
}

impl InputHandler {
    pub fn new(canvas_rect: Rect) -> Self {
        Self {
            canvas_rect,
            last_pos: None,
            dragging: false,
        }
    }

    /// Update the canvas rectangle (e.g. if window is resized)
    pub fn set_canvas_rect(&mut self, rect: Rect) {
        self.canvas_rect = rect;
    }

    pub fn canvas_rect(&self) -> Rect {
        self.canvas_rect
    }

    /// Process raw egui input and generate canvas events
    pub fn process_input(&mut self, ctx: &Context) -> Vec<InputEvent> {
        let frame = ctx.input(PointerFrame::from_input);
        self.translate(&frame)
    }

    pub fn translate(&mut self, frame: &PointerFrame) -> Vec<InputEvent> {
        let mut events = Vec::new();
        let modifiers = frame.modifiers;
        let inside = frame.hover.is_some_and(|p| self.canvas_rect.contains(p));
        let local = frame.hover.map(|p| (p - self.canvas_rect.min).to_pos2());

        if let Some(pos) = local {
            if frame.pressed && inside {
                self.dragging = true;
                events.push(InputEvent::PointerDown { pos, modifiers });
            } else if Some(pos) != self.last_pos {
                if inside {
                    events.push(InputEvent::PointerMove { pos, modifiers });
                } else if self.dragging {
                    self.dragging = false;
                    events.push(InputEvent::PointerLeave);
                }
            }
            if frame.double_clicked && inside {
                events.push(InputEvent::DoubleClick { pos });
            }
        } else if self.dragging {
            self.dragging = false;
            events.push(InputEvent::PointerLeave);
        }

        if frame.released && self.dragging {
            self.dragging = false;
            if let Some(pos) = local.or(self.last_pos) {
                events.push(InputEvent::PointerUp { pos, modifiers });
            }
        }

        for key in &frame.keys {
            events.push(InputEvent::KeyDown { key: *key, modifiers });
        }

        self.last_pos = local;
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    fn handler() -> InputHandler {
        InputHandler::new(Rect::from_min_max(pos2(100.0, 50.0), pos2(300.0, 250.0)))
    }

    fn at(x: f32, y: f32) -> PointerFrame {
        PointerFrame {
            hover: Some(pos2(x, y)),
            ..PointerFrame::default()
        }
    }

    #[test]
    fn positions_are_canvas_relative() {
        let mut input = handler();
        let events = input.translate(&PointerFrame {
            pressed: true,
            ..at(110.0, 60.0)
        });
        assert_eq!(
            events,
            vec![InputEvent::PointerDown {
                pos: pos2(10.0, 10.0),
                modifiers: Modifiers::NONE
            }]
        );
    }

    #[test]
    fn press_move_release_sequence() {
        let mut input = handler();
        input.translate(&PointerFrame {
            pressed: true,
            ..at(110.0, 60.0)
        });
        let moved = input.translate(&at(120.0, 70.0));
        assert!(matches!(moved[..], [InputEvent::PointerMove { .. }]));
        let released = input.translate(&PointerFrame {
            released: true,
            ..at(120.0, 70.0)
        });
        assert!(matches!(released[..], [InputEvent::PointerUp { .. }]));
    }

    #[test]
    fn leaving_mid_drag_emits_leave_once() {
        let mut input = handler();
        input.translate(&PointerFrame {
            pressed: true,
            ..at(110.0, 60.0)
        });
        assert_eq!(input.translate(&at(10.0, 10.0)), vec![InputEvent::PointerLeave]);
        let released = input.translate(&PointerFrame {
            released: true,
            ..at(10.0, 10.0)
        });
        assert!(released.is_empty());
    }

    #[test]
    fn presses_outside_the_canvas_are_ignored() {
        let mut input = handler();
        let events = input.translate(&PointerFrame {
            pressed: true,
            ..at(10.0, 10.0)
        });
        assert!(events.is_empty());
    }

    #[test]
    fn keys_are_forwarded() {
        let mut input = handler();
        let events = input.translate(&PointerFrame {
            keys: vec![Key::Escape],
            ..PointerFrame::default()
        });
        assert_eq!(
            events,
            vec![InputEvent::KeyDown {
                key: Key::Escape,
                modifiers: Modifiers::NONE
            }]
        );
    }
}
