use egui::{Modifiers, Pos2, pos2};
use sketchpad::{DrawingSession, ToolId};

fn session() -> DrawingSession {
    DrawingSession::with_size(100.0, 100.0).expect("session")
}

fn drag(session: &mut DrawingSession, from: Pos2, to: Pos2) {
    session.pointer_down(from, Modifiers::NONE);
    session.pointer_move(to, Modifiers::NONE);
    session.pointer_up(to, Modifiers::NONE);
}

/// Draws `count` filled boxes at different spots, one commit each.
fn draw_boxes(session: &mut DrawingSession, count: usize) {
    session.set_tool(ToolId::Rectangle);
    session.set_fill_mode(true);
    for i in 0..count {
        let offset = (i % 9) as f32 * 10.0;
        drag(session, pos2(offset, offset), pos2(offset + 8.0, offset + 8.0));
    }
}

fn committed(session: &DrawingSession) -> Vec<u8> {
    session.surface().committed().as_raw().to_vec()
}

#[test]
fn undo_then_redo_restores_the_last_commit() {
    let mut session = session();
    draw_boxes(&mut session, 5);
    let after_last = committed(&session);

    for _ in 0..4 {
        assert!(session.undo().expect("undo"));
    }
    assert_ne!(committed(&session), after_last);
    for _ in 0..4 {
        assert!(session.redo().expect("redo"));
    }
    assert_eq!(committed(&session), after_last);
    assert!(!session.can_redo());
}

#[test]
fn undo_reaches_the_blank_floor_and_stops() {
    let mut session = session();
    draw_boxes(&mut session, 2);

    assert!(session.undo().expect("undo"));
    assert!(session.undo().expect("undo"));
    assert!(session.surface().committed().is_clear());
    assert!(!session.can_undo());
    assert!(!session.undo().expect("undo"));
}

#[test]
fn history_depth_is_bounded() {
    let mut session = session();
    draw_boxes(&mut session, 25);
    assert_eq!(session.history().undo_len(), 20);

    let newest = committed(&session);
    let mut steps = 0;
    while session.undo().expect("undo") {
        steps += 1;
    }
    assert_eq!(steps, 19);
    // The oldest entries were dropped, so the floor is no longer blank
    assert!(!session.surface().committed().is_clear());

    while session.redo().expect("redo") {}
    assert_eq!(committed(&session), newest);
}

#[test]
fn a_commit_empties_redo() {
    let mut session = session();
    draw_boxes(&mut session, 3);
    session.undo().expect("undo");
    session.undo().expect("undo");
    assert_eq!(session.history().redo_len(), 2);

    drag(&mut session, pos2(50.0, 10.0), pos2(60.0, 20.0));
    assert_eq!(session.history().redo_len(), 0);
    assert!(!session.can_redo());
}

#[test]
fn clear_is_one_undoable_step() {
    let mut session = session();
    draw_boxes(&mut session, 2);
    let before = committed(&session);

    session.clear().expect("clear");
    assert!(session.surface().committed().is_clear());
    assert_eq!(session.history().undo_len(), 4);

    session.undo().expect("undo");
    assert_eq!(committed(&session), before);
}

#[test]
fn undo_after_a_density_change_keeps_logical_positions() {
    let mut session = session();
    session.set_tool(ToolId::Rectangle);
    session.set_fill_mode(true);
    drag(&mut session, pos2(60.0, 60.0), pos2(90.0, 90.0));
    drag(&mut session, pos2(30.0, 30.0), pos2(45.0, 45.0));
    assert!(session.surface().sample(pos2(37.5, 37.5)).is_some_and(|p| p[3] > 0));

    session.resize_viewport(100.0, 100.0, 2.0).expect("resize");
    assert_eq!(session.surface().width(), 200);
    assert!(session.undo().expect("undo"));

    assert_eq!(session.surface().width(), 200);
    assert!(session.surface().sample(pos2(75.0, 75.0)).is_some_and(|p| p[3] > 0));
    assert_eq!(session.surface().sample(pos2(37.5, 37.5)).map(|p| p[3]), Some(0));
}
