use eframe_sketch::history::{DEFAULT_HISTORY_LIMIT, History};
use eframe_sketch::surface::{Brush, Surface};
use egui::{Color32, pos2};

// Paints a distinct diagonal dab per step so every state differs
fn paint_step(surface: &mut Surface, step: usize) {
    let at = pos2(2.0 + step as f32 * 3.0, 2.0 + step as f32 * 2.0);
    surface.stroke_segment(at, at, &Brush::new(Color32::RED, 2.0));
}

#[test]
fn test_n_commits_then_n_undos_restore_original() {
    let mut history = History::default();
    let mut surface = Surface::new(64, 64);
    surface.clear(Color32::WHITE);
    let original = surface.clone();

    let n = 10;
    for step in 0..n {
        history.commit(&surface);
        paint_step(&mut surface, step);
    }
    assert_ne!(surface, original);

    for _ in 0..n {
        assert!(history.undo(&mut surface));
    }

    assert_eq!(surface, original);
    assert_eq!(history.redo_len(), n);
    assert_eq!(history.undo_len(), 0);
}

#[test]
fn test_undo_then_redo_walks_forward_in_order() {
    let mut history = History::default();
    let mut surface = Surface::new(32, 32);
    let mut states = vec![surface.clone()];

    for step in 0..4 {
        history.commit(&surface);
        paint_step(&mut surface, step);
        states.push(surface.clone());
    }

    for expected in states.iter().rev().skip(1) {
        history.undo(&mut surface);
        assert_eq!(&surface, expected);
    }
    for expected in states.iter().skip(1) {
        history.redo(&mut surface);
        assert_eq!(&surface, expected);
    }
    assert!(!history.can_redo());
}

#[test]
fn test_commit_after_undo_discards_future() {
    let mut history = History::default();
    let mut surface = Surface::new(16, 16);

    for step in 0..3 {
        history.commit(&surface);
        paint_step(&mut surface, step);
    }
    history.undo(&mut surface);
    history.undo(&mut surface);
    assert_eq!(history.redo_len(), 2);

    history.commit(&surface);
    assert_eq!(history.redo_len(), 0);

    let before = surface.clone();
    assert!(!history.redo(&mut surface));
    assert_eq!(surface, before);
}

#[test]
fn test_undo_stack_never_exceeds_limit() {
    let mut history = History::default();
    let mut surface = Surface::new(8, 8);
    let first = surface.clone();

    for step in 0..(DEFAULT_HISTORY_LIMIT + 25) {
        history.commit(&surface);
        surface.clear(Color32::from_gray((step % 256) as u8));
        assert!(history.undo_len() <= DEFAULT_HISTORY_LIMIT);
    }
    assert_eq!(history.undo_len(), DEFAULT_HISTORY_LIMIT);

    // Oldest entries went first, so the blank starting state can't be reached
    while history.undo(&mut surface) {}
    assert_ne!(surface, first);
    assert_eq!(surface.pixel(0, 0), Color32::from_gray(24));
}

#[test]
fn test_restore_on_empty_history_changes_nothing() {
    let mut history = History::default();
    let mut surface = Surface::new(8, 8);
    paint_step(&mut surface, 0);
    let before = surface.clone();

    assert!(!history.undo(&mut surface));
    assert!(!history.redo(&mut surface));
    assert_eq!(surface, before);
    assert_eq!((history.undo_len(), history.redo_len()), (0, 0));
}
