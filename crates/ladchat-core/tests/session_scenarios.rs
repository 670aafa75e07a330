//! End-to-end edit session scenarios.

use kurbo::{Point, Vec2};
use ladchat_core::{
    CapturedMedia, EditMode, EditSession, EditorConfig, ExportOutcome, FilterKind,
    FilterSelection, MediaRef, PaletteColor, PointerEvent,
};
use std::sync::Arc;

const WIDTH: f64 = 400.0;
const HEIGHT: f64 = 1000.0;

fn config() -> Arc<EditorConfig> {
    Arc::new(EditorConfig::with_frame(WIDTH, HEIGHT))
}

fn photo_session() -> EditSession {
    EditSession::new(CapturedMedia::photo(MediaRef::new("/tmp/snap.jpg")), config())
}

fn video_session() -> EditSession {
    EditSession::new(CapturedMedia::video(MediaRef::new("/tmp/clip.mp4")), config())
}

fn add_caption(session: &mut EditSession, text: &str) -> ladchat_core::CaptionId {
    session.enter_mode(EditMode::Caption);
    let id = session.submit_caption(text).expect("caption should be added");
    session.done();
    id
}

fn stroke(session: &mut EditSession, points: &[Point]) {
    let (first, rest) = points.split_first().unwrap();
    session.handle_pointer(PointerEvent::Down { position: *first });
    for p in rest {
        session.handle_pointer(PointerEvent::Move { position: *p });
    }
    session.handle_pointer(PointerEvent::Up {
        position: *points.last().unwrap(),
    });
}

fn drag(session: &mut EditSession, from: Point, to: Point) {
    session.handle_pointer(PointerEvent::Down { position: from });
    session.handle_pointer(PointerEvent::Move { position: from.midpoint(to) });
    session.handle_pointer(PointerEvent::Move { position: to });
    session.handle_pointer(PointerEvent::Up { position: to });
}

#[test]
fn caption_with_emoji_dragged_far_out_is_clamped() {
    let mut session = photo_session();
    let id = add_caption(&mut session, "Lads 🔥");

    let caption = session.overlays().caption(id).unwrap();
    assert_eq!(caption.text, "Lads 🔥");
    assert_eq!(caption.color, PaletteColor::White);
    assert!(caption.has_background);

    // Grab the caption and travel (400, 500), the distance from (100,100) to (500,600).
    let start = caption.position;
    drag(&mut session, start, start + Vec2::new(400.0, 500.0));

    let captions = session.overlays().captions();
    assert_eq!(captions.len(), 1);
    assert_eq!(captions[0].position, Point::new(WIDTH - 60.0, HEIGHT * 0.7 - 60.0));
}

#[test]
fn direct_position_update_is_clamped() {
    let mut session = photo_session();
    let id = add_caption(&mut session, "Lads 🔥");
    let mut overlays = session.overlays().clone();
    let committed = overlays.update_caption_position(id, 500.0, 600.0).unwrap();
    assert!(committed.x <= WIDTH - 60.0);
    assert!(committed.y <= HEIGHT * 0.7 - 60.0);
    assert_eq!(committed, Point::new(340.0, 600.0));
}

#[test]
fn drags_in_every_direction_stay_in_bounds() {
    let mut session = photo_session();
    let id = add_caption(&mut session, "bounded");
    let bounds = session.config().caption_bounds();

    let targets = [
        Point::new(-5000.0, -5000.0),
        Point::new(5000.0, -20.0),
        Point::new(-20.0, 5000.0),
        Point::new(9999.0, 9999.0),
        Point::new(200.0, 300.0),
    ];
    for target in targets {
        let from = session.overlays().caption(id).unwrap().position;
        drag(&mut session, from, target);
        let pos = session.overlays().caption(id).unwrap().position;
        assert!(pos.x >= bounds.x0 && pos.x <= bounds.x1, "{:?}", pos);
        assert!(pos.y >= bounds.y0 && pos.y <= bounds.y1, "{:?}", pos);
    }
}

#[test]
fn three_strokes_two_undos_leaves_first() {
    let mut session = photo_session();
    session.enter_mode(EditMode::Draw);

    stroke(&mut session, &[Point::new(10.0, 10.0), Point::new(20.0, 20.0)]);
    let first = session.overlays().drawings()[0].id();
    session.set_draw_color(PaletteColor::Blue);
    stroke(&mut session, &[Point::new(30.0, 30.0), Point::new(40.0, 40.0)]);
    stroke(&mut session, &[Point::new(50.0, 50.0), Point::new(60.0, 60.0)]);
    assert_eq!(session.overlays().drawings().len(), 3);

    assert!(session.undo_last_drawing());
    assert!(session.undo_last_drawing());

    let drawings = session.overlays().drawings();
    assert_eq!(drawings.len(), 1);
    assert_eq!(drawings[0].id(), first);
    assert_eq!(drawings[0].color, PaletteColor::Red);
    assert_eq!(drawings[0].path_data(), "M10,10 L20,20");
}

#[test]
fn undo_on_empty_is_noop() {
    let mut session = photo_session();
    assert!(!session.undo_last_drawing());
}

#[test]
fn single_tap_in_draw_mode_makes_a_dot() {
    let mut session = photo_session();
    session.enter_mode(EditMode::Draw);
    stroke(&mut session, &[Point::new(100.0, 100.0)]);
    assert_eq!(session.overlays().drawings().len(), 1);
    assert_eq!(session.overlays().drawings()[0].len(), 1);
}

#[test]
fn stroke_starting_below_preview_is_ignored() {
    let mut session = photo_session();
    session.enter_mode(EditMode::Draw);
    stroke(&mut session, &[Point::new(100.0, 900.0), Point::new(100.0, 100.0)]);
    assert!(session.overlays().drawings().is_empty());
}

#[test]
fn sepia_on_photo_rejected_on_video() {
    let mut photo = photo_session();
    let mut video = video_session();

    photo.enter_mode(EditMode::Filter);
    assert_eq!(
        photo.select_filter(Some(FilterKind::Sepia)),
        FilterSelection::Applied(FilterKind::Sepia)
    );
    assert_eq!(
        video.select_filter(Some(FilterKind::Sepia)),
        FilterSelection::RejectedForVideo
    );

    assert_eq!(photo.active_filter(), Some(FilterKind::Sepia));
    assert_eq!(video.active_filter(), None);
}

#[test]
fn clear_all_after_confirmation_empties_everything() {
    let mut session = photo_session();
    add_caption(&mut session, "one");
    add_caption(&mut session, "two");
    session.enter_mode(EditMode::Draw);
    stroke(&mut session, &[Point::new(10.0, 10.0), Point::new(20.0, 20.0)]);
    session.done();
    session.select_filter(Some(FilterKind::Vintage));

    assert_eq!(session.overlays().captions().len(), 2);
    assert_eq!(session.overlays().drawings().len(), 1);

    assert!(session.request_clear_all());
    assert!(session.confirm_clear_all());

    assert!(session.overlays().captions().is_empty());
    assert!(session.overlays().drawings().is_empty());
    assert_eq!(session.active_filter(), None);
}

#[test]
fn caption_tap_without_drag_commits_nothing() {
    let mut session = photo_session();
    let id = add_caption(&mut session, "tap");
    let start = session.overlays().caption(id).unwrap().position;

    drag(&mut session, start, start + Vec2::new(1.5, -1.5));
    assert_eq!(session.overlays().caption(id).unwrap().position, start);
}

#[test]
fn captions_not_draggable_in_draw_mode() {
    let mut session = photo_session();
    let id = add_caption(&mut session, "static");
    let start = session.overlays().caption(id).unwrap().position;

    session.enter_mode(EditMode::Draw);
    drag(&mut session, start, start + Vec2::new(50.0, 50.0));
    assert_eq!(session.overlays().caption(id).unwrap().position, start);
    assert_eq!(session.overlays().drawings().len(), 1);
}

#[test]
fn save_hands_off_all_edits() {
    let mut session = photo_session();
    add_caption(&mut session, "hello");
    session.select_filter(Some(FilterKind::CoolTone));

    let request = session.begin_save().unwrap();
    assert!(request.has_overlays());
    assert_eq!(request.captions.len(), 1);
    assert_eq!(request.filter, Some(FilterKind::CoolTone));

    let edited = session
        .complete_save(ExportOutcome::baked(MediaRef::new("/tmp/edited_1.jpg")))
        .unwrap();
    assert_eq!(edited.media, MediaRef::new("/tmp/edited_1.jpg"));
    assert_eq!(edited.caption_text(), "hello");
    assert_eq!(edited.filter, Some(FilterKind::CoolTone));
    assert!(edited.warning.is_none());

    let json = serde_json::to_value(&edited).unwrap();
    assert_eq!(json["media"], "/tmp/edited_1.jpg");
    assert_eq!(json["media_type"], "photo");
    session.close();
}
