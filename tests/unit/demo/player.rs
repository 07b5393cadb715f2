use super::*;
use crate::schedule::rate::RateMode;
use crate::schedule::scheduler::SchedulerState;

#[test]
fn default_layout_is_chunk_aligned() {
    let layout = overlay_layout(SurfaceDesc::default(), 8);
    let rects: Vec<Rect> = layout.iter().map(|(_, r)| *r).collect();
    assert_eq!(layout.len(), 5);
    assert_eq!(layout[0].0, OverlayElement::Panel);
    assert_eq!(rects[0], Rect::new(20, 300, 440, 40));
    assert_eq!(rects[1], Rect::new(32, 312, 16, 16));
    assert_eq!(rects[3], Rect::new(88, 312, 16, 16));
    assert_eq!(rects[4], Rect::new(116, 316, 328, 8));
    for r in rects {
        assert_eq!(r.w % 8, 0);
        assert_eq!(r.h % 8, 0);
    }
}

#[test]
fn coarse_chunks_still_tile() {
    for (_, r) in overlay_layout(SurfaceDesc::default(), 16) {
        assert_eq!((r.w % 16, r.h % 16), (0, 0));
        assert!(r.fits_within(480, 360));
    }
}

#[test]
fn tiny_buffers_get_no_overlay() {
    assert!(overlay_layout(SurfaceDesc::new(32, 32).unwrap(), 8).is_empty());
}

#[test]
fn seek_bar_fills_to_progress() {
    let bar = seek_bar_surface(16, 8, 0.5).unwrap();
    assert_eq!(bar.pixel(7, 0), Some(Rgba8::WHITE));
    assert_eq!(bar.pixel(8, 0), Some(TROUGH));
}

fn small_player(kind: ManagerKind, sink: Option<ScanoutSink>) -> VideoPlayer {
    let desc = SurfaceDesc::new(160, 120).unwrap();
    let frames = ImageSequence::synthetic("rr", 3, desc).unwrap();
    VideoPlayer::new(
        kind,
        desc,
        8,
        sink,
        frames,
        RateControl::new(10_000, RateMode::ChunksPerTick),
        Keymap::player(33),
    )
    .unwrap()
}

#[test]
fn sequence_is_video_then_overlay() {
    let p = small_player(ManagerKind::Single, None);
    let titles: Vec<&str> = p.scheduler().sequence().ops().iter().map(|op| op.title()).collect();
    assert_eq!(
        titles,
        ["Video Frame", "Overlay Panel", "Prev Button", "Pause Button", "Next Button", "Seek Bar"]
    );
}

#[test]
fn keys_drive_the_scheduler_and_trail() {
    let mut p = small_player(ManagerKind::AlwaysAllocate, None);
    assert!(p.handle_key('q'));
    assert_eq!(p.scheduler().state(), SchedulerState::Activating);
    assert!(p.handle_key('e'));
    assert_eq!(p.scheduler().rate(), 10_000 - 33);
    assert!(p.handle_key('z'));
    assert!(!p.trail().is_enabled());
    assert!(!p.handle_key('o'));
}

#[test]
fn finished_frames_reach_the_sink_and_advance_the_video() {
    let sink = ScanoutSink::new();
    let mut p = small_player(ManagerKind::NBuffer { count: 2 }, Some(sink.clone()));
    p.handle_key('q');
    let ops = p.scheduler().sequence().len() as u64;
    for _ in 0..ops {
        p.tick(Duration::from_millis(16));
    }
    assert_eq!(p.scheduler().stats().frames_completed, 1);
    assert_eq!(p.frames().current_frame(), 3);
    let shown = sink.snapshot().unwrap();
    assert_eq!(shown.pixel(20, 60), Some(PANEL));
    assert!(!p.trail().is_empty());
}
