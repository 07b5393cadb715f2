use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::buffers::{ManagerKind, create_buffer_manager};
use crate::draw::operation::DrawOperation;
use crate::foundation::core::{BufferId, Rect, Rgba8, SurfaceDesc};
use crate::schedule::rate::RateMode;
use crate::scanout::ScanoutSink;
use crate::surface::pixel::PixelSurface;
use crate::surface::source::{PendingSource, Source};

fn solid(w: u32, h: u32, color: Rgba8) -> Source {
    let mut s = PixelSurface::new(SurfaceDesc::new(w, h).unwrap());
    s.fill_rect(Rect::from_size(w, h), color).unwrap();
    Source::image(s)
}

fn two_op_scheduler(kind: ManagerKind, rate: u32, sink: Option<ScanoutSink>) -> DrawScheduler {
    let desc = SurfaceDesc::new(16, 16).unwrap();
    let manager = create_buffer_manager(kind, desc, sink).unwrap();
    let red = solid(16, 16, Rgba8::opaque(255, 0, 0));
    let blue = solid(16, 8, Rgba8::opaque(0, 0, 255));
    let seq = DrawSequence::new(vec![
        DrawOperation::from_source("background", Rect::from_size(16, 16), 8, red).unwrap(),
        DrawOperation::from_source("band", Rect::new(0, 8, 16, 8), 8, blue).unwrap(),
    ]);
    DrawScheduler::new(manager, seq, RateControl::new(rate, RateMode::ChunksPerTick))
}

const DT: Duration = Duration::from_millis(16);

#[test]
fn draw_once_defers_activation_to_next_tick() {
    let mut s = two_op_scheduler(ManagerKind::Single, 2, None);
    assert_eq!(s.state(), SchedulerState::Idle);
    assert!(s.draw_once());
    assert_eq!(s.state(), SchedulerState::Activating);
    assert_eq!(s.stats().chunks_drawn, 0);
    assert!(s.progress().is_none());

    assert_eq!(s.tick(DT), TickOutcome::Drawing { chunks: 2 });
    let p = s.progress().unwrap();
    assert_eq!((p.op_index, p.title.as_str()), (0, "background"));
    assert_eq!((p.chunks_done, p.chunks_total), (2, 4));

    assert_eq!(s.tick(DT), TickOutcome::OpCompleted { chunks: 2 });
    assert_eq!(s.state(), SchedulerState::Idle);
    assert_eq!(s.stats().ops_completed, 1);
}

#[test]
fn draw_once_is_ignored_while_busy() {
    let mut s = two_op_scheduler(ManagerKind::Single, 1, None);
    assert!(s.draw_once());
    assert!(!s.draw_once());
    s.tick(DT);
    assert!(!s.draw_once());
    assert_eq!(s.sequence().current_index(), Some(0));
}

#[test]
fn idle_ticks_do_nothing() {
    let mut s = two_op_scheduler(ManagerKind::Single, 4, None);
    assert_eq!(s.tick(DT), TickOutcome::Idle);
    assert_eq!(s.stats().ticks, 1);
    assert_eq!(s.stats().buffers_fetched, 0);
}

#[test]
fn auto_runs_whole_sequence_and_refetches_on_wrap() {
    let mut s = two_op_scheduler(ManagerKind::AlwaysAllocate, 4, None);
    s.toggle_auto();
    assert!(s.is_auto());
    assert_eq!(s.state(), SchedulerState::Activating);
    let first = s.destination().unwrap().borrow().id();

    // Background: 4 chunks; band: 2 chunks.
    assert_eq!(s.tick(DT), TickOutcome::OpCompleted { chunks: 4 });
    assert_eq!(s.state(), SchedulerState::Activating);
    assert_eq!(s.tick(DT), TickOutcome::OpCompleted { chunks: 2 });

    let stats = s.stats();
    assert_eq!(stats.frames_completed, 1);
    assert_eq!(stats.buffers_fetched, 2);
    assert_eq!(stats.chunks_drawn, 6);
    let second = s.destination().unwrap().borrow().id();
    assert_ne!(first, second);
    assert_eq!(s.manager().current_scanout().unwrap().borrow().id(), first);
}

#[test]
fn finished_frame_has_ops_composited_in_order() {
    let sink = ScanoutSink::new();
    let mut s = two_op_scheduler(ManagerKind::NBuffer { count: 2 }, 100, Some(sink.clone()));
    s.set_auto(true);
    for _ in 0..2 {
        s.tick(DT);
    }
    let shown = sink.snapshot().unwrap();
    assert_eq!(shown.pixel(0, 0), Some(Rgba8::opaque(255, 0, 0)));
    assert_eq!(shown.pixel(15, 15), Some(Rgba8::opaque(0, 0, 255)));
}

#[test]
fn zero_rate_pauses_mid_blit() {
    let mut s = two_op_scheduler(ManagerKind::Single, 1, None);
    s.draw_once();
    s.tick(DT);
    s.dec_rate(5);
    assert_eq!(s.rate(), 0);
    for _ in 0..3 {
        assert_eq!(s.tick(DT), TickOutcome::Drawing { chunks: 0 });
    }
    assert_eq!(s.progress().unwrap().chunks_done, 1);
    s.inc_rate(3);
    assert_eq!(s.tick(DT), TickOutcome::OpCompleted { chunks: 3 });
}

#[test]
fn unavailable_source_skips_and_returns_to_idle() {
    let desc = SurfaceDesc::new(16, 16).unwrap();
    let manager = create_buffer_manager(ManagerKind::Single, desc, None).unwrap();
    let seq = DrawSequence::new(vec![
        DrawOperation::new("missing", Rect::from_size(16, 16), PendingSource::unavailable)
            .unwrap(),
    ]);
    let mut s = DrawScheduler::new(manager, seq, RateControl::default());
    s.draw_once();
    assert_eq!(s.tick(DT), TickOutcome::OpSkipped);
    assert_eq!(s.state(), SchedulerState::Idle);
    assert_eq!(s.stats().ops_skipped, 1);
    assert_eq!(s.stats().chunks_drawn, 0);
}

#[test]
fn delayed_source_keeps_activating() {
    let desc = SurfaceDesc::new(8, 8).unwrap();
    let manager = create_buffer_manager(ManagerKind::Single, desc, None).unwrap();
    let src = solid(8, 8, Rgba8::WHITE);
    let seq = DrawSequence::new(vec![
        DrawOperation::new("slow", Rect::from_size(8, 8), move || {
            PendingSource::delayed(2, Some(src.clone()))
        })
        .unwrap(),
    ]);
    let mut s = DrawScheduler::new(manager, seq, RateControl::default());
    s.draw_once();
    assert_eq!(s.tick(DT), TickOutcome::Activating);
    assert_eq!(s.tick(DT), TickOutcome::Activating);
    assert_eq!(s.tick(DT), TickOutcome::OpCompleted { chunks: 1 });
}

#[derive(Default)]
struct Recorder(Vec<(BufferId, Rect)>);

impl ChunkObserver for Recorder {
    fn chunk_modified(&mut self, buffer: BufferId, rect: Rect) {
        self.0.push((buffer, rect));
    }
}

#[test]
fn observer_sees_every_chunk() {
    let rec = Rc::new(RefCell::new(Recorder::default()));
    let mut s = two_op_scheduler(ManagerKind::Single, 8, None);
    s.set_observer(Rc::clone(&rec));
    s.draw_once();
    s.tick(DT);
    let seen = &rec.borrow().0;
    assert_eq!(seen.len(), 4);
    assert_eq!(seen[3].1, Rect::new(8, 8, 8, 8));
}

#[test]
fn commands_map_onto_operations() {
    let mut s = two_op_scheduler(ManagerKind::Single, 10, None);
    s.apply(Command::IncRate(33));
    assert_eq!(s.rate(), 43);
    s.apply(Command::DecRate(50));
    assert_eq!(s.rate(), 0);
    s.apply(Command::DrawOnce);
    assert_eq!(s.state(), SchedulerState::Activating);
    s.apply(Command::ToggleAuto);
    assert!(s.is_auto());
    s.apply(Command::ToggleAuto);
    assert!(!s.is_auto());
}

#[test]
fn empty_sequence_never_starts() {
    let desc = SurfaceDesc::new(8, 8).unwrap();
    let manager = create_buffer_manager(ManagerKind::Single, desc, None).unwrap();
    let mut s = DrawScheduler::new(manager, DrawSequence::default(), RateControl::default());
    assert!(!s.draw_once());
    s.toggle_auto();
    assert_eq!(s.state(), SchedulerState::Idle);
    assert_eq!(s.stats().buffers_fetched, 0);
}
