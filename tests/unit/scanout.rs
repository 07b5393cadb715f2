use super::*;
use crate::foundation::core::SurfaceDesc;

#[test]
fn clones_share_the_scanout_slot() {
    let sink = ScanoutSink::new();
    let reader = sink.clone();
    assert!(reader.scanout_buffer().is_none());

    let buf = PixelSurface::new_shared(SurfaceDesc::new(8, 8).unwrap());
    sink.set_scanout_buffer(&buf);

    let seen = reader.scanout_buffer().unwrap();
    assert!(Rc::ptr_eq(&seen, &buf));
    assert_eq!(reader.scanout_id(), Some(buf.borrow().id()));
    assert_eq!(reader.promotions(), 1);
}

#[test]
fn sink_does_not_keep_buffers_alive() {
    let sink = ScanoutSink::new();
    let buf = PixelSurface::new_shared(SurfaceDesc::new(8, 8).unwrap());
    sink.set_scanout_buffer(&buf);
    drop(buf);
    assert!(sink.scanout_buffer().is_none());
    assert!(sink.scanout_id().is_none());
    assert!(sink.snapshot().is_none());
}

#[test]
fn dropping_the_manager_clears_what_the_sink_resolves() {
    use crate::buffers::{ManagerKind, create_buffer_manager};

    let sink = ScanoutSink::new();
    let mut manager = create_buffer_manager(
        ManagerKind::NBuffer { count: 2 },
        SurfaceDesc::new(8, 8).unwrap(),
        Some(sink.clone()),
    )
    .unwrap();
    manager.fetch_next_destination_buffer();
    manager.fetch_next_destination_buffer();
    assert!(sink.scanout_buffer().is_some());
    let promoted = sink.promotions();

    drop(manager);
    assert!(sink.scanout_buffer().is_none());
    assert!(sink.snapshot().is_none());
    assert_eq!(sink.promotions(), promoted);
}
