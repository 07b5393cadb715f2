use super::*;

fn desc() -> SurfaceDesc {
    SurfaceDesc::new(16, 16).unwrap()
}

#[test]
fn sink_points_at_the_buffer_from_construction() {
    let sink = ScanoutSink::new();
    let m = SingleBufferManager::new(desc(), Some(sink.clone()));
    let scanout = sink.scanout_buffer().unwrap();
    assert!(Rc::ptr_eq(&scanout, m.buffer()));
    assert_eq!(m.buffer_roles()[0].1, BufferRole::Scanout);
    assert!(m.render_buffer().is_none());
}

#[test]
fn every_fetch_returns_the_same_aliased_buffer() {
    let sink = ScanoutSink::new();
    let mut m = SingleBufferManager::new(desc(), Some(sink.clone()));
    let a = m.fetch_next_destination_buffer();
    let b = m.fetch_next_destination_buffer();
    assert!(Rc::ptr_eq(&a, &b));
    assert!(Rc::ptr_eq(&a, &sink.scanout_buffer().unwrap()));
    assert_eq!(sink.promotions(), 1);
    assert_eq!(m.buffer_roles(), vec![(a.borrow().id(), BufferRole::Aliased)]);

    let st = m.stats();
    assert_eq!(st.allocated_surfaces, 1);
    assert_eq!(st.fetches, 2);
}

#[test]
fn tolerates_missing_sink() {
    let mut m = SingleBufferManager::new(desc(), None);
    let a = m.fetch_next_destination_buffer();
    assert!(Rc::ptr_eq(&a, &m.current_scanout().unwrap()));
    assert_eq!(m.stats().promotions, 0);
}
