use super::*;

fn desc() -> SurfaceDesc {
    SurfaceDesc::new(16, 8).unwrap()
}

#[test]
fn first_fetch_promotes_nothing() {
    let sink = ScanoutSink::new();
    let mut m = AlwaysAllocateBufferManager::new(desc(), Some(sink.clone()));
    let first = m.fetch_next_destination_buffer();
    assert!(sink.scanout_buffer().is_none());
    assert!(m.current_scanout().is_none());
    assert!(Rc::ptr_eq(&first, &m.render_buffer().unwrap()));
}

#[test]
fn k_fetches_allocate_k_buffers_with_one_render() {
    let sink = ScanoutSink::new();
    let mut m = AlwaysAllocateBufferManager::new(desc(), Some(sink.clone()));
    let mut handed_out = Vec::new();
    for _ in 0..5 {
        handed_out.push(m.fetch_next_destination_buffer());
    }

    let st = m.stats();
    assert_eq!(st.allocated_surfaces, 5);
    assert_eq!(st.allocated_bytes, 5 * 16 * 8 * 4);
    assert_eq!(st.promotions, 4);

    let roles = m.buffer_roles();
    assert_eq!(roles.len(), 5);
    assert_eq!(
        roles.iter().filter(|(_, r)| *r == BufferRole::Render).count(),
        1
    );
    assert_eq!(
        roles
            .iter()
            .filter(|(_, r)| matches!(r, BufferRole::Scanout | BufferRole::Retired))
            .count(),
        4
    );
    let ids: Vec<BufferId> = roles.iter().map(|(id, _)| *id).collect();
    let expected: Vec<BufferId> = handed_out.iter().map(|b| b.borrow().id()).collect();
    assert_eq!(ids, expected);
    assert_eq!(roles[3].1, BufferRole::Scanout);
    assert_eq!(roles[4].1, BufferRole::Render);
}

#[test]
fn scanout_is_previous_render_and_never_the_new_one() {
    let sink = ScanoutSink::new();
    let mut m = AlwaysAllocateBufferManager::new(desc(), Some(sink.clone()));
    let mut prev = m.fetch_next_destination_buffer();
    for _ in 0..4 {
        let next = m.fetch_next_destination_buffer();
        let scanout = sink.scanout_buffer().unwrap();
        assert!(Rc::ptr_eq(&scanout, &prev));
        assert!(!Rc::ptr_eq(&scanout, &next));
        prev = next;
    }
    assert_eq!(m.scanout_pile().len(), 4);
}

#[test]
fn tolerates_missing_sink() {
    let mut m = AlwaysAllocateBufferManager::new(desc(), None);
    let a = m.fetch_next_destination_buffer();
    let _b = m.fetch_next_destination_buffer();
    assert!(Rc::ptr_eq(&a, &m.current_scanout().unwrap()));
}
