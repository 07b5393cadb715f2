use super::*;
use crate::foundation::core::SurfaceDesc;

fn image_source() -> Source {
    Source::image(PixelSurface::new(SurfaceDesc::new(8, 8).unwrap()))
}

#[test]
fn ready_source_fires_once() {
    let mut p = PendingSource::ready(image_source());
    assert!(matches!(p.poll(), SourcePoll::Ready(Some(_))));
    assert!(matches!(p.poll(), SourcePoll::Ready(None)));
}

#[test]
fn delayed_source_stays_pending_for_its_turns() {
    let mut p = PendingSource::delayed(2, Some(image_source()));
    assert!(matches!(p.poll(), SourcePoll::Pending));
    assert!(matches!(p.poll(), SourcePoll::Pending));
    assert!(matches!(p.poll(), SourcePoll::Ready(Some(_))));
}

#[test]
fn promise_resolves_when_fulfilled() {
    let (mut p, resolver) = PendingSource::promise();
    assert!(matches!(p.poll(), SourcePoll::Pending));
    assert!(matches!(p.poll(), SourcePoll::Pending));
    resolver.fulfill(Some(image_source()));
    assert!(matches!(p.poll(), SourcePoll::Ready(Some(_))));
}

#[test]
fn dropped_resolver_means_unavailable() {
    let (mut p, resolver) = PendingSource::promise();
    drop(resolver);
    assert!(matches!(p.poll(), SourcePoll::Ready(None)));
}

#[test]
fn surface_source_aliases_only_its_own_buffer() {
    let a = PixelSurface::new_shared(SurfaceDesc::new(8, 8).unwrap());
    let b = PixelSurface::new_shared(SurfaceDesc::new(8, 8).unwrap());
    let src = Source::Surface(Rc::clone(&a));
    assert!(src.aliases(&a));
    assert!(!src.aliases(&b));
    assert!(!image_source().aliases(&a));
    assert_eq!(src.id(), a.borrow().id());
    assert_eq!(src.size(), (8, 8));
}

#[test]
fn closures_are_suppliers() {
    let mut calls = 0;
    let mut supplier = || {
        calls += 1;
        PendingSource::unavailable()
    };
    let mut p = SurfaceSupplier::request_source(&mut supplier);
    assert!(matches!(p.poll(), SourcePoll::Ready(None)));
    drop(supplier);
    assert_eq!(calls, 1);
}
