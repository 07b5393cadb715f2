use super::*;
use crate::buffers::ManagerKind;
use crate::schedule::clock::FixedStepSource;

fn small_cfg(manager: ManagerKind) -> SimConfig {
    SimConfig {
        width: 160,
        height: 120,
        player_rate: 400,
        monitor_rate: 400,
        frame_count: 4,
        manager,
        ..SimConfig::default()
    }
}

#[test]
fn keys_route_to_the_right_component() {
    let mut demo = Demo::synthetic(&small_cfg(ManagerKind::Single)).unwrap();
    assert!(demo.handle_key('q'));
    assert!(demo.player().scheduler().is_auto());
    assert!(!demo.monitor().scheduler().is_auto());
    assert!(demo.handle_key('o'));
    assert!(demo.monitor().scheduler().is_auto());
    assert!(!demo.handle_key('x'));
}

#[test]
fn scripted_run_presents_frames_on_the_monitor() {
    let mut demo = Demo::synthetic(&small_cfg(ManagerKind::NBuffer { count: 3 })).unwrap();
    let mut clock = FrameClock::new(FixedStepSource::from_hz(60).unwrap());
    let script = KeyScript::parse("q,10:o").unwrap();
    assert_eq!(demo.run(&mut clock, 60, &script), 60);

    let stats = demo.stats();
    assert_eq!(stats.ticks, 60);
    assert!(stats.player.frames_completed >= 2);
    assert_eq!(stats.player_buffers.allocated_surfaces, 3);
    assert!(stats.monitor.ops_completed >= 1);
    assert_eq!(stats.monitor.ops_skipped, 0);

    let shown = demo.sink().snapshot().unwrap();
    let screen = demo.monitor().screen().borrow();
    assert_eq!(screen.width(), shown.width());
}

#[test]
fn monitor_alone_skips_until_the_player_presents() {
    let mut demo = Demo::synthetic(&small_cfg(ManagerKind::AlwaysAllocate)).unwrap();
    demo.handle_key('p');
    demo.tick(Duration::ZERO);
    assert_eq!(demo.stats().monitor.ops_skipped, 1);
    assert_eq!(demo.stats().scanout_promotions, 0);
}
