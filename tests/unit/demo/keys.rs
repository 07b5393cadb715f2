use super::*;

#[test]
fn player_and_monitor_bindings() {
    let p = Keymap::player(33);
    assert_eq!(p.action('q'), Some(KeyAction::Command(Command::ToggleAuto)));
    assert_eq!(p.action('e'), Some(KeyAction::Command(Command::DecRate(33))));
    assert_eq!(p.action('z'), Some(KeyAction::ToggleTrail));
    assert_eq!(p.action('o'), None);

    let m = Keymap::monitor(27);
    assert_eq!(m.action('p'), Some(KeyAction::Command(Command::DrawOnce)));
    assert_eq!(m.action(']'), Some(KeyAction::Command(Command::IncRate(27))));
    assert_eq!(m.action(','), Some(KeyAction::ToggleTrail));
    assert_eq!(m.bindings().len(), 5);
}

#[test]
fn actions_describe_themselves() {
    assert_eq!(
        KeyAction::Command(Command::IncRate(27)).to_string(),
        "increase rate by 27"
    );
}

#[test]
fn key_script_groups_presses_by_tick() {
    let s = KeyScript::parse("qo, 40:w ,40:r,90:e").unwrap();
    assert_eq!(s.keys_at(0), &['q', 'o']);
    assert_eq!(s.keys_at(40), &['w', 'r']);
    assert_eq!(s.keys_at(90), &['e']);
    assert!(s.keys_at(1).is_empty());
    assert!(KeyScript::parse("").unwrap().is_empty());
}

#[test]
fn key_script_rejects_bad_ticks() {
    assert!(KeyScript::parse("x:q").is_err());
}

#[test]
fn key_script_escapes_the_separator() {
    let s = KeyScript::parse(r"\,o,12:p\,,20:\\").unwrap();
    assert_eq!(s.keys_at(0), &[',', 'o']);
    assert_eq!(s.keys_at(12), &['p', ',']);
    assert_eq!(s.keys_at(20), &['\\']);
    assert_eq!(
        Keymap::monitor(1).action(s.keys_at(0)[0]),
        Some(KeyAction::ToggleTrail)
    );
    assert!(KeyScript::parse(r"q\").is_err());
}
