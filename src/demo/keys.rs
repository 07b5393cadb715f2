use std::collections::BTreeMap;

use crate::foundation::error::{BufswapError, BufswapResult};
use crate::schedule::scheduler::Command;

/// What a key press asks a component to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyAction {
    /// Forward a scheduler command.
    Command(Command),
    /// Flip the chunk trail of the component's buffers.
    ToggleTrail,
}

impl std::fmt::Display for KeyAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Command(Command::ToggleAuto) => write!(f, "toggle auto-replay"),
            Self::Command(Command::DrawOnce) => write!(f, "draw once"),
            Self::Command(Command::IncRate(step)) => write!(f, "increase rate by {step}"),
            Self::Command(Command::DecRate(step)) => write!(f, "decrease rate by {step}"),
            Self::ToggleTrail => write!(f, "toggle chunk trail"),
        }
    }
}

/// Key bindings of one component.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Keymap {
    bindings: Vec<(char, KeyAction)>,
}

impl Keymap {
    /// Bind `keys` in the order toggle-auto, draw-once, dec-rate, inc-rate, toggle-trail.
    pub fn new(keys: [char; 5], step: u32) -> Self {
        let [auto, once, dec, inc, trail] = keys;
        Self {
            bindings: vec![
                (auto, KeyAction::Command(Command::ToggleAuto)),
                (once, KeyAction::Command(Command::DrawOnce)),
                (dec, KeyAction::Command(Command::DecRate(step))),
                (inc, KeyAction::Command(Command::IncRate(step))),
                (trail, KeyAction::ToggleTrail),
            ],
        }
    }

    /// Video player keys: `q w e r z`.
    pub fn player(step: u32) -> Self {
        Self::new(['q', 'w', 'e', 'r', 'z'], step)
    }

    /// Monitor keys: `o p [ ] ,`.
    pub fn monitor(step: u32) -> Self {
        Self::new(['o', 'p', '[', ']', ','], step)
    }

    /// Action bound to `key`, if any.
    pub fn action(&self, key: char) -> Option<KeyAction> {
        self.bindings
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, action)| *action)
    }

    /// Every binding in declaration order.
    pub fn bindings(&self) -> &[(char, KeyAction)] {
        &self.bindings
    }
}

/// Key presses scheduled by tick number.
///
/// Text form: comma-separated entries of `[tick:]keys`, e.g. `qo,40:w,90:rr`. An entry without
/// a tick fires before tick 0. A backslash makes the next key literal, so `\,` presses `,`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyScript {
    presses: BTreeMap<u64, Vec<char>>,
}

impl KeyScript {
    /// Parse the text form.
    pub fn parse(s: &str) -> BufswapResult<Self> {
        let mut presses: BTreeMap<u64, Vec<char>> = BTreeMap::new();
        for entry in split_entries(s)? {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }
            let (tick, keys) = match entry.split_once(':') {
                Some((tick, keys)) => {
                    let tick = tick.trim().parse::<u64>().map_err(|_| {
                        BufswapError::validation(format!("bad tick in key script entry '{entry}'"))
                    })?;
                    (tick, keys)
                }
                None => (0, entry),
            };
            presses.entry(tick).or_default().extend(unescape(keys));
        }
        Ok(Self { presses })
    }

    /// Keys pressed before tick `tick`.
    pub fn keys_at(&self, tick: u64) -> &[char] {
        self.presses.get(&tick).map(Vec::as_slice).unwrap_or_default()
    }

    /// Return `true` when no key is scheduled.
    pub fn is_empty(&self) -> bool {
        self.presses.is_empty()
    }
}

// Splits on unescaped commas; escapes stay in place for `unescape`.
fn split_entries(s: &str) -> BufswapResult<Vec<String>> {
    let mut entries = Vec::new();
    let mut current = String::new();
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                let escaped = chars.next().ok_or_else(|| {
                    BufswapError::validation("key script ends with a dangling '\\'")
                })?;
                current.push('\\');
                current.push(escaped);
            }
            ',' => entries.push(std::mem::take(&mut current)),
            c => current.push(c),
        }
    }
    entries.push(current);
    Ok(entries)
}

fn unescape(keys: &str) -> Vec<char> {
    let mut out = Vec::new();
    let mut chars = keys.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.extend(chars.next()),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/demo/keys.rs"]
mod tests;
