//! Keyboard state tracking.
//!
//! Raw terminal key codes are normalised into a small canonical `Key` set;
//! everything else is ignored.  The tracker answers "is this key held?" for
//! the per-frame steering read, and reports the released→pressed edge from
//! `key_down` so firing happens once per press regardless of key-repeat.
//!
//! Holds are tracked per physical key: with both the Left arrow and `a`
//! down, releasing one still leaves `Key::Left` held.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyModifiers};

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// 32 frames at 60 FPS (≈530 ms) outlasts the usual OS key-repeat delay, so
/// a held key keeps being refreshed and never re-fires.
pub const HOLD_WINDOW: u64 = 32;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Fire,
    Restart,
    Quit,
}

impl Key {
    /// Map a terminal key code onto the canonical key space.
    pub fn from_code(code: KeyCode, modifiers: KeyModifiers) -> Option<Key> {
        match code {
            KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Key::Left),
            KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Key::Right),
            KeyCode::Char(' ') => Some(Key::Fire),
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Some(Key::Quit),
            KeyCode::Char('r') | KeyCode::Char('R') => Some(Key::Restart),
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Key::Quit),
            _ => None,
        }
    }
}

/// A physical key together with the canonical key it stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Binding {
    pub key: Key,
    pub code: KeyCode,
}

impl Binding {
    /// Letters are folded to lowercase so a shifted press and an unshifted
    /// release land on the same physical key.
    pub fn from_event(code: KeyCode, modifiers: KeyModifiers) -> Option<Binding> {
        let key = Key::from_code(code, modifiers)?;
        let code = match code {
            KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
            other => other,
        };
        Some(Binding { key, code })
    }
}

impl From<Key> for Binding {
    /// The key's primary physical binding.
    fn from(key: Key) -> Self {
        let code = match key {
            Key::Left => KeyCode::Left,
            Key::Right => KeyCode::Right,
            Key::Fire => KeyCode::Char(' '),
            Key::Restart => KeyCode::Char('r'),
            Key::Quit => KeyCode::Char('q'),
        };
        Binding { key, code }
    }
}

/// How a held key is released.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HoldPolicy {
    /// The terminal reports proper release events (keyboard enhancement).
    ReleaseEvents,
    /// Only presses arrive; a key drops out after `window` silent frames.
    Expire { window: u64 },
}

impl HoldPolicy {
    /// Pick the policy for a terminal.  Release events are trusted only when
    /// the terminal has confirmed it reports them; otherwise holds expire.
    pub fn for_terminal(reports_releases: bool) -> Self {
        if reports_releases {
            HoldPolicy::ReleaseEvents
        } else {
            HoldPolicy::Expire { window: HOLD_WINDOW }
        }
    }
}

/// Directional intent sampled once at the start of a simulation step.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Steering {
    pub left: bool,
    pub right: bool,
}

#[derive(Debug)]
pub struct InputTracker {
    policy: HoldPolicy,
    /// Maps each held physical key → the frame it was last seen (press or repeat).
    held: HashMap<Binding, u64>,
    frame: u64,
}

impl InputTracker {
    pub fn new(policy: HoldPolicy) -> Self {
        Self {
            policy,
            held: HashMap::new(),
            frame: 0,
        }
    }

    /// Record a press.  Returns `true` only when the key was not already
    /// held, i.e. on the released→pressed edge.
    pub fn key_down(&mut self, binding: impl Into<Binding>) -> bool {
        let binding = binding.into();
        let edge = !self.is_held(binding.key);
        self.held.insert(binding, self.frame);
        edge
    }

    /// Record an auto-repeat: refreshes the hold without ever producing an edge.
    pub fn key_repeat(&mut self, binding: impl Into<Binding>) {
        self.held.insert(binding.into(), self.frame);
    }

    pub fn key_up(&mut self, binding: impl Into<Binding>) {
        self.held.remove(&binding.into());
    }

    /// True while any physical key bound to `key` is down.
    pub fn is_held(&self, key: Key) -> bool {
        self.held
            .iter()
            .any(|(binding, &last)| binding.key == key && self.is_fresh(last))
    }

    fn is_fresh(&self, last: u64) -> bool {
        match self.policy {
            HoldPolicy::ReleaseEvents => true,
            HoldPolicy::Expire { window } => self.frame.saturating_sub(last) <= window,
        }
    }

    pub fn steering(&self) -> Steering {
        Steering {
            left: self.is_held(Key::Left),
            right: self.is_held(Key::Right),
        }
    }

    /// Advance the tracker's frame clock and forget keys whose hold expired.
    pub fn next_frame(&mut self) {
        self.frame += 1;
        if let HoldPolicy::Expire { window } = self.policy {
            let frame = self.frame;
            self.held
                .retain(|_, last| frame.saturating_sub(*last) <= window);
        }
    }

    /// Forget every held key (session teardown).
    pub fn clear(&mut self) {
        self.held.clear();
    }

    pub fn policy(&self) -> HoldPolicy {
        self.policy
    }
}
