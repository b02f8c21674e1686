/// Keyboard handling for the terminal front end.
///
/// The game needs two things from the keyboard each frame: the discrete
/// `GameEvent`s (jump pressed, quit) and whether the jump key is down.
/// Terminals that speak the kitty keyboard protocol send real releases, so a
/// release clears the key at once.  Older terminals only send presses, with
/// auto-repeat showing up as more presses: there the key counts as down for
/// `HOLD_WINDOW` frames after the last one, and a press only counts as a new
/// jump once the key has been quiet for `EDGE_WINDOW` frames.

use std::collections::HashMap;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use jump_mania::game::GameEvent;

/// Frames a key stays down after its last press or repeat.  ≈133 ms at
/// 60 FPS, longer than the gap between auto-repeats once they start.
const HOLD_WINDOW: u64 = 8;

/// Frames of silence before another press counts as a new jump.  ≈750 ms at
/// 60 FPS, longer than the usual delay before auto-repeat kicks in.
const EDGE_WINDOW: u64 = 45;

pub const JUMP_KEY: KeyCode = KeyCode::Char(' ');

#[derive(Debug, Default)]
pub struct KeyTracker {
    /// Frame on which each key last produced a press or repeat.
    key_frame: HashMap<KeyCode, u64>,
    frame: u64,
}

impl KeyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new frame; call before feeding that frame's events.
    pub fn begin_frame(&mut self) {
        self.frame += 1;
    }

    fn seen_within(&self, key: &KeyCode, frames: u64) -> bool {
        self.key_frame
            .get(key)
            .map(|&last| self.frame.saturating_sub(last) <= frames)
            .unwrap_or(false)
    }

    fn is_held(&self, key: &KeyCode) -> bool {
        self.seen_within(key, HOLD_WINDOW)
    }

    pub fn jump_held(&self) -> bool {
        self.is_held(&JUMP_KEY)
    }

    /// Record one terminal event, returning the game event it produces, if any.
    pub fn feed(&mut self, event: &Event) -> Option<GameEvent> {
        let Event::Key(KeyEvent { code, kind, modifiers, .. }) = event else {
            return None;
        };
        match kind {
            KeyEventKind::Press => {
                // Without releases, a press soon after the last one is auto-repeat.
                let fresh = !self.seen_within(code, EDGE_WINDOW);
                self.key_frame.insert(*code, self.frame);
                match code {
                    KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(GameEvent::Quit),
                    KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                        Some(GameEvent::Quit)
                    }
                    code if *code == JUMP_KEY && fresh => Some(GameEvent::JumpPressed),
                    _ => None,
                }
            }
            KeyEventKind::Repeat => {
                self.key_frame.insert(*code, self.frame);
                None
            }
            KeyEventKind::Release => {
                self.key_frame.remove(code);
                None
            }
        }
    }
}
