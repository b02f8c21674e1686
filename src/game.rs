/// The frame driver: routes events, runs the idle/active state machine and
/// dispatches rendering in a fixed order.
///
/// Terminal, clock and sound are all injected, so a whole session can be
/// played out in a test with a fake clock and a recording canvas.

use rand::Rng;

use crate::audio::{Audio, Sound};
use crate::canvas::Canvas;
use crate::compute::{elapsed_score, spawn, start_session, tick};
use crate::entities::{
    Entity, GameState, Rect, Rgb, SessionState, SpriteKey, GROUND_Y, PLAYER_SIZE, SCREEN_HEIGHT,
    SCREEN_WIDTH,
};
use crate::error::Result;
use crate::score_store::ScoreStore;

pub const TITLE: &str = "Jump Mania";

const SCORE_COLOR: Rgb = Rgb(64, 64, 64);
const IDLE_BACKGROUND: Rgb = Rgb(94, 129, 162);
const IDLE_TEXT: Rgb = Rgb(111, 196, 169);

/// Discrete input and timer events, drained in delivery order each frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    /// Close requested.
    Quit,
    /// The jump key went down (an edge, not the held state).
    JumpPressed,
    /// The obstacle timer elapsed.
    SpawnTimer,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Game<R> {
    pub state: GameState,
    store: ScoreStore,
    rng: R,
}

impl<R: Rng> Game<R> {
    /// Load the persisted scores and start on the intro screen.
    pub fn new(store: ScoreStore, rng: R) -> Self {
        let scores = store.load();
        tracing::info!(
            last = scores.last_score,
            high = scores.high_score,
            "scores loaded"
        );
        Game {
            state: crate::compute::init_state(scores),
            store,
            rng,
        }
    }

    pub fn store(&self) -> &ScoreStore {
        &self.store
    }

    /// Drain one frame's worth of events.  Stops at the first `Quit`.
    pub fn handle_events(
        &mut self,
        events: impl IntoIterator<Item = GameEvent>,
        now_ms: u64,
    ) -> Flow {
        for event in events {
            if self.handle_event(event, now_ms) == Flow::Quit {
                return Flow::Quit;
            }
        }
        Flow::Continue
    }

    pub fn handle_event(&mut self, event: GameEvent, now_ms: u64) -> Flow {
        match (event, self.state.session) {
            (GameEvent::Quit, _) => {
                tracing::info!("quit requested");
                return Flow::Quit;
            }
            (GameEvent::SpawnTimer, SessionState::Active) => {
                self.state = spawn(&self.state, &mut self.rng);
                tracing::debug!(pool = self.state.obstacles.len(), "obstacle spawned");
            }
            (GameEvent::JumpPressed, SessionState::Idle) => {
                self.state = start_session(&self.state, now_ms);
                tracing::info!(start_time = self.state.start_time, "session started");
            }
            // Timer fires while idle and jump edges while running are ignored;
            // jumping itself polls the held key.
            (GameEvent::SpawnTimer, SessionState::Idle)
            | (GameEvent::JumpPressed, SessionState::Active) => {}
        }
        Flow::Continue
    }

    /// Render and advance one frame.  Scores are written before this returns
    /// if the session ended.
    pub fn frame(
        &mut self,
        now_ms: u64,
        jump_held: bool,
        canvas: &mut impl Canvas,
        audio: &mut impl Audio,
    ) -> Result<()> {
        match self.state.session {
            SessionState::Active => self.active_frame(now_ms, jump_held, canvas, audio)?,
            SessionState::Idle => draw_idle(canvas, &self.state)?,
        }
        canvas.present()?;
        Ok(())
    }

    fn active_frame(
        &mut self,
        now_ms: u64,
        jump_held: bool,
        canvas: &mut impl Canvas,
        audio: &mut impl Audio,
    ) -> Result<()> {
        canvas.blit(SpriteKey::Sky, Rect::new(0, 0, SCREEN_WIDTH, GROUND_Y))?;
        let ground = Rect::new(0, GROUND_Y, SCREEN_WIDTH, SCREEN_HEIGHT - GROUND_Y);
        canvas.blit(SpriteKey::Ground, ground)?;

        self.state.score = elapsed_score(now_ms, self.state.start_time);
        canvas.text(&format!("Score: {}", self.state.score), SCORE_COLOR, false, (400, 50))?;

        // Everything is drawn where it was at the end of the previous frame,
        // then moved.
        draw_entity(canvas, &self.state.player)?;
        for obstacle in &self.state.obstacles {
            draw_entity(canvas, obstacle)?;
        }

        let (next, signals) = tick(&self.state, jump_held);
        self.state = next;
        tracing::trace!(
            y = self.state.player.rect.y,
            gravity = self.state.player.gravity,
            pool = self.state.obstacles.len(),
            "active frame"
        );

        if signals.jump_sound {
            tracing::debug!("jump");
            audio.play(Sound::Jump);
        }
        if signals.session_ended {
            tracing::info!(
                score = self.state.score,
                last = self.state.scores.last_score,
                high = self.state.scores.high_score,
                "session ended"
            );
            self.store.save(&self.state.scores)?;
        }
        Ok(())
    }
}

fn draw_entity(canvas: &mut impl Canvas, entity: &impl Entity) -> Result<()> {
    canvas.blit(entity.current_frame(), entity.bounds())?;
    Ok(())
}

fn draw_idle(canvas: &mut impl Canvas, state: &GameState) -> Result<()> {
    canvas.fill(IDLE_BACKGROUND)?;
    let stand = Rect::from_center(400, 200, PLAYER_SIZE.0 * 2, PLAYER_SIZE.1 * 2);
    canvas.blit(SpriteKey::PlayerStand, stand)?;

    canvas.text(TITLE, IDLE_TEXT, false, (400, 80))?;
    let high = format!("High score: {}", state.scores.high_score);
    canvas.text(&high, IDLE_TEXT, false, (200, 140))?;
    let last = format!("Last score: {}", state.scores.last_score);
    canvas.text(&last, IDLE_TEXT, false, (200, 180))?;

    if state.score == 0 {
        canvas.text("Press space to run", IDLE_TEXT, false, (400, 330))?;
    } else {
        let yours = format!("Your score: {}", state.score);
        canvas.text(&yours, IDLE_TEXT, false, (400, 330))?;
    }
    Ok(())
}
