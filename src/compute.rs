/// Pure game-logic functions.
///
/// Every public function takes an immutable reference to the current state
/// (and, where needed, an RNG handle) and returns a brand-new value.  Side
/// effects the caller must perform, such as playing the jump sound or
/// persisting scores, are reported back through `Signals`.

use rand::Rng;

use crate::entities::{
    GameState, Obstacle, ObstacleKind, Player, ScoreRecord, SessionState, GROUND_Y,
};

// ── Tuning ────────────────────────────────────────────────────────────────────

pub const ANIMATION_STEP: f64 = 0.1;
pub const JUMP_VELOCITY: i32 = -20;
pub const GRAVITY: i32 = 1;
pub const OBSTACLE_SPEED: i32 = 6;
/// Obstacles whose left edge reaches this x are removed.
pub const CULL_X: i32 = -100;
pub const SPAWN_X_MIN: i32 = 900;
pub const SPAWN_X_MAX: i32 = 1100;
pub const SPAWN_INTERVAL_MS: u64 = 1500;

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the initial idle state around previously persisted scores.
pub fn init_state(scores: ScoreRecord) -> GameState {
    GameState {
        player: Player::new(),
        obstacles: Vec::new(),
        session: SessionState::Idle,
        start_time: 0,
        score: 0,
        scores,
    }
}

// ── Animation ────────────────────────────────────────────────────────────────

/// Advance a frame counter over `frame_count` frames.  Reaching the end
/// snaps back to zero; the fractional overshoot is dropped, not carried.
pub fn advance_animation(counter: f64, frame_count: usize) -> f64 {
    let next = counter + ANIMATION_STEP;
    if next >= frame_count as f64 {
        0.0
    } else {
        next
    }
}

/// Index into the frame list for a counter produced by `advance_animation`.
pub fn frame_slot(counter: f64) -> usize {
    counter.floor() as usize
}

// ── Player ───────────────────────────────────────────────────────────────────

/// One frame of player logic: input, then gravity, then animation.
/// The returned flag is set when a jump was triggered this frame.
pub fn update_player(player: &Player, jump_held: bool) -> (Player, bool) {
    let mut next = player.clone();

    let jumped = jump_held && next.rect.bottom() >= GROUND_Y;
    if jumped {
        next.gravity = JUMP_VELOCITY;
    }

    next.gravity += GRAVITY;
    next.rect.y += next.gravity;
    if next.rect.bottom() >= GROUND_Y {
        next.rect.set_bottom(GROUND_Y);
    }

    if next.rect.bottom() >= GROUND_Y {
        next.frame_index = advance_animation(next.frame_index, 2);
    }

    (next, jumped)
}

// ── Obstacles ────────────────────────────────────────────────────────────────

pub fn obstacle_kind(rng: &mut impl Rng) -> ObstacleKind {
    let table = &ObstacleKind::SPAWN_TABLE;
    table[rng.gen_range(0..table.len())]
}

pub fn spawn_obstacle(rng: &mut impl Rng) -> Obstacle {
    let kind = obstacle_kind(rng);
    let cx = rng.gen_range(SPAWN_X_MIN..=SPAWN_X_MAX);
    Obstacle::new(kind, cx)
}

/// Animate and move every obstacle, dropping the ones that left the screen.
pub fn update_obstacles(obstacles: &[Obstacle]) -> Vec<Obstacle> {
    obstacles
        .iter()
        .map(|o| {
            let mut next = o.clone();
            next.frame_index = advance_animation(next.frame_index, next.kind.frames().len());
            next.rect.x -= OBSTACLE_SPEED;
            next
        })
        .filter(|o| o.rect.x > CULL_X)
        .collect()
}

// ── Collision & session ──────────────────────────────────────────────────────

pub fn collides(player: &Player, obstacles: &[Obstacle]) -> bool {
    obstacles.iter().any(|o| player.rect.overlaps(&o.rect))
}

/// Seconds survived, computed on whole-second clock readings.
pub fn elapsed_score(now_ms: u64, start_time: u64) -> u64 {
    (now_ms / 1000).saturating_sub(start_time)
}

pub fn start_session(state: &GameState, now_ms: u64) -> GameState {
    GameState {
        session: SessionState::Active,
        start_time: now_ms / 1000,
        score: 0,
        ..state.clone()
    }
}

/// Append one freshly spawned obstacle to the pool.
pub fn spawn(state: &GameState, rng: &mut impl Rng) -> GameState {
    let mut obstacles = state.obstacles.clone();
    obstacles.push(spawn_obstacle(rng));
    GameState {
        obstacles,
        ..state.clone()
    }
}

/// Collision response: empty the pool, go idle and fold the frozen score
/// into the record.
pub fn end_session(state: &GameState) -> GameState {
    let scores = ScoreRecord {
        last_score: state.score,
        high_score: state.scores.high_score.max(state.score),
    };
    GameState {
        obstacles: Vec::new(),
        session: SessionState::Idle,
        scores,
        ..state.clone()
    }
}

/// Side effects requested by a tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Signals {
    pub jump_sound: bool,
    pub session_ended: bool,
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

/// Advance an active session by one frame: player, then obstacles, then the
/// collision check against the post-update positions.
pub fn tick(state: &GameState, jump_held: bool) -> (GameState, Signals) {
    let (player, jump_sound) = update_player(&state.player, jump_held);
    let obstacles = update_obstacles(&state.obstacles);
    let hit = collides(&player, &obstacles);

    let next = GameState {
        player,
        obstacles,
        ..state.clone()
    };
    let signals = Signals {
        jump_sound,
        session_ended: hit,
    };

    if hit {
        (end_session(&next), signals)
    } else {
        (next, signals)
    }
}
