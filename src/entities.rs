/// All game entity types — pure data plus the geometry they are drawn with.
///
/// Positions are logical pixels on the fixed 800×400 canvas; the renderer
/// decides how those map onto whatever surface it draws to.

use serde::Deserialize;

// ── Screen contract ───────────────────────────────────────────────────────────

pub const SCREEN_WIDTH: i32 = 800;
pub const SCREEN_HEIGHT: i32 = 400;
/// Bottom edge of everything that stands on the ground.
pub const GROUND_Y: i32 = 300;

// ── Geometry ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Rect { x, y, w, h }
    }

    /// Place a `w`×`h` rect so its bottom edge is centred on (`cx`, `bottom`).
    pub fn from_midbottom(cx: i32, bottom: i32, w: i32, h: i32) -> Self {
        Rect { x: cx - w / 2, y: bottom - h, w, h }
    }

    pub fn from_center(cx: i32, cy: i32, w: i32, h: i32) -> Self {
        Rect { x: cx - w / 2, y: cy - h / 2, w, h }
    }

    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    pub fn set_bottom(&mut self, bottom: i32) {
        self.y = bottom - self.h;
    }

    /// Strict overlap: rects that only share an edge do not collide.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

// ── Sprites ───────────────────────────────────────────────────────────────────

/// Every image the game draws.  The sprite sheet must define all of them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
pub enum SpriteKey {
    Sky,
    Ground,
    PlayerWalk1,
    PlayerWalk2,
    PlayerJump,
    PlayerStand,
    Fly1,
    Fly2,
    Snail1,
    Snail2,
}

impl SpriteKey {
    pub const ALL: [SpriteKey; 10] = [
        SpriteKey::Sky,
        SpriteKey::Ground,
        SpriteKey::PlayerWalk1,
        SpriteKey::PlayerWalk2,
        SpriteKey::PlayerJump,
        SpriteKey::PlayerStand,
        SpriteKey::Fly1,
        SpriteKey::Fly2,
        SpriteKey::Snail1,
        SpriteKey::Snail2,
    ];
}

pub const PLAYER_SIZE: (i32, i32) = (68, 84);
pub const PLAYER_X: i32 = 80;
pub const PLAYER_WALK: [SpriteKey; 2] = [SpriteKey::PlayerWalk1, SpriteKey::PlayerWalk2];

/// Anything the driver can draw and test for overlap.
pub trait Entity {
    fn bounds(&self) -> Rect;
    fn current_frame(&self) -> SpriteKey;
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub rect: Rect,
    /// Vertical velocity.  Keeps growing while grounded; only a jump resets it.
    pub gravity: i32,
    pub frame_index: f64,
}

impl Player {
    pub fn new() -> Self {
        Player {
            rect: Rect::from_midbottom(PLAYER_X, GROUND_Y, PLAYER_SIZE.0, PLAYER_SIZE.1),
            gravity: 0,
            frame_index: 0.0,
        }
    }

    pub fn is_grounded(&self) -> bool {
        self.rect.bottom() >= GROUND_Y
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity for Player {
    fn bounds(&self) -> Rect {
        self.rect
    }

    fn current_frame(&self) -> SpriteKey {
        if self.is_grounded() {
            PLAYER_WALK[self.frame_index as usize]
        } else {
            SpriteKey::PlayerJump
        }
    }
}

// ── Obstacles ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObstacleKind {
    Fly,
    Snail,
}

impl ObstacleKind {
    /// The weighted draw: one slot per entry, so snails are three times as likely.
    pub const SPAWN_TABLE: [ObstacleKind; 4] = [
        ObstacleKind::Fly,
        ObstacleKind::Snail,
        ObstacleKind::Snail,
        ObstacleKind::Snail,
    ];

    pub fn size(&self) -> (i32, i32) {
        match self {
            ObstacleKind::Fly => (84, 40),
            ObstacleKind::Snail => (72, 36),
        }
    }

    /// Bottom edge at spawn; flies hover, snails crawl on the ground.
    pub fn spawn_bottom(&self) -> i32 {
        match self {
            ObstacleKind::Fly => 210,
            ObstacleKind::Snail => GROUND_Y,
        }
    }

    pub fn frames(&self) -> [SpriteKey; 2] {
        match self {
            ObstacleKind::Fly => [SpriteKey::Fly1, SpriteKey::Fly2],
            ObstacleKind::Snail => [SpriteKey::Snail1, SpriteKey::Snail2],
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    pub rect: Rect,
    pub frame_index: f64,
}

impl Obstacle {
    /// An obstacle whose bottom edge is centred on `cx`.
    pub fn new(kind: ObstacleKind, cx: i32) -> Self {
        let (w, h) = kind.size();
        Obstacle {
            kind,
            rect: Rect::from_midbottom(cx, kind.spawn_bottom(), w, h),
            frame_index: 0.0,
        }
    }
}

impl Entity for Obstacle {
    fn bounds(&self) -> Rect {
        self.rect
    }

    fn current_frame(&self) -> SpriteKey {
        self.kind.frames()[self.frame_index as usize]
    }
}

// ── Session & scores ──────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// Intro / game-over screen.
    Idle,
    Active,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScoreRecord {
    pub last_score: u64,
    pub high_score: u64,
}

// ── Master game state ─────────────────────────────────────────────────────────

/// Everything the driver owns between frames.  Cloneable so the pure update
/// functions can return a new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct GameState {
    pub player: Player,
    pub obstacles: Vec<Obstacle>,
    pub session: SessionState,
    /// Whole seconds on the monotonic clock when the current session began.
    pub start_time: u64,
    /// Elapsed seconds this session; frozen once the session ends.
    pub score: u64,
    pub scores: ScoreRecord,
}
