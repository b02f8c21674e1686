use jump_mania::compute::*;
use jump_mania::entities::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn make_state() -> GameState {
    GameState {
        player: Player::new(),
        obstacles: Vec::new(),
        session: SessionState::Active,
        start_time: 0,
        score: 0,
        scores: ScoreRecord::default(),
    }
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

/// A snail sitting right under the player (after one frame of motion too).
fn snail_on_player() -> Obstacle {
    Obstacle::new(ObstacleKind::Snail, PLAYER_X + 6)
}

// ── init_state ────────────────────────────────────────────────────────────────

#[test]
fn init_state_is_idle_with_loaded_scores() {
    let scores = ScoreRecord { last_score: 3, high_score: 9 };
    let s = init_state(scores);
    assert_eq!(s.session, SessionState::Idle);
    assert_eq!(s.scores, scores);
    assert_eq!(s.score, 0);
    assert!(s.obstacles.is_empty());
    assert_eq!(s.player, Player::new());
}

// ── Animator ──────────────────────────────────────────────────────────────────

#[test]
fn animation_cycles_in_twenty_steps_over_two_frames() {
    let mut counter = 0.0;
    for step in 1..=19 {
        counter = advance_animation(counter, 2);
        assert!(counter > 0.0 && counter < 2.0, "step {step}: {counter}");
        assert!(frame_slot(counter) < 2);
    }
    counter = advance_animation(counter, 2);
    assert_eq!(counter, 0.0);
}

#[test]
fn animation_resets_instead_of_wrapping() {
    // A modulo wrap would leave 0.05 here.
    assert_eq!(advance_animation(1.95, 2), 0.0);
    assert_eq!(advance_animation(1.9, 2), 0.0);
    assert_eq!(advance_animation(2.95, 3), 0.0);
    assert!((advance_animation(1.5, 2) - 1.6).abs() < 1e-9);
}

#[test]
fn frame_slot_floors() {
    assert_eq!(frame_slot(0.0), 0);
    assert_eq!(frame_slot(0.99), 0);
    assert_eq!(frame_slot(1.0), 1);
    assert_eq!(frame_slot(1.9999), 1);
}

// ── Player ────────────────────────────────────────────────────────────────────

#[test]
fn jump_from_ground_sets_velocity_and_signals() {
    let p = Player::new();
    let (p2, jumped) = update_player(&p, true);
    assert!(jumped);
    // −20 then one frame of gravity
    assert_eq!(p2.gravity, -19);
    assert_eq!(p2.rect.bottom(), GROUND_Y - 19);
    assert_eq!(p2.current_frame(), SpriteKey::PlayerJump);
}

#[test]
fn no_jump_while_airborne() {
    let (mut p, _) = update_player(&Player::new(), true);
    let before = p.gravity;
    let (p2, jumped) = update_player(&p, true);
    assert!(!jumped);
    assert_eq!(p2.gravity, before + 1);
    p = p2;
    assert!(!p.is_grounded());
}

#[test]
fn jump_arc_rises_then_falls_and_clamps_to_ground() {
    let (mut p, _) = update_player(&Player::new(), true);
    let mut bottoms = vec![p.rect.bottom()];
    for _ in 0..40 {
        p = update_player(&p, false).0;
        bottoms.push(p.rect.bottom());
    }

    let apex = bottoms
        .iter()
        .enumerate()
        .min_by_key(|(_, b)| **b)
        .map(|(i, _)| i)
        .unwrap();
    for pair in bottoms[..=apex].windows(2) {
        assert!(pair[1] < pair[0], "rising: {:?}", pair);
    }
    for pair in bottoms[apex..].windows(2) {
        assert!(pair[1] >= pair[0], "falling: {:?}", pair);
    }
    assert!(bottoms.iter().all(|b| *b <= GROUND_Y));
    assert_eq!(*bottoms.last().unwrap(), GROUND_Y);
}

#[test]
fn landing_clamps_bottom_exactly() {
    let mut p = Player::new();
    p.rect.set_bottom(GROUND_Y - 3);
    p.gravity = 10;
    let (p2, _) = update_player(&p, false);
    assert_eq!(p2.rect.bottom(), GROUND_Y);
}

#[test]
fn gravity_keeps_accumulating_on_the_ground() {
    let mut p = Player::new();
    for _ in 0..5 {
        p = update_player(&p, false).0;
    }
    assert_eq!(p.gravity, 5);
    assert_eq!(p.rect.bottom(), GROUND_Y);

    // A jump still resets it.
    let (p2, jumped) = update_player(&p, true);
    assert!(jumped);
    assert_eq!(p2.gravity, -19);
}

#[test]
fn grounded_player_walks() {
    let mut p = Player::new();
    for _ in 0..10 {
        p = update_player(&p, false).0;
    }
    assert!((p.frame_index - 1.0).abs() < 1e-9);
}

// ── Obstacles ─────────────────────────────────────────────────────────────────

#[test]
fn spawn_distribution_is_quarter_flies() {
    let mut rng = seeded_rng();
    let trials = 100_000;
    let flies = (0..trials)
        .filter(|_| obstacle_kind(&mut rng) == ObstacleKind::Fly)
        .count();
    let ratio = flies as f64 / trials as f64;
    assert!((ratio - 0.25).abs() < 0.01, "fly ratio {ratio}");
}

#[test]
fn spawned_obstacles_start_offscreen_right() {
    let mut rng = seeded_rng();
    for _ in 0..1000 {
        let o = spawn_obstacle(&mut rng);
        let (w, _) = o.kind.size();
        let cx = o.rect.x + w / 2;
        assert!((SPAWN_X_MIN..=SPAWN_X_MAX).contains(&cx));
        assert_eq!(o.rect.bottom(), o.kind.spawn_bottom());
        assert_eq!(o.frame_index, 0.0);
    }
}

#[test]
fn obstacles_move_left_and_animate() {
    let o = Obstacle::new(ObstacleKind::Fly, 1000);
    let moved = update_obstacles(&[o.clone()]);
    assert_eq!(moved.len(), 1);
    assert_eq!(moved[0].rect.x, o.rect.x - OBSTACLE_SPEED);
    assert_eq!(moved[0].rect.y, o.rect.y);
    assert!((moved[0].frame_index - 0.1).abs() < 1e-9);
}

#[test]
fn cull_happens_at_minus_one_hundred() {
    let mut at_edge = Obstacle::new(ObstacleKind::Snail, 0);
    at_edge.rect.x = CULL_X + OBSTACLE_SPEED; // lands exactly on −100
    let mut just_inside = at_edge.clone();
    just_inside.rect.x += 1; // lands on −99

    let remaining = update_obstacles(&[at_edge, just_inside]);
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].rect.x, CULL_X + 1);
}

#[test]
fn pool_never_grows_without_spawns() {
    let mut rng = seeded_rng();
    let mut pool: Vec<Obstacle> = (0..8).map(|_| spawn_obstacle(&mut rng)).collect();
    let mut last = pool.len();
    for _ in 0..400 {
        pool = update_obstacles(&pool);
        assert!(pool.len() <= last);
        last = pool.len();
    }
    assert!(pool.is_empty());
}

#[test]
fn spawn_appends_one_obstacle() {
    let mut rng = seeded_rng();
    let s = make_state();
    let s2 = spawn(&s, &mut rng);
    let s3 = spawn(&s2, &mut rng);
    assert_eq!(s2.obstacles.len(), 1);
    assert_eq!(s3.obstacles.len(), 2);
    assert!(s.obstacles.is_empty());
}

// ── Session ───────────────────────────────────────────────────────────────────

#[test]
fn elapsed_score_uses_whole_seconds() {
    assert_eq!(elapsed_score(8_999, 1), 7);
    assert_eq!(elapsed_score(9_000, 1), 8);
    assert_eq!(elapsed_score(500, 1), 0);
}

#[test]
fn start_session_records_start_second() {
    let s = GameState { session: SessionState::Idle, score: 12, ..make_state() };
    let s2 = start_session(&s, 4_750);
    assert_eq!(s2.session, SessionState::Active);
    assert_eq!(s2.start_time, 4);
    assert_eq!(s2.score, 0);
}

#[test]
fn end_session_updates_record() {
    let mut s = make_state();
    s.score = 7;
    s.scores = ScoreRecord { last_score: 2, high_score: 20 };
    s.obstacles.push(snail_on_player());

    let s2 = end_session(&s);
    assert_eq!(s2.session, SessionState::Idle);
    assert!(s2.obstacles.is_empty());
    assert_eq!(s2.score, 7);
    assert_eq!(s2.scores, ScoreRecord { last_score: 7, high_score: 20 });

    s.scores.high_score = 5;
    assert_eq!(end_session(&s).scores.high_score, 7);
}

// ── tick ──────────────────────────────────────────────────────────────────────

#[test]
fn collision_clears_whole_pool_and_goes_idle() {
    let mut s = make_state();
    s.score = 3;
    s.obstacles.push(Obstacle::new(ObstacleKind::Fly, 1000));
    s.obstacles.push(snail_on_player());
    s.obstacles.push(Obstacle::new(ObstacleKind::Snail, 600));

    let (s2, signals) = tick(&s, false);
    assert!(signals.session_ended);
    assert!(s2.obstacles.is_empty());
    assert_eq!(s2.session, SessionState::Idle);
    assert_eq!(s2.scores, ScoreRecord { last_score: 3, high_score: 3 });
}

#[test]
fn no_overlap_only_moves_things() {
    let mut s = make_state();
    s.score = 3;
    s.obstacles.push(Obstacle::new(ObstacleKind::Snail, 600));

    let (s2, signals) = tick(&s, false);
    assert!(!signals.session_ended);
    assert!(!signals.jump_sound);
    assert_eq!(s2.session, SessionState::Active);
    assert_eq!(s2.obstacles.len(), 1);
    assert_eq!(s2.obstacles[0].rect.x, s.obstacles[0].rect.x - OBSTACLE_SPEED);
    assert_eq!(s2.scores, s.scores);
}

#[test]
fn collision_uses_post_update_positions() {
    // Just out of reach before the move, overlapping after it.
    let player = Player::new();
    let mut snail = Obstacle::new(ObstacleKind::Snail, 0);
    snail.rect.x = player.rect.right() + OBSTACLE_SPEED - 1;
    let mut s = make_state();
    s.obstacles.push(snail);

    assert!(!collides(&s.player, &s.obstacles));
    let (s2, signals) = tick(&s, false);
    assert!(signals.session_ended);
    assert_eq!(s2.session, SessionState::Idle);
}

#[test]
fn jumping_over_a_fly_height_gap() {
    // A fly hovers above a grounded player's head.
    let mut s = make_state();
    let mut fly = Obstacle::new(ObstacleKind::Fly, PLAYER_X);
    fly.rect.x += OBSTACLE_SPEED;
    s.obstacles.push(fly);
    assert!(!collides(&s.player, &s.obstacles));

    let (_, signals) = tick(&s, false);
    assert!(!signals.session_ended);

    // Jumping into it ends the run.
    let (s2, signals) = tick(&s, true);
    assert!(signals.jump_sound);
    assert!(signals.session_ended);
    assert!(s2.obstacles.is_empty());
}

#[test]
fn tick_does_not_mutate_original() {
    let mut s = make_state();
    s.obstacles.push(snail_on_player());
    let _ = tick(&s, true);
    assert_eq!(s.session, SessionState::Active);
    assert_eq!(s.obstacles.len(), 1);
    assert_eq!(s.player, Player::new());
}
