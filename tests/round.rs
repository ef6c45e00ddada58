// ── Tests ─────────────────────────────────────────────────────────────────────
//
// Drives a whole round through the public pieces (scheduler, spawn pacing,
// pursuit, collision) without a window or GPU: a perfect player hoovers up
// every coin, the cadence tightens until the wolf enters, then the player
// parks in a corner and waits to be caught.

use glam::Vec2;
use rand::SeedableRng;
use rand::rngs::StdRng;

use coinchase::game::pursuit::{INITIAL_PACE, PursuitController, WOLF_TICK};
use coinchase::game::spawn::{SPAWN_MARGIN, SpawnController, random_coin_pos};
use coinchase::schedule::Scheduler;
use coinchase::sprite::{Sprite, collisions_with};

const WIDTH: f32 = 800.0;
const HEIGHT: f32 = 600.0;
const DT: f32 = 0.1;

fn player() -> Sprite {
    Sprite::new("player", Vec2::new(32.0, 40.0))
        .at(WIDTH / 2.0, HEIGHT / 2.0)
        .with_scale(0.5)
}

fn coin_at(x: f32, y: f32) -> Sprite {
    Sprite::new("coin", Vec2::new(24.0, 24.0)).at(x, y).with_scale(0.5)
}

fn wolf() -> Sprite {
    Sprite::new("wolf", Vec2::new(48.0, 48.0)).at(WIDTH / 2.0, HEIGHT / 2.0)
}

#[test]
fn perfect_play_summons_the_wolf_and_the_wolf_wins() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut scheduler = Scheduler::new();
    let mut spawn = SpawnController::new();
    let mut pursuit = PursuitController::new();

    let coin_timer = scheduler.schedule(spawn.countdown());
    let wolf_timer = scheduler.schedule(WOLF_TICK);

    let mut player = player();
    let mut coins: Vec<Sprite> = Vec::new();
    let mut the_wolf: Option<Sprite> = None;
    let mut score = 0u32;
    let mut caught = false;
    let mut wolf_appeared_at = None;

    for step in 0..1200 {
        let now = step as f32 * DT;

        for id in scheduler.tick(DT) {
            if id == coin_timer {
                let (x, y) = random_coin_pos(&mut rng, WIDTH, HEIGHT);
                coins.push(coin_at(x, y));
                if let Some(interval) = spawn.on_coin_spawned(coins.len()) {
                    scheduler.reschedule(coin_timer, interval);
                }
            } else if id == wolf_timer {
                match the_wolf.as_mut() {
                    Some(w) => {
                        w.center = pursuit.step_toward(w.center, player.center);
                    }
                    None if PursuitController::should_appear(spawn.countdown()) => {
                        the_wolf = Some(wolf());
                        wolf_appeared_at = Some(now);
                    }
                    None => {}
                }
            }
        }

        // A perfect player sits on the oldest coin; once the wolf is out,
        // park in the corner and wait to be run down.
        if the_wolf.is_none() {
            if let Some(coin) = coins.first() {
                player.center = coin.center;
            }
        } else {
            player.center = Vec2::new(100.0, 100.0);
        }

        for index in collisions_with(&player, &coins).into_iter().rev() {
            coins.remove(index);
            score += 10;
        }

        if let Some(w) = &the_wolf {
            if w.collides_with(&player) {
                caught = true;
                break;
            }
        }
    }

    let appeared = wolf_appeared_at.expect("the cadence never got tight enough");
    // Eleven speed-ups at one spawn each take roughly 22 seconds of play.
    assert!(appeared > 10.0 && appeared < 40.0, "wolf appeared at {appeared}");

    assert!(caught, "the wolf never caught the parked player");
    // Ten or eleven coins spawn before the wolf enters; at most the last one
    // goes uncollected when the player parks.
    assert!(score >= 100, "perfect play banked only {score}");
    assert!(pursuit.pace() > INITIAL_PACE);
}

#[test]
fn idle_play_never_summons_the_wolf() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut scheduler = Scheduler::new();
    let mut spawn = SpawnController::new();

    let coin_timer = scheduler.schedule(spawn.countdown());
    let mut coins = 0usize;

    // Nobody collects anything for two minutes.
    for _ in 0..1200 {
        for id in scheduler.tick(DT) {
            if id == coin_timer {
                let _ = random_coin_pos(&mut rng, WIDTH, HEIGHT);
                coins += 1;
                if let Some(interval) = spawn.on_coin_spawned(coins) {
                    scheduler.reschedule(coin_timer, interval);
                }
            }
        }
    }

    // The cadence only tightened while fewer than three coins were out, so
    // it stalls far above the wolf's entry threshold.
    assert!(!PursuitController::should_appear(spawn.countdown()));
    assert!(coins > 3);
}

#[test]
fn coins_spawn_inside_the_playfield() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..500 {
        let (x, y) = random_coin_pos(&mut rng, WIDTH, HEIGHT);
        let coin = coin_at(x, y);
        let (min, max) = coin.bounds();
        assert!(min.x >= SPAWN_MARGIN - coin.half_extents().x);
        assert!(max.x <= WIDTH - SPAWN_MARGIN + coin.half_extents().x);
        assert!(min.y >= SPAWN_MARGIN - coin.half_extents().y);
        assert!(max.y <= HEIGHT - SPAWN_MARGIN + coin.half_extents().y);
    }
}

#[test]
fn the_wolf_chase_is_monotonically_closing_until_contact() {
    let mut pursuit = PursuitController::new();
    let target = Vec2::new(650.0, 120.0);
    let mut w = wolf();
    let player = Sprite::new("player", Vec2::new(32.0, 40.0))
        .at(target.x, target.y)
        .with_scale(0.5);

    let mut last_distance = w.center.distance(target);
    let mut steps = 0;
    while !w.collides_with(&player) {
        w.center = pursuit.step_toward(w.center, target);
        let distance = w.center.distance(target);
        assert!(distance < last_distance, "chase stalled after {steps} steps");
        last_distance = distance;
        steps += 1;
        assert!(steps < 1000, "wolf never reached the player");
    }
}
