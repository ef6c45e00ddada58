pub mod pursuit;
pub mod spawn;

use glam::Vec2;
use rand::rngs::ThreadRng;

use crate::config::{SAVE_PATH, SaveData};
use crate::engine::{Color, Engine, Game, MouseButton};
use crate::schedule::{Scheduler, TimerId};
use crate::sprite::{Sprite, collisions_with};
use pursuit::{PursuitController, WOLF_TICK};
use spawn::{SpawnController, random_coin_pos};

pub const COIN_VALUE: u32 = 10;
pub const PLAYER_SCALE: f32 = 0.5;
pub const COIN_SCALE: f32 = 0.5;
pub const WOLF_SCALE: f32 = 1.0;

const STATUS_FONT_SIZE: f32 = 32.0;
const STATUS_MARGIN: f32 = 50.0;
const BEST_FONT_SIZE: f32 = 20.0;
const RESTART_FONT_SIZE: f32 = 24.0;

// ── CoinGame ─────────────────────────────────────────────────────────────────

/// One endless round: chase coins with the mouse until the wolf catches you,
/// then click to start over.
pub struct CoinGame {
    width: f32,
    height: f32,

    player: Sprite,
    coins: Vec<Sprite>,
    wolf: Option<Sprite>,
    /// Base pixel sizes, filled in from the sprite atlas in `on_enter`.
    coin_size: Vec2,
    wolf_size: Vec2,

    score: u32,
    high_score: u32,
    game_over: bool,

    scheduler: Scheduler,
    coin_timer: TimerId,
    wolf_timer: TimerId,
    spawn: SpawnController,
    pursuit: PursuitController,

    /// Master volume from settings.json, applied in `on_enter`.
    volume: f32,

    rng: ThreadRng,
}

impl CoinGame {
    pub fn new(width: f32, height: f32, high_score: u32) -> Self {
        let mut scheduler = Scheduler::new();
        let spawn = SpawnController::new();
        let coin_timer = scheduler.schedule(spawn.countdown());
        let wolf_timer = scheduler.schedule(WOLF_TICK);

        Self {
            width,
            height,
            player: Sprite::new("player", Vec2::ZERO)
                .at(width / 2.0, height / 2.0)
                .with_scale(PLAYER_SCALE),
            coins: Vec::new(),
            wolf: None,
            coin_size: Vec2::ZERO,
            wolf_size: Vec2::ZERO,
            score: 0,
            high_score,
            game_over: false,
            scheduler,
            coin_timer,
            wolf_timer,
            spawn,
            pursuit: PursuitController::new(),
            volume: 1.0,
            rng: rand::thread_rng(),
        }
    }

    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = volume;
        self
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Restart the round in place, keeping the high score.
    fn reset(&mut self) {
        self.coins.clear();
        self.wolf = None;
        self.score = 0;
        self.game_over = false;
        self.spawn.reset();
        self.pursuit.reset();

        if !self.scheduler.reschedule(self.coin_timer, self.spawn.countdown()) {
            self.coin_timer = self.scheduler.schedule(self.spawn.countdown());
        }
        if !self.scheduler.reschedule(self.wolf_timer, WOLF_TICK) {
            self.wolf_timer = self.scheduler.schedule(WOLF_TICK);
        }
    }

    /// Place a coin at `(x, y)` and tighten the spawn cadence when the field
    /// is nearly clear.  Returns the new spawn interval when the cadence
    /// changed.  Ignored once the round is over.
    fn spawn_coin_at(&mut self, x: f32, y: f32) -> Option<f32> {
        if self.game_over {
            return None;
        }
        self.coins.push(
            Sprite::new("coin", self.coin_size)
                .at(x, y)
                .with_scale(COIN_SCALE),
        );
        let rescheduled = self.spawn.on_coin_spawned(self.coins.len());
        if let Some(interval) = rescheduled {
            self.scheduler.reschedule(self.coin_timer, interval);
        }
        rescheduled
    }

    /// One wolf timer tick: move the wolf if it is out, or bring it on stage
    /// once the spawn cadence is tight enough.  Returns true on the tick the
    /// wolf first appears.
    fn wolf_tick(&mut self) -> bool {
        match self.wolf.as_mut() {
            Some(wolf) => {
                wolf.center = self.pursuit.step_toward(wolf.center, self.player.center);
                false
            }
            None if PursuitController::should_appear(self.spawn.countdown()) => {
                self.wolf = Some(
                    Sprite::new("wolf", self.wolf_size)
                        .at(self.width / 2.0, self.height / 2.0)
                        .with_scale(WOLF_SCALE),
                );
                true
            }
            None => false,
        }
    }

    /// Remove every coin touching the player.  Returns how many were taken.
    fn collect_coins(&mut self) -> usize {
        let hits = collisions_with(&self.player, &self.coins);
        for &index in hits.iter().rev() {
            self.coins.remove(index);
            self.score += COIN_VALUE;
        }
        // The best readout tracks a record run live, not just at game over.
        if self.score > self.high_score {
            self.high_score = self.score;
        }
        hits.len()
    }

    /// End the round if the wolf has reached the player.  Returns true on
    /// the tick the round ends.
    fn check_wolf_contact(&mut self) -> bool {
        if self.game_over {
            return false;
        }
        let caught = self
            .wolf
            .as_ref()
            .is_some_and(|wolf| wolf.collides_with(&self.player));
        if caught {
            self.game_over = true;
            self.scheduler.cancel(self.wolf_timer);
            if self.score > self.high_score {
                self.high_score = self.score;
            }
        }
        caught
    }
}

impl Game for CoinGame {
    fn on_enter(&mut self, engine: &mut Engine) {
        engine.set_background(Color::BROWN);
        engine.audio.set_master_volume(self.volume);
        engine.audio.load_sound_folder(crate::SOUND_FOLDER);
        // Optional: drop a "music.ogg" into the sounds folder to get a
        // looping background track.
        engine.audio.play_music("music", 1.0);

        for (name, slot) in [("coin", &mut self.coin_size), ("wolf", &mut self.wolf_size)] {
            if let Some((w, h)) = engine.sprite_size(name) {
                *slot = Vec2::new(w, h);
            } else {
                eprintln!("[game] missing sprite '{name}'");
            }
        }
        if let Some((w, h)) = engine.sprite_size("player") {
            self.player.size = Vec2::new(w, h);
        } else {
            eprintln!("[game] missing sprite 'player'");
        }
    }

    fn update(&mut self, engine: &mut Engine) {
        if engine.is_mouse_pressed(MouseButton::Left) {
            self.reset();
        }

        if !self.game_over {
            let [mx, my] = engine.mouse_pos();
            self.player.center = Vec2::new(
                mx.clamp(0.0, self.width),
                my.clamp(0.0, self.height),
            );
        }

        for id in self.scheduler.tick(engine.dt()) {
            if id == self.coin_timer {
                let (x, y) = random_coin_pos(&mut self.rng, self.width, self.height);
                self.spawn_coin_at(x, y);
            } else if id == self.wolf_timer && self.wolf_tick() {
                engine.play_sound("wolf_howl");
            }
        }

        for _ in 0..self.collect_coins() {
            engine.play_sound("coin_pickup");
        }

        if self.check_wolf_contact() {
            engine.play_sound("wolf_howl");
            SaveData { high_score: self.high_score }.store(SAVE_PATH);
        }
    }

    fn render(&mut self, engine: &mut Engine) {
        for coin in &self.coins {
            engine.draw_sprite(&coin.name, coin.center.x, coin.center.y, coin.scale, Color::WHITE);
        }
        engine.draw_sprite(
            &self.player.name,
            self.player.center.x,
            self.player.center.y,
            self.player.scale,
            Color::WHITE,
        );
        if let Some(wolf) = &self.wolf {
            engine.draw_sprite(&wolf.name, wolf.center.x, wolf.center.y, wolf.scale, Color::WHITE);
        }

        let status = if self.game_over {
            format!("GAME OVER - Score: {}", self.score)
        } else {
            format!("Score: {}", self.score)
        };
        engine.draw_text(
            &status,
            STATUS_MARGIN,
            self.height - STATUS_MARGIN - STATUS_FONT_SIZE,
            STATUS_FONT_SIZE,
            Color::BLACK,
        );

        engine.draw_text(
            &format!("Best: {}", self.high_score),
            10.0,
            10.0,
            BEST_FONT_SIZE,
            Color::BLACK,
        );

        if self.game_over {
            let prompt = "CLICK TO RESTART";
            let x = (self.width - engine.text_width(prompt, RESTART_FONT_SIZE)) / 2.0;
            engine.draw_text(prompt, x, self.height / 2.0, RESTART_FONT_SIZE, Color::YELLOW);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game() -> CoinGame {
        let mut game = CoinGame::new(800.0, 600.0, 0);
        game.coin_size = Vec2::new(24.0, 24.0);
        game.wolf_size = Vec2::new(48.0, 48.0);
        game.player.size = Vec2::new(32.0, 40.0);
        game
    }

    #[test]
    fn collecting_a_coin_scores_and_removes_it() {
        let mut game = game();
        game.spawn_coin_at(400.0, 300.0);
        game.player.center = Vec2::new(400.0, 300.0);
        assert_eq!(game.collect_coins(), 1);
        assert_eq!(game.score(), COIN_VALUE);
        assert!(game.coins.is_empty());
    }

    #[test]
    fn distant_coins_are_not_collected() {
        let mut game = game();
        game.spawn_coin_at(100.0, 100.0);
        game.player.center = Vec2::new(700.0, 500.0);
        assert_eq!(game.collect_coins(), 0);
        assert_eq!(game.score(), 0);
        assert_eq!(game.coins.len(), 1);
    }

    #[test]
    fn overlapping_coins_are_all_collected_at_once() {
        let mut game = game();
        game.spawn_coin_at(400.0, 300.0);
        game.spawn_coin_at(402.0, 298.0);
        game.spawn_coin_at(398.0, 302.0);
        game.player.center = Vec2::new(400.0, 300.0);
        assert_eq!(game.collect_coins(), 3);
        assert_eq!(game.score(), 3 * COIN_VALUE);
    }

    #[test]
    fn wolf_stays_away_until_the_cadence_tightens() {
        let mut game = game();
        assert!(!game.wolf_tick());
        assert!(game.wolf.is_none());
    }

    #[test]
    fn wolf_appears_at_the_window_center_once_due() {
        let mut game = game();
        // Tighten the cadence below the appearance threshold.
        for _ in 0..11 {
            game.spawn.on_coin_spawned(0);
        }
        assert!(game.wolf_tick());
        let wolf = game.wolf.as_ref().unwrap();
        assert_eq!(wolf.center, Vec2::new(400.0, 300.0));
        // Later ticks move the wolf instead of spawning another.
        assert!(!game.wolf_tick());
    }

    #[test]
    fn wolf_contact_ends_the_round_and_records_the_best() {
        let mut game = game();
        game.score = 70;
        game.wolf = Some(
            Sprite::new("wolf", game.wolf_size)
                .at(400.0, 300.0)
                .with_scale(WOLF_SCALE),
        );
        game.player.center = Vec2::new(400.0, 300.0);
        assert!(game.check_wolf_contact());
        assert!(game.is_game_over());
        assert_eq!(game.high_score, 70);
        assert!(!game.scheduler.is_scheduled(game.wolf_timer));
    }

    #[test]
    fn a_lower_score_keeps_the_old_best() {
        let mut game = CoinGame::new(800.0, 600.0, 120);
        game.wolf_size = Vec2::new(48.0, 48.0);
        game.player.size = Vec2::new(32.0, 40.0);
        game.score = 50;
        game.wolf = Some(
            Sprite::new("wolf", game.wolf_size)
                .at(400.0, 300.0)
                .with_scale(WOLF_SCALE),
        );
        game.player.center = Vec2::new(400.0, 300.0);
        game.check_wolf_contact();
        assert_eq!(game.high_score, 120);
    }

    #[test]
    fn no_coins_spawn_after_the_round_ends() {
        let mut game = game();
        game.game_over = true;
        assert_eq!(game.spawn_coin_at(100.0, 100.0), None);
        assert!(game.coins.is_empty());
    }

    #[test]
    fn reset_restores_a_fresh_round() {
        let mut game = game();
        game.spawn_coin_at(100.0, 100.0);
        game.score = 40;
        game.high_score = 40;
        game.game_over = true;
        game.scheduler.cancel(game.wolf_timer);

        game.reset();

        assert!(game.coins.is_empty());
        assert!(game.wolf.is_none());
        assert_eq!(game.score(), 0);
        assert_eq!(game.high_score, 40);
        assert!(!game.is_game_over());
        assert!(game.scheduler.is_scheduled(game.coin_timer));
        assert!(game.scheduler.is_scheduled(game.wolf_timer));
        assert_eq!(game.spawn.countdown(), spawn::INITIAL_COUNTDOWN);
    }

    #[test]
    fn wolf_closes_in_over_successive_ticks() {
        let mut game = game();
        game.wolf = Some(
            Sprite::new("wolf", game.wolf_size)
                .at(100.0, 100.0)
                .with_scale(WOLF_SCALE),
        );
        game.player.center = Vec2::new(500.0, 500.0);

        let start = game.wolf.as_ref().unwrap().center;
        for _ in 0..10 {
            game.wolf_tick();
        }
        let end = game.wolf.as_ref().unwrap().center;
        assert!(end.x > start.x && end.y > start.y);
        assert!(game.player.center.distance(end) < game.player.center.distance(start));
    }
}
