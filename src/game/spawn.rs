use rand::Rng;

/// Seconds between coin spawns when a round starts.
pub const INITIAL_COUNTDOWN: f32 = 2.5;
/// How much the countdown shrinks per speed-up.
pub const COUNTDOWN_STEP: f32 = 0.1;
/// Countdown values below this wrap back up to `COUNTDOWN_WRAP`.
pub const COUNTDOWN_MIN: f32 = 0.1;
pub const COUNTDOWN_WRAP: f32 = 0.3;
/// The countdown only shrinks while fewer than this many coins are on screen.
pub const SPEEDUP_COIN_THRESHOLD: usize = 3;
/// Coins spawn at least this many pixels away from every window edge.
pub const SPAWN_MARGIN: f32 = 20.0;

// ── SpawnController ──────────────────────────────────────────────────────────

/// Adaptive coin-spawn pacing.
///
/// The spawn timer starts slow and tightens by `COUNTDOWN_STEP` each time a
/// coin spawns while the player is keeping the field nearly clear (fewer than
/// `SPEEDUP_COIN_THRESHOLD` coins on screen).  Once the countdown would drop
/// below `COUNTDOWN_MIN` it wraps back up to `COUNTDOWN_WRAP`, giving the
/// player a brief breather before tightening again.
#[derive(Debug)]
pub struct SpawnController {
    countdown: f32,
}

impl SpawnController {
    pub fn new() -> Self {
        Self { countdown: INITIAL_COUNTDOWN }
    }

    /// Current interval between coin spawns in seconds.
    pub fn countdown(&self) -> f32 {
        self.countdown
    }

    /// Record that a coin just spawned with `coins_on_screen` coins now
    /// present.  Returns the new interval when the pacing changed and the
    /// spawn timer must be rescheduled, or None to keep the current cadence.
    pub fn on_coin_spawned(&mut self, coins_on_screen: usize) -> Option<f32> {
        if coins_on_screen >= SPEEDUP_COIN_THRESHOLD {
            return None;
        }
        self.countdown -= COUNTDOWN_STEP;
        if self.countdown < COUNTDOWN_MIN {
            self.countdown = COUNTDOWN_WRAP;
        }
        Some(self.countdown)
    }

    pub fn reset(&mut self) {
        self.countdown = INITIAL_COUNTDOWN;
    }
}

impl Default for SpawnController {
    fn default() -> Self {
        Self::new()
    }
}

/// Pick a uniform random coin position inside the window, inset by
/// `SPAWN_MARGIN` on every side.
pub fn random_coin_pos<R: Rng>(rng: &mut R, width: f32, height: f32) -> (f32, f32) {
    (
        rng.gen_range(SPAWN_MARGIN..=width - SPAWN_MARGIN),
        rng.gen_range(SPAWN_MARGIN..=height - SPAWN_MARGIN),
    )
}
