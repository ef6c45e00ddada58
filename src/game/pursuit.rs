use glam::Vec2;

/// Seconds between wolf movement steps.
pub const WOLF_TICK: f32 = 0.2;
/// Pixels per step when the wolf first appears.
pub const INITIAL_PACE: f32 = 1.0;
/// Pace gained on every movement step.
pub const PACE_GAIN: f32 = 0.1;
/// The wolf enters once the coin countdown drops below this.
pub const APPEAR_THRESHOLD: f32 = 1.5;

// ── PursuitController ────────────────────────────────────────────────────────

/// Wolf chase logic.
///
/// The wolf closes on the player one axis-aligned step at a time: each tick
/// it moves `pace` pixels toward the player independently on X and Y, then
/// accelerates.  It never overshoots direction (an axis already aligned stays
/// put), so the chase tightens into an L-shaped pursuit near the player.
#[derive(Debug)]
pub struct PursuitController {
    pace: f32,
}

impl PursuitController {
    pub fn new() -> Self {
        Self { pace: INITIAL_PACE }
    }

    pub fn pace(&self) -> f32 {
        self.pace
    }

    /// True once the spawn countdown is tight enough for the wolf to enter.
    pub fn should_appear(countdown: f32) -> bool {
        countdown < APPEAR_THRESHOLD
    }

    /// Advance the wolf one step toward the player and accelerate.
    pub fn step_toward(&mut self, wolf: Vec2, player: Vec2) -> Vec2 {
        let next = Vec2::new(
            wolf.x - (wolf.x - player.x).signum_or_zero() * self.pace,
            wolf.y - (wolf.y - player.y).signum_or_zero() * self.pace,
        );
        self.pace += PACE_GAIN;
        next
    }

    pub fn reset(&mut self) {
        self.pace = INITIAL_PACE;
    }
}

impl Default for PursuitController {
    fn default() -> Self {
        Self::new()
    }
}

trait SignumOrZero {
    /// `signum` that treats an exact zero as zero instead of +1.
    fn signum_or_zero(self) -> f32;
}

impl SignumOrZero for f32 {
    fn signum_or_zero(self) -> f32 {
        if self == 0.0 { 0.0 } else { self.signum() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wolf_appears_only_below_the_threshold() {
        assert!(!PursuitController::should_appear(2.5));
        assert!(!PursuitController::should_appear(1.5));
        assert!(PursuitController::should_appear(1.4));
    }

    #[test]
    fn step_moves_both_axes_toward_the_player() {
        let mut pursuit = PursuitController::new();
        let next = pursuit.step_toward(Vec2::new(400.0, 300.0), Vec2::new(100.0, 500.0));
        assert_eq!(next, Vec2::new(399.0, 301.0));
    }

    #[test]
    fn aligned_axis_stays_put() {
        let mut pursuit = PursuitController::new();
        let next = pursuit.step_toward(Vec2::new(400.0, 300.0), Vec2::new(400.0, 100.0));
        assert_eq!(next.x, 400.0);
        assert_eq!(next.y, 299.0);
    }

    #[test]
    fn pace_grows_every_step() {
        let mut pursuit = PursuitController::new();
        let origin = Vec2::ZERO;
        let target = Vec2::new(1000.0, 1000.0);
        pursuit.step_toward(origin, target);
        pursuit.step_toward(origin, target);
        pursuit.step_toward(origin, target);
        assert!((pursuit.pace() - 1.3).abs() < 1e-5);
    }

    #[test]
    fn faster_pace_means_bigger_steps() {
        let mut pursuit = PursuitController::new();
        let target = Vec2::new(1000.0, 0.0);
        let mut wolf = Vec2::ZERO;
        let first = pursuit.step_toward(wolf, target).x - wolf.x;
        wolf = Vec2::new(first, 0.0);
        let second = pursuit.step_toward(wolf, target).x - wolf.x;
        assert!(second > first);
    }

    #[test]
    fn reset_restores_the_initial_pace() {
        let mut pursuit = PursuitController::new();
        pursuit.step_toward(Vec2::ZERO, Vec2::ONE);
        pursuit.reset();
        assert_eq!(pursuit.pace(), INITIAL_PACE);
    }
}
