// Draw engine: random winner selection and reel padding for the animation.
//
// Winners come from a full shuffle of the eligible pool; the first `count`
// shuffled names win, in shuffled order. Reels are decoration built after the
// winners are fixed and never feed back into selection.

use std::time::Duration;

use rand::seq::SliceRandom;
use rand::Rng;

/// Default number of names on each animated reel (including the winner).
pub const DEFAULT_REEL_LENGTH: usize = 40;

/// Default length of the reel animation.
pub const DEFAULT_ANIMATION: Duration = Duration::from_millis(3500);

/// Extra wait after the animation ends before the result is reported, so the
/// last reel frame has landed when winners are announced.
pub const SETTLE_DELAY: Duration = Duration::from_millis(100);

/// Clamp a requested winner count to `[1, max(1, pool_len)]`.
pub fn clamp_count(count: usize, pool_len: usize) -> usize {
    count.clamp(1, pool_len.max(1))
}

/// Select winners from `pool`.
///
/// The pool is fully shuffled and the first `clamp_count(count, pool.len())`
/// names are returned in shuffled order. An empty pool yields no winners;
/// callers are expected to guard against drawing from an empty pool.
pub fn draw<R: Rng + ?Sized>(pool: &[String], count: usize, rng: &mut R) -> Vec<String> {
    if pool.is_empty() {
        return Vec::new();
    }

    let mut shuffled = pool.to_vec();
    shuffled.shuffle(rng);
    shuffled.truncate(clamp_count(count, pool.len()));
    shuffled
}

/// Build the spinning reel for one winner slot.
///
/// Produces `len - 1` names sampled from `pool` with replacement, followed by
/// `winner`. A zero `len` is treated as one so the winner is always present.
pub fn spin_reel<R: Rng + ?Sized>(
    pool: &[String],
    winner: &str,
    len: usize,
    rng: &mut R,
) -> Vec<String> {
    let padding = len.max(1) - 1;
    let mut reel = Vec::with_capacity(padding + 1);
    if !pool.is_empty() {
        for _ in 0..padding {
            reel.push(pool[rng.gen_range(0..pool.len())].clone());
        }
    }
    reel.push(winner.to_string());
    reel
}

/// The result of planning one draw: the winners and one reel per winner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawOutcome {
    /// Winners in reveal order (slot order).
    pub winners: Vec<String>,
    /// One reel per winner; each reel ends with that slot's winner.
    pub reels: Vec<Vec<String>>,
}

/// Select winners and build their reels in one step.
pub fn plan_draw<R: Rng + ?Sized>(
    pool: &[String],
    count: usize,
    reel_length: usize,
    rng: &mut R,
) -> DrawOutcome {
    let winners = draw(pool, count, rng);
    let reels = winners
        .iter()
        .map(|winner| spin_reel(pool, winner, reel_length, rng))
        .collect();
    DrawOutcome { winners, reels }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
