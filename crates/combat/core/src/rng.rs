//! RNG oracle for deterministic random number generation.
//!
//! Hit rolls, damage variance, steals and enemy ability picks all draw from a
//! seed-addressed oracle. Given the same battle seed and the same sequence of
//! actions a battle replays identically, which is what the tests rely on.

/// RNG oracle for deterministic random number generation.
///
/// Implementations must be deterministic and produce the same values
/// given the same seed.
pub trait RngOracle: Send + Sync {
    /// Generate a random u32 value from a seed.
    fn next_u32(&self, seed: u64) -> u32;

    /// Roll a d100 (1-100 inclusive).
    fn roll_d100(&self, seed: u64) -> u32 {
        (self.next_u32(seed) % 100) + 1
    }

    /// Generate a random value in range [min, max] inclusive.
    fn range(&self, seed: u64, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        let span = u64::from(max - min) + 1;
        min + (u64::from(self.next_u32(seed)) % span) as u32
    }

    /// Uniform value in `[0.0, 1.0]`.
    fn unit_f64(&self, seed: u64) -> f64 {
        self.next_u32(seed) as f64 / u32::MAX as f64
    }
}

/// PCG random number generator (PCG-XSH-RR, 64-bit state, 32-bit output).
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        Self::pcg_output(Self::pcg_step(seed))
    }
}

/// Compute a deterministic seed from battle state components.
///
/// * `battle_seed` - drawn once when the battle starts
/// * `nonce` - action sequence number within the battle
/// * `actor` - numeric id of the acting participant
/// * `context` - distinguishes independent rolls within one action
pub fn compute_seed(battle_seed: u64, nonce: u64, actor: u64, context: u32) -> u64 {
    let mut hash = battle_seed;
    hash ^= nonce.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= actor.wrapping_mul(0x517cc1b727220a95);
    hash ^= (context as u64).wrapping_mul(0x85ebca6b);

    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;

    hash
}

/// Cursor over independent rolls for one action.
///
/// Each call advances the context counter, so two rolls inside the same
/// resolution never share a seed.
pub struct Dice<'a> {
    rng: &'a dyn RngOracle,
    battle_seed: u64,
    nonce: u64,
    actor: u64,
    context: u32,
}

impl<'a> Dice<'a> {
    pub fn new(rng: &'a dyn RngOracle, battle_seed: u64, nonce: u64, actor: u64) -> Self {
        Self {
            rng,
            battle_seed,
            nonce,
            actor,
            context: 0,
        }
    }

    fn next_seed(&mut self) -> u64 {
        let seed = compute_seed(self.battle_seed, self.nonce, self.actor, self.context);
        self.context = self.context.wrapping_add(1);
        seed
    }

    pub fn d100(&mut self) -> u32 {
        let seed = self.next_seed();
        self.rng.roll_d100(seed)
    }

    pub fn range(&mut self, min: u32, max: u32) -> u32 {
        let seed = self.next_seed();
        self.rng.range(seed, min, max)
    }

    /// Uniform float in `[low, high]`.
    pub fn uniform(&mut self, low: f64, high: f64) -> f64 {
        let seed = self.next_seed();
        low + (high - low) * self.rng.unit_f64(seed)
    }

    /// Uniform index into a slice of `len` items. `len` must be non-zero.
    pub fn pick(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        self.range(0, (len - 1) as u32) as usize
    }
}
