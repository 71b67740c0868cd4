//! Simulated peer typing.

use rand::Rng;

use crate::models::SELF_ID;

use super::Store;

/// Chance per tick that a peer flips its typing flag.
pub const DEFAULT_TYPING_PROBABILITY: f64 = 0.1;

impl Store {
    /// Each peer independently flips its typing flag with `probability`.
    ///
    /// The local user is never touched. Returns how many flags flipped.
    pub fn simulate_typing<R: Rng + ?Sized>(&mut self, rng: &mut R, probability: f64) -> usize {
        let p = probability.clamp(0.0, 1.0);
        let mut flipped = 0;
        for user in self.users.iter_mut().filter(|u| u.id != SELF_ID) {
            if rng.random_bool(p) {
                user.typing = !user.typing;
                flipped += 1;
                tracing::debug!("{} typing: {}", user.name, user.typing);
            }
        }
        flipped
    }
}
