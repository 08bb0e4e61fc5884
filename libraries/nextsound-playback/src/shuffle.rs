//! Shuffle selection for the up-next queue
//!
//! Shuffle never reorders the queue. It only changes which entry is taken
//! when the next track is needed: a uniform random index instead of the head.

use rand::Rng;

/// Index of the next entry to play from a queue of `len` entries
///
/// Returns `None` for an empty queue.
pub fn pick_index<R: Rng + ?Sized>(len: usize, shuffled: bool, rng: &mut R) -> Option<usize> {
    match (len, shuffled) {
        (0, _) => None,
        (_, false) => Some(0),
        (len, true) => Some(rng.gen_range(0..len)),
    }
}
