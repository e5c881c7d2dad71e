//! Uniform random choice of the winning contact.

use rand::Rng;
use rand::seq::IndexedRandom;

use crate::contact::ContactId;

/// Draw one id uniformly from `ids`.
///
/// The session only calls this with two or more candidates; an empty slice
/// yields `None`.
pub fn pick<R: Rng + ?Sized>(rng: &mut R, ids: &[ContactId]) -> Option<ContactId> {
    ids.choose(rng).copied()
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn empty_yields_none() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(pick(&mut rng, &[]), None);
    }

    #[test]
    fn pick_is_member() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let ids = [4, 8, 15, 16, 23, 42];
        for _ in 0..200 {
            let id = pick(&mut rng, &ids).unwrap();
            assert!(ids.contains(&id));
        }
    }

    #[test]
    fn same_seed_same_winner() {
        let ids = [1, 2, 3, 4, 5];
        let a = pick(&mut ChaCha8Rng::seed_from_u64(99), &ids);
        let b = pick(&mut ChaCha8Rng::seed_from_u64(99), &ids);
        assert_eq!(a, b);
    }

    #[test]
    fn every_candidate_can_win() {
        // 3 candidates × 600 draws: each should land well away from zero.
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let ids = [10, 20, 30];
        let mut wins = [0usize; 3];
        for _ in 0..600 {
            let id = pick(&mut rng, &ids).unwrap();
            wins[ids.iter().position(|&x| x == id).unwrap()] += 1;
        }
        for (i, &w) in wins.iter().enumerate() {
            assert!(w > 100, "candidate {} won only {} of 600", ids[i], w);
        }
    }
}
