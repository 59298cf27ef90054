//! Reviewer selection policy.
//!
//! Both functions take candidates that are already filtered (active, not the
//! author, not already reviewing) and only decide which of them to use.

use rand::{Rng, seq::SliceRandom};

/// Upper bound on reviewers assigned when a pull request is created.
pub const MAX_REVIEWERS: usize = 2;

/// Shuffles the pool and keeps the first [`MAX_REVIEWERS`] entries in shuffled order.
pub fn pick_reviewers<R: Rng + ?Sized>(mut candidates: Vec<String>, rng: &mut R) -> Vec<String> {
    candidates.shuffle(rng);
    candidates.truncate(MAX_REVIEWERS);
    candidates
}

/// Picks one replacement uniformly at random, or `None` for an empty pool.
pub fn pick_replacement<R: Rng + ?Sized>(candidates: &[String], rng: &mut R) -> Option<String> {
    candidates.choose(rng).cloned()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn empty_pool_yields_no_reviewers() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(pick_reviewers(Vec::new(), &mut rng).is_empty());
        assert_eq!(pick_replacement(&[], &mut rng), None);
    }

    #[test]
    fn single_candidate_is_always_chosen() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(pick_reviewers(ids(&["u2"]), &mut rng), ids(&["u2"]));
        assert_eq!(pick_replacement(&ids(&["u3"]), &mut rng), Some("u3".to_string()));
    }

    #[test]
    fn picks_at_most_two_distinct_reviewers_from_pool() {
        let pool = ids(&["u2", "u3", "u4", "u5"]);
        let allowed: HashSet<_> = pool.iter().cloned().collect();

        for seed in 0..64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let picked = pick_reviewers(pool.clone(), &mut rng);

            assert_eq!(picked.len(), MAX_REVIEWERS);
            assert_ne!(picked[0], picked[1]);
            assert!(picked.iter().all(|id| allowed.contains(id)));
        }
    }

    #[test]
    fn every_candidate_is_reachable() {
        let pool = ids(&["u2", "u3", "u4"]);
        let mut seen_first = HashSet::new();
        let mut seen_replacement = HashSet::new();

        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            seen_first.insert(pick_reviewers(pool.clone(), &mut rng)[0].clone());
            if let Some(id) = pick_replacement(&pool, &mut rng) {
                seen_replacement.insert(id);
            }
        }

        assert_eq!(seen_first.len(), pool.len());
        assert_eq!(seen_replacement.len(), pool.len());
    }

    #[test]
    fn same_seed_gives_same_selection() {
        let pool = ids(&["u2", "u3", "u4", "u5", "u6"]);
        let mut first = StdRng::seed_from_u64(42);
        let mut second = StdRng::seed_from_u64(42);

        assert_eq!(
            pick_reviewers(pool.clone(), &mut first),
            pick_reviewers(pool.clone(), &mut second)
        );
        assert_eq!(
            pick_replacement(&pool, &mut first),
            pick_replacement(&pool, &mut second)
        );
    }
}
