use crate::cache::equity::EquityCache;
use crate::cache::key::Key;
use crate::cards::card::Card;
use crate::cards::deck::Deck;
use crate::cards::hand::Hand;
use crate::cards::strength::Strength;
use crate::Probability;

/// Monte Carlo estimator of hand-vs-hand equity.
///
/// Results come back aligned to the caller's hand order even though the
/// cache key sorts its inputs. Cache hits are authoritative: a repeated
/// request returns the stored estimate verbatim, never a resimulation,
/// so identical calls are deterministic despite the sampling inside.
#[derive(Debug)]
pub struct Calculator {
    cache: EquityCache,
}

impl Calculator {
    pub fn new(cache: EquityCache) -> Self {
        Self { cache }
    }

    /// Equity of each hand against the others, in [0, 1], aligned to
    /// input order. Unparseable hand strings never win a trial and never
    /// raise; garbage in, zeros out.
    pub fn estimate(
        &self,
        hands: &[String],
        board: &[String],
        iterations: usize,
    ) -> Vec<Probability> {
        let key = Self::key(hands, board, iterations);
        if let Some(cached) = self.cache.get(&key) {
            return cached;
        }
        let equities = Self::simulate(hands, board, iterations);
        self.cache.put(key, &equities);
        equities
    }

    pub fn hit_rate(&self) -> Probability {
        self.cache.hit_rate()
    }

    pub fn trim(&self, keep: usize) -> usize {
        self.cache.trim(keep)
    }

    /// hands and board participate sorted so that permuted calls
    /// collapse onto one entry; prefixes keep the groups from bleeding
    /// into each other
    fn key(hands: &[String], board: &[String], iterations: usize) -> Key {
        let mut hands = hands.iter().map(|h| format!("h:{}", h)).collect::<Vec<_>>();
        let mut board = board.iter().map(|b| format!("b:{}", b)).collect::<Vec<_>>();
        hands.sort();
        board.sort();
        Key::of(
            std::iter::empty()
                .chain(hands)
                .chain(board)
                .chain(std::iter::once(format!("n:{}", iterations))),
        )
    }

    fn simulate(hands: &[String], board: &[String], iterations: usize) -> Vec<Probability> {
        use rand::rngs::SmallRng;
        use rand::SeedableRng;
        let holes = hands
            .iter()
            .map(|s| Hand::try_from(s.as_str()).ok().filter(|h| h.size() == 2))
            .collect::<Vec<Option<Hand>>>();
        for (hand, hole) in hands.iter().zip(holes.iter()) {
            if hole.is_none() {
                log::warn!("treating unparseable hand as dead: {:?}", hand);
            }
        }
        let public = board
            .iter()
            .filter_map(|s| Card::try_from(s.as_str()).ok())
            .map(Hand::from)
            .fold(Hand::empty(), Hand::union);
        let committed = holes.iter().flatten().fold(public, |a, &h| Hand::union(a, h));
        let stock = Deck::without(committed);
        let mut rng = SmallRng::from_rng(&mut rand::rng());
        let mut wins = vec![0f32; hands.len()];
        for _ in 0..iterations {
            let mut deck = stock;
            let mut table = public;
            while table.size() < 5 {
                table = Hand::union(table, Hand::from(deck.draw(&mut rng)));
            }
            let scores = holes
                .iter()
                .map(|hole| hole.map(|h| Strength::from(Hand::union(h, table))))
                .collect::<Vec<Option<Strength>>>();
            if let Some(best) = scores.iter().flatten().max().copied() {
                let split = scores.iter().flatten().filter(|&&s| s == best).count();
                for (win, score) in wins.iter_mut().zip(scores.iter()) {
                    if *score == Some(best) {
                        *win += 1. / split as f32;
                    }
                }
            }
        }
        match iterations {
            0 => wins,
            n => wins.into_iter().map(|w| w / n as f32).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calculator(name: &str) -> Calculator {
        let dir = std::env::temp_dir()
            .join("gtocore")
            .join(format!("{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        Calculator::new(EquityCache::new(dir, 64).unwrap())
    }

    fn hands(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn aligned_to_input_order_and_bounded() {
        let calc = calculator("bounds");
        let equities = calc.estimate(&hands(&["AsAh", "KdKc", "7c2d"]), &[], 500);
        assert_eq!(equities.len(), 3);
        for equity in &equities {
            assert!(*equity >= 0.);
            assert!(*equity <= 1.);
        }
        let total = equities.iter().sum::<Probability>();
        assert!((total - 1.0).abs() < 1e-3);
    }

    #[test]
    fn repeat_calls_are_bit_identical() {
        let calc = calculator("determinism");
        let inputs = hands(&["AsAh", "KdKc"]);
        let first = calc.estimate(&inputs, &[], 300);
        let second = calc.estimate(&inputs, &[], 300);
        assert_eq!(first, second);
        assert!(calc.hit_rate() > 0.);
    }

    #[test]
    fn aces_beat_deuces() {
        let calc = calculator("aces");
        let equities = calc.estimate(&hands(&["AsAh", "2c2d"]), &[], 2000);
        assert!(equities[0] > equities[1]);
    }

    #[test]
    fn permuted_inputs_share_a_cache_entry() {
        let calc = calculator("permuted");
        let forward = calc.estimate(&hands(&["AsAh", "KdKc"]), &[], 200);
        let backward = calc.estimate(&hands(&["KdKc", "AsAh"]), &[], 200);
        // the permuted call is a hit, served verbatim from the entry
        assert!(calc.hit_rate() > 0.);
        assert_eq!(forward, backward);
    }

    #[test]
    fn unparseable_hands_are_dead() {
        let calc = calculator("garbage");
        let equities = calc.estimate(&hands(&["AsAh", "garbage"]), &[], 200);
        assert_eq!(equities[1], 0.);
        assert!(equities[0] > 0.9);
    }

    #[test]
    fn board_cards_are_committed() {
        let calc = calculator("board");
        let board = hands(&["Ad", "Ac", "7h"]);
        let equities = calc.estimate(&hands(&["AsAh", "KdKc"]), &board, 500);
        // quads on the flop
        assert!(equities[0] > 0.95);
    }

    #[test]
    fn zero_iterations_yield_zeros() {
        let calc = calculator("zero");
        assert_eq!(calc.estimate(&hands(&["AsAh", "KdKc"]), &[], 0), vec![0., 0.]);
    }
}
