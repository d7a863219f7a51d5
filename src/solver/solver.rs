use super::solution::Solution;
use super::table::Table;
use crate::cache::key::Key;
use crate::cache::solution::SolutionCache;
use crate::cards::hand::Hand;
use crate::cards::hole::Hole;
use crate::equity::Calculator;
use crate::gameplay::action::Action;
use crate::gameplay::range::Range;
use crate::gameplay::spot::Spot;
use crate::gameplay::strategy::Strategy;
use crate::Energy;
use crate::Probability;
use crate::Utility;
use anyhow::ensure;
use anyhow::Result;
use std::collections::BTreeMap;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

/// per-player labels, hands, and normalized frequencies, in player order
type Lineup = Vec<Vec<(String, Probability)>>;

/// Counterfactual-regret solver for one abstracted betting spot.
///
/// Each solve owns its private arena of accumulators; the only shared
/// state is the two-tier solution cache and the equity cache behind the
/// calculator, each guarded by its own lock. Parallelism comes from
/// issuing independent solves on separate threads.
pub struct Solver {
    cache: SolutionCache,
    equity: Calculator,
    solves: AtomicUsize,
}

impl Solver {
    pub fn new(cache: SolutionCache, equity: Calculator) -> Self {
        Self {
            cache,
            equity,
            solves: AtomicUsize::new(0),
        }
    }

    /// full CFR runs since construction, i.e. cache misses
    pub fn solves(&self) -> usize {
        self.solves.load(Ordering::Relaxed)
    }

    /// retention: keep only the newest-n disk entries
    pub fn trim(&self, keep: usize) -> usize {
        self.cache.trim(keep)
    }

    /// Near-equilibrium strategies for every (player, hand) pair.
    ///
    /// Cache lookups come first so that a retry after any partial
    /// failure is idempotent. Empty ranges are a caller contract
    /// violation and fail fast.
    pub fn solve(
        &self,
        spot: &Spot,
        ranges: &BTreeMap<String, Range>,
        budget: Option<usize>,
    ) -> Result<Solution> {
        let key = Self::key(spot, ranges);
        if let Some(hit) = self.cache.get(&key) {
            return Ok(hit);
        }
        ensure!(!ranges.is_empty(), "no ranges supplied");
        for (player, range) in ranges {
            ensure!(!range.is_empty(), "empty range for player {}", player);
        }
        let clock = std::time::Instant::now();
        self.solves.fetch_add(1, Ordering::Relaxed);
        let budget = budget.unwrap_or(crate::CFR_ITERATIONS);
        let choices = spot.choices();
        ensure!(!choices.is_empty(), "no legal actions in {}", spot);

        let players = ranges.keys().cloned().collect::<Vec<String>>();
        let lineup = ranges
            .values()
            .map(|range| {
                range
                    .weights()
                    .iter()
                    .map(|(hand, weight)| (hand.clone(), *weight))
                    .collect()
            })
            .collect::<Lineup>();
        let equities = self.appraise(spot, &lineup);

        let mut table = Table::default();
        let rows = lineup
            .iter()
            .enumerate()
            .map(|(p, hands)| {
                hands
                    .iter()
                    .map(|(hand, _)| table.claim(p, hand))
                    .collect::<Vec<usize>>()
            })
            .collect::<Vec<Vec<usize>>>();

        let mut iterations = 0;
        let mut converged = false;
        let mut exploitability = Energy::INFINITY;
        while iterations < budget {
            iterations += 1;
            let sigma = (0..lineup.len())
                .map(|p| {
                    rows[p]
                        .iter()
                        .map(|&row| table.matching(row, &choices))
                        .collect::<Vec<Vec<Probability>>>()
                })
                .collect::<Vec<Vec<Vec<Probability>>>>();
            let folding = Self::folding(&choices, &lineup, &sigma);
            for p in 0..lineup.len() {
                let pressure = Self::pressure(&folding, p);
                for (h, &row) in rows[p].iter().enumerate() {
                    let payoffs = Self::payoffs(spot, &choices, equities[p][h], pressure);
                    let ev = sigma[p][h]
                        .iter()
                        .zip(payoffs.iter())
                        .map(|(weight, payoff)| weight * payoff)
                        .sum::<Utility>();
                    for (a, &action) in choices.iter().enumerate() {
                        table.add_regret(row, action, payoffs[a] - ev);
                        table.add_policy(row, action, sigma[p][h][a]);
                    }
                }
            }
            if iterations % crate::CFR_CHECKPOINT == 0 {
                exploitability =
                    Self::exploitability(spot, &choices, &table, &rows, &lineup, &equities);
                log::debug!(
                    "iteration {:>6} exploitability {:.6}",
                    iterations,
                    exploitability
                );
                if exploitability < crate::CONVERGENCE_THRESHOLD {
                    converged = true;
                    break;
                }
            }
        }
        if !converged {
            exploitability =
                Self::exploitability(spot, &choices, &table, &rows, &lineup, &equities);
            converged = exploitability < crate::CONVERGENCE_THRESHOLD;
        }

        let folding = Self::averages(&choices, &table, &rows)
            .iter()
            .zip(lineup.iter())
            .map(|(strategies, hands)| Self::aggregate(&choices, hands, strategies))
            .collect::<Vec<Probability>>();
        let mut strategies = BTreeMap::new();
        for (p, player) in players.iter().enumerate() {
            let pressure = Self::pressure(&folding, p);
            let mut solved = BTreeMap::new();
            for (h, &row) in rows[p].iter().enumerate() {
                let strategy = match table.average(row, &choices) {
                    Some(average) => {
                        let payoffs = Self::payoffs(spot, &choices, equities[p][h], pressure);
                        let ev = average
                            .iter()
                            .zip(payoffs.iter())
                            .map(|(weight, payoff)| weight * payoff)
                            .sum::<Utility>();
                        choices
                            .iter()
                            .copied()
                            .zip(average.into_iter())
                            .collect::<Strategy>()
                            .with_ev(ev)
                    }
                    None => Strategy::pure(Action::Fold),
                };
                solved.insert(lineup[p][h].0.clone(), strategy);
            }
            strategies.insert(player.clone(), solved);
        }

        let solution = Solution::new(
            spot.clone(),
            ranges.clone(),
            strategies,
            exploitability,
            iterations,
            clock.elapsed().as_secs_f64(),
            converged,
        );
        self.cache.put(key, &solution);
        log::info!(
            "solved {} after {} iterations, exploitability {:.4}",
            spot,
            solution.iterations(),
            solution.exploitability()
        );
        Ok(solution)
    }

    /// canonical over everything that defines the spot, including each
    /// range's order-independent serialization
    fn key(spot: &Spot, ranges: &BTreeMap<String, Range>) -> Key {
        let mut board = spot
            .board()
            .iter()
            .map(|card| format!("b:{}", card))
            .collect::<Vec<String>>();
        board.sort();
        Key::of(
            std::iter::empty()
                .chain(std::iter::once(format!("street:{}", spot.street())))
                .chain(std::iter::once(format!("pot:{:.4}", spot.pot())))
                .chain(std::iter::once(format!("stack:{:.4}", spot.stack())))
                .chain(board)
                .chain(std::iter::once(format!("position:{}", spot.position())))
                .chain(std::iter::once(format!("players:{}", spot.players())))
                .chain(std::iter::once(format!("call:{:.4}", spot.to_call())))
                .chain(ranges.iter().map(|(player, range)| format!("{}={}", player, range))),
        )
    }

    /// Price each hand against the opposing ranges: frequency-weighted
    /// mean of pairwise Monte Carlo estimates between representative
    /// combos. A hand with no opponents in sight prices against nothing
    /// and wins every trial, which is as good as a degenerate spot gets.
    fn appraise(&self, spot: &Spot, lineup: &Lineup) -> Vec<Vec<Probability>> {
        let board = spot
            .board()
            .iter()
            .map(|card| card.to_string())
            .collect::<Vec<String>>();
        let table = spot.table();
        lineup
            .iter()
            .enumerate()
            .map(|(p, hands)| {
                hands
                    .iter()
                    .map(|(label, _)| {
                        let Some(hero) = Self::concrete(label, table) else {
                            log::warn!("no live combo for label {:?}", label);
                            return 0.;
                        };
                        let blocked = Hand::union(table, Hand::from(hero));
                        let mut acc = 0.;
                        let mut mass = 0.;
                        for (_, villains) in lineup.iter().enumerate().filter(|(q, _)| *q != p) {
                            for (vlabel, vweight) in villains {
                                let Some(villain) = Self::concrete(vlabel, blocked) else {
                                    continue;
                                };
                                let matchup = vec![hero.to_string(), villain.to_string()];
                                let equity =
                                    self.equity.estimate(&matchup, &board, crate::EQUITY_SAMPLES);
                                acc += vweight * equity[0];
                                mass += vweight;
                            }
                        }
                        match mass > 0. {
                            true => acc / mass,
                            false => {
                                let solo = vec![hero.to_string()];
                                self.equity.estimate(&solo, &board, crate::EQUITY_SAMPLES)[0]
                            }
                        }
                    })
                    .collect()
            })
            .collect()
    }

    /// first expansion of the label that collides with nothing already dealt
    fn concrete(label: &str, blocked: Hand) -> Option<Hole> {
        Hole::expand(label)
            .into_iter()
            .find(|hole| !Hand::from(*hole).intersects(blocked))
    }

    /// Pot-odds payoff of each action for a hand of the given equity,
    /// facing opponents who surrender the pot with the given frequency.
    /// Aggression is priced at a pot-sized bet (or a pot-plus-call
    /// raise), capped by the effective stack.
    fn payoffs(
        spot: &Spot,
        choices: &[Action],
        equity: Probability,
        pressure: Probability,
    ) -> Vec<Utility> {
        let pot = spot.pot();
        let call = spot.to_call();
        let stack = spot.stack();
        choices
            .iter()
            .map(|action| match action {
                Action::Fold => 0.,
                Action::Check => equity * pot,
                Action::Call => equity * (pot + 2. * call) - call,
                Action::Bet => {
                    let bet = pot.min(stack);
                    pressure * pot + (1. - pressure) * (equity * (pot + 2. * bet) - bet)
                }
                Action::Raise => {
                    let raise = (pot + 2. * call).min(stack);
                    pressure * pot + (1. - pressure) * (equity * (pot + 2. * raise) - raise)
                }
                Action::AllIn => {
                    pressure * pot + (1. - pressure) * (equity * (pot + 2. * stack) - stack)
                }
            })
            .collect()
    }

    /// each player's range-weighted fold frequency under the given
    /// per-hand strategies
    fn aggregate(
        choices: &[Action],
        hands: &[(String, Probability)],
        strategies: &[Vec<Probability>],
    ) -> Probability {
        let Some(fold) = choices.iter().position(|&a| a == Action::Fold) else {
            return 0.;
        };
        hands
            .iter()
            .zip(strategies.iter())
            .map(|((_, weight), sigma)| weight * sigma[fold])
            .sum()
    }

    fn folding(choices: &[Action], lineup: &Lineup, sigma: &[Vec<Vec<Probability>>]) -> Vec<Probability> {
        lineup
            .iter()
            .zip(sigma.iter())
            .map(|(hands, strategies)| Self::aggregate(choices, hands, strategies))
            .collect()
    }

    /// mean fold frequency among everyone but me
    fn pressure(folding: &[Probability], me: usize) -> Probability {
        let others = folding.len().saturating_sub(1);
        match others {
            0 => 0.,
            n => {
                folding
                    .iter()
                    .enumerate()
                    .filter(|(p, _)| *p != me)
                    .map(|(_, fold)| fold)
                    .sum::<Probability>()
                    / n as Probability
            }
        }
    }

    /// average strategies for every row, uniform where nothing accumulated
    fn averages(
        choices: &[Action],
        table: &Table,
        rows: &[Vec<usize>],
    ) -> Vec<Vec<Vec<Probability>>> {
        rows.iter()
            .map(|player| {
                player
                    .iter()
                    .map(|&row| {
                        table
                            .average(row, choices)
                            .unwrap_or(vec![1. / choices.len() as Probability; choices.len()])
                    })
                    .collect()
            })
            .collect()
    }

    /// Best-response gap against the running average strategies:
    /// range-weighted mean of (max-action payoff - average payoff),
    /// averaged over players, pot-normalized, clamped non-negative.
    fn exploitability(
        spot: &Spot,
        choices: &[Action],
        table: &Table,
        rows: &[Vec<usize>],
        lineup: &Lineup,
        equities: &[Vec<Probability>],
    ) -> Energy {
        let averages = Self::averages(choices, table, rows);
        let folding = averages
            .iter()
            .zip(lineup.iter())
            .map(|(strategies, hands)| Self::aggregate(choices, hands, strategies))
            .collect::<Vec<Probability>>();
        let mut total = 0.;
        for p in 0..lineup.len() {
            let pressure = Self::pressure(&folding, p);
            for (h, (_, weight)) in lineup[p].iter().enumerate() {
                let payoffs = Self::payoffs(spot, choices, equities[p][h], pressure);
                let ev = averages[p][h]
                    .iter()
                    .zip(payoffs.iter())
                    .map(|(weight, payoff)| weight * payoff)
                    .sum::<Utility>();
                let best = payoffs.iter().copied().fold(Utility::MIN, Utility::max);
                total += weight * (best - ev);
            }
        }
        (total / lineup.len() as Energy / spot.pot().max(1.)).max(0.)
    }
}
