//! Pairing start points with target points.
//!
//! Sequential pairing truncates both sets to the shorter length and zips
//! them in scan order. Nearest-neighbor pairing walks the start set in order
//! and greedily claims the closest unclaimed target; starts left over once
//! the targets run out are dropped. Neither mode is a global optimum.

use morph_core::error::EngineError;
use morph_core::Point;
use serde::{Deserialize, Serialize};

use crate::sampler::SampleSet;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairingMode {
    #[default]
    Sequential,
    NearestNeighbor,
}

impl PairingMode {
    pub fn name(self) -> &'static str {
        match self {
            PairingMode::Sequential => "sequential",
            PairingMode::NearestNeighbor => "nearest_neighbor",
        }
    }

    pub fn names() -> &'static [&'static str] {
        &["sequential", "nearest_neighbor"]
    }

    pub fn from_name(name: &str) -> Result<Self, EngineError> {
        match name {
            "sequential" => Ok(PairingMode::Sequential),
            "nearest_neighbor" => Ok(PairingMode::NearestNeighbor),
            _ => Err(EngineError::UnknownMode {
                kind: "pairing".into(),
                name: name.to_string(),
            }),
        }
    }
}

/// Index-aligned start/target arrays: `starts[i]` travels to `targets[i]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchedPairing {
    starts: Vec<Point>,
    targets: Vec<Point>,
}

impl MatchedPairing {
    pub fn starts(&self) -> &[Point] {
        &self.starts
    }

    pub fn targets(&self) -> &[Point] {
        &self.targets
    }

    pub fn len(&self) -> usize {
        self.starts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }

    /// `(start, target)` pairs in order.
    pub fn pairs(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        std::iter::zip(self.starts.iter().copied(), self.targets.iter().copied())
    }
}

/// Pairs two sample sets according to a [`PairingMode`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PositionMatcher {
    mode: PairingMode,
}

impl PositionMatcher {
    pub fn new(mode: PairingMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> PairingMode {
        self.mode
    }

    /// Pairs `starts` with `targets`. Deterministic for deterministic input.
    pub fn pair(&self, starts: &SampleSet, targets: &SampleSet) -> MatchedPairing {
        match self.mode {
            PairingMode::Sequential => sequential(starts.points(), targets.points()),
            PairingMode::NearestNeighbor => nearest_neighbor(starts.points(), targets.points()),
        }
    }
}

fn sequential(starts: &[Point], targets: &[Point]) -> MatchedPairing {
    let n = starts.len().min(targets.len());
    MatchedPairing {
        starts: starts[..n].to_vec(),
        targets: targets[..n].to_vec(),
    }
}

/// O(|starts| * |targets|) greedy scan; the first target at the minimum distance wins ties.
fn nearest_neighbor(starts: &[Point], targets: &[Point]) -> MatchedPairing {
    let capacity = starts.len().min(targets.len());
    let mut pairing = MatchedPairing {
        starts: Vec::with_capacity(capacity),
        targets: Vec::with_capacity(capacity),
    };
    let mut used = vec![false; targets.len()];

    for &start in starts {
        if pairing.len() == targets.len() {
            break;
        }
        let mut best: Option<(usize, f64)> = None;
        for (i, target) in targets.iter().enumerate() {
            if used[i] {
                continue;
            }
            let dist = start.distance(*target);
            if best.map_or(true, |(_, min)| dist < min) {
                best = Some((i, dist));
            }
        }
        if let Some((i, _)) = best {
            used[i] = true;
            pairing.starts.push(start);
            pairing.targets.push(targets[i]);
        }
    }
    pairing
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(coords: &[(f64, f64)]) -> SampleSet {
        coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn sequential_truncates_to_shorter() {
        let a = set(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]);
        let b = set(&[(9.0, 9.0), (8.0, 8.0)]);
        let m = PositionMatcher::new(PairingMode::Sequential).pair(&a, &b);
        assert_eq!(m.len(), 2);
        assert_eq!(m.starts(), &a.points()[..2]);
        assert_eq!(m.targets(), b.points());
    }

    #[test]
    fn sequential_with_empty_input_is_empty() {
        let a = set(&[(0.0, 0.0)]);
        let m = PositionMatcher::default().pair(&a, &SampleSet::default());
        assert!(m.is_empty());
        assert!(m.targets().is_empty());
    }

    #[test]
    fn nearest_picks_closest_unused_target() {
        let a = set(&[(0.0, 0.0), (10.0, 0.0)]);
        let b = set(&[(11.0, 0.0), (1.0, 0.0)]);
        let m = PositionMatcher::new(PairingMode::NearestNeighbor).pair(&a, &b);
        let pairs: Vec<_> = m.pairs().collect();
        assert_eq!(
            pairs,
            vec![
                (Point::new(0.0, 0.0), Point::new(1.0, 0.0)),
                (Point::new(10.0, 0.0), Point::new(11.0, 0.0)),
            ]
        );
    }

    #[test]
    fn nearest_is_greedy_in_start_order() {
        // The first start claims the shared nearest target; the second gets the leftover.
        let a = set(&[(0.0, 0.0), (1.0, 0.0)]);
        let b = set(&[(100.0, 0.0), (1.0, 0.0)]);
        let m = PositionMatcher::new(PairingMode::NearestNeighbor).pair(&a, &b);
        assert_eq!(m.targets(), &[Point::new(1.0, 0.0), Point::new(100.0, 0.0)]);
    }

    #[test]
    fn nearest_tie_goes_to_first_target() {
        let a = set(&[(0.0, 0.0)]);
        let b = set(&[(0.0, 5.0), (5.0, 0.0), (0.0, -5.0)]);
        let m = PositionMatcher::new(PairingMode::NearestNeighbor).pair(&a, &b);
        assert_eq!(m.targets(), &[Point::new(0.0, 5.0)]);
    }

    #[test]
    fn nearest_drops_starts_once_targets_run_out() {
        let a = set(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)]);
        let b = set(&[(2.0, 2.0)]);
        let m = PositionMatcher::new(PairingMode::NearestNeighbor).pair(&a, &b);
        assert_eq!(m.len(), 1);
        assert_eq!(m.starts(), &[Point::new(0.0, 0.0)]);
    }

    #[test]
    fn pairing_mode_names_round_trip() {
        for name in PairingMode::names() {
            assert_eq!(PairingMode::from_name(name).unwrap().name(), *name);
        }
        assert!(matches!(
            PairingMode::from_name("hungarian"),
            Err(EngineError::UnknownMode { .. })
        ));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;
        use std::collections::HashSet;

        fn points(max: usize) -> impl Strategy<Value = Vec<(f64, f64)>> {
            prop::collection::vec((0.0_f64..100.0, 0.0_f64..100.0), 0..max)
        }

        proptest! {
            #[test]
            fn sequential_length_is_min(a in points(40), b in points(40)) {
                let m = PositionMatcher::new(PairingMode::Sequential).pair(&set(&a), &set(&b));
                prop_assert_eq!(m.starts().len(), a.len().min(b.len()));
                prop_assert_eq!(m.targets().len(), a.len().min(b.len()));
            }

            #[test]
            fn nearest_never_reuses_a_target(a in points(40), b in points(40)) {
                let b_set = set(&b);
                let m = PositionMatcher::new(PairingMode::NearestNeighbor).pair(&set(&a), &b_set);
                prop_assert!(m.len() <= a.len().min(b.len()));
                prop_assert_eq!(m.starts().len(), m.targets().len());

                // Map every output target back to a distinct input index.
                let mut claimed = HashSet::new();
                for target in m.targets() {
                    let idx = b_set
                        .points()
                        .iter()
                        .enumerate()
                        .position(|(i, p)| p == target && !claimed.contains(&i));
                    prop_assert!(idx.is_some(), "target {target:?} used more times than it occurs");
                    claimed.insert(idx.unwrap_or_default());
                }
            }

            #[test]
            fn nearest_pairs_every_start_when_targets_suffice(
                a in points(30),
                extra in points(10),
            ) {
                let mut b = a.clone();
                b.extend(extra);
                let m = PositionMatcher::new(PairingMode::NearestNeighbor).pair(&set(&a), &set(&b));
                prop_assert_eq!(m.len(), a.len());
            }

            #[test]
            fn nearest_is_deterministic(a in points(30), b in points(30)) {
                let matcher = PositionMatcher::new(PairingMode::NearestNeighbor);
                prop_assert_eq!(matcher.pair(&set(&a), &set(&b)), matcher.pair(&set(&a), &set(&b)));
            }
        }
    }
}
