//! Weighted item selection for containers.

use moonplay_types::{Container, EngineError, OutcomeItem};

use crate::rng::GameRng;

/// Forced outcome for demos and tests. `odds` of `None` always hits;
/// otherwise the target wins with the given probability and the draw
/// falls through to the weighted table the rest of the time.
#[cfg(any(test, feature = "rig"))]
#[derive(Clone, Copy, Debug)]
pub struct RigOverride {
    pub target: u16,
    pub odds: Option<f64>,
}

/// Draw one item from the container's weighted table.
///
/// The draw lands in `[0, total_weight)` and the walk stops at the
/// first item whose cumulative weight exceeds it, so each item wins
/// with probability `weight / total_weight` exactly.
pub fn select<'a>(
    rng: &mut GameRng,
    container: &'a Container,
) -> Result<&'a OutcomeItem, EngineError> {
    let total = container.total_weight();
    if total == 0 {
        return Err(EngineError::Configuration("container weights sum to zero"));
    }
    let r = rng.next_range_u64(total);
    let mut accum = 0u64;
    for item in &container.items {
        accum += item.weight;
        if accum > r {
            return Ok(item);
        }
    }
    // Unreachable: accum == total > r after the last item
    Err(EngineError::Configuration("weighted walk fell through"))
}

/// Draw one item, skipping `excluded` unless it is the only option.
pub fn select_excluding<'a>(
    rng: &mut GameRng,
    container: &'a Container,
    excluded: u16,
) -> Result<&'a OutcomeItem, EngineError> {
    let total: u64 = container
        .items
        .iter()
        .filter(|i| i.id != excluded)
        .map(|i| i.weight)
        .sum();
    if total == 0 {
        // Nothing else carries weight; the excluded item stands
        return container
            .item(excluded)
            .ok_or(EngineError::Configuration("excluded item not in container"));
    }
    let r = rng.next_range_u64(total);
    let mut accum = 0u64;
    for item in container.items.iter().filter(|i| i.id != excluded) {
        accum += item.weight;
        if accum > r {
            return Ok(item);
        }
    }
    Err(EngineError::Configuration("weighted walk fell through"))
}

/// Draw with an optional forced outcome.
#[cfg(any(test, feature = "rig"))]
pub fn select_with_override<'a>(
    rng: &mut GameRng,
    container: &'a Container,
    rig: Option<RigOverride>,
) -> Result<&'a OutcomeItem, EngineError> {
    if let Some(rig) = rig {
        let hit = match rig.odds {
            None => true,
            Some(odds) => rng.next_f64() < odds,
        };
        if hit {
            return container
                .item(rig.target)
                .ok_or(EngineError::Configuration("rig target not in container"));
        }
    }
    select(rng, container)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ServerSeed;
    use moonplay_types::Rarity;

    fn container(weights: &[(u16, u64)]) -> Container {
        Container {
            id: 1,
            name: "Test".to_string(),
            price: 100,
            items: weights
                .iter()
                .map(|&(id, weight)| OutcomeItem {
                    id,
                    name: format!("Item{}", id),
                    value: id as u64 * 10,
                    weight,
                    rarity: Rarity::Common,
                })
                .collect(),
        }
    }

    #[test]
    fn test_zero_weight_container_rejected() {
        let container = container(&[(1, 0), (2, 0)]);
        let mut rng = GameRng::new(&ServerSeed::derive(b"sel"), 0, 0);
        assert!(select(&mut rng, &container).is_err());
    }

    #[test]
    fn test_zero_weight_item_never_selected() {
        let container = container(&[(1, 0), (2, 1)]);
        let mut rng = GameRng::new(&ServerSeed::derive(b"sel"), 0, 0);
        for _ in 0..1000 {
            assert_eq!(select(&mut rng, &container).unwrap().id, 2);
        }
    }

    #[test]
    fn test_convergence_to_weights() {
        // Weights 10/30/60 should converge to 10%/30%/60%
        let container = container(&[(1, 10), (2, 30), (3, 60)]);
        let mut rng = GameRng::new(&ServerSeed::derive(b"converge"), 0, 0);
        let mut counts = [0u64; 3];
        let draws = 1_000_000u64;
        for _ in 0..draws {
            let id = select(&mut rng, &container).unwrap().id;
            counts[(id - 1) as usize] += 1;
        }
        let expected = [0.10, 0.30, 0.60];
        for (count, exp) in counts.iter().zip(expected) {
            let freq = *count as f64 / draws as f64;
            assert!((freq - exp).abs() < 0.005, "freq {} vs {}", freq, exp);
        }
    }

    #[test]
    fn test_select_excluding() {
        let container = container(&[(1, 50), (2, 50)]);
        let mut rng = GameRng::new(&ServerSeed::derive(b"excl"), 0, 0);
        for _ in 0..100 {
            assert_eq!(select_excluding(&mut rng, &container, 1).unwrap().id, 2);
        }
        // Only the excluded item carries weight: it stands
        let lopsided = container_with_dead_rest();
        assert_eq!(select_excluding(&mut rng, &lopsided, 1).unwrap().id, 1);
    }

    fn container_with_dead_rest() -> Container {
        container(&[(1, 10), (2, 0)])
    }

    #[test]
    fn test_rig_override() {
        let container = container(&[(1, 99), (2, 1)]);
        let mut rng = GameRng::new(&ServerSeed::derive(b"rig"), 0, 0);
        let rig = Some(RigOverride {
            target: 2,
            odds: None,
        });
        for _ in 0..100 {
            assert_eq!(
                select_with_override(&mut rng, &container, rig).unwrap().id,
                2
            );
        }
        // No override falls back to the weighted table
        let id = select_with_override(&mut rng, &container, None).unwrap().id;
        assert!(id == 1 || id == 2);
    }
}
