use crate::grid::{GridGeometry, Position};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// One cell in four becomes a wall.
pub const DEFAULT_CHANCE: u32 = 4;

/// Seeded for reproducible layouts, from entropy otherwise.
pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Picks random wall cells: each cell other than `start` and `goal` is
/// chosen independently with probability `1 / chance`. A `chance` of zero
/// yields no walls.
pub fn generate<R: Rng>(
    geometry: GridGeometry,
    start: Position,
    goal: Position,
    chance: u32,
    rng: &mut R,
) -> Vec<Position> {
    if chance == 0 {
        return Vec::new();
    }

    geometry
        .cells()
        .filter(|pos| *pos != start && *pos != goal)
        .filter(|_| rng.gen_range(0..chance) == 0)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_never_blocks_endpoints() {
        let geometry = GridGeometry::new(10).unwrap();
        let start = geometry.default_start();
        let goal = geometry.default_goal();

        for seed in 0..20 {
            let walls = generate(geometry, start, goal, 1, &mut rng_from_seed(Some(seed)));
            assert_eq!(walls.len(), 98);
            assert!(!walls.contains(&start));
            assert!(!walls.contains(&goal));
        }
    }

    #[test]
    fn test_same_seed_same_maze() {
        let geometry = GridGeometry::new(20).unwrap();
        let start = geometry.default_start();
        let goal = geometry.default_goal();

        let a = generate(geometry, start, goal, DEFAULT_CHANCE, &mut rng_from_seed(Some(7)));
        let b = generate(geometry, start, goal, DEFAULT_CHANCE, &mut rng_from_seed(Some(7)));
        assert_eq!(a, b);
        assert!(!a.is_empty());
        assert!(a.len() < 400);
    }

    #[test]
    fn test_zero_chance_is_empty() {
        let geometry = GridGeometry::new(5).unwrap();
        let walls = generate(
            geometry,
            Position::new(0, 0),
            Position::new(4, 4),
            0,
            &mut rng_from_seed(Some(1)),
        );
        assert!(walls.is_empty());
    }
}
