use std::fmt::{Display, Formatter};

use itertools::Itertools;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_pcg::Pcg64;

use crate::block::{Block, Variant};
use crate::location::Location;

/// Distinct open cells, one per movable block. Cell `i` holds the `i`th entry of the board's [`movable_kinds`](crate::Board::movable_kinds).
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Placement(pub Vec<Location>);

impl Placement {
    /// Pair each cell with its kind.
    pub fn blocks<'a>(&'a self, kinds: &'a [Variant]) -> impl Iterator<Item = Block> + 'a {
        kinds.iter()
            .zip(self.0.iter())
            .map(|(variant, location)| Block::new(*variant, *location))
    }
}

impl Display for Placement {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.0.iter().join(", "))
    }
}

/// Every ordered selection of open cells for the movable blocks.
///
/// Selections that only swap two blocks of the same kind are not merged: they describe the same physical board but are both produced.
#[derive(Clone, Debug)]
pub struct Enumerator {
    open: Vec<Location>,
    kinds: Vec<Variant>,
}

impl Enumerator {
    /// Placements of one block per entry of `kinds` into distinct cells of `open`.
    pub fn new(open: Vec<Location>, kinds: Vec<Variant>) -> Self {
        Self { open, kinds }
    }

    /// The kind of block at each position of a placement.
    pub fn kinds(&self) -> &[Variant] {
        &self.kinds
    }

    /// Lazily produce every placement, in lexicographic order of open cell indices.
    pub fn iter(&self) -> impl Iterator<Item = Placement> + '_ {
        self.open.iter()
            .copied()
            .permutations(self.kinds.len())
            .map(Placement)
    }

    /// `n! / (n - k)!` for `n` open cells and `k` blocks, saturating at [`usize::MAX`].
    pub fn len(&self) -> usize {
        let (n, k) = (self.open.len(), self.kinds.len());
        if k > n {
            return 0;
        }

        ((n - k + 1)..=n).try_fold(1usize, |acc, factor| acc.checked_mul(factor))
            .unwrap_or(usize::MAX)
    }

    /// Whether there are more blocks than cells.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Collect every placement and shuffle them. The same `seed` always gives the same order.
    pub fn shuffled(&self, seed: u64) -> Vec<Placement> {
        let mut placements = self.iter().collect_vec();
        placements.shuffle(&mut Pcg64::seed_from_u64(seed));
        placements
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use itertools::Itertools;

    use super::{Enumerator, Placement};
    use crate::block::{Block, Variant};
    use crate::location::Location;

    fn open_2x2() -> Vec<Location> {
        vec![Location(1, 1), Location(2, 1), Location(1, 2), Location(2, 2)]
    }

    #[test]
    fn single_block_tries_every_cell_in_order() {
        let enumerator = Enumerator::new(open_2x2(), vec![Variant::Reflect]);
        assert_eq!(enumerator.len(), 4);
        assert_eq!(enumerator.iter().collect_vec(), open_2x2().into_iter().map(|l| Placement(vec![l])).collect_vec());
    }

    #[test]
    fn ordered_selections_are_exhaustive() {
        let enumerator = Enumerator::new(open_2x2(), vec![Variant::Reflect, Variant::Reflect]);
        let all = enumerator.iter().collect_vec();
        assert_eq!(all.len(), 12);
        assert_eq!(enumerator.len(), 12);
        // both orders of the same pair are kept
        assert!(all.contains(&Placement(vec![Location(1, 1), Location(2, 2)])));
        assert!(all.contains(&Placement(vec![Location(2, 2), Location(1, 1)])));
        assert!(all.iter().all(|p| p.0.iter().all_unique()));
    }

    #[test]
    fn edge_cases() {
        let none = Enumerator::new(open_2x2(), vec![]);
        assert_eq!(none.len(), 1);
        assert_eq!(none.iter().collect_vec(), vec![Placement(vec![])]);

        let too_many = Enumerator::new(vec![Location(1, 1)], vec![Variant::Opaque, Variant::Opaque]);
        assert_eq!(too_many.len(), 0);
        assert!(too_many.is_empty());
        assert_eq!(too_many.iter().count(), 0);
    }

    #[test]
    fn shuffle_is_a_seeded_permutation() {
        let enumerator = Enumerator::new(open_2x2(), vec![Variant::Refract, Variant::Opaque]);
        let a = enumerator.shuffled(1001);
        let b = enumerator.shuffled(1001);
        assert_eq!(a, b);
        assert_eq!(a.len(), 12);
        assert_eq!(a.into_iter().collect::<HashSet<_>>(), enumerator.iter().collect::<HashSet<_>>());
    }

    #[test]
    fn blocks_pair_kinds_with_cells() {
        let kinds = [Variant::Refract, Variant::Reflect];
        let placement = Placement(vec![Location(2, 1), Location(1, 2)]);
        assert_eq!(placement.blocks(&kinds).collect_vec(), vec![
            Block::new(Variant::Refract, Location(2, 1)),
            Block::new(Variant::Reflect, Location(1, 2)),
        ]);
        assert_eq!(placement.to_string(), "[(2, 1), (1, 2)]");
    }
}
