use strum::{Display, EnumString, VariantArray};

use crate::location::{Direction, Location, Point};
use crate::ray::Ray;

/// The optical behaviour of a block.
///
/// The serialized forms are the codes used in `.bff` files, both in the grid and in the movable block counts.
#[derive(Copy, Clone, Debug, Display, EnumString, VariantArray, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum Variant {
    /// Turns a ray back along the axis perpendicular to the edge it hits.
    #[strum(serialize = "A")]
    Reflect,
    /// Stops any ray that hits it.
    #[strum(serialize = "B")]
    Opaque,
    /// Lets a ray pass straight through while also reflecting a copy.
    #[strum(serialize = "C")]
    Refract,
}

/// One of the four sides of a block. A ray interacts with a block only at the center of one of these.
#[derive(Copy, Clone, Debug, VariantArray, Eq, PartialEq, Hash)]
pub enum Edge {
    /// Smaller `y`.
    Top,
    /// Larger `y`.
    Bottom,
    /// Smaller `x`.
    Left,
    /// Larger `x`.
    Right,
}

impl Edge {
    /// Whether a ray travelling in `direction` enters the block through this edge.
    ///
    /// A ray sitting on an edge center while moving away from the block is just passing by.
    pub fn is_faced_by(&self, direction: Direction) -> bool {
        match self {
            Self::Top => direction.dy() == 1,
            Self::Bottom => direction.dy() == -1,
            Self::Left => direction.dx() == 1,
            Self::Right => direction.dx() == -1,
        }
    }

    fn offset(&self) -> (i64, i64) {
        match self {
            Self::Top => (0, -1),
            Self::Bottom => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }
}

/// What happened to a ray that entered a block.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Interaction {
    /// The ray keeps going with a new position and direction.
    Redirected(Ray),
    /// The ray was reflected and a second ray continues straight through the block.
    Split { reflected: Ray, spawned: Ray },
    /// The ray stopped at the edge it hit.
    Absorbed,
}

impl Variant {
    /// Apply this variant's effect to `ray`, which sits on `edge` and faces into the block.
    pub fn interact(&self, ray: Ray, edge: Edge) -> Interaction {
        match self {
            Self::Reflect => Interaction::Redirected(reflect(ray, edge)),
            Self::Refract => Interaction::Split {
                reflected: reflect(ray, edge),
                spawned: Ray::new(ray.position + ray.direction, ray.direction),
            },
            Self::Opaque => Interaction::Absorbed,
        }
    }
}

fn reflect(ray: Ray, edge: Edge) -> Ray {
    let direction = match edge {
        Edge::Top | Edge::Bottom => ray.direction.flip_y(),
        Edge::Left | Edge::Right => ray.direction.flip_x(),
    };

    Ray::new(ray.position + direction, direction)
}

/// A placed block. Blocks never move once created; a new set is built for every placement tried.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Block {
    /// How the block treats rays.
    pub variant: Variant,
    /// The cell it occupies.
    pub location: Location,
}

impl Block {
    /// A `variant` block at `location`.
    pub fn new(variant: Variant, location: Location) -> Self {
        Self { variant, location }
    }

    /// The lattice points at the middle of each side of this block.
    pub fn edge_centers(&self) -> [(Edge, Point); 4] {
        let center = self.location.center();
        [Edge::Top, Edge::Bottom, Edge::Left, Edge::Right].map(|edge| (edge, center.offset_by(edge.offset())))
    }

    /// The edge of this block centered on `point`, if any.
    pub fn edge_at(&self, point: Point) -> Option<Edge> {
        self.edge_centers()
            .into_iter()
            .find(|(_, center)| *center == point)
            .map(|(edge, _)| edge)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::VariantArray;

    use super::{Block, Edge, Interaction, Variant};
    use crate::location::{Direction, Location, Point};
    use crate::ray::Ray;

    #[test]
    fn edge_centers_surround_cell_center() {
        let block = Block::new(Variant::Reflect, Location(2, 3));
        assert_eq!(block.location.center(), Point(3, 5));
        assert_eq!(block.edge_centers(), [
            (Edge::Top, Point(3, 4)),
            (Edge::Bottom, Point(3, 6)),
            (Edge::Left, Point(2, 5)),
            (Edge::Right, Point(4, 5)),
        ]);
        assert_eq!(block.edge_at(Point(4, 5)), Some(Edge::Right));
        assert_eq!(block.edge_at(Point(3, 5)), None);
    }

    #[test]
    fn facing() {
        assert!(Edge::Right.is_faced_by(Direction::UpLeft));
        assert!(!Edge::Right.is_faced_by(Direction::DownRight));
        assert!(Edge::Left.is_faced_by(Direction::UpRight));
        assert!(Edge::Top.is_faced_by(Direction::DownLeft));
        assert!(!Edge::Top.is_faced_by(Direction::UpLeft));
        assert!(Edge::Bottom.is_faced_by(Direction::UpRight));
    }

    #[test]
    fn reflect_flips_perpendicular_axis() {
        let ray = Ray::new(Point(3, 4), Direction::DownRight);
        assert_eq!(Variant::Reflect.interact(ray, Edge::Top),
                   Interaction::Redirected(Ray::new(Point(4, 3), Direction::UpRight)));

        let ray = Ray::new(Point(2, 5), Direction::UpRight);
        assert_eq!(Variant::Reflect.interact(ray, Edge::Left),
                   Interaction::Redirected(Ray::new(Point(1, 4), Direction::UpLeft)));
    }

    #[test]
    fn reflect_twice_restores_direction() {
        for edge in Edge::VARIANTS {
            for dir in Direction::VARIANTS {
                let once = match Variant::Reflect.interact(Ray::new(Point(0, 0), *dir), *edge) {
                    Interaction::Redirected(ray) => ray.direction,
                    other => panic!("unexpected {:?}", other),
                };
                let twice = match Variant::Reflect.interact(Ray::new(Point(0, 0), once), *edge) {
                    Interaction::Redirected(ray) => ray.direction,
                    other => panic!("unexpected {:?}", other),
                };
                assert_ne!(once, *dir);
                assert_eq!(twice, *dir);
            }
        }
    }

    #[test]
    fn refract_splits() {
        let ray = Ray::new(Point(3, 2), Direction::UpRight);
        assert_eq!(Variant::Refract.interact(ray, Edge::Bottom), Interaction::Split {
            reflected: Ray::new(Point(4, 3), Direction::DownRight),
            spawned: Ray::new(Point(4, 1), Direction::UpRight),
        });
    }

    #[test]
    fn opaque_absorbs() {
        let ray = Ray::new(Point(3, 2), Direction::UpRight);
        assert_eq!(Variant::Opaque.interact(ray, Edge::Bottom), Interaction::Absorbed);
    }

    #[test]
    fn codes() {
        assert_eq!(Variant::from_str("A").unwrap(), Variant::Reflect);
        assert_eq!(Variant::from_str("B").unwrap(), Variant::Opaque);
        assert_eq!(Variant::from_str("C").unwrap(), Variant::Refract);
        assert!(Variant::from_str("o").is_err());
        assert_eq!(Variant::Refract.to_string(), "C");
    }
}
