/// Travel direction of a passenger or a moving car
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    /// Direction needed to get from `from` to `to`, `None` when they are the same floor
    pub fn between(from: usize, to: usize) -> Option<Direction> {
        match to.cmp(&from) {
            std::cmp::Ordering::Greater => Some(Direction::Up),
            std::cmp::Ordering::Less => Some(Direction::Down),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }

    /// The adjacent floor in this direction, if it exists in a building of `floors` levels
    pub fn next_floor(self, floor: usize, floors: usize) -> Option<usize> {
        match self {
            Direction::Up if floor + 1 < floors => Some(floor + 1),
            Direction::Down if floor > 0 => Some(floor - 1),
            _ => None,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_between() {
        assert_eq!(Direction::between(2, 5), Some(Direction::Up));
        assert_eq!(Direction::between(5, 2), Some(Direction::Down));
        assert_eq!(Direction::between(3, 3), None);
    }

    #[test]
    fn test_next_floor_is_bounds_checked() {
        assert_eq!(Direction::Up.next_floor(0, 2), Some(1));
        assert_eq!(Direction::Up.next_floor(1, 2), None);
        assert_eq!(Direction::Down.next_floor(0, 2), None);
        assert_eq!(Direction::Down.next_floor(1, 2), Some(0));
    }

    #[test]
    fn test_opposite() {
        assert_eq!(Direction::Up.opposite(), Direction::Down);
        assert_eq!(Direction::Down.opposite(), Direction::Up);
    }
}
