use super::direction::Direction;
use super::requests::RequestTable;
use crate::core::SimError;
use serde::{Deserialize, Serialize};

/// Algorithm a car uses to pick its next heading after servicing a floor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchPolicy {
    /// Keep sweeping: continue in the last serviced direction, turning at the ends
    Standard,
    /// Head towards the oldest outstanding request in the whole building
    Priority,
}

impl Default for DispatchPolicy {
    fn default() -> Self {
        DispatchPolicy::Standard
    }
}

impl TryFrom<i64> for DispatchPolicy {
    type Error = SimError;

    /// Numeric selector used on the command line: 0 = standard, 1 = priority
    fn try_from(selector: i64) -> Result<Self, Self::Error> {
        match selector {
            0 => Ok(DispatchPolicy::Standard),
            1 => Ok(DispatchPolicy::Priority),
            other => Err(SimError::InvalidConfig(format!(
                "policy selector must be 0 (standard) or 1 (priority), got {}",
                other
            ))),
        }
    }
}

impl std::fmt::Display for DispatchPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DispatchPolicy::Standard => write!(f, "standard"),
            DispatchPolicy::Priority => write!(f, "priority"),
        }
    }
}

/// What happened while a car scanned the requests of its current floor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloorScan {
    /// Direction examined first
    pub first: Direction,
    /// Direction the car committed to because it carries passengers
    pub committed: Option<Direction>,
}

impl DispatchPolicy {
    /// Heading for the next move, `None` meaning the car goes idle
    pub fn choose_heading(
        &self,
        floor: usize,
        scan: FloorScan,
        requests: &RequestTable,
    ) -> Option<Direction> {
        match self {
            DispatchPolicy::Standard => Some(scan.committed.unwrap_or(scan.first)),
            DispatchPolicy::Priority => {
                if let Some(direction) = scan.committed {
                    return Some(direction);
                }
                requests
                    .earliest()
                    .and_then(|(call, _)| Direction::between(floor, call.floor))
            }
        }
    }
}

/// Next floor for a car heading `heading`, reversing at the top and bottom.
///
/// Returns the heading actually taken with the target floor, or `None` in a
/// building with a single floor.
pub fn next_stop(heading: Direction, floor: usize, floors: usize) -> Option<(Direction, usize)> {
    if let Some(next) = heading.next_floor(floor, floors) {
        return Some((heading, next));
    }
    let reversed = heading.opposite();
    reversed.next_floor(floor, floors).map(|next| (reversed, next))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::building::requests::HallCall;

    fn scan(first: Direction, committed: Option<Direction>) -> FloorScan {
        FloorScan { first, committed }
    }

    #[test]
    fn test_selector_parsing() {
        assert_eq!(DispatchPolicy::try_from(0).unwrap(), DispatchPolicy::Standard);
        assert_eq!(DispatchPolicy::try_from(1).unwrap(), DispatchPolicy::Priority);
        assert!(matches!(
            DispatchPolicy::try_from(2),
            Err(SimError::InvalidConfig(_))
        ));
        assert!(DispatchPolicy::try_from(-1).is_err());
    }

    #[test]
    fn test_standard_keeps_heading() {
        let mut requests = RequestTable::new();
        requests.register(HallCall::new(0, Direction::Up), 1);
        let policy = DispatchPolicy::Standard;
        assert_eq!(
            policy.choose_heading(3, scan(Direction::Up, None), &requests),
            Some(Direction::Up)
        );
        // Passengers boarded for the other direction turn the car around
        assert_eq!(
            policy.choose_heading(3, scan(Direction::Up, Some(Direction::Down)), &requests),
            Some(Direction::Down)
        );
    }

    #[test]
    fn test_priority_targets_oldest_request() {
        let mut requests = RequestTable::new();
        requests.register(HallCall::new(8, Direction::Down), 30);
        requests.register(HallCall::new(1, Direction::Up), 12);
        let policy = DispatchPolicy::Priority;

        assert_eq!(
            policy.choose_heading(5, scan(Direction::Up, None), &requests),
            Some(Direction::Down)
        );
        // Boarded passengers win over the table
        assert_eq!(
            policy.choose_heading(5, scan(Direction::Up, Some(Direction::Up)), &requests),
            Some(Direction::Up)
        );
    }

    #[test]
    fn test_priority_idles_without_requests() {
        let requests = RequestTable::new();
        assert_eq!(
            DispatchPolicy::Priority.choose_heading(2, scan(Direction::Down, None), &requests),
            None
        );
    }

    #[test]
    fn test_priority_idles_when_oldest_request_is_here() {
        let mut requests = RequestTable::new();
        requests.register(HallCall::new(2, Direction::Up), 1);
        assert_eq!(
            DispatchPolicy::Priority.choose_heading(2, scan(Direction::Up, None), &requests),
            None
        );
    }

    #[test]
    fn test_next_stop_reverses_at_bounds() {
        assert_eq!(next_stop(Direction::Up, 9, 10), Some((Direction::Down, 8)));
        assert_eq!(next_stop(Direction::Down, 0, 10), Some((Direction::Up, 1)));
        assert_eq!(next_stop(Direction::Up, 4, 10), Some((Direction::Up, 5)));
        assert_eq!(next_stop(Direction::Up, 0, 1), None);
    }

    #[test]
    fn test_policy_deserializes_from_name() {
        #[derive(Deserialize)]
        struct Wrapper {
            policy: DispatchPolicy,
        }
        let wrapper: Wrapper = toml::from_str("policy = \"priority\"").unwrap();
        assert_eq!(wrapper.policy, DispatchPolicy::Priority);
    }
}
