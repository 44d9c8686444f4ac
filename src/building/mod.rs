pub mod direction;
pub mod elevator;
pub mod floor;
pub mod generator;
pub mod passenger;
pub mod policy;
pub mod requests;
pub mod world;

// Re-export commonly used types
pub use direction::Direction;
pub use elevator::{Car, DoorState, ElevatorProcess, MAX_LOAD};
pub use floor::Floor;
pub use generator::ArrivalGenerator;
pub use passenger::{Location, Passenger, PassengerId, PassengerProcess};
pub use policy::{DispatchPolicy, FloorScan};
pub use requests::{HallCall, RequestTable};
pub use world::Building;
