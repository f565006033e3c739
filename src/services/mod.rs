pub mod loader;
pub mod resolver;

pub use loader::{
    Collection, FetchOutcome, LoadCoordinator, LoadError, LoadState, ReadinessPolicy,
    RosterLoader,
};
pub use resolver::{PlanetLookup, Roster, RosterEntry, join};
