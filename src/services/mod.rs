pub mod aggregator;
pub mod providers;
pub mod scoring;
pub mod selection;

pub use aggregator::{Aggregator, MatchRadii};
pub use providers::{PrimarySearchClient, Providers, SecondaryHoursClient};
pub use selection::{SelectionSettings, VenueSelector};
