pub mod config;
pub mod observability;
pub mod trip_file;

pub use config::Config;
pub use trip_file::{Pick, TripFile};
