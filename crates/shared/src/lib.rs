mod date;
mod error;
mod image;
pub mod itinerary;
mod json;
pub mod trip;

pub use date::*;
pub use error::*;
pub use image::*;
pub use itinerary::{Activity, DayPlan, Itinerary, Transit};
pub use json::*;
pub use trip::*;
