//! [`TravelService`](tripweave_planner::TravelService) backed by the Gemini
//! `generateContent` REST API.

mod client;
mod prompt;

pub use client::*;
