//! travel-genie: a travel-planning backend built around a content-generation service.
//!
//! The planner turns a trip form into budget-checked destination suggestions, a
//! day-by-day itinerary and a booking request, persists them through a [`RecordStore`],
//! notifies the operations team and renders itineraries as PDF.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use travel_genie::{MemoryRecordStore, OpenAIClient, TravelPlanner, TripFormData};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api_key = std::env::var("OPENAI_API_KEY")?;
//!     let planner = TravelPlanner::new(
//!         Arc::new(OpenAIClient::new(api_key)),
//!         Arc::new(MemoryRecordStore::new()),
//!     );
//!
//!     let form: TripFormData = serde_json::from_str(&std::fs::read_to_string("trip.json")?)?;
//!     let planned = planner.plan_destinations("user-1", "session-1", &form).await?;
//!     println!("{}", serde_json::to_string_pretty(&planned)?);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod schemas;
pub mod server;
pub mod services;
pub mod types;

#[cfg(feature = "cli")]
pub mod cli;

pub use config::Config;
pub use core::{
    BookingContext, BookingStage, BookingSubmission, BookingWorkflow, FormDraftCache,
    PlannedTrip, TravelPlanner,
};
pub use error::{FormErrors, PlannerError, Result};
pub use schemas::{ResponseContract, Validator};
pub use services::{
    ContentGenerator, GeminiClient, GenerationRequest, HttpNotifier, MemoryRecordStore,
    Notifier, OpenAIClient, RecordStore, ResponseValidator, RestRecordStore,
};
pub use types::{
    BookingFormData, DestinationOption, HotelRecommendations, ItineraryPlan, TripFormData,
    TripPreferences,
};
