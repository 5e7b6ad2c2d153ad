pub mod fallback;
pub mod gemini_client;
pub mod generator;
pub mod kv_store;
pub mod notifier;
pub mod openai_client;
pub mod pdf_export;
pub mod prompt;
pub mod quote;
pub mod record_store;
pub mod response_validator;
pub mod rest_store;

pub use gemini_client::GeminiClient;
pub use generator::{ContentGenerator, GenerationRequest};
pub use kv_store::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
pub use notifier::{BookingNotification, HttpNotifier, NoopNotifier, Notifier};
pub use openai_client::OpenAIClient;
pub use pdf_export::{layout_itinerary, pdf_filename, render_itinerary_pdf, ItineraryDocument};
pub use prompt::{build_destination_prompt, build_hotel_prompt, build_itinerary_prompt, Prompt};
pub use quote::{estimate_booking_cost, CostEstimate};
pub use record_store::{MemoryRecordStore, RecordStore, TripUpdate};
pub use response_validator::{DestinationValidation, ResponseValidator, SuggestionContext};
pub use rest_store::RestRecordStore;
