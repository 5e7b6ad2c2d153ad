pub mod schema;
pub mod validation;
pub mod validator;

pub use schema::{ResponseContract, SchemaHandle};
pub use validator::Validator;

use crate::types::{DestinationOption, DestinationResponse, HotelRecommendations, ItineraryPlan};

schema::response_contract! {
    DestinationOption => "DestinationOption",
    DestinationResponse => "DestinationResponse",
    ItineraryPlan => "ItineraryPlan",
    HotelRecommendations => "HotelRecommendations",
}
