pub mod booking;
pub mod draft;
pub mod planner;

pub use booking::{BookingContext, BookingStage, BookingWorkflow};
pub use draft::{new_session_id, session_id, FormDraftCache};
pub use planner::{BookingSubmission, PlannedTrip, TravelPlanner};
