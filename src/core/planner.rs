use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use super::booking::{BookingContext, BookingWorkflow};
use crate::{
    error::{PlannerError, Result},
    services::{
        build_destination_prompt, build_hotel_prompt, build_itinerary_prompt,
        fallback::{sample_destinations, sample_itinerary},
        pdf_export::{pdf_filename, render_itinerary_pdf},
        prompt::ITINERARY_SUMMARY,
        ContentGenerator, DestinationValidation, NoopNotifier, Notifier, RecordStore,
        ResponseValidator, SuggestionContext, TripUpdate,
    },
    types::{
        booking_search_link, BookingFormData, BookingRecord, BudgetBand, DestinationOption,
        DestinationOutcome, HotelRecommendations, ItineraryPlan, ItineraryRecord, NewTrip,
        SavedTrip, TripFormData, TripPreferences, ValidationReport,
    },
};

/// Result of planning a new trip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedTrip {
    pub trip_id: Uuid,
    #[serde(flatten)]
    pub outcome: DestinationOutcome,
    pub report: ValidationReport,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingSubmission {
    pub booking: BookingRecord,
    pub hotels: HotelRecommendations,
}

/// Ties generation, validation and persistence together for each user action.
#[derive(Debug, Clone)]
pub struct TravelPlanner {
    generator: Arc<dyn ContentGenerator>,
    store: Arc<dyn RecordStore>,
    notifier: Arc<dyn Notifier>,
    validator: ResponseValidator,
    sample_fallback: bool,
}

impl TravelPlanner {
    pub fn new(generator: Arc<dyn ContentGenerator>, store: Arc<dyn RecordStore>) -> Self {
        Self {
            generator,
            store,
            notifier: Arc::new(NoopNotifier),
            validator: ResponseValidator::new(),
            sample_fallback: false,
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_validator(mut self, validator: ResponseValidator) -> Self {
        self.validator = validator;
        self
    }

    /// Serve built-in sample data when the generation service fails.
    pub fn with_sample_fallback(mut self, enabled: bool) -> Self {
        self.sample_fallback = enabled;
        self
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    fn should_fall_back(&self, err: &PlannerError) -> bool {
        self.sample_fallback && err.is_retryable()
    }

    /// Generate and validate destinations without touching the store.
    pub async fn generate_destinations(
        &self,
        prefs: &TripPreferences,
    ) -> Result<DestinationValidation> {
        let prompt = build_destination_prompt(prefs);
        let context = SuggestionContext::from_preferences(prefs);

        let generated = match self.generator.generate(&prompt.to_request()).await {
            Ok(raw) => self.validator.validate_destinations(&raw, &context),
            Err(err) => Err(err),
        };

        match generated {
            Err(err) if self.should_fall_back(&err) => {
                warn!(
                    provider = self.generator.name(),
                    error = %err,
                    "destination generation failed, serving sample destinations"
                );
                let sample = serde_json::to_string(&sample_destinations(prefs.travel_mode))?;
                self.validator.validate_destinations(&sample, &context)
            }
            other => other,
        }
    }

    /// Validate the form, generate destinations and record the trip.
    pub async fn plan_destinations(
        &self,
        user_id: &str,
        session_id: &str,
        form: &TripFormData,
    ) -> Result<PlannedTrip> {
        let prefs = form.validate()?;
        let DestinationValidation { outcome, report } = self.generate_destinations(&prefs).await?;

        let trip = self
            .store
            .insert_trip(NewTrip::from_form(user_id, session_id, form))
            .await?;
        self.store
            .insert_itinerary(ItineraryRecord::new(
                trip.id,
                outcome.destinations().to_vec(),
            ))
            .await?;

        info!(
            trip_id = %trip.id,
            received = report.received(),
            kept = report.kept(),
            "planned destinations"
        );
        Ok(PlannedTrip {
            trip_id: trip.id,
            outcome,
            report,
        })
    }

    /// Generate and validate a day plan for `destination`.
    pub async fn generate_itinerary(
        &self,
        prefs: &TripPreferences,
        destination: &str,
    ) -> Result<ItineraryPlan> {
        let prompt = build_itinerary_prompt(prefs, destination);
        let generated = match self.generator.generate(&prompt.to_request()).await {
            Ok(raw) => self.validator.validate_itinerary(&raw),
            Err(err) => Err(err),
        };

        let mut plan = match generated {
            Err(err) if self.should_fall_back(&err) => {
                warn!(
                    provider = self.generator.name(),
                    error = %err,
                    "itinerary generation failed, serving sample itinerary"
                );
                sample_itinerary()
            }
            other => other?,
        };
        if plan.summary_message.is_none() {
            plan.summary_message = Some(ITINERARY_SUMMARY.to_string());
        }
        Ok(plan)
    }

    /// Record the chosen destination and build its itinerary.
    pub async fn select_destination(
        &self,
        trip_id: Uuid,
        form: &TripFormData,
        destination: DestinationOption,
    ) -> Result<ItineraryPlan> {
        let prefs = form.validate()?;
        let name = destination.display_name();

        self.store
            .update_trip(
                trip_id,
                None,
                TripUpdate {
                    selected_destination: destination,
                    days: prefs.days,
                    touch: false,
                },
            )
            .await?;

        let plan = self.generate_itinerary(&prefs, &name).await?;
        match self.store.get_itinerary(trip_id).await? {
            Some(_) => self.store.update_itinerary_plan(trip_id, &plan).await?,
            None => {
                self.store
                    .insert_itinerary(ItineraryRecord::new(trip_id, Vec::new()).with_plan(&plan))
                    .await?
            }
        }

        info!(%trip_id, destination = %name, days = plan.days(), "itinerary ready");
        Ok(plan)
    }

    /// Save a trip with its options and plan for `user_id`.
    pub async fn save_trip(
        &self,
        user_id: &str,
        trip_id: Uuid,
        destination: DestinationOption,
        destinations: Vec<DestinationOption>,
        plan: &ItineraryPlan,
    ) -> Result<()> {
        let days = u32::try_from(plan.days()).unwrap_or(u32::MAX);
        self.store
            .update_trip(
                trip_id,
                Some(user_id),
                TripUpdate {
                    selected_destination: destination,
                    days,
                    touch: true,
                },
            )
            .await?;
        self.store
            .upsert_itinerary(ItineraryRecord::new(trip_id, destinations).with_plan(plan))
            .await
    }

    pub async fn saved_trips(&self, user_id: &str) -> Result<Vec<SavedTrip>> {
        let trips = self.store.saved_trips(user_id).await?;
        let mut saved = Vec::with_capacity(trips.len());
        for trip in trips {
            let itinerary = self.store.get_itinerary(trip.id).await?;
            saved.push(SavedTrip { trip, itinerary });
        }
        Ok(saved)
    }

    pub async fn delete_trip(&self, user_id: &str, trip_id: Uuid) -> Result<()> {
        self.store.delete_trip(user_id, trip_id).await?;
        info!(%trip_id, "trip deleted");
        Ok(())
    }

    pub async fn recommend_hotels(
        &self,
        destination: &str,
        booking: &BookingFormData,
        band: Option<BudgetBand>,
    ) -> Result<HotelRecommendations> {
        let prompt = build_hotel_prompt(destination, booking, band);
        let raw = self.generator.generate(&prompt.to_request()).await?;
        let mut hotels = self.validator.validate_hotels(&raw)?;
        for hotel in &mut hotels.hotels {
            if hotel.booking_link.trim().is_empty() {
                hotel.booking_link = booking_search_link(destination);
            }
        }
        Ok(hotels)
    }

    /// Look up hotels, then submit the booking with them attached.
    ///
    /// A workflow that is not ready fails before any lookup. A failed hotel lookup
    /// leaves the booking without hotel options.
    pub async fn submit_booking(
        &self,
        workflow: &mut BookingWorkflow,
        mut context: BookingContext,
    ) -> Result<BookingSubmission> {
        workflow.check_ready()?;
        let band = context.trip_budget.parse::<BudgetBand>().ok();
        let hotels = match self
            .recommend_hotels(workflow.destination(), workflow.form(), band)
            .await
        {
            Ok(hotels) => hotels,
            Err(err) => {
                warn!(
                    target: "genie::booking",
                    error = %err,
                    "hotel recommendations unavailable"
                );
                HotelRecommendations::default()
            }
        };

        context.hotel_options = hotels.hotels.clone();
        let booking = workflow
            .submit(self.store.as_ref(), self.notifier.as_ref(), context)
            .await?;
        Ok(BookingSubmission { booking, hotels })
    }

    /// PDF of the stored itinerary for a trip: `(filename, bytes)`.
    pub async fn export_pdf(&self, trip_id: Uuid) -> Result<(String, Vec<u8>)> {
        let trip = self.store.get_trip(trip_id).await?;
        let destination = trip
            .selected_destination
            .as_ref()
            .map(|d| d.title.clone())
            .ok_or_else(|| PlannerError::NotFound(format!("destination for trip {trip_id}")))?;
        let plan = self
            .store
            .get_itinerary(trip_id)
            .await?
            .and_then(|record| record.plan())
            .ok_or_else(|| PlannerError::NotFound(format!("itinerary for trip {trip_id}")))?;

        let bytes = render_itinerary_pdf(&destination, &plan)?;
        Ok((pdf_filename(&destination), bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{GenerationRequest, MemoryRecordStore};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    /// Replays canned responses in order.
    #[derive(Debug, Default)]
    struct ScriptedGenerator {
        replies: Mutex<Vec<Result<String>>>,
        prompts: Mutex<Vec<GenerationRequest>>,
    }

    impl ScriptedGenerator {
        fn new(replies: Vec<Result<String>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into_iter().rev().collect()),
                prompts: Mutex::default(),
            })
        }

        fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ContentGenerator for ScriptedGenerator {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn generate(&self, request: &GenerationRequest) -> Result<String> {
            self.prompts.lock().unwrap().push(request.clone());
            self.replies
                .lock()
                .unwrap()
                .pop()
                .unwrap_or(Err(PlannerError::EmptyResponse))
        }
    }

    fn form() -> TripFormData {
        TripFormData {
            start_location: "Bengaluru".to_string(),
            month: "Dec".to_string(),
            travelers: 2,
            group_type: "Couple".to_string(),
            domestic_or_intl: "Within India".to_string(),
            theme: vec!["Beach".to_string()],
            mood: "Relaxing".to_string(),
            budget: "Mid-range (₹20k-₹50k)".to_string(),
            travel_mode: "Flight".to_string(),
            days: 3,
            ..TripFormData::default()
        }
    }

    fn destinations_reply() -> String {
        json!({
            "destinations": [
                {"title": "Gokarna", "approx_budget": {"total_per_person": 28000}},
                {"title": "Maldives", "approx_budget": {"total_per_person": 90000}}
            ]
        })
        .to_string()
    }

    fn itinerary_reply() -> String {
        json!({
            "itinerary": [
                {"day": 2, "title": "Beaches", "estimated_cost_per_person": 4000},
                {"day": 1, "title": "Arrive", "estimated_cost_per_person": 9000}
            ]
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_plan_then_select_then_save() {
        let generator = ScriptedGenerator::new(vec![
            Ok(destinations_reply()),
            Ok(itinerary_reply()),
        ]);
        let store = Arc::new(MemoryRecordStore::new());
        let planner = TravelPlanner::new(generator.clone(), store.clone());

        let planned = planner.plan_destinations("u1", "s1", &form()).await.unwrap();
        assert_eq!(planned.outcome.destinations().len(), 1);
        assert_eq!(planned.report.over_budget(), 1);

        let chosen = planned.outcome.destinations()[0].clone();
        let plan = planner
            .select_destination(planned.trip_id, &form(), chosen.clone())
            .await
            .unwrap();
        assert_eq!(plan.itinerary[0].day, 1);
        assert_eq!(plan.total_estimated_cost_per_person.get(), 13000);
        assert_eq!(plan.summary_message.as_deref(), Some(ITINERARY_SUMMARY));

        planner
            .save_trip("u1", planned.trip_id, chosen, planned.outcome.destinations().to_vec(), &plan)
            .await
            .unwrap();
        let saved = planner.saved_trips("u1").await.unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].itinerary.as_ref().unwrap().daily_plan.len(), 2);

        let (filename, bytes) = planner.export_pdf(planned.trip_id).await.unwrap();
        assert_eq!(filename, "Gokarna_Itinerary.pdf");
        assert!(bytes.starts_with(b"%PDF"));
        assert_eq!(generator.calls(), 2);
    }

    #[tokio::test]
    async fn test_invalid_form_makes_no_calls() {
        let generator = ScriptedGenerator::new(Vec::new());
        let planner = TravelPlanner::new(generator.clone(), Arc::new(MemoryRecordStore::new()));

        let err = planner
            .plan_destinations("u1", "s1", &TripFormData::default())
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "FORM_VALIDATION_ERROR");
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn test_provider_failure_surfaces_or_falls_back() {
        let failing = || {
            ScriptedGenerator::new(vec![Err(PlannerError::Provider(
                "Incorrect API key provided".to_string(),
            ))])
        };

        let planner = TravelPlanner::new(failing(), Arc::new(MemoryRecordStore::new()));
        let err = planner
            .plan_destinations("u1", "s1", &form())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Incorrect API key provided");

        let planner = TravelPlanner::new(failing(), Arc::new(MemoryRecordStore::new()))
            .with_sample_fallback(true);
        let planned = planner.plan_destinations("u1", "s1", &form()).await.unwrap();
        assert!(!planned.outcome.is_empty());
        assert!(planned
            .outcome
            .destinations()
            .iter()
            .all(|d| d.total_per_person().get() <= 50_000));
    }

    #[tokio::test]
    async fn test_booking_survives_hotel_failure() {
        let generator = ScriptedGenerator::new(vec![Err(PlannerError::Timeout(
            "hotel lookup".to_string(),
        ))]);
        let store = Arc::new(MemoryRecordStore::new());
        let trip = store
            .insert_trip(NewTrip::from_form("u1", "s1", &form()))
            .await
            .unwrap();
        let planner = TravelPlanner::new(generator, store.clone());

        let mut workflow = BookingWorkflow::new("Gokarna", Some(BudgetBand::MidRange));
        {
            let details = workflow.details_mut().unwrap();
            details.customer_name = "Kiran".to_string();
            details.customer_email = "kiran@example.com".to_string();
            details.customer_phone = "90000".to_string();
        }
        workflow.proceed_to_confirmation().unwrap();
        workflow.set_confirmed(true).unwrap();

        let submission = planner
            .submit_booking(
                &mut workflow,
                BookingContext {
                    user_id: "u1".to_string(),
                    trip_id: trip.id,
                    trip_budget: "Mid-range (₹20k-₹50k)".to_string(),
                    hotel_options: Vec::new(),
                },
            )
            .await
            .unwrap();

        assert!(submission.hotels.hotels.is_empty());
        assert!(submission.booking.hotel_options.is_empty());
        assert_eq!(store.bookings_for_user("u1").await.unwrap().len(), 1);
    }
}
