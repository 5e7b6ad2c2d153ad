use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    error::{PlannerError, Result},
    services::{BookingNotification, Notifier, RecordStore},
    types::{BookingCounter, BookingFormData, BookingRecord, BudgetBand, HotelOption, RoomTier},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStage {
    CollectingDetails,
    ReviewingConfirmation,
    Submitted,
}

/// Who and what the booking is for, supplied at submission.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingContext {
    pub user_id: String,
    pub trip_id: Uuid,
    /// Budget label as the traveler chose it, forwarded to the operations team
    pub trip_budget: String,
    pub hotel_options: Vec<HotelOption>,
}

/// Booking request flow: collect details, review, submit.
#[derive(Debug, Clone)]
pub struct BookingWorkflow {
    destination: String,
    form: BookingFormData,
    stage: BookingStage,
    confirmed: bool,
}

impl BookingWorkflow {
    /// Start a booking; the room tier follows the trip's budget band.
    pub fn new(destination: impl Into<String>, trip_budget: Option<BudgetBand>) -> Self {
        let form = BookingFormData {
            room_type: trip_budget
                .map(BudgetBand::default_room_tier)
                .unwrap_or(RoomTier::FourStar),
            ..BookingFormData::default()
        };
        Self {
            destination: destination.into(),
            form,
            stage: BookingStage::CollectingDetails,
            confirmed: false,
        }
    }

    /// Replace the collected details wholesale.
    pub fn with_form(mut self, form: BookingFormData) -> Self {
        self.form = form;
        self
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn form(&self) -> &BookingFormData {
        &self.form
    }

    pub fn stage(&self) -> BookingStage {
        self.stage
    }

    pub fn is_confirmed(&self) -> bool {
        self.confirmed
    }

    fn expect_stage(&self, stage: BookingStage, message: &str) -> Result<()> {
        if self.stage == stage {
            Ok(())
        } else {
            Err(PlannerError::Booking(message.to_string()))
        }
    }

    /// Editable details; only while collecting.
    pub fn details_mut(&mut self) -> Result<&mut BookingFormData> {
        self.expect_stage(
            BookingStage::CollectingDetails,
            "Booking details can no longer be edited",
        )?;
        Ok(&mut self.form)
    }

    /// Step a counter, clamped at its floor. Returns the new value.
    pub fn adjust(&mut self, counter: BookingCounter, delta: i32) -> Result<u32> {
        Ok(self.details_mut()?.adjust(counter, delta))
    }

    pub fn proceed_to_confirmation(&mut self) -> Result<()> {
        self.expect_stage(
            BookingStage::CollectingDetails,
            "Booking is not collecting details",
        )?;
        self.form.check_submittable()?;
        self.stage = BookingStage::ReviewingConfirmation;
        self.confirmed = false;
        Ok(())
    }

    pub fn back_to_details(&mut self) -> Result<()> {
        self.expect_stage(
            BookingStage::ReviewingConfirmation,
            "Booking is not under review",
        )?;
        self.stage = BookingStage::CollectingDetails;
        self.confirmed = false;
        Ok(())
    }

    pub fn set_confirmed(&mut self, confirmed: bool) -> Result<()> {
        self.expect_stage(
            BookingStage::ReviewingConfirmation,
            "Booking is not under review",
        )?;
        self.confirmed = confirmed;
        Ok(())
    }

    /// Under review, confirmed and complete.
    pub fn check_ready(&self) -> Result<()> {
        self.expect_stage(
            BookingStage::ReviewingConfirmation,
            "Booking must be reviewed before submission",
        )?;
        if !self.confirmed {
            return Err(PlannerError::Booking(
                "Please confirm the booking details".to_string(),
            ));
        }
        self.form.check_submittable()
    }

    /// Persist the booking and notify the operations team.
    ///
    /// Nothing is written unless [`check_ready`](Self::check_ready) passes.
    /// A failed notification is logged; the stored booking stands.
    pub async fn submit(
        &mut self,
        store: &dyn RecordStore,
        notifier: &dyn Notifier,
        context: BookingContext,
    ) -> Result<BookingRecord> {
        self.check_ready()?;

        let record = BookingRecord::pending(
            context.user_id,
            context.trip_id,
            self.destination.clone(),
            &self.form,
            context.hotel_options,
        );
        let record = store.insert_booking(record).await?;
        self.stage = BookingStage::Submitted;
        info!(
            target: "genie::booking",
            booking_id = %record.id,
            destination = %record.destination_name,
            guests = self.form.total_guests(),
            "booking submitted"
        );

        let notification = BookingNotification::from_booking(&record, context.trip_budget);
        if let Err(err) = notifier.notify(&notification).await {
            warn!(
                target: "genie::booking",
                booking_id = %record.id,
                error = %err,
                "booking notification failed"
            );
        }

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::MemoryRecordStore;
    use crate::types::{NewTrip, TripFormData};
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<BookingNotification>>,
        fail: bool,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn notify(&self, notification: &BookingNotification) -> Result<()> {
            self.sent.lock().unwrap().push(notification.clone());
            if self.fail {
                Err(PlannerError::Notification("mailer offline".to_string()))
            } else {
                Ok(())
            }
        }
    }

    async fn store_with_trip() -> (MemoryRecordStore, Uuid) {
        let store = MemoryRecordStore::new();
        let trip = store
            .insert_trip(NewTrip::from_form("u1", "s", &TripFormData::default()))
            .await
            .unwrap();
        (store, trip.id)
    }

    fn context(trip_id: Uuid) -> BookingContext {
        BookingContext {
            user_id: "u1".to_string(),
            trip_id,
            trip_budget: "Luxury (₹50k+)".to_string(),
            hotel_options: Vec::new(),
        }
    }

    fn filled(workflow: &mut BookingWorkflow) {
        let details = workflow.details_mut().unwrap();
        details.customer_name = "Meera".to_string();
        details.customer_email = "meera@example.com".to_string();
        details.customer_phone = "9876543210".to_string();
    }

    #[test]
    fn test_defaults_follow_budget() {
        let workflow = BookingWorkflow::new("Udaipur", Some(BudgetBand::Luxury));
        assert_eq!(workflow.form().room_type, RoomTier::FiveStar);
        assert_eq!(workflow.form().adults, 1);
        assert_eq!(workflow.stage(), BookingStage::CollectingDetails);

        let workflow = BookingWorkflow::new("Udaipur", None);
        assert_eq!(workflow.form().room_type, RoomTier::FourStar);
    }

    #[test]
    fn test_counters_clamp() {
        let mut workflow = BookingWorkflow::new("Udaipur", None);
        assert_eq!(workflow.adjust(BookingCounter::Children, -1).unwrap(), 0);
        assert_eq!(workflow.adjust(BookingCounter::Rooms, -3).unwrap(), 1);
        assert_eq!(workflow.adjust(BookingCounter::Adults, 2).unwrap(), 3);
    }

    #[test]
    fn test_review_requires_details_and_adult() {
        let mut workflow = BookingWorkflow::new("Udaipur", None);
        assert!(workflow.proceed_to_confirmation().is_err());

        filled(&mut workflow);
        workflow.adjust(BookingCounter::Adults, -1).unwrap();
        let err = workflow.proceed_to_confirmation().unwrap_err();
        assert!(err.to_string().contains("At least one adult"));

        workflow.adjust(BookingCounter::Adults, 1).unwrap();
        workflow.proceed_to_confirmation().unwrap();
        assert!(workflow.details_mut().is_err());

        workflow.set_confirmed(true).unwrap();
        workflow.back_to_details().unwrap();
        assert!(!workflow.is_confirmed());
        assert!(workflow.set_confirmed(true).is_err());
    }

    #[tokio::test]
    async fn test_submit_guards_make_no_writes() {
        let (store, trip_id) = store_with_trip().await;
        let notifier = RecordingNotifier::default();
        let mut workflow = BookingWorkflow::new("Udaipur", None);
        filled(&mut workflow);

        assert!(workflow
            .submit(&store, &notifier, context(trip_id))
            .await
            .is_err());

        workflow.proceed_to_confirmation().unwrap();
        let err = workflow
            .submit(&store, &notifier, context(trip_id))
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "BOOKING_ERROR");

        assert!(store.bookings_for_user("u1").await.unwrap().is_empty());
        assert!(notifier.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_submit_persists_and_notifies() {
        let (store, trip_id) = store_with_trip().await;
        let notifier = RecordingNotifier::default();
        let mut workflow = BookingWorkflow::new("Udaipur", Some(BudgetBand::Luxury));
        filled(&mut workflow);
        workflow.proceed_to_confirmation().unwrap();
        workflow.set_confirmed(true).unwrap();

        let record = workflow
            .submit(&store, &notifier, context(trip_id))
            .await
            .unwrap();

        assert_eq!(workflow.stage(), BookingStage::Submitted);
        assert_eq!(record.destination_name, "Udaipur");
        assert_eq!(store.bookings_for_user("u1").await.unwrap().len(), 1);

        let sent = notifier.sent.lock().unwrap();
        assert_eq!(sent[0].trip_budget, "Luxury (₹50k+)");
        assert_eq!(sent[0].room_type, "5-star");
    }

    #[tokio::test]
    async fn test_notification_failure_keeps_booking() {
        let (store, trip_id) = store_with_trip().await;
        let notifier = RecordingNotifier {
            fail: true,
            ..RecordingNotifier::default()
        };
        let mut workflow = BookingWorkflow::new("Udaipur", None);
        filled(&mut workflow);
        workflow.proceed_to_confirmation().unwrap();
        workflow.set_confirmed(true).unwrap();

        workflow
            .submit(&store, &notifier, context(trip_id))
            .await
            .unwrap();
        assert_eq!(store.bookings_for_user("u1").await.unwrap().len(), 1);
        assert!(workflow.submit(&store, &notifier, context(trip_id)).await.is_err());
    }
}
