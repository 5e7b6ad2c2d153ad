use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::generator::http_client;
use crate::{
    error::{PlannerError, Result},
    types::{booking::guest_total, BookingRecord},
};

/// Payload sent to the fulfillment team when a booking is submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingNotification {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub destination_name: String,
    pub adults: u32,
    pub children: u32,
    pub seniors: u32,
    pub number_of_hotels: u32,
    pub number_of_rooms: u32,
    pub number_of_cars: u32,
    pub room_type: String,
    pub vehicle_type: String,
    pub special_requests: String,
    pub trip_budget: String,
}

impl BookingNotification {
    pub fn from_booking(booking: &BookingRecord, trip_budget: impl Into<String>) -> Self {
        Self {
            customer_name: booking.customer_name.clone(),
            customer_email: booking.customer_email.clone(),
            customer_phone: booking.customer_phone.clone(),
            destination_name: booking.destination_name.clone(),
            adults: booking.adults,
            children: booking.children,
            seniors: booking.seniors,
            number_of_hotels: booking.number_of_hotels,
            number_of_rooms: booking.number_of_rooms,
            number_of_cars: booking.number_of_cars,
            room_type: booking.room_type.to_string(),
            vehicle_type: booking.vehicle_type.to_string(),
            special_requests: booking.special_requests.clone(),
            trip_budget: trip_budget.into(),
        }
    }

    /// Plain-text message for the operations inbox.
    pub fn message(&self) -> String {
        let requests = if self.special_requests.trim().is_empty() {
            "None"
        } else {
            self.special_requests.trim()
        };

        format!(
            "New Booking Request Received!\n\n\
             CUSTOMER DETAILS\n\
             Name: {}\nEmail: {}\nPhone: {}\n\n\
             TRIP DETAILS\n\
             Destination: {}\nBudget Category: {}\n\n\
             TRAVELERS\n\
             Adults: {}\nChildren: {}\nSeniors: {}\nTotal Travelers: {}\n\n\
             ACCOMMODATION & TRANSPORT\n\
             Number of Hotels: {}\nNumber of Rooms: {}\nNumber of Cars: {}\n\
             Accommodation Type: {}\nVehicle Type: {}\n\n\
             SPECIAL REQUESTS\n{}\n\n\
             Please contact the customer within 24 hours to confirm and process this booking.",
            self.customer_name,
            self.customer_email,
            self.customer_phone,
            self.destination_name,
            self.trip_budget,
            self.adults,
            self.children,
            self.seniors,
            guest_total(self.adults, self.children, self.seniors),
            self.number_of_hotels,
            self.number_of_rooms,
            self.number_of_cars,
            self.room_type,
            self.vehicle_type,
            requests,
        )
    }
}

#[async_trait]
pub trait Notifier: Send + Sync + std::fmt::Debug {
    async fn notify(&self, notification: &BookingNotification) -> Result<()>;
}

/// POSTs the notification as JSON to a webhook.
#[derive(Debug, Clone)]
pub struct HttpNotifier {
    url: String,
    token: Option<String>,
    timeout: Duration,
}

impl HttpNotifier {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            token: None,
            timeout: Duration::from_secs(15),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl Notifier for HttpNotifier {
    async fn notify(&self, notification: &BookingNotification) -> Result<()> {
        let client = http_client(self.timeout)?;
        let mut request = client.post(&self.url).json(notification);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|err| PlannerError::Notification(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PlannerError::Notification(format!("{status}: {body}")));
        }

        info!(
            target: "genie::booking",
            destination = %notification.destination_name,
            "booking notification sent"
        );
        Ok(())
    }
}

/// Used when no webhook is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn notify(&self, notification: &BookingNotification) -> Result<()> {
        debug!(
            target: "genie::booking",
            destination = %notification.destination_name,
            "no notifier configured, skipping"
        );
        Ok(())
    }
}
