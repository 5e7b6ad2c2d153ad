/// Declares a closed set of user-facing choices that travel as their display label.
///
/// Each variant has one canonical label plus optional aliases accepted when parsing
/// (older form revisions used different wording for the same choice).
macro_rules! labeled_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => $label:literal $(| $alias:literal)*
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                $variant
            ),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
                let needle = value.trim();
                $(
                    if needle.eq_ignore_ascii_case($label)
                        $(|| needle.eq_ignore_ascii_case($alias))*
                    {
                        return Ok($name::$variant);
                    }
                )+
                Err(format!("unknown {} `{}`", stringify!($name), needle))
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(
                &self,
                serializer: S,
            ) -> std::result::Result<S::Ok, S::Error> {
                serializer.serialize_str(self.label())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(
                deserializer: D,
            ) -> std::result::Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

pub mod booking;
pub mod destination;
pub mod hotel;
pub mod itinerary;
pub mod money;
pub mod records;
pub mod response;
pub mod result;
pub mod trip;

pub use booking::{BookingCounter, BookingFormData, RoomTier, VehicleTier};
pub use destination::{
    ApproxBudget, CostBreakdown, DestinationOption, DestinationResponse, MustSee, Weather,
};
pub use hotel::{booking_search_link, HotelOption, HotelRecommendations};
pub use itinerary::{ItineraryDay, ItineraryItem, ItineraryPlan};
pub use money::Rupees;
pub use records::{
    BookingRecord, BookingStatus, ItineraryRecord, NewTrip, SavedTrip, TripRecord,
};
pub use response::decode_contract;
pub use result::{DestinationOutcome, EntryReport, ValidationReport, Verdict};
pub use trip::{
    BudgetBand, GroupType, Month, Mood, Theme, TravelMode, TravelScope, TripFormData,
    TripPreferences,
};
