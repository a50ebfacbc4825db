//! Closed value sets shared with the API
//!
//! Every enum serializes to the exact string the server stores, and parses
//! from either that string or the variant name in any case, mirroring how the
//! server resolves `UserRole[value.upper()]`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $wire)] $variant ),+
        }

        impl $name {
            /// All values in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The string the API uses for this value
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = normalize(s);
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| normalize(v.as_str()) == wanted
                        || normalize(&format!("{:?}", v)) == wanted)
                    .ok_or_else(|| format!("invalid {}: '{}'", stringify!($name), s))
            }
        }
    };
}

fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

wire_enum! {
    /// Role of an authenticated user
    pub enum Role {
        /// Key account manager, the default for new accounts
        Kam => "KAM",
        Manager => "Manager",
        Admin => "Admin",
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Kam
    }
}

wire_enum! {
    /// Sales pipeline stage of a restaurant lead
    pub enum RestaurantStatus {
        New => "New",
        Contacted => "Contacted",
        Converted => "Converted",
        Lost => "Lost",
    }
}

impl Default for RestaurantStatus {
    fn default() -> Self {
        RestaurantStatus::New
    }
}

wire_enum! {
    /// How often a restaurant should be called
    pub enum CallFrequency {
        Daily => "Daily",
        Weekly => "Weekly",
        Monthly => "Monthly",
    }
}

impl Default for CallFrequency {
    fn default() -> Self {
        CallFrequency::Weekly
    }
}

wire_enum! {
    pub enum InteractionType {
        Call => "Call",
        Meeting => "Meeting",
        Email => "Email",
        SiteVisit => "Site Visit",
        FollowUp => "Follow-Up",
    }
}

wire_enum! {
    pub enum InteractionOutcome {
        Successful => "Successful",
        NeedsFollowUp => "Needs Follow-Up",
        NoResponse => "No Response",
        Cancelled => "Cancelled",
    }
}

wire_enum! {
    pub enum PreferredContactMethod {
        Phone => "Phone",
        Email => "Email",
        WhatsApp => "WhatsApp",
        Sms => "SMS",
    }
}
