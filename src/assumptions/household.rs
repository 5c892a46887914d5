//! Household-level parameters shared by the main view and the extractors

use crate::numeric::{lenient_f64, lenient_opt_i32, lenient_opt_u32, lenient_u32, percent_to_rate};
use serde::{Deserialize, Serialize};

/// Whose age drives a calculator's timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Owner {
    #[default]
    Primary,
    Spouse,
    Joint,
}

/// A client as known to the roster
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientProfile {
    #[serde(default)]
    pub name: String,

    #[serde(default, deserialize_with = "lenient_opt_i32")]
    pub birth_year: Option<i32>,
}

impl ClientProfile {
    pub fn new(name: &str, birth_year: i32) -> Self {
        Self {
            name: name.to_string(),
            birth_year: Some(birth_year),
        }
    }

    /// Age reached during `year`, when the birth year is known
    pub fn age_in(&self, year: i32) -> Option<u32> {
        self.birth_year.and_then(|b| u32::try_from(year - b).ok())
    }
}

/// The household's clients
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientRoster {
    #[serde(default)]
    pub primary: ClientProfile,

    #[serde(default)]
    pub spouse: Option<ClientProfile>,
}

impl ClientRoster {
    /// Age of the owner in `year`; joint ownership follows the primary client
    pub fn age_of(&self, owner: Owner, year: i32) -> Option<u32> {
        match owner {
            Owner::Primary | Owner::Joint => self.primary.age_in(year),
            Owner::Spouse => self.spouse.as_ref().and_then(|s| s.age_in(year)),
        }
    }
}

/// Main-view parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HouseholdParams {
    /// Number of projected years (offsets 0..projection_years)
    #[serde(default = "default_projection_years", deserialize_with = "lenient_u32")]
    pub projection_years: u32,

    #[serde(default, deserialize_with = "lenient_u32")]
    pub primary_age: u32,

    #[serde(default, deserialize_with = "lenient_opt_u32")]
    pub spouse_age: Option<u32>,

    /// Desired annual income in today's money
    #[serde(default, deserialize_with = "lenient_f64")]
    pub target_income: f64,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub inflation_rate_percent: f64,

    /// Average tax rate applied to total income
    #[serde(default, deserialize_with = "lenient_f64")]
    pub average_tax_rate_percent: f64,

    /// Tax rate applied to registered balances in the estate
    #[serde(default, deserialize_with = "lenient_f64")]
    pub final_tax_rate_percent: f64,
}

fn default_projection_years() -> u32 {
    30
}

impl Default for HouseholdParams {
    fn default() -> Self {
        Self {
            projection_years: default_projection_years(),
            primary_age: 0,
            spouse_age: None,
            target_income: 0.0,
            inflation_rate_percent: 0.0,
            average_tax_rate_percent: 0.0,
            final_tax_rate_percent: 0.0,
        }
    }
}

impl HouseholdParams {
    pub fn inflation_rate(&self) -> f64 {
        percent_to_rate(self.inflation_rate_percent)
    }

    pub fn average_tax_rate(&self) -> f64 {
        percent_to_rate(self.average_tax_rate_percent)
    }

    pub fn final_tax_rate(&self) -> f64 {
        percent_to_rate(self.final_tax_rate_percent)
    }

    /// Fill missing ages from the roster's birth years
    pub fn with_roster_ages(mut self, roster: &ClientRoster, current_year: i32) -> Self {
        if self.primary_age == 0 {
            self.primary_age = roster.primary.age_in(current_year).unwrap_or(0);
        }
        if self.spouse_age.is_none() {
            self.spouse_age = roster.spouse.as_ref().and_then(|s| s.age_in(current_year));
        }
        self
    }
}
