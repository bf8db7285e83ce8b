//! Study lifecycle vocabulary: visibility status, listing filters and the
//! controlled vocabulary offered by the study creation form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Study status
// ---------------------------------------------------------------------------

/// Visibility status of a study as recorded by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudyStatus {
    Sandbox,
    Private,
    AwaitingApproval,
    Public,
}

impl StudyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sandbox => "sandbox",
            Self::Private => "private",
            Self::AwaitingApproval => "awaiting_approval",
            Self::Public => "public",
        }
    }
}

impl fmt::Display for StudyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StudyStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sandbox" => Ok(Self::Sandbox),
            "private" => Ok(Self::Private),
            "awaiting_approval" => Ok(Self::AwaitingApproval),
            "public" => Ok(Self::Public),
            other => Err(CoreError::Validation(format!(
                "Unknown study status: {other}"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Listing filter
// ---------------------------------------------------------------------------

/// Which set of studies a listing request is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingFilter {
    /// Studies owned by the requesting user.
    Private,
    /// Studies other users have shared with the requesting user.
    Shared,
    /// Studies visible to everybody.
    Public,
}

impl ListingFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::Shared => "shared",
            Self::Public => "public",
        }
    }
}

impl FromStr for ListingFilter {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "private" => Ok(Self::Private),
            "shared" => Ok(Self::Shared),
            "public" => Ok(Self::Public),
            _ => Err(CoreError::Validation(
                "Must use private, shared, or public!".into(),
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Creation form vocabulary
// ---------------------------------------------------------------------------

/// `(value, label)` pairs for the environmental package selector.
pub const ENVIRONMENTAL_PACKAGES: &[(&str, &str)] = &[
    ("air", "air"),
    ("host_associated", "host-associated"),
    ("human_amniotic_fluid", "human-amniotic-fluid"),
    ("human_associated", "human-associated"),
    ("human_blood", "human-blood"),
    ("human_gut", "human-gut"),
    ("human_oral", "human-oral"),
    ("human_skin", "human-skin"),
    ("human_urine", "human-urine"),
    ("human_vaginal", "human-vaginal"),
    ("biofilm", "microbial mat/biofilm"),
    ("misc_env", "miscellaneous natural or artificial environment"),
    ("plant_associated", "plant-associated"),
    ("sediment", "sediment"),
    ("soil", "soil"),
    ("wastewater_sludge", "wastewater/sludge"),
    ("water", "water"),
];

/// Returns `true` if `value` is one of the known environmental package keys.
pub fn is_environmental_package(value: &str) -> bool {
    ENVIRONMENTAL_PACKAGES.iter().any(|(v, _)| *v == value)
}

/// Defaults applied to every study created through the portal.
pub const DEFAULT_TIMESERIES_TYPE_ID: i64 = 1;
pub const DEFAULT_PORTAL_TYPE_ID: i64 = 1;
pub const DEFAULT_EFO: &[i64] = &[1];
