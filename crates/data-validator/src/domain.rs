//! Closed Categorical Domains
//!
//! Labels are the exact strings the trained pipeline was fit on. Matching is
//! case-sensitive; nothing is normalized on the way in.

use crate::error::InvalidInputError;
use serde::Serialize;

/// A closed set of labels for one form field
pub trait Domain: Sized + Copy + 'static {
    /// Field name reported in validation errors
    const FIELD: &'static str;
    /// Every variant, in declaration order
    const ALL: &'static [Self];
    /// Every label, in the same order as `ALL`
    const LABELS: &'static [&'static str];

    /// Canonical label
    fn as_str(&self) -> &'static str;

    /// Parse an exact label
    fn parse(value: &str) -> Result<Self, InvalidInputError> {
        Self::ALL
            .iter()
            .copied()
            .find(|variant| variant.as_str() == value)
            .ok_or_else(|| InvalidInputError::UnknownValue {
                field: Self::FIELD,
                value: value.to_string(),
                allowed: Self::LABELS,
            })
    }
}

/// Incident category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    Email,
    Access,
    Network,
    #[serde(rename = "VPN")]
    Vpn,
    Software,
}

impl Domain for Category {
    const FIELD: &'static str = "category";
    const ALL: &'static [Self] = &[
        Category::Email,
        Category::Access,
        Category::Network,
        Category::Vpn,
        Category::Software,
    ];
    const LABELS: &'static [&'static str] = &["Email", "Access", "Network", "VPN", "Software"];

    fn as_str(&self) -> &'static str {
        match self {
            Category::Email => "Email",
            Category::Access => "Access",
            Category::Network => "Network",
            Category::Vpn => "VPN",
            Category::Software => "Software",
        }
    }
}

/// Incident priority, ordered from least to most urgent
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Domain for Priority {
    const FIELD: &'static str = "priority";
    const ALL: &'static [Self] = &[
        Priority::Low,
        Priority::Medium,
        Priority::High,
        Priority::Critical,
    ];
    const LABELS: &'static [&'static str] = &["Low", "Medium", "High", "Critical"];

    fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
            Priority::Critical => "Critical",
        }
    }
}

/// Team the incident is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AssignmentGroup {
    #[serde(rename = "Network Team")]
    Network,
    #[serde(rename = "Support Team")]
    Support,
    #[serde(rename = "Security Team")]
    Security,
}

impl Domain for AssignmentGroup {
    const FIELD: &'static str = "assignment_group";
    const ALL: &'static [Self] = &[
        AssignmentGroup::Network,
        AssignmentGroup::Support,
        AssignmentGroup::Security,
    ];
    const LABELS: &'static [&'static str] = &["Network Team", "Support Team", "Security Team"];

    fn as_str(&self) -> &'static str {
        match self {
            AssignmentGroup::Network => "Network Team",
            AssignmentGroup::Support => "Support Team",
            AssignmentGroup::Security => "Security Team",
        }
    }
}

/// Customer satisfaction score on a 1-5 scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct CustomerScore(u8);

impl CustomerScore {
    pub const FIELD: &'static str = "customer_score";
    pub const MIN: i64 = 1;
    pub const MAX: i64 = 5;

    /// Validate a raw score
    pub fn new(value: i64) -> Result<Self, InvalidInputError> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(InvalidInputError::OutOfRange {
                field: Self::FIELD,
                value,
                min: Self::MIN,
                max: Self::MAX,
            });
        }
        Ok(Self(value as u8))
    }

    pub fn get(&self) -> u8 {
        self.0
    }
}
