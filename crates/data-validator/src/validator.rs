//! Incident Validator

use crate::domain::{AssignmentGroup, Category, CustomerScore, Domain, Priority};
use crate::error::InvalidInputError;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Raw form submission, exactly as the UI collects it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawIncident {
    pub category: String,
    pub priority: String,
    pub assignment_group: String,
    pub customer_score: i64,
    /// Free text; empty string when the agent left it blank
    pub issue_description: String,
    /// Free text; empty string when the agent left it blank
    pub work_notes: String,
}

/// Validated incident. Every field is within its declared domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncidentRecord {
    pub category: Category,
    pub priority: Priority,
    pub assignment_group: AssignmentGroup,
    pub customer_score: CustomerScore,
    pub issue_description: String,
    pub work_notes: String,
}

/// Validator for raw form submissions
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator;

impl Validator {
    pub fn new() -> Self {
        Self
    }

    /// Validate fields in declaration order, stopping at the first failure
    pub fn validate(&self, raw: &RawIncident) -> Result<IncidentRecord, InvalidInputError> {
        let record = IncidentRecord {
            category: Category::parse(&raw.category)?,
            priority: Priority::parse(&raw.priority)?,
            assignment_group: AssignmentGroup::parse(&raw.assignment_group)?,
            customer_score: CustomerScore::new(raw.customer_score)?,
            issue_description: raw.issue_description.clone(),
            work_notes: raw.work_notes.clone(),
        };
        debug!(
            "Validated incident: category={}, priority={}, group={}, score={}",
            record.category.as_str(),
            record.priority.as_str(),
            record.assignment_group.as_str(),
            record.customer_score.get()
        );
        Ok(record)
    }

    /// Validate every field and report all failures at once
    pub fn validate_all(&self, raw: &RawIncident) -> Result<IncidentRecord, Vec<InvalidInputError>> {
        let category = Category::parse(&raw.category);
        let priority = Priority::parse(&raw.priority);
        let assignment_group = AssignmentGroup::parse(&raw.assignment_group);
        let customer_score = CustomerScore::new(raw.customer_score);

        match (category, priority, assignment_group, customer_score) {
            (Ok(category), Ok(priority), Ok(assignment_group), Ok(customer_score)) => {
                Ok(IncidentRecord {
                    category,
                    priority,
                    assignment_group,
                    customer_score,
                    issue_description: raw.issue_description.clone(),
                    work_notes: raw.work_notes.clone(),
                })
            }
            (category, priority, assignment_group, customer_score) => {
                let errors = [
                    category.err(),
                    priority.err(),
                    assignment_group.err(),
                    customer_score.err(),
                ]
                .into_iter()
                .flatten()
                .collect();
                Err(errors)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn network_incident() -> RawIncident {
        RawIncident {
            category: "Network".to_string(),
            priority: "High".to_string(),
            assignment_group: "Network Team".to_string(),
            customer_score: 2,
            issue_description: "VPN down".to_string(),
            work_notes: "Restarted gateway".to_string(),
        }
    }

    #[test]
    fn test_valid_incident() {
        let record = Validator::new().validate(&network_incident()).unwrap();
        assert_eq!(record.category, Category::Network);
        assert_eq!(record.priority, Priority::High);
        assert_eq!(record.assignment_group, AssignmentGroup::Network);
        assert_eq!(record.customer_score.get(), 2);
        assert_eq!(record.work_notes, "Restarted gateway");
    }

    #[test]
    fn test_empty_text_is_accepted() {
        let raw = RawIncident {
            issue_description: String::new(),
            work_notes: String::new(),
            ..network_incident()
        };
        let record = Validator::new().validate(&raw).unwrap();
        assert!(record.issue_description.is_empty());
        assert!(record.work_notes.is_empty());
    }

    #[test]
    fn test_unknown_category_names_field() {
        let raw = RawIncident {
            category: "Printer".to_string(),
            ..network_incident()
        };
        let err = Validator::new().validate(&raw).unwrap_err();
        assert_eq!(err.field(), "category");
        assert!(err.to_string().contains("Printer"));
        assert!(err.to_string().contains("Software"));
    }

    #[test]
    fn test_customer_score_range() {
        let validator = Validator::new();
        for score in [0, 6] {
            let raw = RawIncident {
                customer_score: score,
                ..network_incident()
            };
            let err = validator.validate(&raw).unwrap_err();
            assert_eq!(err.field(), "customer_score");
        }
        for score in [1, 5] {
            let raw = RawIncident {
                customer_score: score,
                ..network_incident()
            };
            assert!(validator.validate(&raw).is_ok());
        }
    }

    #[test]
    fn test_validate_all_collects_every_field() {
        let raw = RawIncident {
            category: "Printer".to_string(),
            priority: "urgent".to_string(),
            customer_score: 9,
            ..network_incident()
        };
        let errors = Validator::new().validate_all(&raw).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field()).collect();
        assert_eq!(fields, vec!["category", "priority", "customer_score"]);
    }

    #[test]
    fn test_wire_format_is_camel_case() {
        let json = r#"{
            "category": "Email",
            "priority": "Low",
            "assignmentGroup": "Support Team",
            "customerScore": 5,
            "issueDescription": "",
            "workNotes": ""
        }"#;
        let raw: RawIncident = serde_json::from_str(json).unwrap();
        assert_eq!(raw.assignment_group, "Support Team");
        assert!(Validator::new().validate(&raw).is_ok());
    }

    #[test]
    fn test_missing_field_is_rejected_by_wire_format() {
        let json = r#"{"category": "Email", "priority": "Low"}"#;
        assert!(serde_json::from_str::<RawIncident>(json).is_err());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn score_accepted_only_within_bounds(score in -100i64..100) {
            let raw = RawIncident {
                category: "Access".to_string(),
                priority: "Medium".to_string(),
                assignment_group: "Security Team".to_string(),
                customer_score: score,
                issue_description: String::new(),
                work_notes: String::new(),
            };
            let ok = Validator::new().validate(&raw).is_ok();
            prop_assert_eq!(ok, (1..=5).contains(&score));
        }
    }
}
