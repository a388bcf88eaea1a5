//! Column Schema

use data_validator::{Domain, IncidentRecord};
use serde::{Deserialize, Serialize};

/// How a column's values are interpreted by the encoder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// One label from a closed set
    Categorical,
    /// Integer or real number
    Numeric,
    /// Free text
    Text,
}

/// A single cell of an assembled record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Number(f64),
    Text(String),
}

impl FieldValue {
    /// Whether this value may populate a column of the given kind
    pub fn fits(&self, kind: ColumnKind) -> bool {
        match self {
            FieldValue::Integer(_) | FieldValue::Number(_) => kind == ColumnKind::Numeric,
            FieldValue::Text(_) => matches!(kind, ColumnKind::Categorical | ColumnKind::Text),
        }
    }

    /// Closest column kind for this value
    pub fn kind_hint(&self) -> ColumnKind {
        match self {
            FieldValue::Integer(_) | FieldValue::Number(_) => ColumnKind::Numeric,
            FieldValue::Text(_) => ColumnKind::Text,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(value) => Some(*value as f64),
            FieldValue::Number(value) => Some(*value),
            FieldValue::Text(_) => None,
        }
    }
}

/// One column the pipeline was fit on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Column name, exactly as seen during training
    pub name: String,
    pub kind: ColumnKind,
    /// Value substituted when the column is not collected from the form
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<FieldValue>,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            kind,
            default: None,
        }
    }

    pub fn with_default(mut self, value: FieldValue) -> Self {
        self.default = Some(value);
        self
    }
}

/// Ordered column set expected by the trained pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureSchema {
    columns: Vec<ColumnSpec>,
}

impl FeatureSchema {
    pub fn new(columns: Vec<ColumnSpec>) -> Self {
        Self { columns }
    }

    /// The six collected incident fields, in form order
    pub fn incident() -> Self {
        Self::new(
            IncidentField::ALL
                .iter()
                .map(|field| ColumnSpec::new(field.column_name(), field.kind()))
                .collect(),
        )
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Fields collected from the incident form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IncidentField {
    Category,
    Priority,
    AssignmentGroup,
    CustomerScore,
    IssueDescription,
    WorkNotes,
}

impl IncidentField {
    pub const ALL: [IncidentField; 6] = [
        IncidentField::Category,
        IncidentField::Priority,
        IncidentField::AssignmentGroup,
        IncidentField::CustomerScore,
        IncidentField::IssueDescription,
        IncidentField::WorkNotes,
    ];

    /// Column name used by the training data
    pub fn column_name(&self) -> &'static str {
        match self {
            IncidentField::Category => "Category",
            IncidentField::Priority => "Priority",
            IncidentField::AssignmentGroup => "Assignment Group",
            IncidentField::CustomerScore => "Customer Score",
            IncidentField::IssueDescription => "Issue Description",
            IncidentField::WorkNotes => "Work Notes",
        }
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            IncidentField::Category | IncidentField::Priority | IncidentField::AssignmentGroup => {
                ColumnKind::Categorical
            }
            IncidentField::CustomerScore => ColumnKind::Numeric,
            IncidentField::IssueDescription | IncidentField::WorkNotes => ColumnKind::Text,
        }
    }

    /// Look up the collected field feeding a column
    pub fn from_column(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|field| field.column_name() == name)
    }

    /// Read this field from a validated record
    pub fn value(&self, record: &IncidentRecord) -> FieldValue {
        match self {
            IncidentField::Category => FieldValue::Text(record.category.as_str().to_string()),
            IncidentField::Priority => FieldValue::Text(record.priority.as_str().to_string()),
            IncidentField::AssignmentGroup => {
                FieldValue::Text(record.assignment_group.as_str().to_string())
            }
            IncidentField::CustomerScore => FieldValue::Integer(record.customer_score.get() as i64),
            IncidentField::IssueDescription => FieldValue::Text(record.issue_description.clone()),
            IncidentField::WorkNotes => FieldValue::Text(record.work_notes.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incident_schema_order() {
        let schema = FeatureSchema::incident();
        let names: Vec<_> = schema.columns().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Category",
                "Priority",
                "Assignment Group",
                "Customer Score",
                "Issue Description",
                "Work Notes",
            ]
        );
        assert_eq!(schema.column("Customer Score").unwrap().kind, ColumnKind::Numeric);
    }

    #[test]
    fn test_schema_json_shape() {
        let json = r#"[
            {"name": "Category", "kind": "categorical"},
            {"name": "Assignee", "kind": "categorical", "default": "Alice"},
            {"name": "Reopen Count", "kind": "numeric", "default": 0}
        ]"#;
        let schema: FeatureSchema = serde_json::from_str(json).unwrap();
        assert_eq!(schema.len(), 3);
        assert_eq!(
            schema.column("Assignee").unwrap().default,
            Some(FieldValue::Text("Alice".to_string()))
        );
        assert_eq!(
            schema.column("Reopen Count").unwrap().default,
            Some(FieldValue::Integer(0))
        );
    }

    #[test]
    fn test_value_fits_kind() {
        assert!(FieldValue::Integer(3).fits(ColumnKind::Numeric));
        assert!(FieldValue::Number(0.5).fits(ColumnKind::Numeric));
        assert!(!FieldValue::Integer(3).fits(ColumnKind::Text));
        assert!(FieldValue::Text("x".into()).fits(ColumnKind::Categorical));
        assert!(!FieldValue::Text("x".into()).fits(ColumnKind::Numeric));
    }

    #[test]
    fn test_from_column() {
        assert_eq!(
            IncidentField::from_column("Assignment Group"),
            Some(IncidentField::AssignmentGroup)
        );
        assert_eq!(IncidentField::from_column("assignment_group"), None);
    }
}
