//! Feature Record Assembly

use crate::error::AssemblyError;
use crate::schema::{FeatureSchema, FieldValue, IncidentField};
use data_validator::{IncidentRecord, RawIncident, Validator};
use std::collections::HashSet;
use tracing::{debug, info};

/// Ordered column record, one entry per schema column
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledRecord {
    columns: Vec<(String, FieldValue)>,
}

impl AssembledRecord {
    /// Build a record directly from column/value pairs
    pub fn from_columns(columns: Vec<(String, FieldValue)>) -> Self {
        Self { columns }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.columns
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.columns.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Where a column's value comes from
#[derive(Debug, Clone)]
enum ColumnSource {
    Collected(IncidentField),
    Default(FieldValue),
}

/// Builds canonical records for one pipeline schema.
///
/// Construction checks that every schema column can be populated, so a schema the
/// form cannot satisfy is rejected at startup instead of on the first request.
#[derive(Debug, Clone)]
pub struct FeatureAssembler {
    plan: Vec<(String, ColumnSource)>,
    validator: Validator,
}

impl FeatureAssembler {
    /// Create an assembler for the given schema
    pub fn new(schema: &FeatureSchema) -> Result<Self, AssemblyError> {
        let mut seen = HashSet::new();
        let mut plan = Vec::with_capacity(schema.len());

        for column in schema.columns() {
            if !seen.insert(column.name.as_str()) {
                return Err(AssemblyError::DuplicateColumn(column.name.clone()));
            }

            let source = match IncidentField::from_column(&column.name) {
                Some(field) => {
                    if field.kind() != column.kind {
                        return Err(AssemblyError::KindMismatch {
                            column: column.name.clone(),
                            expected: column.kind,
                            actual: field.kind(),
                        });
                    }
                    ColumnSource::Collected(field)
                }
                None => match &column.default {
                    Some(value) if value.fits(column.kind) => ColumnSource::Default(value.clone()),
                    Some(value) => {
                        return Err(AssemblyError::KindMismatch {
                            column: column.name.clone(),
                            expected: column.kind,
                            actual: value.kind_hint(),
                        });
                    }
                    None => return Err(AssemblyError::MissingColumn(column.name.clone())),
                },
            };
            plan.push((column.name.clone(), source));
        }

        let defaulted = plan
            .iter()
            .filter(|(_, source)| matches!(source, ColumnSource::Default(_)))
            .count();
        info!(
            "Feature assembler ready: {} columns ({} from defaults)",
            plan.len(),
            defaulted
        );

        Ok(Self {
            plan,
            validator: Validator::new(),
        })
    }

    /// Assemble a validated incident
    pub fn assemble(&self, record: &IncidentRecord) -> AssembledRecord {
        let columns = self
            .plan
            .iter()
            .map(|(name, source)| {
                let value = match source {
                    ColumnSource::Collected(field) => field.value(record),
                    ColumnSource::Default(value) => value.clone(),
                };
                (name.clone(), value)
            })
            .collect();

        AssembledRecord { columns }
    }

    /// Validate raw form input, then assemble it
    pub fn assemble_raw(&self, raw: &RawIncident) -> Result<AssembledRecord, AssemblyError> {
        let record = self.validator.validate(raw)?;
        let assembled = self.assemble(&record);
        debug!("Assembled record with {} columns", assembled.len());
        Ok(assembled)
    }
}
