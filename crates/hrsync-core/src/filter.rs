//! # Employee Filters
//!
//! The HR list endpoints take a JSON-encoded array of `[field, op, value]`
//! triples. [`EmployeeFilter`] builds that expression from typed parts so
//! values are always JSON-escaped rather than spliced into a string.

use serde_json::Value;

/// One `[field, operator, value]` condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterTriple {
    /// Field name.
    pub field: String,
    /// Comparison operator (`=`, `!=`, `like`, ...).
    pub op: String,
    /// Right-hand value.
    pub value: String,
}

impl FilterTriple {
    /// An equality condition.
    pub fn eq(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            op: "=".into(),
            value: value.into(),
        }
    }
}

/// A conjunction of [`FilterTriple`]s. The empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeFilter {
    conditions: Vec<FilterTriple>,
}

impl EmployeeFilter {
    /// The filter matching every record.
    pub fn all() -> Self {
        Self::default()
    }

    /// Records with the given status.
    pub fn status(status: &str) -> Self {
        Self::all().and(FilterTriple::eq("status", status))
    }

    /// Records whose company e-mail equals `email`.
    pub fn email(email: &str) -> Self {
        Self::all().and(FilterTriple::eq("company_email", email))
    }

    /// Add a condition.
    pub fn and(mut self, triple: FilterTriple) -> Self {
        self.conditions.push(triple);
        self
    }

    /// The conditions in insertion order.
    pub fn conditions(&self) -> &[FilterTriple] {
        &self.conditions
    }

    /// True when the filter has no conditions.
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// The wire encoding, e.g. `[["status","=","Active"]]`.
    pub fn to_json(&self) -> String {
        let triples: Vec<Value> = self
            .conditions
            .iter()
            .map(|t| Value::from(vec![t.field.clone(), t.op.clone(), t.value.clone()]))
            .collect();
        Value::Array(triples).to_string()
    }

    /// Evaluate the filter against a field accessor. Only `=` and `!=` are
    /// understood; any other operator never matches.
    pub fn matches_with<'a>(&self, field: impl Fn(&str) -> Option<&'a str>) -> bool {
        self.conditions.iter().all(|t| {
            let actual = field(t.field.as_str()).unwrap_or("");
            match t.op.as_str() {
                "=" => actual == t.value,
                "!=" => actual != t.value,
                _ => false,
            }
        })
    }
}
