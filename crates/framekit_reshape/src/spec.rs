//! Reshape specification models: column keys, group relation, bindings, options.

use std::fmt;

use polars::prelude::{Column, DataType, Series};

////////////////////////////////////////////////////////////////////////////////
// #region ColumnAddressing

/// Two-level column address `(group, name)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpecColumnKey {
    /// Outer label.
    pub group: String,
    /// Inner label; also the source column looked up in the flat table.
    pub name: String,
}

impl SpecColumnKey {
    pub fn new(group: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for SpecColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:?}, {:?})", self.group, self.name)
    }
}

impl<G, N> From<(G, N)> for SpecColumnKey
where
    G: Into<String>,
    N: Into<String>,
{
    fn from((group, name): (G, N)) -> Self {
        Self::new(group, name)
    }
}

/// Ordered `(group, name)` pairs defining the target column index.
///
/// Repeated pairs are allowed and bind independently.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecGroupRelation {
    keys: Vec<SpecColumnKey>,
}

impl SpecGroupRelation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style append.
    pub fn with(mut self, group: impl Into<String>, name: impl Into<String>) -> Self {
        self.push(group, name);
        self
    }

    pub fn push(&mut self, group: impl Into<String>, name: impl Into<String>) {
        self.keys.push(SpecColumnKey::new(group, name));
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> &[SpecColumnKey] {
        &self.keys
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SpecColumnKey> {
        self.keys.iter()
    }
}

impl<K: Into<SpecColumnKey>> FromIterator<K> for SpecGroupRelation {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a SpecGroupRelation {
    type Item = &'a SpecColumnKey;
    type IntoIter = std::slice::Iter<'a, SpecColumnKey>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ColumnBinding

/// Source of one reshaped column.
#[derive(Debug, Clone)]
pub enum EnumColumnBinding {
    /// Column found in the source table; values carried unchanged.
    Present(Column),
    /// Column absent from the source table; `len` missing-value markers.
    Synthesized {
        /// Placeholder length (source row count).
        len: usize,
    },
}

impl EnumColumnBinding {
    pub fn is_synthesized(&self) -> bool {
        matches!(self, EnumColumnBinding::Synthesized { .. })
    }

    pub fn len(&self) -> usize {
        match self {
            EnumColumnBinding::Present(col) => col.len(),
            EnumColumnBinding::Synthesized { len } => *len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Build the output column named `name`; placeholders use `dtype_placeholder`.
    pub fn materialize(&self, name: &str, dtype_placeholder: &DataType) -> Column {
        match self {
            EnumColumnBinding::Present(col) => {
                let mut col_out = col.clone();
                col_out.rename(name.into());
                col_out
            }
            EnumColumnBinding::Synthesized { len } => {
                Column::from(Series::full_null(name.into(), *len, dtype_placeholder))
            }
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Options

/// Handling of relation entries whose column is absent from the source table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnumMissingColumnPolicy {
    /// Emit a warning and insert a missing-value placeholder.
    #[default]
    Warn,
    /// Fail on the first missing column.
    FailFast,
}

/// Options for [`crate::reshape::reshape_hierarchical`].
#[derive(Debug, Clone, PartialEq)]
pub struct SpecReshapeOptions {
    /// Missing-column handling.
    pub rule_missing: EnumMissingColumnPolicy,
    /// Source column used as row index; `None` uses `0..height`.
    ///
    /// Not a data column: relation entries naming it bind a placeholder.
    pub col_index: Option<String>,
    /// Dtype of placeholder columns.
    pub dtype_placeholder: DataType,
}

impl Default for SpecReshapeOptions {
    fn default() -> Self {
        Self {
            rule_missing: EnumMissingColumnPolicy::Warn,
            col_index: None,
            dtype_placeholder: DataType::Null,
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Report

/// Per-call reshape report.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecReshapeReport {
    /// Relation entries bound to source columns.
    pub cnt_present: usize,
    /// Relation entries bound to placeholders, in relation order.
    pub cols_synthesized: Vec<SpecColumnKey>,
    /// Operator-facing warnings, one per placeholder.
    pub warnings: Vec<String>,
}

impl SpecReshapeReport {
    /// Add a warning message.
    pub fn warn(&mut self, msg: impl AsRef<str>) {
        self.warnings.push(msg.as_ref().to_string());
    }

    pub fn synthesized_count(&self) -> usize {
        self.cols_synthesized.len()
    }

    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        format!(
            "{prefix} present={} synthesized={} warnings={}",
            self.cnt_present,
            self.synthesized_count(),
            self.warnings.len()
        )
    }
}

impl fmt::Display for SpecReshapeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[RESHAPE]"))
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
