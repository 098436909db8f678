//! Flat table to hierarchical frame.

use polars::prelude::{Column, DataFrame};
use tracing::{debug, warn};

use crate::error::{ReshapeError, ReshapeResult};
use crate::frame::HierarchicalFrame;
use crate::spec::{
    EnumColumnBinding, EnumMissingColumnPolicy, SpecColumnKey, SpecGroupRelation,
    SpecReshapeOptions, SpecReshapeReport,
};

const C_INDEX_NAME_DEFAULT: &str = "index";

////////////////////////////////////////////////////////////////////////////////
// #region Binding

/// Bind every relation entry to a source column or a placeholder.
///
/// Entries are bound in relation order. Under [`EnumMissingColumnPolicy::Warn`]
/// each missing entry logs a warning and is recorded in `report`.
///
/// The index column (if any) is not a data column: an entry naming it binds a
/// placeholder with its own warning under either policy.
pub fn bind_columns(
    df: &DataFrame,
    relation: &SpecGroupRelation,
    options: &SpecReshapeOptions,
    report: &mut SpecReshapeReport,
) -> ReshapeResult<Vec<EnumColumnBinding>> {
    let n_height = df.height();
    let mut l_bindings = Vec::with_capacity(relation.len());

    for key in relation {
        if options.col_index.as_deref() == Some(key.name.as_str()) {
            let msg = format!(
                "column '{}' is the row index; inserting missing-value placeholder.",
                key.name
            );
            warn!(group = %key.group, column = %key.name, "{msg}");
            report.warn(msg);
            report.cols_synthesized.push(key.clone());
            l_bindings.push(EnumColumnBinding::Synthesized { len: n_height });
            continue;
        }

        match df.column(&key.name).ok() {
            Some(col) => {
                report.cnt_present += 1;
                l_bindings.push(EnumColumnBinding::Present(col.clone()));
            }
            None => {
                if options.rule_missing == EnumMissingColumnPolicy::FailFast {
                    return Err(ReshapeError::MissingColumn {
                        group: key.group.clone(),
                        name: key.name.clone(),
                    });
                }
                let msg = format!(
                    "column '{}' not found in source table; inserting missing-value placeholder.",
                    key.name
                );
                warn!(group = %key.group, column = %key.name, "{msg}");
                report.warn(msg);
                report.cols_synthesized.push(key.clone());
                l_bindings.push(EnumColumnBinding::Synthesized { len: n_height });
            }
        }
    }
    Ok(l_bindings)
}

/// Two-level column index taken from the relation as-is.
pub fn create_column_index(relation: &SpecGroupRelation) -> Vec<SpecColumnKey> {
    relation.keys().to_vec()
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Reshape

/// Reshape a flat table into a [`HierarchicalFrame`] following `relation`.
///
/// Output width equals `relation.len()` and column order follows the
/// relation. Rows and their order are kept; the row index is the
/// `col_index` column or `0..height`.
pub fn reshape_hierarchical(
    df: &DataFrame,
    relation: &SpecGroupRelation,
    options: &SpecReshapeOptions,
) -> ReshapeResult<(HierarchicalFrame, SpecReshapeReport)> {
    let index = derive_row_index(df, options.col_index.as_deref())?;

    let mut report = SpecReshapeReport::default();
    let l_bindings = bind_columns(df, relation, options, &mut report)?;
    let column_index = create_column_index(relation);

    let columns = column_index
        .iter()
        .zip(&l_bindings)
        .map(|(key, binding)| binding.materialize(&key.name, &options.dtype_placeholder))
        .collect();

    debug!(
        rows = df.height(),
        cols = column_index.len(),
        synthesized = report.synthesized_count(),
        "reshaped table"
    );
    Ok((
        HierarchicalFrame::from_parts(index, column_index, columns),
        report,
    ))
}

fn derive_row_index(df: &DataFrame, col_index: Option<&str>) -> ReshapeResult<Column> {
    match col_index {
        Some(c_name) => df
            .column(c_name)
            .cloned()
            .map_err(|_| ReshapeError::IndexColumnNotFound(c_name.to_string())),
        None => {
            let l_idx: Vec<i64> = (0..df.height() as i64).collect();
            Ok(Column::new(C_INDEX_NAME_DEFAULT.into(), l_idx))
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
