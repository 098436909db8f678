//! Stateless helper utilities used by the XLSX writer kernel.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate};

use crate::conf::{
    N_EXCEL_EPOCH_OFFSET_DAYS, N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX,
    TUP_EXCEL_ILLEGAL,
};
use crate::error::{XlsxWriteError, XlsxWriteResult};
use crate::spec::{
    EnumCellValue, EnumColumnKind, EnumIntegerCoerceMode, SpecSheetHorizontalMerge,
    SpecXlsxValuePolicy,
};

/// `NaiveDate::num_days_from_ce` of 1970-01-01.
const N_DAYS_CE_TO_UNIX_EPOCH: i64 = 719_163;

////////////////////////////////////////////////////////////////////////////////
// #region CellValueConversion

/// Convert `NaN`/`Inf` to policy string; return `None` for finite values.
pub fn convert_nan_inf_to_str(x: f64, value_policy: &SpecXlsxValuePolicy) -> Option<String> {
    if x.is_nan() {
        return Some(value_policy.nan_str.clone());
    }
    if x.is_infinite() {
        return Some(if x.is_sign_positive() {
            value_policy.posinf_str.clone()
        } else {
            value_policy.neginf_str.clone()
        });
    }
    None
}

/// Convert days since the Unix epoch to an Excel serial.
pub fn convert_unix_days_to_excel_serial(days: f64) -> f64 {
    days + N_EXCEL_EPOCH_OFFSET_DAYS as f64
}

/// Parse an ISO-8601 calendar date (`YYYY-MM-DD`) into an Excel serial.
pub fn convert_date_str_to_excel_serial(s: &str) -> Option<f64> {
    let date = NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()?;
    let n_days_unix = i64::from(date.num_days_from_ce()) - N_DAYS_CE_TO_UNIX_EPOCH;
    Some(convert_unix_days_to_excel_serial(n_days_unix as f64))
}

fn convert_non_finite(
    x: f64,
    if_keep_missing_values: bool,
    value_policy: &SpecXlsxValuePolicy,
) -> EnumCellValue {
    if if_keep_missing_values {
        EnumCellValue::String(
            convert_nan_inf_to_str(x, value_policy).unwrap_or_else(|| value_policy.nan_str.clone()),
        )
    } else {
        EnumCellValue::None
    }
}

/// Normalize cell value according to the column kind and value policy.
pub fn convert_cell_value(
    value: &EnumCellValue,
    kind: EnumColumnKind,
    if_keep_missing_values: bool,
    value_policy: &SpecXlsxValuePolicy,
) -> EnumCellValue {
    if matches!(value, EnumCellValue::None) {
        return if if_keep_missing_values {
            EnumCellValue::String(value_policy.missing_value_str.clone())
        } else {
            EnumCellValue::None
        };
    }

    match kind {
        EnumColumnKind::Text => match value {
            EnumCellValue::String(s) => EnumCellValue::String(s.clone()),
            EnumCellValue::Number(n) => EnumCellValue::String(n.to_string()),
            EnumCellValue::None => EnumCellValue::None,
        },
        EnumColumnKind::Integer => match value {
            EnumCellValue::Number(n) => {
                if !n.is_finite() {
                    convert_non_finite(*n, if_keep_missing_values, value_policy)
                } else if value_policy.integer_coerce == EnumIntegerCoerceMode::Coerce {
                    EnumCellValue::Number(n.trunc())
                } else if n.fract() == 0.0 {
                    EnumCellValue::Number(*n)
                } else {
                    EnumCellValue::String(n.to_string())
                }
            }
            EnumCellValue::String(s) => {
                if let Ok(v) = s.parse::<i64>() {
                    EnumCellValue::Number(v as f64)
                } else if value_policy.integer_coerce == EnumIntegerCoerceMode::Coerce
                    && let Ok(v) = s.parse::<f64>()
                {
                    if v.is_finite() {
                        EnumCellValue::Number(v.trunc())
                    } else {
                        convert_non_finite(v, if_keep_missing_values, value_policy)
                    }
                } else {
                    EnumCellValue::String(s.clone())
                }
            }
            EnumCellValue::None => EnumCellValue::None,
        },
        EnumColumnKind::Numeric | EnumColumnKind::Date => match value {
            EnumCellValue::Number(n) => {
                if n.is_finite() {
                    EnumCellValue::Number(*n)
                } else {
                    convert_non_finite(*n, if_keep_missing_values, value_policy)
                }
            }
            EnumCellValue::String(s) => {
                if kind == EnumColumnKind::Date
                    && let Some(serial) = convert_date_str_to_excel_serial(s)
                {
                    return EnumCellValue::Number(serial);
                }
                match s.parse::<f64>() {
                    Ok(v) if v.is_finite() => EnumCellValue::Number(v),
                    Ok(v) => convert_non_finite(v, if_keep_missing_values, value_policy),
                    Err(_) => EnumCellValue::String(s.clone()),
                }
            }
            EnumCellValue::None => EnumCellValue::None,
        },
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region DataFrameLikeUtils

/// Validate that `columns` has no duplicated names.
pub fn validate_unique_columns(columns: &[String]) -> XlsxWriteResult<()> {
    if columns.len() == columns.iter().collect::<BTreeSet<_>>().len() {
        return Ok(());
    }

    let mut dict_pos: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (n_idx, c_name) in columns.iter().enumerate() {
        dict_pos.entry(c_name).or_default().push(n_idx);
    }

    let c_msg = dict_pos
        .iter()
        .filter_map(|(c_name, l_pos)| {
            if l_pos.len() > 1 {
                Some(format!(
                    "{c_name:?} x{} at indices {:?}",
                    l_pos.len(),
                    l_pos
                ))
            } else {
                None
            }
        })
        .collect::<Vec<_>>()
        .join("; ");

    Err(XlsxWriteError::InvalidInput(format!(
        "Duplicate column names detected: {c_msg}"
    )))
}

/// Check that a sheet of `height_total` rows and `width_total` columns fits.
pub fn validate_sheet_bounds(height_total: usize, width_total: usize) -> XlsxWriteResult<()> {
    if height_total > N_NROWS_EXCEL_MAX {
        return Err(XlsxWriteError::ExceedsExcelLimit(format!(
            "{height_total} rows > {N_NROWS_EXCEL_MAX}"
        )));
    }
    if width_total > N_NCOLS_EXCEL_MAX {
        return Err(XlsxWriteError::ExceedsExcelLimit(format!(
            "{width_total} columns > {N_NCOLS_EXCEL_MAX}"
        )));
    }
    Ok(())
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region SheetNormalization

/// Replace invalid chars and trim to valid Excel sheet name.
pub fn sanitize_sheet_name(name: &str, replace_to: &str) -> String {
    let mut c_name = name.to_string();
    for c_illegal in TUP_EXCEL_ILLEGAL {
        c_name = c_name.replace(c_illegal, replace_to);
    }
    c_name = c_name.trim().to_string();
    if c_name.is_empty() {
        c_name = "Sheet".to_string();
    }

    c_name.chars().take(N_LEN_EXCEL_SHEET_NAME_MAX).collect()
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region HeaderMergeUtils

/// Plan horizontal merges for repeated non-empty header text per row.
pub fn plan_horizontal_merges(
    header_grid: &[Vec<String>],
) -> BTreeMap<usize, Vec<SpecSheetHorizontalMerge>> {
    let mut dict_horizontal_merges_map = BTreeMap::new();

    for (idx_row, v_str_current_row) in header_grid.iter().enumerate() {
        let n_cols = v_str_current_row.len();
        let mut n_col_idx = 0;

        while n_col_idx < n_cols {
            let c_cell_val = &v_str_current_row[n_col_idx];
            if c_cell_val.is_empty() {
                n_col_idx += 1;
                continue;
            }

            let mut n_col_idx_end = n_col_idx + 1;
            while n_col_idx_end < n_cols && v_str_current_row[n_col_idx_end] == *c_cell_val {
                n_col_idx_end += 1;
            }

            if n_col_idx_end - n_col_idx > 1 {
                dict_horizontal_merges_map
                    .entry(idx_row)
                    .or_insert_with(Vec::new)
                    .push(SpecSheetHorizontalMerge {
                        row_idx_start: idx_row,
                        col_idx_start: n_col_idx,
                        col_idx_end: n_col_idx_end - 1,
                        text: c_cell_val.clone(),
                    });
            }
            n_col_idx = n_col_idx_end;
        }
    }

    dict_horizontal_merges_map
}

/// Generate contiguous vertical runs `(col, row_start, row_end, text)`.
pub fn generate_vertical_runs(header_grid: &[Vec<String>]) -> Vec<(usize, usize, usize, String)> {
    let mut v_run_collection = Vec::new();
    let Some(v_header_row_0) = header_grid.first() else {
        return v_run_collection;
    };

    let n_rows = header_grid.len();
    let n_cols = v_header_row_0.len();

    debug_assert!(
        header_grid.iter().all(|row| row.len() == n_cols),
        "All rows must have the same number of columns."
    );

    for idx_col in 0..n_cols {
        let mut n_row_idx_start = 0;
        while n_row_idx_start < n_rows {
            let c_val_cell_current = &header_grid[n_row_idx_start][idx_col];
            if c_val_cell_current.is_empty() {
                n_row_idx_start += 1;
                continue;
            }

            let mut n_row_idx_next = n_row_idx_start + 1;
            while n_row_idx_next < n_rows
                && header_grid[n_row_idx_next][idx_col] == *c_val_cell_current
            {
                n_row_idx_next += 1;
            }

            if n_row_idx_next - n_row_idx_start > 1 {
                v_run_collection.push((
                    idx_col,
                    n_row_idx_start,
                    n_row_idx_next - 1,
                    c_val_cell_current.clone(),
                ));
            }

            n_row_idx_start = n_row_idx_next;
        }
    }

    v_run_collection
}

/// Clear repeated text in vertical runs, keeping only first row text.
pub fn apply_vertical_run_text_blankout(header_grid: &mut [Vec<String>]) {
    for (col_idx, row_start, row_end, _) in generate_vertical_runs(header_grid) {
        for row in header_grid.iter_mut().take(row_end + 1).skip(row_start + 1) {
            row[col_idx].clear();
        }
    }
}

/// Build lookup set for cells covered by a horizontal merge (excluding anchor).
pub fn derive_horizontal_merge_tracker(
    row_horizontal_merge_mapping: &BTreeMap<usize, Vec<SpecSheetHorizontalMerge>>,
) -> BTreeSet<(usize, usize)> {
    let mut set_merged_cells = BTreeSet::new();

    for (row_idx, horizontal_merges) in row_horizontal_merge_mapping {
        for merge in horizontal_merges {
            for col_idx in (merge.col_idx_start + 1)..=merge.col_idx_end {
                set_merged_cells.insert((*row_idx, col_idx));
            }
        }
    }

    set_merged_cells
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|row| row.iter().map(ToString::to_string).collect())
            .collect()
    }

    #[test]
    fn test_generate_vertical_runs_detects_only_contiguous_non_empty_runs() {
        let grid = grid(&[
            &["A", "X"],
            &["A", ""],
            &["A", "X"],
            &["", "X"],
            &["B", "X"],
            &["B", "Y"],
        ]);

        assert_eq!(
            generate_vertical_runs(&grid),
            vec![
                (0, 0, 2, "A".to_string()),
                (0, 4, 5, "B".to_string()),
                (1, 2, 4, "X".to_string())
            ]
        );
    }

    #[test]
    fn test_apply_vertical_run_text_blankout() {
        let mut grid = grid(&[&["A", "B"], &["A", "B"], &["", "B"], &["C", "B"], &["C", ""]]);

        apply_vertical_run_text_blankout(&mut grid);

        assert_eq!(grid[0][0], "A");
        assert_eq!(grid[1][0], "");
        assert_eq!(grid[3][0], "C");
        assert_eq!(grid[4][0], "");

        assert_eq!(grid[0][1], "B");
        assert_eq!(grid[1][1], "");
        assert_eq!(grid[2][1], "");
        assert_eq!(grid[3][1], "");
    }

    #[test]
    fn test_plan_horizontal_merges_groups_repeated_labels() {
        let grid = grid(&[
            &["", "Tema 1", "Tema 1", "Tema 2", "Tema 1"],
            &["", "Coluna1", "Coluna2", "Coluna3", "Coluna4"],
        ]);

        let dict_merges = plan_horizontal_merges(&grid);
        assert_eq!(dict_merges.len(), 1);
        assert_eq!(
            dict_merges[&0],
            vec![SpecSheetHorizontalMerge {
                row_idx_start: 0,
                col_idx_start: 1,
                col_idx_end: 2,
                text: "Tema 1".to_string(),
            }]
        );

        let set_covered = derive_horizontal_merge_tracker(&dict_merges);
        assert_eq!(set_covered.into_iter().collect::<Vec<_>>(), vec![(0, 2)]);
    }

    #[test]
    fn test_convert_cell_value_by_kind() {
        let policy = SpecXlsxValuePolicy::default();

        assert_eq!(
            convert_cell_value(
                &EnumCellValue::Number(1500.0),
                EnumColumnKind::Text,
                false,
                &policy
            ),
            EnumCellValue::String("1500".to_string())
        );
        assert_eq!(
            convert_cell_value(
                &EnumCellValue::Number(2.5),
                EnumColumnKind::Integer,
                false,
                &policy
            ),
            EnumCellValue::String("2.5".to_string())
        );
        assert_eq!(
            convert_cell_value(
                &EnumCellValue::String("0.15".to_string()),
                EnumColumnKind::Numeric,
                false,
                &policy
            ),
            EnumCellValue::Number(0.15)
        );
        assert_eq!(
            convert_cell_value(
                &EnumCellValue::Number(f64::NAN),
                EnumColumnKind::Numeric,
                true,
                &policy
            ),
            EnumCellValue::String("NaN".to_string())
        );
        assert_eq!(
            convert_cell_value(&EnumCellValue::None, EnumColumnKind::Numeric, true, &policy),
            EnumCellValue::String("NA".to_string())
        );
        assert_eq!(
            convert_cell_value(&EnumCellValue::None, EnumColumnKind::Numeric, false, &policy),
            EnumCellValue::None
        );
    }

    #[test]
    fn test_integer_coerce_truncates() {
        let policy = SpecXlsxValuePolicy {
            integer_coerce: EnumIntegerCoerceMode::Coerce,
            ..Default::default()
        };

        assert_eq!(
            convert_cell_value(
                &EnumCellValue::String("7.9".to_string()),
                EnumColumnKind::Integer,
                false,
                &policy
            ),
            EnumCellValue::Number(7.0)
        );
    }

    #[test]
    fn test_date_strings_become_excel_serials() {
        assert_eq!(convert_date_str_to_excel_serial("2021-01-01"), Some(44197.0));
        assert_eq!(convert_date_str_to_excel_serial("1970-01-01"), Some(25569.0));
        assert_eq!(convert_date_str_to_excel_serial("01/01/2021"), None);

        assert_eq!(
            convert_cell_value(
                &EnumCellValue::String("2021-04-01".to_string()),
                EnumColumnKind::Date,
                false,
                &SpecXlsxValuePolicy::default()
            ),
            EnumCellValue::Number(44287.0)
        );
    }

    #[test]
    fn test_sanitize_sheet_name() {
        assert_eq!(sanitize_sheet_name("a/b:c", "_"), "a_b_c");
        assert_eq!(sanitize_sheet_name("   ", "_"), "Sheet");
        assert_eq!(sanitize_sheet_name(&"x".repeat(40), "_").len(), 31);
    }

    #[test]
    fn test_validate_unique_columns_reports_positions() {
        let cols = vec!["a".to_string(), "b".to_string(), "a".to_string()];
        let err = validate_unique_columns(&cols).unwrap_err();
        assert!(err.to_string().contains("\"a\" x2 at indices [0, 2]"));
    }

    #[test]
    fn test_validate_sheet_bounds() {
        assert!(validate_sheet_bounds(N_NROWS_EXCEL_MAX, N_NCOLS_EXCEL_MAX).is_ok());
        assert!(matches!(
            validate_sheet_bounds(N_NROWS_EXCEL_MAX + 1, 1),
            Err(XlsxWriteError::ExceedsExcelLimit(_))
        ));
        assert!(matches!(
            validate_sheet_bounds(1, N_NCOLS_EXCEL_MAX + 1),
            Err(XlsxWriteError::ExceedsExcelLimit(_))
        ));
    }
}
