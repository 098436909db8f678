//! XLSX writer kernel that turns a DataFrame plus column formats into a workbook.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use polars::prelude::{AnyValue, Column, DataFrame, DataType, TimeUnit};
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet};
use tracing::debug;

use crate::conf::{
    C_NUM_FORMAT_DATE_DEFAULT, C_NUM_FORMAT_DATETIME_DEFAULT, EnumNumFormat,
    N_LEN_EXCEL_SHEET_NAME_MAX, derive_default_xlsx_formats,
};
use crate::error::{XlsxWriteError, XlsxWriteResult};
use crate::spec::{
    EnumAutofitColumnsRule, EnumCellValue, EnumColumnKind, SpecAutofitCellsPolicy,
    SpecCellFormat, SpecColumnFormatAssignment, SpecColumnFormatPlan, SpecFormatCatalog,
    SpecResolvedFormat, SpecXlsxReport, SpecXlsxValuePolicy, SpecXlsxWriteOptions,
};
use crate::util::{
    apply_vertical_run_text_blankout, convert_cell_value, convert_unix_days_to_excel_serial,
    derive_horizontal_merge_tracker, plan_horizontal_merges, sanitize_sheet_name,
    validate_sheet_bounds, validate_unique_columns,
};

/// Per-sheet call options.
#[derive(Debug, Clone)]
pub struct SpecXlsxSheetWriteOptions {
    /// Column of the frame used as row index; `None` writes `0..height`.
    pub col_index: Option<String>,
    /// Write the row index as the first sheet column.
    pub if_write_index: bool,
    /// Number of frozen columns.
    pub col_freeze: usize,
    /// Frozen row index; defaults to header height when `None`.
    pub row_freeze: Option<usize>,
    /// Merge repeated labels of a multi-row header.
    pub if_merge_header: bool,
    /// Override writer-level keep-missing behavior.
    pub if_keep_missing_values: Option<bool>,
    /// Column autofit policy.
    pub policy_autofit: SpecAutofitCellsPolicy,
    /// Catalog used to resolve logical format names.
    pub catalog: SpecFormatCatalog,
}

impl Default for SpecXlsxSheetWriteOptions {
    fn default() -> Self {
        Self {
            col_index: None,
            if_write_index: true,
            col_freeze: 0,
            row_freeze: None,
            if_merge_header: false,
            if_keep_missing_values: None,
            policy_autofit: SpecAutofitCellsPolicy::default(),
            catalog: SpecFormatCatalog::default(),
        }
    }
}

/// Row index source for the first sheet column.
enum EnumIndexSource<'a> {
    Range,
    Column(&'a Column, EnumColumnKind),
}

/// Stateful workbook writer.
pub struct XlsxWriter {
    path_file_out: PathBuf,
    workbook: Workbook,
    fmt_text: SpecCellFormat,
    fmt_index: SpecCellFormat,
    fmt_header: SpecCellFormat,
    write_options: SpecXlsxWriteOptions,
    set_sheet_names_existing: BTreeSet<String>,
    l_reports: Vec<SpecXlsxReport>,
    if_closed: bool,
}

impl XlsxWriter {
    /// Create writer bound to output path and format/options presets.
    ///
    /// The workbook is buffered in memory until [`Self::close`] is called.
    pub fn new(
        path_file_out: PathBuf,
        fmt_text: SpecCellFormat,
        fmt_index: SpecCellFormat,
        fmt_header: SpecCellFormat,
        write_options: SpecXlsxWriteOptions,
    ) -> Self {
        Self {
            path_file_out,
            workbook: Workbook::new(),
            fmt_text,
            fmt_index,
            fmt_header,
            write_options,
            set_sheet_names_existing: BTreeSet::new(),
            l_reports: Vec::new(),
            if_closed: false,
        }
    }

    /// Create writer with the presets from [`derive_default_xlsx_formats`].
    pub fn with_defaults(path_file_out: PathBuf) -> XlsxWriteResult<Self> {
        let dict_default_fmts = derive_default_xlsx_formats();
        let take_preset = |key: &str| {
            dict_default_fmts.get(key).cloned().ok_or_else(|| {
                XlsxWriteError::InvalidInput(format!("Missing default format: {key}"))
            })
        };

        Ok(Self::new(
            path_file_out,
            take_preset("text")?,
            take_preset("index")?,
            take_preset("header")?,
            SpecXlsxWriteOptions::default(),
        ))
    }

    /// Return output file path as string.
    pub fn file_out(&self) -> String {
        self.path_file_out.to_string_lossy().to_string()
    }

    /// Return immutable snapshot of per-sheet write reports.
    pub fn report(&self) -> Vec<SpecXlsxReport> {
        self.l_reports.clone()
    }

    /// Flush workbook to disk, replacing any existing file. Idempotent.
    pub fn close(&mut self) -> XlsxWriteResult<()> {
        if self.if_closed {
            return Ok(());
        }
        self.workbook.save(&self.path_file_out)?;
        self.if_closed = true;
        Ok(())
    }

    /// Write one sheet.
    ///
    /// `df_header`, when given, replaces the single header row with its rows
    /// (rendered as text) and must have one column per data column.
    /// `column_formats` is resolved before the worksheet is created.
    pub fn write_sheet(
        &mut self,
        df_data: &DataFrame,
        sheet_name: &str,
        df_header: Option<&DataFrame>,
        column_formats: &SpecColumnFormatAssignment,
        options: &SpecXlsxSheetWriteOptions,
    ) -> XlsxWriteResult<()> {
        if self.if_closed {
            return Err(XlsxWriteError::WriterClosed);
        }
        validate_policy_autofit(&options.policy_autofit)?;

        let if_keep_missing_values = options
            .if_keep_missing_values
            .unwrap_or(self.write_options.keep_missing_values);
        let value_policy = self.write_options.value_policy.clone();

        let source_index = match options.col_index.as_deref() {
            Some(c_name) => {
                let col = df_data.column(c_name).map_err(|_| {
                    XlsxWriteError::InvalidInput(format!("Index column not found: {c_name:?}"))
                })?;
                EnumIndexSource::Column(col, derive_inferred_kind(col.dtype(), &self.write_options))
            }
            None => EnumIndexSource::Range,
        };

        let l_cols_data: Vec<&Column> = df_data
            .get_columns()
            .iter()
            .filter(|col| options.col_index.as_deref() != Some(col.name().as_str()))
            .collect();
        let l_colnames_data: Vec<String> = l_cols_data
            .iter()
            .map(|col| col.name().to_string())
            .collect();
        validate_unique_columns(&l_colnames_data)?;
        let dict_resolved = column_formats.resolve(&options.catalog, &l_colnames_data)?;

        let n_width_data = l_cols_data.len();
        let n_height_df = df_data.height();

        let mut l_header_grid = vec![l_colnames_data.clone()];
        if let Some(df_header_custom) = df_header {
            if df_header_custom.height() == 0 {
                return Err(XlsxWriteError::InvalidInput(
                    "df_header must have >= 1 row (0-row header is not allowed).".to_string(),
                ));
            }
            if df_header_custom.width() != n_width_data {
                return Err(XlsxWriteError::InvalidInput(format!(
                    "df_header.width ({}) must equal the number of data columns ({n_width_data}).",
                    df_header_custom.width()
                )));
            }
            l_header_grid = derive_string_grid_from_dataframe(df_header_custom)?;
        }

        let n_col_offset = usize::from(options.if_write_index);
        if options.if_write_index {
            let n_rows_header = l_header_grid.len();
            for (n_idx_row, row) in l_header_grid.iter_mut().enumerate() {
                let c_label = match (&source_index, n_idx_row + 1 == n_rows_header) {
                    (EnumIndexSource::Column(col, _), true) => col.name().to_string(),
                    _ => String::new(),
                };
                row.insert(0, c_label);
            }
        }

        let n_rows_header = l_header_grid.len();
        validate_sheet_bounds(n_rows_header + n_height_df, n_col_offset + n_width_data)?;

        let mut report = SpecXlsxReport {
            height_header: n_rows_header,
            height_body: n_height_df,
            width_data: n_width_data,
            ..Default::default()
        };

        let set_colnames_data: BTreeSet<&str> =
            l_colnames_data.iter().map(String::as_str).collect();
        for (c_col, c_fmt) in column_formats.iter() {
            if !set_colnames_data.contains(c_col) {
                debug!(column = c_col, format = c_fmt, "format assignment ignored");
                report.warn(format!(
                    "Format {c_fmt:?} assigned to absent column {c_col:?} was ignored."
                ));
            }
        }

        let plan_col_formats = plan_column_formats(
            &l_cols_data,
            &dict_resolved,
            &self.fmt_text,
            &self.write_options,
        );
        for col in &l_cols_data {
            if let Some(resolved) = dict_resolved.get(col.name().as_str()) {
                report
                    .cols_formatted
                    .push((col.name().to_string(), resolved.fmt_key));
            }
        }

        let l_fmt_data_by_col: Vec<Format> = plan_col_formats
            .fmts_by_col
            .iter()
            .map(derive_rust_xlsx_format)
            .collect();
        let fmt_header = derive_rust_xlsx_format(&self.fmt_header);
        let fmt_index = derive_rust_xlsx_format(&self.fmt_index);

        let sheet_name_unique = self.derive_unique_sheet_name(&sanitize_sheet_name(sheet_name, "_"));
        debug!(sheet = %sheet_name_unique, rows = n_height_df, cols = n_width_data, "writing sheet");
        let worksheet = self.workbook.add_worksheet();
        worksheet.set_name(&sheet_name_unique)?;

        let n_width_sheet = n_col_offset + n_width_data;
        let mut l_width_by_col_header = vec![0usize; n_width_sheet];
        let mut l_width_by_col_body = vec![0usize; n_width_sheet];
        let rule_autofit = options.policy_autofit.rule_columns;
        let if_autofit_columns = !matches!(rule_autofit, EnumAutofitColumnsRule::None);

        if if_autofit_columns {
            for row in &l_header_grid {
                for (n_idx_col, value) in row.iter().enumerate() {
                    l_width_by_col_header[n_idx_col] = usize::max(
                        l_width_by_col_header[n_idx_col],
                        estimate_unicode_string_width(value),
                    );
                }
            }
        }

        write_header(worksheet, l_header_grid, options.if_merge_header, &fmt_header)?;

        let n_row_freeze = options.row_freeze.unwrap_or(n_rows_header);
        if n_row_freeze > 0 || options.col_freeze > 0 {
            worksheet.set_freeze_panes(
                cast_row_num(n_row_freeze)?,
                cast_col_num(options.col_freeze)?,
            )?;
        }

        let n_rows_body_autofit = options
            .policy_autofit
            .height_body_inferred_max
            .map_or(n_height_df, |n_max| usize::min(n_max, n_height_df));

        for n_row in 0..n_height_df {
            let n_row_sheet = n_rows_header + n_row;
            let if_measure_row = if_autofit_columns && n_row < n_rows_body_autofit;

            if options.if_write_index {
                let (value, kind) = match &source_index {
                    EnumIndexSource::Range => (
                        EnumCellValue::Number(n_row as f64),
                        EnumColumnKind::Integer,
                    ),
                    EnumIndexSource::Column(col, kind) => (
                        convert_cell_value(
                            &derive_cell_value_from_any_value(col.get(n_row)?),
                            *kind,
                            if_keep_missing_values,
                            &value_policy,
                        ),
                        *kind,
                    ),
                };
                if if_measure_row {
                    l_width_by_col_body[0] = usize::max(
                        l_width_by_col_body[0],
                        estimate_width_len(&value, kind, if_keep_missing_values, &value_policy),
                    );
                }
                write_cell_with_format(worksheet, n_row_sheet, 0, &value, &fmt_index)?;
            }

            for (n_idx_col, col) in l_cols_data.iter().enumerate() {
                let kind = plan_col_formats.kinds_by_col[n_idx_col];
                let value = convert_cell_value(
                    &derive_cell_value_from_any_value(col.get(n_row)?),
                    kind,
                    if_keep_missing_values,
                    &value_policy,
                );

                let n_col_sheet = n_col_offset + n_idx_col;
                if if_measure_row {
                    l_width_by_col_body[n_col_sheet] = usize::max(
                        l_width_by_col_body[n_col_sheet],
                        estimate_width_len(&value, kind, if_keep_missing_values, &value_policy),
                    );
                }

                write_cell_with_format(
                    worksheet,
                    n_row_sheet,
                    n_col_sheet,
                    &value,
                    &l_fmt_data_by_col[n_idx_col],
                )?;
            }
        }

        if if_autofit_columns {
            let n_min = usize::max(1, options.policy_autofit.width_cell_min);
            let n_max = usize::min(
                255,
                usize::max(n_min, options.policy_autofit.width_cell_max),
            );
            let n_pad = options.policy_autofit.width_cell_padding;

            for n_idx_col in 0..n_width_sheet {
                let n_width_recorded = match rule_autofit {
                    EnumAutofitColumnsRule::Body => l_width_by_col_body[n_idx_col],
                    EnumAutofitColumnsRule::All => usize::max(
                        l_width_by_col_header[n_idx_col],
                        l_width_by_col_body[n_idx_col],
                    ),
                    EnumAutofitColumnsRule::Header | EnumAutofitColumnsRule::None => {
                        l_width_by_col_header[n_idx_col]
                    }
                };
                let n_width_final = usize::min(n_max, usize::max(n_min, n_width_recorded + n_pad));
                worksheet.set_column_width(cast_col_num(n_idx_col)?, n_width_final as f64)?;
            }
        }

        report.sheet_name = sheet_name_unique;
        self.l_reports.push(report);
        Ok(())
    }

    fn derive_unique_sheet_name(&mut self, name: &str) -> String {
        if !self.set_sheet_names_existing.contains(name) {
            self.set_sheet_names_existing.insert(name.to_string());
            return name.to_string();
        }

        let base_name: String = name
            .chars()
            .take(usize::max(1, N_LEN_EXCEL_SHEET_NAME_MAX - 3))
            .collect();

        let mut n_idx = 2usize;
        loop {
            let candidate: String = format!("{base_name}__{n_idx}")
                .chars()
                .take(N_LEN_EXCEL_SHEET_NAME_MAX)
                .collect();
            if !self.set_sheet_names_existing.contains(&candidate) {
                self.set_sheet_names_existing.insert(candidate.clone());
                return candidate;
            }
            n_idx += 1;
        }
    }
}

/// Estimate displayed width units for one normalized cell value.
///
/// Used by autofit inference logic.
pub fn estimate_width_len(
    value: &EnumCellValue,
    kind: EnumColumnKind,
    if_keep_missing_values: bool,
    value_policy: &SpecXlsxValuePolicy,
) -> usize {
    match value {
        EnumCellValue::None => {
            if if_keep_missing_values {
                value_policy.missing_value_str.len()
            } else {
                0
            }
        }
        EnumCellValue::String(s) => estimate_unicode_string_width(s),
        EnumCellValue::Number(n) => match kind {
            EnumColumnKind::Text => estimate_unicode_string_width(&n.to_string()),
            EnumColumnKind::Integer => (*n as i64).to_string().len(),
            EnumColumnKind::Date => "mm/dd/yyyy".len(),
            EnumColumnKind::Numeric => format!("{n:.2}").len(),
        },
    }
}

fn estimate_unicode_string_width(s: &str) -> usize {
    let n_ascii = s.chars().filter(|chr| chr.is_ascii()).count();
    let n_non_ascii = s.chars().count().saturating_sub(n_ascii);
    n_ascii + (n_non_ascii as f64 * 1.6).round() as usize
}

/// Build per-column format plans and value kinds.
///
/// Columns with a resolved catalog entry take its number format and kind;
/// the others are inferred from their dtype.
pub fn plan_column_formats(
    cols: &[&Column],
    dict_resolved: &BTreeMap<String, SpecResolvedFormat>,
    fmt_text: &SpecCellFormat,
    write_options: &SpecXlsxWriteOptions,
) -> SpecColumnFormatPlan {
    let mut fmts_by_col = Vec::with_capacity(cols.len());
    let mut kinds_by_col = Vec::with_capacity(cols.len());

    for col in cols {
        let fmt_base = fmt_text.merge(&write_options.base_format_patch);

        let (kind, num_format) = match dict_resolved.get(col.name().as_str()) {
            Some(resolved) => (
                derive_assigned_kind(resolved.fmt_key),
                Some(resolved.num_format.clone()),
            ),
            None => (
                derive_inferred_kind(col.dtype(), write_options),
                derive_temporal_num_format(col.dtype()).map(ToString::to_string),
            ),
        };

        let fmt_final = match num_format {
            Some(num_format) => fmt_base.with_(SpecCellFormat {
                num_format: Some(num_format),
                ..Default::default()
            }),
            None => fmt_base,
        };

        fmts_by_col.push(fmt_final);
        kinds_by_col.push(kind);
    }

    SpecColumnFormatPlan {
        fmts_by_col,
        kinds_by_col,
    }
}

fn derive_assigned_kind(fmt_key: EnumNumFormat) -> EnumColumnKind {
    match fmt_key {
        EnumNumFormat::Text => EnumColumnKind::Text,
        EnumNumFormat::Integer => EnumColumnKind::Integer,
        EnumNumFormat::Date => EnumColumnKind::Date,
        EnumNumFormat::Monetary | EnumNumFormat::Percentage | EnumNumFormat::Float => {
            EnumColumnKind::Numeric
        }
    }
}

fn derive_inferred_kind(dtype: &DataType, write_options: &SpecXlsxWriteOptions) -> EnumColumnKind {
    if !write_options.infer_numeric_cols {
        return EnumColumnKind::Text;
    }
    if matches!(dtype, DataType::Date | DataType::Datetime(_, _)) {
        return EnumColumnKind::Date;
    }
    if !dtype.is_numeric() {
        return EnumColumnKind::Text;
    }
    if write_options.infer_integer_cols && dtype.is_integer() {
        EnumColumnKind::Integer
    } else {
        EnumColumnKind::Numeric
    }
}

fn derive_temporal_num_format(dtype: &DataType) -> Option<&'static str> {
    match dtype {
        DataType::Date => Some(C_NUM_FORMAT_DATE_DEFAULT),
        DataType::Datetime(_, _) => Some(C_NUM_FORMAT_DATETIME_DEFAULT),
        _ => None,
    }
}

fn validate_policy_autofit(policy_autofit: &SpecAutofitCellsPolicy) -> XlsxWriteResult<()> {
    if policy_autofit.width_cell_min == 0 {
        return Err(XlsxWriteError::InvalidInput(
            "policy_autofit.width_cell_min must be >= 1.".to_string(),
        ));
    }
    if policy_autofit.width_cell_max < policy_autofit.width_cell_min {
        return Err(XlsxWriteError::InvalidInput(
            "policy_autofit.width_cell_max must be >= policy_autofit.width_cell_min.".to_string(),
        ));
    }
    Ok(())
}

fn derive_string_grid_from_dataframe(df: &DataFrame) -> XlsxWriteResult<Vec<Vec<String>>> {
    let n_height = df.height();
    let n_width = df.width();
    let l_cols = df.get_columns();

    let mut l_grid = vec![vec![String::new(); n_width]; n_height];
    for (idx_row, val_row) in l_grid.iter_mut().enumerate() {
        for (idx_col, val_cell) in val_row.iter_mut().enumerate() {
            *val_cell = derive_header_text_from_any_value(l_cols[idx_col].get(idx_row)?);
        }
    }

    Ok(l_grid)
}

fn derive_header_text_from_any_value(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::String(val) => val.to_string(),
        AnyValue::StringOwned(val) => val.to_string(),
        _ => value.to_string(),
    }
}

fn derive_cell_value_from_any_value(value: AnyValue<'_>) -> EnumCellValue {
    match value {
        AnyValue::Null => EnumCellValue::None,
        AnyValue::String(val) => EnumCellValue::String(val.to_string()),
        AnyValue::StringOwned(val) => EnumCellValue::String(val.to_string()),
        AnyValue::Boolean(val) => {
            EnumCellValue::String(if val { "True" } else { "False" }.to_string())
        }
        AnyValue::UInt8(val) => EnumCellValue::Number(val as f64),
        AnyValue::UInt16(val) => EnumCellValue::Number(val as f64),
        AnyValue::UInt32(val) => EnumCellValue::Number(val as f64),
        AnyValue::UInt64(val) => EnumCellValue::Number(val as f64),
        AnyValue::Int8(val) => EnumCellValue::Number(val as f64),
        AnyValue::Int16(val) => EnumCellValue::Number(val as f64),
        AnyValue::Int32(val) => EnumCellValue::Number(val as f64),
        AnyValue::Int64(val) => EnumCellValue::Number(val as f64),
        AnyValue::Float32(val) => EnumCellValue::Number(val as f64),
        AnyValue::Float64(val) => EnumCellValue::Number(val),
        AnyValue::Date(days) => EnumCellValue::Number(convert_unix_days_to_excel_serial(days as f64)),
        AnyValue::Datetime(val, unit, _) => {
            let n_units_per_day = match unit {
                TimeUnit::Nanoseconds => 86_400_000_000_000.0,
                TimeUnit::Microseconds => 86_400_000_000.0,
                TimeUnit::Milliseconds => 86_400_000.0,
            };
            EnumCellValue::Number(convert_unix_days_to_excel_serial(
                val as f64 / n_units_per_day,
            ))
        }
        _ => EnumCellValue::String(value.to_string()),
    }
}

fn write_header(
    worksheet: &mut Worksheet,
    mut header_grid: Vec<Vec<String>>,
    if_merge: bool,
    fmt_header: &Format,
) -> XlsxWriteResult<()> {
    let mut dict_horizontal_merges_by_row = BTreeMap::new();
    if if_merge {
        apply_vertical_run_text_blankout(&mut header_grid);
        dict_horizontal_merges_by_row = plan_horizontal_merges(&header_grid);
    }
    let set_merged_cells = derive_horizontal_merge_tracker(&dict_horizontal_merges_by_row);

    for (row_idx, row_values) in header_grid.iter().enumerate() {
        for (col_idx, cell_value) in row_values.iter().enumerate() {
            if set_merged_cells.contains(&(row_idx, col_idx)) {
                continue;
            }

            if cell_value.is_empty() {
                worksheet.write_blank(cast_row_num(row_idx)?, cast_col_num(col_idx)?, fmt_header)?;
            } else {
                worksheet.write_string_with_format(
                    cast_row_num(row_idx)?,
                    cast_col_num(col_idx)?,
                    cell_value,
                    fmt_header,
                )?;
            }
        }

        if let Some(l_merges) = dict_horizontal_merges_by_row.get(&row_idx) {
            for merge in l_merges {
                worksheet.merge_range(
                    cast_row_num(row_idx)?,
                    cast_col_num(merge.col_idx_start)?,
                    cast_row_num(row_idx)?,
                    cast_col_num(merge.col_idx_end)?,
                    &merge.text,
                    fmt_header,
                )?;
            }
        }
    }

    Ok(())
}

fn write_cell_with_format(
    worksheet: &mut Worksheet,
    row_idx: usize,
    col_idx: usize,
    value: &EnumCellValue,
    format: &Format,
) -> XlsxWriteResult<()> {
    let (n_row, n_col) = (cast_row_num(row_idx)?, cast_col_num(col_idx)?);
    match value {
        EnumCellValue::None => {
            worksheet.write_blank(n_row, n_col, format)?;
        }
        EnumCellValue::String(val) => {
            worksheet.write_string_with_format(n_row, n_col, val, format)?;
        }
        EnumCellValue::Number(val) => {
            worksheet.write_number_with_format(n_row, n_col, *val, format)?;
        }
    }
    Ok(())
}

fn derive_rust_xlsx_format(spec: &SpecCellFormat) -> Format {
    let mut format = Format::new();

    if let Some(val) = &spec.font_name {
        format = format.set_font_name(val.clone());
    }
    if let Some(val) = spec.font_size {
        format = format.set_font_size(val as f64);
    }
    if spec.bold.unwrap_or(false) {
        format = format.set_bold();
    }
    if spec.italic.unwrap_or(false) {
        format = format.set_italic();
    }

    if let Some(val) = &spec.align
        && let Some(align) = derive_format_align(val)
    {
        format = format.set_align(align);
    }
    if let Some(val) = &spec.valign
        && let Some(align) = derive_format_align(val)
    {
        format = format.set_align(align);
    }

    if let Some(val) = &spec.num_format {
        format = format.set_num_format(val.clone());
    }
    if let Some(val) = &spec.bg_color {
        format = format.set_background_color(val.as_str());
    }
    if let Some(val) = &spec.font_color {
        format = format.set_font_color(val.as_str());
    }

    if let Some(val) = spec.border {
        format = format.set_border(derive_format_border(val));
    }

    if spec.text_wrap.unwrap_or(false) {
        format = format.set_text_wrap();
    }

    format
}

fn derive_format_border(border: i64) -> FormatBorder {
    match border {
        1 => FormatBorder::Thin,
        2 => FormatBorder::Medium,
        3 => FormatBorder::Dashed,
        4 => FormatBorder::Dotted,
        5 => FormatBorder::Thick,
        6 => FormatBorder::Double,
        7 => FormatBorder::Hair,
        _ => FormatBorder::None,
    }
}

fn derive_format_align(align: &str) -> Option<FormatAlign> {
    let value = align.trim().to_ascii_lowercase();
    match value.as_str() {
        "general" => Some(FormatAlign::General),
        "left" => Some(FormatAlign::Left),
        "center" => Some(FormatAlign::Center),
        "right" => Some(FormatAlign::Right),
        "fill" => Some(FormatAlign::Fill),
        "justify" => Some(FormatAlign::Justify),
        "center_across" => Some(FormatAlign::CenterAcross),
        "top" => Some(FormatAlign::Top),
        "bottom" => Some(FormatAlign::Bottom),
        "vcenter" | "vertical_center" => Some(FormatAlign::VerticalCenter),
        _ => None,
    }
}

fn cast_row_num(value: usize) -> XlsxWriteResult<u32> {
    u32::try_from(value)
        .map_err(|_| XlsxWriteError::ExceedsExcelLimit(format!("row index overflow: {value}")))
}

fn cast_col_num(value: usize) -> XlsxWriteResult<u16> {
    u16::try_from(value)
        .map_err(|_| XlsxWriteError::ExceedsExcelLimit(format!("column index overflow: {value}")))
}
