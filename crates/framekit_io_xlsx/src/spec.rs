//! Shared XLSX specification models.

use std::collections::{BTreeMap, BTreeSet};

use crate::conf::EnumNumFormat;
use crate::error::XlsxWriteResult;

////////////////////////////////////////////////////////////////////////////////
// #region CellFormatSpecification

/// Cell format specification; `None` fields inherit from the layer below.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SpecCellFormat {
    /// Font family name.
    pub font_name: Option<String>,
    /// Font size in points.
    pub font_size: Option<i64>,
    /// Bold style.
    pub bold: Option<bool>,
    /// Italic style.
    pub italic: Option<bool>,

    /// Horizontal alignment.
    pub align: Option<String>,
    /// Vertical alignment.
    pub valign: Option<String>,
    /// Border style for all sides.
    pub border: Option<i64>,
    /// Text wrap.
    pub text_wrap: Option<bool>,

    /// Number format code.
    pub num_format: Option<String>,
    /// Background fill color.
    pub bg_color: Option<String>,
    /// Font color.
    pub font_color: Option<String>,
}

/// Normalized cell value during conversion/write pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum EnumCellValue {
    /// Missing/blank value.
    None,
    /// Text value.
    String(String),
    /// Numeric value (temporal values are already Excel serials).
    Number(f64),
}

impl SpecCellFormat {
    /// Return a new format by overlaying `patch` onto `self`.
    pub fn with_(&self, patch: SpecCellFormat) -> SpecCellFormat {
        self.merge(&patch)
    }

    /// Merge two formats with right-side non-`None` overwrite semantics.
    pub fn merge(&self, other: &SpecCellFormat) -> SpecCellFormat {
        SpecCellFormat {
            font_name: other.font_name.clone().or_else(|| self.font_name.clone()),
            font_size: other.font_size.or(self.font_size),
            bold: other.bold.or(self.bold),
            italic: other.italic.or(self.italic),
            align: other.align.clone().or_else(|| self.align.clone()),
            valign: other.valign.clone().or_else(|| self.valign.clone()),
            border: other.border.or(self.border),
            text_wrap: other.text_wrap.or(self.text_wrap),
            num_format: other.num_format.clone().or_else(|| self.num_format.clone()),
            bg_color: other.bg_color.clone().or_else(|| self.bg_color.clone()),
            font_color: other.font_color.clone().or_else(|| self.font_color.clone()),
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region FormatCatalog

/// Mapping from logical format name to Excel number-format code.
///
/// The set of names is closed ([`EnumNumFormat`]); only the codes can be
/// overridden.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecFormatCatalog {
    dict_codes: BTreeMap<EnumNumFormat, String>,
}

impl Default for SpecFormatCatalog {
    fn default() -> Self {
        Self {
            dict_codes: EnumNumFormat::ALL
                .into_iter()
                .map(|fmt_key| (fmt_key, fmt_key.num_format_default().to_string()))
                .collect(),
        }
    }
}

impl SpecFormatCatalog {
    /// Return a catalog with the code of `fmt_key` replaced.
    pub fn with_code(mut self, fmt_key: EnumNumFormat, code: impl Into<String>) -> Self {
        self.dict_codes.insert(fmt_key, code.into());
        self
    }

    /// Number-format code for a catalog entry.
    pub fn code(&self, fmt_key: EnumNumFormat) -> &str {
        self.dict_codes
            .get(&fmt_key)
            .map(String::as_str)
            .unwrap_or_else(|| fmt_key.num_format_default())
    }

    /// Resolve a logical name; unknown names fail with `UnknownFormat`.
    pub fn resolve(&self, name: &str) -> XlsxWriteResult<SpecResolvedFormat> {
        let fmt_key: EnumNumFormat = name.parse()?;
        Ok(SpecResolvedFormat {
            fmt_key,
            num_format: self.code(fmt_key).to_string(),
        })
    }
}

/// Catalog entry resolved for one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecResolvedFormat {
    /// Logical format.
    pub fmt_key: EnumNumFormat,
    /// Excel number-format code.
    pub num_format: String,
}

/// Column name to logical format name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecColumnFormatAssignment {
    dict_fmt_by_col: BTreeMap<String, String>,
}

impl SpecColumnFormatAssignment {
    /// Empty assignment; every column keeps default display.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, col_name: impl Into<String>, fmt_name: impl Into<String>) -> Self {
        self.insert(col_name, fmt_name);
        self
    }

    /// Assign `fmt_name` to `col_name`, replacing a previous entry.
    pub fn insert(&mut self, col_name: impl Into<String>, fmt_name: impl Into<String>) {
        self.dict_fmt_by_col.insert(col_name.into(), fmt_name.into());
    }

    /// Logical format name assigned to `col_name`.
    pub fn get(&self, col_name: &str) -> Option<&str> {
        self.dict_fmt_by_col.get(col_name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.dict_fmt_by_col.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dict_fmt_by_col.is_empty()
    }

    /// Iterate `(column, logical name)` pairs sorted by column name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.dict_fmt_by_col
            .iter()
            .map(|(col, fmt)| (col.as_str(), fmt.as_str()))
    }

    /// Resolve the entries of columns listed in `colnames` through `catalog`.
    ///
    /// Entries for other columns are skipped, so their logical names are never
    /// looked up. Fails on the first unknown name of a listed column.
    pub fn resolve<S: AsRef<str>>(
        &self,
        catalog: &SpecFormatCatalog,
        colnames: &[S],
    ) -> XlsxWriteResult<BTreeMap<String, SpecResolvedFormat>> {
        let set_colnames: BTreeSet<&str> = colnames.iter().map(AsRef::as_ref).collect();
        self.dict_fmt_by_col
            .iter()
            .filter(|(col, _)| set_colnames.contains(col.as_str()))
            .map(|(col, fmt)| Ok((col.clone(), catalog.resolve(fmt)?)))
            .collect()
    }
}

impl<C, F> FromIterator<(C, F)> for SpecColumnFormatAssignment
where
    C: Into<String>,
    F: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (C, F)>>(iter: I) -> Self {
        let mut assignment = Self::new();
        for (col_name, fmt_name) in iter {
            assignment.insert(col_name, fmt_name);
        }
        assignment
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ColumnFormatSpecification

/// How body values of one column are normalized before writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnumColumnKind {
    /// Values written as text.
    #[default]
    Text,
    /// Values written as numbers where possible.
    Numeric,
    /// Numeric, with integer normalization.
    Integer,
    /// Numeric, with ISO date strings parsed into serials.
    Date,
}

/// Planned formats and value kinds by data column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecColumnFormatPlan {
    /// Final format applied at write time.
    pub fmts_by_col: Vec<SpecCellFormat>,
    /// Value normalization kind.
    pub kinds_by_col: Vec<EnumColumnKind>,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region WriteOptions

/// Integer conversion policy for numeric-looking values in integer columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnumIntegerCoerceMode {
    /// Truncate numeric values to integer representation.
    Coerce,
    /// Keep non-integer numeric values as text in integer columns.
    #[default]
    Strict,
}

/// Value conversion policy for missing/NaN/Inf and integer coercion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecXlsxValuePolicy {
    /// Replacement text for missing value when keep-missing is enabled.
    pub missing_value_str: String,
    /// Replacement text for NaN.
    pub nan_str: String,
    /// Replacement text for positive infinity.
    pub posinf_str: String,
    /// Replacement text for negative infinity.
    pub neginf_str: String,
    /// Integer conversion mode.
    pub integer_coerce: EnumIntegerCoerceMode,
}

impl Default for SpecXlsxValuePolicy {
    fn default() -> Self {
        Self {
            missing_value_str: "NA".to_string(),
            nan_str: "NaN".to_string(),
            posinf_str: "Inf".to_string(),
            neginf_str: "-Inf".to_string(),
            integer_coerce: EnumIntegerCoerceMode::Strict,
        }
    }
}

/// Autofit rule for column width inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnumAutofitColumnsRule {
    /// Disable autofit.
    None,
    /// Infer width from header cells only (default).
    #[default]
    Header,
    /// Infer width from body cells only.
    Body,
    /// Infer width from both header and body cells.
    All,
}

/// Autofit policy for per-sheet write call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecAutofitCellsPolicy {
    /// Autofit width inference rule.
    pub rule_columns: EnumAutofitColumnsRule,
    /// Max body rows inspected when body-based inference is active.
    pub height_body_inferred_max: Option<usize>,
    /// Minimum final width.
    pub width_cell_min: usize,
    /// Maximum final width.
    pub width_cell_max: usize,
    /// Width padding added after inference.
    pub width_cell_padding: usize,
}

impl Default for SpecAutofitCellsPolicy {
    fn default() -> Self {
        Self {
            rule_columns: EnumAutofitColumnsRule::Header,
            height_body_inferred_max: Some(20_000),
            width_cell_min: 8,
            width_cell_max: 60,
            width_cell_padding: 2,
        }
    }
}

/// Writer-wide options controlling value conversion and formatting defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecXlsxWriteOptions {
    /// Value conversion policy.
    pub value_policy: SpecXlsxValuePolicy,
    /// Keep missing/NaN/Inf as text instead of blank.
    pub keep_missing_values: bool,
    /// Treat numeric and temporal dtypes as numeric columns.
    pub infer_numeric_cols: bool,
    /// Treat integer dtypes as integer columns.
    pub infer_integer_cols: bool,
    /// Base patch merged into all body column formats.
    pub base_format_patch: SpecCellFormat,
}

impl Default for SpecXlsxWriteOptions {
    fn default() -> Self {
        Self {
            value_policy: SpecXlsxValuePolicy::default(),
            keep_missing_values: false,
            infer_numeric_cols: true,
            infer_integer_cols: true,
            base_format_patch: SpecCellFormat::default(),
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region SheetFormatSpecification

/// Horizontal merge plan item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecSheetHorizontalMerge {
    /// Row index where merge is applied.
    pub row_idx_start: usize,
    /// Start column index (inclusive).
    pub col_idx_start: usize,
    /// End column index (inclusive).
    pub col_idx_end: usize,
    /// Merge display text.
    pub text: String,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ReportSpecification

/// Per-write call report.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecXlsxReport {
    /// Actual sheet name in the workbook.
    pub sheet_name: String,
    /// Header rows written above the body.
    pub height_header: usize,
    /// Body rows written.
    pub height_body: usize,
    /// Data columns written (index column excluded).
    pub width_data: usize,
    /// Columns that received a catalog number format, in sheet order.
    pub cols_formatted: Vec<(String, EnumNumFormat)>,
    /// Non-fatal warnings.
    pub warnings: Vec<String>,
}

impl SpecXlsxReport {
    /// Add a warning message.
    pub fn warn(&mut self, msg: impl AsRef<str>) {
        self.warnings.push(msg.as_ref().to_string());
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
