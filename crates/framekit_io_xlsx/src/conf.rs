//! XLSX constants, the logical number-format enumeration, and default presets.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::XlsxWriteError;
use crate::spec::SpecCellFormat;

/// Excel worksheet maximum row count.
pub const N_NROWS_EXCEL_MAX: usize = 1_048_576;
/// Excel worksheet maximum column count.
pub const N_NCOLS_EXCEL_MAX: usize = 16_384;
/// Excel sheet name maximum length.
pub const N_LEN_EXCEL_SHEET_NAME_MAX: usize = 31;
/// Characters not allowed in sheet names.
pub const TUP_EXCEL_ILLEGAL: [&str; 7] = ["*", ":", "?", "/", "\\", "[", "]"];
/// Sheet name used by single-sheet exports.
pub const C_SHEET_NAME_DEFAULT: &str = "Sheet1";
/// File extension appended to export base names.
pub const C_FILE_EXTENSION_XLSX: &str = "xlsx";
/// Number format for unassigned `Date` columns.
pub const C_NUM_FORMAT_DATE_DEFAULT: &str = "yyyy-mm-dd";
/// Number format for unassigned `Datetime` columns.
pub const C_NUM_FORMAT_DATETIME_DEFAULT: &str = "yyyy-mm-dd hh:mm:ss";
/// Days between the Excel epoch (1899-12-30) and the Unix epoch.
pub const N_EXCEL_EPOCH_OFFSET_DAYS: i64 = 25_569;

/// Logical format names understood by the format catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EnumNumFormat {
    /// Currency with thousands separator and two decimals.
    Monetary,
    /// Percentage with two decimals.
    Percentage,
    /// Calendar date (month/day/year).
    Date,
    /// Whole number.
    Integer,
    /// Two-decimal number.
    Float,
    /// Literal text; numbers are not interpreted.
    Text,
}

impl EnumNumFormat {
    /// Every catalog entry in declaration order.
    pub const ALL: [EnumNumFormat; 6] = [
        EnumNumFormat::Monetary,
        EnumNumFormat::Percentage,
        EnumNumFormat::Date,
        EnumNumFormat::Integer,
        EnumNumFormat::Float,
        EnumNumFormat::Text,
    ];

    /// Logical name as used in column-format assignments.
    pub fn as_str(&self) -> &'static str {
        match self {
            EnumNumFormat::Monetary => "monetary",
            EnumNumFormat::Percentage => "percentage",
            EnumNumFormat::Date => "date",
            EnumNumFormat::Integer => "integer",
            EnumNumFormat::Float => "float",
            EnumNumFormat::Text => "text",
        }
    }

    /// Built-in Excel number-format code.
    pub fn num_format_default(&self) -> &'static str {
        match self {
            EnumNumFormat::Monetary => "$#,##0.00",
            EnumNumFormat::Percentage => "0.00%",
            EnumNumFormat::Date => "mm/dd/yyyy",
            EnumNumFormat::Integer => "0",
            EnumNumFormat::Float => "0.00",
            EnumNumFormat::Text => "@",
        }
    }
}

impl fmt::Display for EnumNumFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnumNumFormat {
    type Err = XlsxWriteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EnumNumFormat::ALL
            .into_iter()
            .find(|fmt_key| fmt_key.as_str() == s)
            .ok_or_else(|| XlsxWriteError::UnknownFormat {
                name: s.to_string(),
            })
    }
}

/// Build default named format presets used by [`crate::writer::XlsxWriter`].
///
/// Keys: `text` (body cells), `index` (row index column), `header`.
pub fn derive_default_xlsx_formats() -> BTreeMap<String, SpecCellFormat> {
    let cfg_label_fmt_spec = SpecCellFormat {
        bold: Some(true),
        border: Some(1),
        valign: Some("top".to_string()),
        ..Default::default()
    };

    let mut dict_fmt = BTreeMap::new();
    dict_fmt.insert("text".to_string(), SpecCellFormat::default());
    dict_fmt.insert("index".to_string(), cfg_label_fmt_spec.clone());
    dict_fmt.insert(
        "header".to_string(),
        cfg_label_fmt_spec.with_(SpecCellFormat {
            align: Some("center".to_string()),
            ..Default::default()
        }),
    );

    dict_fmt
}
