//! `framekit_io_xlsx` v1:
//! DataFrame to XLSX export with per-column number formats.
//!
//! Modules:
//! - `conf`   : constants, format enumeration and default presets
//! - `spec`   : specs/models/options
//! - `error`  : error type
//! - `util`   : pure helper functions
//! - `writer` : workbook writer kernel
//! - `export` : one-call export entry points
pub mod conf;
pub mod error;
pub mod export;
pub mod spec;
pub mod util;
pub mod writer;

pub use conf::{
    C_FILE_EXTENSION_XLSX, C_SHEET_NAME_DEFAULT, EnumNumFormat, N_LEN_EXCEL_SHEET_NAME_MAX,
    N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX,
};
pub use error::{XlsxWriteError, XlsxWriteResult};
pub use export::{apply_format_and_export, apply_format_and_export_with_options, derive_xlsx_path};
pub use spec::{
    EnumAutofitColumnsRule, EnumColumnKind, EnumIntegerCoerceMode, SpecAutofitCellsPolicy,
    SpecCellFormat, SpecColumnFormatAssignment, SpecColumnFormatPlan, SpecFormatCatalog,
    SpecResolvedFormat, SpecXlsxReport, SpecXlsxValuePolicy, SpecXlsxWriteOptions,
};
pub use util::{convert_date_str_to_excel_serial, sanitize_sheet_name};
pub use writer::{SpecXlsxSheetWriteOptions, XlsxWriter};
