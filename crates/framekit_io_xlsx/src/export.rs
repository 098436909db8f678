//! One-call export: table plus column formats to `<file_name>.xlsx`.

use std::path::PathBuf;

use polars::prelude::DataFrame;
use tracing::info;

use crate::conf::{C_FILE_EXTENSION_XLSX, C_SHEET_NAME_DEFAULT};
use crate::error::{XlsxWriteError, XlsxWriteResult};
use crate::spec::SpecColumnFormatAssignment;
use crate::writer::{SpecXlsxSheetWriteOptions, XlsxWriter};

/// Export `df` to `<file_name>.xlsx` (sheet `Sheet1`) with default options.
///
/// See [`apply_format_and_export_with_options`].
pub fn apply_format_and_export(
    df: &DataFrame,
    file_name: &str,
    column_formats: &SpecColumnFormatAssignment,
) -> XlsxWriteResult<PathBuf> {
    apply_format_and_export_with_options(
        df,
        file_name,
        column_formats,
        &SpecXlsxSheetWriteOptions::default(),
    )
}

/// Export `df` to `<file_name>.xlsx`, applying catalog number formats per column.
///
/// The row index is written as the first column. Entries naming absent columns
/// are ignored. Unknown logical format names of present columns fail before
/// the destination is touched; an existing file is overwritten.
pub fn apply_format_and_export_with_options(
    df: &DataFrame,
    file_name: &str,
    column_formats: &SpecColumnFormatAssignment,
    options: &SpecXlsxSheetWriteOptions,
) -> XlsxWriteResult<PathBuf> {
    if file_name.trim().is_empty() {
        return Err(XlsxWriteError::InvalidInput(
            "file_name must not be empty.".to_string(),
        ));
    }
    let l_colnames_data: Vec<&str> = df
        .get_column_names_str()
        .into_iter()
        .filter(|c_name| options.col_index.as_deref() != Some(*c_name))
        .collect();
    column_formats.resolve(&options.catalog, &l_colnames_data)?;

    let path_file_out = derive_xlsx_path(file_name);
    let mut writer = XlsxWriter::with_defaults(path_file_out.clone())?;
    writer.write_sheet(df, C_SHEET_NAME_DEFAULT, None, column_formats, options)?;
    writer.close()?;

    info!(
        path = %path_file_out.display(),
        rows = df.height(),
        "DataFrame exported and formatted to {}",
        path_file_out.display()
    );
    Ok(path_file_out)
}

/// Destination path for an export base name.
pub fn derive_xlsx_path(file_name: &str) -> PathBuf {
    PathBuf::from(format!("{file_name}.{C_FILE_EXTENSION_XLSX}"))
}
