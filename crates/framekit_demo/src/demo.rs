//! Demonstration fixtures and scenario runners.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, NaiveDate};
use framekit_io_xlsx::{
    SpecColumnFormatAssignment, SpecXlsxSheetWriteOptions, XlsxWriter, apply_format_and_export,
};
use framekit_reshape::{
    EnumMissingColumnPolicy, SpecGroupRelation, SpecReshapeOptions, SpecReshapeReport,
    reshape_hierarchical,
};
use polars::prelude::{Column, DataFrame, DataType, NamedFrom, Series};
use tracing::info;

////////////////////////////////////////////////////////////////////////////////
// #region Fixtures

/// Four months of sales: revenue, discount rate, sale date.
pub fn derive_sales_frame() -> Result<DataFrame> {
    let date_epoch = DateTime::UNIX_EPOCH.date_naive();
    let mut l_days: Vec<i32> = Vec::with_capacity(4);
    for n_month in 1..=4 {
        let date = NaiveDate::from_ymd_opt(2021, n_month, 1)
            .ok_or_else(|| anyhow!("invalid fixture date 2021-{n_month:02}-01"))?;
        l_days.push(i32::try_from(date.signed_duration_since(date_epoch).num_days())?);
    }
    let sale_date = Series::new("Sale Date".into(), l_days).cast(&DataType::Date)?;

    Ok(DataFrame::new(vec![
        Column::new("Revenue".into(), &[1000i64, 1500, 800, 1200]),
        Column::new("Discount".into(), &[0.1f64, 0.15, 0.2, 0.05]),
        Column::from(sale_date),
    ])?)
}

pub fn derive_sales_formats() -> SpecColumnFormatAssignment {
    SpecColumnFormatAssignment::new()
        .with("Revenue", "monetary")
        .with("Discount", "percentage")
        .with("Sale Date", "date")
}

/// Ten rows over `Coluna1..Coluna3`.
pub fn derive_coluna_frame() -> Result<DataFrame> {
    Ok(DataFrame::new(vec![
        Column::new("Coluna1".into(), (1i64..=10).collect::<Vec<_>>()),
        Column::new("Coluna2".into(), (11i64..=20).collect::<Vec<_>>()),
        Column::new("Coluna3".into(), (21i64..=30).collect::<Vec<_>>()),
    ])?)
}

/// Group relation with one column absent from [`derive_coluna_frame`].
pub fn derive_tema_relation() -> SpecGroupRelation {
    SpecGroupRelation::new()
        .with("Tema 1", "Coluna1")
        .with("Tema 1", "Coluna2")
        .with("Tema 2", "Coluna3")
        .with("Tema 1", "Coluna4")
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Scenarios

/// Export the sales fixture to `<dir_out>/sales_report.xlsx`.
pub fn run_sales_report(dir_out: &Path) -> Result<PathBuf> {
    let file_name = dir_out.join("sales_report");
    let file_name = file_name
        .to_str()
        .ok_or_else(|| anyhow!("output path is not valid UTF-8: {}", file_name.display()))?;

    apply_format_and_export(&derive_sales_frame()?, file_name, &derive_sales_formats())
        .context("Failed to export sales report")
}

#[derive(Debug)]
pub struct GroupedReportOutcome {
    pub df_flat: DataFrame,
    pub report: SpecReshapeReport,
    pub path_out: PathBuf,
}

/// Reshape the `Coluna` fixture and write it with a merged two-row header to
/// `<dir_out>/grouped_report.xlsx`.
pub fn run_grouped_report(
    dir_out: &Path,
    rule_missing: EnumMissingColumnPolicy,
) -> Result<GroupedReportOutcome> {
    let options = SpecReshapeOptions {
        rule_missing,
        ..Default::default()
    };
    let (frame, report) =
        reshape_hierarchical(&derive_coluna_frame()?, &derive_tema_relation(), &options)
            .context("Failed to reshape table")?;

    let df_flat = frame.to_flat_dataframe(true)?;
    let df_header = frame.to_header_dataframe()?;
    let c_index = frame.index().name().to_string();

    let column_formats: SpecColumnFormatAssignment = frame
        .derive_flat_names()
        .into_iter()
        .zip(frame.columns())
        .filter(|(_, col)| col.dtype() != &DataType::Null)
        .map(|(c_flat, _)| (c_flat, "integer".to_string()))
        .collect();

    let path_out = dir_out.join("grouped_report.xlsx");
    let mut writer = XlsxWriter::with_defaults(path_out.clone())?;
    writer.write_sheet(
        &df_flat,
        "Grouped",
        Some(&df_header),
        &column_formats,
        &SpecXlsxSheetWriteOptions {
            col_index: Some(c_index),
            if_merge_header: true,
            ..Default::default()
        },
    )?;
    writer
        .close()
        .with_context(|| format!("Failed to write {}", path_out.display()))?;

    info!(path = %path_out.display(), groups = frame.groups().len(), "grouped report written");
    Ok(GroupedReportOutcome {
        df_flat,
        report,
        path_out,
    })
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
