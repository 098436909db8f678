//! Export tests that read written workbooks back with calamine.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use calamine::{Data, Range, Reader as _, Xlsx, open_workbook};
use framekit_io_xlsx::{
    EnumNumFormat, SpecColumnFormatAssignment, SpecXlsxSheetWriteOptions, XlsxWriteError,
    XlsxWriter, apply_format_and_export, apply_format_and_export_with_options,
};
use polars::prelude::{Column, DataFrame, DataType, NamedFrom, Series};
use pretty_assertions::assert_eq;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tempfile::TempDir;

fn derive_sales_frame() -> DataFrame {
    let sale_date = Column::from(
        Series::new("Sale Date".into(), &[18628i32, 18659, 18687, 18718])
            .cast(&DataType::Date)
            .unwrap(),
    );
    DataFrame::new(vec![
        Column::new("Revenue".into(), &[1000i64, 1500, 800, 1200]),
        Column::new("Discount".into(), &[0.1f64, 0.15, 0.2, 0.05]),
        sale_date,
    ])
    .unwrap()
}

fn derive_sales_formats() -> SpecColumnFormatAssignment {
    SpecColumnFormatAssignment::new()
        .with("Revenue", "monetary")
        .with("Discount", "percentage")
        .with("Sale Date", "date")
}

fn read_sheet(path: &Path, sheet_name: &str) -> Range<Data> {
    let mut workbook: Xlsx<_> = open_workbook(path).unwrap();
    workbook.worksheet_range(sheet_name).unwrap()
}

fn cell(range: &Range<Data>, row: u32, col: u32) -> Data {
    range.get_value((row, col)).cloned().unwrap_or(Data::Empty)
}

fn cell_f64(range: &Range<Data>, row: u32, col: u32) -> Option<f64> {
    match cell(range, row, col) {
        Data::Float(val) => Some(val),
        Data::Int(val) => Some(val as f64),
        Data::DateTime(val) => Some(val.as_f64()),
        _ => None,
    }
}

fn read_zip_entry(path: &Path, name: &str) -> String {
    let file = std::fs::File::open(path).unwrap();
    let mut archive = zip::ZipArchive::new(file).unwrap();
    let mut xml = String::new();
    archive
        .by_name(name)
        .unwrap()
        .read_to_string(&mut xml)
        .unwrap();
    xml
}

fn read_attr(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .and_then(|attr| attr.unescape_value().ok().map(|val| val.to_string()))
}

/// Number-format code of every cell in sheet row `row` (1-based), by column letter.
fn read_row_num_formats(path: &Path, row: u32) -> BTreeMap<String, String> {
    let mut dict_code_by_id: BTreeMap<u32, String> = [
        (0, "General"),
        (1, "0"),
        (2, "0.00"),
        (3, "#,##0"),
        (4, "#,##0.00"),
        (9, "0%"),
        (10, "0.00%"),
        (49, "@"),
    ]
    .into_iter()
    .map(|(id, code)| (id, code.to_string()))
    .collect();
    let mut l_fmt_id_by_xf: Vec<u32> = Vec::new();

    let xml_styles = read_zip_entry(path, "xl/styles.xml");
    let mut reader = Reader::from_str(&xml_styles);
    reader.trim_text(true);
    let mut if_in_cell_xfs = false;
    loop {
        match reader.read_event().unwrap() {
            Event::Start(e) | Event::Empty(e) => match e.name().as_ref() {
                b"numFmt" => {
                    let id: u32 = read_attr(&e, b"numFmtId").unwrap().parse().unwrap();
                    dict_code_by_id.insert(id, read_attr(&e, b"formatCode").unwrap());
                }
                b"cellXfs" => if_in_cell_xfs = true,
                b"xf" if if_in_cell_xfs => l_fmt_id_by_xf
                    .push(read_attr(&e, b"numFmtId").map_or(0, |val| val.parse().unwrap())),
                _ => {}
            },
            Event::End(e) if e.name().as_ref() == b"cellXfs" => if_in_cell_xfs = false,
            Event::Eof => break,
            _ => {}
        }
    }

    let xml_sheet = read_zip_entry(path, "xl/worksheets/sheet1.xml");
    let mut reader = Reader::from_str(&xml_sheet);
    reader.trim_text(true);
    let c_row = row.to_string();
    let mut dict_code_by_col = BTreeMap::new();
    loop {
        match reader.read_event().unwrap() {
            Event::Start(e) | Event::Empty(e) if e.name().as_ref() == b"c" => {
                let c_ref = read_attr(&e, b"r").unwrap();
                let n_split = c_ref.find(|ch: char| ch.is_ascii_digit()).unwrap();
                let (c_col, c_row_cell) = c_ref.split_at(n_split);
                if c_row_cell == c_row {
                    let n_xf: usize = read_attr(&e, b"s").map_or(0, |val| val.parse().unwrap());
                    let code = dict_code_by_id
                        .get(&l_fmt_id_by_xf[n_xf])
                        .cloned()
                        .unwrap_or_default();
                    dict_code_by_col.insert(c_col.to_string(), code);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    dict_code_by_col
}

#[test]
fn test_sales_report_export_keeps_shape_and_order() {
    let dir = TempDir::new().unwrap();
    let file_name = dir.path().join("sales_report");

    let path = apply_format_and_export(
        &derive_sales_frame(),
        file_name.to_str().unwrap(),
        &derive_sales_formats(),
    )
    .unwrap();

    assert_eq!(path, dir.path().join("sales_report.xlsx"));
    assert!(path.exists());

    let range = read_sheet(&path, "Sheet1");
    assert_eq!(range.height(), 4 + 1);
    assert_eq!(range.width(), 1 + 3);

    assert_eq!(cell(&range, 0, 0), Data::Empty);
    assert_eq!(cell(&range, 0, 1), Data::String("Revenue".to_string()));
    assert_eq!(cell(&range, 0, 2), Data::String("Discount".to_string()));
    assert_eq!(cell(&range, 0, 3), Data::String("Sale Date".to_string()));

    assert_eq!(cell_f64(&range, 1, 0), Some(0.0));
    assert_eq!(cell_f64(&range, 4, 0), Some(3.0));
    assert_eq!(cell_f64(&range, 1, 1), Some(1000.0));
    assert_eq!(cell_f64(&range, 2, 2), Some(0.15));
}

#[test]
fn test_date_format_marks_cells_as_dates() {
    let dir = TempDir::new().unwrap();
    let file_name = dir.path().join("dates");

    let path = apply_format_and_export(
        &derive_sales_frame(),
        file_name.to_str().unwrap(),
        &derive_sales_formats(),
    )
    .unwrap();

    let range = read_sheet(&path, "Sheet1");
    assert!(matches!(cell(&range, 1, 3), Data::DateTime(_)));
    assert_eq!(cell_f64(&range, 1, 3), Some(44197.0));
    assert_eq!(cell_f64(&range, 4, 3), Some(44287.0));
}

#[test]
fn test_unknown_format_name_fails_without_writing() {
    let dir = TempDir::new().unwrap();
    let file_name = dir.path().join("broken");

    let err = apply_format_and_export(
        &derive_sales_frame(),
        file_name.to_str().unwrap(),
        &SpecColumnFormatAssignment::new().with("Revenue", "currency"),
    )
    .unwrap_err();

    assert!(matches!(err, XlsxWriteError::UnknownFormat { ref name } if name == "currency"));
    assert!(!dir.path().join("broken.xlsx").exists());
}

#[test]
fn test_text_format_writes_literal_strings() {
    let dir = TempDir::new().unwrap();
    let file_name = dir.path().join("text");

    let path = apply_format_and_export(
        &derive_sales_frame(),
        file_name.to_str().unwrap(),
        &SpecColumnFormatAssignment::new().with("Revenue", "text"),
    )
    .unwrap();

    let range = read_sheet(&path, "Sheet1");
    assert_eq!(cell(&range, 1, 1), Data::String("1000".to_string()));
    assert_eq!(cell_f64(&range, 1, 2), Some(0.1));
}

#[test]
fn test_export_overwrites_existing_file() {
    let dir = TempDir::new().unwrap();
    let file_name = dir.path().join("again");
    std::fs::write(dir.path().join("again.xlsx"), b"not a workbook").unwrap();

    let path = apply_format_and_export(
        &derive_sales_frame(),
        file_name.to_str().unwrap(),
        &derive_sales_formats(),
    )
    .unwrap();

    assert_eq!(read_sheet(&path, "Sheet1").height(), 5);
}

#[test]
fn test_zero_row_table_writes_header_only() {
    let dir = TempDir::new().unwrap();
    let file_name = dir.path().join("empty");
    let df = derive_sales_frame().head(Some(0));

    let path = apply_format_and_export(&df, file_name.to_str().unwrap(), &derive_sales_formats())
        .unwrap();

    let range = read_sheet(&path, "Sheet1");
    assert_eq!(range.height(), 1);
    assert_eq!(cell(&range, 0, 3), Data::String("Sale Date".to_string()));
}

#[test]
fn test_named_index_column_is_written_first() {
    let dir = TempDir::new().unwrap();
    let file_name = dir.path().join("indexed");
    let df = DataFrame::new(vec![
        Column::new("Amount".into(), &[1.5f64, 2.5]),
        Column::new("Id".into(), &["a", "b"]),
    ])
    .unwrap();

    let path = apply_format_and_export_with_options(
        &df,
        file_name.to_str().unwrap(),
        &SpecColumnFormatAssignment::new().with("Amount", "float"),
        &SpecXlsxSheetWriteOptions {
            col_index: Some("Id".to_string()),
            ..Default::default()
        },
    )
    .unwrap();

    let range = read_sheet(&path, "Sheet1");
    assert_eq!(range.width(), 2);
    assert_eq!(cell(&range, 0, 0), Data::String("Id".to_string()));
    assert_eq!(cell(&range, 0, 1), Data::String("Amount".to_string()));
    assert_eq!(cell(&range, 2, 0), Data::String("b".to_string()));
    assert_eq!(cell_f64(&range, 2, 1), Some(2.5));
}

#[test]
fn test_two_row_header_merges_group_labels() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("grouped.xlsx");
    let df = DataFrame::new(vec![
        Column::new("a".into(), &[1i64, 2]),
        Column::new("b".into(), &[3i64, 4]),
        Column::new("c".into(), &[5i64, 6]),
    ])
    .unwrap();
    let df_header = DataFrame::new(vec![
        Column::new("a".into(), &["Tema 1", "Coluna1"]),
        Column::new("b".into(), &["Tema 1", "Coluna2"]),
        Column::new("c".into(), &["Tema 2", "Coluna3"]),
    ])
    .unwrap();

    let mut writer = XlsxWriter::with_defaults(path.clone()).unwrap();
    writer
        .write_sheet(
            &df,
            "Sheet1",
            Some(&df_header),
            &SpecColumnFormatAssignment::new().with("c", "integer"),
            &SpecXlsxSheetWriteOptions {
                if_merge_header: true,
                ..Default::default()
            },
        )
        .unwrap();
    writer.close().unwrap();

    let l_reports = writer.report();
    assert_eq!(l_reports[0].height_header, 2);
    assert_eq!(
        l_reports[0].cols_formatted,
        vec![("c".to_string(), EnumNumFormat::Integer)]
    );

    let range = read_sheet(&path, "Sheet1");
    assert_eq!(range.height(), 2 + 2);
    assert_eq!(cell(&range, 0, 1), Data::String("Tema 1".to_string()));
    assert_eq!(cell(&range, 0, 3), Data::String("Tema 2".to_string()));
    assert_eq!(cell(&range, 1, 2), Data::String("Coluna2".to_string()));
    assert_eq!(cell_f64(&range, 3, 3), Some(6.0));
}

#[test]
fn test_assigned_number_formats_reach_the_workbook() {
    let dir = TempDir::new().unwrap();
    let file_name = dir.path().join("styled");
    let mut df = derive_sales_frame();
    df.with_column(Column::new("Units".into(), &[3i64, 5, 2, 4]))
        .unwrap();
    df.with_column(Column::new("Ratio".into(), &[1.25f64, 0.5, 2.0, 0.75]))
        .unwrap();
    df.with_column(Column::new("Note".into(), &["a", "b", "c", "d"]))
        .unwrap();

    let path = apply_format_and_export(
        &df,
        file_name.to_str().unwrap(),
        &derive_sales_formats()
            .with("Units", "integer")
            .with("Ratio", "float")
            .with("Note", "text"),
    )
    .unwrap();

    let dict_code_by_col = read_row_num_formats(&path, 2);
    assert_eq!(dict_code_by_col["B"], "$#,##0.00");
    assert_eq!(dict_code_by_col["C"], "0.00%");
    assert_eq!(dict_code_by_col["D"], "mm/dd/yyyy");
    assert_eq!(dict_code_by_col["E"], "0");
    assert_eq!(dict_code_by_col["F"], "0.00");
    assert_eq!(dict_code_by_col["G"], "@");
}

#[test]
fn test_unknown_format_on_absent_column_is_ignored() {
    let dir = TempDir::new().unwrap();
    let file_name = dir.path().join("partial");
    let df = DataFrame::new(vec![Column::new(
        "Revenue".into(),
        &[1000i64, 1500],
    )])
    .unwrap();

    let path = apply_format_and_export(
        &df,
        file_name.to_str().unwrap(),
        &SpecColumnFormatAssignment::new()
            .with("Revenue", "monetary")
            .with("Margin", "bogus"),
    )
    .unwrap();

    assert!(path.exists());
    assert_eq!(read_row_num_formats(&path, 2)["B"], "$#,##0.00");
    assert_eq!(cell_f64(&read_sheet(&path, "Sheet1"), 2, 1), Some(1500.0));
}
