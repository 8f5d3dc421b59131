use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{
    Array, ArrayRef, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array,
    LargeStringArray, StringArray, UInt32Array,
};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;

use super::model::{LaunchRecord, LaunchTable};
use crate::error::DashError;

pub const COL_LAUNCH_SITE: &str = "Launch Site";
pub const COL_PAYLOAD_MASS: &str = "Payload Mass (kg)";
pub const COL_CLASS: &str = "class";
pub const COL_BOOSTER_CATEGORY: &str = "Booster Version Category";
pub const COL_FLIGHT_NUMBER: &str = "Flight Number";
pub const COL_BOOSTER_VERSION: &str = "Booster Version";

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a launch dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one launch per row (the canonical format)
/// * `.json`    – `[{ "Launch Site": "...", "class": 1, ... }, ...]`
/// * `.parquet` – flat columns with the same names as the CSV header
pub fn load_file(path: &Path) -> Result<LaunchTable, DashError> {
    load_any(path).map_err(|source| DashError::DataLoad {
        path: path.to_path_buf(),
        source,
    })
}

fn load_any(path: &Path) -> Result<LaunchTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => bail!("Unsupported file extension: .{other}"),
    };
    Ok(LaunchTable::from_records(records))
}

// ---------------------------------------------------------------------------
// Row shape shared by the CSV and JSON loaders
// ---------------------------------------------------------------------------

/// One row as it appears in the CSV header / JSON record keys. Unknown
/// columns (such as the pandas index) are ignored.
#[derive(Debug, Deserialize)]
struct RawLaunchRow {
    #[serde(rename = "Launch Site")]
    launch_site: String,
    #[serde(rename = "Payload Mass (kg)")]
    payload_mass_kg: f64,
    class: i64,
    #[serde(rename = "Booster Version Category")]
    booster_version_category: String,
    #[serde(rename = "Flight Number", default)]
    flight_number: Option<u32>,
    #[serde(rename = "Booster Version", default)]
    booster_version: Option<String>,
}

impl RawLaunchRow {
    fn into_record(self) -> Result<LaunchRecord> {
        Ok(LaunchRecord::new(
            self.launch_site,
            self.payload_mass_kg,
            self.class,
            self.booster_version_category,
        )?
        .with_flight_number(self.flight_number)
        .with_booster_version(self.booster_version.filter(|v| !v.is_empty())))
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<Vec<LaunchRecord>> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers = reader.headers().context("reading CSV headers")?.clone();

    for required in [COL_LAUNCH_SITE, COL_PAYLOAD_MASS, COL_CLASS, COL_BOOSTER_CATEGORY] {
        if !headers.iter().any(|h| h == required) {
            bail!("CSV missing '{required}' column");
        }
    }

    let mut records = Vec::new();
    for (row_no, result) in reader.deserialize::<RawLaunchRow>().enumerate() {
        let row = result.with_context(|| format!("CSV row {row_no}"))?;
        records.push(row.into_record().with_context(|| format!("CSV row {row_no}"))?);
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Launch Site": "CCAFS LC-40", "Payload Mass (kg)": 0.0, "class": 0,
///     "Booster Version Category": "v1.0" },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Vec<LaunchRecord>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let rows: Vec<serde_json::Value> = serde_json::from_str(&text).context("parsing JSON")?;

    rows.into_iter()
        .enumerate()
        .map(|(i, value)| {
            let row: RawLaunchRow =
                serde_json::from_value(value).with_context(|| format!("Row {i}"))?;
            row.into_record().with_context(|| format!("Row {i}"))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with flat launch columns.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`); numeric columns may be any of the
/// common int / float widths.
fn load_parquet(path: &Path) -> Result<Vec<LaunchRecord>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;

        let site_col = column(&batch, COL_LAUNCH_SITE)?;
        let payload_col = column(&batch, COL_PAYLOAD_MASS)?;
        let class_col = column(&batch, COL_CLASS)?;
        let category_col = column(&batch, COL_BOOSTER_CATEGORY)?;
        let flight_col = column(&batch, COL_FLIGHT_NUMBER).ok();
        let version_col = column(&batch, COL_BOOSTER_VERSION).ok();

        for row in 0..batch.num_rows() {
            let ctx = || format!("Row {}", records.len());
            let class = number_at(class_col, row)
                .with_context(|| format!("reading '{COL_CLASS}'"))
                .with_context(ctx)?;
            if class.fract() != 0.0 {
                bail!("{}: class must be an integer, got {class}", ctx());
            }
            let record = LaunchRecord::new(
                string_at(site_col, row).with_context(ctx)?,
                number_at(payload_col, row).with_context(ctx)?,
                class as i64,
                string_at(category_col, row).with_context(ctx)?,
            )
            .with_context(ctx)?;

            let flight_number = match flight_col {
                Some(col) => flight_number_at(col, row)
                    .with_context(|| format!("reading '{COL_FLIGHT_NUMBER}'"))
                    .with_context(ctx)?,
                None => None,
            };
            let booster_version = match version_col {
                Some(col) if !col.is_null(row) => Some(
                    string_at(col, row)
                        .with_context(|| format!("reading '{COL_BOOSTER_VERSION}'"))
                        .with_context(ctx)?,
                ),
                _ => None,
            };

            records.push(
                record
                    .with_flight_number(flight_number)
                    .with_booster_version(booster_version.filter(|v| !v.is_empty())),
            );
        }
    }

    Ok(records)
}

// -- Parquet / Arrow helpers --

fn column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a ArrayRef> {
    let idx = batch
        .schema()
        .index_of(name)
        .map_err(|_| anyhow::anyhow!("Parquet file missing '{name}' column"))?;
    Ok(batch.column(idx))
}

/// Read a string cell from a Utf8 or LargeUtf8 column.
fn string_at(col: &Arc<dyn Array>, row: usize) -> Result<String> {
    if col.is_null(row) {
        bail!("null value in string column");
    }
    match col.data_type() {
        DataType::Utf8 => {
            let arr = col
                .as_any()
                .downcast_ref::<StringArray>()
                .context("expected StringArray")?;
            Ok(arr.value(row).to_string())
        }
        DataType::LargeUtf8 => {
            let arr = col
                .as_any()
                .downcast_ref::<LargeStringArray>()
                .context("expected LargeStringArray")?;
            Ok(arr.value(row).to_string())
        }
        other => bail!("Expected Utf8 or LargeUtf8 column, got {other:?}"),
    }
}

/// Read a numeric cell as `f64`. Booleans map to 0 / 1.
fn number_at(col: &Arc<dyn Array>, row: usize) -> Result<f64> {
    if col.is_null(row) {
        bail!("null value in numeric column");
    }
    let any = col.as_any();
    let value = match col.data_type() {
        DataType::Int32 => any
            .downcast_ref::<Int32Array>()
            .map(|a| a.value(row) as f64),
        DataType::Int64 => any
            .downcast_ref::<Int64Array>()
            .map(|a| a.value(row) as f64),
        DataType::UInt32 => any
            .downcast_ref::<UInt32Array>()
            .map(|a| a.value(row) as f64),
        DataType::Float32 => any
            .downcast_ref::<Float32Array>()
            .map(|a| a.value(row) as f64),
        DataType::Float64 => any.downcast_ref::<Float64Array>().map(|a| a.value(row)),
        DataType::Boolean => any
            .downcast_ref::<BooleanArray>()
            .map(|a| if a.value(row) { 1.0 } else { 0.0 }),
        other => bail!("Expected a numeric column, got {other:?}"),
    };
    value.with_context(|| format!("unexpected array layout for {:?}", col.data_type()))
}

/// Read an optional flight number. Null is absent; anything that is not a
/// whole number in `u32` range is an error, as it is for CSV and JSON.
fn flight_number_at(col: &Arc<dyn Array>, row: usize) -> Result<Option<u32>> {
    if col.is_null(row) {
        return Ok(None);
    }
    let n = number_at(col, row)?;
    if n.fract() != 0.0 || n < 0.0 || n > f64::from(u32::MAX) {
        bail!("flight number must be a non-negative integer, got {n}");
    }
    Ok(Some(n as u32))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Outcome;
    use std::io::Write;

    use arrow::datatypes::{Field, Schema};
    use parquet::arrow::ArrowWriter;

    fn message(err: DashError) -> String {
        format!("{:#}", anyhow::Error::new(err))
    }

    /// Write one record batch built from `columns` to `dir/name`.
    fn write_parquet(
        dir: &tempfile::TempDir,
        name: &str,
        columns: Vec<(Field, ArrayRef)>,
    ) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let (fields, arrays): (Vec<Field>, Vec<ArrayRef>) = columns.into_iter().unzip();
        let schema = Arc::new(Schema::new(fields));
        let batch = RecordBatch::try_new(schema.clone(), arrays).unwrap();
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();
        path
    }

    /// The four required columns for a single KSC launch.
    fn required_columns() -> Vec<(Field, ArrayRef)> {
        vec![
            (
                Field::new(COL_LAUNCH_SITE, DataType::Utf8, false),
                Arc::new(StringArray::from(vec!["KSC LC-39A"])) as ArrayRef,
            ),
            (
                Field::new(COL_PAYLOAD_MASS, DataType::Float64, false),
                Arc::new(Float64Array::from(vec![2490.0])) as ArrayRef,
            ),
            (
                Field::new(COL_CLASS, DataType::Int64, false),
                Arc::new(Int64Array::from(vec![1])) as ArrayRef,
            ),
            (
                Field::new(COL_BOOSTER_CATEGORY, DataType::Utf8, false),
                Arc::new(StringArray::from(vec!["FT"])) as ArrayRef,
            ),
        ]
    }

    fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    const SAMPLE_CSV: &str = "\
,Flight Number,Launch Site,class,Payload Mass (kg),Booster Version,Booster Version Category
0,1,CCAFS LC-40,0,0.0,F9 v1.0  B0003,v1.0
1,2,CCAFS LC-40,0,0.0,F9 v1.0  B0004,v1.0
2,3,CCAFS LC-40,0,525.0,F9 v1.0  B0005,v1.0
3,4,VAFB SLC-4E,1,500.0,F9 v1.1  B1003,v1.1
";

    #[test]
    fn loads_csv_and_ignores_extra_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "launches.csv", SAMPLE_CSV);

        let table = load_file(&path).unwrap();
        assert_eq!(table.len(), 4);
        let last = &table.records()[3];
        assert_eq!(last.launch_site, "VAFB SLC-4E");
        assert_eq!(last.payload_mass_kg, 500.0);
        assert_eq!(last.outcome, Outcome::Success);
        assert_eq!(last.booster_version_category, "v1.1");
        assert_eq!(last.flight_number, Some(4));
        assert_eq!(last.booster_version.as_deref(), Some("F9 v1.1  B1003"));
    }

    #[test]
    fn csv_missing_column_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "broken.csv",
            "Launch Site,class,Booster Version Category\nCCAFS LC-40,1,v1.0\n",
        );

        let err = load_file(&path).unwrap_err();
        assert!(matches!(err, DashError::DataLoad { .. }));
        assert!(message(err).contains("Payload Mass (kg)"));
    }

    #[test]
    fn csv_mistyped_and_invalid_values_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let header = "Launch Site,Payload Mass (kg),class,Booster Version Category\n";

        let mistyped = write_file(&dir, "a.csv", &format!("{header}KSC LC-39A,heavy,1,FT\n"));
        assert!(load_file(&mistyped).is_err());

        let negative = write_file(&dir, "b.csv", &format!("{header}KSC LC-39A,-5,1,FT\n"));
        assert!(load_file(&negative).is_err());

        let bad_class = write_file(&dir, "c.csv", &format!("{header}KSC LC-39A,5,3,FT\n"));
        assert!(load_file(&bad_class).is_err());
    }

    #[test]
    fn missing_file_and_unknown_extension_fail() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_file(&dir.path().join("nope.csv")),
            Err(DashError::DataLoad { .. })
        ));

        let path = write_file(&dir, "launches.xlsx", "");
        let err = load_file(&path).unwrap_err();
        assert!(message(err).contains("Unsupported file extension"));
    }

    #[test]
    fn loads_json_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "launches.json",
            r#"[
                {"Launch Site": "KSC LC-39A", "Payload Mass (kg)": 2490.0, "class": 1,
                 "Booster Version Category": "FT", "Unnamed: 0": 12},
                {"Launch Site": "CCAFS SLC-40", "Payload Mass (kg)": 3600, "class": 0,
                 "Booster Version Category": "B4"}
            ]"#,
        );

        let table = load_file(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.sites(), ["KSC LC-39A", "CCAFS SLC-40"]);
        assert_eq!(table.records()[1].payload_mass_kg, 3600.0);
        assert_eq!(table.records()[1].flight_number, None);
    }

    #[test]
    fn json_missing_key_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "launches.json",
            r#"[{"Launch Site": "KSC LC-39A", "class": 1, "Booster Version Category": "FT"}]"#,
        );
        assert!(load_file(&path).is_err());
    }

    #[test]
    fn load_error_message_does_not_repeat_the_cause() {
        let dir = tempfile::tempdir().unwrap();
        let header = "Launch Site,Payload Mass (kg),class,Booster Version Category\n";
        let path = write_file(&dir, "bad.csv", &format!("{header}KSC LC-39A,5,3,FT\n"));

        let err = load_file(&path).unwrap_err();
        assert!(err.to_string().ends_with("bad.csv"));
        let text = message(err);
        assert_eq!(text.matches("CSV row 0").count(), 1);
        assert_eq!(text.matches("class must be 0 or 1, got 3").count(), 1);
    }

    #[test]
    fn fractional_flight_number_is_rejected_in_every_format() {
        let dir = tempfile::tempdir().unwrap();

        let csv = write_file(
            &dir,
            "a.csv",
            "Flight Number,Launch Site,Payload Mass (kg),class,Booster Version Category\n\
             1.5,KSC LC-39A,5,1,FT\n",
        );
        assert!(load_file(&csv).is_err());

        let json = write_file(
            &dir,
            "a.json",
            r#"[{"Flight Number": 1.5, "Launch Site": "KSC LC-39A", "Payload Mass (kg)": 5,
                 "class": 1, "Booster Version Category": "FT"}]"#,
        );
        assert!(load_file(&json).is_err());

        let mut columns = required_columns();
        columns.push((
            Field::new(COL_FLIGHT_NUMBER, DataType::Float64, false),
            Arc::new(Float64Array::from(vec![1.5])) as ArrayRef,
        ));
        let parquet = write_parquet(&dir, "a.parquet", columns);
        let text = message(load_file(&parquet).unwrap_err());
        assert!(text.contains("Flight Number"));
        assert!(text.contains("non-negative integer"));
    }

    #[test]
    fn parquet_optional_columns_reject_wrong_types_but_allow_nulls() {
        let dir = tempfile::tempdir().unwrap();

        let mut text_flight = required_columns();
        text_flight.push((
            Field::new(COL_FLIGHT_NUMBER, DataType::Utf8, false),
            Arc::new(StringArray::from(vec!["seven"])) as ArrayRef,
        ));
        let path = write_parquet(&dir, "text_flight.parquet", text_flight);
        assert!(message(load_file(&path).unwrap_err()).contains("Expected a numeric column"));

        let mut numeric_version = required_columns();
        numeric_version.push((
            Field::new(COL_BOOSTER_VERSION, DataType::Int64, false),
            Arc::new(Int64Array::from(vec![1049])) as ArrayRef,
        ));
        let path = write_parquet(&dir, "numeric_version.parquet", numeric_version);
        assert!(message(load_file(&path).unwrap_err()).contains("Booster Version"));

        let mut nulls = required_columns();
        nulls.push((
            Field::new(COL_FLIGHT_NUMBER, DataType::Int32, true),
            Arc::new(Int32Array::from(vec![None::<i32>])) as ArrayRef,
        ));
        nulls.push((
            Field::new(COL_BOOSTER_VERSION, DataType::Utf8, true),
            Arc::new(StringArray::from(vec![None::<&str>])) as ArrayRef,
        ));
        let path = write_parquet(&dir, "nulls.parquet", nulls);
        let table = load_file(&path).unwrap();
        assert_eq!(table.records()[0].flight_number, None);
        assert_eq!(table.records()[0].booster_version, None);
    }

    #[test]
    fn parquet_missing_required_column_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut columns = required_columns();
        columns.retain(|(field, _)| field.name() != COL_BOOSTER_CATEGORY);
        let path = write_parquet(&dir, "no_category.parquet", columns);

        let err = load_file(&path).unwrap_err();
        assert!(matches!(err, DashError::DataLoad { .. }));
        assert!(message(err).contains("missing 'Booster Version Category' column"));
    }

    #[test]
    fn parquet_text_class_column_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut columns = required_columns();
        columns[2] = (
            Field::new(COL_CLASS, DataType::Utf8, false),
            Arc::new(StringArray::from(vec!["1"])) as ArrayRef,
        );
        let path = write_parquet(&dir, "text_class.parquet", columns);

        let text = message(load_file(&path).unwrap_err());
        assert!(text.contains("reading 'class'"));
        assert!(text.contains("Expected a numeric column, got Utf8"));
    }

    #[test]
    fn loads_parquet_with_mixed_numeric_types() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_parquet(
            &dir,
            "launches.parquet",
            vec![
                (
                    Field::new(COL_LAUNCH_SITE, DataType::Utf8, false),
                    Arc::new(StringArray::from(vec!["VAFB SLC-4E", "KSC LC-39A"])) as ArrayRef,
                ),
                (
                    Field::new(COL_PAYLOAD_MASS, DataType::Float64, false),
                    Arc::new(Float64Array::from(vec![9600.0, 0.0])) as ArrayRef,
                ),
                (
                    Field::new(COL_CLASS, DataType::Int64, false),
                    Arc::new(Int64Array::from(vec![1, 0])) as ArrayRef,
                ),
                (
                    Field::new(COL_BOOSTER_CATEGORY, DataType::Utf8, false),
                    Arc::new(StringArray::from(vec!["FT", "B4"])) as ArrayRef,
                ),
                (
                    Field::new(COL_FLIGHT_NUMBER, DataType::Int32, false),
                    Arc::new(Int32Array::from(vec![7, 8])) as ArrayRef,
                ),
            ],
        );

        let table = load_file(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.records()[0].payload_mass_kg, 9600.0);
        assert_eq!(table.records()[1].outcome, Outcome::Failure);
        assert_eq!(table.records()[1].flight_number, Some(8));
        assert_eq!(table.records()[0].booster_version, None);
    }
}
