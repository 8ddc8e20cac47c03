//! Loaded dataset wrapper around a Polars DataFrame.

use polars::prelude::*;
use std::fmt;
use std::path::PathBuf;

use super::loader::TextEncoding;

/// Where the dataset came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataOrigin {
    /// File picked by the user.
    Uploaded(String),
    /// Default file found in the working directory.
    LocalFile(PathBuf),
}

impl DataOrigin {
    /// User-facing notice shown after a successful load.
    pub fn notice(&self) -> String {
        match self {
            DataOrigin::Uploaded(_) => "✅ 업로드된 파일을 불러왔습니다.".to_string(),
            DataOrigin::LocalFile(path) => {
                format!("📂 로컬 파일을 불러왔습니다: {}", path.display())
            }
        }
    }
}

impl fmt::Display for DataOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataOrigin::Uploaded(name) => write!(f, "{name}"),
            DataOrigin::LocalFile(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Immutable table loaded once per session.
#[derive(Debug, Clone)]
pub struct Dataset {
    df: DataFrame,
    origin: DataOrigin,
    encoding: TextEncoding,
}

impl Dataset {
    pub fn new(df: DataFrame, origin: DataOrigin, encoding: TextEncoding) -> Self {
        Self {
            df,
            origin,
            encoding,
        }
    }

    /// Get list of column names.
    pub fn columns(&self) -> Vec<String> {
        self.df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    pub fn row_count(&self) -> usize {
        self.df.height()
    }

    pub fn column_count(&self) -> usize {
        self.df.width()
    }

    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    pub fn origin(&self) -> &DataOrigin {
        &self.origin
    }

    /// Encoding the file was successfully decoded with.
    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    /// First column holding at least one number, if any.
    pub fn first_numeric_column(&self) -> Option<String> {
        self.df
            .get_columns()
            .iter()
            .find(|col| {
                numeric_values(col)
                    .map(|values| values.iter().any(Option::is_some))
                    .unwrap_or(false)
            })
            .map(|col| col.name().to_string())
    }

    /// First `n` rows rendered as text, `None` for missing cells.
    pub fn preview(&self, n: usize) -> Vec<Vec<Option<String>>> {
        let head = self.df.head(Some(n));
        (0..head.height())
            .map(|i| {
                head.get_columns()
                    .iter()
                    .map(|col| col.get(i).ok().and_then(|v| any_to_text(&v)))
                    .collect()
            })
            .collect()
    }
}

/// Whether a column type is summarized and plotted as a number.
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float32
            | DataType::Float64
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

/// Render a cell as plain text; nulls become `None`.
pub fn any_to_text(value: &AnyValue) -> Option<String> {
    if value.is_null() {
        return None;
    }
    match value.get_str() {
        Some(s) => Some(s.to_string()),
        None => Some(value.to_string()),
    }
}

/// Column values as numbers, `None` where a value is missing or not a number.
///
/// Text cells such as `"9,386,034"` are read with thousands separators removed.
pub fn numeric_values(column: &Column) -> PolarsResult<Vec<Option<f64>>> {
    if column.dtype() == &DataType::String {
        let values = column
            .str()?
            .into_iter()
            .map(|v| v.and_then(parse_number))
            .collect();
        return Ok(values);
    }

    let cast = column.cast(&DataType::Float64)?;
    Ok(cast.f64()?.into_iter().collect())
}

fn parse_number(text: &str) -> Option<f64> {
    let cleaned: String = text.trim().chars().filter(|c| *c != ',').collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        let df = df!(
            "행정구역" => ["서울특별시", "부산광역시", "대구광역시"],
            "총인구수" => [9_386_034i64, 3_266_598, 2_364_547],
        )
        .unwrap();
        Dataset::new(
            df,
            DataOrigin::Uploaded("sample.csv".to_string()),
            TextEncoding::Utf8,
        )
    }

    #[test]
    fn columns_keep_file_order() {
        let ds = sample();
        assert_eq!(ds.columns(), vec!["행정구역", "총인구수"]);
        assert!(is_numeric_dtype(ds.dataframe().column("총인구수").unwrap().dtype()));
        assert!(!is_numeric_dtype(ds.dataframe().column("행정구역").unwrap().dtype()));
        assert_eq!(ds.row_count(), 3);
        assert_eq!(ds.column_count(), 2);
    }

    #[test]
    fn preview_strips_string_quotes() {
        let rows = sample().preview(2);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][0].as_deref(), Some("서울특별시"));
        assert_eq!(rows[1][1].as_deref(), Some("3266598"));
    }

    #[test]
    fn text_keeps_inner_and_edge_quotes() {
        let df = df!("말" => ["say \"hi\"", "\"quoted\""]).unwrap();
        let col = df.column("말").unwrap();
        assert_eq!(any_to_text(&col.get(0).unwrap()).as_deref(), Some("say \"hi\""));
        assert_eq!(any_to_text(&col.get(1).unwrap()).as_deref(), Some("\"quoted\""));
        assert_eq!(any_to_text(&AnyValue::Int64(42)).as_deref(), Some("42"));
        assert_eq!(any_to_text(&AnyValue::Null), None);
    }

    #[test]
    fn text_numbers_with_separators_are_numeric() {
        let df = df!(
            "행정구역" => ["서울특별시  (1100000000)", "부산광역시  (2600000000)"],
            "총인구수" => ["9,386,034", "3,266,598"],
        )
        .unwrap();
        let values = numeric_values(df.column("총인구수").unwrap()).unwrap();
        assert_eq!(values, vec![Some(9_386_034.0), Some(3_266_598.0)]);
        let regions = numeric_values(df.column("행정구역").unwrap()).unwrap();
        assert_eq!(regions, vec![None, None]);

        let ds = Dataset::new(df, DataOrigin::Uploaded("q.csv".into()), TextEncoding::Utf8);
        assert_eq!(ds.first_numeric_column().as_deref(), Some("총인구수"));
    }

    #[test]
    fn origin_notice_names_local_path() {
        let origin = DataOrigin::LocalFile(PathBuf::from("data.csv"));
        assert!(origin.notice().contains("data.csv"));
        assert!(DataOrigin::Uploaded("x.csv".into())
            .notice()
            .contains("업로드"));
    }
}
