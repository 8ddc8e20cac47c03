//! Dashboard session: the dataset loaded for this run and the render cycle
//! re-run from the current selections on every interaction.

use thiserror::Error;
use tracing::{error, info, warn};

use crate::charts::{ChartDispatcher, ChartKind, ChartRequest, ChartSpec, DispatchError};
use crate::data::{DataLoader, Dataset, LoaderError, UploadedFile};
use crate::stats::{StatsCalculator, Summary};

/// Raw control state; the chart kind is kept as the selector text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selections {
    pub x: Option<String>,
    pub y: Option<String>,
    pub color: Option<String>,
    pub kind: String,
}

impl Default for Selections {
    fn default() -> Self {
        Self {
            x: None,
            y: None,
            color: None,
            kind: ChartKind::default().label().to_string(),
        }
    }
}

impl Selections {
    /// Build the request for this cycle.
    pub fn to_request(&self) -> Result<ChartRequest, RenderHalt> {
        let (Some(x), Some(y)) = (&self.x, &self.y) else {
            return Err(RenderHalt::MissingSelection);
        };
        let kind = self.kind.parse::<ChartKind>()?;
        Ok(ChartRequest::new(x.clone(), y.clone(), kind).with_color(self.color.clone()))
    }
}

/// Why a render cycle stopped before drawing a chart.
#[derive(Error, Debug)]
pub enum RenderHalt {
    #[error("CSV 파일을 업로드하거나 동일 폴더에 파일을 추가하세요.")]
    NoData,
    #[error("데이터를 불러오지 못했습니다: {0}")]
    LoadFailed(String),
    #[error("X축과 Y축 컬럼을 선택하세요.")]
    MissingSelection,
    #[error("지원되지 않는 시각화 유형입니다: {0}")]
    UnsupportedChartKind(String),
    #[error("Y축 컬럼에 숫자 값이 없습니다: {0}")]
    NonNumericY(String),
    #[error("차트를 만들 수 없습니다: {0}")]
    ChartFailed(DispatchError),
}

impl RenderHalt {
    /// Warnings ask the user for input; everything else is an error.
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            RenderHalt::NoData | RenderHalt::MissingSelection | RenderHalt::NonNumericY(_)
        )
    }
}

impl From<DispatchError> for RenderHalt {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::UnsupportedChartKind(kind) => RenderHalt::UnsupportedChartKind(kind),
            DispatchError::NoNumericValues(column) => RenderHalt::NonNumericY(column),
            other => RenderHalt::ChartFailed(other),
        }
    }
}

struct LoadedData {
    dataset: Dataset,
    summary: Summary,
}

/// Data owned by one dashboard run.
pub struct Session {
    loaded: Result<LoadedData, LoaderError>,
}

impl Session {
    /// Load the upload, else the loader's default file.
    pub fn open(loader: &DataLoader, upload: Option<&UploadedFile>) -> Self {
        let loaded = loader.load(upload).map(|dataset| {
            let summary = StatsCalculator::describe(dataset.dataframe());
            LoadedData { dataset, summary }
        });

        match &loaded {
            Ok(data) => info!(origin = %data.dataset.origin(), "session opened"),
            Err(LoaderError::NoDataSource) => warn!("session opened without data"),
            Err(e) => error!(error = %e, "session failed to load data"),
        }

        Self { loaded }
    }

    /// Session for a file that could not even be read.
    pub fn from_error(err: LoaderError) -> Self {
        error!(error = %err, "session failed to load data");
        Self { loaded: Err(err) }
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.loaded.as_ref().ok().map(|d| &d.dataset)
    }

    pub fn summary(&self) -> Option<&Summary> {
        self.loaded.as_ref().ok().map(|d| &d.summary)
    }

    pub fn load_error(&self) -> Option<&LoaderError> {
        self.loaded.as_ref().err()
    }

    pub fn columns(&self) -> Vec<String> {
        self.dataset().map(Dataset::columns).unwrap_or_default()
    }

    /// Y axis to start with: the first column holding numbers.
    pub fn default_y_column(&self) -> Option<String> {
        self.dataset().and_then(Dataset::first_numeric_column)
    }

    /// One render cycle. Halts before any chart work when there is no data.
    pub fn render(&self, selections: &Selections) -> Result<ChartSpec, RenderHalt> {
        let data = match &self.loaded {
            Ok(data) => data,
            Err(LoaderError::NoDataSource) => return Err(RenderHalt::NoData),
            Err(e) => return Err(RenderHalt::LoadFailed(e.to_string())),
        };

        let request = selections.to_request()?;
        Ok(ChartDispatcher::dispatch(&data.dataset, &request)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "행정구역,총인구수\n서울특별시,9386034\n부산광역시,3266598\n";

    fn selections(kind: &str) -> Selections {
        Selections {
            x: Some("행정구역".to_string()),
            y: Some("총인구수".to_string()),
            color: None,
            kind: kind.to_string(),
        }
    }

    #[test]
    fn no_data_halts_before_dispatch() {
        let session = Session::open(&DataLoader::new("no/such/file.csv"), None);
        assert!(session.dataset().is_none());
        // Even an invalid selector never reaches chart-kind parsing.
        let halt = session.render(&selections("pie")).unwrap_err();
        assert!(matches!(halt, RenderHalt::NoData));
        assert!(halt.is_warning());
    }

    #[test]
    fn loaded_session_renders_and_summarizes() {
        let upload = UploadedFile::new("u.csv", CSV.as_bytes().to_vec());
        let session = Session::open(&DataLoader::new("no/such/file.csv"), Some(&upload));
        assert_eq!(session.columns(), vec!["행정구역", "총인구수"]);
        assert_eq!(session.summary().unwrap().columns.len(), 2);

        let spec = session.render(&selections("막대 차트")).unwrap();
        assert!(matches!(spec, ChartSpec::Bar { .. }));
    }

    #[test]
    fn unsupported_kind_is_an_error_halt() {
        let upload = UploadedFile::new("u.csv", CSV.as_bytes().to_vec());
        let session = Session::open(&DataLoader::new("no/such/file.csv"), Some(&upload));
        let halt = session.render(&selections("파이 차트")).unwrap_err();
        assert!(matches!(halt, RenderHalt::UnsupportedChartKind(_)));
        assert!(!halt.is_warning());
    }

    #[test]
    fn missing_axis_selection_is_a_warning() {
        let upload = UploadedFile::new("u.csv", CSV.as_bytes().to_vec());
        let session = Session::open(&DataLoader::new("no/such/file.csv"), Some(&upload));
        let halt = session.render(&Selections::default()).unwrap_err();
        assert!(matches!(halt, RenderHalt::MissingSelection));
    }

    #[test]
    fn quoted_export_loads_and_renders() {
        let quoted = "\"행정구역\",\"총인구수\"\n\"서울특별시  (1100000000)\",\"9,386,034\"\n\"부산광역시  (2600000000)\",\"3,266,598\"\n";
        let upload = UploadedFile::new("q.csv", quoted.as_bytes().to_vec());
        let session = Session::open(&DataLoader::new("no/such/file.csv"), Some(&upload));

        let summary = session.summary().unwrap();
        assert_eq!(summary.columns[0].top.as_deref(), Some("서울특별시  (1100000000)"));
        assert_eq!(session.default_y_column().as_deref(), Some("총인구수"));

        for kind in ChartKind::ALL {
            assert!(session.render(&selections(kind.label())).is_ok());
        }
    }

    #[test]
    fn text_only_y_halts_with_warning() {
        let upload = UploadedFile::new("u.csv", CSV.as_bytes().to_vec());
        let session = Session::open(&DataLoader::new("no/such/file.csv"), Some(&upload));
        let mut sel = selections("라인 차트");
        sel.y = Some("행정구역".to_string());
        let halt = session.render(&sel).unwrap_err();
        assert!(matches!(halt, RenderHalt::NonNumericY(ref c) if c == "행정구역"));
        assert!(halt.is_warning());
    }

    #[test]
    fn read_failure_is_reported_as_load_failure() {
        let err = UploadedFile::from_path(std::path::Path::new("no/such/upload.csv")).unwrap_err();
        let session = Session::from_error(err);
        assert!(matches!(
            session.render(&selections("line")),
            Err(RenderHalt::LoadFailed(_))
        ));
    }
}
