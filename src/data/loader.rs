//! CSV Data Loader Module
//! Resolves the data source and parses CSV with a UTF-8 then CP949 attempt.

use encoding_rs::{Encoding, EUC_KR, UTF_8};
use polars::prelude::*;
use std::fmt;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::dataset::{DataOrigin, Dataset};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
const INFER_SCHEMA_ROWS: usize = 10_000;

/// Text encodings tried when parsing, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    /// Windows code page 949, the Korean superset of EUC-KR.
    Cp949,
}

impl TextEncoding {
    fn encoding(self) -> &'static Encoding {
        match self {
            TextEncoding::Utf8 => UTF_8,
            // WHATWG's EUC-KR decoder is the full windows-949 table.
            TextEncoding::Cp949 => EUC_KR,
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextEncoding::Utf8 => write!(f, "utf-8"),
            TextEncoding::Cp949 => write!(f, "cp949"),
        }
    }
}

/// Failure of a single parse attempt.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("input is not valid {0}")]
    Decode(TextEncoding),
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] PolarsError),
}

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("No data source: no file uploaded and default file not found")]
    NoDataSource,
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to load CSV as utf-8 ({primary}) and as cp949 ({fallback})")]
    Undecodable {
        primary: ParseError,
        fallback: ParseError,
    },
}

/// A file supplied by the user, read fully into memory.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Read a picked file; the handle is closed before returning.
    pub fn from_path(path: &Path) -> Result<Self, LoaderError> {
        let bytes = std::fs::read(path).map_err(|source| LoaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(name, bytes))
    }
}

/// Handles data source resolution and CSV parsing with Polars.
#[derive(Debug, Clone)]
pub struct DataLoader {
    default_path: PathBuf,
}

impl DataLoader {
    pub fn new(default_path: impl Into<PathBuf>) -> Self {
        Self {
            default_path: default_path.into(),
        }
    }

    /// Load the upload if given, else the default file, else fail with `NoDataSource`.
    pub fn load(&self, upload: Option<&UploadedFile>) -> Result<Dataset, LoaderError> {
        if let Some(file) = upload {
            let (df, encoding) = read_csv_bytes(&file.bytes)?;
            info!(
                file = %file.name,
                %encoding,
                rows = df.height(),
                columns = df.width(),
                "loaded uploaded csv"
            );
            return Ok(Dataset::new(
                df,
                DataOrigin::Uploaded(file.name.clone()),
                encoding,
            ));
        }

        if self.default_path.exists() {
            let bytes = std::fs::read(&self.default_path).map_err(|source| LoaderError::Io {
                path: self.default_path.clone(),
                source,
            })?;
            let (df, encoding) = read_csv_bytes(&bytes)?;
            info!(
                path = %self.default_path.display(),
                %encoding,
                rows = df.height(),
                columns = df.width(),
                "loaded local csv"
            );
            return Ok(Dataset::new(
                df,
                DataOrigin::LocalFile(self.default_path.clone()),
                encoding,
            ));
        }

        warn!(path = %self.default_path.display(), "no upload and no default csv");
        Err(LoaderError::NoDataSource)
    }
}

/// Parse CSV bytes as UTF-8, retrying once as CP949.
pub fn read_csv_bytes(bytes: &[u8]) -> Result<(DataFrame, TextEncoding), LoaderError> {
    let primary = match parse_with_encoding(bytes, TextEncoding::Utf8) {
        Ok(df) => return Ok((df, TextEncoding::Utf8)),
        Err(e) => e,
    };
    debug!(error = %primary, "utf-8 parse failed, retrying as cp949");

    match parse_with_encoding(bytes, TextEncoding::Cp949) {
        Ok(df) => Ok((df, TextEncoding::Cp949)),
        Err(fallback) => Err(LoaderError::Undecodable { primary, fallback }),
    }
}

/// Decode strictly with one encoding, then parse with Polars.
pub fn parse_with_encoding(bytes: &[u8], encoding: TextEncoding) -> Result<DataFrame, ParseError> {
    let bytes = match encoding {
        TextEncoding::Utf8 => bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes),
        TextEncoding::Cp949 => bytes,
    };

    let text = encoding
        .encoding()
        .decode_without_bom_handling_and_without_replacement(bytes)
        .ok_or(ParseError::Decode(encoding))?;

    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .into_reader_with_file_handle(Cursor::new(text.into_owned().into_bytes()))
        .finish()?;
    // Quoted input can come back in several chunks.
    df.as_single_chunk_par();

    Ok(df)
}
