//! Data module - CSV loading, dataset access and pivoting

mod dataset;
mod loader;
mod pivot;

pub use dataset::{any_to_text, is_numeric_dtype, numeric_values, DataOrigin, Dataset};
pub use loader::{
    parse_with_encoding, read_csv_bytes, DataLoader, LoaderError, ParseError, TextEncoding,
    UploadedFile,
};
pub use pivot::{pivot_mean, PivotError, PivotTable};
