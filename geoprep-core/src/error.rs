use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("GeoJSON error: {0}")]
    GeoJsonError(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("No JSON assignment named `{0}` found")]
    MissingAssignment(String),
    #[error("Invalid classification scheme: {0}")]
    InvalidScheme(String),
    #[error("Histogram edges must be non-decreasing and finite: {0:?}")]
    InvalidEdges(Vec<f64>),
}

impl From<geojson::Error> for Error {
    fn from(e: geojson::Error) -> Self {
        Error::GeoJsonError(e.to_string())
    }
}
