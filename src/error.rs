use thiserror::Error;

pub type Result<T> = std::result::Result<T, CurveError>;

#[derive(Error, Debug)]
pub enum CurveError {
    #[error("Need at least 2 samples, got {0}")]
    TooFewSamples(usize),

    #[error("Length mismatch: {voltages} voltages vs {values} values")]
    LengthMismatch { voltages: usize, values: usize },

    #[error("Voltages must be strictly increasing (index {0})")]
    NonMonotonicVoltage(usize),

    #[error("Spline system is singular at row {0}")]
    SingularSystem(usize),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session file error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}
