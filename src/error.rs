use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GaugeError {
    /// A computed margin was NaN or infinite.
    #[error("non-finite margin value: {value}")]
    ValueError { value: f64 },

    /// A historical point lies outside the dial's `[-bound, bound]` domain.
    /// It is still drawn, just not clipped to the band.
    #[error("{year}: margin {margin} is outside the dial range [-{bound}, {bound}]")]
    OutOfRangeData { year: i32, margin: f64, bound: f64 },

    #[error("invalid gauge config: {0}")]
    InvalidConfig(String),

    #[error("dataset line {line}: {message}")]
    Parse { line: usize, message: String },
}

pub type Result<T> = std::result::Result<T, GaugeError>;
