mod error;
mod decision;
mod screener;
pub mod builder;

pub use builder::ScreenerBuilder;
pub use error::ScreenerError;
pub use screener::{Screener, Verdict};

/// Information about the current state and configuration of a screener
#[derive(Debug, Clone)]
pub struct ScreenerInfo {
    /// Path to the ONNX model file
    pub model_path: String,
    /// Path to the fitted encoder file
    pub encoder_path: String,
    /// Width of the assembled feature row
    pub feature_width: usize,
    /// Column names in the order the model consumes them
    pub columns: Vec<String>,
}
