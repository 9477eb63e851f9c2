pub mod error;
pub mod presentation;
pub mod types;

#[cfg(feature = "property")]
pub mod property;

#[cfg(feature = "deal")]
pub mod deal;

pub use error::DealAnalysisError;
pub use types::*;

/// Standard result type for all deal-analysis operations
pub type AnalysisResult<T> = Result<T, DealAnalysisError>;
