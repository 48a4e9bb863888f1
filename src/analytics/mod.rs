pub mod fallback;
pub mod sourced;
pub mod types;

pub use fallback::FallbackCatalog;
pub use sourced::Sourced;
pub use types::{DashboardSnapshot, DateRange, ModelMetrics, ModelScore};
