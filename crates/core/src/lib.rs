pub mod error;
pub mod event;
pub mod format;
pub mod kind;
pub mod state;

pub use error::{MonError, Result};
pub use event::SeriesUpdate;
pub use kind::MetricKind;
pub use state::{SamplerContext, SamplingSchedule};
