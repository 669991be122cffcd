//! Metric sampling pipeline: sources, the bounded history and the sampler
//! state machine that ties them together.

pub mod buffer;
pub mod capacity;
pub mod driver;
pub mod error;
pub mod procfs;
pub mod sampler;
pub mod source;

pub use buffer::ScrollingSeriesBuffer;
pub use capacity::{capacity_for_width, LabelMode, MAX_CAPACITY, MIN_CAPACITY};
pub use driver::{spawn_sampler, SamplerCommand, SamplerHandle};
pub use error::SystemError;
pub use sampler::{MetricSampler, PendingRead, ReadOutcome, SamplerState};
pub use source::{MetricSource, SysinfoSource};
