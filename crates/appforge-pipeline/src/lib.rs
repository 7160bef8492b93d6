pub mod errors;
pub mod service;

pub mod prelude {
    pub use crate::errors::PipelineError;
    pub use crate::service::{ApplicationService, LogPage};
}

pub use errors::PipelineError;
pub use service::{ApplicationService, LogPage};
