pub mod codes;
pub mod model;
pub mod retry;

pub mod prelude {
    pub use crate::codes::{self, ErrorCode};
    pub use crate::model::{ErrorBuilder, ErrorObj, PublicErrorView};
    pub use crate::retry::RetryClass;
}

pub use model::{ErrorBuilder, ErrorObj, PublicErrorView};
pub use retry::RetryClass;
