pub mod errors;
pub mod model;
pub mod prelude;

pub mod spi {
    pub mod health;
    pub mod repo;

    pub use health::*;
    pub use repo::*;
}

pub mod mock;

pub use errors::StorageError;
pub use model::*;
pub use spi::*;
