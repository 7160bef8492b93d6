pub mod id;
pub mod time;

pub mod prelude {
    pub use crate::id::Id;
    pub use crate::time::Timestamp;
}
