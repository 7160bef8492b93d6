pub mod errors;
pub mod validate;

pub mod prelude {
    pub use crate::errors::SchemaError;
    pub use crate::validate::SchemaValidator;
}

pub use errors::SchemaError;
pub use validate::SchemaValidator;
