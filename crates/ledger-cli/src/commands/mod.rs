pub mod export;
pub mod get;
pub mod provenance;
pub mod validate;
