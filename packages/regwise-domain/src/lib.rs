pub mod context;
pub mod document;
pub mod page;
pub mod prompt;
pub mod provenance;
