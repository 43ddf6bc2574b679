#![deny(unsafe_code)]

pub mod repository;

pub use repository::{StoredTemplate, TemplateRepository, TemplateSummary};
