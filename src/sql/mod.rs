//! SQL text building blocks.
//!
//! - [`template`] - named fragments with `:name` placeholders
//! - [`quote`] - identifier and literal quoting

pub mod quote;
pub mod template;

pub use template::{
    substitute, BuiltinTemplates, FileTemplates, TemplateError, TemplateProvider,
};
