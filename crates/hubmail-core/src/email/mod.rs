/// Email body rendering
pub mod templates;

pub use templates::{HandlebarsTemplateRenderer, TemplateRenderer};
