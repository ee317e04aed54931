//! Server-side HTML templates.

mod engine;

pub use engine::{render_template, TemplateError};
