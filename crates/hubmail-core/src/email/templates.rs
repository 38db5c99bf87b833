/// HTML template rendering from the bundled template directory
use crate::error::HubmailError;
use handlebars::Handlebars;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub trait TemplateRenderer: Send + Sync {
    fn render(&self, name: &str, context: &HashMap<String, String>)
    -> Result<String, HubmailError>;
}

/// Reads `<dir>/<name>` on every render and merges it with Handlebars.
///
/// Strict mode is on: a variable missing from the context fails the render
/// instead of producing an empty string.
pub struct HandlebarsTemplateRenderer {
    dir: PathBuf,
    handlebars: Handlebars<'static>,
}

impl HandlebarsTemplateRenderer {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(true);
        Self {
            dir: dir.into(),
            handlebars,
        }
    }

    fn template_path(&self, name: &str) -> Result<PathBuf, HubmailError> {
        let is_plain_file = Path::new(name)
            .file_name()
            .is_some_and(|file| file == name);
        if !is_plain_file {
            return Err(HubmailError::Render(format!(
                "Invalid template name {:?}",
                name
            )));
        }
        Ok(self.dir.join(name))
    }
}

impl TemplateRenderer for HandlebarsTemplateRenderer {
    fn render(
        &self,
        name: &str,
        context: &HashMap<String, String>,
    ) -> Result<String, HubmailError> {
        let path = self.template_path(name)?;
        let source = std::fs::read_to_string(&path).map_err(|e| {
            HubmailError::Render(format!("Template {} could not be read: {}", path.display(), e))
        })?;

        let html = self.handlebars.render_template(&source, context)?;
        tracing::debug!(template = %name, bytes = html.len(), "Rendered template");
        Ok(html)
    }
}
