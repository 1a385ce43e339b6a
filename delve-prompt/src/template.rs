use std::collections::HashMap;

use regex::Regex;

use delve_core::DelveError;

/// A `{{ var }}` substitution template. Variables with no binding render as
/// empty strings; the rendered result is trimmed.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    pub fn render(&self, vars: &HashMap<String, String>) -> Result<String, DelveError> {
        let pattern = Regex::new(r"\{\{\s*(\w+)\s*\}\}")
            .map_err(|e| DelveError::InvalidConfig(e.to_string()))?;
        let rendered = pattern.replace_all(&self.template, |caps: &regex::Captures| {
            let key = &caps[1];
            vars.get(key).cloned().unwrap_or_default()
        });
        Ok(rendered.trim().to_string())
    }
}
