//! minijinja-backed template renderer.

use kubescaff_core::{
    application::{ApplicationError, ports::TemplateRenderer},
    error::KsResult,
};
use minijinja::{Environment, UndefinedBehavior, Value};
use tracing::trace;

/// Renders paths and bodies with minijinja.
///
/// Undefined variables are errors so a misspelt key fails the scaffold
/// instead of producing an empty string.
pub struct MinijinjaRenderer {
    env: Environment<'static>,
}

impl MinijinjaRenderer {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_keep_trailing_newline(true);
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        Self { env }
    }
}

impl Default for MinijinjaRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer for MinijinjaRenderer {
    fn render(&self, name: &str, template: &str, context: &serde_json::Value) -> KsResult<String> {
        trace!(template = name, "Rendering");
        self.env
            .render_str(template, Value::from_serialize(context))
            .map_err(|e| {
                ApplicationError::RenderingFailed {
                    template: name.to_string(),
                    reason: e.to_string(),
                }
                .into()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn renders_nested_context() {
        let r = MinijinjaRenderer::new();
        let ctx = json!({"resource": {"kind": "Frigate", "group": "ship"}, "multigroup": false});
        let out = r
            .render(
                "t",
                "{% if multigroup %}apis/{{ resource.group }}{% else %}api{% endif %}/{{ resource.kind | lower }}.go\n",
                &ctx,
            )
            .unwrap();
        assert_eq!(out, "api/frigate.go\n");
    }

    #[test]
    fn undefined_values_fail() {
        let r = MinijinjaRenderer::new();
        let err = r.render("main.go", "{{ missing }}", &json!({})).unwrap_err();
        assert!(err.to_string().starts_with("failed to render main.go"));
    }

    #[test]
    fn keeps_trailing_newline() {
        let r = MinijinjaRenderer::new();
        assert_eq!(r.render("t", "a\n", &json!({})).unwrap(), "a\n");
    }
}
