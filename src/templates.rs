// This file is part of Docket.
// SPDX-License-Identifier: AGPL-3.0-or-later

use minijinja::{Environment, Value, default_auto_escape_callback};

pub trait TemplateEngine: Send + Sync {
    fn render(&self, template_name: &str, context: Value) -> Result<String, minijinja::Error>;
}

pub struct MiniJinjaEngine {
    env: Environment<'static>,
}

impl MiniJinjaEngine {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_auto_escape_callback(default_auto_escape_callback);
        env.set_loader(embedded_template_loader);
        Self { env }
    }
}

impl Default for MiniJinjaEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateEngine for MiniJinjaEngine {
    fn render(&self, template_name: &str, context: Value) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template(template_name)?;
        tmpl.render(context)
    }
}

/// Template loader for minijinja that loads from embedded sources
fn embedded_template_loader(name: &str) -> Result<Option<String>, minijinja::Error> {
    let template_content = match name {
        "layout.html" => Some(include_str!("public/templates/layout.html")),

        // Document pages
        "public/index.html" => Some(include_str!("public/templates/index.html")),
        "public/document.html" => Some(include_str!("public/templates/document.html")),
        "public/new.html" => Some(include_str!("public/templates/new.html")),
        "public/edit.html" => Some(include_str!("public/templates/edit.html")),
        "public/duplicate.html" => Some(include_str!("public/templates/duplicate.html")),
        "public/upload_image.html" => Some(include_str!("public/templates/upload_image.html")),

        // Login templates
        "login/sign_in.html" => Some(include_str!("login/templates/sign_in.html")),
        "login/sign_up.html" => Some(include_str!("login/templates/sign_up.html")),

        _ => None,
    };

    Ok(template_content.map(|s| s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::context;

    #[test]
    fn renders_index_template() {
        let engine = MiniJinjaEngine::new();
        let html = engine
            .render(
                "public/index.html",
                context! {
                    app_name => "Docket",
                    flash => None::<String>,
                    current_user => None::<String>,
                    documents => vec!["about.md", "notes.txt"],
                },
            )
            .expect("render");
        assert!(html.contains("about.md"));
        assert!(html.contains("notes.txt"));
    }

    #[test]
    fn escapes_document_names() {
        let engine = MiniJinjaEngine::new();
        let html = engine
            .render(
                "public/edit.html",
                context! {
                    app_name => "Docket",
                    flash => None::<String>,
                    current_user => "admin",
                    name => "a<b>.txt",
                    content => "<script>alert(1)</script>",
                },
            )
            .expect("render");
        assert!(!html.contains("<script>alert(1)</script>"));
    }

    #[test]
    fn unknown_template_is_an_error() {
        let engine = MiniJinjaEngine::new();
        assert!(engine.render("missing.html", Value::from(())).is_err());
    }
}
