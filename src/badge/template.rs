use crate::domain::model::BadgeRecord;
use crate::utils::error::{BadgerError, Result};
use regex::{Captures, Regex};
use std::path::Path;
use std::sync::OnceLock;

const PLACEHOLDERS: [&str; 5] = ["firstname", "lastname", "type", "token", "barcode"];

fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{\{\s*([A-Za-z_]+)\s*\}\}").expect("valid regex"))
}

/// SVG badge template with `{{ name }}` placeholders.
#[derive(Debug, Clone)]
pub struct BadgeTemplate {
    source: String,
}

impl BadgeTemplate {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => BadgerError::TemplateNotFound {
                path: path.display().to_string(),
            },
            _ => BadgerError::IoError(e),
        })?;

        tracing::debug!("Loaded badge template {}", path.display());
        Self::parse(source)
    }

    /// Checks every placeholder up front so rendering cannot fail half-way
    /// through a print run.
    pub fn parse(source: String) -> Result<Self> {
        for caps in placeholder_re().captures_iter(&source) {
            let name = &caps[1];
            if !PLACEHOLDERS.contains(&name) {
                return Err(BadgerError::TemplateError {
                    message: format!("unknown placeholder {{{{ {} }}}}", name),
                });
            }
        }
        Ok(Self { source })
    }

    pub fn render(&self, record: &BadgeRecord, barcode_file: &str) -> String {
        placeholder_re()
            .replace_all(&self.source, |caps: &Captures| {
                let value = match &caps[1] {
                    "firstname" => record.firstname.as_str(),
                    "lastname" => record.lastname.as_str(),
                    "type" => record.badge_type.as_str(),
                    "token" => record.token.as_str(),
                    "barcode" => barcode_file,
                    _ => "",
                };
                xml_escape(value)
            })
            .into_owned()
    }
}

fn xml_escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c => escaped.push(c),
        }
    }
    escaped
}
