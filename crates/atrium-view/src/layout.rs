//! Layout templates for the HTML shell.

use std::path::Path;

use crate::error::{ViewError, ViewResult};

/// Placeholder for the escaped page title.
pub const TITLE: &str = "{{title}}";
/// Placeholder for the component registry listing.
pub const COMPONENTS: &str = "{{components}}";
/// Placeholder for the mount point of the resolved component.
pub const MOUNT: &str = "{{mount}}";
/// Placeholder for the embedded state element.
pub const STATE: &str = "{{state}}";
/// Placeholder for the bootstrap and component scripts.
pub const SCRIPTS: &str = "{{scripts}}";

const PLACEHOLDERS: [&str; 5] = [TITLE, COMPONENTS, MOUNT, STATE, SCRIPTS];

/// The layout used when none is configured.
pub const DEFAULT_LAYOUT: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{title}}</title>
    {{components}}
</head>
<body>
    {{mount}}
    {{state}}
    {{scripts}}
</body>
</html>
"#;

/// Rendered fragments substituted into a layout.
#[derive(Debug, Clone, Copy)]
pub struct LayoutParts<'a> {
    /// Escaped title text.
    pub title: &'a str,
    /// Component registry element.
    pub components: &'a str,
    /// Mount point element.
    pub mount: &'a str,
    /// Embedded state element.
    pub state: &'a str,
    /// Script elements.
    pub scripts: &'a str,
}

/// A validated layout template.
///
/// Every placeholder must appear at least once. Substitution is a single
/// pass, so placeholder text inside substituted fragments is left alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutTemplate {
    source: String,
}

impl LayoutTemplate {
    /// Validates a template.
    pub fn parse(source: impl Into<String>) -> ViewResult<Self> {
        let source = source.into();
        if let Some(missing) = PLACEHOLDERS.iter().find(|p| !source.contains(*p)) {
            return Err(ViewError::MissingPlaceholder(*missing));
        }
        Ok(Self { source })
    }

    /// Reads and validates a template file.
    pub fn from_file(path: impl AsRef<Path>) -> ViewResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ViewError::LayoutIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(source)
    }

    /// Returns the template source.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Substitutes the fragments into the template.
    pub fn render(&self, parts: &LayoutParts<'_>) -> String {
        let mut out = String::with_capacity(self.source.len() + parts.state.len() + 512);
        let mut rest = self.source.as_str();

        while let Some(start) = rest.find("{{") {
            out.push_str(&rest[..start]);
            let tail = &rest[start..];
            match PLACEHOLDERS.iter().find(|p| tail.starts_with(*p)) {
                Some(placeholder) => {
                    out.push_str(parts.fragment(placeholder));
                    rest = &tail[placeholder.len()..];
                }
                None => {
                    out.push_str("{{");
                    rest = &tail[2..];
                }
            }
        }
        out.push_str(rest);
        out
    }
}

impl Default for LayoutTemplate {
    fn default() -> Self {
        Self {
            source: DEFAULT_LAYOUT.to_string(),
        }
    }
}

impl LayoutParts<'_> {
    fn fragment(&self, placeholder: &str) -> &str {
        match placeholder {
            TITLE => self.title,
            COMPONENTS => self.components,
            MOUNT => self.mount,
            STATE => self.state,
            _ => self.scripts,
        }
    }
}
