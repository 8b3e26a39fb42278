//! Compiled selector configuration
//!
//! The raw [`SelectorTable`] read from TOML is compiled once at load time into
//! a [`SelectorConfig`] whose CSS selectors are already parsed, so extraction
//! never fails on a bad selector.

use crate::config::types::{FieldRule, SelectorTable};
use crate::ConfigError;
use scraper::Selector;

/// One compiled selector candidate
#[derive(Debug, Clone)]
pub struct SelectorCandidate {
    /// Original selector text, kept for logs
    pub source: String,

    pub selector: Selector,

    /// Attribute holding the value; element text when `None`
    pub attr: Option<String>,
}

/// Ordered fallback list of candidates for one field
#[derive(Debug, Clone)]
pub struct FieldSelector {
    candidates: Vec<SelectorCandidate>,
}

impl FieldSelector {
    /// Compiles a field rule
    ///
    /// # Arguments
    ///
    /// * `field` - Field name, used in error messages
    /// * `rule` - The raw rule from the config file
    pub fn compile(field: &str, rule: &FieldRule) -> Result<Self, ConfigError> {
        let specs = rule.candidates();
        if specs.is_empty() {
            return Err(ConfigError::Validation(format!(
                "selector list for '{}' cannot be empty",
                field
            )));
        }

        let mut candidates = Vec::with_capacity(specs.len());
        for spec in specs {
            let selector = compile_css(field, spec.css())?;
            let attr = match spec.attr() {
                Some(attr) if attr.trim().is_empty() => {
                    return Err(ConfigError::Validation(format!(
                        "attribute name for '{}' ({}) cannot be empty",
                        field,
                        spec.css()
                    )));
                }
                Some(attr) => Some(attr.trim().to_string()),
                None => None,
            };
            candidates.push(SelectorCandidate {
                source: spec.css().to_string(),
                selector,
                attr,
            });
        }

        Ok(Self { candidates })
    }

    pub fn candidates(&self) -> &[SelectorCandidate] {
        &self.candidates
    }

    /// Candidate selectors as written in the config, joined with `" | "`
    pub fn describe(&self) -> String {
        self.candidates
            .iter()
            .map(|candidate| match &candidate.attr {
                Some(attr) => format!("{} @{}", candidate.source, attr),
                None => candidate.source.clone(),
            })
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

/// Typed, immutable selector configuration for one site
#[derive(Debug, Clone)]
pub struct SelectorConfig {
    pub container: Option<Selector>,
    pub title: FieldSelector,
    pub date: Option<FieldSelector>,
    pub author: Option<FieldSelector>,
    pub content: FieldSelector,
    pub next_page: Option<FieldSelector>,
    pub preserve_html: bool,
}

impl SelectorConfig {
    /// Compiles a raw selector table, failing on the first invalid selector
    pub fn compile(table: &SelectorTable) -> Result<Self, ConfigError> {
        let container = match &table.container {
            Some(css) => Some(compile_css("container", css)?),
            None => None,
        };

        Ok(Self {
            container,
            title: FieldSelector::compile("title", &table.title)?,
            date: compile_optional("date", table.date.as_ref())?,
            author: compile_optional("author", table.author.as_ref())?,
            content: FieldSelector::compile("content", &table.content)?,
            next_page: compile_optional("next-page", table.next_page.as_ref())?,
            preserve_html: table.preserve_html,
        })
    }
}

fn compile_optional(
    field: &str,
    rule: Option<&FieldRule>,
) -> Result<Option<FieldSelector>, ConfigError> {
    rule.map(|rule| FieldSelector::compile(field, rule))
        .transpose()
}

fn compile_css(field: &str, css: &str) -> Result<Selector, ConfigError> {
    if css.trim().is_empty() {
        return Err(ConfigError::InvalidSelector {
            field: field.to_string(),
            selector: css.to_string(),
            message: "selector cannot be empty".to_string(),
        });
    }

    Selector::parse(css).map_err(|e| ConfigError::InvalidSelector {
        field: field.to_string(),
        selector: css.to_string(),
        message: e.to_string(),
    })
}
