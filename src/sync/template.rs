//! Path templates for pulled files.
//!
//! A template is literal text with `{{ ... }}` actions. An action is a field
//! (`.FileURI`, `.Locale`) optionally passed through one function
//! (`name`, `ext`, `base`, `dir`).

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("malformed path template '{template}': {reason}")]
pub struct TemplateError {
    pub template: String,
    pub reason: String,
}

impl TemplateError {
    fn new(template: &str, reason: impl Into<String>) -> Self {
        Self {
            template: template.to_string(),
            reason: reason.into(),
        }
    }

    pub fn hint(&self) -> String {
        "Use fields {{.FileURI}} and {{.Locale}}, optionally wrapped in name, ext, base or dir, \
         e.g. {{.Locale}}/{{base .FileURI}}"
            .to_string()
    }
}

/// Values a template is rendered with.
#[derive(Debug, Clone, Copy)]
pub struct TemplateVars<'a> {
    pub file_uri: &'a str,
    pub locale: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    FileUri,
    Locale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Func {
    Name,
    Ext,
    Base,
    Dir,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Action { func: Option<Func>, field: Field },
}

/// A parsed template, ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl PathTemplate {
    pub fn parse(template: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut rest = template;

        while let Some(start) = rest.find("{{") {
            if start > 0 {
                segments.push(Segment::Text(rest[..start].to_string()));
            }
            let after_open = &rest[start + 2..];
            let end = after_open
                .find("}}")
                .ok_or_else(|| TemplateError::new(template, "unterminated action"))?;
            segments.push(parse_action(template, &after_open[..end])?);
            rest = &after_open[end + 2..];
        }

        if rest.contains("}}") {
            return Err(TemplateError::new(template, "unexpected '}}'"));
        }
        if !rest.is_empty() {
            segments.push(Segment::Text(rest.to_string()));
        }

        Ok(Self {
            source: template.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn render(&self, vars: TemplateVars<'_>) -> String {
        let mut out = String::with_capacity(self.source.len() + vars.file_uri.len());
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Action { func, field } => {
                    let value = match field {
                        Field::FileUri => vars.file_uri,
                        Field::Locale => vars.locale,
                    };
                    match func {
                        None => out.push_str(value),
                        Some(Func::Name) => out.push_str(strip_ext(value)),
                        Some(Func::Ext) => out.push_str(&value[strip_ext(value).len()..]),
                        Some(Func::Base) => out.push_str(base(value)),
                        Some(Func::Dir) => out.push_str(dir(value)),
                    }
                }
            }
        }
        out
    }
}

fn parse_action(template: &str, body: &str) -> Result<Segment, TemplateError> {
    let words: Vec<&str> = body.split_whitespace().collect();
    let (func, field) = match words.as_slice() {
        [field] => (None, *field),
        [func, field] => (Some(parse_func(template, func)?), *field),
        [] => return Err(TemplateError::new(template, "empty action")),
        _ => {
            return Err(TemplateError::new(
                template,
                format!("too many words in '{{{{{body}}}}}'"),
            ));
        }
    };

    let field = match field {
        ".FileURI" => Field::FileUri,
        ".Locale" => Field::Locale,
        other => {
            return Err(TemplateError::new(template, format!("unknown field '{other}'")));
        }
    };

    Ok(Segment::Action { func, field })
}

fn parse_func(template: &str, name: &str) -> Result<Func, TemplateError> {
    match name {
        "name" => Ok(Func::Name),
        "ext" => Ok(Func::Ext),
        "base" => Ok(Func::Base),
        "dir" => Ok(Func::Dir),
        other => Err(TemplateError::new(
            template,
            format!("unknown function '{other}'"),
        )),
    }
}

fn base(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn dir(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) => "/",
        Some(idx) => &path[..idx],
        None => ".",
    }
}

/// `path` without the extension of its last segment. Dotfiles keep their name.
fn strip_ext(path: &str) -> &str {
    let file = base(path);
    match file.rfind('.') {
        Some(idx) if idx > 0 => &path[..path.len() - file.len() + idx],
        _ => path,
    }
}

/// Compiled templates keyed by source text, shared by concurrent pull tasks.
#[derive(Debug, Clone, Default)]
pub struct TemplateCache {
    entries: Arc<RwLock<HashMap<String, Arc<PathTemplate>>>>,
}

impl TemplateCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, template: &str) -> Result<Arc<PathTemplate>, TemplateError> {
        if let Some(found) = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(template)
        {
            return Ok(Arc::clone(found));
        }

        let compiled = Arc::new(PathTemplate::parse(template)?);
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(
            entries.entry(template.to_string()).or_insert(compiled),
        ))
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
