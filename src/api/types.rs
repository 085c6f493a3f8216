use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// A source file stored on the platform. Identity is the URI.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteFile {
    #[serde(rename = "fileUri")]
    pub uri: String,
    #[serde(default)]
    pub last_uploaded: Option<DateTime<Utc>>,
    pub file_type: FileType,
    #[serde(default)]
    pub total_string_count: u64,
}

/// Translation progress of one locale for one file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocaleStatus {
    pub locale_id: String,
    #[serde(default)]
    pub completed_string_count: u64,
    #[serde(default)]
    pub completed_word_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileStatus {
    pub file_uri: String,
    #[serde(default)]
    pub total_string_count: u64,
    #[serde(default)]
    pub total_word_count: u64,
    #[serde(rename = "items", default)]
    pub locales: Vec<LocaleStatus>,
}

impl FileStatus {
    /// Completed strings of `locale` as a percentage of the file's strings.
    ///
    /// A file without strings reports 0%.
    pub const fn percent_complete(&self, locale: &LocaleStatus) -> u64 {
        if self.total_string_count == 0 {
            return 0;
        }
        locale.completed_string_count * 100 / self.total_string_count
    }
}

/// Which state of a translation to download.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum RetrievalType {
    /// Latest translations, including unpublished ones
    #[default]
    Pending,
    /// Only published translations
    Published,
    /// Pseudo-translated content for layout testing
    Pseudo,
    /// Content instrumented for visual context matching
    #[value(name = "contextMatchingInstrumented")]
    ContextMatchingInstrumented,
}

impl RetrievalType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Published => "published",
            Self::Pseudo => "pseudo",
            Self::ContextMatchingInstrumented => "contextMatchingInstrumented",
        }
    }
}

/// Remote parser used for a file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FileType {
    Android,
    Ios,
    Stringsdict,
    Gettext,
    JavaProperties,
    Json,
    Yaml,
    Xliff,
    Xml,
    Html,
    Markdown,
    Resx,
    Qt,
    Csv,
    PlainText,
    Docx,
    Xlsx,
    Pptx,
    Idml,
    Other(String),
}

impl FileType {
    const KNOWN: [(&'static str, Self); 19] = [
        ("android", Self::Android),
        ("ios", Self::Ios),
        ("stringsdict", Self::Stringsdict),
        ("gettext", Self::Gettext),
        ("javaProperties", Self::JavaProperties),
        ("json", Self::Json),
        ("yaml", Self::Yaml),
        ("xliff", Self::Xliff),
        ("xml", Self::Xml),
        ("html", Self::Html),
        ("markdown", Self::Markdown),
        ("resx", Self::Resx),
        ("qt", Self::Qt),
        ("csv", Self::Csv),
        ("plainText", Self::PlainText),
        ("docx", Self::Docx),
        ("xlsx", Self::Xlsx),
        ("pptx", Self::Pptx),
        ("idml", Self::Idml),
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Self::Other(name) => name,
            known => Self::KNOWN
                .iter()
                .find(|(_, t)| t == known)
                .map_or("", |(name, _)| *name),
        }
    }

    /// Guesses the file type from the path's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        let file_type = match ext.as_str() {
            "xml" if path.to_string_lossy().contains("values") => Self::Android,
            "xml" => Self::Xml,
            "strings" => Self::Ios,
            "stringsdict" => Self::Stringsdict,
            "po" | "pot" => Self::Gettext,
            "properties" => Self::JavaProperties,
            "json" => Self::Json,
            "yml" | "yaml" => Self::Yaml,
            "xlf" | "xliff" => Self::Xliff,
            "html" | "htm" => Self::Html,
            "md" | "markdown" => Self::Markdown,
            "resx" | "resw" => Self::Resx,
            "ts" => Self::Qt,
            "csv" => Self::Csv,
            "txt" => Self::PlainText,
            "docx" => Self::Docx,
            "xlsx" => Self::Xlsx,
            "pptx" => Self::Pptx,
            "idml" => Self::Idml,
            _ => return None,
        };
        Some(file_type)
    }
}

impl From<String> for FileType {
    fn from(value: String) -> Self {
        Self::KNOWN
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(&value))
            .map_or(Self::Other(value), |(_, t)| t.clone())
    }
}

impl From<&str> for FileType {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<FileType> for String {
    fn from(value: FileType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything needed to upload one source file.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub contents: Bytes,
    pub file_uri: String,
    pub file_type: FileType,
    /// Authorize the file for every target locale of the project.
    pub authorize: bool,
    pub locales_to_authorize: Vec<String>,
    pub directives: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    #[serde(rename = "overWritten", default)]
    pub overwritten: bool,
    #[serde(default)]
    pub string_count: u64,
    #[serde(default)]
    pub word_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub project_id: String,
    pub project_name: String,
    pub source_locale_id: String,
    #[serde(default)]
    pub archived: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetLocale {
    pub locale_id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

const fn enabled_by_default() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetails {
    pub project_id: String,
    pub project_name: String,
    pub source_locale_id: String,
    #[serde(default)]
    pub source_locale_description: String,
    #[serde(default)]
    pub target_locales: Vec<TargetLocale>,
}
