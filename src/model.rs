// Core structs: Element, Category, Trend, Annotation
use serde::Serialize;
use thiserror::Error;

/// Snapshot of one element of a page, in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub tag: String,
    pub classes: Vec<String>,
    pub text: String,
    pub previous: Option<String>,
    pub font_weight: Option<String>,
    pub appended: String,
}

impl Element {
    pub fn new(tag: &str, class_attr: &str, text: &str) -> Self {
        Self {
            tag: tag.to_string(),
            classes: class_attr.split_whitespace().map(str::to_string).collect(),
            text: text.to_string(),
            ..Self::default()
        }
    }

    pub fn with_previous(mut self, previous: &str) -> Self {
        self.previous = Some(previous.to_string());
        self
    }

    pub fn has_class(&self, token: &str) -> bool {
        self.classes.iter().any(|c| c == token)
    }

    /// Appends a class token. With `dedup` set, a token already present is left alone.
    pub fn add_class(&mut self, token: &str, dedup: bool) {
        if dedup && self.has_class(token) {
            return;
        }
        self.classes.push(token.to_string());
    }

    pub fn class_attr(&self) -> String {
        self.classes.join(" ")
    }

    /// Text as rendered after mutation: original content plus anything appended.
    pub fn rendered_text(&self) -> String {
        format!("{}{}", self.text, self.appended)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Green,
    LightGreen,
    Yellow,
    Orange,
    Red,
    None,
}

impl Category {
    pub fn css_class(self) -> Option<&'static str> {
        match self {
            Category::Green => Some("w3-green"),
            Category::LightGreen => Some("w3-light-green"),
            Category::Yellow => Some("w3-yellow"),
            Category::Orange => Some("w3-orange"),
            Category::Red => Some("w3-red"),
            Category::None => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Rise,
    Fall,
    Same,
}

impl Trend {
    pub const GLYPHS: [char; 3] = ['⇑', '⇓', '⇔'];

    pub fn glyph(self) -> char {
        match self {
            Trend::Rise => '⇑',
            Trend::Fall => '⇓',
            Trend::Same => '⇔',
        }
    }
}

/// Why a marked element was left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Skip {
    Unparsable,
    OutOfBounds,
    MissingPrevious,
    UnparsablePrevious,
    AlreadyAnnotated,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Outcome {
    Percentage { category: Category },
    Trend { trend: Trend, previous: f64 },
}

/// One applied mutation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    pub element: usize,
    pub tag: String,
    pub marker: &'static str,
    pub value: f64,
    #[serde(flatten)]
    pub outcome: Outcome,
}

#[derive(Debug, Clone)]
pub struct PageRequest {
    pub input: String,
    pub output: Option<String>,
}

impl PageRequest {
    pub fn is_remote(&self) -> bool {
        self.input.starts_with("http://") || self.input.starts_with("https://")
    }
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status {status} from {url}")]
    InvalidResponse { url: String, status: u16 },
}

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}
