use serde::{Deserialize, Serialize};

/// Which multi-candidate field a list of candidates belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Url,
    Title,
}

impl Field {
    pub fn label(self) -> &'static str {
        match self {
            Field::Url => "URL",
            Field::Title => "title",
        }
    }
}

/// One possible value for a field, tagged with where it was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub value: String,
    /// Provenance shown during disambiguation, e.g. "canonical link".
    pub source_label: String,
}

impl Candidate {
    pub fn new(value: impl Into<String>, source_label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            source_label: source_label.into(),
        }
    }
}

/// Metadata gathered from one document for one invocation.
///
/// `url` and `title` hold every candidate in priority order until the
/// pipeline overwrites them with the final selection; every other field has
/// already been resolved to a single value (or is absent).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataRecord {
    pub url: Vec<Candidate>,
    pub title: Vec<Candidate>,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
    pub author: Option<String>,
    pub site_name: Option<String>,
}

impl MetadataRecord {
    /// Replace a field's candidates with the single value the user settled on.
    pub fn settle(&mut self, field: Field, chosen: Candidate) {
        let slot = match field {
            Field::Url => &mut self.url,
            Field::Title => &mut self.title,
        };
        *slot = vec![chosen];
    }

    pub fn first_title(&self) -> Option<&str> {
        self.title.first().map(|c| c.value.as_str())
    }
}
