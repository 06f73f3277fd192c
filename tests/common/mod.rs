// Each integration test file is a separate binary; helpers not used in every
// binary would otherwise trigger dead_code warnings from clippy.
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use url::Url;

use pagelink::dialog::{ChoiceDialog, ChoiceRequest, DialogEvent, DialogSession, Selection};
use pagelink::document::{DocumentQuery, HtmlDocument, LinkElement, MetaAttr};
use pagelink::error::{AppError, AppResult};

pub const LOCATION: &str = "https://news.example.com/2024/story?id=42&utm_source=rss";

pub fn html_doc(html: &str) -> HtmlDocument {
    HtmlDocument::parse(html, Url::parse(LOCATION).unwrap())
}

// ── Hand-built document ──────────────────────────────────────────────────────

/// A document assembled field by field, no HTML involved.
pub struct StaticDocument {
    location: Url,
    title: Option<String>,
    meta: HashMap<(&'static str, String), String>,
    links: Vec<(String, LinkElement)>,
}

impl StaticDocument {
    pub fn at(location: &str) -> Self {
        Self {
            location: Url::parse(location).unwrap(),
            title: None,
            meta: HashMap::new(),
            links: Vec::new(),
        }
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn property(mut self, key: &str, content: &str) -> Self {
        self.meta
            .insert(("property", key.to_string()), content.to_string());
        self
    }

    pub fn name(mut self, key: &str, content: &str) -> Self {
        self.meta.insert(("name", key.to_string()), content.to_string());
        self
    }

    pub fn link(mut self, rel: &str, link: LinkElement) -> Self {
        self.links.push((rel.to_string(), link));
        self
    }
}

impl DocumentQuery for StaticDocument {
    fn location(&self) -> &Url {
        &self.location
    }

    fn title(&self) -> Option<String> {
        self.title.clone()
    }

    fn meta(&self, attr: MetaAttr, key: &str) -> Option<String> {
        let attr = match attr {
            MetaAttr::Property => "property",
            MetaAttr::Name => "name",
        };
        self.meta.get(&(attr, key.to_string())).cloned()
    }

    fn links(&self, rel: &str) -> Vec<LinkElement> {
        self.links
            .iter()
            .filter(|(r, _)| r.split_ascii_whitespace().any(|t| t.eq_ignore_ascii_case(rel)))
            .map(|(_, link)| link.clone())
            .collect()
    }
}

// ── Scripted dialog ──────────────────────────────────────────────────────────

/// Answers each dialog with the next scripted list of events and records
/// every request it was shown.
#[derive(Default)]
pub struct ScriptedDialog {
    script: Mutex<VecDeque<Vec<DialogEvent>>>,
    seen: Mutex<Vec<ChoiceRequest>>,
}

impl ScriptedDialog {
    pub fn new(script: Vec<Vec<DialogEvent>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<ChoiceRequest> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChoiceDialog for ScriptedDialog {
    async fn present_choice(&self, request: &ChoiceRequest) -> AppResult<Selection> {
        self.seen.lock().unwrap().push(request.clone());
        let events = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| AppError::Dialog("unexpected dialog".into()))?;

        let mut session = DialogSession::open(request.clone());
        for event in events {
            if let Some(selection) = session.apply(event) {
                return Ok(selection);
            }
        }
        Err(AppError::Dialog("script left the dialog open".into()))
    }
}
