use std::{collections::HashMap, fmt::Display, str::FromStr};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    #[error("Selector is empty")]
    Empty,
    #[error("Unsupported selector: {0}")]
    Unsupported(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    Change,
    Submit,
}

/// The parts of a DOM element that selectors and handlers look at.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Element {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    /// `data-*` attributes keyed without the `data-` prefix.
    pub data: HashMap<String, String>,
    pub value: Option<String>,
    pub checked: bool,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn with_data(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(name.into(), value.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    pub fn data(&self, name: &str) -> Option<&str> {
        self.data.get(name).map(String::as_str)
    }
}

/// Selector vocabulary understood by the event table: `[data-name]`,
/// `[data-name="value"]`, `#id`, `.class` and bare tag names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    Data { name: String, value: Option<String> },
    Id(String),
    Class(String),
    Tag(String),
}

impl Selector {
    pub fn data(name: impl Into<String>, value: impl Into<String>) -> Self {
        Selector::Data {
            name: name.into(),
            value: Some(value.into()),
        }
    }

    pub fn has_data(name: impl Into<String>) -> Self {
        Selector::Data {
            name: name.into(),
            value: None,
        }
    }

    pub fn matches(&self, element: &Element) -> bool {
        match self {
            Selector::Data { name, value } => match (element.data(name), value) {
                (Some(actual), Some(expected)) => actual == expected,
                (Some(_), None) => true,
                (None, _) => false,
            },
            Selector::Id(id) => element.id.as_deref() == Some(id.as_str()),
            Selector::Class(class) => element.classes.iter().any(|value| value == class),
            Selector::Tag(tag) => element.tag.eq_ignore_ascii_case(tag),
        }
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(SelectorError::Empty);
        }
        let unsupported = || SelectorError::Unsupported(s.to_string());

        if let Some(inner) = s.strip_prefix('[') {
            let inner = inner.strip_suffix(']').ok_or_else(unsupported)?;
            let inner = inner.strip_prefix("data-").ok_or_else(unsupported)?;
            let (name, value) = match inner.split_once('=') {
                Some((name, value)) => {
                    let value = value
                        .strip_prefix('"')
                        .and_then(|value| value.strip_suffix('"'))
                        .ok_or_else(unsupported)?;
                    (name, Some(value.to_string()))
                }
                None => (inner, None),
            };
            if !is_name(name) {
                return Err(unsupported());
            }
            return Ok(Selector::Data {
                name: name.to_string(),
                value,
            });
        }
        if let Some(id) = s.strip_prefix('#') {
            return is_name(id)
                .then(|| Selector::Id(id.to_string()))
                .ok_or_else(unsupported);
        }
        if let Some(class) = s.strip_prefix('.') {
            return is_name(class)
                .then(|| Selector::Class(class.to_string()))
                .ok_or_else(unsupported);
        }
        is_name(s)
            .then(|| Selector::Tag(s.to_ascii_lowercase()))
            .ok_or_else(unsupported)
    }
}

impl Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Selector::Data {
                name,
                value: Some(value),
            } => write!(f, "[data-{name}=\"{value}\"]"),
            Selector::Data { name, value: None } => write!(f, "[data-{name}]"),
            Selector::Id(id) => write!(f, "#{id}"),
            Selector::Class(class) => write!(f, ".{class}"),
            Selector::Tag(tag) => write!(f, "{tag}"),
        }
    }
}

fn is_name(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Delegation table from `(event kind, selector)` to an action. Lookups scan
/// registrations in order and the first selector matching the target wins.
#[derive(Debug, Clone)]
pub struct EventTable<A> {
    handlers: HashMap<EventKind, Vec<(Selector, A)>>,
}

impl<A> Default for EventTable<A> {
    fn default() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }
}

impl<A> EventTable<A> {
    pub fn new() -> Self {
        Default::default()
    }

    /// Registering the same selector again replaces its action and keeps its place.
    pub fn on(&mut self, kind: EventKind, selector: Selector, action: A) -> &mut Self {
        let handlers = self.handlers.entry(kind).or_default();
        match handlers.iter_mut().find(|(existing, _)| *existing == selector) {
            Some(entry) => entry.1 = action,
            None => handlers.push((selector, action)),
        }
        self
    }

    pub fn off(&mut self, kind: EventKind, selector: &Selector) -> Option<A> {
        let handlers = self.handlers.get_mut(&kind)?;
        let index = handlers
            .iter()
            .position(|(existing, _)| existing == selector)?;
        Some(handlers.remove(index).1)
    }

    pub fn dispatch(&self, kind: EventKind, target: &Element) -> Option<&A> {
        self.handlers
            .get(&kind)?
            .iter()
            .find(|(selector, _)| selector.matches(target))
            .map(|(_, action)| action)
    }
}
