//! Popup input state: an ordered list of course-code fields with a focus cursor.
//!
//! The surface (a terminal prompt, a webview, a test) forwards user gestures to
//! [`FieldList`] and redraws from [`render`]. Nothing here touches a real DOM.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::codes::{has_separator, normalize_codes, split_codes};
use crate::config::{CollectorOptions, SplitPlacement};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FieldId(u64);

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "field-{}", self.0)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CollectorError {
    #[error("{0} does not exist")]
    UnknownField(FieldId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Backspace,
    Other,
}

/// Whether the surface should still run its default handling for an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventAction {
    Default,
    Suppressed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Field {
    id: FieldId,
    value: String,
}

#[derive(Debug, Clone)]
pub struct FieldList {
    fields: Vec<Field>,
    next_id: u64,
    focused: Option<FieldId>,
    pending_focus: Option<FieldId>,
    options: CollectorOptions,
}

impl FieldList {
    /// Creates the list with its first, focused, empty field.
    pub fn new(options: CollectorOptions) -> Self {
        let mut list = FieldList {
            fields: Vec::new(),
            next_id: 0,
            focused: None,
            pending_focus: None,
            options,
        };
        list.add_field("", true);
        list
    }

    pub fn options(&self) -> &CollectorOptions {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn ids(&self) -> Vec<FieldId> {
        self.fields.iter().map(|f| f.id).collect()
    }

    pub fn values(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.value.as_str()).collect()
    }

    pub fn value(&self, id: FieldId) -> Option<&str> {
        self.fields.iter().find(|f| f.id == id).map(|f| f.value.as_str())
    }

    pub fn focused(&self) -> Option<FieldId> {
        self.focused
    }

    pub fn focused_value(&self) -> Option<&str> {
        self.focused.and_then(|id| self.value(id))
    }

    /// Appends a field holding `initial_value.trim()`. A focus request is
    /// honoured on the next [`FieldList::attach`].
    pub fn add_field(&mut self, initial_value: &str, focus: bool) -> FieldId {
        let id = self.allocate();
        let field = Field {
            id,
            value: initial_value.trim().to_string(),
        };
        self.fields.push(field);
        if focus {
            self.pending_focus = Some(id);
        }
        id
    }

    /// Called by the surface once new fields are on screen.
    pub fn attach(&mut self) -> Option<FieldId> {
        if let Some(id) = self.pending_focus.take() {
            if self.index_of(id).is_some() {
                self.focused = Some(id);
            }
        }
        self.focused
    }

    pub fn focus(&mut self, id: FieldId) -> Result<(), CollectorError> {
        self.require(id)?;
        self.focused = Some(id);
        Ok(())
    }

    /// The field's text changed to `text` (typing, or a default paste landing).
    pub fn on_text_changed(&mut self, id: FieldId, text: &str) -> Result<(), CollectorError> {
        let idx = self.require(id)?;
        if has_separator(text) {
            self.split_into(idx, text);
        } else {
            self.fields[idx].value = text.to_string();
        }
        Ok(())
    }

    /// Clipboard text about to be pasted into `id`. Comma-separated text is
    /// split here and the default paste must be suppressed.
    pub fn on_paste(&mut self, id: FieldId, clipboard_text: &str) -> Result<EventAction, CollectorError> {
        let idx = self.require(id)?;
        if !has_separator(clipboard_text) {
            return Ok(EventAction::Default);
        }
        self.split_into(idx, clipboard_text);
        Ok(EventAction::Suppressed)
    }

    pub fn on_key_down(&mut self, id: FieldId, key: Key) -> Result<EventAction, CollectorError> {
        let idx = self.require(id)?;
        match key {
            Key::Enter => {
                self.add_field("", true);
                self.attach();
                Ok(EventAction::Suppressed)
            }
            Key::Backspace if self.fields[idx].value.is_empty() && self.fields.len() > 1 => {
                self.fields.remove(idx);
                let target = self.fields[idx.saturating_sub(1)].id;
                self.focused = Some(target);
                if self.pending_focus == Some(id) {
                    self.pending_focus = None;
                }
                Ok(EventAction::Default)
            }
            _ => Ok(EventAction::Default),
        }
    }

    /// Ordered, trimmed, non-empty field values.
    pub fn collect_codes(&self) -> Vec<String> {
        normalize_codes(self.fields.iter().map(|f| &f.value))
    }

    fn split_into(&mut self, idx: usize, text: &str) {
        let mut tokens = split_codes(text).into_iter();
        let Some(first) = tokens.next() else {
            self.fields[idx].value.clear();
            return;
        };
        self.fields[idx].value = first;

        let mut insert_at = idx + 1;
        let mut last_created = None;
        for token in tokens {
            let id = self.allocate();
            let field = Field { id, value: token };
            match self.options.placement {
                SplitPlacement::AfterOrigin => {
                    self.fields.insert(insert_at, field);
                    insert_at += 1;
                }
                SplitPlacement::AppendEnd => self.fields.push(field),
            }
            last_created = Some(id);
        }

        self.focused = Some(last_created.unwrap_or(self.fields[idx].id));
    }

    fn allocate(&mut self) -> FieldId {
        let id = FieldId(self.next_id);
        self.next_id += 1;
        id
    }

    fn index_of(&self, id: FieldId) -> Option<usize> {
        self.fields.iter().position(|f| f.id == id)
    }

    fn require(&self, id: FieldId) -> Result<usize, CollectorError> {
        self.index_of(id).ok_or(CollectorError::UnknownField(id))
    }
}

impl Default for FieldList {
    fn default() -> Self {
        FieldList::new(CollectorOptions::default())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldView {
    pub id: FieldId,
    pub value: String,
    pub placeholder: String,
    pub focused: bool,
}

/// What the popup should display for the current state.
pub fn render(list: &FieldList) -> Vec<FieldView> {
    list.fields
        .iter()
        .map(|f| FieldView {
            id: f.id,
            value: f.value.clone(),
            placeholder: list.options.placeholder.clone(),
            focused: list.focused == Some(f.id),
        })
        .collect()
}
