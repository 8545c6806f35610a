//! The target registration page as seen by the section selector.

use std::fs;
use std::path::{Path, PathBuf};

use scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use thiserror::Error;

use crate::config::SelectorOptions;

#[derive(Debug, Error)]
pub enum PageError {
    #[error("invalid CSS selector {0:?}")]
    InvalidSelector(String),
    #[error("failed to read page {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Checkbox {
    pub checked: bool,
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    /// Visible text of the container, descendants included.
    pub text: String,
    pub checkbox: Option<Checkbox>,
}

impl Section {
    pub fn new(text: impl Into<String>, checkbox: Option<Checkbox>) -> Self {
        Section {
            text: text.into(),
            checkbox,
        }
    }

    pub fn unchecked(text: impl Into<String>) -> Self {
        Section::new(text, Some(Checkbox::default()))
    }
}

/// Outcome of clicking a container's checkbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Click {
    Toggled { checked: bool },
    Disabled,
    NoCheckbox,
}

/// Section containers currently present on a page. Indices are only valid
/// until the page changes shape.
pub trait SectionPage {
    fn section_count(&self) -> usize;

    fn section_text(&self, index: usize) -> Option<&str>;

    fn checkbox(&self, index: usize) -> Option<Checkbox>;

    /// Simulates a user click on the container's checkbox.
    fn click_checkbox(&mut self, index: usize) -> Click;
}

/// A page snapshot built from HTML (or directly from sections) whose
/// checkboxes can be clicked in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StaticPage {
    sections: Vec<Section>,
}

impl StaticPage {
    pub fn from_sections(sections: Vec<Section>) -> Self {
        StaticPage { sections }
    }

    pub fn parse(html: &str, options: &SelectorOptions) -> Result<Self, PageError> {
        let container = parse_selector(&options.container)?;
        let checkbox = parse_selector(&options.checkbox)?;
        let document = Html::parse_document(html);

        let sections = document
            .select(&container)
            .map(|el| Section {
                text: el.text().collect::<String>(),
                checkbox: el.select(&checkbox).next().map(checkbox_state),
            })
            .collect();
        Ok(StaticPage { sections })
    }

    pub fn from_file(path: &Path, options: &SelectorOptions) -> Result<Self, PageError> {
        let html = fs::read_to_string(path).map_err(|source| PageError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&html, options)
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Whitespace-collapsed text of every checked section, in page order.
    pub fn checked_sections(&self) -> Vec<String> {
        self.sections
            .iter()
            .filter(|s| s.checkbox.map_or(false, |cb| cb.checked))
            .map(|s| s.text.split_whitespace().collect::<Vec<_>>().join(" "))
            .collect()
    }
}

impl SectionPage for StaticPage {
    fn section_count(&self) -> usize {
        self.sections.len()
    }

    fn section_text(&self, index: usize) -> Option<&str> {
        self.sections.get(index).map(|s| s.text.as_str())
    }

    fn checkbox(&self, index: usize) -> Option<Checkbox> {
        self.sections.get(index).and_then(|s| s.checkbox)
    }

    fn click_checkbox(&mut self, index: usize) -> Click {
        let Some(cb) = self.sections.get_mut(index).and_then(|s| s.checkbox.as_mut()) else {
            return Click::NoCheckbox;
        };
        if cb.disabled {
            return Click::Disabled;
        }
        cb.checked = !cb.checked;
        Click::Toggled { checked: cb.checked }
    }
}

fn parse_selector(css: &str) -> Result<Selector, PageError> {
    Selector::parse(css).map_err(|_| PageError::InvalidSelector(css.to_string()))
}

fn checkbox_state(el: ElementRef<'_>) -> Checkbox {
    let attrs = el.value();
    Checkbox {
        checked: attrs.attr("checked").is_some(),
        disabled: attrs.attr("disabled").is_some(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
          <div class="ums-grid-offered-section"><span>CSE101</span> Lecture
            <input type="checkbox"></div>
          <div class="ums-grid-offered-section"><span>CSE101-L</span> Lab
            <input type="checkbox" checked></div>
          <div class="ums-grid-offered-section">MTH201 Tutorial</div>
          <div class="ums-grid-offered-section">PHY110 <input type="checkbox" disabled></div>
          <div class="other">CSE101 elsewhere <input type="checkbox"></div>
        </body></html>
    "#;

    fn page() -> StaticPage {
        StaticPage::parse(PAGE, &SelectorOptions::default()).unwrap()
    }

    #[test]
    fn test_parse_finds_only_marked_containers() {
        let page = page();
        assert_eq!(page.section_count(), 4);
        assert!(page.section_text(0).unwrap().contains("CSE101"));
        assert!(page.section_text(0).unwrap().contains("Lecture"));
    }

    #[test]
    fn test_parse_reads_checkbox_attributes() {
        let page = page();
        assert_eq!(page.checkbox(0), Some(Checkbox::default()));
        assert_eq!(page.checkbox(1).map(|cb| cb.checked), Some(true));
        assert_eq!(page.checkbox(2), None);
        assert_eq!(page.checkbox(3).map(|cb| cb.disabled), Some(true));
    }

    #[test]
    fn test_click_toggles_enabled_checkbox() {
        let mut page = page();
        assert_eq!(page.click_checkbox(0), Click::Toggled { checked: true });
        assert_eq!(page.checked_sections(), vec!["CSE101 Lecture", "CSE101-L Lab"]);
    }

    #[test]
    fn test_click_disabled_and_missing_checkbox() {
        let mut page = page();
        assert_eq!(page.click_checkbox(2), Click::NoCheckbox);
        assert_eq!(page.click_checkbox(3), Click::Disabled);
        assert_eq!(page.click_checkbox(99), Click::NoCheckbox);
    }

    #[test]
    fn test_custom_selectors() {
        let options = SelectorOptions {
            container: "div.other".to_string(),
            ..SelectorOptions::default()
        };
        let page = StaticPage::parse(PAGE, &options).unwrap();
        assert_eq!(page.section_count(), 1);
    }

    #[test]
    fn test_bad_selector_is_an_error() {
        let options = SelectorOptions {
            checkbox: "input[".to_string(),
            ..SelectorOptions::default()
        };
        assert!(matches!(
            StaticPage::parse(PAGE, &options),
            Err(PageError::InvalidSelector(_))
        ));
    }
}
