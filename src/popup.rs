//! The popup: course-code fields plus the "add" and "run" triggers.

use thiserror::Error;
use tracing::{debug, warn};

use crate::collector::{CollectorError, EventAction, FieldId, FieldList};
use crate::config::{Config, SelectorOptions};
use crate::page::SectionPage;
use crate::selector::select_sections;

/// Refusals shown to the user; the messages are the popup's warnings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RunError {
    #[error("Please add at least one course code.")]
    NoCodes,
    #[error("Please open your UMS advising page first.")]
    NoActivePage,
}

/// Whatever owns the browser tabs.
pub trait TabHost {
    type Page: SectionPage;

    /// The page in the active tab of the current window, if any.
    fn active_page(&mut self) -> Option<&mut Self::Page>;
}

/// A host with at most one tab.
#[derive(Debug, Clone, Default)]
pub struct SingleTab<P> {
    page: Option<P>,
}

impl<P> SingleTab<P> {
    pub fn new(page: P) -> Self {
        SingleTab { page: Some(page) }
    }

    pub fn empty() -> Self {
        SingleTab { page: None }
    }

    pub fn page(&self) -> Option<&P> {
        self.page.as_ref()
    }

    pub fn into_page(self) -> Option<P> {
        self.page
    }
}

impl<P: SectionPage> TabHost for SingleTab<P> {
    type Page = P;

    fn active_page(&mut self) -> Option<&mut P> {
        self.page.as_mut()
    }
}

#[derive(Debug, Clone)]
pub struct Popup {
    fields: FieldList,
    selector: SelectorOptions,
}

impl Popup {
    pub fn new(config: &Config) -> Self {
        let mut fields = FieldList::new(config.collector.clone());
        fields.attach();
        Popup {
            fields,
            selector: config.selector.clone(),
        }
    }

    pub fn fields(&self) -> &FieldList {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut FieldList {
        &mut self.fields
    }

    /// The "add course" button.
    pub fn add_course(&mut self) -> FieldId {
        let id = self.fields.add_field("", true);
        self.fields.attach();
        id
    }

    /// Enters each item into its own field, pasting so that comma-separated
    /// items split the same way they do in the popup.
    pub fn fill<I, S>(&mut self, entries: I) -> Result<(), CollectorError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for entry in entries {
            let entry = entry.as_ref();
            let target = match self.fields.focused() {
                Some(id) if self.fields.value(id) == Some("") => id,
                _ => self.add_course(),
            };
            if self.fields.on_paste(target, entry)? == EventAction::Default {
                self.fields.on_text_changed(target, entry)?;
            }
        }
        Ok(())
    }

    pub fn selector(&self) -> &SelectorOptions {
        &self.selector
    }

    /// The codes the run trigger would hand over, or the warning that stops it.
    pub fn runnable_codes(&self) -> Result<Vec<String>, RunError> {
        runnable_codes(&self.fields)
    }

    /// The "run" button: hands the collected codes to the selector in the
    /// active page and waits for it to finish. Outcomes are only logged.
    pub async fn run<H: TabHost>(&self, host: &mut H) -> Result<(), RunError> {
        run(&self.fields, host, &self.selector).await
    }
}

pub fn runnable_codes(fields: &FieldList) -> Result<Vec<String>, RunError> {
    let codes = fields.collect_codes();
    if codes.is_empty() {
        warn!("{}", RunError::NoCodes);
        return Err(RunError::NoCodes);
    }
    Ok(codes)
}

pub async fn run<H: TabHost>(fields: &FieldList, host: &mut H, options: &SelectorOptions) -> Result<(), RunError> {
    let codes = runnable_codes(fields)?;
    let Some(page) = host.active_page() else {
        warn!("{}", RunError::NoActivePage);
        return Err(RunError::NoActivePage);
    };
    debug!(count = codes.len(), "injecting section selector");
    select_sections(page, &codes, options).await;
    Ok(())
}
