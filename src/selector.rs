//! Walks the desired codes in order and ticks every matching section's
//! checkbox, pausing between codes so the page's own handlers can keep up.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::SelectorOptions;
use crate::page::{Click, SectionPage};

/// What happened to one matching container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchOutcome {
    Clicked,
    AlreadyChecked,
    NoCheckbox,
    Disabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CodeStatus {
    Selected { clicked: usize },
    /// Matched, but every checkbox was already ticked.
    AlreadySelected,
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionMatch {
    pub section: usize,
    pub outcome: MatchOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeReport {
    pub code: String,
    pub status: CodeStatus,
    pub matches: Vec<SectionMatch>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectionReport {
    pub codes: Vec<CodeReport>,
}

impl SelectionReport {
    pub fn clicked(&self) -> usize {
        self.codes
            .iter()
            .map(|c| match c.status {
                CodeStatus::Selected { clicked } => clicked,
                _ => 0,
            })
            .sum()
    }

    pub fn status_of(&self, code: &str) -> Option<CodeStatus> {
        self.codes.iter().find(|c| c.code == code).map(|c| c.status)
    }
}

/// Processes `codes` one at a time against whatever sections the page holds
/// at that moment. Matching is by substring of the container text.
pub async fn select_sections<P>(page: &mut P, codes: &[String], options: &SelectorOptions) -> SelectionReport
where
    P: SectionPage + ?Sized,
{
    select_sections_with(page, codes, options, |_, _| {}).await
}

/// Like [`select_sections`], calling `on_code` after each code is handled.
pub async fn select_sections_with<P, F>(
    page: &mut P,
    codes: &[String],
    options: &SelectorOptions,
    mut on_code: F,
) -> SelectionReport
where
    P: SectionPage + ?Sized,
    F: FnMut(usize, &CodeReport),
{
    let total = codes.len();
    let mut report = SelectionReport::default();

    for (i, code) in codes.iter().enumerate() {
        let position = i + 1;
        let code_report = select_code(page, code, position, total);
        if !matches!(code_report.status, CodeStatus::Selected { .. }) {
            warn!("⚠️ [{}/{}] Not found: {}", position, total, code);
        }
        on_code(position, &code_report);
        report.codes.push(code_report);

        tokio::time::sleep(options.delay()).await;
    }

    info!("🎉 All selections attempted.");
    report
}

fn select_code<P>(page: &mut P, code: &str, position: usize, total: usize) -> CodeReport
where
    P: SectionPage + ?Sized,
{
    let mut matches = Vec::new();

    for section in 0..page.section_count() {
        let is_match = page.section_text(section).map_or(false, |text| text.contains(code));
        if !is_match {
            continue;
        }
        let outcome = match page.checkbox(section) {
            None => MatchOutcome::NoCheckbox,
            Some(cb) if cb.checked => MatchOutcome::AlreadyChecked,
            Some(_) => match page.click_checkbox(section) {
                Click::Toggled { checked: true } => MatchOutcome::Clicked,
                Click::Toggled { checked: false } => MatchOutcome::AlreadyChecked,
                Click::Disabled => MatchOutcome::Disabled,
                Click::NoCheckbox => MatchOutcome::NoCheckbox,
            },
        };
        debug!(code, section, ?outcome, "section matched");
        if outcome == MatchOutcome::Clicked {
            info!("✅ [{}/{}] Selected: {}", position, total, code);
        }
        matches.push(SectionMatch { section, outcome });
    }

    let clicked = matches.iter().filter(|m| m.outcome == MatchOutcome::Clicked).count();
    let status = if clicked > 0 {
        CodeStatus::Selected { clicked }
    } else if matches.iter().any(|m| m.outcome == MatchOutcome::AlreadyChecked) {
        CodeStatus::AlreadySelected
    } else {
        CodeStatus::NotFound
    };

    CodeReport {
        code: code.to_string(),
        status,
        matches,
    }
}
