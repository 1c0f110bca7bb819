//! Pads to corpus.
//!
//! Reads the index pad, fetches every listed pad, converts the bodies of
//! pages in the wanted volume to structured HTML and collects them into
//! manuals.

use log::debug;

use crate::body::extract_body;
use crate::corpus::{Corpus, CorpusPage, Manual};
use crate::error::Result;
use crate::pad::PadService;
use crate::parser::Section;
use crate::transcode::WikiToHtml;

use super::page::{fetch_page, load_index, MissingPad};
use super::RunContext;

/// What to export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    pub index_pad: String,
    pub volume: i64,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            index_pad: "ta-modules".to_string(),
            volume: 1,
        }
    }
}

/// Export every page listed in the index pad.
///
/// Only an unreadable index fails the export. Problems with single pages
/// are recorded on the context and the page is left out.
pub fn export_corpus(
    pads: &dyn PadService,
    transcoder: &WikiToHtml<'_>,
    options: &ExportOptions,
    ctx: &mut RunContext,
) -> Result<Corpus> {
    let sections = load_index(pads, &options.index_pad)?;
    debug!("index {} lists {} sections", options.index_pad, sections.len());

    let manuals = sections
        .iter()
        .map(|section| export_section(pads, transcoder, section, options.volume, ctx))
        .collect();

    Ok(Corpus::new(manuals))
}

fn export_section(
    pads: &dyn PadService,
    transcoder: &WikiToHtml<'_>,
    section: &Section,
    volume: i64,
    ctx: &mut RunContext,
) -> Manual {
    let mut pages = Vec::new();

    for pad_id in &section.pad_ids {
        ctx.heading(
            "Retrieving",
            &format!("{}:{}", section.name.to_lowercase(), pad_id),
        );
        if let Some(page) = export_page(pads, transcoder, &section.name, pad_id, volume, ctx) {
            pages.push(page);
        }
    }

    Manual {
        name: section.name.clone(),
        pages,
    }
}

/// Export a single pad.
///
/// Returns `None` for pages that failed and for pages that are simply not
/// part of the export: another volume, or an empty body.
pub fn export_page(
    pads: &dyn PadService,
    transcoder: &WikiToHtml<'_>,
    section: &str,
    pad_id: &str,
    volume: i64,
    ctx: &mut RunContext,
) -> Option<CorpusPage> {
    let page = fetch_page(pads, section, pad_id, MissingPad::Report, ctx)?;

    if page.header.volume() != Some(volume) {
        debug!("skipping {}: not in volume {}", pad_id, volume);
        return None;
    }

    if page.body.trim().is_empty() {
        debug!("skipping {}: empty body", pad_id);
        return None;
    }

    let html = match transcoder.convert(&page.body) {
        Ok(html) => html,
        Err(e) => {
            ctx.error(format!("{}: {}", pad_id, e));
            return None;
        }
    };

    match CorpusPage::from_header(&page.header, extract_body(&html)) {
        Ok(page) => Some(page),
        Err(e) => {
            ctx.error(format!("{}: {}", pad_id, e));
            None
        }
    }
}
