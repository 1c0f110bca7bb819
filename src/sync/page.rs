//! Reading pages out of pads.

use crate::error::{Result, SyncError};
use crate::pad::{PadError, PadService};
use crate::parser::{parse_header, parse_index, split_page, HeaderError, PageHeader, Section};

use super::RunContext;

/// A page as read from its pad: header parsed, body still raw wiki text.
#[derive(Debug, Clone, PartialEq)]
pub struct PadPage {
    /// Manual the page is listed under.
    pub section: String,
    pub pad_id: String,
    pub header: PageHeader,
    pub body: String,
}

/// How a missing pad is treated when fetching pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingPad {
    /// Count it as an error.
    Report,
    /// Skip it without a trace.
    Skip,
}

/// Read the index pad and split it into sections.
///
/// An index that cannot be read ends the run.
pub fn load_index(pads: &dyn PadService, index_pad: &str) -> Result<Vec<Section>> {
    let text = pads.get_text(index_pad).map_err(|e| match e {
        PadError::Unauthorized(message) => SyncError::Auth {
            message,
            help: Some("Check the API key file configured under etherpad.api_key_file".to_string()),
        },
        other => SyncError::Pad(other),
    })?;

    Ok(parse_index(&text))
}

/// Fetch a pad and parse its header.
///
/// Pad, header and validation problems are recorded on the context. Pages
/// whose header fails validation are still returned, tagged invalid.
pub fn fetch_page(
    pads: &dyn PadService,
    section: &str,
    pad_id: &str,
    missing: MissingPad,
    ctx: &mut RunContext,
) -> Option<PadPage> {
    let text = match pads.get_text(pad_id) {
        Ok(text) => text,
        Err(e) if e.is_not_found() && missing == MissingPad::Skip => return None,
        Err(e) => {
            ctx.error(e);
            return None;
        }
    };

    let Some(parts) = split_page(&text) else {
        ctx.error(format!("Header not found for {}", pad_id));
        return None;
    };

    let parsed = match parse_header(parts.header) {
        Ok(parsed) => parsed,
        Err(HeaderError::Empty) => {
            ctx.error(format!("No header data found for {}", pad_id));
            return None;
        }
        Err(e) => {
            ctx.error(format!("{}: {}", pad_id, e));
            return None;
        }
    };
    ctx.record_diagnostics(pad_id, &parsed.diagnostics);

    Some(PadPage {
        section: section.to_string(),
        pad_id: pad_id.to_string(),
        header: parsed.header,
        body: parts.body.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pad::MemoryPads;
    use pretty_assertions::assert_eq;

    const INTRO: &str = "---\ntitle: Introduction to tA\nmanual: Introduction\nslug: intro\nvolume: 1\n---\nWelcome to tA.\n";

    #[test]
    fn test_fetch_valid_page() {
        let pads = MemoryPads::new().with_text("intro", INTRO);
        let mut ctx = RunContext::silent();

        let page = fetch_page(&pads, "Introduction", "intro", MissingPad::Report, &mut ctx).unwrap();

        assert_eq!(page.section, "Introduction");
        assert_eq!(page.header.slug(), Some("intro"));
        assert_eq!(page.body, "Welcome to tA.\n");
        assert!(!page.header.is_invalid());
        assert_eq!(ctx.error_count(), 0);
    }

    #[test]
    fn test_missing_pad_reported_or_skipped() {
        let pads = MemoryPads::new();

        let mut ctx = RunContext::silent();
        assert!(fetch_page(&pads, "Checking", "gone", MissingPad::Report, &mut ctx).is_none());
        assert_eq!(ctx.error_count(), 1);

        let mut ctx = RunContext::silent();
        assert!(fetch_page(&pads, "Checking", "gone", MissingPad::Skip, &mut ctx).is_none());
        assert_eq!(ctx.error_count(), 0);
    }

    #[test]
    fn test_headerless_page_is_an_error() {
        let pads = MemoryPads::new().with_text("plain", "Just text\n");
        let mut ctx = RunContext::silent();

        assert!(fetch_page(&pads, "Process", "plain", MissingPad::Report, &mut ctx).is_none());
        assert_eq!(ctx.error_count(), 1);
    }

    #[test]
    fn test_empty_header_is_an_error() {
        let pads = MemoryPads::new().with_text("empty", "---\n\n---\nBody\n");
        let mut ctx = RunContext::silent();

        assert!(fetch_page(&pads, "Process", "empty", MissingPad::Report, &mut ctx).is_none());
        assert_eq!(ctx.error_count(), 1);
    }

    #[test]
    fn test_invalid_header_is_kept_and_counted() {
        let pads = MemoryPads::new().with_text(
            "ta-bad",
            "---\ntitle: Bad\nmanual: Checking\nslug: bad-slug\nvolume: 1\n---\nBody\n",
        );
        let mut ctx = RunContext::silent();

        let page = fetch_page(&pads, "Checking", "ta-bad", MissingPad::Report, &mut ctx).unwrap();
        assert!(page.header.is_invalid());
        assert_eq!(ctx.error_count(), 1);
    }

    #[test]
    fn test_unreadable_index_is_fatal() {
        let pads = MemoryPads::new();
        assert!(matches!(
            load_index(&pads, "ta-modules"),
            Err(SyncError::Pad(PadError::NotFound(_)))
        ));
    }
}
