//! Export and import runs.
//!
//! Both directions share the same shape: read an index pad, fetch the pads
//! it lists, then transform page by page. Per-page failures are recorded on
//! a [`RunContext`] and never stop the run.

mod checkpoint;
mod context;
mod export;
mod import;
mod page;
mod run_log;

pub use checkpoint::Checkpoint;
pub use context::{RunContext, RunSummary};
pub use export::{export_corpus, export_page, ExportOptions};
pub use import::{
    build_pad_html, encode_non_ascii, ensure_pad_id, find_by_slug, header_value_text,
    import_corpus, load_pad_pages, merge_translation, ImportOptions, ImportSummary,
};
pub use page::{fetch_page, load_index, MissingPad, PadPage};
pub use run_log::RunLog;
