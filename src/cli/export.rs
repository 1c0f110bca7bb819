//! Export command implementation.
//!
//! Reads every pad listed in the index pad and writes the JSON corpus.

use std::path::PathBuf;

use clap::Args;
use log::debug;

use crate::config::SyncConfig;
use crate::corpus::timestamp_now;
use crate::error::Result;
use crate::output::{display_path, plural, Printer};
use crate::sync::{export_corpus, Checkpoint, ExportOptions, RunContext, RunLog};
use crate::transcode::WikiToHtml;

/// Log file name for export runs.
pub const EXPORT_LOG: &str = "ta_json.log.txt";

/// Export the pads listed in the index pad to a JSON corpus
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Corpus file to write (defaults to `output` in the config)
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Only export pages of this volume
    #[arg(long)]
    pub volume: Option<i64>,

    /// Pretty-print the JSON
    #[arg(long)]
    pub pretty: bool,
}

pub fn run(args: ExportArgs, config: &SyncConfig, printer: &Printer) -> Result<()> {
    let output = args.output.unwrap_or_else(|| config.output.clone());
    let options = ExportOptions {
        index_pad: config.index_pad.clone(),
        volume: args.volume.unwrap_or(config.volume),
    };

    let log = RunLog::create(&config.log_path(EXPORT_LOG))?.with_printer(*printer);
    let mut ctx = RunContext::new(log);
    ctx.heading("Started", &format!("most recent run: {}", timestamp_now()));
    ctx.heading("Checking", "for changes in Etherpad");

    let checkpoint = Checkpoint::new(&config.checkpoint);
    match checkpoint.read() {
        Some(last) => debug!("last clean export at {}", last),
        None => debug!("no clean export recorded in {}", checkpoint.path().display()),
    }

    let pads = config.connect()?;
    let converter = config.build_converter();
    let transcoder = WikiToHtml::new(converter.as_ref(), &config.transcode_options());

    let corpus = export_corpus(&pads, &transcoder, &options, &mut ctx)?;
    corpus.write(&output, args.pretty)?;

    printer.status(
        "Wrote",
        &format!(
            "{} in {} to {}",
            plural(corpus.page_count(), "page", "pages"),
            plural(corpus.manuals.len(), "manual", "manuals"),
            display_path(&output)
        ),
    );

    let summary = ctx.finish("Finished updating");
    if summary.is_clean() {
        checkpoint.record_now()?;
    } else {
        printer.warning("Skipped", &format!("checkpoint update, {}", summary));
    }

    Ok(())
}
