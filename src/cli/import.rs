//! Import command implementation.
//!
//! Writes a translated corpus into a language's pads. The language code and
//! corpus file are asked for on stdin when not given as flags.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::Args;

use crate::config::SyncConfig;
use crate::corpus::{timestamp_now, Corpus};
use crate::error::{Result, SyncError};
use crate::output::{plural, Printer};
use crate::sync::{import_corpus, ImportOptions, RunContext, RunLog};

/// Import a translated JSON corpus into a language's pads
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Target language code
    #[arg(short, long)]
    pub lang: Option<String>,

    /// JSON corpus to import
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Delete and recreate language pads that already exist
    #[arg(long)]
    pub recreate: bool,
}

/// Log file name for an import run into `lang`.
pub fn import_log_name(lang: &str) -> String {
    format!("{}ta_json_to_etherpad.log.txt", lang)
}

pub fn run(args: ImportArgs, config: &SyncConfig, printer: &Printer) -> Result<()> {
    let mut stdin = io::stdin().lock();

    let lang = match args.lang.filter(|l| !l.trim().is_empty()) {
        Some(lang) => lang,
        None => prompt(&mut stdin, "Enter the target language code: ")?.ok_or_else(|| {
            SyncError::MissingInput {
                message: "no language code was supplied".to_string(),
                help: Some("Pass it with -l/--lang".to_string()),
            }
        })?,
    };

    let file = match args.file {
        Some(file) => file,
        None => prompt(&mut stdin, "Enter the JSON file name: ")?
            .map(PathBuf::from)
            .ok_or_else(|| SyncError::MissingInput {
                message: "no JSON file was supplied".to_string(),
                help: Some("Pass it with -f/--file".to_string()),
            })?,
    };

    let log = RunLog::create(&config.log_path(&import_log_name(&lang)))?.with_printer(*printer);
    let mut ctx = RunContext::new(log);
    ctx.heading("Started", &format!("most recent run: {}", timestamp_now()));
    ctx.heading("Loading", &format!("JSON file: {}", file.display()));
    let corpus = Corpus::load(&file)?;

    ctx.heading("Opening", "Etherpad");
    let pads = config.connect()?;
    let converter = config.build_converter();

    let options = ImportOptions {
        lang,
        index_pad: config.index_pad.clone(),
        recreate: args.recreate,
    };
    let summary = import_corpus(&pads, converter.as_ref(), &corpus, &options, &mut ctx)?;

    printer.status(
        "Updated",
        &format!(
            "{} in {}",
            plural(summary.updated, "pad", "pads"),
            options.lang
        ),
    );
    ctx.finish("Finished copying");

    Ok(())
}

/// Ask a question on stderr and read one line of answer.
///
/// A blank answer counts as no answer.
pub fn prompt(input: &mut impl BufRead, question: &str) -> Result<Option<String>> {
    let mut stderr = io::stderr();
    write!(stderr, "{}", question)?;
    stderr.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;

    let answer = line.trim();
    Ok((!answer.is_empty()).then(|| answer.to_string()))
}
