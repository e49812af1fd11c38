use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use logdiff::output;
use logdiff::{DiffSummary, Differ, LogLoader, ParserKind, RunConfig};

#[derive(Parser, Debug)]
#[command(name = "logdiff", version, about = "Compare two log files by template and time")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Report lines that are missing from or additional to the checked log
    Diff {
        baseline: PathBuf,
        checked: PathBuf,
        /// Leave matched (OK) lines out of the report
        #[arg(long = "collapse-ok", default_value_t = false)]
        collapse_ok: bool,
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Write the template of every line as CSV
    Templates {
        input: PathBuf,
        /// Omit the rendered template column
        #[arg(long = "no-template", default_value_t = false)]
        no_template: bool,
        #[command(flatten)]
        common: CommonArgs,
    },
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// JSON run configuration; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,
    /// Output file (stdout when omitted)
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,
    #[arg(long, value_enum)]
    parser: Option<ParserKind>,
    /// Timestamp format tried first, e.g. `yyyy-MM-dd HH:mm:ss` or `%Y-%m-%d %H:%M:%S`
    #[arg(long = "timestamp-format")]
    timestamp_format: Option<String>,
    /// Line layout, e.g. `"<Date> <Time> <Level> -"`
    #[arg(long = "line-format")]
    line_format: Option<String>,
    #[arg(long)]
    dictionary: Option<PathBuf>,
    #[arg(long, default_value_t = false)]
    debug: bool,
}

impl CommonArgs {
    fn into_config(self, input: Option<&Path>) -> anyhow::Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::from_json_file(path)
                .with_context(|| format!("reading config {}", path.display()))?,
            None => RunConfig::default(),
        };
        if let Some(input) = input {
            config.input_path = Some(input.to_path_buf());
        }
        if self.output.is_some() {
            config.output_path = self.output;
        }
        if let Some(parser) = self.parser {
            config.parser_type = parser;
        }
        if self.timestamp_format.is_some() {
            config.timestamp_format = self.timestamp_format;
        }
        if self.line_format.is_some() {
            config.line_format = self.line_format;
        }
        if self.dictionary.is_some() {
            config.dictionary_path = self.dictionary;
        }
        config.debug_mode |= self.debug;
        Ok(config)
    }
}

fn init_tracing(debug: bool) {
    let default = if debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn open_output(path: Option<&Path>) -> anyhow::Result<Box<dyn Write>> {
    Ok(match path {
        Some(p) => Box::new(BufWriter::new(
            File::create(p).with_context(|| format!("creating {}", p.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    })
}

fn run_diff(baseline: &Path, checked: &Path, config: &RunConfig) -> anyhow::Result<DiffSummary> {
    let mut differ = Differ::from_config(config)?;
    let (baseline_file, checked_file) = differ
        .load_pair_paths(baseline, checked)
        .with_context(|| format!("loading {} and {}", baseline.display(), checked.display()))?;

    let entries = differ.compare(&baseline_file, &checked_file)?;
    let rows = output::diff_rows(&entries, config.collapse_ok);

    let mut out = open_output(config.output_path.as_deref())?;
    if config.output_path.is_some() {
        output::write_diff_csv(&mut out, &rows)?;
    } else {
        out.write_all(output::render_diff(&rows).as_bytes())?;
    }
    out.flush()?;
    Ok(DiffSummary::from_entries(&entries))
}

fn run_templates(input: &Path, config: &RunConfig, with_template: bool) -> anyhow::Result<()> {
    config.validate()?;
    let mut parser = config.parser_type.build(config)?;
    let mut loader = LogLoader::from_config(config)?;
    let file = loader
        .load_path(input, parser.as_mut())
        .with_context(|| format!("loading {}", input.display()))?;

    let rows = output::template_rows(&file, parser.as_ref());
    let mut out = open_output(config.output_path.as_deref())?;
    if with_template {
        output::write_template_csv(&mut out, &rows)?;
    } else {
        output::write_event_csv(&mut out, &rows)?;
    }
    out.flush()?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logdiff::masking::prewarm_regexes();

    match cli.command {
        Command::Diff {
            baseline,
            checked,
            collapse_ok,
            common,
        } => {
            let mut config = common.into_config(Some(&checked))?;
            config.collapse_ok |= collapse_ok;
            init_tracing(config.debug_mode);

            let summary = run_diff(&baseline, &checked, &config)?;
            eprintln!(
                "ok: {}, missing: {}, additional: {}",
                summary.ok, summary.missing, summary.additional
            );
            if !summary.is_clean() {
                std::process::exit(1);
            }
        }
        Command::Templates {
            input,
            no_template,
            common,
        } => {
            let config = common.into_config(Some(&input))?;
            init_tracing(config.debug_mode);
            run_templates(&input, &config, !no_template)?;
        }
    }

    Ok(())
}
