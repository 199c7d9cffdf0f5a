use anyhow::{bail, Context};
use clap::Parser;
use platescope::config::{PipelineConfig, SimilarityThreshold, SortOrder};
use platescope::grouping::Grouping;
use platescope::pipeline::{self, RunOutcome};
use platescope::report;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "platescope", version, about = "Summarize license plate recognition logs")]
struct Cli {
    /// Plate recognition log (`Frame: N` markers followed by `- PLATE confidence: X` lines)
    input: Option<PathBuf>,

    /// Similarity threshold percentage (0-100) for merging plate readings
    threshold: Option<String>,

    /// Do not merge similar readings; one row per distinct plate text
    #[arg(long = "exact", default_value_t = false)] exact: bool,
    /// Sort rows by: confidence | first-frame
    #[arg(long = "sort", default_value = "confidence")] sort_by: String,
    /// Output format on stdout: table | json
    #[arg(long = "format", default_value = "table")] format: String,
    /// Summary table path (default: derived from the input name)
    #[arg(long = "csv")] csv: Option<PathBuf>,
    /// Report path (default: derived from the input name)
    #[arg(long = "report")] report: Option<PathBuf>,
    /// Skip writing the text report
    #[arg(long = "no-report", default_value_t = false)] no_report: bool,
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short = 'v', action = clap::ArgAction::Count)] verbose: u8,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "platescope=warn",
        1 => "platescope=info",
        _ => "platescope=debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn prompt(question: &str) -> io::Result<String> {
    print!("{question}");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(answer.trim().to_string())
}

/// Fill in the log path and threshold, asking on a terminal when the path was not given.
fn resolve_inputs(cli: &Cli) -> anyhow::Result<Option<(PathBuf, Option<String>)>> {
    if let Some(input) = &cli.input {
        return Ok(Some((input.clone(), cli.threshold.clone())));
    }
    if !atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }
    let path = prompt("Enter the path to your license plate log file: ").context("reading log path")?;
    if path.is_empty() {
        return Ok(None);
    }
    let threshold = if cli.exact {
        None
    } else {
        let t = prompt(&format!(
            "Enter similarity threshold percentage (0-100, default {}): ",
            SimilarityThreshold::default()
        ))
        .context("reading similarity threshold")?;
        Some(t)
    };
    Ok(Some((PathBuf::from(path), threshold)))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let sort: SortOrder = match cli.sort_by.parse() {
        Ok(s) => s,
        Err(e) => bail!(e),
    };
    let json = match cli.format.as_str() {
        "json" => true,
        "table" => false,
        other => bail!("unknown format '{other}' (expected table | json)"),
    };

    let Some((input, raw_threshold)) = resolve_inputs(&cli)? else {
        println!("No file path provided. Exiting.");
        return Ok(());
    };
    let grouping = if cli.exact {
        Grouping::Exact
    } else {
        Grouping::Similarity(SimilarityThreshold::resolve(raw_threshold.as_deref()))
    };

    let mut config = PipelineConfig::new(input, grouping).with_sort(sort);
    if let Some(csv) = &cli.csv { config = config.with_table_path(csv.clone()); }
    if cli.no_report {
        config = config.with_report_path(None);
    } else if let Some(path) = &cli.report {
        config = config.with_report_path(Some(path.clone()));
    }

    if !json {
        print!("{}", report::render_preamble(&config.input, &config.grouping));
    }

    let (summary, outputs) = match pipeline::run(&config) {
        RunOutcome::Completed { summary, outputs } => (summary, outputs),
        RunOutcome::Failed(_) | RunOutcome::Empty(_) => {
            println!("No data found or error occurred.");
            return Ok(());
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!();
    print!("{}", report::render_results(&summary.rows, &summary.grouping));
    for o in outputs.iter().filter(|o| o.is_ok()) {
        println!("{} saved to {}", o.kind.title(), o.path.display());
    }
    if let Some(stats) = &summary.stats {
        println!();
        print!("{}", report::render_statistics(stats));
    }
    Ok(())
}
