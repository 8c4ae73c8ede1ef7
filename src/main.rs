use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser};
use tracing::{Level, debug, warn};

use dbc_format::{FormatOptions, PostProcessOptions, dbc, format_str, is_canonical};

#[derive(Parser, Debug)]
#[command(name = "dbc-format", version, about = "DBC formatter")]
struct Cli {
    /// Input .dbc file(s) and/or folder(s)
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Specify output path instead of overwriting the original
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Report files that are not canonical instead of rewriting them
    #[arg(long)]
    check: bool,

    /// Keep double spaces and " ;" inside quoted strings
    #[arg(long)]
    preserve_quoted_spaces: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level: Level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn has_dbc_extension(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("dbc"))
}

/// Expands directories (one level) to their `.dbc` files.
///
/// Paths without a `.dbc` extension are skipped with a warning.
fn collect_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = Vec::new();
    for path in paths {
        if path.is_file() {
            if has_dbc_extension(path) {
                files.push(path.clone());
            } else {
                warn!(path = %path.display(), "not a .dbc file, skipped");
            }
        } else if path.is_dir() {
            let entries = fs::read_dir(path)
                .with_context(|| format!("listing {}", path.display()))?;
            let mut found: Vec<PathBuf> = Vec::new();
            for entry in entries {
                let entry = entry.with_context(|| format!("listing {}", path.display()))?;
                let entry_path: PathBuf = entry.path();
                if entry_path.is_file() && has_dbc_extension(&entry_path) {
                    found.push(entry_path);
                }
            }
            found.sort();
            debug!(dir = %path.display(), count = found.len(), "expanded directory");
            files.extend(found);
        } else {
            warn!(path = %path.display(), "no such file or directory");
        }
    }
    Ok(files)
}

fn format_file(file: &Path, out: &Path, options: &FormatOptions) -> Result<()> {
    let text: String = dbc::read_text(file)?;
    let formatted: String =
        format_str(&text, options).with_context(|| format!("formatting {}", file.display()))?;
    dbc::save_to_file(out, &formatted)?;
    Ok(())
}

/// Prints every file that is not canonical; returns how many there were.
fn check_files(files: &[PathBuf], options: &FormatOptions) -> Result<usize> {
    let mut unformatted: usize = 0;
    for file in files {
        let text: String = dbc::read_text(file)?;
        let canonical: bool =
            is_canonical(&text, options).with_context(|| format!("checking {}", file.display()))?;
        if !canonical {
            println!("Would reformat {}", file.display());
            unformatted += 1;
        }
    }
    Ok(unformatted)
}

fn run(cli: Cli) -> Result<ExitCode> {
    if cli.output.is_some() && (cli.paths.len() > 1 || !cli.paths[0].is_file()) {
        bail!("--output/-o can only be used with 1 input file");
    }

    let options = FormatOptions {
        postprocess: PostProcessOptions {
            preserve_quoted_spaces: cli.preserve_quoted_spaces,
        },
    };

    let files: Vec<PathBuf> = collect_files(&cli.paths)?;

    if cli.check {
        let unformatted: usize = check_files(&files, &options)?;
        return Ok(if unformatted > 0 {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        });
    }

    for file in &files {
        let out: &Path = cli.output.as_deref().unwrap_or(file);
        match &cli.output {
            Some(target) => println!("Formatting {} to {}", file.display(), target.display()),
            None => println!("Formatting {}", file.display()),
        }
        format_file(file, out, &options)?;
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
