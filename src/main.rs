//! CLI entrypoint for `autocrack`.
//!
//! Validates the hash file and wordlist, loads the attempt ledger, runs
//! hashcat once per candidate mode through the library engine, prints a
//! terminal summary, and optionally writes CSV/TXT exports when an output
//! directory is provided.
use std::fs;
use std::path::PathBuf;

use anyhow::{Result, bail};
use autocrack::{
    attempt::ModeId,
    engine::{DetectStrategy, Engine, RunConfig},
    error::{AutoCrackError, ExitCode},
    export::{save_cracked_csv, save_hash_pass_txt},
    hashcat::{DEFAULT_HASHCAT_BIN, Hashcat},
    hashes::load_hash_file,
    io::{DEFAULT_MMAP_THRESHOLD_BYTES, is_non_empty_file},
    ledger::{DEFAULT_LEDGER_FILE, Ledger},
    report::render_summary,
    signal::{ShutdownHandler, install_handler},
};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use log::{LevelFilter, error, info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "autocrack",
    version,
    about = "Run hashcat against every candidate hash mode, skipping what was already tried"
)]
struct Args {
    /// File with one hash per line ('#' starts a comment)
    hash_file: PathBuf,

    /// Wordlist for the straight attack
    wordlist: PathBuf,

    /// Attempt ledger (JSON)
    #[arg(long = "ledger", env = "AUTOCRACK_LEDGER", default_value = DEFAULT_LEDGER_FILE)]
    ledger: PathBuf,

    /// hashcat binary
    #[arg(long = "hashcat", env = "AUTOCRACK_HASHCAT", default_value = DEFAULT_HASHCAT_BIN)]
    hashcat: PathBuf,

    /// How candidate modes are detected
    #[arg(long = "detect", value_enum, default_value_t = DetectArg::PerHash)]
    detect: DetectArg,

    /// Only try these mode ids (repeatable)
    #[arg(short = 'm', long = "mode")]
    modes: Vec<ModeId>,

    /// Directory for scratch subset and potfiles (default: system temp dir)
    #[arg(long = "scratch-dir")]
    scratch_dir: Option<PathBuf>,

    /// Override mmap threshold in bytes. If zero, disable mmap.
    #[arg(long = "mmap-threshold", default_value_t = DEFAULT_MMAP_THRESHOLD_BYTES)]
    mmap_threshold: u64,

    /// Path to the output directory
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Increase verbosity (-v, -vv)
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,

    /// Control color output (auto, always, never)
    #[arg(long = "color", value_enum, default_value_t = ColorChoice::Auto)]
    color: ColorChoice,

    /// Suppress progress and summary output (still writes exports if -o is provided)
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ColorChoice {
    Auto,
    Always,
    Never,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DetectArg {
    PerHash,
    File,
}

impl From<DetectArg> for DetectStrategy {
    fn from(d: DetectArg) -> Self {
        match d {
            DetectArg::PerHash => DetectStrategy::PerHash,
            DetectArg::File => DetectStrategy::File,
        }
    }
}

fn init_logger(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    let _ = env_logger::Builder::from_default_env()
        .filter_level(level)
        .try_init();
}

fn verify_inputs(args: &Args) -> Result<()> {
    if !is_non_empty_file(&args.hash_file) {
        bail!(
            "hash file '{}' does not exist or is empty",
            args.hash_file.display()
        );
    }
    if !is_non_empty_file(&args.wordlist) {
        bail!(
            "wordlist '{}' does not exist or is empty",
            args.wordlist.display()
        );
    }
    Ok(())
}

fn run_config(args: &Args) -> RunConfig {
    let mut cfg = RunConfig::new(&args.hash_file, &args.wordlist);
    cfg.ledger_path = args.ledger.clone();
    cfg.detect = args.detect.into();
    cfg.modes = args.modes.clone();
    cfg.scratch_dir = args.scratch_dir.clone();
    cfg.mmap_threshold = if args.mmap_threshold == 0 {
        u64::MAX
    } else {
        args.mmap_threshold
    };
    cfg
}

fn exit_with(code: ExitCode) -> ! {
    std::process::exit(code.as_i32())
}

fn main() {
    let args = Args::parse();
    init_logger(args.verbose);
    // Configure color policy
    match args.color {
        ColorChoice::Always => {
            colored::control::set_override(true);
        }
        ColorChoice::Never => {
            colored::control::set_override(false);
        }
        ColorChoice::Auto => {}
    }
    if let Err(e) = verify_inputs(&args) {
        error!("{}", e);
        exit_with(ExitCode::InvalidInput);
    }
    let shutdown = install_handler().unwrap_or_else(|e| {
        warn!("{} (Ctrl+C will not clean up scratch files)", e);
        ShutdownHandler::new()
    });
    let cfg = run_config(&args);

    let hashes = match load_hash_file(&cfg.hash_file, cfg.mmap_threshold) {
        Ok(h) if h.is_empty() => {
            error!("no hashes found in {}", cfg.hash_file.display());
            exit_with(ExitCode::InvalidInput);
        }
        Ok(h) => h,
        Err(e) => {
            error!("failed to read {}: {:#}", cfg.hash_file.display(), e);
            exit_with(ExitCode::InvalidInput);
        }
    };

    let hashcat = Hashcat::new(&args.hashcat);
    match hashcat.probe_version() {
        Ok(v) => info!("using {} {}", hashcat.bin().display(), v),
        Err(e) => {
            error!("{}", AutoCrackError::from(e));
            exit_with(ExitCode::ToolUnavailable);
        }
    }

    let mut ledger = match Ledger::load(&cfg.ledger_path) {
        Ok(l) => l,
        Err(e) => {
            error!("{}", e);
            exit_with(ExitCode::LedgerFailure);
        }
    };

    if !args.quiet {
        println!(
            "→ Enumerating possible modes for {} ({} hash(es)) …",
            cfg.hash_file.display(),
            hashes.len()
        );
    }
    let engine = Engine::new(&hashcat)
        .with_shutdown(shutdown)
        .with_progress(!args.quiet);
    let report = match engine.run(&cfg, &hashes, &mut ledger) {
        Ok(r) => r,
        Err(e) => {
            error!("{}", e);
            exit_with(e.exit_code());
        }
    };

    if !args.quiet {
        println!();
        println!("{}", render_summary(&report));
    }

    if let Some(outdir) = args.output {
        if let Err(e) = fs::create_dir_all(&outdir) {
            error!(
                "failed to create output directory {}: {}",
                outdir.display(),
                e
            );
            exit_with(ExitCode::ExportFailure);
        }
        let ts = chrono::Local::now().format("%Y.%m.%d_%H.%M.%S");
        let csv = outdir.join(format!("autocrack_cracked_{}.csv", ts));
        let txt = outdir.join(format!("autocrack_hash_pass_{}.txt", ts));
        if let Err(e) = save_cracked_csv(&report, &csv) {
            error!("failed to write {}: {}", csv.display(), e);
            exit_with(ExitCode::ExportFailure);
        }
        if let Err(e) = save_hash_pass_txt(&report, &txt) {
            error!("failed to write {}: {}", txt.display(), e);
            exit_with(ExitCode::ExportFailure);
        }
    }

    if report.interrupted {
        exit_with(ExitCode::Interrupted);
    }
    if !args.quiet {
        println!("{}", "All done :D".bold().green());
    }
}
