use std::fs;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};

use jyut_cli::commands::batch::{self, BatchOptions, OutputFormat};
use jyut_cli::commands::{cache_ops, config_ops, reverse, romanize};
use jyut_cli::trace_init::init_tracing;
use jyut_core::backend;
use jyut_core::cache::resolve_path;
use jyut_core::settings::{self, settings};

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

#[derive(Parser)]
#[command(
    name = "jyuttool",
    about = "Cantonese readings for Chinese text, as Sidney Lau or Yale",
    long_about = "Reads lines of `hanzi` or `hanzi#pinyin` from stdin and prints one \
                  romanized line per input line. Proof-read Pinyin after `#` is used to \
                  pick between readings and to group syllables into words."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Lookup cache file (default: $JYUTPING_CACHE, else a file in the temp dir)
    #[arg(long, global = true)]
    cache: Option<PathBuf>,

    /// Settings TOML replacing the built-in defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output romanization
    #[arg(long, value_enum, default_value_t = OutputFormat::Lau)]
    format: OutputFormat,

    /// Join all syllables of a line with hyphens
    #[arg(long)]
    hyphenate_all: bool,

    /// Use sung rather than spoken readings where they differ
    #[arg(long)]
    song_lyrics: bool,

    /// Print an empty line when the Pinyin words do not fit the reading
    #[arg(long)]
    omit_misaligned: bool,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Convert Sidney Lau lines from stdin back to Jyutping (best effort)
    FromLau {
        /// Print Yale instead of Jyutping
        #[arg(long)]
        yale: bool,
    },
    /// Show the lookup cache location and entry counts
    CacheInfo,
    /// Export default settings as TOML
    SettingsExport,
    /// Validate a custom settings TOML file
    SettingsValidate {
        /// Path to the TOML file
        file: String,
    },
}

fn read_stdin_lines() -> Vec<String> {
    let mut input = String::new();
    die!(
        io::stdin().read_to_string(&mut input),
        "Error reading stdin: {}"
    );
    batch::split_lines(&input)
}

fn print_lines(lines: &[String]) {
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for line in lines {
        die!(writeln!(out, "{line}"), "Error writing output: {}");
    }
    die!(out.flush(), "Error writing output: {}");
}

fn load_config(path: &Path) {
    let content = die!(
        fs::read_to_string(path),
        "Error reading {}: {}",
        path.display()
    );
    die!(settings::init_custom(content), "Error in settings: {}");
}

fn run_romanize(cli: &Cli) {
    let lines = read_stdin_lines();
    let cache_path = resolve_path(cli.cache.as_deref(), &settings().cache);
    let backend = die!(
        backend::from_settings(&settings().backend),
        "Error starting lookup backend: {}"
    );
    let mut resolver = romanize::open_resolver(&cache_path, backend);
    let opts = BatchOptions {
        format: cli.format,
        hyphenate_all: cli.hyphenate_all,
        song_lyrics: cli.song_lyrics,
        omit_misaligned: cli.omit_misaligned,
    };
    let output = die!(romanize::romanize(&mut resolver, &lines, &opts), "Error: {}");
    print_lines(&output);
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    if let Some(path) = &cli.config {
        load_config(path);
    }

    match &cli.command {
        None => run_romanize(&cli),
        Some(Command::FromLau { yale }) => {
            let lines = read_stdin_lines();
            print_lines(&reverse::from_lau(&lines, *yale));
        }
        Some(Command::CacheInfo) => cache_ops::cache_info(cli.cache.as_deref()),
        Some(Command::SettingsExport) => config_ops::settings_export(),
        Some(Command::SettingsValidate { file }) => config_ops::settings_validate(file),
    }
}
