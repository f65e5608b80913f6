use book_binder::config::{self, BinderConfig, ConfigError};
use book_binder::layout::TemplateLayouts;
use book_binder::output;
use book_binder::pipeline::{self, BuildStatus};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "book-binder")]
#[command(about = "Build a directory of markdown, styles and assets into a static site")]
#[command(long_about = "\
Build a directory of markdown, styles and assets into a static site

Every file in INPUT is written to the same relative location in OUTPUT:

  content/
  ├── +config.toml          # Build config (optional, never copied)
  ├── +layout.html          # Layout for documents at or below this level
  ├── index.md              # → index.html, wrapped in the nearest layout
  ├── styles/
  │   ├── main.scss         # → main.css, imports inlined and compiled
  │   └── _vars.scss        # Fragment, only reachable through @import
  └── img/cover.jpg         # Copied, skipped when the output is newer

Names starting with `_` or `+` are never written to OUTPUT.

Run 'book-binder --gen-config' to print a documented +config.toml.")]
#[command(version)]
struct Cli {
    /// Content directory
    input: Option<PathBuf>,

    /// Output directory (created if missing)
    output: Option<PathBuf>,

    /// Config file to use instead of INPUT/+config.toml
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Copy every unmanaged file, ignoring timestamps
    #[arg(long)]
    force: bool,

    /// Log build phases to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Print a stock +config.toml with all options documented
    #[arg(long, exclusive = true)]
    gen_config: bool,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version arrive here too and go to stdout.
            let status = if e.use_stderr() {
                BuildStatus::Usage
            } else {
                BuildStatus::Success
            };
            let _ = e.print();
            return status.into();
        }
    };

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if cli.gen_config {
        print!("{}", config::stock_config_toml());
        return BuildStatus::Success.into();
    }

    let Some(input) = cli.input else {
        eprintln!("Please provide an input directory.");
        return BuildStatus::Usage.into();
    };
    let Some(output_root) = cli.output else {
        eprintln!("Please provide an output directory.");
        return BuildStatus::Usage.into();
    };

    let mut config = match load_config(&input, cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return BuildStatus::Usage.into();
        }
    };
    if cli.force {
        config.copy.incremental = false;
    }

    run(&input, &output_root, &config).into()
}

fn load_config(input: &Path, explicit: Option<&Path>) -> Result<BinderConfig, ConfigError> {
    match explicit {
        Some(path) => config::load_config_file(path),
        None => config::load_config(input),
    }
}

fn run(input: &Path, output_root: &Path, config: &BinderConfig) -> BuildStatus {
    output::print_banner(input, output_root);

    let layouts = TemplateLayouts::new(config.layout.file_name.as_str());
    let (tx, rx) = std::sync::mpsc::channel();
    let printer = {
        let input = input.to_path_buf();
        let output_root = output_root.to_path_buf();
        std::thread::spawn(move || {
            for event in rx {
                for line in output::format_build_event(&event, &input, &output_root) {
                    println!("{}", line);
                }
            }
        })
    };

    let result = pipeline::build(input, output_root, config, &layouts, Some(tx));
    if printer.join().is_err() {
        tracing::warn!("Output thread panicked");
    }

    match &result {
        Ok(report) => output::print_summary(report),
        Err(e) => eprintln!("Error: {e}"),
    }
    BuildStatus::from_result(&result)
}
