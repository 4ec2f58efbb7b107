use battlecode_tools::{config, output, process, scan, settings};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "battlecode-tools")]
#[command(about = "Image thumbnailer and development settings for the Battlecode website")]
#[command(version)]
struct Cli {
    /// Log debug details to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a thumbnail next to every image, then shrink the original
    Resize {
        /// Directory to process recursively
        #[arg(default_value = "img")]
        dir: PathBuf,

        /// Config file (defaults to resize.toml inside DIR)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Show what would be processed without writing anything
        #[arg(long)]
        dry_run: bool,
    },
    /// Inspect the backend's development settings
    #[command(subcommand)]
    Settings(SettingsCommand),
    /// Print a stock resize.toml with all options documented
    GenConfig,
}

#[derive(Subcommand)]
enum SettingsCommand {
    /// Print the resolved settings with credentials masked
    Show {
        /// Directory holding settings.toml and dev_settings_sensitive.toml
        #[arg(long, default_value = ".")]
        dir: PathBuf,

        #[arg(long, value_enum, default_value_t = Format::Toml)]
        format: Format,
    },
    /// Load and validate the settings, then print a summary
    Check {
        /// Directory holding settings.toml and dev_settings_sensitive.toml
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Toml,
    Json,
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("battlecode_tools=debug")
        } else {
            EnvFilter::new("battlecode_tools=info")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Resize {
            dir,
            config: config_path,
            dry_run,
        } => {
            let resize_config = match config_path {
                Some(path) => config::load_config_file(&path)?,
                None => config::load_config(&dir)?,
            };
            let plan = scan::scan(&dir, &resize_config)?;
            if dry_run {
                output::print_scan_output(&plan);
                return Ok(());
            }

            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_process_event(&event) {
                        println!("{}", line);
                    }
                }
            });
            let result = process::process(&plan, &resize_config, Some(tx));
            // The sender is dropped by now, so the printer drains and exits.
            printer
                .join()
                .map_err(|_| "progress printer thread panicked")?;
            let report = result?;
            for line in output::format_report(&report) {
                println!("{}", line);
            }
        }
        Command::Settings(SettingsCommand::Show { dir, format }) => {
            let loaded = settings::load_settings(&dir)?;
            let shown = loaded.redacted();
            match format {
                Format::Toml => print!("{}", toml::to_string_pretty(&shown)?),
                Format::Json => println!("{}", serde_json::to_string_pretty(&shown)?),
            }
        }
        Command::Settings(SettingsCommand::Check { dir }) => {
            let loaded = settings::load_settings(&dir)?;
            for line in output::format_settings_summary(&loaded) {
                println!("{}", line);
            }
            println!("==> Settings are valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
