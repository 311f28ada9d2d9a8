use anyhow::{bail, Result};
use clap::Parser;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use tracing::{info, warn};

use csv_navigator::app::{run_app, SessionSettings};
use csv_navigator::config::config::Config;
use csv_navigator::data::datatable_loaders::Delimiter;
use csv_navigator::input::{CommandSource, LineEditorInput, StdinInput};
use csv_navigator::ui::chart_renderer::TextChartRenderer;
use csv_navigator::ui::presenter::{PresenterOptions, TerminalPresenter};
use csv_navigator::ui::typewriter::Typewriter;
use csv_navigator::utils::app_paths::AppPaths;
use csv_navigator::utils::logging::init_tracing;

/// Page through, filter and chart a CSV file from the terminal
#[derive(Debug, Parser)]
#[command(name = "csv-navigator", version, about)]
struct Args {
    /// CSV file to open; prompted for when omitted
    path: Option<PathBuf>,

    /// Rows per page
    #[arg(long)]
    page_size: Option<usize>,

    /// Field delimiter: a single character, "tab" or "auto"
    #[arg(long)]
    delimiter: Option<String>,

    /// Skip the banner and confirmation prompt
    #[arg(long)]
    no_welcome: bool,

    /// Type messages out one character at a time
    #[arg(long)]
    typewriter: bool,

    /// Disable the bar and scatter chart commands
    #[arg(long)]
    no_charts: bool,

    /// Read settings from this file instead of the default location
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write a commented default config file and exit
    #[arg(long)]
    generate_config: bool,
}

fn generate_config() -> Result<()> {
    let path = Config::get_config_path()?;
    Config::write_default(&path)?;
    println!("Configuration written to {}", path.display());
    Ok(())
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    if let Some(page_size) = args.page_size {
        config.display.page_size = page_size;
    }
    if let Some(delimiter) = &args.delimiter {
        if Delimiter::parse(delimiter).is_none() {
            bail!("Invalid delimiter '{}'", delimiter);
        }
        config.loader.delimiter = delimiter.clone();
    }
    if args.no_welcome {
        config.display.show_welcome = false;
    }
    if args.typewriter {
        config.display.typewriter = true;
    }
    if args.no_charts {
        config.charts.enabled = false;
    }

    config.validate()?;
    Ok(config)
}

fn command_source(config: &Config) -> Result<Box<dyn CommandSource>> {
    if !io::stdin().is_terminal() {
        return Ok(Box::new(StdinInput::new(io::stdin().lock(), io::stdout())));
    }

    let history = if config.behavior.enable_history {
        match AppPaths::history_file() {
            Ok(path) => Some((path, config.behavior.max_history_entries)),
            Err(e) => {
                warn!("History disabled: {}", e);
                None
            }
        }
    } else {
        None
    };
    Ok(Box::new(LineEditorInput::new(history)?))
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.generate_config {
        return generate_config();
    }

    // Logging is best effort; the session works without it
    match AppPaths::log_dir().and_then(|dir| init_tracing(&dir)) {
        Ok(path) => {
            if std::env::var_os(csv_navigator::utils::logging::LOG_MIRROR_ENV).is_some() {
                eprintln!("Logs: {}", path.display());
            }
        }
        Err(e) => eprintln!("Logging disabled: {:#}", e),
    }

    let config = load_config(&args)?;
    info!("Starting with {:?}", config);

    let settings = SessionSettings {
        navigator: config.navigator_options(),
        load: config.load_options()?,
        show_welcome: config.display.show_welcome,
        use_color: config.display.use_color,
    };

    let presenter_options = PresenterOptions {
        clear_screen: config.display.clear_screen,
        use_color: config.display.use_color,
        typewriter: config
            .display
            .typewriter
            .then(|| Typewriter::from_millis(config.display.typewriter_delay_ms)),
    };
    let mut presenter = TerminalPresenter::new(io::stdout(), presenter_options);
    if config.charts.enabled {
        presenter = presenter.with_charts(Box::new(TextChartRenderer::new(
            config.charts.width,
            config.charts.height,
        )));
    }

    let mut input = command_source(&config)?;
    let outcome = run_app(
        args.path,
        &settings,
        input.as_mut(),
        &mut presenter,
        &mut io::stdout(),
    )?;

    info!("Exiting with {:?}", outcome);
    std::process::exit(outcome.exit_code());
}
