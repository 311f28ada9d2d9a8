//! Startup flow around a navigation session: welcome banner, dataset
//! selection and loading.

use anyhow::Result;
use crossterm::style::Stylize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::data::datatable::DataTable;
use crate::data::datatable_loaders::{load_csv_to_datatable, LoadError, LoadOptions};
use crate::input::CommandSource;
use crate::navigator::{Navigator, NavigatorOptions};
use crate::output::Notice;
use crate::ui::presenter::Presenter;

pub const CONFIRM_PROMPT: &str = "Deseja continuar? (s para Sim, q para Sair): ";
pub const PATH_PROMPT: &str = "Caminho do arquivo CSV: ";
pub const INVALID_CONFIRMATION: &str =
    "Entrada inválida! Digite 's' para continuar ou 'q' para sair.";

const RULE: &str = "====================================";

#[derive(Debug, Clone, Default)]
pub struct SessionSettings {
    pub navigator: NavigatorOptions,
    pub load: LoadOptions,
    pub show_welcome: bool,
    pub use_color: bool,
}

/// How the program ended, mapped to an exit status by `main`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    Completed,
    Declined,
    LoadFailed,
}

impl SessionOutcome {
    pub fn exit_code(self) -> i32 {
        match self {
            SessionOutcome::Completed | SessionOutcome::Declined => 0,
            SessionOutcome::LoadFailed => 1,
        }
    }
}

pub fn print_banner(out: &mut dyn Write, use_color: bool) -> Result<()> {
    writeln!(out, "{}", RULE)?;
    if use_color {
        writeln!(out, "{}", "            DATA QUALITY".bold().cyan())?;
    } else {
        writeln!(out, "            DATA QUALITY")?;
    }
    writeln!(out, "{}", RULE)?;
    writeln!(out)?;
    writeln!(out, "Bem-vindo ao sistema de navegação CSV.")?;
    writeln!(out, "Aqui você pode visualizar e filtrar os dados do CSV.")?;
    writeln!(out, "Digite 'h' a qualquer momento para exibir a ajuda.")?;
    writeln!(out, "{}", RULE)?;
    writeln!(out)?;
    Ok(())
}

/// Ask until the user answers `s` or `q`. Running out of input counts as `q`.
pub fn confirm_start(input: &mut dyn CommandSource, out: &mut dyn Write) -> Result<bool> {
    loop {
        let Some(answer) = input.read_line(CONFIRM_PROMPT)? else {
            writeln!(out, "{}", Notice::Farewell)?;
            return Ok(false);
        };
        match answer.trim().to_lowercase().as_str() {
            "s" => return Ok(true),
            "q" => {
                writeln!(out, "{}", Notice::Farewell)?;
                return Ok(false);
            }
            other => {
                warn!("Rejected confirmation answer: {:?}", other);
                writeln!(out, "{}", INVALID_CONFIRMATION)?;
                writeln!(out)?;
            }
        }
    }
}

/// Use the path given on the command line, otherwise ask for one.
/// `None` when the input ran out before a path was typed.
pub fn resolve_dataset_path(
    arg: Option<PathBuf>,
    input: &mut dyn CommandSource,
) -> Result<Option<PathBuf>> {
    if let Some(path) = arg {
        return Ok(Some(path));
    }
    Ok(input
        .read_line(PATH_PROMPT)?
        .map(|line| PathBuf::from(line.trim())))
}

fn table_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "dataset".to_string())
}

pub fn load_dataset(path: &Path, options: &LoadOptions) -> Result<Arc<DataTable>, LoadError> {
    load_csv_to_datatable(path, &table_name(path), options).map(Arc::new)
}

/// Welcome, load and navigate. Messages outside the navigator (banner,
/// confirmation, load errors) go to `out`; everything else goes through
/// `presenter`.
pub fn run_app(
    dataset: Option<PathBuf>,
    settings: &SessionSettings,
    input: &mut dyn CommandSource,
    presenter: &mut dyn Presenter,
    out: &mut dyn Write,
) -> Result<SessionOutcome> {
    if settings.show_welcome {
        print_banner(out, settings.use_color)?;
        if !confirm_start(input, out)? {
            info!("User declined to start");
            return Ok(SessionOutcome::Declined);
        }
    }

    let Some(path) = resolve_dataset_path(dataset, input)? else {
        writeln!(out, "{}", Notice::Farewell)?;
        return Ok(SessionOutcome::Declined);
    };

    let table = match load_dataset(&path, &settings.load) {
        Ok(table) => table,
        Err(err) => {
            error!("Failed to load {}: {:?}", path.display(), err);
            writeln!(out, "{}", err)?;
            return Ok(SessionOutcome::LoadFailed);
        }
    };

    let mut navigator = Navigator::with_options(table, settings.navigator.clone())?;
    navigator.run(input, presenter)?;
    Ok(SessionOutcome::Completed)
}
