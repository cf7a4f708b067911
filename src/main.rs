use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::WrapErr;
use color_eyre::Result;

use kclause::action::Action;
use kclause::config::Config;
use kclause::model::Model;

#[derive(Debug, Parser)]
#[command(author, version, about = "Extract boolean constraints from a Kconfig model")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Write to FILE instead of stdout.
    #[arg(short, long, value_name = "FILE", global = true)]
    output: Option<PathBuf>,

    /// Print symbol names without a prefix.
    #[arg(short = 'p', long, global = true, conflicts_with = "set_prefix")]
    no_prefix: bool,

    /// Prefix for symbol names (default: CONFIG_).
    #[arg(short = 'P', long, value_name = "PREFIX", global = true)]
    set_prefix: Option<String>,

    /// Do not emit select and reverse dependency rules.
    #[arg(short = 'D', long, global = true)]
    direct_dependencies_only: bool,

    /// Exclude VAR from the defaults listing.
    #[arg(short = 'f', long, value_name = "VAR", global = true)]
    forceoff: Vec<String>,

    /// Exclude every variable listed in FILE (one per line) from the defaults listing.
    #[arg(short = 'a', long, value_name = "FILE", global = true)]
    forceoffall: Option<PathBuf>,

    /// Debug-level logging.
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Debug, Args)]
struct Input {
    /// Parsed Kconfig model (JSON).
    #[arg(value_name = "MODEL", default_value = "kconfig.json")]
    model: PathBuf,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print all configuration variables
    Configs(Input),

    /// Print all configuration variables declared in Kconfig files
    Kconfigs(Input),

    /// Print the configuration variables that appear in menus
    Menusyms(Input),

    /// Print the variables that are on by default
    Defaults(Input),

    /// Print the full constraint encoding
    Extract(Input),

    /// Print the direct and reverse dependencies of VAR
    Deps {
        /// Configuration variable, without prefix.
        var: String,

        #[command(flatten)]
        input: Input,
    },

    /// Dump the menu tree with all symbols and properties
    Dump(Input),
}

impl Command {
    fn into_parts(self) -> (Action, PathBuf) {
        match self {
            Command::Configs(input) => (Action::Configs, input.model),
            Command::Kconfigs(input) => (Action::Kconfigs, input.model),
            Command::Menusyms(input) => (Action::MenuSymbols, input.model),
            Command::Defaults(input) => (Action::Defaults, input.model),
            Command::Extract(input) => (Action::Extract, input.model),
            Command::Deps { var, input } => (Action::Deps(var), input.model),
            Command::Dump(input) => (Action::Dump, input.model),
        }
    }
}

impl Cli {
    fn config(&self) -> Result<Config> {
        let mut config = Config::default()
            .with_reverse_dependencies(!self.direct_dependencies_only)
            .with_verbose(self.verbose)
            .with_force_off(self.forceoff.iter().cloned());
        if self.no_prefix {
            config = config.without_prefix();
        } else if let Some(prefix) = &self.set_prefix {
            config = config.with_prefix(prefix.as_str());
        }
        if let Some(path) = &self.forceoffall {
            let text = fs::read_to_string(path).wrap_err_with(|| format!("can't open {}", path.display()))?;
            config = config.with_force_off(text.lines().map(str::trim).filter(|line| !line.is_empty()));
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let config = cli.config()?;

    simplelog::TermLogger::init(
        config.log_level(),
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let output = cli.output;
    let (action, model_path) = cli.command.into_parts();
    log::debug!("config = {:?}", config);

    let model = Model::load(&model_path)?;
    log::info!("Loaded {} symbols from {}", model.len(), model_path.display());

    let mut out: Box<dyn Write> = match &output {
        Some(path) => {
            let file = File::create(path).wrap_err_with(|| format!("can't open {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    action.run(&model, &config, &mut out)?;
    out.flush()?;

    Ok(())
}
