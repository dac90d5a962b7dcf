use clap::{ArgGroup, Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "molgen contributors",
    version,
    about = "molgen - enumerate every combination of weighted units whose total mass falls inside a target window.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads used by parallel enumeration.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,

    /// Use this catalog file instead of the one in the data directory.
    #[arg(long, global = true, value_name = "PATH")]
    pub catalog: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List, add, edit or remove the units available for generation.
    Catalog(CatalogArgs),
    /// Enumerate composites of catalog units within a mass window, best matches first.
    Generate(GenerateArgs),
    /// Manage the local data directory that holds the unit catalog.
    Data(DataArgs),
}

/// Arguments for the `catalog` subcommand.
#[derive(Args, Debug)]
pub struct CatalogArgs {
    #[command(subcommand)]
    pub command: CatalogCommands,
}

#[derive(Subcommand, Debug)]
pub enum CatalogCommands {
    /// Show every unit in catalog order.
    List,
    /// Add a unit, either with an explicit weight or from the element table.
    Add(AddUnitArgs),
    /// Rename a unit or change its weight. The id is kept.
    Edit {
        /// Id or unambiguous name of the unit.
        #[arg(required = true)]
        unit: String,
        #[arg(long, value_name = "NAME")]
        name: Option<String>,
        #[arg(long, value_name = "FLOAT")]
        weight: Option<f64>,
    },
    /// Delete a unit from the catalog.
    Remove {
        /// Id or unambiguous name of the unit.
        #[arg(required = true)]
        unit: String,
    },
}

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("source").required(true).args(["name", "element"])))]
pub struct AddUnitArgs {
    /// Display name of the new unit.
    #[arg(long, value_name = "NAME", requires = "weight")]
    pub name: Option<String>,

    /// Weight of the new unit, a non-negative number.
    #[arg(long, value_name = "FLOAT", requires = "name")]
    pub weight: Option<f64>,

    /// Add a chemical element with its standard atomic weight (e.g., 'C', 'Na').
    #[arg(long, value_name = "SYMBOL", conflicts_with_all = ["name", "weight"])]
    pub element: Option<String>,
}

/// Arguments for the `generate` subcommand.
#[derive(Args, Debug, Default)]
pub struct GenerateArgs {
    /// Path to a generation configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Mass Window ---
    /// Target mass the composites should reach.
    #[arg(short = 't', long, value_name = "FLOAT")]
    pub target_mass: Option<f64>,

    /// Largest accepted distance from the target mass, in either direction.
    #[arg(short = 'd', long, value_name = "FLOAT")]
    pub max_deviation: Option<f64>,

    // --- Unit Selection ---
    /// Unit to combine, by id or name. Can be used multiple times; the order
    /// given is the enumeration order. Defaults to the whole catalog.
    #[arg(short = 'u', long = "unit", value_name = "UNIT")]
    pub units: Vec<String>,

    /// Minimum quantity of a unit. Can be used multiple times. Example: --min C=1
    #[arg(long = "min", value_name = "UNIT=N")]
    pub min_quantities: Vec<String>,

    /// Maximum quantity of a unit. Can be used multiple times. Example: --max H=12
    #[arg(long = "max", value_name = "UNIT=N")]
    pub max_quantities: Vec<String>,

    // --- Search Budget ---
    /// Stop after evaluating this many complete assignments.
    #[arg(long, value_name = "INT")]
    pub max_leaves: Option<u64>,

    /// Stop after trying this many candidate quantities.
    #[arg(long, value_name = "INT")]
    pub max_steps: Option<u64>,

    /// Stop after this many seconds. 0 disables the deadline.
    #[arg(long = "timeout", value_name = "SECS")]
    pub timeout_secs: Option<f64>,

    /// Split the search across threads.
    #[arg(long)]
    pub parallel: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S budget.max-leaves=1000000
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,

    // --- Output ---
    /// Write every ranked result to this CSV file.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Number of results shown in the terminal table.
    #[arg(long, value_name = "INT")]
    pub limit: Option<usize>,
}

/// Arguments for the `data` subcommand.
#[derive(Args, Debug)]
pub struct DataArgs {
    #[command(subcommand)]
    pub command: DataCommands,
}

/// Available commands for data management.
#[derive(Subcommand, Debug)]
pub enum DataCommands {
    /// Show the absolute path to the local data directory and the catalog file.
    Path,
    /// Set a custom absolute path for the local data directory.
    SetPath {
        /// The new path to use for storing the catalog.
        #[arg(required = true)]
        path: PathBuf,
    },
    /// Reset the data path to its default, OS-specific location.
    ResetPath,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_collects_repeated_flags_in_order() {
        let cli = Cli::parse_from([
            "molgen", "generate", "-t", "30", "-u", "C", "-u", "H", "--max", "C=2", "--max",
            "H=6", "-S", "parallel=true",
        ]);
        let Commands::Generate(args) = cli.command else {
            panic!("Expected 'generate' subcommand");
        };
        assert_eq!(args.target_mass, Some(30.0));
        assert_eq!(args.units, vec!["C", "H"]);
        assert_eq!(args.max_quantities, vec!["C=2", "H=6"]);
        assert_eq!(args.set_values, vec!["parallel=true"]);
        assert!(args.max_deviation.is_none());
    }

    #[test]
    fn global_flags_are_accepted_after_the_subcommand() {
        let cli = Cli::parse_from(["molgen", "catalog", "list", "-vv", "--catalog", "units.toml"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.catalog, Some(PathBuf::from("units.toml")));
    }

    #[test]
    fn catalog_add_requires_a_source() {
        assert!(Cli::try_parse_from(["molgen", "catalog", "add"]).is_err());
        assert!(Cli::try_parse_from(["molgen", "catalog", "add", "--name", "Me"]).is_err());
        assert!(
            Cli::try_parse_from(["molgen", "catalog", "add", "--element", "C", "--weight", "1"])
                .is_err()
        );
        assert!(Cli::try_parse_from(["molgen", "catalog", "add", "--element", "C"]).is_ok());
        assert!(
            Cli::try_parse_from(["molgen", "catalog", "add", "--name", "Me", "--weight", "15.03"])
                .is_ok()
        );
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["molgen", "-q", "-v", "data", "path"]).is_err());
    }
}
