use ambertop::core::units::UnitSystem;
use ambertop::engine::config::{GbModel, NonbondedMethod, ShakeMode};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "ambertop - Decode AMBER prmtop files into an engine-neutral force-field description.",
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
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Decode a prmtop file and print a summary of its force field.
    Inspect(InspectArgs),
    /// Decode a prmtop file and assemble an engine-neutral system description.
    Build(BuildArgs),
}

/// 1-4 scale divisors shared by both subcommands.
#[derive(Args, Debug, Clone, Default)]
pub struct DecodeOverrides {
    /// Override the electrostatic 1-4 scale divisor (SCEE).
    #[arg(long, value_name = "FLOAT")]
    pub scee: Option<f64>,

    /// Override the Lennard-Jones 1-4 scale divisor (SCNB).
    #[arg(long, value_name = "FLOAT")]
    pub scnb: Option<f64>,
}

/// Arguments for the `inspect` subcommand.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Path to the prmtop file.
    #[arg(value_name = "PRMTOP")]
    pub input: PathBuf,

    /// Export one row per atom to a CSV file.
    #[arg(long, value_name = "PATH")]
    pub atoms_csv: Option<PathBuf>,

    #[command(flatten)]
    pub decode: DecodeOverrides,
}

/// Arguments for the `build` subcommand.
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Path to the prmtop file.
    #[arg(value_name = "PRMTOP")]
    pub input: PathBuf,

    /// Path to a build configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write the system description to a TOML file.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub decode: DecodeOverrides,

    // --- System Overrides ---
    /// Override the constraint mode.
    #[arg(long, value_enum, value_name = "MODE")]
    pub shake: Option<ShakeArg>,

    /// Override the nonbonded method.
    #[arg(short = 'm', long, value_enum, value_name = "METHOD")]
    pub nonbonded_method: Option<NonbondedMethodArg>,

    /// Override the nonbonded cutoff distance in Angstrom.
    #[arg(long, value_name = "FLOAT")]
    pub cutoff: Option<f64>,

    /// Override the implicit-solvent model.
    #[arg(long, value_enum, value_name = "MODEL")]
    pub gb_model: Option<GbModelArg>,

    /// Override the Ewald error tolerance.
    #[arg(long, value_name = "FLOAT")]
    pub ewald_error_tolerance: Option<f64>,

    /// Override the unit system of the written description.
    #[arg(short, long, value_enum, value_name = "SYSTEM")]
    pub units: Option<UnitsArg>,

    /// Drop harmonic terms of constrained bonds and angles.
    #[arg(long)]
    pub rigid: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShakeArg {
    None,
    HBonds,
    AllBonds,
    HAngles,
}

impl From<ShakeArg> for ShakeMode {
    fn from(arg: ShakeArg) -> Self {
        match arg {
            ShakeArg::None => Self::None,
            ShakeArg::HBonds => Self::HBonds,
            ShakeArg::AllBonds => Self::AllBonds,
            ShakeArg::HAngles => Self::HAngles,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonbondedMethodArg {
    NoCutoff,
    CutoffNonPeriodic,
    CutoffPeriodic,
    Ewald,
    Pme,
}

impl From<NonbondedMethodArg> for NonbondedMethod {
    fn from(arg: NonbondedMethodArg) -> Self {
        match arg {
            NonbondedMethodArg::NoCutoff => Self::NoCutoff,
            NonbondedMethodArg::CutoffNonPeriodic => Self::CutoffNonPeriodic,
            NonbondedMethodArg::CutoffPeriodic => Self::CutoffPeriodic,
            NonbondedMethodArg::Ewald => Self::Ewald,
            NonbondedMethodArg::Pme => Self::Pme,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GbModelArg {
    None,
    Obc,
}

impl From<GbModelArg> for GbModel {
    fn from(arg: GbModelArg) -> Self {
        match arg {
            GbModelArg::None => Self::None,
            GbModelArg::Obc => Self::Obc,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitsArg {
    Amber,
    Md,
}

impl From<UnitsArg> for UnitSystem {
    fn from(arg: UnitsArg) -> Self {
        match arg {
            UnitsArg::Amber => Self::Amber,
            UnitsArg::Md => Self::Md,
        }
    }
}
