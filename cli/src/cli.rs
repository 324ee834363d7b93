use std::path::PathBuf;

/// Sensor zone CLI (argument schema only)
#[derive(clap::Parser, Debug)]
#[command(name = "zonal", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Build sensor zones and write zones, corridor and adjacency
    Zones(ZonesArgs),

    /// Build sensor zones and evaluate propagated scores at query points
    Propagate(PropagateArgs),
}

/// Inputs shared by every command.
#[derive(clap::Args, Debug)]
pub struct InputArgs {
    /// Street network (GeoJSON LineString/MultiLineString features)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub streets: PathBuf,

    /// Sensors (GeoJSON Point features with integer `id`)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub sensors: PathBuf,

    /// Run configuration (JSON)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,
}

#[derive(clap::Args, Debug)]
pub struct ZonesArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output directory, defaults to "."
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    /// Replace existing output files
    #[arg(long)]
    pub force: bool,
}

#[derive(clap::Args, Debug)]
pub struct PropagateArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Score table (JSON object of sensor id -> score)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub scores: PathBuf,

    /// Query points (JSON array of [x, y] pairs)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub points: PathBuf,

    /// Output results file; printed to stdout when omitted
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Replace an existing output file
    #[arg(long)]
    pub force: bool,
}
