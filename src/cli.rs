//! Command-line interface definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::snd::generate::CannedSound;

#[derive(Parser, Debug)]
#[command(
    name = "xsnd",
    about = "X-Plane FMOD sound attachment (.snd) generator and updater",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a fresh .snd document from cockpit geometry
    Generate(GenerateArgs),

    /// Update VEH_XYZ coordinates in an existing .snd from geometry
    Update(UpdateArgs),

    /// Inspect the attachment entries of a .snd document
    Entries(EntriesArgs),

    /// List distinct FMOD event paths referenced by a .snd document
    Events(EventsArgs),
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// X-Plane OBJ8 object file (cockpit geometry)
    #[arg(long)]
    pub obj: PathBuf,

    /// Existing .snd whose header should be preserved
    #[arg(long)]
    pub template: Option<PathBuf>,

    /// Output path (defaults to the configured output name)
    #[arg(long, short)]
    pub out: Option<PathBuf>,

    /// Event path for manipulator entries (overrides config)
    #[arg(long)]
    pub event_name: Option<String>,

    /// Root segment replacing /aircraft in event paths
    #[arg(long)]
    pub root: Option<String>,

    /// Use EVENT_CMND_HOLD_CUE triggers instead of EVENT_CMND_UP
    #[arg(long)]
    pub hold_cue: bool,

    /// Emit a second release-triggered entry per command
    #[arg(long)]
    pub duplicate_release: bool,

    /// Canned library blocks to include (comma-separated)
    #[arg(long, value_enum, value_delimiter = ',')]
    pub canned: Vec<CannedSound>,

    /// Include every canned library block
    #[arg(long, conflicts_with = "canned")]
    pub all_canned: bool,

    /// Manipulator kind to exclude (repeatable; overrides config)
    #[arg(long = "exclude-kind")]
    pub exclude_kinds: Vec<String>,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// X-Plane OBJ8 object file (cockpit geometry)
    #[arg(long)]
    pub obj: PathBuf,

    /// Existing .snd document to update
    #[arg(long)]
    pub snd: PathBuf,

    /// Output path
    #[arg(long, short, default_value = "updated.snd")]
    pub out: PathBuf,

    /// Identify and report changes without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Print the change report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct EntriesArgs {
    /// .snd document to parse
    #[arg(long)]
    pub snd: PathBuf,

    /// Print the parsed entries as JSON
    #[arg(long)]
    pub json: bool,

    /// Re-emit the document in canonical form to this path
    #[arg(long)]
    pub canonicalize: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct EventsArgs {
    /// .snd document to scan
    #[arg(long)]
    pub snd: PathBuf,

    /// Print the catalog as JSON
    #[arg(long)]
    pub json: bool,
}
