use std::path::PathBuf;

use clap::Parser;

use crate::application::data::LogLevel;
use crate::diagram::{EntryOrder, IdScheme};

/// Render the sub-directory hierarchy of a directory as a Mermaid flowchart
#[derive(Parser, Debug, Clone)]
#[command(version)]
pub struct Cli {
    /// Directory to scan. Prompts on stdin when omitted
    pub path: Option<PathBuf>,

    #[clap(long, short, default_value = "warn", value_enum)]
    pub log_level: LogLevel,

    /// File the diagram is written to [default: directory_structure.md]
    #[clap(long, short)]
    pub output: Option<PathBuf>,

    /// YAML settings file [default: ./dirgraph.yaml when present]
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// Additional directory name to skip; may be repeated
    #[clap(long = "exclude", value_name = "NAME")]
    pub exclude: Vec<String>,

    /// Order of sibling directories
    #[clap(long, value_enum)]
    pub order: Option<EntryOrder>,

    /// How node identifiers are derived
    #[clap(long, value_enum)]
    pub ids: Option<IdScheme>,

    /// Number of levels below the root to render
    #[clap(long)]
    pub max_depth: Option<usize>,
}
