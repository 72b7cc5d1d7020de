use std::path::PathBuf;

use crate::cli::Cli;
use crate::config::DiagramConfig;
use crate::diagram::DiagramOptions;

pub const DEFAULT_OUTPUT_FILE: &str = "directory_structure.md";

/// Effective settings for one run: command line over config file over
/// built-in defaults.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Directory given on the command line; `None` means ask on stdin.
    pub path: Option<PathBuf>,
    pub output: PathBuf,
    pub options: DiagramOptions,
}

impl RuntimeConfig {
    pub fn merge(cli: Cli, file: DiagramConfig) -> Self {
        let defaults = DiagramOptions::default();

        let mut excluded = file.exclude.unwrap_or(defaults.excluded);
        excluded.extend(cli.exclude);

        Self {
            path: cli.path,
            output: cli
                .output
                .or(file.output)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_FILE)),
            options: DiagramOptions {
                excluded,
                order: cli.order.or(file.order).unwrap_or(defaults.order),
                id_scheme: cli.ids.or(file.ids).unwrap_or(defaults.id_scheme),
                max_depth: cli.max_depth.or(file.max_depth),
            },
        }
    }
}

impl From<Cli> for RuntimeConfig {
    fn from(cli: Cli) -> Self {
        Self::merge(cli, DiagramConfig::default())
    }
}
