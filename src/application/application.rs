use std::io;
use std::path::PathBuf;

use snafu::Snafu;
use snafu::prelude::*;
use tracing::debug;

use crate::application::RuntimeConfig;
use crate::application::prompt::prompt_for_directory;
use crate::application::scan_root::{ResolveRootError, resolve_scan_root};
use crate::cli::Cli;
use crate::config::{DiagramConfig, DiagramConfigError};
use crate::console;
use crate::diagram::{DiagramGenerator, GenerateError};
use crate::ext::PathExt;

pub struct Application;

impl Application {
    pub fn run(cli: Cli) -> Result<(), ApplicationError> {
        let file_config = DiagramConfig::read(cli.config.as_deref()).context(ConfigSnafu)?;
        debug!("Loaded config: {:?}", file_config);
        let runtime_config = RuntimeConfig::merge(cli, file_config);
        debug!("Runtime config: {:?}", runtime_config);

        let requested = match runtime_config.path {
            Some(ref path) => path.clone(),
            None => PathBuf::from(
                prompt_for_directory(io::stdin().lock(), io::stdout()).context(PromptSnafu)?,
            ),
        };
        let root = resolve_scan_root(&requested).context(ResolveSnafu)?;
        debug!("Scanning {}", root.best_effort_path_display());

        let diagram = DiagramGenerator::new(runtime_config.options)
            .generate(&root, &runtime_config.output)
            .context(GenerationSnafu)?;

        console::configure_colors();
        console::write_success(io::stdout().lock(), &diagram, &runtime_config.output)
            .context(ConsoleSnafu)?;

        Ok(())
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Critical failure encountered while loading the configuration"))]
    ConfigError { source: DiagramConfigError },
    #[snafu(display("Failed to read the directory to scan"))]
    PromptError { source: io::Error },
    #[snafu(display("Failed to resolve the directory to scan"))]
    ResolveError { source: ResolveRootError },
    #[snafu(display("Critical failure encountered while generating the diagram"))]
    GenerationError { source: GenerateError },
    #[snafu(display("Failed to print the diagram"))]
    ConsoleError { source: io::Error },
}
