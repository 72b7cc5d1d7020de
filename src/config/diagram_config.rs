use clap::ValueEnum;
use hashlink::LinkedHashMap;
use saphyr::{LoadableYamlNode, Scalar, Yaml};
use snafu::prelude::*;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;

use crate::{
    diagram::{EntryOrder, IdScheme},
    ext::PathExt,
};

const CONFIG_FILE_NAME: &str = "dirgraph.yaml";

/// Settings read from a YAML file. Every field is optional; unset fields
/// fall through to the command line or the built-in defaults.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DiagramConfig {
    pub output: Option<PathBuf>,
    pub exclude: Option<Vec<String>>,
    pub order: Option<EntryOrder>,
    pub ids: Option<IdScheme>,
    pub max_depth: Option<usize>,
}

impl DiagramConfig {
    /// Reads `explicit` when given, otherwise `dirgraph.yaml` in the working
    /// directory if one exists.
    pub fn read(explicit: Option<&Path>) -> Result<Self, DiagramConfigError> {
        match explicit {
            Some(path) => Self::from_path(path),
            None => {
                let path = PathBuf::from(CONFIG_FILE_NAME);
                if path.is_file() {
                    Self::from_path(&path)
                } else {
                    debug!("No {} found, using defaults", CONFIG_FILE_NAME);
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, DiagramConfigError> {
        debug!("Reading config file: {}", path.best_effort_path_display());
        let contents = fs::read_to_string(path).context(ReadSnafu {
            file_path: path.best_effort_path_display(),
        })?;
        debug!("Successfully read config file: {} bytes", contents.len());
        contents.as_str().try_into()
    }

    fn parse_settings(
        top_level: &LinkedHashMap<Yaml, Yaml>,
    ) -> Result<Self, DiagramConfigError> {
        let mut config = Self::default();

        for (key, value) in top_level {
            let Some(key) = key.as_str() else {
                debug!("Skipping non-string config key: {:?}", key);
                continue;
            };
            if matches!(value, Yaml::Value(Scalar::Null)) {
                debug!("Skipping empty config key: {}", key);
                continue;
            }

            match key {
                "output" => {
                    let output = value.as_str().context(InvalidValueSnafu { key })?;
                    config.output = Some(PathBuf::from(output));
                }
                "exclude" => {
                    let names = value
                        .as_sequence()
                        .context(InvalidValueSnafu { key })?
                        .iter()
                        .map(|item| item.as_str().map(str::to_string))
                        .collect::<Option<Vec<_>>>()
                        .context(InvalidValueSnafu { key })?;
                    config.exclude = Some(names);
                }
                "order" => config.order = Some(Self::parse_enum(key, value)?),
                "ids" => config.ids = Some(Self::parse_enum(key, value)?),
                "max_depth" => {
                    let depth = match value {
                        Yaml::Value(Scalar::Integer(depth)) => usize::try_from(*depth).ok(),
                        _ => None,
                    };
                    config.max_depth = Some(depth.context(InvalidValueSnafu { key })?);
                }
                _ => debug!("Ignoring unknown config key: {}", key),
            }
        }

        Ok(config)
    }

    fn parse_enum<T: ValueEnum>(key: &str, value: &Yaml) -> Result<T, DiagramConfigError> {
        value
            .as_str()
            .and_then(|name| T::from_str(name, true).ok())
            .context(InvalidValueSnafu { key })
    }
}

impl TryFrom<&str> for DiagramConfig {
    type Error = DiagramConfigError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        let contents_vec = Yaml::load_from_str(contents).context(ParseSnafu)?;
        let contents = contents_vec
            .first()
            .ok_or(DiagramConfigError::MalformedConfig)?;

        let top_level = contents
            .as_mapping()
            .ok_or(DiagramConfigError::TopLevelNotMap)?;

        Self::parse_settings(top_level)
    }
}

#[derive(Debug, Snafu)]
pub enum DiagramConfigError {
    #[snafu(display("Failed to read the config file: {}", file_path))]
    ReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("Failed to parse the config file"))]
    ParseError { source: saphyr::ScanError },
    #[snafu(display("Improperly formatted config file"))]
    MalformedConfig,
    #[snafu(display("Top level of config should be a map"))]
    TopLevelNotMap,
    #[snafu(display("Invalid value for config key '{}'", key))]
    InvalidValue { key: String },
}
