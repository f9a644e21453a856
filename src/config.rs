use self::cli::{Cli, Command};
use crate::{optional_fields::OPTIONAL_FIELDS, plugin::PluginRequest};
use anyhow::{ensure, Context, Result};
use clap::{ArgMatches, FromArgMatches};
use log::LevelFilter;
use serde_json::Value;
use std::{collections::HashMap, io::Read, path::Path};

mod cli;

pub(crate) enum Mode {
    Metadata,
    Transform(PluginRequest),
}

/// All parsed CLI arguments, with the resource and the optional fields already read in
pub(crate) struct PluginConfig {
    pub(crate) mode: Mode,
    pub(crate) log_level: LevelFilter,
}

impl PluginConfig {
    pub(crate) fn new() -> Result<Self> {
        Self::parse_from_matches(&cli::command().get_matches(), || {
            let mut buf = Vec::new();
            std::io::stdin().read_to_end(&mut buf).context("reading resource from stdin")?;
            Ok(buf)
        })
    }

    fn parse_from_matches(matches: &ArgMatches, read_stdin: impl FnOnce() -> Result<Vec<u8>>) -> Result<Self> {
        let cli = Cli::from_arg_matches(matches).context("CLI parsing")?;

        let mode = match cli.command {
            Some(Command::Metadata) => Mode::Metadata,
            None => {
                let resource_bytes = match &cli.input {
                    Some(path) => std::fs::read(path).context(format!("reading resource file {}", path.display()))?,
                    None => read_stdin()?,
                };

                Mode::Transform(PluginRequest {
                    resource: parse_resource(&resource_bytes).context("parsing resource")?,
                    extras: collect_extras(matches, cli.extras.as_deref())?,
                })
            }
        };

        Ok(Self {
            mode,
            log_level: cli.log_level,
        })
    }
}

/// YAML is a superset of JSON, so a single parser handles both
pub(crate) fn parse_resource(bytes: &[u8]) -> Result<Value> {
    let value: Value = serde_yaml::from_slice(bytes)?;
    ensure!(value.is_object(), "resource must be an object");
    Ok(value)
}

fn collect_extras(matches: &ArgMatches, extras_file: Option<&Path>) -> Result<HashMap<String, String>> {
    let mut extras = match extras_file {
        Some(path) => read_extras_file(path).context(format!("reading extras file {}", path.display()))?,
        None => HashMap::new(),
    };

    for field in OPTIONAL_FIELDS {
        if let Some(value) = matches.get_one::<String>(field.flag_name) {
            extras.insert(field.flag_name.to_string(), value.clone());
        }
    }

    Ok(extras)
}

fn read_extras_file(path: &Path) -> Result<HashMap<String, String>> {
    let value: Value = serde_yaml::from_slice(&std::fs::read(path)?)?;

    value
        .as_object()
        .context("extras must be a map")?
        .iter()
        .map(|(key, value)| {
            let value = match value {
                Value::String(value) => value.clone(),
                // Unquoted YAML booleans still mean the boolean's text
                Value::Bool(value) => value.to_string(),
                _ => anyhow::bail!("extras value for {} must be a string", key),
            };

            Ok((key.clone(), value))
        })
        .collect()
}
