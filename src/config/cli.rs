use crate::optional_fields::OPTIONAL_FIELDS;
use clap::{Arg, CommandFactory, Parser, Subcommand};
use log::LevelFilter;
use std::path::PathBuf;

/// A migration transform plugin that drops and patches OpenShift resources so they can be
/// recreated on a different cluster
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Option<Command>,

    /// File holding the resource to transform, as JSON or YAML. Read from stdin when not given
    #[clap(long)]
    pub(crate) input: Option<PathBuf>,

    /// A JSON or YAML file holding a map of optional field names to their values, as an
    /// alternative to passing each optional field as its own flag. Flags take precedence over
    /// values from this file.
    #[clap(long)]
    pub(crate) extras: Option<PathBuf>,

    /// Log level. Logs are written to stderr
    #[clap(long, default_value_t = LevelFilter::Info)]
    pub(crate) log_level: LevelFilter,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Print the plugin metadata, including the optional fields it accepts, as JSON
    Metadata,
}

/// The derived command, plus one `--<flag-name>` option per registered optional field
pub(crate) fn command() -> clap::Command {
    Cli::command().args(
        OPTIONAL_FIELDS
            .iter()
            .map(|field| Arg::new(field.flag_name).long(field.flag_name).value_name("VALUE").help(field.help)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::FromArgMatches;

    #[test]
    fn test_optional_field_flags() {
        let matches = command()
            .try_get_matches_from([
                "openshift-transform",
                "--strip-default-pull-secrets",
                "true",
                "--registry-replacement=docker.io/foo=quay.io/bar",
            ])
            .unwrap();

        assert_eq!(matches.get_one::<String>("strip-default-pull-secrets").map(String::as_str), Some("true"));
        assert_eq!(
            matches.get_one::<String>("registry-replacement").map(String::as_str),
            Some("docker.io/foo=quay.io/bar")
        );
        assert!(matches.get_one::<String>("pull-secret-replacement").is_none());

        let cli = Cli::from_arg_matches(&matches).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.input.is_none());
        assert!(cli.extras.is_none());
        assert_eq!(cli.log_level, LevelFilter::Info);
    }

    #[test]
    fn test_metadata_subcommand() {
        let matches = command().try_get_matches_from(["openshift-transform", "metadata"]).unwrap();
        let cli = Cli::from_arg_matches(&matches).unwrap();

        assert!(matches!(cli.command, Some(Command::Metadata)));
    }

    #[test]
    fn test_unknown_flag_rejected() {
        assert!(command().try_get_matches_from(["openshift-transform", "--strip-secrets", "true"]).is_err());
    }

    #[test]
    fn test_command_is_valid() {
        command().debug_assert();
    }
}
