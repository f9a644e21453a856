use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

pub(crate) const STRIP_DEFAULT_PULL_SECRETS: &str = "strip-default-pull-secrets";
pub(crate) const PULL_SECRET_REPLACEMENT: &str = "pull-secret-replacement";
pub(crate) const REGISTRY_REPLACEMENT: &str = "registry-replacement";

/// An optional field the plugin accepts from the host, advertised through the plugin metadata
/// and exposed as a `--<flag_name>` option on the command line
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OptionalField {
    pub(crate) flag_name: &'static str,
    pub(crate) help: &'static str,
    pub(crate) example: &'static str,
}

pub(crate) const OPTIONAL_FIELDS: [OptionalField; 3] = [
    OptionalField {
        flag_name: STRIP_DEFAULT_PULL_SECRETS,
        help: "Whether to strip Pod and BuildConfig default pull secrets (beginning with builder/default/deployer-dockercfg-) \
               that aren't replaced by the map param pull-secret-replacement",
        example: "true",
    },
    OptionalField {
        flag_name: PULL_SECRET_REPLACEMENT,
        help: "Map of pull secrets to replace in Pods and BuildConfigs while transforming in format \
               secret1=destsecret1,secret2=destsecret2[...]",
        example: "default-dockercfg-h4n7g=default-dockercfg-12345,builder-dockercfg-abcde=builder-dockercfg-12345",
    },
    OptionalField {
        flag_name: REGISTRY_REPLACEMENT,
        help: "Map of image registry paths to swap on transform, in the format \
               original-registry1=target-registry1,original-registry2=target-registry2...",
        example: "docker-registry.default.svc:5000=image-registry.openshift-image-registry.svc:5000,docker.io/foo=quay.io/bar",
    },
];

#[derive(Error, Debug, PartialEq, Eq)]
pub(crate) enum ConfigError {
    #[error("invalid boolean {value:?} for {flag}")]
    InvalidBool { flag: &'static str, value: String },
}

/// The typed form of the optional fields, shared by every rule
#[derive(Serialize, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct TransformConfig {
    pub(crate) strip_default_pull_secrets: bool,
    pub(crate) pull_secret_replacement: BTreeMap<String, String>,
    pub(crate) registry_replacement: BTreeMap<String, String>,
}

impl TransformConfig {
    /// Absent or empty extras leave the field at its zero value. Only a malformed boolean is an
    /// error, the map fields never fail.
    pub(crate) fn from_extras(extras: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = non_empty(extras, STRIP_DEFAULT_PULL_SECRETS) {
            config.strip_default_pull_secrets = parse_bool(value).ok_or_else(|| ConfigError::InvalidBool {
                flag: STRIP_DEFAULT_PULL_SECRETS,
                value: value.to_string(),
            })?;
        }

        if let Some(value) = non_empty(extras, PULL_SECRET_REPLACEMENT) {
            config.pull_secret_replacement = parse_map_value(value);
        }

        if let Some(value) = non_empty(extras, REGISTRY_REPLACEMENT) {
            config.registry_replacement = parse_map_value(value);
        }

        Ok(config)
    }
}

fn non_empty<'a>(extras: &'a HashMap<String, String>, flag: &str) -> Option<&'a str> {
    extras.get(flag).map(String::as_str).filter(|value| !value.is_empty())
}

// Same spellings the host framework accepts for boolean flags
fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

/// Parses `key1=value1,key2=value2`. Entries without a `=` or with an empty key are ignored and a
/// repeated key keeps its last value.
pub(crate) fn parse_map_value(value: &str) -> BTreeMap<String, String> {
    value
        .split(',')
        .filter_map(|entry| {
            let entry = entry.trim();
            if entry.is_empty() {
                return None;
            }

            match entry.split_once('=') {
                Some((key, value)) if !key.trim().is_empty() => Some((key.trim().to_string(), value.trim().to_string())),
                _ => {
                    log::debug!("ignoring malformed map entry {:?}", entry);
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extras(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_from_extras_defaults() {
        assert_eq!(TransformConfig::from_extras(&HashMap::new()), Ok(TransformConfig::default()));

        let config = TransformConfig::from_extras(&extras(&[
            (STRIP_DEFAULT_PULL_SECRETS, ""),
            (PULL_SECRET_REPLACEMENT, ""),
            (REGISTRY_REPLACEMENT, ""),
            ("unrelated-flag", "whatever"),
        ]))
        .unwrap();

        assert_eq!(config, TransformConfig::default());
    }

    #[test]
    fn test_from_extras_bool() {
        for (raw, expected) in [("true", true), ("True", true), ("1", true), ("t", true), ("FALSE", false), ("0", false)] {
            let config = TransformConfig::from_extras(&extras(&[(STRIP_DEFAULT_PULL_SECRETS, raw)])).unwrap();
            assert_eq!(config.strip_default_pull_secrets, expected, "parsing {raw}");
        }

        for raw in ["yes", "no", "tRuE", " true"] {
            assert_eq!(
                TransformConfig::from_extras(&extras(&[(STRIP_DEFAULT_PULL_SECRETS, raw)])),
                Err(ConfigError::InvalidBool {
                    flag: STRIP_DEFAULT_PULL_SECRETS,
                    value: raw.to_string()
                })
            );
        }
    }

    #[test]
    fn test_from_extras_maps() {
        let config = TransformConfig::from_extras(&extras(&[
            (
                PULL_SECRET_REPLACEMENT,
                "default-dockercfg-h4n7g=default-dockercfg-12345,builder-dockercfg-abcde=builder-dockercfg-12345",
            ),
            (
                REGISTRY_REPLACEMENT,
                "docker-registry.default.svc:5000=image-registry.openshift-image-registry.svc:5000,docker.io/foo=quay.io/bar",
            ),
        ]))
        .unwrap();

        assert!(!config.strip_default_pull_secrets);
        assert_eq!(
            config.pull_secret_replacement,
            BTreeMap::from([
                ("default-dockercfg-h4n7g".to_string(), "default-dockercfg-12345".to_string()),
                ("builder-dockercfg-abcde".to_string(), "builder-dockercfg-12345".to_string()),
            ])
        );
        assert_eq!(
            config.registry_replacement,
            BTreeMap::from([
                (
                    "docker-registry.default.svc:5000".to_string(),
                    "image-registry.openshift-image-registry.svc:5000".to_string()
                ),
                ("docker.io/foo".to_string(), "quay.io/bar".to_string()),
            ])
        );
    }

    #[test]
    fn test_parse_map_value_malformed() {
        assert_eq!(
            parse_map_value(" a = b ,,no-equals,=orphan,c=d=e,a=last"),
            BTreeMap::from([("a".to_string(), "last".to_string()), ("c".to_string(), "d=e".to_string())])
        );
        assert!(parse_map_value(",,,").is_empty());
    }

    #[test]
    fn test_optional_fields_registration() {
        let names = OPTIONAL_FIELDS.iter().map(|field| field.flag_name).collect::<Vec<_>>();
        assert_eq!(names, vec![STRIP_DEFAULT_PULL_SECRETS, PULL_SECRET_REPLACEMENT, REGISTRY_REPLACEMENT]);

        let json = serde_json::to_value(OPTIONAL_FIELDS[0]).unwrap();
        assert_eq!(json["flagName"], STRIP_DEFAULT_PULL_SECRETS);
        assert_eq!(json["example"], "true");
    }
}
