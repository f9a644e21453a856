use anyhow::Context;
use serde_json::Value;
use std::str::FromStr;
use strum_macros::EnumString;

/// Label OLM puts on ClusterServiceVersions it copied into a namespace from the operator's own
/// namespace
pub(crate) const OLM_COPIED_FROM_LABEL: &str = "olm.copiedFrom";

/// Every kind the plugin has an opinion on. Anything else is carried as `Other` and passed
/// through untouched.
#[derive(EnumString, Clone, Debug, PartialEq, Eq)]
pub(crate) enum ResourceKind {
    Build,
    BuildConfig,
    Pod,
    Route,
    ServiceAccount,
    ClusterServiceVersion,
    #[strum(default)]
    Other(String),
}

impl ResourceKind {
    /// Exact, case sensitive match on the `kind` field. A missing or non-string kind is `Other`.
    pub(crate) fn of(resource: &Value) -> Self {
        match resource.get("kind").and_then(Value::as_str) {
            // The default variant makes parsing infallible
            Some(kind) => Self::from_str(kind).unwrap_or_else(|_| Self::Other(kind.to_string())),
            None => Self::Other(String::new()),
        }
    }

    pub(crate) fn as_str(&self) -> &str {
        match self {
            Self::Build => "Build",
            Self::BuildConfig => "BuildConfig",
            Self::Pod => "Pod",
            Self::Route => "Route",
            Self::ServiceAccount => "ServiceAccount",
            Self::ClusterServiceVersion => "ClusterServiceVersion",
            Self::Other(kind) => kind,
        }
    }
}

pub(crate) fn has_label(resource: &Value, label: &str) -> anyhow::Result<bool> {
    Ok(match resource.pointer("/metadata/labels") {
        None | Some(Value::Null) => false,
        Some(labels) => labels.as_object().context("metadata.labels not an object")?.contains_key(label),
    })
}
