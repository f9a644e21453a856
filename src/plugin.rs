use crate::{
    kind::{has_label, ResourceKind, OLM_COPIED_FROM_LABEL},
    optional_fields::{OptionalField, TransformConfig, OPTIONAL_FIELDS},
    rules::{build_config, pull_secret, route, service_account},
};
use anyhow::{Context, Result};
use json_patch::{Patch, PatchOperation};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

pub(crate) const PLUGIN_NAME: &str = "OpenShiftPlugin";
pub(crate) const PLUGIN_VERSION: &str = "v0.0.3";
pub(crate) const PROTOCOL_VERSION: &str = "v1";

/// One resource handed to the plugin by the migration orchestrator, along with the raw optional
/// field values it was invoked with
pub(crate) struct PluginRequest {
    pub(crate) resource: Value,
    pub(crate) extras: HashMap<String, String>,
}

#[derive(Serialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PluginResponse {
    pub(crate) version: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub(crate) is_white_out: bool,
    #[serde(skip_serializing_if = "patch_is_empty")]
    pub(crate) patches: Patch,
}

fn patch_is_empty(patch: &Patch) -> bool {
    patch.0.is_empty()
}

/// What the plugin tells the host about itself when asked for its metadata
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PluginMetadata {
    pub(crate) name: &'static str,
    pub(crate) version: &'static str,
    pub(crate) request_version: Vec<&'static str>,
    pub(crate) response_version: Vec<&'static str>,
    pub(crate) optional_fields: Vec<OptionalField>,
}

pub(crate) fn metadata() -> PluginMetadata {
    PluginMetadata {
        name: PLUGIN_NAME,
        version: PLUGIN_VERSION,
        request_version: vec![PROTOCOL_VERSION],
        response_version: vec![PROTOCOL_VERSION],
        optional_fields: OPTIONAL_FIELDS.to_vec(),
    }
}

#[derive(Debug, PartialEq)]
pub(crate) enum Decision {
    WhiteOut,
    Patch(Vec<PatchOperation>),
    PassThrough,
}

impl From<Decision> for PluginResponse {
    fn from(decision: Decision) -> Self {
        let (is_white_out, operations) = match decision {
            Decision::WhiteOut => (true, vec![]),
            Decision::Patch(operations) => (false, operations),
            Decision::PassThrough => (false, vec![]),
        };

        Self {
            version: PROTOCOL_VERSION.to_string(),
            is_white_out,
            patches: Patch(operations),
        }
    }
}

/// Parses the optional fields, dispatches on the resource kind and assembles the response. Any
/// error aborts the whole request, no partial patch is ever returned.
pub(crate) fn run(request: &PluginRequest) -> Result<PluginResponse> {
    let config = TransformConfig::from_extras(&request.extras).context("parsing optional fields")?;
    log::debug!("optional fields: {}", serde_json::to_string(&config)?);

    Ok(dispatch(&request.resource, &config)?.into())
}

pub(crate) fn dispatch(resource: &Value, config: &TransformConfig) -> Result<Decision> {
    let kind = ResourceKind::of(resource);
    let name = display_name(resource);

    Ok(match kind {
        ResourceKind::Build => {
            log::info!("found build {}, adding to whiteout", name);
            Decision::WhiteOut
        }
        ResourceKind::BuildConfig => {
            log::info!("found build config {}, processing", name);
            Decision::Patch(build_config::update_build_config(resource, config)?)
        }
        ResourceKind::Pod => {
            log::info!("found pod {}, processing default pull secrets", name);
            Decision::Patch(pull_secret::update_pod_pull_secrets(resource, config)?)
        }
        ResourceKind::Route => {
            log::info!("found route {}, processing", name);
            Decision::Patch(route::update_route(resource)?)
        }
        ResourceKind::ServiceAccount => {
            log::info!("found service account {}, processing", name);
            Decision::Patch(service_account::update_service_account(resource)?)
        }
        ResourceKind::ClusterServiceVersion if has_label(resource, OLM_COPIED_FROM_LABEL)? => {
            log::info!("found copied cluster service version {}, adding to whiteout", name);
            Decision::WhiteOut
        }
        ResourceKind::ClusterServiceVersion | ResourceKind::Other(_) => {
            log::debug!("nothing to do for {} {}", kind.as_str(), name);
            Decision::PassThrough
        }
    })
}

fn display_name(resource: &Value) -> String {
    let name = resource.pointer("/metadata/name").and_then(Value::as_str).unwrap_or("<unnamed>");

    match resource.pointer("/metadata/namespace").and_then(Value::as_str) {
        Some(namespace) => format!("{namespace}/{name}"),
        None => name.to_string(),
    }
}
