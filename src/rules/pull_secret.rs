use super::{pull_secret_action, PullSecretAction};
use crate::{
    json_tools::{json_pointer, read_optional_array, read_reference_name, remove_op, replace_op},
    optional_fields::TransformConfig,
};
use anyhow::Result;
use fn_error_context::context;
use json_patch::PatchOperation;
use serde_json::Value;

const POD_PULL_SECRETS: &str = "/spec/imagePullSecrets";

#[context("updating pod pull secrets")]
pub(crate) fn update_pod_pull_secrets(pod: &Value, config: &TransformConfig) -> Result<Vec<PatchOperation>> {
    pull_secret_list_ops(pod, POD_PULL_SECRETS, config)
}

/// Patches a list of pull secret references. Replacements come first, then removals from the
/// highest index down, so every path is still valid when the operations are applied in order.
pub(crate) fn pull_secret_list_ops(resource: &Value, pointer: &str, config: &TransformConfig) -> Result<Vec<PatchOperation>> {
    let secrets = match read_optional_array(resource, pointer)? {
        Some(secrets) => secrets,
        // Not everything references pull secrets and that's ok
        None => return Ok(vec![]),
    };

    let mut replacements = vec![];
    let mut removals = vec![];

    for (index, secret) in secrets.iter().enumerate() {
        let index = index.to_string();
        let name = read_reference_name(secret, &format!("{pointer}/{index}"))?;

        match pull_secret_action(name, config) {
            PullSecretAction::Replace(new_name) => {
                log::info!("replacing pull secret {} with {}", name, new_name);
                replacements.push(replace_op(json_pointer(pointer, &[index.as_str(), "name"]), new_name));
            }
            PullSecretAction::Strip => {
                log::info!("stripping default pull secret {}", name);
                removals.push(remove_op(json_pointer(pointer, &[index.as_str()])));
            }
            PullSecretAction::Keep => {}
        }
    }

    Ok(replacements.into_iter().chain(removals.into_iter().rev()).collect())
}
