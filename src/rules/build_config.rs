use super::{pull_secret_action, PullSecretAction};
use crate::{
    json_tools::{json_pointer, read_optional_array, read_optional_string, read_reference_name, remove_op, replace_op},
    optional_fields::TransformConfig,
};
use anyhow::{Context, Result};
use fn_error_context::context;
use json_patch::PatchOperation;
use serde_json::Value;
use std::collections::BTreeMap;

const STRATEGIES: [&str; 3] = ["sourceStrategy", "dockerStrategy", "customStrategy"];

#[context("updating build config")]
pub(crate) fn update_build_config(build_config: &Value, config: &TransformConfig) -> Result<Vec<PatchOperation>> {
    let mut ops = vec![];

    for strategy in STRATEGIES {
        let strategy_pointer = format!("/spec/strategy/{strategy}");

        ops.extend(image_reference_op(build_config, &format!("{strategy_pointer}/from"), config)?);
        ops.extend(secret_reference_op(build_config, &format!("{strategy_pointer}/pullSecret"), config)?);
    }

    ops.extend(image_reference_op(build_config, "/spec/output/to", config)?);
    ops.extend(secret_reference_op(build_config, "/spec/output/pushSecret", config)?);

    if let Some(images) = read_optional_array(build_config, "/spec/source/images")? {
        for index in 0..images.len() {
            let image_pointer = format!("/spec/source/images/{index}");

            ops.extend(image_reference_op(build_config, &format!("{image_pointer}/from"), config)?);
            ops.extend(secret_reference_op(build_config, &format!("{image_pointer}/pullSecret"), config)?);
        }
    }

    Ok(ops)
}

/// Rewrites the registry of an object reference such as `{"kind": "DockerImage", "name": "..."}`.
/// ImageStreamTag and other kinds of references don't carry a registry and are left alone.
fn image_reference_op(build_config: &Value, pointer: &str, config: &TransformConfig) -> Result<Option<PatchOperation>> {
    let reference = match build_config.pointer(pointer) {
        None | Some(Value::Null) => return Ok(None),
        Some(reference) => reference,
    };
    reference.as_object().context(format!("{} not an object", pointer))?;

    if read_optional_string(reference, "/kind")? != Some("DockerImage") {
        return Ok(None);
    }

    let image = match read_optional_string(reference, "/name").context(format!("reading {}", pointer))? {
        Some(image) => image,
        None => return Ok(None),
    };

    Ok(rewrite_image_reference(image, &config.registry_replacement).map(|new_image| {
        log::info!("replacing image {} with {}", image, new_image);
        replace_op(json_pointer(pointer, &["name"]), new_image)
    }))
}

/// Pull and push secrets on build configs are single references rather than lists, so stripping
/// one removes the whole reference
fn secret_reference_op(build_config: &Value, pointer: &str, config: &TransformConfig) -> Result<Option<PatchOperation>> {
    let reference = match build_config.pointer(pointer) {
        None | Some(Value::Null) => return Ok(None),
        Some(reference) => reference,
    };

    let name = read_reference_name(reference, pointer)?;

    Ok(match pull_secret_action(name, config) {
        PullSecretAction::Replace(new_name) => {
            log::info!("replacing build config secret {} with {}", name, new_name);
            Some(replace_op(json_pointer(pointer, &["name"]), new_name))
        }
        PullSecretAction::Strip => {
            log::info!("stripping default build config secret {}", name);
            Some(remove_op(json_pointer(pointer, &[])))
        }
        PullSecretAction::Keep => None,
    })
}

/// A replacement key matches when it is the whole image reference or a prefix of it that ends at
/// a `/`. The longest matching key wins. `None` means the reference stays as it is.
pub(crate) fn rewrite_image_reference(image: &str, registry_replacement: &BTreeMap<String, String>) -> Option<String> {
    registry_replacement
        .iter()
        .filter(|(source, _)| match image.strip_prefix(source.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        })
        .max_by_key(|(source, _)| source.len())
        .map(|(source, target)| format!("{}{}", target, &image[source.len()..]))
        .filter(|new_image| new_image != image)
}
