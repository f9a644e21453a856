use crate::json_tools::{json_pointer, read_optional_string, remove_op};
use anyhow::{Context, Result};
use fn_error_context::context;
use json_patch::PatchOperation;
use serde_json::Value;

const HOST_GENERATED_ANNOTATION: &str = "openshift.io/host.generated";

/// The router of the source cluster fills in `spec.host` from its own apps domain when the route
/// didn't ask for one. Such a host can't be served by the destination cluster, so drop it and let
/// the destination router generate a new one. User chosen hosts are kept.
#[context("updating route")]
pub(crate) fn update_route(route: &Value) -> Result<Vec<PatchOperation>> {
    let host_generated = match route.pointer("/metadata/annotations") {
        None | Some(Value::Null) => false,
        Some(annotations) => match annotations
            .as_object()
            .context("/metadata/annotations not an object")?
            .get(HOST_GENERATED_ANNOTATION)
        {
            None => false,
            Some(value) => value.as_str().context(format!("{} annotation not a string", HOST_GENERATED_ANNOTATION))? == "true",
        },
    };

    if !host_generated {
        return Ok(vec![]);
    }

    Ok(match read_optional_string(route, "/spec/host")? {
        Some(host) => {
            log::info!("removing generated route host {}", host);
            vec![remove_op(json_pointer("/spec/host", &[]))]
        }
        None => vec![],
    })
}
