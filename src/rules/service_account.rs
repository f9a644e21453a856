use crate::json_tools::{json_pointer, read_optional_array, read_optional_string, read_reference_name, remove_op};
use anyhow::{Context, Result};
use fn_error_context::context;
use json_patch::PatchOperation;
use serde_json::Value;

const SECRET_LISTS: [&str; 2] = ["/secrets", "/imagePullSecrets"];

/// The source cluster's controllers attach a `<name>-dockercfg-*` and a `<name>-token-*` secret to
/// every service account. The destination cluster generates its own once the service account is
/// created, so references to the old ones are dropped.
#[context("updating service account")]
pub(crate) fn update_service_account(service_account: &Value) -> Result<Vec<PatchOperation>> {
    let mut ops = vec![];

    for pointer in SECRET_LISTS {
        let secrets = match read_optional_array(service_account, pointer)? {
            Some(secrets) if !secrets.is_empty() => secrets,
            _ => continue,
        };

        let name = read_optional_string(service_account, "/metadata/name")?.context("service account has no metadata.name")?;
        let generated_prefixes = [format!("{name}-dockercfg-"), format!("{name}-token-")];

        let mut removals = vec![];
        for (index, secret) in secrets.iter().enumerate() {
            let index = index.to_string();
            let secret_name = read_reference_name(secret, &format!("{pointer}/{index}"))?;

            if generated_prefixes.iter().any(|prefix| secret_name.starts_with(prefix.as_str())) {
                log::info!("removing generated secret {} from service account {}", secret_name, name);
                removals.push(remove_op(json_pointer(pointer, &[index.as_str()])));
            }
        }

        ops.extend(removals.into_iter().rev());
    }

    Ok(ops)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn service_account() -> Value {
        json!({
            "apiVersion": "v1",
            "kind": "ServiceAccount",
            "metadata": {"name": "builder", "namespace": "demo"},
            "secrets": [
                {"name": "builder-token-5x7kq"},
                {"name": "builder-dockercfg-x8s7k"},
                {"name": "git-credentials"}
            ],
            "imagePullSecrets": [
                {"name": "builder-dockercfg-x8s7k"},
                {"name": "quay-pull"}
            ]
        })
    }

    #[test]
    fn test_generated_secrets_removed() -> Result<()> {
        let mut service_account = service_account();

        let ops = update_service_account(&service_account)?;
        assert_eq!(
            serde_json::to_value(&ops)?,
            json!([
                {"op": "remove", "path": "/secrets/1"},
                {"op": "remove", "path": "/secrets/0"},
                {"op": "remove", "path": "/imagePullSecrets/0"},
            ])
        );

        json_patch::patch(&mut service_account, &json_patch::Patch(ops)).context("applying patch")?;
        assert_eq!(service_account["secrets"], json!([{"name": "git-credentials"}]));
        assert_eq!(service_account["imagePullSecrets"], json!([{"name": "quay-pull"}]));

        assert!(update_service_account(&service_account)?.is_empty());

        Ok(())
    }

    #[test]
    fn test_other_service_accounts_secrets_kept() -> Result<()> {
        let service_account = json!({
            "kind": "ServiceAccount",
            "metadata": {"name": "app"},
            "secrets": [{"name": "builder-token-5x7kq"}, {"name": "application-token-abcde"}],
            "imagePullSecrets": [{"name": "default-dockercfg-h4n7g"}]
        });

        assert!(update_service_account(&service_account)?.is_empty());

        Ok(())
    }

    #[test]
    fn test_no_secrets() -> Result<()> {
        assert!(update_service_account(&json!({"kind": "ServiceAccount", "metadata": {"name": "default"}}))?.is_empty());
        assert!(update_service_account(&json!({"kind": "ServiceAccount", "secrets": []}))?.is_empty());

        Ok(())
    }

    #[test]
    fn test_malformed() {
        assert!(update_service_account(&json!({"metadata": {"name": "default"}, "secrets": {}})).is_err());
        assert!(update_service_account(&json!({"metadata": {"name": "default"}, "secrets": [{}]})).is_err());
        assert!(update_service_account(&json!({"secrets": [{"name": "default-token-abcde"}]})).is_err());
    }
}
