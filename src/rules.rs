use crate::optional_fields::TransformConfig;

pub(crate) mod build_config;
pub(crate) mod pull_secret;
pub(crate) mod route;
pub(crate) mod service_account;

// Secrets the source cluster generates for its builder, default and deployer service accounts.
// The destination cluster generates its own, so these never resolve after a migration.
pub(crate) const DEFAULT_PULL_SECRET_PREFIXES: [&str; 3] = ["builder-dockercfg-", "default-dockercfg-", "deployer-dockercfg-"];

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum PullSecretAction<'a> {
    Replace(&'a str),
    Strip,
    Keep,
}

pub(crate) fn is_default_pull_secret(name: &str) -> bool {
    DEFAULT_PULL_SECRET_PREFIXES.iter().any(|prefix| name.starts_with(prefix))
}

/// Decides what happens to a single pull secret reference. An explicit replacement always wins
/// over stripping, and a name that is already a replacement target is never stripped so that
/// re-running on a patched resource is a no-op.
pub(crate) fn pull_secret_action<'a>(name: &str, config: &'a TransformConfig) -> PullSecretAction<'a> {
    if let Some(replacement) = config.pull_secret_replacement.get(name) {
        if replacement != name {
            return PullSecretAction::Replace(replacement);
        }
        return PullSecretAction::Keep;
    }

    if config.strip_default_pull_secrets
        && is_default_pull_secret(name)
        && !config.pull_secret_replacement.values().any(|target| target == name)
    {
        return PullSecretAction::Strip;
    }

    PullSecretAction::Keep
}
