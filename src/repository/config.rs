//! Settings read from git configuration

/// Values the survey and backfill take from a repository's config.
///
/// Command-line flags override these; `None` means the key is unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoSettings {
    pub survey_verbose: Option<bool>,
    pub survey_progress: Option<bool>,
    pub survey_top: Option<i64>,
    pub sparse_checkout: bool,
    pub promisor_remote: Option<String>,
}

impl RepoSettings {
    pub fn load(repo: &gix::Repository) -> Self {
        let config = repo.config_snapshot();

        let promisor_remote = config
            .string("extensions.partialClone")
            .map(|name| name.to_string())
            .or_else(|| {
                repo.remote_names().into_iter().find_map(|name| {
                    let key = format!("remote.{name}.promisor");
                    config
                        .boolean(key.as_str())
                        .unwrap_or(false)
                        .then(|| name.to_string())
                })
            });

        Self {
            survey_verbose: config.boolean("survey.verbose"),
            survey_progress: config.boolean("survey.progress"),
            survey_top: config.integer("survey.top"),
            sparse_checkout: config.boolean("core.sparseCheckout").unwrap_or(false),
            promisor_remote,
        }
    }
}
