use serde::Deserialize;

/// Repository settings that can live in an application's config file.
///
/// ```toml
/// [repositories.users]
/// resource_name = "user"
/// max_page_size = 100
/// ```
///
/// Apply with [`RepositoryBuilder::config`](crate::RepositoryBuilder::config).
/// Builder setters called afterwards take precedence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RepositoryConfig {
    /// Name used in errors and logs. Defaults to the entity's table name.
    pub resource_name: Option<String>,
    /// Upper bound applied to the `limit` of paged reads.
    pub max_page_size: Option<u64>,
}
