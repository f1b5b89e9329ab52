//! Merge rules: defaults applied beneath every source.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("github.api_base", crate::source::github::DEFAULT_API_BASE)?
        .set_default("github.default_branch", "main")?
        .set_default("output.path", "public/tree.json")?
        .set_default("hierarchy.conflict_policy", "first-wins")
}
