/// Config files probed in the working directory when `--config` is absent.
pub(crate) const DEFAULT_CONFIG_TOML: &str = "stressor.toml";
pub(crate) const DEFAULT_CONFIG_JSON: &str = "stressor.json";
