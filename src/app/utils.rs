use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

pub fn read_config<'a, T>(file_name: &str, env_prefix: Option<&str>) -> T
where
    T: Deserialize<'a>,
{
    let mut config_builder = Config::builder().add_source(File::new(file_name, FileFormat::Toml));

    if let Some(env_prefix) = env_prefix {
        config_builder = config_builder.add_source(Environment::with_prefix(env_prefix));
    }

    let data = config_builder.build();

    // Unwrap here because without config application cannot be run
    data.unwrap().try_deserialize().unwrap()
}

/// Generate a sortable identifier with the given prefix
pub fn generate_time_ordered_id(prefix: &str) -> String {
    format!("{prefix}_{}", uuid::Uuid::now_v7().as_simple())
}
