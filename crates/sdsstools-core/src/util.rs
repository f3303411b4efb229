//! Common utility functions.

pub mod data;
pub mod process;
pub mod fs;
pub mod tasks;

// Re-export commonly used items
pub use data::{merge_config, merge_trees, read_yaml_file, read_yaml_str, ConfigTree, EnvDefaults, YamlLoader};
pub use process::{fqdn, run};
pub use fs::{expand_path, slurp, temporary_file_path};
pub use tasks::{cancel_task, run_in_executor, GatheringTaskGroup};
