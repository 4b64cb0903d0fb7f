pub mod fleet_config;
pub mod sync_task;
