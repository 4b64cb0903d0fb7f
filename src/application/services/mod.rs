pub mod sync_policy;
