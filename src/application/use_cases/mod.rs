pub mod sync_repositories;
