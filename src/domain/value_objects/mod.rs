pub mod remote_base;
pub mod repository_location;
pub mod repository_name;
