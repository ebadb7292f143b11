pub mod deployments;
pub mod projects;
