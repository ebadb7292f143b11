pub mod deploy;

pub use deploy::Deploy;
