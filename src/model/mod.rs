pub mod config {
    pub use runoff_core::config::*;
}
pub mod sim {
    pub use runoff_core::sim::*;
}
pub mod persistence {
    pub use runoff_io::*;
}
