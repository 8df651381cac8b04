pub mod command;
pub mod config;
pub mod constants;
pub mod error;
pub mod memory;
pub mod mmu;
pub mod page_table;
pub mod process;
pub mod report;
pub mod segment;
pub mod simulator;
pub mod translation;
pub mod types;
pub mod value;

// Re-export commonly used items for convenience
pub use config::Config;
pub use error::{MmuError, Result};
pub use mmu::Mmu;
pub use simulator::Simulator;
pub use types::DataType;
