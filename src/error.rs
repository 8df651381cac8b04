//! Error type shared by the MMU core and the simulator front end

use std::fmt;

/// Every way an MMU operation can fail. None of these leave partial state behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MmuError {
    /// Page size is not a power of two inside the accepted range
    InvalidPageSize(u32),
    /// Memory size is zero or not a whole number of pages
    InvalidMemorySize(u32),
    ProcessNotFound(u32),
    VariableNotFound { pid: u32, name: String },
    VariableAlreadyExists { pid: u32, name: String },
    /// Caller supplied a type label the catalog does not know
    UnknownDataKind(String),
    /// Allocation of zero bytes
    InvalidSize,
    /// Name collides with the free-space marker
    ReservedName(String),
    /// No free hole is large enough
    InsufficientMemory { requested: u32 },
    /// Every physical frame is leased
    OutOfFrames,
    NotMapped { pid: u32, virtual_address: u32 },
    /// Element index past the end of a variable
    OutOfBounds {
        name: String,
        index: u32,
        count: u32,
    },
    /// Text that does not parse as a value of the variable's kind
    InvalidValue { kind: String, text: String },
}

impl fmt::Display for MmuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MmuError::InvalidPageSize(size) => write!(
                f,
                "invalid page size {}: must be a power of two between {} and {}",
                size,
                crate::constants::MIN_PAGE_SIZE,
                crate::constants::MAX_PAGE_SIZE
            ),
            MmuError::InvalidMemorySize(size) => {
                write!(
                    f,
                    "invalid memory size {}: must be a non-zero multiple of the page size",
                    size
                )
            }
            MmuError::ProcessNotFound(pid) => write!(f, "process {} not found", pid),
            MmuError::VariableNotFound { pid, name } => {
                write!(f, "variable {} not found in process {}", name, pid)
            }
            MmuError::VariableAlreadyExists { pid, name } => {
                write!(f, "variable {} already exists in process {}", name, pid)
            }
            MmuError::UnknownDataKind(kind) => write!(f, "unknown data type '{}'", kind),
            MmuError::InvalidSize => write!(f, "cannot allocate zero bytes"),
            MmuError::ReservedName(name) => write!(f, "'{}' is a reserved name", name),
            MmuError::InsufficientMemory { requested } => write!(
                f,
                "allocation of {} bytes exceeds system memory",
                requested
            ),
            MmuError::OutOfFrames => write!(f, "out of physical frames"),
            MmuError::NotMapped {
                pid,
                virtual_address,
            } => write!(
                f,
                "virtual address 0x{:x} of process {} is not mapped",
                virtual_address, pid
            ),
            MmuError::OutOfBounds { name, index, count } => write!(
                f,
                "index {} is out of bounds for {} ({} elements)",
                index, name, count
            ),
            MmuError::InvalidValue { kind, text } => {
                write!(f, "'{}' is not a valid {} value", text, kind)
            }
        }
    }
}

impl std::error::Error for MmuError {}

/// Result type for MMU operations
pub type Result<T> = std::result::Result<T, MmuError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(MmuError::ProcessNotFound(1030).to_string(), "process 1030 not found");
        assert_eq!(
            MmuError::NotMapped {
                pid: 1024,
                virtual_address: 0x40,
            }
            .to_string(),
            "virtual address 0x40 of process 1024 is not mapped"
        );
        assert!(MmuError::InvalidPageSize(1000).to_string().contains("2048"));
    }
}
