//! Live processes and pid issuance

use crate::constants::FIRST_PID;
use crate::segment::Segment;

/// A simulated process and its address-space layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Process {
    pub pid: u32,
    /// Ordered by virtual address, always tiling the whole address space
    pub segments: Vec<Segment>,
}

impl Process {
    /// Index of the live variable called `name`
    pub fn variable_index(&self, name: &str) -> Option<usize> {
        self.segments.iter().position(|seg| !seg.is_free() && seg.name == name)
    }

    pub fn variable(&self, name: &str) -> Option<&Segment> {
        self.variable_index(name).map(|index| &self.segments[index])
    }

    pub fn variables(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter().filter(|seg| !seg.is_free())
    }

    /// Whether a live variable covers any byte of `[start, end)`
    pub fn occupies(&self, start: u32, end: u32) -> bool {
        self.variables().any(|seg| seg.overlaps(start, end))
    }

}

/// Processes in creation order. Pids start at 1024 and are never reused.
pub struct ProcessRegistry {
    next_pid: u32,
    processes: Vec<Process>,
}

impl ProcessRegistry {
    pub fn new() -> Self {
        ProcessRegistry {
            next_pid: FIRST_PID,
            processes: Vec::new(),
        }
    }

    /// Register a process whose address space is one free hole of `space` bytes
    pub fn spawn(&mut self, space: u32) -> u32 {
        let pid = self.next_pid;
        self.next_pid += 1;
        self.processes.push(Process {
            pid,
            segments: vec![Segment::free(0, space)],
        });
        pid
    }

    pub fn get(&self, pid: u32) -> Option<&Process> {
        self.processes.iter().find(|proc| proc.pid == pid)
    }

    pub fn get_mut(&mut self, pid: u32) -> Option<&mut Process> {
        self.processes.iter_mut().find(|proc| proc.pid == pid)
    }

    pub fn remove(&mut self, pid: u32) -> Option<Process> {
        let index = self.processes.iter().position(|proc| proc.pid == pid)?;
        Some(self.processes.remove(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Process> {
        self.processes.iter()
    }
}

impl Default for ProcessRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DataType;

    #[test]
    fn test_pids_are_monotonic_and_not_reused() {
        let mut registry = ProcessRegistry::new();
        assert_eq!(registry.spawn(1024), 1024);
        assert_eq!(registry.spawn(1024), 1025);
        assert!(registry.remove(1025).is_some());
        assert_eq!(registry.spawn(1024), 1026);
        let pids: Vec<u32> = registry.iter().map(|p| p.pid).collect();
        assert_eq!(pids, vec![1024, 1026]);
    }

    #[test]
    fn test_new_process_is_one_hole() {
        let mut registry = ProcessRegistry::new();
        let pid = registry.spawn(4096);
        let proc = registry.get(pid).unwrap();
        assert_eq!(proc.segments, vec![Segment::free(0, 4096)]);
        assert!(registry.get(9999).is_none());
        assert!(registry.remove(9999).is_none());
    }

    #[test]
    fn test_variable_lookup_skips_free_space() {
        let proc = Process {
            pid: 1024,
            segments: vec![
                Segment::variable("x", DataType::Int, 0, 4),
                Segment::free(4, 60),
            ],
        };
        assert_eq!(proc.variable_index("x"), Some(0));
        assert!(proc.variable(crate::constants::FREE_SPACE_NAME).is_none());
        assert!(proc.occupies(0, 4));
        assert!(!proc.occupies(4, 64));
    }
}
