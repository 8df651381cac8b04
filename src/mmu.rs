//! Address space manager
//!
//! Owns every process's segment list together with the page table, so a
//! segment split or merge and the matching page (un)mapping always happen
//! inside the same `&mut self` call.

use crate::config::Config;
use crate::constants::*;
use crate::error::{MmuError, Result};
use crate::page_table::PageTable;
use crate::process::{Process, ProcessRegistry};
use crate::segment::{self, Segment};
use crate::translation::page_span;
use crate::types::DataType;

pub struct Mmu {
    memory_size: u32,
    processes: ProcessRegistry,
    page_table: PageTable,
    /// Admission budget: decremented on allocate, incremented on free
    remaining_memory: u32,
}

impl Mmu {
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Mmu {
            memory_size: config.memory_size,
            processes: ProcessRegistry::new(),
            page_table: PageTable::new(config.page_size, config.memory_size),
            remaining_memory: config.memory_size,
        })
    }

    #[inline]
    pub fn page_size(&self) -> u32 {
        self.page_table.page_size()
    }

    #[inline]
    pub fn memory_size(&self) -> u32 {
        self.memory_size
    }

    #[inline]
    pub fn remaining_memory(&self) -> u32 {
        self.remaining_memory
    }

    pub fn page_table(&self) -> &PageTable {
        &self.page_table
    }

    pub fn processes(&self) -> impl Iterator<Item = &Process> {
        self.processes.iter()
    }

    /// Start a bare process: its whole virtual space is one free hole and no
    /// page is mapped yet.
    pub fn create_process(&mut self) -> u32 {
        let pid = self.processes.spawn(self.memory_size);
        log::info!("created process {}", pid);
        pid
    }

    /// Start a program: a bare process plus its text, globals and stack
    /// regions, allocated in that order. A text or globals size of zero skips
    /// that region. If any region fails the process is torn down again and the
    /// error returned.
    pub fn create_program(&mut self, text_size: u32, data_size: u32) -> Result<u32> {
        let pid = self.create_process();
        let regions = [
            (TEXT_NAME, text_size),
            (GLOBALS_NAME, data_size),
            (STACK_NAME, STACK_SIZE),
        ];
        for (name, size) in regions {
            if size == 0 {
                continue;
            }
            if let Err(e) = self.allocate_bytes(pid, name, DataType::Char, size) {
                self.terminate(pid)?;
                return Err(e);
            }
        }
        Ok(pid)
    }

    /// First-fit allocation of `count` elements of `kind`. Returns the
    /// variable's virtual address.
    pub fn allocate(&mut self, pid: u32, name: &str, kind: DataType, count: u32) -> Result<u32> {
        if kind.is_free() {
            return Err(MmuError::UnknownDataKind(kind.label().to_string()));
        }
        let requested = count
            .checked_mul(kind.size_of())
            .ok_or(MmuError::InsufficientMemory {
                requested: u32::MAX,
            })?;
        self.allocate_bytes(pid, name, kind, requested)
    }

    fn allocate_bytes(
        &mut self,
        pid: u32,
        name: &str,
        kind: DataType,
        requested: u32,
    ) -> Result<u32> {
        let process = self
            .processes
            .get_mut(pid)
            .ok_or(MmuError::ProcessNotFound(pid))?;
        if name == FREE_SPACE_NAME {
            return Err(MmuError::ReservedName(name.to_string()));
        }
        if process.variable_index(name).is_some() {
            return Err(MmuError::VariableAlreadyExists {
                pid,
                name: name.to_string(),
            });
        }
        if requested == 0 {
            return Err(MmuError::InvalidSize);
        }
        if requested > self.remaining_memory {
            return Err(MmuError::InsufficientMemory { requested });
        }

        let hole = process
            .segments
            .iter()
            .position(|seg| seg.is_free() && seg.size >= requested)
            .ok_or(MmuError::InsufficientMemory { requested })?;
        let virtual_address = process.segments[hole].virtual_address;

        // Pages first: a failure here must leave the segment list untouched
        map_pages(&mut self.page_table, pid, virtual_address, requested)?;

        let variable = Segment::variable(name, kind, virtual_address, requested);
        let free = &mut process.segments[hole];
        if free.size == requested {
            *free = variable;
        } else {
            free.virtual_address += requested;
            free.size -= requested;
            process.segments.insert(hole, variable);
        }
        self.remaining_memory -= requested;

        log::debug!(
            "pid {}: allocated {} ({} bytes of {}) at 0x{:x}",
            pid,
            name,
            requested,
            kind,
            virtual_address
        );
        Ok(virtual_address)
    }

    /// Release a variable, coalesce the hole it leaves, and unmap pages no
    /// other variable of the process still touches.
    pub fn free(&mut self, pid: u32, name: &str) -> Result<()> {
        let page_size = self.page_table.page_size();
        let process = self
            .processes
            .get_mut(pid)
            .ok_or(MmuError::ProcessNotFound(pid))?;
        let index = process
            .variable_index(name)
            .ok_or_else(|| MmuError::VariableNotFound {
                pid,
                name: name.to_string(),
            })?;
        let start = process.segments[index].virtual_address;
        let size = process.segments[index].size;

        segment::release_and_coalesce(&mut process.segments, index);

        if size > 0 {
            for page in page_span(start, size, page_size) {
                let page_start = page * page_size;
                let occupied = process.occupies(page_start, page_start.saturating_add(page_size));
                self.page_table.unmap_if_unused(pid, page, occupied);
            }
        }
        self.remaining_memory += size;

        log::debug!("pid {}: freed {} ({} bytes at 0x{:x})", pid, name, size, start);
        Ok(())
    }

    /// Free everything the process owns and forget it
    pub fn terminate(&mut self, pid: u32) -> Result<()> {
        let process = self.processes.get(pid).ok_or(MmuError::ProcessNotFound(pid))?;
        let names: Vec<String> = process.variables().map(|seg| seg.name.clone()).collect();
        for name in &names {
            self.free(pid, name)?;
        }

        self.processes.remove(pid);
        let leftover = self.page_table.drop_all_for_process(pid);
        if leftover > 0 {
            log::warn!("pid {}: dropped {} leftover page mappings", pid, leftover);
        }
        log::info!("terminated process {}", pid);
        Ok(())
    }

    pub fn translate(&self, pid: u32, virtual_address: u32) -> Result<u32> {
        self.page_table.translate(pid, virtual_address)
    }

    pub fn find_process(&self, pid: u32) -> Option<&Process> {
        self.processes.get(pid)
    }

    pub fn find_variable(&self, pid: u32, name: &str) -> Option<&Segment> {
        self.processes.get(pid)?.variable(name)
    }

    /// Like `find_variable`, but with the lookup failure spelled out
    pub fn variable(&self, pid: u32, name: &str) -> Result<&Segment> {
        let process = self.find_process(pid).ok_or(MmuError::ProcessNotFound(pid))?;
        process
            .variable(name)
            .ok_or_else(|| MmuError::VariableNotFound {
                pid,
                name: name.to_string(),
            })
    }

    /// Virtual address of element `index` of a variable
    pub fn element_address(&self, pid: u32, name: &str, index: u32) -> Result<u32> {
        let variable = self.variable(pid, name)?;
        let count = variable.element_count();
        if index >= count {
            return Err(MmuError::OutOfBounds {
                name: name.to_string(),
                index,
                count,
            });
        }
        Ok(variable.virtual_address + index * variable.kind.size_of())
    }
}

/// Map every page of `[start, start + len)`. On failure, pages newly mapped
/// by this call are unmapped again before the error is returned.
fn map_pages(page_table: &mut PageTable, pid: u32, start: u32, len: u32) -> Result<()> {
    let mut fresh = Vec::new();
    for page in page_span(start, len, page_table.page_size()) {
        let existed = page_table.frame_of(pid, page).is_some();
        match page_table.ensure_mapped(pid, page) {
            Ok(_) if !existed => fresh.push(page),
            Ok(_) => {}
            Err(e) => {
                for &page in &fresh {
                    page_table.unmap_if_unused(pid, page, false);
                }
                log::debug!("pid {}: mapping failed, released {} fresh pages", pid, fresh.len());
                return Err(e);
            }
        }
    }
    Ok(())
}
