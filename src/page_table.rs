//! Page table: (pid, virtual page) -> physical frame, plus the frame lease pool

use std::collections::BTreeSet;

use hashbrown::HashMap;

use crate::error::{MmuError, Result};
use crate::translation::VirtualAddress;

/// Composite key of a page-table entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageKey {
    pub pid: u32,
    pub page: u32,
}

impl PageKey {
    pub fn new(pid: u32, page: u32) -> Self {
        PageKey { pid, page }
    }
}

pub struct PageTable {
    page_size: u32,
    frame_count: u32,
    entries: HashMap<PageKey, u32>,
    /// Frames not leased to any (pid, page); lowest is handed out first
    free_frames: BTreeSet<u32>,
}

impl PageTable {
    /// `page_size` and `memory_size` are expected to be validated already
    pub fn new(page_size: u32, memory_size: u32) -> Self {
        let frame_count = memory_size / page_size;
        PageTable {
            page_size,
            frame_count,
            entries: HashMap::new(),
            free_frames: (0..frame_count).collect(),
        }
    }

    #[inline]
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    #[inline]
    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    pub fn free_frame_count(&self) -> usize {
        self.free_frames.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Frame currently backing (pid, page), if any
    pub fn frame_of(&self, pid: u32, page: u32) -> Option<u32> {
        self.entries.get(&PageKey::new(pid, page)).copied()
    }

    /// Map (pid, page) to a frame, leasing the lowest free frame if the page
    /// has no mapping yet. An existing mapping is returned unchanged.
    pub fn ensure_mapped(&mut self, pid: u32, page: u32) -> Result<u32> {
        let key = PageKey::new(pid, page);
        if let Some(&frame) = self.entries.get(&key) {
            return Ok(frame);
        }

        let frame = self.free_frames.pop_first().ok_or(MmuError::OutOfFrames)?;
        self.entries.insert(key, frame);
        log::debug!("mapped pid {} page {} -> frame {}", pid, page, frame);
        Ok(frame)
    }

    /// Drop the (pid, page) mapping unless some live variable still sits on it
    pub fn unmap_if_unused(&mut self, pid: u32, page: u32, still_occupied: bool) {
        if still_occupied {
            return;
        }
        if let Some(frame) = self.entries.remove(&PageKey::new(pid, page)) {
            self.free_frames.insert(frame);
            log::debug!("unmapped pid {} page {} (frame {} released)", pid, page, frame);
        }
    }

    /// Virtual to physical address translation
    pub fn translate(&self, pid: u32, virtual_address: u32) -> Result<u32> {
        let va = VirtualAddress::from_raw(virtual_address, self.page_size);
        let frame = self
            .frame_of(pid, va.page)
            .ok_or(MmuError::NotMapped {
                pid,
                virtual_address,
            })?;

        Ok(frame * self.page_size + va.offset)
    }

    /// Remove every mapping owned by `pid`. Returns how many were removed.
    pub fn drop_all_for_process(&mut self, pid: u32) -> usize {
        let free_frames = &mut self.free_frames;
        let before = self.entries.len();
        self.entries.retain(|key, frame| {
            if key.pid == pid {
                free_frames.insert(*frame);
                false
            } else {
                true
            }
        });
        before - self.entries.len()
    }

    /// Number of pages mapped for one process
    pub fn pages_for_process(&self, pid: u32) -> usize {
        self.entries.keys().filter(|key| key.pid == pid).count()
    }

    /// All entries ordered by pid, then page number
    pub fn sorted_entries(&self) -> Vec<(PageKey, u32)> {
        let mut entries: Vec<(PageKey, u32)> =
            self.entries.iter().map(|(&key, &frame)| (key, frame)).collect();
        entries.sort_unstable_by_key(|&(key, _)| key);
        entries
    }
}
