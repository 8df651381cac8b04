/// Simulated physical memory: a flat, zeroed byte store addressed by physical address.
///
/// The MMU core never touches it; the simulator reads and writes it at
/// addresses the page table hands back.
pub struct PhysicalMemory {
    data: Box<[u8]>,
}

impl PhysicalMemory {
    /// Create a new physical memory of `size` bytes, initialized to all zeros
    pub fn new(size: u32) -> Self {
        PhysicalMemory {
            data: vec![0u8; size as usize].into_boxed_slice(),
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Read `len` bytes starting at `address`
    #[inline]
    pub fn read(&self, address: u32, len: u32) -> &[u8] {
        let start = address as usize;
        &self.data[start..start + len as usize]
    }

    /// Write `bytes` starting at `address`
    #[inline]
    pub fn write(&mut self, address: u32, bytes: &[u8]) {
        let start = address as usize;
        self.data[start..start + bytes.len()].copy_from_slice(bytes);
    }
}
