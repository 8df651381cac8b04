use std::ops::RangeInclusive;

/// Represents the decomposed components of a Virtual Address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VirtualAddress {
    pub va: u32,
    pub page: u32,
    pub offset: u32,
}

impl VirtualAddress {
    /// Decompose a raw VA for a power-of-two page size
    pub fn from_raw(va: u32, page_size: u32) -> Self {
        debug_assert!(page_size.is_power_of_two());
        let shift = page_size.trailing_zeros();
        let page = va >> shift;
        let offset = va & (page_size - 1);

        VirtualAddress { va, page, offset }
    }
}

impl std::fmt::Display for VirtualAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "VA({}) = (page={}, offset={})", self.va, self.page, self.offset)
    }
}

/// Pages touched by the non-empty byte range `[start, start + len)`
pub fn page_span(start: u32, len: u32, page_size: u32) -> RangeInclusive<u32> {
    debug_assert!(len > 0);
    let first = VirtualAddress::from_raw(start, page_size).page;
    let last = VirtualAddress::from_raw(start + (len - 1), page_size).page;
    first..=last
}

/// Split `[start, start + len)` at page boundaries into `(address, length)` pieces
pub fn page_chunks(start: u32, len: u32, page_size: u32) -> Vec<(u32, u32)> {
    let mut chunks = Vec::new();
    let end = start + len;
    let mut cursor = start;
    while cursor < end {
        let offset = VirtualAddress::from_raw(cursor, page_size).offset;
        let piece = (page_size - offset).min(end - cursor);
        chunks.push((cursor, piece));
        cursor += piece;
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_va_decomposition() {
        let va = VirtualAddress::from_raw(4096 * 3 + 17, 4096);
        assert_eq!(va.page, 3);
        assert_eq!(va.offset, 17);

        let va = VirtualAddress::from_raw(2047, 2048);
        assert_eq!(va.page, 0);
        assert_eq!(va.offset, 2047);

        let va = VirtualAddress::from_raw(2048, 2048);
        assert_eq!(va.page, 1);
        assert_eq!(va.offset, 0);
    }

    #[test]
    fn test_va_reconstruction() {
        for &original in &[0, 40, 4095, 4096, 65_535, 1_048_575] {
            let va = VirtualAddress::from_raw(original, 8192);
            assert_eq!(va.page * 8192 + va.offset, original, "Failed for VA={}", original);
        }
    }

    #[test]
    fn test_page_span() {
        assert_eq!(page_span(0, 40, 4096), 0..=0);
        assert_eq!(page_span(4090, 6, 4096), 0..=0);
        assert_eq!(page_span(4090, 7, 4096), 0..=1);
        assert_eq!(page_span(0, 65_536, 4096), 0..=15);
    }

    #[test]
    fn test_page_chunks_split_at_boundary() {
        assert_eq!(page_chunks(4092, 8, 4096), vec![(4092, 4), (4096, 4)]);
        assert_eq!(page_chunks(100, 8, 4096), vec![(100, 8)]);
        assert_eq!(page_chunks(0, 10_000, 4096), vec![(0, 4096), (4096, 4096), (8192, 1808)]);
        assert!(page_chunks(50, 0, 4096).is_empty());
    }

    #[test]
    fn test_display() {
        let display = format!("{}", VirtualAddress::from_raw(4097, 4096));
        assert!(display.contains("4097"));
        assert!(display.contains("page=1"));
        assert!(display.contains("offset=1"));
    }
}
