//! Segments of a process's virtual address space and the coalescing pass

use crate::constants::FREE_SPACE_NAME;
use crate::types::DataType;

/// A contiguous region of a process's virtual space: a variable or a free hole
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub name: String,
    pub kind: DataType,
    pub virtual_address: u32,
    pub size: u32,
}

impl Segment {
    pub fn free(virtual_address: u32, size: u32) -> Self {
        Segment {
            name: FREE_SPACE_NAME.to_string(),
            kind: DataType::FreeSpace,
            virtual_address,
            size,
        }
    }

    pub fn variable(name: &str, kind: DataType, virtual_address: u32, size: u32) -> Self {
        Segment {
            name: name.to_string(),
            kind,
            virtual_address,
            size,
        }
    }

    #[inline]
    pub fn is_free(&self) -> bool {
        self.kind.is_free()
    }

    /// One past the last byte
    #[inline]
    pub fn end(&self) -> u32 {
        self.virtual_address + self.size
    }

    /// Number of elements for a variable; zero for free space
    pub fn element_count(&self) -> u32 {
        match self.kind.size_of() {
            0 => 0,
            width => self.size / width,
        }
    }

    /// Whether any byte of the segment lies in `[start, end)`
    #[inline]
    pub fn overlaps(&self, start: u32, end: u32) -> bool {
        self.size > 0 && self.virtual_address < end && start < self.end()
    }

    fn release(&mut self) {
        self.name = FREE_SPACE_NAME.to_string();
        self.kind = DataType::FreeSpace;
    }
}

/// Turn the segment at `index` into free space and merge it with free neighbours.
///
/// Returns the index of the resulting free segment.
pub fn release_and_coalesce(segments: &mut Vec<Segment>, index: usize) -> usize {
    segments[index].release();
    let mut index = index;

    if index > 0 && segments[index - 1].is_free() {
        let merged = segments.remove(index);
        segments[index - 1].size += merged.size;
        index -= 1;
        log::debug!(
            "merged free hole into predecessor at 0x{:x}",
            segments[index].virtual_address
        );
    }

    if index + 1 < segments.len() && segments[index + 1].is_free() {
        let merged = segments.remove(index + 1);
        segments[index].size += merged.size;
        log::debug!(
            "merged successor into free hole at 0x{:x}",
            segments[index].virtual_address
        );
    }

    index
}

/// Segments tile `[0, total)` in address order with no gaps or overlaps
pub fn is_tiling(segments: &[Segment], total: u32) -> bool {
    let mut cursor = 0u32;
    for segment in segments {
        if segment.virtual_address != cursor {
            return false;
        }
        cursor = segment.end();
    }
    cursor == total
}

/// No two neighbouring segments are both free
pub fn is_coalesced(segments: &[Segment]) -> bool {
    segments.windows(2).all(|pair| !(pair[0].is_free() && pair[1].is_free()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> Vec<Segment> {
        vec![
            Segment::free(0, 16),
            Segment::variable("a", DataType::Int, 16, 8),
            Segment::free(24, 8),
            Segment::variable("b", DataType::Char, 32, 4),
            Segment::variable("c", DataType::Long, 36, 8),
            Segment::free(44, 20),
        ]
    }

    #[test]
    fn test_merge_both_sides() {
        let mut segments = layout();
        let index = release_and_coalesce(&mut segments, 1);
        assert_eq!(index, 0);
        assert_eq!(segments[0], Segment::free(0, 32));
        assert_eq!(segments.len(), 4);
        assert!(is_tiling(&segments, 64));
        assert!(is_coalesced(&segments));
    }

    #[test]
    fn test_merge_predecessor_only() {
        let mut segments = layout();
        let index = release_and_coalesce(&mut segments, 3);
        assert_eq!(index, 2);
        assert_eq!(segments[2], Segment::free(24, 12));
        assert_eq!(segments[3].name, "c");
        assert!(is_tiling(&segments, 64));
    }

    #[test]
    fn test_merge_successor_only() {
        let mut segments = layout();
        let index = release_and_coalesce(&mut segments, 4);
        assert_eq!(index, 4);
        assert_eq!(segments[4], Segment::free(36, 28));
        assert_eq!(segments.len(), 5);
        assert!(is_coalesced(&segments));
    }

    #[test]
    fn test_no_free_neighbours() {
        let mut segments = vec![
            Segment::variable("a", DataType::Int, 0, 4),
            Segment::variable("b", DataType::Int, 4, 4),
            Segment::variable("c", DataType::Int, 8, 4),
        ];
        let index = release_and_coalesce(&mut segments, 1);
        assert_eq!(index, 1);
        assert_eq!(segments[1], Segment::free(4, 4));
        assert_eq!(segments.len(), 3);
    }

    #[test]
    fn test_overlaps() {
        let seg = Segment::variable("x", DataType::Int, 4090, 8);
        assert!(seg.overlaps(0, 4096));
        assert!(seg.overlaps(4096, 8192));
        assert!(!seg.overlaps(8192, 12288));
        assert!(!Segment::free(10, 0).overlaps(0, 4096));
    }

    #[test]
    fn test_tiling_detects_gap() {
        let segments = vec![Segment::free(0, 10), Segment::variable("x", DataType::Char, 11, 5)];
        assert!(!is_tiling(&segments, 16));
    }

    #[test]
    fn test_element_count() {
        assert_eq!(Segment::variable("x", DataType::Double, 0, 80).element_count(), 10);
        assert_eq!(Segment::free(0, 80).element_count(), 0);
    }
}
