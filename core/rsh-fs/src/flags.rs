//!
//! Open-flag bits recognized by `FileSystem::open`.
//!

bitflags::bitflags! {
    /// Flags passed to [`crate::FileSystem::open`]. With neither `READ_ONLY`
    /// nor `WRITE_ONLY` set, a descriptor defaults to read-write (matching
    /// the reference header's "bit-distinct; 0 = read-write by default").
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct OpenFlags: u32 {
        /// Create the file if it does not already exist.
        const CREATE      = 1 << 0;
        const READ_ONLY   = 1 << 1;
        const WRITE_ONLY  = 1 << 2;
        const READ_WRITE  = 1 << 3;
    }
}

impl OpenFlags {
    pub(crate) fn can_read(self) -> bool {
        !self.contains(OpenFlags::WRITE_ONLY)
    }

    pub(crate) fn can_write(self) -> bool {
        !self.contains(OpenFlags::READ_ONLY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_flags_allow_both_directions() {
        let flags = OpenFlags::empty();
        assert!(flags.can_read());
        assert!(flags.can_write());
    }

    #[test]
    fn read_only_forbids_write() {
        let flags = OpenFlags::READ_ONLY;
        assert!(flags.can_read());
        assert!(!flags.can_write());
    }

    #[test]
    fn write_only_forbids_read() {
        let flags = OpenFlags::WRITE_ONLY;
        assert!(!flags.can_read());
        assert!(flags.can_write());
    }
}
