//!
//! The block file system itself: a name index, an arena of files, and a
//! slot-reused descriptor table — all owned by a `FileSystem` value rather
//! than the reference implementation's process globals (`file_list`,
//! `file_descriptors`, `ufs_error_code`). Tests instantiate as many
//! independent file systems as they need.
//!

use std::collections::HashMap;

use crate::block::{Block, BLOCK_SIZE, MAX_BLOCKS};
use crate::descriptor::Descriptor;
use crate::error::UfsError;
use crate::file::{FileEntry, FileId};
use crate::flags::OpenFlags;

/// A file descriptor: a small non-negative integer whose value is the slot
/// index it occupies in the descriptor table.
pub type Fd = i32;

pub struct FileSystem {
    files: Vec<Option<FileEntry>>,
    name_index: HashMap<String, FileId>,
    descriptors: Vec<Option<Descriptor>>,
    last_error: Option<UfsError>,
}

impl FileSystem {
    pub fn new() -> Self {
        Self {
            files: Vec::new(),
            name_index: HashMap::new(),
            descriptors: Vec::new(),
            last_error: None,
        }
    }

    /// The error set by the most recent operation; `None` on success,
    /// mirroring the reference's `errno_get()` except that Rust's `Result`
    /// already distinguishes success from failure, so there is no
    /// separate `NO_ERR` sentinel to represent.
    pub fn last_error(&self) -> Option<UfsError> {
        self.last_error
    }

    fn fail(&mut self, err: UfsError) -> UfsError {
        self.last_error = Some(err);
        err
    }

    fn succeed(&mut self) {
        self.last_error = None;
    }

    fn find_by_name(&self, name: &str) -> Option<FileId> {
        self.name_index.get(name).copied()
    }

    fn create_file(&mut self, name: &str) -> FileId {
        let entry = FileEntry::new(name.to_string());
        let id = match self.files.iter().position(Option::is_none) {
            Some(idx) => {
                self.files[idx] = Some(entry);
                FileId(idx)
            }
            None => {
                self.files.push(Some(entry));
                FileId(self.files.len() - 1)
            }
        };
        self.name_index.insert(name.to_string(), id);
        id
    }

    fn file_mut(&mut self, id: FileId) -> &mut FileEntry {
        self.files[id.0].as_mut().expect("file id must reference a live file")
    }

    fn file(&self, id: FileId) -> &FileEntry {
        self.files[id.0].as_ref().expect("file id must reference a live file")
    }

    fn next_fd_slot(&self) -> usize {
        self.descriptors.iter().position(Option::is_none).unwrap_or(self.descriptors.len())
    }

    fn descriptor(&self, fd: Fd) -> Result<&Descriptor, UfsError> {
        if fd < 0 {
            return Err(UfsError::NoFile);
        }
        self.descriptors
            .get(fd as usize)
            .and_then(Option::as_ref)
            .ok_or(UfsError::NoFile)
    }

    fn descriptor_mut(&mut self, fd: Fd) -> Result<&mut Descriptor, UfsError> {
        if fd < 0 {
            return Err(UfsError::NoFile);
        }
        self.descriptors
            .get_mut(fd as usize)
            .and_then(Option::as_mut)
            .ok_or(UfsError::NoFile)
    }

    /// Open `name`, creating it first if `flags` contains `CREATE` and no
    /// live (non-pending-deletion) file by that name exists. Returns the
    /// lowest-indexed free descriptor slot.
    pub fn open(&mut self, name: &str, flags: OpenFlags) -> Result<Fd, UfsError> {
        if name.is_empty() {
            return Err(self.fail(UfsError::NoFile));
        }

        let file_id = match self.find_by_name(name) {
            Some(id) => id,
            None => {
                if !flags.contains(OpenFlags::CREATE) {
                    return Err(self.fail(UfsError::NoFile));
                }
                self.create_file(name)
            }
        };

        let slot = self.next_fd_slot();
        if slot == self.descriptors.len() {
            self.descriptors.push(None);
        }
        self.descriptors[slot] = Some(Descriptor::new(file_id, flags));
        self.file_mut(file_id).refs += 1;

        self.succeed();
        tracing::debug!("opened {name:?} as fd {slot}");
        Ok(slot as Fd)
    }

    /// Write `buf` starting at the descriptor's own cursor, allocating new
    /// blocks as the current one fills. The entire buffer is written or
    /// the call fails at the first block that would exceed `MAX_BLOCKS`;
    /// bytes already written to prior blocks in this call remain in place,
    /// matching the reference implementation and the size-ceiling test.
    pub fn write(&mut self, fd: Fd, buf: &[u8]) -> Result<usize, UfsError> {
        let (file_id, flags) = {
            let desc = self.descriptor(fd)?;
            (desc.file, desc.flags)
        };
        if !flags.can_write() {
            return Err(self.fail(UfsError::NoPermission));
        }

        let mut written = 0usize;
        while written < buf.len() {
            let desc = self.descriptor_mut(fd).expect("fd validated above");
            if desc.byte_offset == BLOCK_SIZE {
                if desc.block_index + 1 >= MAX_BLOCKS {
                    return Err(self.fail(UfsError::NoMem));
                }
                desc.block_index += 1;
                desc.byte_offset = 0;
            }

            let desc = self.descriptor(fd).expect("fd validated above");
            let block_index = desc.block_index;
            let offset = desc.byte_offset;

            let file = self.file_mut(file_id);
            if block_index >= file.blocks.len() {
                file.blocks.push(Block::new());
            }
            let block = &mut file.blocks[block_index];
            let space = BLOCK_SIZE - offset;
            let chunk = space.min(buf.len() - written);
            block.as_mut_slice()[offset..offset + chunk].copy_from_slice(&buf[written..written + chunk]);
            block.occupied = block.occupied.max(offset + chunk);

            let desc = self.descriptor_mut(fd).expect("fd validated above");
            desc.byte_offset += chunk;
            written += chunk;
        }

        self.succeed();
        Ok(written)
    }

    /// Read up to `buf.len()` bytes starting at the descriptor's own
    /// cursor, never past a block's occupied count. Returns `0` at end of
    /// file.
    pub fn read(&mut self, fd: Fd, buf: &mut [u8]) -> Result<usize, UfsError> {
        let (file_id, flags) = {
            let desc = self.descriptor(fd)?;
            (desc.file, desc.flags)
        };
        if !flags.can_read() {
            return Err(self.fail(UfsError::NoPermission));
        }

        let mut read_total = 0usize;
        loop {
            if read_total >= buf.len() {
                break;
            }
            let desc = self.descriptor(fd).expect("fd validated above");
            let at_block_boundary = desc.byte_offset == BLOCK_SIZE;
            let current_block = desc.block_index;
            if at_block_boundary {
                if current_block + 1 >= self.file(file_id).blocks.len() {
                    break;
                }
                let desc = self.descriptor_mut(fd).expect("fd validated above");
                desc.block_index += 1;
                desc.byte_offset = 0;
            }

            let desc = self.descriptor_mut(fd).expect("fd validated above");
            let block_index = desc.block_index;
            let offset = desc.byte_offset;
            let file = self.file(file_id);
            let block = &file.blocks[block_index];
            let avail = block.occupied.saturating_sub(offset);
            if avail == 0 {
                break;
            }
            let chunk = avail.min(buf.len() - read_total);
            buf[read_total..read_total + chunk]
                .copy_from_slice(&block.as_slice()[offset..offset + chunk]);

            let desc = self.descriptor_mut(fd).expect("fd validated above");
            desc.byte_offset += chunk;
            read_total += chunk;
        }

        self.succeed();
        Ok(read_total)
    }

    /// Close `fd`, decrementing its file's reference count. If the file is
    /// pending deletion and this was the last reference, its storage is
    /// reclaimed.
    pub fn close(&mut self, fd: Fd) -> Result<(), UfsError> {
        let file_id = self.descriptor(fd)?.file;
        self.descriptors[fd as usize] = None;

        let file = self.file_mut(file_id);
        file.refs -= 1;
        if file.refs == 0 && file.pending_deletion {
            tracing::debug!("reclaiming {:?} after last descriptor closed", self.file(file_id).name);
            self.files[file_id.0] = None;
        }

        self.succeed();
        Ok(())
    }

    /// Remove `name` from the name index. If no descriptors are open on
    /// it, its storage is reclaimed immediately; otherwise it becomes
    /// pending-deletion and is reclaimed when the last descriptor closes.
    pub fn unlink(&mut self, name: &str) -> Result<(), UfsError> {
        let file_id = match self.find_by_name(name) {
            Some(id) => id,
            None => return Err(self.fail(UfsError::NoFile)),
        };
        self.name_index.remove(name);

        let file = self.file_mut(file_id);
        if file.refs == 0 {
            self.files[file_id.0] = None;
        } else {
            file.pending_deletion = true;
        }

        self.succeed();
        Ok(())
    }

    /// Tear down every file and descriptor. Intended for test-suite
    /// cleanup between scenarios, not for mid-life use.
    pub fn destroy(&mut self) {
        self.files.clear();
        self.name_index.clear();
        self.descriptors.clear();
        self.last_error = None;
    }
}

impl Default for FileSystem {
    fn default() -> Self {
        Self::new()
    }
}
