use std::cell::RefCell;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::rc::Rc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HandleError {
    #[error("Writing to closed file")]
    Closed,
    #[error("expected a file handle")]
    NotAFile,
    #[error("expected a memory block")]
    NotMemory,
    #[error("offset {offset} is outside a block of {size} bytes")]
    OutOfBounds { offset: usize, size: usize },
    #[error("cannot allocate {size} bytes")]
    TooLarge { size: usize },
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// An opaque resource: an open file or a bounds-checked memory block.
/// Copies of a handle refer to the same resource, so closing through one
/// closes it for all.
/// Largest block `mem.alloc` hands out.
pub const MAX_BLOCK_SIZE: usize = 256 * 1024 * 1024;

#[derive(Clone, Debug)]
pub struct Handle {
    data: Rc<RefCell<Resource>>,
}

#[derive(Debug)]
enum Resource {
    File(File),
    Memory(Vec<u8>),
    Closed,
}

fn open_options(mode: &str) -> io::Result<OpenOptions> {
    let mut options = OpenOptions::new();
    match mode.replace('b', "").as_str() {
        "r" => options.read(true),
        "w" => options.write(true).create(true).truncate(true),
        "a" => options.append(true).create(true),
        "r+" => options.read(true).write(true),
        "w+" => options.read(true).write(true).create(true).truncate(true),
        "a+" => options.read(true).append(true).create(true),
        other => {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("unknown file mode '{}'", other),
            ))
        }
    };
    Ok(options)
}

impl Handle {
    fn wrap(resource: Resource) -> Handle {
        Handle {
            data: Rc::new(RefCell::new(resource)),
        }
    }
    /// Opens `path` with a C-style mode string (`r`, `w`, `a`, optionally
    /// with `+` and `b`).
    pub fn open(path: &str, mode: &str) -> io::Result<Handle> {
        let file = open_options(mode)?.open(path)?;
        Ok(Handle::wrap(Resource::File(file)))
    }
    /// A zeroed block. Sizes over `MAX_BLOCK_SIZE`, or that the allocator
    /// refuses, are an error rather than an abort.
    pub fn memory(size: usize) -> Result<Handle, HandleError> {
        if size > MAX_BLOCK_SIZE {
            return Err(HandleError::TooLarge { size });
        }
        let mut block: Vec<u8> = Vec::new();
        block
            .try_reserve_exact(size)
            .map_err(|_| HandleError::TooLarge { size })?;
        block.resize(size, 0);
        Ok(Handle::wrap(Resource::Memory(block)))
    }
    pub fn as_ptr(&self) -> *const () {
        Rc::as_ptr(&self.data) as *const ()
    }
    #[cfg(test)]
    pub fn is_closed(&self) -> bool {
        matches!(*self.data.borrow(), Resource::Closed)
    }
    pub fn write(&self, text: &str) -> Result<(), HandleError> {
        match &mut *self.data.borrow_mut() {
            Resource::File(file) => Ok(file.write_all(text.as_bytes())?),
            Resource::Closed => Err(HandleError::Closed),
            Resource::Memory(_) => Err(HandleError::NotAFile),
        }
    }
    /// Reads from the current position to the end of the file.
    pub fn read(&self) -> Result<Option<String>, HandleError> {
        match &mut *self.data.borrow_mut() {
            Resource::File(file) => {
                let mut text = String::new();
                file.read_to_string(&mut text)?;
                Ok(Some(text))
            }
            Resource::Closed => Ok(None),
            Resource::Memory(_) => Err(HandleError::NotAFile),
        }
    }
    /// Closing twice is harmless.
    pub fn close(&self) -> Result<(), HandleError> {
        let mut data = self.data.borrow_mut();
        if matches!(*data, Resource::Memory(_)) {
            return Err(HandleError::NotAFile);
        }
        *data = Resource::Closed;
        Ok(())
    }
    pub fn free(&self) -> Result<(), HandleError> {
        let mut data = self.data.borrow_mut();
        if matches!(*data, Resource::File(_)) {
            return Err(HandleError::NotMemory);
        }
        *data = Resource::Closed;
        Ok(())
    }
    pub fn set_byte(&self, offset: usize, byte: u8) -> Result<(), HandleError> {
        match &mut *self.data.borrow_mut() {
            Resource::Memory(block) => {
                let size = block.len();
                match block.get_mut(offset) {
                    Some(slot) => {
                        *slot = byte;
                        Ok(())
                    }
                    None => Err(HandleError::OutOfBounds { offset, size }),
                }
            }
            _ => Err(HandleError::NotMemory),
        }
    }
    pub fn get_byte(&self, offset: usize) -> Result<u8, HandleError> {
        match &*self.data.borrow() {
            Resource::Memory(block) => {
                block
                    .get(offset)
                    .copied()
                    .ok_or(HandleError::OutOfBounds {
                        offset,
                        size: block.len(),
                    })
            }
            _ => Err(HandleError::NotMemory),
        }
    }
}
