//! FileSize Type-Safe Wrapper
//!
//! Byte counts with the human-readable rendering used in reports.

use std::fmt;

/// Units for [`FileSize::display`], each 1024 times the previous one.
const UNITS: [&str; 7] = ["B", "KB", "MB", "GB", "TB", "PB", "EB"];

/// File size in bytes.
///
/// # Examples
/// ```
/// use shared_utils::types::file_size::FileSize;
///
/// assert_eq!(FileSize::new(512).display(), "512.0B");
/// assert_eq!(FileSize::new(1536).display(), "1.5KB");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileSize(u64);

impl FileSize {
    pub const ZERO: FileSize = FileSize(0);

    #[inline]
    pub const fn new(bytes: u64) -> Self {
        Self(bytes)
    }

    #[inline]
    pub const fn bytes(&self) -> u64 {
        self.0
    }

    /// Output size relative to `original`, `None` when `original` is empty.
    pub fn compression_ratio(&self, original: FileSize) -> Option<f64> {
        if original.0 == 0 {
            None
        } else {
            Some(self.0 as f64 / original.0 as f64)
        }
    }

    /// One decimal place followed by the unit, no separator: `"1.5MB"`.
    pub fn display(&self) -> String {
        let mut unit = 0;
        let mut n = self.0 as f64;
        while n >= 1024.0 && unit < UNITS.len() - 1 {
            unit += 1;
            n /= 1024.0;
        }
        format!("{:.1}{}", n, UNITS[unit])
    }
}

impl fmt::Debug for FileSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileSize({} = {})", self.0, self.display())
    }
}

impl fmt::Display for FileSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

impl Default for FileSize {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<u64> for FileSize {
    fn from(bytes: u64) -> Self {
        Self::new(bytes)
    }
}

impl From<FileSize> for u64 {
    fn from(size: FileSize) -> Self {
        size.0
    }
}
