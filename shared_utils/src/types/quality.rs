//! JPEG Quality Type-Safe Wrapper
//!
//! Quality levels are validated once at construction so the encoder and the
//! oracle never see an out-of-range value.

use std::fmt;

// ============================================================================
// QualityError
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QualityError {
    /// Value outside `[Quality::MIN, Quality::MAX]`
    OutOfRange { value: i64, min: u8, max: u8 },
}

impl fmt::Display for QualityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QualityError::OutOfRange { value, min, max } => {
                write!(f, "JPEG quality {} out of range [{}, {}]", value, min, max)
            }
        }
    }
}

impl std::error::Error for QualityError {}

// ============================================================================
// Quality Newtype
// ============================================================================

/// A JPEG quality level in `[1, 100]`.
///
/// # Examples
/// ```
/// use shared_utils::types::quality::Quality;
///
/// let q = Quality::new(85).unwrap();
/// assert_eq!(q.value(), 85);
/// assert!(Quality::new(0).is_err());
/// assert!(Quality::new(101).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quality(u8);

impl Quality {
    /// Lowest quality the encoder accepts
    pub const MIN: Quality = Quality(1);
    /// Highest quality, used for the reference rendering
    pub const MAX: Quality = Quality(100);

    pub fn new(value: i64) -> Result<Self, QualityError> {
        if value < i64::from(Self::MIN.0) || value > i64::from(Self::MAX.0) {
            return Err(QualityError::OutOfRange {
                value,
                min: Self::MIN.0,
                max: Self::MAX.0,
            });
        }
        Ok(Self(value as u8))
    }

    #[inline]
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i32> for Quality {
    type Error = QualityError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(i64::from(value))
    }
}

impl From<Quality> for u8 {
    fn from(q: Quality) -> Self {
        q.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        assert_eq!(Quality::new(1).unwrap(), Quality::MIN);
        assert_eq!(Quality::new(100).unwrap(), Quality::MAX);
        assert!(Quality::new(0).is_err());
        assert!(Quality::new(-1).is_err());
        assert!(Quality::new(101).is_err());
    }

    #[test]
    fn test_try_from_i32() {
        let q = Quality::try_from(42).unwrap();
        assert_eq!(u8::from(q), 42);
        assert_eq!(q.to_string(), "42");
    }

    #[test]
    fn test_error_message() {
        let err = Quality::new(250).unwrap_err();
        assert_eq!(err.to_string(), "JPEG quality 250 out of range [1, 100]");
    }
}
