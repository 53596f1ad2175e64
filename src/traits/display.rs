//! Status display abstraction.
//!
//! This module defines the [`StatusDisplay`] trait for the small status
//! screen (OLED, LCD, or nothing at all) that shows station summaries such
//! as the number of turnouts found at startup.

/// Display line reserved for rotating status messages.
pub const ROTATING_STATUS_LINE: u8 = 4;

/// Display trait for station status lines.
///
/// Implementors provide hardware-specific rendering. Failures are logged
/// by callers and never abort accessory operations.
///
/// # Example
///
/// ```ignore
/// use trainz_accessories::traits::StatusDisplay;
///
/// struct Oled { /* ... */ }
///
/// impl StatusDisplay for Oled {
///     type Error = ();
///
///     fn replace_line(&mut self, line: u8, text: &str) -> Result<(), ()> {
///         // Clear the row, draw text
///         Ok(())
///     }
/// }
/// ```
pub trait StatusDisplay {
    /// Error type for display operations.
    type Error: core::fmt::Debug;

    /// Replaces the contents of one display line.
    ///
    /// # Arguments
    ///
    /// * `line` - Zero-based display row
    /// * `text` - Text to show; implementations truncate to the row width
    fn replace_line(&mut self, line: u8, text: &str) -> Result<(), Self::Error>;
}

/// Display that discards everything, for headless stations.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDisplay;

impl StatusDisplay for NoDisplay {
    type Error = core::convert::Infallible;

    fn replace_line(&mut self, _line: u8, _text: &str) -> Result<(), Self::Error> {
        Ok(())
    }
}
