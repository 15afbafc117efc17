//! Driver for dot-matrix LED displays built from chained HT1632C controllers.
//!
//! The controllers are bit-banged over a data line, a write clock and one
//! active low chip select per module, using any
//! [`embedded_hal::digital::OutputPin`]. Drawing happens in a pair of pixel
//! buffers in RAM and is sent to the display with [`Ht1632::flush`].
//!
//! # Example
//! ```rust,ignore
//! use ht1632::Canvas;
//! use ht1632::Color;
//! use ht1632::Config;
//! use ht1632::Geometry;
//! use ht1632::Ht1632;
//! use ht1632::Ht1632Pins;
//!
//! let pins = Ht1632Pins::new(data, wr, [cs0]);
//! let mut display = Ht1632::new(pins)?;
//! display.init(0, Config::default().with_geometry(Geometry::Wide))?;
//!
//! display.draw_rect(0, 0, 32, 8, Color::On);
//! display.draw_string(2, 1, "HI", Color::On);
//! display.flush()?;
//! ```
//!
//! # Feature flags
//! - `log` / `defmt`: logging back-end, at most one.
//! - `esp32`, `esp32s3`, `esp32c6`: pull in esp-hal for the chip and run the
//!   flush loop from RAM.
#![no_std]

mod fmt;

pub mod font;
pub mod framebuffer;
pub mod gpio;
pub mod graphics;
pub mod protocol;

use embedded_graphics::pixelcolor::BinaryColor;

pub use font::Font;
pub use font::FONT_4X6;
pub use framebuffer::AllocationError;
pub use framebuffer::BufferIndex;
pub use framebuffer::FrameBuffers;
pub use framebuffer::Geometry;
pub use gpio::Ht1632;
pub use graphics::Canvas;
pub use protocol::ClockSource;
pub use protocol::Command;
pub use protocol::CommonDrive;

/// Pixels are either lit or dark.
pub type Color = BinaryColor;

/// Pins driving a chain of `N` modules.
///
/// All lines must share one error type. The HAL is expected to hand them over
/// already configured as push-pull outputs.
pub struct Ht1632Pins<DATA, WR, CS, const N: usize> {
    /// Serial data, sampled by the controller on each rising `wr` edge.
    pub data: DATA,
    /// Write clock, data is latched on its rising edge.
    pub wr: WR,
    /// Read clock. Only held idle (high), reads are not supported.
    pub rd: Option<WR>,
    /// One chip select per module, module 0 first.
    pub cs: [CS; N],
}

impl<DATA, WR, CS, const N: usize> Ht1632Pins<DATA, WR, CS, N> {
    pub fn new(data: DATA, wr: WR, cs: [CS; N]) -> Self {
        Self {
            data,
            wr,
            rd: None,
            cs,
        }
    }

    pub fn with_read_clock(mut self, rd: WR) -> Self {
        self.rd = Some(rd);
        self
    }
}

/// Settings applied by [`Ht1632::init`].
///
/// ```rust
/// use ht1632::CommonDrive;
/// use ht1632::Config;
/// use ht1632::Geometry;
///
/// let config = Config::default()
///     .with_drive(CommonDrive::PMos16)
///     .with_geometry(Geometry::Tall)
///     .with_brightness(Some(8));
/// assert_eq!(config.geometry, Geometry::Tall);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// COM output mode.
    pub drive: CommonDrive,
    /// Module pixel layout. Only used by the first `init`, the buffers are
    /// never reallocated.
    pub geometry: Geometry,
    pub clock_source: ClockSource,
    /// PWM level `0..=15` to send after enabling the chip.
    pub brightness: Option<u8>,
    /// Blink state to send after enabling the chip.
    pub blink: Option<bool>,
}

impl Config {
    pub const fn with_drive(mut self, drive: CommonDrive) -> Self {
        self.drive = drive;
        self
    }

    pub const fn with_geometry(mut self, geometry: Geometry) -> Self {
        self.geometry = geometry;
        self
    }

    pub const fn with_clock_source(mut self, clock_source: ClockSource) -> Self {
        self.clock_source = clock_source;
        self
    }

    pub const fn with_brightness(mut self, brightness: Option<u8>) -> Self {
        self.brightness = brightness;
        self
    }

    pub const fn with_blink(mut self, blink: Option<bool>) -> Self {
        self.blink = blink;
        self
    }
}

/// Driver errors. `E` is the pin error type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Setting an output line failed.
    Pin(E),
    /// Between 1 and 4 chip selects are supported.
    ChipCount(usize),
    /// No chip select with this index.
    InvalidChip(usize),
    /// [`Ht1632::init`] has not been called yet.
    NotInitialized,
    /// The pixel buffers did not fit.
    BufferAllocation(AllocationError),
}

impl<E: core::fmt::Debug> core::fmt::Display for Error<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Pin(e) => write!(f, "pin error: {:?}", e),
            Error::ChipCount(n) => write!(f, "unsupported number of chips: {}", n),
            Error::InvalidChip(chip) => write!(f, "no chip select for chip {}", chip),
            Error::NotInitialized => write!(f, "display not initialized"),
            Error::BufferAllocation(e) => write!(
                f,
                "cannot allocate {} byte buffers, capacity is {}",
                e.requested, e.capacity
            ),
        }
    }
}

impl<E: core::fmt::Debug> core::error::Error for Error<E> {}
