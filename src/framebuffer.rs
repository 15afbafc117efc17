//! Double buffered pixel memory for HT1632C modules.
//!
//! Pixels are packed one bit each, MSB first, so the leftmost pixel of a byte
//! lives in bit 7. The byte a pixel lands in depends on the module
//! [`Geometry`]:
//!
//! - [`Geometry::Wide`]: 8x32 modules, rows are 4 bytes, `address = x / 8 + y * 4`
//! - [`Geometry::Tall`]: 16x24 modules, rows are 3 bytes, `address = x / 8 + y * 3`
//!
//! Two buffers of identical size are allocated together when the display is
//! initialized. Drawing always targets the *active* buffer. Swapping exchanges
//! which storage slot each buffer index refers to, no bytes are copied.

use core::convert::Infallible;

use embedded_graphics::draw_target::DrawTarget;
use embedded_graphics::geometry::OriginDimensions;
use embedded_graphics::geometry::Size;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::Pixel;
use heapless::Vec;

use crate::graphics::Canvas;
use crate::protocol::NIBBLE_MASK;
use crate::Color;

/// Maximum number of chained modules.
pub const MAX_MODULES: usize = 4;

/// Size of the largest buffer: four 16x24 modules.
pub const MAX_BUFFER_SIZE: usize = Geometry::Tall.module_bytes() * MAX_MODULES;

/// Pixel layout of a single module.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Geometry {
    /// 8 rows by 32 columns, chained modules stack vertically.
    #[default]
    Wide,
    /// 16 rows by 24 columns. A single module is 24 wide and 16 high,
    /// chained modules are laid out 16 columns each across a 24 row canvas.
    Tall,
}

impl Geometry {
    /// Bytes of pixel memory per module.
    pub const fn module_bytes(self) -> usize {
        match self {
            Geometry::Wide => (8 * 32) / 8,
            Geometry::Tall => (16 * 24) / 8,
        }
    }

    /// Bytes per pixel row.
    pub const fn stride(self) -> usize {
        match self {
            Geometry::Wide => 4,
            Geometry::Tall => 3,
        }
    }

    /// Canvas `(width, height)` in pixels for a chain of `modules`.
    pub const fn dimensions(self, modules: usize) -> (usize, usize) {
        match self {
            Geometry::Wide => (32, 8 * modules),
            Geometry::Tall if modules > 1 => (16 * modules, 24),
            Geometry::Tall => (24, 16),
        }
    }

    pub const fn buffer_size(self, modules: usize) -> usize {
        self.module_bytes() * modules
    }

    /// Byte address of the pixel at `(x, y)`. No bounds checking.
    pub const fn address(self, x: usize, y: usize) -> usize {
        match self {
            Geometry::Wide => (x >> 3) + (y << 2),
            Geometry::Tall => (x >> 3) + ((y << 1) + y),
        }
    }

    /// Mask of the pixel at column `x` within its byte.
    pub const fn bit(x: usize) -> u8 {
        1 << (7 - (x % 8))
    }
}

/// Identifies one of the two buffers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BufferIndex {
    #[default]
    Zero,
    One,
}

impl BufferIndex {
    const fn slot(self) -> usize {
        match self {
            BufferIndex::Zero => 0,
            BufferIndex::One => 1,
        }
    }
}

/// Any non zero value selects buffer one.
impl From<u8> for BufferIndex {
    fn from(value: u8) -> Self {
        if value == 0 {
            BufferIndex::Zero
        } else {
            BufferIndex::One
        }
    }
}

impl From<BufferIndex> for u8 {
    fn from(value: BufferIndex) -> Self {
        value.slot() as u8
    }
}

/// The buffer pair could not be allocated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AllocationError {
    pub requested: usize,
    pub capacity: usize,
}

/// A pair of equally sized pixel buffers plus the active selector.
#[derive(Clone)]
pub struct FrameBuffers {
    geometry: Geometry,
    modules: usize,
    width: usize,
    height: usize,
    slots: [Vec<u8, MAX_BUFFER_SIZE>; 2],
    // buffer index -> storage slot
    order: [usize; 2],
    active: BufferIndex,
}

impl FrameBuffers {
    /// Allocate both buffers, zero filled, for `modules` chained modules.
    ///
    /// Fails when `modules` is zero or the pair would not fit in
    /// [`MAX_BUFFER_SIZE`] bytes each.
    pub fn new(geometry: Geometry, modules: usize) -> Result<Self, AllocationError> {
        let requested = geometry.buffer_size(modules);
        let error = AllocationError {
            requested,
            capacity: MAX_BUFFER_SIZE,
        };
        if modules == 0 {
            return Err(error);
        }

        let mut front = Vec::new();
        let mut back = Vec::new();
        front.resize(requested, 0).map_err(|_| error)?;
        back.resize(requested, 0).map_err(|_| error)?;

        let (width, height) = geometry.dimensions(modules);
        Ok(Self {
            geometry,
            modules,
            width,
            height,
            slots: [front, back],
            order: [0, 1],
            active: BufferIndex::Zero,
        })
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn modules(&self) -> usize {
        self.modules
    }

    /// Canvas width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Canvas height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Size of each buffer in bytes.
    pub fn buffer_size(&self) -> usize {
        self.slots[0].len()
    }

    pub fn active_buffer(&self) -> BufferIndex {
        self.active
    }

    /// Direct subsequent drawing to `index`. Does not touch buffer contents.
    pub fn set_active_buffer(&mut self, index: impl Into<BufferIndex>) {
        self.active = index.into();
    }

    /// Exchange the storage behind buffer zero and buffer one.
    ///
    /// The active index is unchanged, so drawing continues on what used to be
    /// the other buffer.
    pub fn swap_buffers(&mut self) {
        self.order.swap(0, 1);
    }

    /// Contents of buffer `index`.
    pub fn buffer(&self, index: BufferIndex) -> &[u8] {
        &self.slots[self.order[index.slot()]]
    }

    /// Contents of the active buffer.
    pub fn as_bytes(&self) -> &[u8] {
        self.buffer(self.active)
    }

    fn active_mut(&mut self) -> &mut [u8] {
        let slot = self.order[self.active.slot()];
        &mut self.slots[slot]
    }

    /// Turn every pixel of the active buffer off.
    pub fn clear_screen(&mut self) {
        self.active_mut().fill(0x00);
    }

    /// Turn every pixel of the active buffer on.
    pub fn fill_screen(&mut self) {
        self.active_mut().fill(0xff);
    }

    /// Raw write of a whole byte of the active buffer.
    ///
    /// Skips pixel bounds checks, only the address is checked against the
    /// buffer size. Addresses past the end are ignored.
    pub fn set_byte(&mut self, address: usize, value: u8) {
        if let Some(byte) = self.active_mut().get_mut(address) {
            *byte = value;
        }
    }

    fn locate(&self, x: i32, y: i32) -> Option<(usize, u8)> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((self.geometry.address(x, y), Geometry::bit(x)))
    }

    /// Nibbles of the active buffer in the order the controller expects
    /// them: byte column by byte column, every row of a column, high nibble
    /// first.
    pub fn nibbles(&self) -> impl Iterator<Item = u8> + '_ {
        let stride = self.geometry.stride();
        let height = self.height;
        let buffer = self.as_bytes();
        (0..stride)
            .flat_map(move |column| {
                (0..height).map(move |y| buffer.get(y * stride + column).copied().unwrap_or(0))
            })
            .flat_map(|byte| [byte >> 4, byte & NIBBLE_MASK])
    }
}

impl Canvas for FrameBuffers {
    fn width(&self) -> i32 {
        self.width as i32
    }

    fn height(&self) -> i32 {
        self.height as i32
    }

    fn draw_pixel(&mut self, x: i32, y: i32, color: Color) {
        let Some((address, bit)) = self.locate(x, y) else {
            return;
        };
        let byte = &mut self.active_mut()[address];
        if color.is_on() {
            *byte |= bit;
        } else {
            *byte &= !bit;
        }
    }

    fn get_pixel(&self, x: i32, y: i32) -> Color {
        match self.locate(x, y) {
            Some((address, bit)) if self.as_bytes()[address] & bit != 0 => BinaryColor::On,
            _ => BinaryColor::Off,
        }
    }
}

impl OriginDimensions for FrameBuffers {
    fn size(&self) -> Size {
        Size::new(self.width as u32, self.height as u32)
    }
}

impl DrawTarget for FrameBuffers {
    type Color = Color;

    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(p, color) in pixels {
            Canvas::draw_pixel(self, p.x, p.y, color);
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        // clip in i64, the far corner of `area` need not fit in an i32
        let clip = |start: i32, len: u32, limit: usize| {
            let start = i64::from(start);
            let end = (start + i64::from(len)).min(limit as i64);
            let start = start.max(0);
            (start as i32, (end - start).max(0) as i32)
        };
        let (x, w) = clip(area.top_left.x, area.size.width, self.width);
        let (y, h) = clip(area.top_left.y, area.size.height, self.height);
        self.fill_rect(x, y, w, h, color);
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        if color.is_on() {
            self.fill_screen();
        } else {
            self.clear_screen();
        }
        Ok(())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for FrameBuffers {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "FrameBuffers<{}x{} {} module(s)>",
            self.width,
            self.height,
            self.modules
        );
        defmt::write!(f, " geometry: {}", self.geometry);
        defmt::write!(f, " size: {}", self.buffer_size());
        defmt::write!(f, " active: {}", self.active);
    }
}

impl core::fmt::Debug for FrameBuffers {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FrameBuffers")
            .field("geometry", &self.geometry)
            .field("modules", &self.modules)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("size", &self.buffer_size())
            .field("active", &self.active)
            .finish()
    }
}
