//! Bit-banged HT1632C driver.
//!
//! Each line is a plain [`OutputPin`]. Bits are shifted out MSB first: the
//! write clock is pulled low, the data line set, and the clock released high,
//! which is where the controller samples the data line.

use core::convert::Infallible;

use embedded_graphics::draw_target::DrawTarget;
use embedded_graphics::geometry::OriginDimensions;
use embedded_graphics::geometry::Size;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::Pixel;
use embedded_hal::digital::OutputPin;
use embedded_hal::digital::PinState;

use crate::framebuffer::BufferIndex;
use crate::framebuffer::FrameBuffers;
use crate::framebuffer::MAX_MODULES;
use crate::graphics::Canvas;
use crate::protocol::Command;
use crate::protocol::CommandFrame;
use crate::protocol::WriteFrame;
use crate::protocol::CLEAR_WRITES;
use crate::protocol::MAX_BRIGHTNESS;
use crate::protocol::NIBBLE_MASK;
use crate::Color;
use crate::Config;
use crate::Error;
use crate::Ht1632Pins;

/// First bit of a 4 bit data nibble.
const NIBBLE_FIRST_BIT: u16 = 1 << 3;

// TODO: flush every module of a chain, only module 0 is sent today.
const FLUSH_CHIP: usize = 0;

/// Data and write clock, the shared part of the bus.
struct Bus<DATA, WR> {
    data: DATA,
    wr: WR,
}

impl<DATA, WR, E> Bus<DATA, WR>
where
    DATA: OutputPin<Error = E>,
    WR: OutputPin<Error = E>,
{
    /// Shift out the bits of `bits` selected by `mask`, starting at the set
    /// bit of `mask` and moving towards bit 0.
    #[cfg_attr(any(feature = "esp32", feature = "esp32s3", feature = "esp32c6"), esp_hal::ram)]
    fn write_bits(&mut self, bits: u16, mut mask: u16) -> Result<(), E> {
        while mask != 0 {
            self.wr.set_low()?;
            self.data.set_state(PinState::from(bits & mask != 0))?;
            self.wr.set_high()?;
            mask >>= 1;
        }
        Ok(())
    }

    /// Successive write payload: the whole buffer in device order.
    #[cfg_attr(any(feature = "esp32", feature = "esp32s3", feature = "esp32c6"), esp_hal::ram)]
    fn stream(&mut self, framebuffers: &FrameBuffers) -> Result<(), E> {
        let header = WriteFrame::new(0, 0);
        self.write_bits(header.header(), WriteFrame::header_first_bit())?;
        for nibble in framebuffers.nibbles() {
            self.write_bits(nibble as u16, NIBBLE_FIRST_BIT)?;
        }
        Ok(())
    }
}

/// HT1632C display driver for a chain of `N` modules.
pub struct Ht1632<DATA, WR, CS, const N: usize> {
    bus: Bus<DATA, WR>,
    rd: Option<WR>,
    cs: [CS; N],
    framebuffers: Option<FrameBuffers>,
}

impl<DATA, WR, CS, E, const N: usize> Ht1632<DATA, WR, CS, N>
where
    DATA: OutputPin<Error = E>,
    WR: OutputPin<Error = E>,
    CS: OutputPin<Error = E>,
{
    /// Take over the pins and release every chip select.
    ///
    /// # Errors
    /// [`Error::ChipCount`] unless `1 <= N <= 4`, [`Error::Pin`] if a line
    /// cannot be driven.
    pub fn new(pins: Ht1632Pins<DATA, WR, CS, N>) -> Result<Self, Error<E>> {
        if N == 0 || N > MAX_MODULES {
            return Err(Error::ChipCount(N));
        }
        let Ht1632Pins {
            data,
            wr,
            mut rd,
            mut cs,
        } = pins;

        for pin in cs.iter_mut() {
            pin.set_high().map_err(Error::Pin)?;
        }
        if let Some(rd) = rd.as_mut() {
            rd.set_high().map_err(Error::Pin)?;
        }

        Ok(Self {
            bus: Bus { data, wr },
            rd,
            cs,
            framebuffers: None,
        })
    }

    /// Give the pins back.
    pub fn free(self) -> Ht1632Pins<DATA, WR, CS, N> {
        Ht1632Pins {
            data: self.bus.data,
            wr: self.bus.wr,
            rd: self.rd,
            cs: self.cs,
        }
    }

    /// Number of chained modules.
    pub const fn modules(&self) -> usize {
        N
    }

    /// Configure `chip` and allocate the pixel buffers.
    ///
    /// Sends system disable, the COM drive mode, the clock source, system
    /// enable and LED on, then the optional brightness and blink settings and
    /// finally clears the chip's RAM.
    ///
    /// The buffers are allocated for `config.geometry` on the first call only.
    /// Later calls keep them (and their geometry). Either way buffer zero
    /// becomes active and is cleared.
    pub fn init(&mut self, chip: usize, config: Config) -> Result<(), Error<E>> {
        self.send_command(Command::SysDis, chip)?;
        self.send_command(Command::Com(config.drive), chip)?;
        self.send_command(config.clock_source.command(), chip)?;
        self.send_command(Command::SysEn, chip)?;
        self.send_command(Command::LedOn, chip)?;
        if let Some(level) = config.brightness {
            self.set_brightness(level, chip)?;
        }
        if let Some(blink) = config.blink {
            self.blink_mode(blink, chip)?;
        }
        self.chip_clear(chip)?;

        let framebuffers = match self.framebuffers.take() {
            Some(framebuffers) => {
                debug!("chip {}: buffers already allocated", chip);
                framebuffers
            }
            None => {
                let framebuffers =
                    FrameBuffers::new(config.geometry, N).map_err(Error::BufferAllocation)?;
                info!(
                    "{} module(s) {}x{} px, 2 x {} byte buffers",
                    N,
                    framebuffers.width(),
                    framebuffers.height(),
                    framebuffers.buffer_size()
                );
                framebuffers
            }
        };
        let framebuffers = self.framebuffers.insert(framebuffers);
        framebuffers.set_active_buffer(BufferIndex::Zero);
        framebuffers.clear_screen();
        Ok(())
    }

    /// Whether [`Ht1632::init`] has allocated the buffers.
    pub fn is_initialized(&self) -> bool {
        self.framebuffers.is_some()
    }

    pub fn framebuffers(&self) -> Option<&FrameBuffers> {
        self.framebuffers.as_ref()
    }

    pub fn framebuffers_mut(&mut self) -> Option<&mut FrameBuffers> {
        self.framebuffers.as_mut()
    }

    fn chip_select(&mut self, chip: usize) -> Result<(), Error<E>> {
        let pin = self.cs.get_mut(chip).ok_or(Error::InvalidChip(chip))?;
        pin.set_low().map_err(Error::Pin)
    }

    fn chip_release(&mut self, chip: usize) -> Result<(), Error<E>> {
        let pin = self.cs.get_mut(chip).ok_or(Error::InvalidChip(chip))?;
        pin.set_high().map_err(Error::Pin)
    }

    /// Run `f` with `chip` selected. The chip is released even if `f` fails.
    fn with_chip<F>(&mut self, chip: usize, f: F) -> Result<(), Error<E>>
    where
        F: FnOnce(&mut Bus<DATA, WR>) -> Result<(), E>,
    {
        self.chip_select(chip)?;
        let result = f(&mut self.bus).map_err(Error::Pin);
        let released = self.chip_release(chip);
        result.and(released)
    }

    /// Send a single command frame to `chip`.
    pub fn send_command(&mut self, command: Command, chip: usize) -> Result<(), Error<E>> {
        trace!("chip {}: command {:?}", chip, command);
        let frame = CommandFrame::new(command);
        self.with_chip(chip, |bus| {
            bus.write_bits(frame.bits(), CommandFrame::first_bit())
        })
    }

    /// Write one nibble of display RAM at `address`.
    pub fn write_data(&mut self, address: u8, data: u8, chip: usize) -> Result<(), Error<E>> {
        let frame = WriteFrame::new(address, data);
        self.with_chip(chip, |bus| bus.write_bits(frame.bits(), WriteFrame::first_bit()))
    }

    /// Select `chip` and send the successive write header for `address`.
    ///
    /// Follow with [`Ht1632::write_successive`] for each nibble and close with
    /// [`Ht1632::write_successive_stop`].
    pub fn write_successive_start(&mut self, address: u8, chip: usize) -> Result<(), Error<E>> {
        self.chip_select(chip)?;
        let header = WriteFrame::new(address, 0);
        self.bus
            .write_bits(header.header(), WriteFrame::header_first_bit())
            .map_err(Error::Pin)
    }

    /// Send the next nibble of a successive write.
    pub fn write_successive(&mut self, data: u8) -> Result<(), Error<E>> {
        self.bus
            .write_bits((data & NIBBLE_MASK) as u16, NIBBLE_FIRST_BIT)
            .map_err(Error::Pin)
    }

    pub fn write_successive_stop(&mut self, chip: usize) -> Result<(), Error<E>> {
        self.chip_release(chip)
    }

    /// Reading display RAM is not supported, this always returns 0.
    pub fn read_data(&mut self, address: u8, chip: usize) -> u8 {
        warn!("chip {}: read of {} not supported", chip, address);
        0
    }

    /// Set the PWM duty to `(level + 1) / 16`. Levels above 15 are masked.
    pub fn set_brightness(&mut self, level: u8, chip: usize) -> Result<(), Error<E>> {
        debug!("chip {}: brightness {}", chip, level & MAX_BRIGHTNESS);
        self.send_command(Command::Pwm(level), chip)
    }

    pub fn blink_mode(&mut self, blink: bool, chip: usize) -> Result<(), Error<E>> {
        debug!("chip {}: blink {}", chip, blink);
        let command = if blink {
            Command::BlinkOn
        } else {
            Command::BlinkOff
        };
        self.send_command(command, chip)
    }

    /// Switch the LED duty cycle generator, blanking the display when off.
    pub fn set_display_enabled(&mut self, enabled: bool, chip: usize) -> Result<(), Error<E>> {
        let command = if enabled {
            Command::LedOn
        } else {
            Command::LedOff
        };
        self.send_command(command, chip)
    }

    /// Switch the system oscillator. Disabling it also stops the LED output.
    pub fn set_system_enabled(&mut self, enabled: bool, chip: usize) -> Result<(), Error<E>> {
        let command = if enabled {
            Command::SysEn
        } else {
            Command::SysDis
        };
        self.send_command(command, chip)
    }

    /// Zero the whole display RAM of `chip`, one write frame per address.
    pub fn chip_clear(&mut self, chip: usize) -> Result<(), Error<E>> {
        debug!("chip {}: clear", chip);
        for address in 0..CLEAR_WRITES {
            self.write_data(address as u8, 0, chip)?;
        }
        Ok(())
    }

    /// Send the active buffer to the display.
    ///
    /// The whole successive write runs inside a critical section: an
    /// interruption between clock edges corrupts the transfer. Only module 0
    /// is written.
    pub fn flush(&mut self) -> Result<(), Error<E>> {
        let framebuffers = self.framebuffers.as_ref().ok_or(Error::NotInitialized)?;
        let bus = &mut self.bus;
        let cs = self
            .cs
            .get_mut(FLUSH_CHIP)
            .ok_or(Error::InvalidChip(FLUSH_CHIP))?;
        trace!(
            "flush buffer {:?} to chip {}",
            framebuffers.active_buffer(),
            FLUSH_CHIP
        );

        critical_section::with(|_| {
            cs.set_low().map_err(Error::Pin)?;
            let streamed = bus.stream(framebuffers).map_err(Error::Pin);
            let released = cs.set_high().map_err(Error::Pin);
            streamed.and(released)
        })
    }

    pub fn clear_screen(&mut self) {
        if let Some(framebuffers) = self.framebuffers.as_mut() {
            framebuffers.clear_screen();
        }
    }

    pub fn fill_screen(&mut self) {
        if let Some(framebuffers) = self.framebuffers.as_mut() {
            framebuffers.fill_screen();
        }
    }

    /// See [`FrameBuffers::set_byte`].
    pub fn set_byte(&mut self, address: usize, value: u8) {
        if let Some(framebuffers) = self.framebuffers.as_mut() {
            framebuffers.set_byte(address, value);
        }
    }

    pub fn set_active_buffer(&mut self, index: impl Into<BufferIndex>) {
        if let Some(framebuffers) = self.framebuffers.as_mut() {
            framebuffers.set_active_buffer(index);
        }
    }

    pub fn active_buffer(&self) -> BufferIndex {
        self.framebuffers
            .as_ref()
            .map(FrameBuffers::active_buffer)
            .unwrap_or_default()
    }

    pub fn swap_buffers(&mut self) {
        if let Some(framebuffers) = self.framebuffers.as_mut() {
            framebuffers.swap_buffers();
        }
    }
}

/// Drawing before [`Ht1632::init`] is a no-op on a zero sized canvas.
impl<DATA, WR, CS, const N: usize> Canvas for Ht1632<DATA, WR, CS, N> {
    fn width(&self) -> i32 {
        self.framebuffers.as_ref().map_or(0, Canvas::width)
    }

    fn height(&self) -> i32 {
        self.framebuffers.as_ref().map_or(0, Canvas::height)
    }

    fn draw_pixel(&mut self, x: i32, y: i32, color: Color) {
        if let Some(framebuffers) = self.framebuffers.as_mut() {
            framebuffers.draw_pixel(x, y, color);
        }
    }

    fn get_pixel(&self, x: i32, y: i32) -> Color {
        self.framebuffers
            .as_ref()
            .map_or(BinaryColor::Off, |framebuffers| framebuffers.get_pixel(x, y))
    }
}

impl<DATA, WR, CS, const N: usize> OriginDimensions for Ht1632<DATA, WR, CS, N> {
    fn size(&self) -> Size {
        self.framebuffers
            .as_ref()
            .map_or(Size::zero(), OriginDimensions::size)
    }
}

impl<DATA, WR, CS, const N: usize> DrawTarget for Ht1632<DATA, WR, CS, N> {
    type Color = Color;

    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        match self.framebuffers.as_mut() {
            Some(framebuffers) => framebuffers.draw_iter(pixels),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::cell::RefCell;
    use std::rc::Rc;
    use std::string::String;
    use std::vec;
    use std::vec::Vec;

    use embedded_graphics::prelude::*;
    use embedded_graphics::primitives::Line as LinePrimitive;
    use embedded_graphics::primitives::PrimitiveStyle;
    use embedded_hal::digital::ErrorType;

    use super::*;
    use crate::framebuffer::Geometry;
    use crate::protocol::ClockSource;
    use crate::protocol::CommonDrive;

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    enum Line {
        Data,
        Wr,
        Rd,
        Cs(usize),
    }

    type Trace = Rc<RefCell<Vec<(Line, bool)>>>;

    /// Output pin that records every level it is driven to.
    struct MockPin {
        line: Line,
        trace: Trace,
    }

    impl ErrorType for MockPin {
        type Error = Infallible;
    }

    impl OutputPin for MockPin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.trace.borrow_mut().push((self.line, false));
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.trace.borrow_mut().push((self.line, true));
            Ok(())
        }
    }

    type TestDisplay<const N: usize> = Ht1632<MockPin, MockPin, MockPin, N>;

    fn pins<const N: usize>(trace: &Trace) -> Ht1632Pins<MockPin, MockPin, MockPin, N> {
        let pin = |line| MockPin {
            line,
            trace: trace.clone(),
        };
        Ht1632Pins::new(
            pin(Line::Data),
            pin(Line::Wr),
            core::array::from_fn(|i| pin(Line::Cs(i))),
        )
        .with_read_clock(pin(Line::Rd))
    }

    fn display<const N: usize>() -> (TestDisplay<N>, Trace) {
        let trace = Trace::default();
        let display = Ht1632::new(pins::<N>(&trace)).unwrap();
        trace.borrow_mut().clear();
        (display, trace)
    }

    /// Decode a trace into frames: one entry per select/release of a chip,
    /// holding the data bits sampled on each rising write clock edge.
    fn frames(trace: &Trace) -> Vec<(usize, String)> {
        let mut frames = Vec::new();
        let mut open: Option<(usize, String)> = None;
        let mut data = false;
        for &(line, level) in trace.borrow().iter() {
            match (line, level) {
                (Line::Data, level) => data = level,
                (Line::Wr, true) => {
                    if let Some((_, bits)) = open.as_mut() {
                        bits.push(if data { '1' } else { '0' });
                    }
                }
                (Line::Cs(chip), false) => open = Some((chip, String::new())),
                (Line::Cs(chip), true) => {
                    if let Some((open_chip, bits)) = open.take() {
                        assert_eq!(open_chip, chip);
                        frames.push((chip, bits));
                    }
                }
                _ => {}
            }
        }
        assert!(open.is_none(), "frame left open");
        frames
    }

    fn bits(value: u32, width: usize) -> String {
        (0..width)
            .rev()
            .map(|i| if value & (1 << i) != 0 { '1' } else { '0' })
            .collect()
    }

    fn command(code: u8) -> String {
        bits(0b100, 3) + &bits(code as u32, 8) + "0"
    }

    fn write(address: u8, data: u8) -> String {
        bits(0b101, 3) + &bits(address as u32, 7) + &bits(data as u32, 4)
    }

    #[test]
    fn test_new_releases_chips() {
        let trace = Trace::default();
        let display: TestDisplay<3> = Ht1632::new(pins(&trace)).unwrap();
        assert_eq!(display.modules(), 3);
        assert!(!display.is_initialized());
        assert_eq!(
            *trace.borrow(),
            vec![
                (Line::Cs(0), true),
                (Line::Cs(1), true),
                (Line::Cs(2), true),
                (Line::Rd, true),
            ]
        );
    }

    #[test]
    fn test_chip_count() {
        let trace = Trace::default();
        assert_eq!(
            TestDisplay::<0>::new(pins(&trace)).err(),
            Some(Error::ChipCount(0))
        );
        assert_eq!(
            TestDisplay::<5>::new(pins(&trace)).err(),
            Some(Error::ChipCount(5))
        );
    }

    #[test]
    fn test_write_bits_clocks_msb_first() {
        let (mut display, trace) = display::<1>();
        display.bus.write_bits(0b1010, 1 << 3).unwrap();
        assert_eq!(
            *trace.borrow(),
            vec![
                (Line::Wr, false),
                (Line::Data, true),
                (Line::Wr, true),
                (Line::Wr, false),
                (Line::Data, false),
                (Line::Wr, true),
                (Line::Wr, false),
                (Line::Data, true),
                (Line::Wr, true),
                (Line::Wr, false),
                (Line::Data, false),
                (Line::Wr, true),
            ]
        );
    }

    #[test]
    fn test_command_frame() {
        let (mut display, trace) = display::<1>();
        display.send_command(Command::SysEn, 0).unwrap();
        assert_eq!(frames(&trace), vec![(0, String::from("100000000010"))]);
    }

    #[test]
    fn test_brightness_and_blink() {
        let (mut display, trace) = display::<1>();
        display.set_brightness(7, 0).unwrap();
        display.set_brightness(0x1f, 0).unwrap();
        display.blink_mode(true, 0).unwrap();
        display.blink_mode(false, 0).unwrap();
        display.set_display_enabled(false, 0).unwrap();
        display.set_system_enabled(false, 0).unwrap();
        assert_eq!(
            frames(&trace),
            vec![
                (0, command(0xa7)),
                (0, command(0xaf)),
                (0, command(0x09)),
                (0, command(0x08)),
                (0, command(0x02)),
                (0, command(0x00)),
            ]
        );
    }

    #[test]
    fn test_single_write_frame() {
        let (mut display, trace) = display::<1>();
        display.write_data(0x15, 0xc, 0).unwrap();
        assert_eq!(frames(&trace), vec![(0, String::from("10100101011100"))]);
    }

    #[test]
    fn test_successive_write_frame() {
        let (mut display, trace) = display::<1>();
        display.write_successive_start(0x02, 0).unwrap();
        display.write_successive(0x1).unwrap();
        display.write_successive(0xf).unwrap();
        display.write_successive_stop(0).unwrap();
        let expected = bits(0b101, 3) + &bits(2, 7) + "0001" + "1111";
        assert_eq!(frames(&trace), vec![(0, expected)]);
    }

    #[test]
    fn test_chip_multiplexing() {
        let (mut display, trace) = display::<4>();
        display.send_command(Command::LedOn, 2).unwrap();
        let selects: Vec<(Line, bool)> = trace
            .borrow()
            .iter()
            .copied()
            .filter(|(line, _)| matches!(line, Line::Cs(_)))
            .collect();
        assert_eq!(selects, vec![(Line::Cs(2), false), (Line::Cs(2), true)]);
        assert_eq!(frames(&trace), vec![(2, command(0x03))]);
    }

    #[test]
    fn test_invalid_chip() {
        let (mut display, trace) = display::<2>();
        assert_eq!(
            display.send_command(Command::LedOn, 2),
            Err(Error::InvalidChip(2))
        );
        assert_eq!(display.write_data(0, 0, 7), Err(Error::InvalidChip(7)));
        assert!(trace.borrow().is_empty());
    }

    #[test]
    fn test_chip_clear() {
        let (mut display, trace) = display::<2>();
        display.chip_clear(1).unwrap();
        let frames = frames(&trace);
        assert_eq!(frames.len(), 256);
        for (i, (chip, frame)) in frames.iter().enumerate() {
            assert_eq!(*chip, 1);
            assert_eq!(*frame, write((i & 0x7f) as u8, 0));
        }
    }

    #[test]
    fn test_init_sequence() {
        let (mut display, trace) = display::<1>();
        display.init(0, Config::default()).unwrap();
        let frames = frames(&trace);
        assert_eq!(frames.len(), 5 + 256);
        assert_eq!(
            &frames[..5],
            &[
                (0, command(0x00)),
                (0, command(0x20)),
                (0, command(0x18)),
                (0, command(0x01)),
                (0, command(0x03)),
            ]
        );
        assert!(frames[5..].iter().all(|(_, frame)| frame.ends_with("0000")));

        let framebuffers = display.framebuffers().unwrap();
        assert_eq!(framebuffers.geometry(), Geometry::Wide);
        assert_eq!((framebuffers.width(), framebuffers.height()), (32, 8));
        assert_eq!(display.active_buffer(), BufferIndex::Zero);
    }

    #[test]
    fn test_init_with_config() {
        let (mut display, trace) = display::<1>();
        let config = Config::default()
            .with_drive(CommonDrive::PMos16)
            .with_clock_source(ClockSource::Slave)
            .with_brightness(Some(3))
            .with_blink(Some(true));
        display.init(0, config).unwrap();
        let frames = frames(&trace);
        assert_eq!(frames.len(), 7 + 256);
        assert_eq!(
            &frames[..7],
            &[
                (0, command(0x00)),
                (0, command(0x2c)),
                (0, command(0x10)),
                (0, command(0x01)),
                (0, command(0x03)),
                (0, command(0xa3)),
                (0, command(0x09)),
            ]
        );
    }

    #[test]
    fn test_init_allocates_once() {
        let (mut display, _trace) = display::<2>();
        display
            .init(0, Config::default().with_geometry(Geometry::Tall))
            .unwrap();
        assert_eq!(display.framebuffers().unwrap().buffer_size(), 96);
        display.set_active_buffer(BufferIndex::One);
        display.set_pixel(1, 1);

        display
            .init(1, Config::default().with_geometry(Geometry::Wide))
            .unwrap();
        let framebuffers = display.framebuffers().unwrap();
        assert_eq!(framebuffers.geometry(), Geometry::Tall);
        assert_eq!(framebuffers.buffer_size(), 96);
        assert_eq!((framebuffers.width(), framebuffers.height()), (32, 24));
        assert_eq!(display.active_buffer(), BufferIndex::Zero);
        // buffer one is untouched by re-init
        display.set_active_buffer(BufferIndex::One);
        assert_eq!(display.get_pixel(1, 1), BinaryColor::On);
    }

    #[test]
    fn test_flush_requires_init() {
        let (mut display, trace) = display::<1>();
        assert_eq!(display.flush(), Err(Error::NotInitialized));
        assert!(trace.borrow().is_empty());
    }

    #[test]
    fn test_drawing_before_init_is_ignored() {
        let (mut display, _trace) = display::<1>();
        display.set_pixel(0, 0);
        display.fill_screen();
        display.swap_buffers();
        assert_eq!(Canvas::width(&display), 0);
        assert_eq!(display.get_pixel(0, 0), BinaryColor::Off);
        assert_eq!(display.size(), Size::zero());
    }

    #[test]
    fn test_flush_wide_pattern() {
        let (mut display, trace) = display::<1>();
        display.init(0, Config::default()).unwrap();
        trace.borrow_mut().clear();

        // top left corner pixel, and a full byte at the end of row 7
        display.set_pixel(0, 0);
        display.draw_line(24, 7, 31, 7, BinaryColor::On);
        display.flush().unwrap();

        let mut nibbles = vec![0u8; 64];
        nibbles[0] = 0x8; // byte column 0, row 0, high nibble
        nibbles[48 + 14] = 0xf; // byte column 3, row 7
        nibbles[48 + 15] = 0xf;
        let expected: String = bits(0b101, 3)
            + &bits(0, 7)
            + &nibbles.iter().map(|n| bits(*n as u32, 4)).collect::<String>();
        assert_eq!(frames(&trace), vec![(0, expected)]);
    }

    #[test]
    fn test_flush_tall_length() {
        let (mut display, trace) = display::<1>();
        display
            .init(0, Config::default().with_geometry(Geometry::Tall))
            .unwrap();
        trace.borrow_mut().clear();
        display.fill_screen();
        display.flush().unwrap();
        let frames = frames(&trace);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].1.len(), 10 + 96 * 4);
        assert_eq!(&frames[0].1[..10], "1010000000");
        assert!(frames[0].1[10..].chars().all(|c| c == '1'));
    }

    #[test]
    fn test_flush_sends_active_buffer_to_chip_zero() {
        let (mut display, trace) = display::<2>();
        display.init(1, Config::default()).unwrap();
        display.set_active_buffer(BufferIndex::One);
        display.fill_screen();
        display.set_active_buffer(BufferIndex::Zero);
        trace.borrow_mut().clear();

        display.flush().unwrap();
        let zero = frames(&trace);
        assert_eq!(zero.len(), 1);
        assert_eq!(zero[0].0, 0);
        // two stacked 8x32 modules
        assert_eq!(zero[0].1.len(), 10 + 128 * 4);
        assert!(zero[0].1[10..].chars().all(|c| c == '0'));

        trace.borrow_mut().clear();
        display.swap_buffers();
        display.flush().unwrap();
        let one = frames(&trace);
        assert!(one[0].1[10..].chars().all(|c| c == '1'));
    }

    #[test]
    fn test_read_data_unsupported() {
        let (mut display, trace) = display::<1>();
        assert_eq!(display.read_data(0x10, 0), 0);
        assert!(trace.borrow().is_empty());
    }

    #[test]
    fn test_draw_target() {
        let (mut display, _trace) = display::<1>();
        display.init(0, Config::default()).unwrap();
        assert_eq!(display.size(), Size::new(32, 8));

        LinePrimitive::new(Point::new(0, 0), Point::new(3, 0))
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
            .draw(&mut display)
            .unwrap();
        assert_eq!(display.framebuffers().unwrap().as_bytes()[0], 0xf0);
    }

    #[test]
    fn test_free_returns_pins() {
        let (display, trace) = display::<2>();
        let mut pins = display.free();
        pins.cs[1].set_low().unwrap();
        assert!(pins.rd.is_some());
        assert_eq!(*trace.borrow(), vec![(Line::Cs(1), false)]);
    }
}
