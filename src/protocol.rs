//! HT1632C wire protocol.
//!
//! The controller is fed over a three wire bus: chip select (`CS`, active
//! low), write clock (`WR`) and data. Data is sampled on the rising edge of
//! `WR` and every frame starts with a 3 bit mode tag sent MSB first:
//!
//! | frame            | bits | layout                                   |
//! |------------------|------|------------------------------------------|
//! | command          | 12   | `100` + 8 bit command + 1 don't care bit |
//! | write            | 14   | `101` + 7 bit address + 4 bit nibble     |
//! | successive write | 10+4n| `101` + 7 bit address + n nibbles        |
//!
//! In successive write mode the controller increments its RAM address after
//! every nibble so the address is only sent once per select.

use bitfield::bitfield;

/// Mode tag preceding every command frame.
pub const TAG_COMMAND: u16 = 0b100;
/// Mode tag preceding RAM writes.
pub const TAG_WRITE: u16 = 0b101;
/// Mode tag for RAM reads. Defined by the controller, never emitted.
pub const TAG_READ: u16 = 0b110;

/// Addresses are 7 bits wide.
pub const ADDRESS_MASK: u8 = 0x7f;
/// RAM data is written a nibble at a time.
pub const NIBBLE_MASK: u8 = 0x0f;
/// Number of single writes issued by a chip clear.
pub const CLEAR_WRITES: usize = 256;
/// Highest PWM duty level accepted by the brightness command.
pub const MAX_BRIGHTNESS: u8 = 15;

bitfield! {
    /// A 12 bit command frame.
    ///
    /// - Bits 11-9: mode tag (`100`)
    /// - Bits 8-1: command code
    /// - Bit 0: don't care, always sent as zero
    #[derive(Clone, Copy, Default, PartialEq)]
    #[repr(transparent)]
    pub struct CommandFrame(u16);
    impl Debug;
    pub tag, set_tag: 11, 9;
    pub command, set_command: 8, 1;
    pub pad, set_pad: 0;
}

#[cfg(feature = "defmt")]
impl defmt::Format for CommandFrame {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "CommandFrame({=u16:#x})", self.0)
    }
}

impl CommandFrame {
    /// Number of bits on the wire.
    pub const BITS: u8 = 12;

    pub fn new(command: Command) -> Self {
        let mut frame = Self(0);
        frame.set_tag(TAG_COMMAND);
        frame.set_command(command.code() as u16);
        frame
    }

    /// The frame word, right aligned.
    pub const fn bits(&self) -> u16 {
        self.0
    }

    /// Mask selecting the first bit to shift out.
    pub const fn first_bit() -> u16 {
        1 << (Self::BITS - 1)
    }
}

bitfield! {
    /// A 14 bit single address write frame.
    ///
    /// - Bits 13-11: mode tag (`101`)
    /// - Bits 10-4: RAM address
    /// - Bits 3-0: data nibble
    ///
    /// The upper 10 bits on their own form the header of a successive write.
    #[derive(Clone, Copy, Default, PartialEq)]
    #[repr(transparent)]
    pub struct WriteFrame(u16);
    impl Debug;
    pub tag, set_tag: 13, 11;
    pub address, set_address: 10, 4;
    pub data, set_data: 3, 0;
}

#[cfg(feature = "defmt")]
impl defmt::Format for WriteFrame {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "WriteFrame({=u16:#x})", self.0)
    }
}

impl WriteFrame {
    /// Number of bits on the wire.
    pub const BITS: u8 = 14;
    /// Number of bits in the successive write header (tag + address).
    pub const HEADER_BITS: u8 = 10;

    pub fn new(address: u8, data: u8) -> Self {
        let mut frame = Self(0);
        frame.set_tag(TAG_WRITE);
        frame.set_address((address & ADDRESS_MASK) as u16);
        frame.set_data((data & NIBBLE_MASK) as u16);
        frame
    }

    pub const fn bits(&self) -> u16 {
        self.0
    }

    pub const fn first_bit() -> u16 {
        1 << (Self::BITS - 1)
    }

    /// Tag and address only, right aligned, for a successive write.
    pub const fn header(&self) -> u16 {
        self.0 >> 4
    }

    pub const fn header_first_bit() -> u16 {
        1 << (Self::HEADER_BITS - 1)
    }
}

/// COM output configuration, the drive mode sent during init.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommonDrive {
    /// N-MOS open drain outputs, 8 COM lines.
    #[default]
    NMos8,
    /// N-MOS open drain outputs, 16 COM lines.
    NMos16,
    /// P-MOS open drain outputs, 8 COM lines.
    PMos8,
    /// P-MOS open drain outputs, 16 COM lines.
    PMos16,
}

impl CommonDrive {
    pub const fn code(self) -> u8 {
        match self {
            CommonDrive::NMos8 => 0x20,
            CommonDrive::NMos16 => 0x24,
            CommonDrive::PMos8 => 0x28,
            CommonDrive::PMos16 => 0x2c,
        }
    }
}

/// System clock source.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockSource {
    /// Master mode, on-chip RC oscillator, clock and sync driven out.
    #[default]
    RcMaster,
    /// Slave mode, clock and sync taken from the master chip.
    Slave,
    /// External clock on the OSC pin.
    External,
}

impl ClockSource {
    pub const fn command(self) -> Command {
        match self {
            ClockSource::RcMaster => Command::RcMaster,
            ClockSource::Slave => Command::SlaveMode,
            ClockSource::External => Command::ExtClk,
        }
    }
}

/// Controller commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Oscillator and duty cycle generator off.
    SysDis,
    /// Oscillator on.
    SysEn,
    /// Duty cycle generator off.
    LedOff,
    /// Duty cycle generator on.
    LedOn,
    BlinkOff,
    BlinkOn,
    SlaveMode,
    RcMaster,
    ExtClk,
    Com(CommonDrive),
    /// PWM duty `level + 1` / 16, level is masked to 4 bits.
    Pwm(u8),
}

impl Command {
    pub const PWM_BASE: u8 = 0xa0;

    pub const fn code(self) -> u8 {
        match self {
            Command::SysDis => 0x00,
            Command::SysEn => 0x01,
            Command::LedOff => 0x02,
            Command::LedOn => 0x03,
            Command::BlinkOff => 0x08,
            Command::BlinkOn => 0x09,
            Command::SlaveMode => 0x10,
            Command::RcMaster => 0x18,
            Command::ExtClk => 0x1c,
            Command::Com(drive) => drive.code(),
            Command::Pwm(level) => Self::PWM_BASE | (level & NIBBLE_MASK),
        }
    }
}
