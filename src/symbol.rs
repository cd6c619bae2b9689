use std::{fmt, ops::Range, str::FromStr};

use miette::SourceSpan;

/// Location within source str
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Span {
    offs: SrcOffset,
    len: usize,
}

impl Span {
    pub fn new(offs: SrcOffset, len: usize) -> Self {
        Span { offs, len }
    }

    /// Non-source span
    pub fn dummy() -> Self {
        Span {
            offs: SrcOffset(0),
            len: 0,
        }
    }

    /// Returns a range that can be used to index the source
    pub fn as_range(&self) -> Range<usize> {
        self.offs()..self.end()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn offs(&self) -> usize {
        self.offs.0
    }

    pub fn end(&self) -> usize {
        self.offs.0 + self.len
    }
}

// Used for miette conversion
impl From<Span> for SourceSpan {
    fn from(value: Span) -> Self {
        SourceSpan::new(value.offs().into(), value.len())
    }
}

impl From<Range<usize>> for Span {
    fn from(value: Range<usize>) -> Self {
        Span {
            offs: SrcOffset(value.start),
            len: value.end - value.start,
        }
    }
}

/// Used to refer to offsets from the start of a source file.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct SrcOffset(pub usize);

/// One of the eight addressable 16-bit register slots.
///
/// The selector value doubles as the byte emitted for register
/// operands, so the discriminants are load-bearing.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum Register {
    R0 = 0,
    R1,
    R2,
    R3,
    R4,
    R5,
    /// Program counter, addressable as `rpc`.
    Pc,
    /// Stack pointer, addressable as `rsp`.
    Sp,
}

impl Register {
    /// Selector byte as emitted into the image.
    pub fn index(self) -> u8 {
        self as u8
    }
}

impl FromStr for Register {
    type Err = ();

    // Expects the full lowercased register token.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "r0" => Ok(Register::R0),
            "r1" => Ok(Register::R1),
            "r2" => Ok(Register::R2),
            "r3" => Ok(Register::R3),
            "r4" => Ok(Register::R4),
            "r5" => Ok(Register::R5),
            "r6" | "rpc" => Ok(Register::Pc),
            "r7" | "rsp" => Ok(Register::Sp),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Register::Pc => f.write_str("rpc"),
            Register::Sp => f.write_str("rsp"),
            reg => write!(f, "r{}", *reg as u8),
        }
    }
}

/// Flags packed into the status byte, LSB first.
///
/// PUSHS/POPS and interrupt entry move the whole byte, so the bit
/// positions are part of the image format.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum StatusFlag {
    /// Negative
    N = 0,
    /// Overflow
    O,
    /// Break
    B,
    /// Decimal
    D,
    /// Global interrupt enable
    I,
    /// Zero
    Z,
    /// Carry
    C,
}

impl StatusFlag {
    pub fn mask(self) -> u8 {
        1 << self as u8
    }
}

impl fmt::Display for StatusFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StatusFlag::N => "negative",
            StatusFlag::O => "overflow",
            StatusFlag::B => "break",
            StatusFlag::D => "decimal",
            StatusFlag::I => "interrupt",
            StatusFlag::Z => "zero",
            StatusFlag::C => "carry",
        };
        f.write_str(name)
    }
}

/// Interrupt request lines, one bit each in the pending byte.
///
/// Lines 0..6 are maskable and serviced lowest-numbered first; `Nm`
/// (bit 7) preempts regardless of the global enable flag.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Interrupt {
    I0 = 0,
    I1,
    I2,
    I3,
    I4,
    I5,
    I6,
    /// Non-maskable, highest priority.
    Nm,
}

impl Interrupt {
    /// Line number, used to index the vector table.
    pub fn line(self) -> u8 {
        self as u8
    }

    pub fn mask(self) -> u8 {
        1 << self as u8
    }
}
