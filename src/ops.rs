use std::str::FromStr;

/// Bit 7 of the instruction byte selects register-indirect addressing
/// for the instruction's address operand.
pub const MODE_BIT: u8 = 0x80;

/// Operation encodings for the MICA-16.
///
/// Values never exceed 0x7F so the address-mode bit can ride on top.
/// Gaps in the numbering belong to retired operations and decode as
/// illegal instructions.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(u8)]
pub enum Opcode {
    Noop = 0x00,

    // Arithmetic: register, constant and memory right-hand sides
    Add = 0x01,
    Addc = 0x02,
    Adda = 0x03,
    Sub = 0x04,
    Subc = 0x05,
    Suba = 0x06,
    Mul = 0x07,
    Mulc = 0x08,
    Mula = 0x09,
    Div = 0x0A,
    Divc = 0x0B,
    Diva = 0x0C,

    // Flag-only comparison
    Cmp = 0x0E,
    Cmpa = 0x0F,

    Inc = 0x10,
    Incm = 0x11,
    Dec = 0x12,
    Decm = 0x13,

    // Bitwise
    Uxt = 0x20,
    Lsl = 0x21,
    Lsr = 0x22,

    // Data movement
    Ldr = 0x30,
    Ldc = 0x31,
    Ldm = 0x32,
    Strm = 0x33,
    Stcm = 0x35,

    // Control flow
    Jsr = 0x40,
    Rtn = 0x41,
    Jmp = 0x42,
    Jrz = 0x43,
    Jre = 0x44,
    Jrn = 0x45,
    Jrg = 0x46,
    Jrl = 0x47,
    Jrle = 0x48,
    Jrge = 0x49,

    // Stack
    Push = 0x60,
    Pushc = 0x62,
    Pop = 0x63,
    Pushs = 0x65,
    Pops = 0x66,

    // Interrupt control
    Sei = 0x70,
    Cli = 0x71,

    Reset = 0x7E,
    Halt = 0x7F,
}

impl Opcode {
    /// Decode an instruction byte, ignoring the address-mode bit.
    pub fn from_byte(byte: u8) -> Option<Opcode> {
        use Opcode::*;
        let op = match byte & !MODE_BIT {
            0x00 => Noop,
            0x01 => Add,
            0x02 => Addc,
            0x03 => Adda,
            0x04 => Sub,
            0x05 => Subc,
            0x06 => Suba,
            0x07 => Mul,
            0x08 => Mulc,
            0x09 => Mula,
            0x0A => Div,
            0x0B => Divc,
            0x0C => Diva,
            0x0E => Cmp,
            0x0F => Cmpa,
            0x10 => Inc,
            0x11 => Incm,
            0x12 => Dec,
            0x13 => Decm,
            0x20 => Uxt,
            0x21 => Lsl,
            0x22 => Lsr,
            0x30 => Ldr,
            0x31 => Ldc,
            0x32 => Ldm,
            0x33 => Strm,
            0x35 => Stcm,
            0x40 => Jsr,
            0x41 => Rtn,
            0x42 => Jmp,
            0x43 => Jrz,
            0x44 => Jre,
            0x45 => Jrn,
            0x46 => Jrg,
            0x47 => Jrl,
            0x48 => Jrle,
            0x49 => Jrge,
            0x60 => Push,
            0x62 => Pushc,
            0x63 => Pop,
            0x65 => Pushs,
            0x66 => Pops,
            0x70 => Sei,
            0x71 => Cli,
            0x7E => Reset,
            0x7F => Halt,
            _ => return None,
        };
        Some(op)
    }
}

/// Abstract instruction names as written in source, before operand
/// kinds pick the concrete opcode.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Mnemonic {
    Noop,
    Reset,
    Halt,
    Add,
    Sub,
    Mul,
    Div,
    Cmp,
    Inc,
    Dec,
    Uxt,
    Lsl,
    Lsr,
    Mov,
    Jsr,
    Rtn,
    Jmp,
    Jrz,
    Jre,
    Jrn,
    Jrg,
    Jrge,
    Jrl,
    Jrle,
    Push,
    Pop,
    Pushs,
    Pops,
    Sei,
    Cli,
}

impl FromStr for Mnemonic {
    type Err = ();

    // Expects a lowercased token. Accepts both the terse and verbose
    // spelling of each mnemonic that has one.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use Mnemonic::*;
        let mnemonic = match s {
            "noop" | "nop" => Noop,
            "reset" => Reset,
            "halt" => Halt,
            "add" => Add,
            "sub" => Sub,
            "mul" => Mul,
            "div" => Div,
            "cmp" => Cmp,
            "inc" => Inc,
            "dec" => Dec,
            "uxt" => Uxt,
            "lsl" => Lsl,
            "lsr" => Lsr,
            "mov" => Mov,
            "jsr" | "call" => Jsr,
            "rtn" | "return" => Rtn,
            "jmp" | "jump" => Jmp,
            "jrz" => Jrz,
            "jre" => Jre,
            "jrn" => Jrn,
            "jrg" => Jrg,
            "jrge" => Jrge,
            "jrl" => Jrl,
            "jrle" => Jrle,
            "push" => Push,
            "pop" => Pop,
            "pushs" => Pushs,
            "pops" => Pops,
            "sei" | "seti" => Sei,
            "cli" | "clri" => Cli,
            _ => return Err(()),
        };
        Ok(mnemonic)
    }
}
