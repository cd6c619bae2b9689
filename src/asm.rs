use miette::Result;

use crate::error;
use crate::ops::{Mnemonic, Opcode};
use crate::symbol::{Register, Span};

/// Assembly intermediate representation: the program's label blocks in
/// source order, plus the source they were parsed from for diagnostics.
pub struct Asm {
    src: &'static str,
    blocks: Vec<Block>,
}

impl Asm {
    pub fn new(src: &'static str) -> Self {
        Asm {
            src,
            blocks: Vec::new(),
        }
    }

    pub fn src(&self) -> &'static str {
        self.src
    }

    /// Open a new label block; following statements accumulate into it.
    pub fn start_block(&mut self, name: String, span: Span) {
        self.blocks.push(Block {
            name,
            span,
            stmts: Vec::new(),
        });
    }

    /// Append a statement to the open block, if any.
    pub fn push_stmt(&mut self, stmt: Stmt) -> Result<()> {
        match self.blocks.last_mut() {
            Some(block) => {
                block.stmts.push(stmt);
                Ok(())
            }
            None => Err(error::parse_stray_stmt(stmt.span, self.src)),
        }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }
}

/// All statements between one label declaration and the next.
#[derive(PartialEq, Eq, Debug)]
pub struct Block {
    pub name: String,
    pub span: Span,
    pub stmts: Vec<Stmt>,
}

/// A single instruction statement.
#[derive(PartialEq, Eq, Debug)]
pub struct Stmt {
    pub mnemonic: Mnemonic,
    pub operands: Vec<Operand>,
    /// Span of the mnemonic token, for encoding diagnostics.
    pub span: Span,
}

/// A classified operand. The kind drives opcode selection; the payload
/// is what gets emitted.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Operand {
    /// Bare register: one selector byte.
    Register(Register),
    /// 16-bit immediate: two bytes LE.
    Word(u16),
    /// `[0x...]`: a constant effective address, two bytes LE.
    ConstAddress(u16),
    /// `[rN]`: effective address read from a register, one selector byte.
    RegisterAddress(Register),
    /// Symbolic reference, patched by the linker: two bytes LE.
    Label(String),
}

/// Concrete encoding picked for a statement: the base opcode plus the
/// address-mode flag that is ORed into its top bit.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Encoding {
    pub op: Opcode,
    pub indirect: bool,
}

fn direct(op: Opcode) -> Result<Encoding> {
    Ok(Encoding {
        op,
        indirect: false,
    })
}

fn indirect(op: Opcode) -> Result<Encoding> {
    Ok(Encoding { op, indirect: true })
}

impl Stmt {
    /// Opcode selection: map the mnemonic and its operand kinds to a
    /// concrete encoding, or fail if no instruction takes this shape.
    pub fn encoding(&self, src: &'static str) -> Result<Encoding> {
        use Mnemonic as M;
        use Operand as Op;

        match (self.mnemonic, self.operands.as_slice()) {
            (M::Noop, []) => direct(Opcode::Noop),
            (M::Reset, []) => direct(Opcode::Reset),
            (M::Halt, []) => direct(Opcode::Halt),
            (M::Rtn, []) => direct(Opcode::Rtn),
            (M::Pushs, []) => direct(Opcode::Pushs),
            (M::Pops, []) => direct(Opcode::Pops),
            (M::Sei, []) => direct(Opcode::Sei),
            (M::Cli, []) => direct(Opcode::Cli),

            (M::Add | M::Sub | M::Mul | M::Div, [Op::Register(_), rhs]) => {
                let (reg, constant, mem) = match self.mnemonic {
                    M::Add => (Opcode::Add, Opcode::Addc, Opcode::Adda),
                    M::Sub => (Opcode::Sub, Opcode::Subc, Opcode::Suba),
                    M::Mul => (Opcode::Mul, Opcode::Mulc, Opcode::Mula),
                    M::Div => (Opcode::Div, Opcode::Divc, Opcode::Diva),
                    _ => unreachable!(),
                };
                match rhs {
                    Op::Register(_) => direct(reg),
                    Op::Word(_) => direct(constant),
                    Op::ConstAddress(_) => direct(mem),
                    Op::RegisterAddress(_) => indirect(mem),
                    Op::Label(_) => Err(error::parse_operands(self.span, src)),
                }
            }

            (M::Cmp, [Op::Register(_), Op::Register(_)]) => direct(Opcode::Cmp),
            (M::Cmp, [Op::Register(_), Op::ConstAddress(_)]) => direct(Opcode::Cmpa),
            (M::Cmp, [Op::Register(_), Op::RegisterAddress(_)]) => indirect(Opcode::Cmpa),

            (M::Inc, [Op::Register(_)]) => direct(Opcode::Inc),
            (M::Inc, [Op::ConstAddress(_)]) => direct(Opcode::Incm),
            (M::Inc, [Op::RegisterAddress(_)]) => indirect(Opcode::Incm),
            (M::Dec, [Op::Register(_)]) => direct(Opcode::Dec),
            (M::Dec, [Op::ConstAddress(_)]) => direct(Opcode::Decm),
            (M::Dec, [Op::RegisterAddress(_)]) => indirect(Opcode::Decm),

            (M::Uxt, [Op::Register(_)]) => direct(Opcode::Uxt),
            (M::Lsl, [Op::Register(_), Op::Word(_)]) => direct(Opcode::Lsl),
            (M::Lsr, [Op::Register(_), Op::Word(_)]) => direct(Opcode::Lsr),

            // A label in a value position stands for its address
            (M::Mov, [Op::Register(_), Op::Register(_)]) => direct(Opcode::Ldr),
            (M::Mov, [Op::Register(_), Op::Word(_) | Op::Label(_)]) => direct(Opcode::Ldc),
            (M::Mov, [Op::Register(_), Op::ConstAddress(_)]) => direct(Opcode::Ldm),
            (M::Mov, [Op::Register(_), Op::RegisterAddress(_)]) => indirect(Opcode::Ldm),
            (M::Mov, [Op::ConstAddress(_), Op::Register(_)]) => direct(Opcode::Strm),
            (M::Mov, [Op::RegisterAddress(_), Op::Register(_)]) => indirect(Opcode::Strm),
            (M::Mov, [Op::ConstAddress(_), Op::Word(_) | Op::Label(_)]) => direct(Opcode::Stcm),
            (M::Mov, [Op::RegisterAddress(_), Op::Word(_) | Op::Label(_)]) => {
                indirect(Opcode::Stcm)
            }
            (
                M::Mov,
                [Op::ConstAddress(_) | Op::RegisterAddress(_), Op::ConstAddress(_) | Op::RegisterAddress(_)],
            ) => Err(error::parse_mem_to_mem(self.span, src)),

            (M::Jmp | M::Jsr, [Op::Word(_) | Op::Label(_)]) => {
                direct(if self.mnemonic == M::Jmp {
                    Opcode::Jmp
                } else {
                    Opcode::Jsr
                })
            }
            (M::Jmp, [Op::RegisterAddress(_)]) => indirect(Opcode::Jmp),
            (M::Jsr, [Op::RegisterAddress(_)]) => indirect(Opcode::Jsr),

            (M::Jrz, [Op::Register(_), Op::Word(_) | Op::Label(_)]) => direct(Opcode::Jrz),
            (M::Jrz, [Op::Register(_), Op::RegisterAddress(_)]) => indirect(Opcode::Jrz),

            (
                M::Jre | M::Jrn | M::Jrg | M::Jrge | M::Jrl | M::Jrle,
                [Op::Register(_), Op::Word(_), target],
            ) => {
                let op = match self.mnemonic {
                    M::Jre => Opcode::Jre,
                    M::Jrn => Opcode::Jrn,
                    M::Jrg => Opcode::Jrg,
                    M::Jrge => Opcode::Jrge,
                    M::Jrl => Opcode::Jrl,
                    M::Jrle => Opcode::Jrle,
                    _ => unreachable!(),
                };
                match target {
                    Op::Word(_) | Op::Label(_) => direct(op),
                    Op::RegisterAddress(_) => indirect(op),
                    _ => Err(error::parse_operands(self.span, src)),
                }
            }

            (M::Push, [Op::Register(_)]) => direct(Opcode::Push),
            (M::Push, [Op::Word(_)]) => direct(Opcode::Pushc),
            (M::Pop, [Op::Register(_)]) => direct(Opcode::Pop),

            _ => Err(error::parse_operands(self.span, src)),
        }
    }
}
