use fxhash::FxHashMap;
use miette::Result;

use crate::asm::{Asm, Block, Operand};
use crate::error;
use crate::ops::{Opcode, MODE_BIT};
use crate::runtime::MEM_SIZE;
use crate::symbol::Span;

/// Entry label every program must declare; the linker rotates it to
/// image offset 0 so it executes first.
pub const MAIN_LABEL: &str = ".main";

/// A forward reference recorded during emission: two placeholder bytes
/// at `offset` to be overwritten with the named label's image offset.
#[derive(Debug)]
struct Fixup {
    offset: usize,
    label: String,
    span: Span,
}

/// A linked binary program image. Byte 0 is the first opcode executed.
pub struct Image {
    bytes: Vec<u8>,
}

impl Image {
    /// Emit and link the IR into a binary image.
    ///
    /// Pass 1 walks the blocks with `.main` rotated to the front,
    /// recording each label's offset and emitting placeholder bytes for
    /// label operands. Pass 2 patches every fixup little-endian.
    pub fn assemble(asm: &Asm) -> Result<Image> {
        let src = asm.src();
        let main = asm
            .blocks()
            .iter()
            .position(|block| block.name == MAIN_LABEL)
            .ok_or_else(|| error::link_missing_main(src))?;

        let rotated: Vec<&Block> = std::iter::once(&asm.blocks()[main])
            .chain(asm.blocks().iter().enumerate().filter_map(|(i, block)| {
                (i != main).then_some(block)
            }))
            .collect();

        let mut labels: FxHashMap<&str, u16> = FxHashMap::default();
        let mut fixups: Vec<Fixup> = Vec::new();
        let mut bytes: Vec<u8> = Vec::new();

        for block in rotated {
            if labels.insert(&block.name, bytes.len() as u16).is_some() {
                return Err(error::link_duplicate_label(block.span, src));
            }

            for stmt in &block.stmts {
                let enc = stmt.encoding(src)?;
                bytes.push(enc.op as u8 | if enc.indirect { MODE_BIT } else { 0 });

                // Stores decode the value before the effective address,
                // so `mov [dst] src` emits its operands swapped
                let ordered: Vec<&Operand> = match enc.op {
                    Opcode::Strm | Opcode::Stcm => stmt.operands.iter().rev().collect(),
                    _ => stmt.operands.iter().collect(),
                };

                for operand in ordered {
                    match operand {
                        Operand::Register(reg) | Operand::RegisterAddress(reg) => {
                            bytes.push(reg.index());
                        }
                        Operand::Word(val) | Operand::ConstAddress(val) => {
                            bytes.extend_from_slice(&val.to_le_bytes());
                        }
                        Operand::Label(name) => {
                            fixups.push(Fixup {
                                offset: bytes.len(),
                                label: name.clone(),
                                span: stmt.span,
                            });
                            bytes.extend_from_slice(&[0, 0]);
                        }
                    }
                }
            }
        }

        if bytes.len() > MEM_SIZE {
            return Err(error::link_image_size(bytes.len()));
        }

        for fixup in fixups {
            let target = labels
                .get(fixup.label.as_str())
                .ok_or_else(|| error::link_undefined_label(fixup.span, src, &fixup.label))?;
            bytes[fixup.offset..fixup.offset + 2].copy_from_slice(&target.to_le_bytes());
        }

        Ok(Image { bytes })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}
