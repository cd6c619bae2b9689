use std::{iter::Peekable, vec::IntoIter};

use miette::Result;

use crate::{
    asm::{Asm, Operand, Stmt},
    error,
    lexer::{tokenize, LiteralKind, Token, TokenKind},
    ops::Mnemonic,
    symbol::{Register, Span},
};

/// Transforms the token stream into label blocks of classified
/// statements.
pub struct AsmParser {
    /// Reference to the source file
    src: &'static str,
    /// Peekable iterator over tokens
    toks: Peekable<IntoIter<Token>>,
    /// Assembly intermediate representation
    asm: Asm,
}

impl AsmParser {
    pub fn new(src: &'static str) -> Result<Self> {
        let toks = tokenize(src)?;
        Ok(AsmParser {
            src,
            toks: toks.into_iter().peekable(),
            asm: Asm::new(src),
        })
    }

    fn get_span(&self, span: Span) -> &str {
        &self.src[span.as_range()]
    }

    /// Create IR out of the token stream
    pub fn parse(mut self) -> Result<Asm> {
        while let Some(tok) = self.toks.next() {
            match tok.kind {
                TokenKind::Newline => continue,
                TokenKind::LabelDecl => {
                    // Strip the trailing ':'
                    let text = self.get_span(tok.span);
                    let name = text[..text.len() - 1].to_lowercase();
                    self.asm.start_block(name, tok.span);
                    // Nothing else is allowed on a label line
                    if let Some(stray) = self.toks.next_if(|next| next.kind != TokenKind::Newline)
                    {
                        return Err(error::parse_label_line(stray.span, self.src));
                    }
                }
                TokenKind::Ident => {
                    let stmt = self.parse_stmt(tok)?;
                    self.asm.push_stmt(stmt)?;
                }
                // Lines cannot start with an operand
                TokenKind::Reg | TokenKind::Lit(_) | TokenKind::Addr => {
                    return Err(error::parse_line_start(tok.span, self.src))
                }
            }
        }
        // Consume self to return the IR
        Ok(self.asm)
    }

    /// Parse one instruction: the mnemonic token already consumed, then
    /// every operand up to the end of the line.
    fn parse_stmt(&mut self, mnemonic_tok: Token) -> Result<Stmt> {
        let mnemonic: Mnemonic = self
            .get_span(mnemonic_tok.span)
            .to_lowercase()
            .parse()
            .map_err(|()| error::parse_mnemonic(mnemonic_tok.span, self.src))?;

        let mut operands = Vec::new();
        while let Some(tok) = self.toks.next_if(|tok| tok.kind != TokenKind::Newline) {
            operands.push(self.parse_operand(tok)?);
        }

        Ok(Stmt {
            mnemonic,
            operands,
            span: mnemonic_tok.span,
        })
    }

    /// Classify a single operand token.
    fn parse_operand(&mut self, tok: Token) -> Result<Operand> {
        match tok.kind {
            TokenKind::Reg => {
                let reg = self.expect_reg(tok.span)?;
                Ok(Operand::Register(reg))
            }
            TokenKind::Lit(kind) => {
                let word = self.expect_lit(tok.span, kind)?;
                Ok(Operand::Word(word))
            }
            TokenKind::Addr => self.parse_addr(tok.span),
            // Anything else that looks like a name is a label reference
            TokenKind::Ident => Ok(Operand::Label(self.get_span(tok.span).to_lowercase())),
            TokenKind::LabelDecl => Err(error::parse_label_line(tok.span, self.src)),
            TokenKind::Newline => unreachable!("newline consumed by statement loop"),
        }
    }

    /// Classify the interior of a bracketed address operand: a leading
    /// digit makes it a constant address, otherwise it names a register.
    fn parse_addr(&mut self, span: Span) -> Result<Operand> {
        let text = self.get_span(span);
        let interior = &text[1..text.len() - 1];
        let inner_span = Span::from(span.offs() + 1..span.end() - 1);

        match interior.chars().next() {
            Some(c) if c.is_ascii_digit() => {
                let kind = if interior.len() > 1 && interior[..2].eq_ignore_ascii_case("0x") {
                    LiteralKind::Hex
                } else {
                    LiteralKind::Dec
                };
                let addr = self.expect_lit(inner_span, kind)?;
                Ok(Operand::ConstAddress(addr))
            }
            Some(_) => {
                let reg = self.expect_reg(inner_span)?;
                Ok(Operand::RegisterAddress(reg))
            }
            None => Err(error::parse_addr(span, self.src)),
        }
    }

    fn expect_reg(&self, span: Span) -> Result<Register> {
        self.get_span(span)
            .to_lowercase()
            .parse()
            .map_err(|()| error::parse_register(span, self.src))
    }

    fn expect_lit(&self, span: Span, kind: LiteralKind) -> Result<u16> {
        let text = self.get_span(span);
        let parsed = match kind {
            LiteralKind::Hex => u16::from_str_radix(&text[2..], 16),
            LiteralKind::Dec => text.parse(),
        };
        parsed.map_err(|_| error::parse_lit_range(span, self.src))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::symbol::Register::*;

    fn parse(src: &'static str) -> Result<Asm> {
        AsmParser::new(src)?.parse()
    }

    fn single_stmt(src: &'static str) -> Stmt {
        let asm = parse(src).unwrap();
        let mut blocks = asm.blocks().iter();
        let block = blocks.next().unwrap();
        assert_eq!(block.stmts.len(), 1);
        Stmt {
            mnemonic: block.stmts[0].mnemonic,
            operands: block.stmts[0].operands.clone(),
            span: Span::dummy(),
        }
    }

    #[test]
    fn classify_register_and_word() {
        let stmt = single_stmt(".main:\nmov r1 0x4");
        assert_eq!(stmt.mnemonic, Mnemonic::Mov);
        assert_eq!(
            stmt.operands,
            vec![Operand::Register(R1), Operand::Word(4)]
        );
    }

    #[test]
    fn classify_const_address() {
        let stmt = single_stmt(".main:\nmov r1 [0x4]");
        assert_eq!(
            stmt.operands,
            vec![Operand::Register(R1), Operand::ConstAddress(4)]
        );
        let stmt = single_stmt(".main:\nmov r1 [512]");
        assert_eq!(
            stmt.operands,
            vec![Operand::Register(R1), Operand::ConstAddress(512)]
        );
    }

    #[test]
    fn classify_register_address() {
        let stmt = single_stmt(".main:\nmov [r3] r1");
        assert_eq!(
            stmt.operands,
            vec![Operand::RegisterAddress(R3), Operand::Register(R1)]
        );
    }

    #[test]
    fn classify_label_reference() {
        let stmt = single_stmt(".main:\njsr increment");
        assert_eq!(stmt.mnemonic, Mnemonic::Jsr);
        assert_eq!(stmt.operands, vec![Operand::Label("increment".into())]);
    }

    #[test]
    fn classify_special_registers() {
        let stmt = single_stmt(".main:\nmov r0 rsp");
        assert_eq!(
            stmt.operands,
            vec![Operand::Register(R0), Operand::Register(Sp)]
        );
        let stmt = single_stmt(".main:\nmov r0 rpc");
        assert_eq!(
            stmt.operands,
            vec![Operand::Register(R0), Operand::Register(Pc)]
        );
    }

    #[test]
    fn tokens_are_case_insensitive() {
        let stmt = single_stmt(".main:\nMOV R1 0X4");
        assert_eq!(stmt.mnemonic, Mnemonic::Mov);
        assert_eq!(
            stmt.operands,
            vec![Operand::Register(R1), Operand::Word(4)]
        );
    }

    #[test]
    fn labels_group_statements() {
        let asm = parse(
            "increment:\ninc r1\nrtn\n.main:\njsr increment\nhalt\n",
        )
        .unwrap();
        let names: Vec<&str> = asm
            .blocks()
            .iter()
            .map(|block| block.name.as_str())
            .collect();
        assert_eq!(names, vec!["increment", ".main"]);
        assert_eq!(asm.blocks()[0].stmts.len(), 2);
        assert_eq!(asm.blocks()[1].stmts.len(), 2);
    }

    #[test]
    fn comments_ignored_to_end_of_line() {
        let stmt = single_stmt(".main:\nmov r1 0x4 ; load constant into register 1");
        assert_eq!(stmt.operands.len(), 2);
    }

    #[test]
    fn stray_instruction_errors() {
        assert!(parse("inc r1\n.main:\nhalt").is_err());
    }

    #[test]
    fn lines_cannot_start_with_an_operand() {
        assert!(parse(".main:\nr1\nhalt\n").is_err());
        assert!(parse(".main:\n0x4\nhalt\n").is_err());
        assert!(parse(".main:\n[0x4]\nhalt\n").is_err());
    }

    #[test]
    fn label_line_must_be_bare() {
        assert!(parse(".main: inc r1").is_err());
    }

    #[test]
    fn bad_mnemonic_errors() {
        assert!(parse(".main:\nfrobnicate r1").is_err());
    }

    #[test]
    fn bad_register_errors() {
        assert!(parse(".main:\ninc r9").is_err());
        assert!(parse(".main:\nmov [rq] r1").is_err());
    }

    #[test]
    fn oversized_literal_errors() {
        assert!(parse(".main:\nmov r1 65536").is_err());
        assert!(parse(".main:\nmov r1 0x10000").is_err());
    }

    #[test]
    fn empty_address_errors() {
        assert!(parse(".main:\nmov r1 []").is_err());
    }
}
