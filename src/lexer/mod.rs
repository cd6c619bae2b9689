use lazy_static::lazy_static;
use miette::Result;
use regex::Regex;

use crate::error;
use crate::symbol::{Span, SrcOffset};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LiteralKind {
    Hex,
    Dec,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TokenKind {
    /// Mnemonics and label references
    Ident,
    /// Declaration ending in `:`, must sit alone on its line
    LabelDecl,
    Reg,
    Lit(LiteralKind),
    /// Bracketed address operand, constant or register interior
    Addr,
    /// Statement separator
    Newline,
}

lazy_static! {
    // Order is important since some patterns are subpatterns of others.
    // Do NOT rearrange without a good hard think.
    static ref PATTERNS: Vec<(Option<TokenKind>, Regex)> = vec![
        (None, Regex::new(r"^[ \t\r,]+").unwrap()),
        (Some(TokenKind::Newline), Regex::new(r"^\n").unwrap()),
        (None, Regex::new(r"^;[^\n]*").unwrap()),
        (Some(TokenKind::Addr), Regex::new(r"^\[[^\]\s]*\]").unwrap()),
        (
            Some(TokenKind::LabelDecl),
            Regex::new(r"^\.?[a-zA-Z_][a-zA-Z0-9_.]*:").unwrap(),
        ),
        (
            Some(TokenKind::Lit(LiteralKind::Hex)),
            Regex::new(r"^0[xX][0-9a-fA-F]+\b").unwrap(),
        ),
        (
            Some(TokenKind::Lit(LiteralKind::Dec)),
            Regex::new(r"^[0-9]+\b").unwrap(),
        ),
        (
            Some(TokenKind::Reg),
            Regex::new(r"^[rR]([0-9]|[pP][cC]|[sS][pP])\b").unwrap(),
        ),
        (
            Some(TokenKind::Ident),
            Regex::new(r"^\.?[a-zA-Z_][a-zA-Z0-9_.]*").unwrap(),
        ),
    ];
}

/// Scan the whole source, dropping whitespace and comments but keeping
/// newlines so the parser can tell where statements begin.
pub fn tokenize(src: &'static str) -> Result<Vec<Token>> {
    let mut toks = Vec::new();
    let mut pos = 0;

    'scan: while pos < src.len() {
        let rest = &src[pos..];
        for (kind, re) in PATTERNS.iter() {
            if let Some(found) = re.find(rest) {
                if let Some(kind) = kind {
                    toks.push(Token {
                        kind: *kind,
                        span: Span::new(SrcOffset(pos), found.len()),
                    });
                }
                pos += found.len();
                continue 'scan;
            }
        }
        return Err(error::lex_unknown(Span::new(SrcOffset(pos), 1), src));
    }

    Ok(toks)
}

#[cfg(test)]
mod test {
    use super::*;

    fn kinds(src: &'static str) -> Vec<TokenKind> {
        tokenize(src).unwrap().iter().map(|tok| tok.kind).collect()
    }

    #[test]
    fn classify_instruction_line() {
        assert_eq!(
            kinds("mov r1 0x04\n"),
            vec![
                TokenKind::Ident,
                TokenKind::Reg,
                TokenKind::Lit(LiteralKind::Hex),
                TokenKind::Newline,
            ]
        );
    }

    #[test]
    fn classify_addresses() {
        assert_eq!(
            kinds("mov [0x200] r1"),
            vec![TokenKind::Ident, TokenKind::Addr, TokenKind::Reg]
        );
        assert_eq!(
            kinds("mov r1 [r2]"),
            vec![TokenKind::Ident, TokenKind::Reg, TokenKind::Addr]
        );
    }

    #[test]
    fn classify_label_parts() {
        assert_eq!(
            kinds(".main:\njsr loop"),
            vec![
                TokenKind::LabelDecl,
                TokenKind::Newline,
                TokenKind::Ident,
                TokenKind::Ident,
            ]
        );
    }

    #[test]
    fn comments_are_dropped() {
        assert_eq!(
            kinds("inc r1 ; bump the counter\n"),
            vec![TokenKind::Ident, TokenKind::Reg, TokenKind::Newline]
        );
    }

    #[test]
    fn commas_are_junk() {
        assert_eq!(
            kinds("add r1, r2"),
            vec![TokenKind::Ident, TokenKind::Reg, TokenKind::Reg]
        );
    }

    #[test]
    fn unknown_character_errors() {
        assert!(tokenize("mov r1 @").is_err());
    }
}
