use miette::{miette, LabeledSpan, Report, Severity};

use crate::symbol::Span;

// Lexer errors

pub fn lex_unknown(span: Span, src: &'static str) -> Report {
    miette!(
        severity = Severity::Error,
        code = "lex::unknown",
        help = "tokens are instructions, registers, literals, [addresses] and labels.",
        labels = vec![LabeledSpan::at(span, "unknown token")],
        "Encountered an unknown token",
    )
    .with_source_code(src)
}

// Parser errors

pub fn parse_mnemonic(span: Span, src: &'static str) -> Report {
    miette!(
        severity = Severity::Error,
        code = "parse::mnemonic",
        help = "check the instruction listing for available mnemonics.",
        labels = vec![LabeledSpan::at(span, "not an instruction")],
        "Encountered an invalid mnemonic",
    )
    .with_source_code(src)
}

pub fn parse_line_start(span: Span, src: &'static str) -> Report {
    miette!(
        severity = Severity::Error,
        code = "parse::line_start",
        help = "lines should start with a label declaration or a mnemonic.",
        labels = vec![LabeledSpan::at(span, "unexpected token")],
        "Expected a statement to start here",
    )
    .with_source_code(src)
}

pub fn parse_label_line(span: Span, src: &'static str) -> Report {
    miette!(
        severity = Severity::Error,
        code = "parse::label",
        help = "label declarations sit alone on their line.",
        labels = vec![LabeledSpan::at(span, "trailing token")],
        "Unexpected token after label declaration",
    )
    .with_source_code(src)
}

pub fn parse_stray_stmt(span: Span, src: &'static str) -> Report {
    miette!(
        severity = Severity::Error,
        code = "parse::stray_instruction",
        help = "every instruction belongs to a label; start the program with `.main:`.",
        labels = vec![LabeledSpan::at(span, "instruction before any label")],
        "Encountered an instruction outside a label block",
    )
    .with_source_code(src)
}

pub fn parse_register(span: Span, src: &'static str) -> Report {
    miette!(
        severity = Severity::Error,
        code = "parse::register",
        help = "valid registers are r0-r5, rpc and rsp.",
        labels = vec![LabeledSpan::at(span, "not a register")],
        "Encountered an invalid register name",
    )
    .with_source_code(src)
}

pub fn parse_lit_range(span: Span, src: &'static str) -> Report {
    miette!(
        severity = Severity::Error,
        code = "parse::lit_range",
        help = "literals must fit in 16 bits: 0 to 65535 or 0x0 to 0xffff.",
        labels = vec![LabeledSpan::at(span, "out-of-range literal")],
        "Encountered a literal too large for a word",
    )
    .with_source_code(src)
}

pub fn parse_addr(span: Span, src: &'static str) -> Report {
    miette!(
        severity = Severity::Error,
        code = "parse::addr",
        help = "address operands look like [0x1f00] or [r3].",
        labels = vec![LabeledSpan::at(span, "malformed address")],
        "Encountered a malformed address operand",
    )
    .with_source_code(src)
}

pub fn parse_operands(span: Span, src: &'static str) -> Report {
    miette!(
        severity = Severity::Error,
        code = "parse::operands",
        help = "check the operand kinds this instruction accepts.",
        labels = vec![LabeledSpan::at(span, "no encoding for these operands")],
        "No instruction encoding matches these operands",
    )
    .with_source_code(src)
}

pub fn parse_mem_to_mem(span: Span, src: &'static str) -> Report {
    miette!(
        severity = Severity::Error,
        code = "parse::mem_to_mem",
        help = "stage the value through a register instead.",
        labels = vec![LabeledSpan::at(span, "both operands are memory")],
        "Memory-to-memory moves are not permitted",
    )
    .with_source_code(src)
}

// Linker errors

pub fn link_missing_main(src: &'static str) -> Report {
    miette!(
        severity = Severity::Error,
        code = "link::missing_main",
        help = "execution starts at `.main:`; declare it somewhere in the program.",
        "The program has no `.main` label",
    )
    .with_source_code(src)
}

pub fn link_duplicate_label(span: Span, src: &'static str) -> Report {
    miette!(
        severity = Severity::Error,
        code = "link::duplicate_label",
        help = "labels may be declared only once per program.",
        labels = vec![LabeledSpan::at(span, "duplicate label")],
        "Duplicate label declaration",
    )
    .with_source_code(src)
}

pub fn link_undefined_label(span: Span, src: &'static str, name: &str) -> Report {
    miette!(
        severity = Severity::Error,
        code = "link::undefined_label",
        help = "label operands must name a declared label.",
        labels = vec![LabeledSpan::at(span, "label never declared")],
        "Reference to undefined label `{name}`",
    )
    .with_source_code(src)
}

pub fn link_image_size(len: usize) -> Report {
    miette!(
        severity = Severity::Error,
        code = "link::image_size",
        help = "the address space holds 65535 bytes.",
        "Assembled image is {len} bytes and does not fit in memory",
    )
}

// Runtime errors

pub fn run_illegal(byte: u8, addr: u16) -> Report {
    miette!(
        severity = Severity::Error,
        code = "run::illegal",
        help = "the image is corrupt or execution jumped into data.",
        "Illegal instruction 0x{byte:02X} at address 0x{addr:04X}",
    )
}

pub fn run_div_zero(addr: u16) -> Report {
    miette!(
        severity = Severity::Error,
        code = "run::div_zero",
        help = "guard the divisor with a conditional jump before dividing.",
        "Division by zero near address 0x{addr:04X}",
    )
}

pub fn load_oversize(len: usize) -> Report {
    miette!(
        severity = Severity::Error,
        code = "run::load",
        help = "the address space holds 65535 bytes.",
        "Program image is {len} bytes and does not fit in memory",
    )
}
