//! Grammar-level tests for the line parser, mirroring the teacher's
//! `vasm::test::pest` module but against this crate's single `line` rule.

use crate::parser::{LineParser, Rule};
use ::pest::*;

#[test]
fn comment_line_has_no_inner_tokens() {
    parses_to! {
        parser: LineParser,
        input: "; a full line comment",
        rule: Rule::line,
        tokens: []
    };
}

#[test]
fn org_directive() {
    parses_to! {
        parser: LineParser,
        input: ".ORG 10",
        rule: Rule::line,
        tokens: [
            directive(0, 7, [
                directive_org(0, 7, [
                    hex_literal(5, 7)
                ])
            ])
        ]
    };
}

#[test]
fn label_line() {
    parses_to! {
        parser: LineParser,
        input: ":start",
        rule: Rule::line,
        tokens: [
            label(0, 6, [
                name(1, 6)
            ])
        ]
    };
}

#[test]
fn instruction_with_half_selected_operand() {
    parses_to! {
        parser: LineParser,
        input: "LDIB <X",
        rule: Rule::line,
        tokens: [
            instruction(0, 7, [
                name(0, 4),
                operand_list(5, 7, [
                    operand(5, 7)
                ])
            ])
        ]
    };
}

#[test]
fn exec2_two_operand_instruction() {
    parses_to! {
        parser: LineParser,
        input: "LDI 1, AB",
        rule: Rule::line,
        tokens: [
            instruction(0, 9, [
                name(0, 3),
                operand_list(4, 9, [
                    operand(4, 5),
                    operand(7, 9)
                ])
            ])
        ]
    };
}
