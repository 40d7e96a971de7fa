//! MIPS code generation for the Aspen language.

mod frame;
mod generator;

pub use generator::generate;

#[cfg(test)]
mod tests {
    use super::*;
    use aspen_lexer::Lexer;
    use aspen_parser::Parser;

    /// Lex, parse, analyze and emit; panics on any failure.
    fn compile(src: &str) -> String {
        let tokens = Lexer::new(src).tokenize().expect("Lexing should succeed");
        let mut program = Parser::new(tokens)
            .parse_program()
            .expect("Parsing should succeed");
        aspen_sema::analyze(&mut program).expect("Analysis should succeed");
        generate(&program)
    }

    fn offset_of(haystack: &str, needle: &str) -> usize {
        haystack
            .find(needle)
            .unwrap_or_else(|| panic!("expected {:?} in emitted assembly", needle))
    }

    #[test]
    fn test_data_section_preamble() {
        let asm = compile("func main(): int { return 0; }");
        assert!(asm.starts_with(".data\n"));
        assert!(asm.contains("newline_str:\n    .asciiz \"\\n\"\n"));
        assert!(asm.contains("div_zero_msg:\n    .asciiz \"Runtime Error: Division by zero\\n\"\n"));
        assert!(asm
            .contains("missing_main_msg:\n    .asciiz \"Runtime Error: Missing main function\\n\"\n"));
        assert!(asm.contains("\n.text\n"));
    }

    #[test]
    fn test_prologue_and_main_epilogue() {
        let asm = compile("func main(): int { return 0; }");
        assert!(asm.contains(".globl main\nmain:\n"));
        assert!(asm.contains(
            "main:\n    addi $sp, $sp, -8\n    sw $fp, 4($sp)\n    sw $ra, 0($sp)\n    move $fp, $sp\n"
        ));
        // main exits through syscall 10 instead of jr $ra
        assert!(asm.contains(
            "main_end_0:\n    move $sp, $fp\n    lw $ra, 0($sp)\n    lw $fp, 4($sp)\n    addi $sp, $sp, 8\n    li $v0, 10\n    syscall\n"
        ));
        assert!(!asm.contains("jr $ra"));
    }

    #[test]
    fn test_non_main_function_returns_via_jr() {
        let asm = compile("func f(): int { return 1; } func main(): int { return f(); }");
        assert!(asm.contains("\n# Function f\nf:\n"));
        assert!(asm.contains("f_end_0:\n"));
        let f_end = offset_of(&asm, "f_end_0:");
        let jr = offset_of(&asm, "jr $ra");
        assert!(jr > f_end);
    }

    #[test]
    fn test_calling_convention() {
        let asm = compile(
            "func add(a: int, b: int): int { return a + b; } \
             func main(): int { return add(3, 4); }",
        );
        // Caller: push 3 then 4, call, pop 8 bytes, take $v0.
        let jal = offset_of(&asm, "jal add");
        let three = offset_of(&asm, "li $t0, 3");
        let four = offset_of(&asm, "li $t0, 4");
        assert!(three < four && four < jal);
        let after_call = &asm[jal..];
        assert!(after_call.contains("addi $sp, $sp, 8\n    move $t0, $v0"));
        // Callee: a at $fp+12, b at $fp+8, result through $v0 and the
        // end label.
        assert!(asm.contains("lw $t0, 12($fp)"));
        assert!(asm.contains("lw $t0, 8($fp)"));
        assert!(asm.contains("move $v0, $t0\n    j add_end_0"));
    }

    #[test]
    fn test_zero_argument_call_pops_nothing() {
        let asm = compile("func f(): int { return 1; } func main(): int { return f(); }");
        let jal = offset_of(&asm, "jal f");
        let after_call = &asm[jal..];
        assert!(after_call.starts_with("jal f\n    move $t0, $v0"));
    }

    #[test]
    fn test_division_guards_against_zero() {
        let asm = compile("func main(): int { return 6 / 2; }");
        assert!(asm.contains("beq $t0, $zero, div_by_zero\n    div $t1, $t0\n    mflo $t0"));
        assert!(asm.contains("\ndiv_by_zero:\n    la $a0, div_zero_msg"));
    }

    #[test]
    fn test_missing_main_stub() {
        let asm = compile("func f(): int { return 1; }");
        assert!(asm.contains(".globl main\nmain:\n"));
        assert!(asm.contains("la $a0, missing_main_msg"));
        // The handler is present regardless.
        assert!(asm.contains("\ndiv_by_zero:\n"));
    }

    #[test]
    fn test_locals_allocate_in_declaration_order() {
        let asm = compile("func main(): int { var a: int = 1; var b: int = 2; return a; }");
        assert!(asm.contains("li $t0, 1\n    addi $sp, $sp, -4\n    sw $t0, -4($fp)"));
        assert!(asm.contains("li $t0, 2\n    addi $sp, $sp, -4\n    sw $t0, -8($fp)"));
        assert!(asm.contains("lw $t0, -4($fp)"));
    }

    #[test]
    fn test_inner_block_shadows_outer_local() {
        let asm = compile(
            "func main(): int { var x: int = 1; { var x: int = 2; print x; } print x; \
             return 0; }",
        );
        let inner = offset_of(&asm, "lw $t0, -8($fp)");
        let outer = offset_of(&asm, "lw $t0, -4($fp)");
        assert!(inner < outer);
    }

    #[test]
    fn test_assignment_stores_to_resolved_slot() {
        let asm = compile("func main(): int { var a: int = 1; a = 5; return a; }");
        assert!(asm.contains("li $t0, 5\n    sw $t0, -4($fp)"));
    }

    #[test]
    fn test_print_sequence() {
        let asm = compile("func main(): int { print 7; return 0; }");
        assert!(asm.contains(
            "li $t0, 7\n    move $a0, $t0\n    li $v0, 1\n    syscall\n    la $a0, newline_str\n    li $v0, 4\n    syscall"
        ));
    }

    #[test]
    fn test_if_else_branch_labels() {
        let asm = compile(
            "func main(): int { if (true) { print 1; } else { print 2; } return 0; }",
        );
        // main_end_0 is allocated first, then the branch pair.
        assert!(asm.contains("beq $t0, $zero, if_else_1"));
        assert!(asm.contains("j if_end_2"));
        assert!(asm.contains("if_else_1:\n"));
        assert!(asm.contains("if_end_2:\n"));
    }

    #[test]
    fn test_if_without_else_still_consumes_both_labels() {
        let asm = compile(
            "func main(): int { if (true) { print 1; } if (false) { print 2; } return 0; }",
        );
        // The else label of each pair is allocated but never emitted.
        assert!(asm.contains("beq $t0, $zero, if_end_2"));
        assert!(asm.contains("beq $t0, $zero, if_end_4"));
        assert!(!asm.contains("if_else_1:"));
        assert!(!asm.contains("if_else_3:"));
    }

    #[test]
    fn test_while_loop_shape() {
        let asm = compile("func main(): int { var n: int = 3; while (n > 0) { n = n - 1; } \
                           return n; }");
        assert!(asm.contains("while_start_1:\n"));
        assert!(asm.contains("beq $t0, $zero, while_end_2"));
        assert!(asm.contains("j while_start_1"));
        let start = offset_of(&asm, "while_start_1:");
        let end = offset_of(&asm, "while_end_2:");
        assert!(start < end);
    }

    #[test]
    fn test_float_literal_truncates_to_int_bits() {
        let asm = compile("func main(): int { var x: float = 3.9; print x; return 0; }");
        assert!(asm.contains("li $t0, 3\n    addi $sp, $sp, -4"));
    }

    #[test]
    fn test_bool_literals_and_negation() {
        let asm = compile(
            "func main(): int { var b: bool = true; print -1; return 0; }",
        );
        assert!(asm.contains("li $t0, 1\n    addi $sp, $sp, -4\n    sw $t0, -4($fp)"));
        assert!(asm.contains("li $t0, 1\n    subu $t0, $zero, $t0"));
    }

    #[test]
    fn test_comparison_operators() {
        let asm = compile(
            "func main(): int { if (1 < 2) { print 1; } if (1 >= 2) { print 2; } \
             if (1 == 2) { print 3; } if (1 != 2) { print 4; } return 0; }",
        );
        assert!(asm.contains("slt $t0, $t1, $t0"));
        assert!(asm.contains("sge $t0, $t1, $t0"));
        assert!(asm.contains("seq $t0, $t1, $t0"));
        assert!(asm.contains("sne $t0, $t1, $t0"));
    }

    #[test]
    fn test_operand_stack_balances() {
        let asm = compile("func main(): int { return 1 + 2; }");
        let pushes = asm.matches("addi $sp, $sp, -4").count();
        let pops = asm.matches("addi $sp, $sp, 4\n").count();
        assert_eq!(pushes, 1);
        assert_eq!(pops, 1);
    }

    #[test]
    fn test_labels_are_unique() {
        let asm = compile(
            "func f(n: int): int { if (n > 0) { return 1; } else { return 2; } } \
             func g(n: int): int { while (n > 0) { n = n - 1; } if (n == 0) { return 0; } \
             return n; } \
             func main(): int { print f(1); print g(2); return 0; }",
        );
        let mut labels: Vec<&str> = asm
            .lines()
            .filter(|l| l.ends_with(':') && !l.starts_with(' '))
            .collect();
        let total = labels.len();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), total, "duplicate label in emitted assembly");
    }

    #[test]
    fn test_every_function_restores_the_stack() {
        let asm = compile(
            "func f(): int { var a: int = 1; return a; } \
             func main(): int { var b: int = 2; return f(); }",
        );
        assert_eq!(asm.matches("move $sp, $fp").count(), 2);
        assert_eq!(asm.matches("addi $sp, $sp, 8\n").count(), 2);
    }
}
