//! MIPS assembly emission from the typed AST.
//!
//! Every expression leaves its value in `$t0`; binary operators spill
//! the left operand to the stack while the right one is computed. Each
//! function gets a prologue saving `$fp`/`$ra`, an epilogue reached
//! through a per-function end label, and locals carved out of the stack
//! at the textual position of their declaration.

use aspen_syntax::ast::*;

use crate::frame::Frame;

/// Generate a complete MIPS assembly file for `program`.
///
/// The result is a `.data` section holding the fixed runtime strings
/// followed by a `.text` section with one labeled block per function, a
/// `div_by_zero` handler, and a stub `main` when the program declares
/// none.
pub fn generate(program: &Program) -> String {
    Generator::new().run(program)
}

struct Generator {
    data: String,
    text: String,
    label_counter: u32,
    saw_main: bool,
}

impl Generator {
    fn new() -> Self {
        let mut data = String::from(".data\n");
        data.push_str("newline_str:\n    .asciiz \"\\n\"\n");
        data.push_str("div_zero_msg:\n    .asciiz \"Runtime Error: Division by zero\\n\"\n");
        data.push_str("missing_main_msg:\n    .asciiz \"Runtime Error: Missing main function\\n\"\n");
        Self {
            data,
            text: String::from(".text\n"),
            label_counter: 0,
            saw_main: false,
        }
    }

    fn new_label(&mut self, base: &str) -> String {
        let label = format!("{}_{}", base, self.label_counter);
        self.label_counter += 1;
        label
    }

    fn emit(&mut self, instruction: &str) {
        self.text.push_str("    ");
        self.text.push_str(instruction);
        self.text.push('\n');
    }

    fn emit_label(&mut self, label: &str) {
        self.text.push_str(label);
        self.text.push_str(":\n");
    }

    fn emit_raw(&mut self, s: &str) {
        self.text.push_str(s);
    }

    fn run(mut self, program: &Program) -> String {
        // Only functions produce code; top-level var/let declarations
        // get no storage here.
        for decl in &program.decls {
            if let Decl::Func(f) = decl {
                if f.name == "main" {
                    self.saw_main = true;
                }
                self.gen_function(f);
            }
        }

        self.emit_raw("\n# Division-by-zero runtime handler\n");
        self.emit_label("div_by_zero");
        self.emit("la $a0, div_zero_msg");
        self.emit("li $v0, 4");
        self.emit("syscall");
        self.emit("li $v0, 10");
        self.emit("syscall");

        if !self.saw_main {
            self.emit_raw("\n# Stub main for missing main function\n");
            self.emit_raw(".globl main\n");
            self.emit_label("main");
            self.emit("la $a0, missing_main_msg");
            self.emit("li $v0, 4");
            self.emit("syscall");
            self.emit("li $v0, 10");
            self.emit("syscall");
        }

        format!("{}\n{}", self.data, self.text)
    }

    fn gen_function(&mut self, f: &FuncDecl) {
        let mut frame = Frame::new(self.new_label(&format!("{}_end", f.name)));

        let count = f.params.len();
        for (i, p) in f.params.iter().enumerate() {
            frame.bind(&p.name, Frame::param_offset(i, count));
        }

        self.emit_raw(&format!("\n# Function {}\n", f.name));
        if f.name == "main" {
            self.emit_raw(".globl main\n");
        }
        self.emit_label(&f.name);
        self.emit("addi $sp, $sp, -8");
        self.emit("sw $fp, 4($sp)");
        self.emit("sw $ra, 0($sp)");
        self.emit("move $fp, $sp");

        self.gen_block(&mut frame, &f.body);

        self.emit_label(&frame.end_label);
        self.emit("move $sp, $fp");
        self.emit("lw $ra, 0($sp)");
        self.emit("lw $fp, 4($sp)");
        self.emit("addi $sp, $sp, 8");
        if f.name == "main" {
            self.emit("li $v0, 10");
            self.emit("syscall");
        } else {
            self.emit("jr $ra");
        }
    }

    fn gen_block(&mut self, frame: &mut Frame, block: &Block) {
        frame.push_env();

        // Iterate in textual order so a local's stack slot appears at
        // the point of its declaration.
        for item in &block.items {
            match item {
                Item::Decl(Decl::Var { name, init, .. })
                | Item::Decl(Decl::Let { name, init, .. }) => {
                    self.gen_local_decl(frame, name, init);
                }
                // Function declarations cannot be nested in blocks.
                Item::Decl(Decl::Func(_)) => {}
                Item::Stmt(s) => self.gen_stmt(frame, s),
            }
        }

        frame.pop_env();
    }

    fn gen_local_decl(&mut self, frame: &mut Frame, name: &str, init: &Expr) {
        self.gen_expr(frame, init);
        let offset = frame.declare_local(name);
        self.emit("addi $sp, $sp, -4");
        self.emit(&format!("sw $t0, {}($fp)", offset));
    }

    fn gen_stmt(&mut self, frame: &mut Frame, stmt: &Stmt) {
        match stmt {
            Stmt::Assign { name, rhs } => {
                self.gen_expr(frame, rhs);
                match frame.lookup(name) {
                    Some(offset) => self.emit(&format!("sw $t0, {}($fp)", offset)),
                    None => self.emit_raw(&format!(
                        "    # Warning: assignment to unknown variable {}\n",
                        name
                    )),
                }
            }
            Stmt::Print(expr) => {
                self.gen_expr(frame, expr);
                // All values print through the integer syscall.
                self.emit("move $a0, $t0");
                self.emit("li $v0, 1");
                self.emit("syscall");
                self.emit("la $a0, newline_str");
                self.emit("li $v0, 4");
                self.emit("syscall");
            }
            Stmt::Return(expr) => {
                self.gen_expr(frame, expr);
                self.emit("move $v0, $t0");
                self.emit(&format!("j {}", frame.end_label));
            }
            Stmt::If {
                cond,
                then_blk,
                else_blk,
            } => {
                let else_label = self.new_label("if_else");
                let end_label = self.new_label("if_end");

                self.gen_expr(frame, cond);
                if let Some(else_blk) = else_blk {
                    self.emit(&format!("beq $t0, $zero, {}", else_label));
                    self.gen_block(frame, then_blk);
                    self.emit(&format!("j {}", end_label));
                    self.emit_label(&else_label);
                    self.gen_block(frame, else_blk);
                    self.emit_label(&end_label);
                } else {
                    self.emit(&format!("beq $t0, $zero, {}", end_label));
                    self.gen_block(frame, then_blk);
                    self.emit_label(&end_label);
                }
            }
            Stmt::While { cond, body } => {
                let start_label = self.new_label("while_start");
                let end_label = self.new_label("while_end");

                self.emit_label(&start_label);
                self.gen_expr(frame, cond);
                self.emit(&format!("beq $t0, $zero, {}", end_label));
                self.gen_block(frame, body);
                self.emit(&format!("j {}", start_label));
                self.emit_label(&end_label);
            }
            Stmt::Block(block) => self.gen_block(frame, block),
        }
    }

    fn gen_expr(&mut self, frame: &mut Frame, expr: &Expr) {
        match &expr.kind {
            ExprKind::IntLit(v) => self.emit(&format!("li $t0, {}", v)),
            // Floats narrow to their integer bits; full float support
            // would use the $f registers and add.s/sub.s/mul.s/div.s.
            ExprKind::FloatLit(v) => self.emit(&format!("li $t0, {}", *v as i64)),
            ExprKind::BoolLit(b) => self.emit(&format!("li $t0, {}", i64::from(*b))),
            ExprKind::Ident(name) => match frame.lookup(name) {
                Some(offset) => self.emit(&format!("lw $t0, {}($fp)", offset)),
                None => {
                    // Unreachable after semantic analysis.
                    self.emit_raw(&format!("    # Unknown variable {}, default to 0\n", name));
                    self.emit("li $t0, 0");
                }
            },
            ExprKind::Unary {
                op: UnOp::Neg,
                operand,
            } => {
                self.gen_expr(frame, operand);
                self.emit("subu $t0, $zero, $t0");
            }
            ExprKind::Binary { op, lhs, rhs } => {
                self.gen_expr(frame, lhs);
                self.emit("addi $sp, $sp, -4");
                self.emit("sw $t0, 0($sp)");
                self.gen_expr(frame, rhs);
                self.emit("lw $t1, 0($sp)");
                self.emit("addi $sp, $sp, 4");
                match op {
                    BinOp::Add => self.emit("add $t0, $t1, $t0"),
                    BinOp::Sub => self.emit("sub $t0, $t1, $t0"),
                    BinOp::Mul => self.emit("mul $t0, $t1, $t0"),
                    BinOp::Div => {
                        // Right operand (the divisor) is in $t0.
                        self.emit("beq $t0, $zero, div_by_zero");
                        self.emit("div $t1, $t0");
                        self.emit("mflo $t0");
                    }
                    BinOp::Eq => self.emit("seq $t0, $t1, $t0"),
                    BinOp::Neq => self.emit("sne $t0, $t1, $t0"),
                    BinOp::Lt => self.emit("slt $t0, $t1, $t0"),
                    BinOp::Gt => self.emit("sgt $t0, $t1, $t0"),
                    BinOp::Le => self.emit("sle $t0, $t1, $t0"),
                    BinOp::Ge => self.emit("sge $t0, $t1, $t0"),
                }
            }
            ExprKind::Call { callee, args } => {
                // Arguments go on the stack left to right.
                for arg in args {
                    self.gen_expr(frame, arg);
                    self.emit("addi $sp, $sp, -4");
                    self.emit("sw $t0, 0($sp)");
                }
                self.emit(&format!("jal {}", callee));
                if !args.is_empty() {
                    self.emit(&format!("addi $sp, $sp, {}", 4 * args.len()));
                }
                self.emit("move $t0, $v0");
            }
        }
    }
}
