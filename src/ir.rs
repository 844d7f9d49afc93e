use crate::ast::{BinOp, Expr, Program, Stmt, UnaryOp};

/// One three-address instruction. Operands are textual: variable names,
/// literal spellings, or generated temp names.
#[derive(Debug, Clone, PartialEq)]
pub enum Instr {
    ProcEnter(String),
    ProcExit,
    Assign { dst: String, src: String },
    Binary { dst: String, op: BinOp, lhs: String, rhs: String },
    Unary { dst: String, op: UnaryOp, operand: String },
    Jump(String),
    JumpIfFalse { cond: String, label: String },
    JumpIfTrue { cond: String, label: String },
    Label(String),
    Return(String),
}

impl std::fmt::Display for Instr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Instr::ProcEnter(name) => write!(f, "PROC {}:", name),
            Instr::ProcExit => write!(f, "ENDP"),
            Instr::Assign { dst, src } => write!(f, "{} = {}", dst, src),
            Instr::Binary { dst, op, lhs, rhs } => write!(f, "{} = {} {} {}", dst, lhs, op, rhs),
            Instr::Unary { dst, op, operand } => write!(f, "{} = {}{}", dst, op, operand),
            Instr::Jump(label) => write!(f, "GOTO {}", label),
            Instr::JumpIfFalse { cond, label } => write!(f, "IF_FALSE {} GOTO {}", cond, label),
            Instr::JumpIfTrue { cond, label } => write!(f, "IF {} GOTO {}", cond, label),
            Instr::Label(label) => write!(f, "{}:", label),
            Instr::Return(value) => write!(f, "RETURN {}", value),
        }
    }
}

/// Lowers an AST into a flat instruction list. Temps (`t0`, `t1`, ...) and
/// labels (`L0`, `L1`, ...) are numbered from zero for every `generate`
/// call, so repeated runs over the same program are identical.
pub struct IrGenerator {
    temp_count: usize,
    label_count: usize,
    code: Vec<Instr>,
}

impl IrGenerator {
    pub fn new() -> Self {
        IrGenerator {
            temp_count: 0,
            label_count: 0,
            code: Vec::new(),
        }
    }

    fn new_temp(&mut self) -> String {
        let temp = format!("t{}", self.temp_count);
        self.temp_count += 1;
        temp
    }

    fn new_label(&mut self) -> String {
        let label = format!("L{}", self.label_count);
        self.label_count += 1;
        label
    }

    /// One fresh generation run; counters and the buffer are reset first.
    pub fn generate(&mut self, program: &Program) -> Vec<Instr> {
        self.temp_count = 0;
        self.label_count = 0;
        self.code.clear();
        for function in &program.functions {
            self.code.push(Instr::ProcEnter(function.name.clone()));
            for stmt in &function.body {
                self.gen_stmt(stmt);
            }
            self.code.push(Instr::ProcExit);
        }
        std::mem::take(&mut self.code)
    }

    fn gen_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            // A declaration only emits code when it carries an initializer;
            // a bare `int x;` is a no-op at this level.
            Stmt::Declaration { name, init, .. } => {
                if let Some(expr) = init {
                    let src = self.gen_expr(expr);
                    self.code.push(Instr::Assign {
                        dst: name.clone(),
                        src,
                    });
                }
            }
            Stmt::Assign(target, expr) => {
                let src = self.gen_expr(expr);
                self.code.push(Instr::Assign {
                    dst: target.clone(),
                    src,
                });
            }
            Stmt::If {
                cond,
                then_body,
                else_body,
            } => {
                let cond_temp = self.gen_expr(cond);
                let label_else = self.new_label();
                let label_end = self.new_label();
                self.code.push(Instr::JumpIfFalse {
                    cond: cond_temp,
                    label: label_else.clone(),
                });
                for stmt in then_body {
                    self.gen_stmt(stmt);
                }
                self.code.push(Instr::Jump(label_end.clone()));
                self.code.push(Instr::Label(label_else));
                for stmt in else_body {
                    self.gen_stmt(stmt);
                }
                self.code.push(Instr::Label(label_end));
            }
            Stmt::While { cond, body } => {
                let label_start = self.new_label();
                let label_end = self.new_label();
                self.code.push(Instr::Label(label_start.clone()));
                let cond_temp = self.gen_expr(cond);
                self.code.push(Instr::JumpIfFalse {
                    cond: cond_temp,
                    label: label_end.clone(),
                });
                for stmt in body {
                    self.gen_stmt(stmt);
                }
                self.code.push(Instr::Jump(label_start));
                self.code.push(Instr::Label(label_end));
            }
            Stmt::DoWhile { body, cond } => {
                let label_start = self.new_label();
                self.code.push(Instr::Label(label_start.clone()));
                for stmt in body {
                    self.gen_stmt(stmt);
                }
                let cond_temp = self.gen_expr(cond);
                self.code.push(Instr::JumpIfTrue {
                    cond: cond_temp,
                    label: label_start,
                });
            }
            Stmt::For {
                init,
                cond,
                step,
                body,
            } => {
                if let Some(init) = init {
                    self.gen_stmt(init);
                }
                let label_start = self.new_label();
                let label_end = self.new_label();
                self.code.push(Instr::Label(label_start.clone()));
                // No condition means no exit test: the loop only ends via
                // code outside this construct.
                if let Some(cond) = cond {
                    let cond_temp = self.gen_expr(cond);
                    self.code.push(Instr::JumpIfFalse {
                        cond: cond_temp,
                        label: label_end.clone(),
                    });
                }
                for stmt in body {
                    self.gen_stmt(stmt);
                }
                if let Some(step) = step {
                    self.gen_stmt(step);
                }
                self.code.push(Instr::Jump(label_start));
                self.code.push(Instr::Label(label_end));
            }
            Stmt::Return(expr) => {
                let value = self.gen_expr(expr);
                self.code.push(Instr::Return(value));
            }
        }
    }

    /// Lowers an expression and returns the operand holding its value.
    /// Leaves emit nothing; each operator node emits exactly one
    /// instruction into a fresh temp, operands lowered left before right.
    fn gen_expr(&mut self, expr: &Expr) -> String {
        match expr {
            Expr::IntLit(value) => value.to_string(),
            Expr::BoolLit(value) => value.to_string(),
            Expr::Var(name) => name.clone(),
            Expr::BinOp(left, op, right) => {
                let lhs = self.gen_expr(left);
                let rhs = self.gen_expr(right);
                let dst = self.new_temp();
                self.code.push(Instr::Binary {
                    dst: dst.clone(),
                    op: *op,
                    lhs,
                    rhs,
                });
                dst
            }
            Expr::UnaryOp(op, operand) => {
                let operand = self.gen_expr(operand);
                let dst = self.new_temp();
                self.code.push(Instr::Unary {
                    dst: dst.clone(),
                    op: *op,
                    operand,
                });
                dst
            }
        }
    }
}

impl Default for IrGenerator {
    fn default() -> Self {
        Self::new()
    }
}
