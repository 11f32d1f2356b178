use std::collections::HashMap;

use crate::{
    codegen::{IntermediateCodeGenerator, Op, Operand, Quad},
    error::{Error, Result},
    parser::{
        Assignment, BinOpKind, Block, Declaration, Expr, Literal, Program, Stmt, UnaryOpKind,
    },
};

use super::{ArrayType, FunctionType, SymbolInfo, SymbolTable, SymbolType};

/// Result of analysing an expression: where its value lives and its type.
///
/// `operand` is `None` only for calls to functions whose return type is not
/// `int`; those calls capture no result.
#[derive(Clone, Debug, PartialEq)]
pub struct ExprValue {
    pub operand: Option<Operand>,
    pub ty: SymbolInfo,
}

impl ExprValue {
    fn new(operand: Operand, ty: impl Into<SymbolInfo>) -> Self {
        Self {
            operand: Some(operand),
            ty: ty.into(),
        }
    }
}

/// Type-checks a program and lowers it to three-address code in one walk.
///
/// One analyzer serves one compilation unit. On error the walk stops and the
/// instructions emitted so far are left in place; callers should discard them.
#[derive(Debug, Default)]
pub struct SemanticAnalyzer {
    symbol_table: SymbolTable,
    code_gen: IntermediateCodeGenerator,
    functions: HashMap<String, FunctionType>,
}

impl SemanticAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls are only accepted for functions registered beforehand.
    pub fn register_function(&mut self, name: impl Into<String>, ty: FunctionType) {
        let name = name.into();
        tracing::debug!(%name, ty = %SymbolInfo::Function(ty.clone()), "registered function");
        self.functions.insert(name, ty);
    }

    pub fn symbol_table(&self) -> &SymbolTable {
        &self.symbol_table
    }

    pub fn code(&self) -> &[Quad] {
        self.code_gen.code()
    }

    pub fn into_code(self) -> Vec<Quad> {
        self.code_gen.into_code()
    }

    pub fn visit_program(&mut self, program: &Program) -> Result<()> {
        for stmt in program.0.iter() {
            self.visit_stmt(stmt)?;
        }
        tracing::debug!(instructions = self.code().len(), "analyzed program");
        Ok(())
    }

    pub fn visit_stmt(&mut self, stmt: &Stmt) -> Result<()> {
        match stmt {
            Stmt::VarDecl(name, initializer) => self.visit_var_decl(name, initializer),
            Stmt::Declaration(d) => self.visit_declaration(d),
            Stmt::FunctionDecl(name, ty) => {
                self.register_function(name.clone(), ty.clone());
                Ok(())
            }
            Stmt::Assignment(a @ Assignment { index: None, .. }) => self.visit_assignment(a),
            Stmt::Assignment(a) => self.visit_array_store(a),
            Stmt::If(cond, then, else_stmt) => self.visit_if(cond, then, else_stmt.as_deref()),
            Stmt::While(cond, body) => self.visit_while(cond, body),
            Stmt::Block(block) => self.visit_block(block),
            Stmt::Expr(expr) => self.visit_expr(expr).map(|_| ()),
        }
    }

    pub fn visit_expr(&mut self, expr: &Expr) -> Result<ExprValue> {
        match expr {
            Expr::Binary(kind, left, right) => self.visit_binary(*kind, left, right),
            Expr::Unary(kind, operand) => self.visit_unary(*kind, operand),
            Expr::Literal(literal) => visit_literal(literal),
            Expr::Variable(name) => self.visit_variable(name),
            Expr::ArrayAccess(name, index) => self.visit_array_access(name, index),
            Expr::Call(name, args) => self.visit_call(name, args),
        }
    }

    fn visit_declaration(&mut self, declaration: &Declaration) -> Result<()> {
        let Declaration {
            ty,
            name,
            is_const,
            array_size,
        } = declaration;

        let info = match *array_size {
            Some(size) if size <= 0 => {
                return Err(Error::InvalidArraySize {
                    name: name.clone(),
                    size,
                })
            }
            Some(size) => SymbolInfo::Array(ArrayType {
                base: *ty,
                size: size as usize,
            }),
            None => SymbolInfo::Scalar(*ty),
        };

        self.symbol_table.declare(name, info, *is_const)?;

        if let Some(size) = array_size {
            self.code_gen.emit(
                Op::Alloc,
                Some(Operand::name(name)),
                Some(Operand::Int(*size)),
                None,
            );
        }
        Ok(())
    }

    /// `let name = initializer` takes the initializer's type.
    fn visit_var_decl(&mut self, name: &str, initializer: &Expr) -> Result<()> {
        if self.symbol_table.is_declared_in_current_scope(name) {
            return Err(Error::DuplicateDeclaration {
                name: name.to_string(),
            });
        }

        let value = self.visit_expr(initializer)?;
        let Some(ty) = value.ty.as_scalar() else {
            return Err(Error::mismatch(
                format!("initializer of '{}'", name),
                "a scalar value",
                &value.ty,
            ));
        };

        self.symbol_table.declare(name, ty.into(), false)?;
        self.code_gen
            .emit(Op::Assign, value.operand, None, Some(Operand::name(name)));
        Ok(())
    }

    fn visit_assignment(&mut self, assignment: &Assignment) -> Result<()> {
        let name = &assignment.name;
        let symbol = self.symbol_table.resolve(name)?.clone();

        if symbol.is_const {
            return Err(Error::ConstAssignment { name: name.clone() });
        }
        if let SymbolInfo::Array(_) = symbol.ty {
            return Err(Error::ArrayAssignment { name: name.clone() });
        }

        let value = self.visit_expr(&assignment.value)?;
        let target = Some(Operand::name(name));

        if symbol.ty == value.ty {
            self.code_gen.emit(Op::Assign, value.operand, None, target);
        } else if symbol.ty.is_scalar(SymbolType::Float) && value.ty.is_scalar(SymbolType::Int) {
            let temp = self.code_gen.new_temp();
            self.code_gen.emit(
                Op::IntToFloat,
                value.operand,
                None,
                Some(Operand::name(&temp)),
            );
            self.code_gen
                .emit(Op::Assign, Some(Operand::name(temp)), None, target);
        } else {
            return Err(Error::mismatch(
                format!("assignment to '{}'", name),
                &symbol.ty,
                &value.ty,
            ));
        }
        Ok(())
    }

    /// Element stores need the exact base type, there is no int to float promotion here.
    fn visit_array_store(&mut self, assignment: &Assignment) -> Result<()> {
        let Assignment {
            name,
            index: Some(index),
            value,
        } = assignment
        else {
            return self.visit_assignment(assignment);
        };

        let index = self.visit_expr(index)?;
        let base = self.check_array_access(name, &index.ty)?;
        if self.symbol_table.resolve(name)?.is_const {
            return Err(Error::ConstAssignment { name: name.clone() });
        }

        let value = self.visit_expr(value)?;
        if !value.ty.is_scalar(base) {
            return Err(Error::mismatch(
                format!("element assignment to '{}'", name),
                base,
                &value.ty,
            ));
        }

        self.code_gen.emit(
            Op::ArrayStore,
            Some(Operand::name(name)),
            index.operand,
            value.operand,
        );
        Ok(())
    }

    fn visit_if(&mut self, cond: &Expr, then: &Stmt, else_stmt: Option<&Stmt>) -> Result<()> {
        let cond = self.visit_expr(cond)?;
        if !cond.ty.is_scalar(SymbolType::Bool) {
            return Err(Error::mismatch("if condition", SymbolType::Bool, &cond.ty));
        }

        let else_label = self.code_gen.new_label();
        let end_label = self.code_gen.new_label();

        self.code_gen.emit_if_not(cond.operand, &else_label);
        self.visit_stmt(then)?;

        match else_stmt {
            Some(else_stmt) => {
                self.code_gen.emit_goto(&end_label);
                self.code_gen.emit_label(&else_label);
                self.visit_stmt(else_stmt)?;
                self.code_gen.emit_label(&end_label);
            }
            // The else label doubles as the join point.
            None => self.code_gen.emit_label(&else_label),
        }
        Ok(())
    }

    fn visit_while(&mut self, cond: &Expr, body: &Stmt) -> Result<()> {
        let start_label = self.code_gen.new_label();
        let end_label = self.code_gen.new_label();

        self.code_gen.emit_label(&start_label);

        let cond = self.visit_expr(cond)?;
        if !cond.ty.is_scalar(SymbolType::Bool) {
            return Err(Error::mismatch(
                "while condition",
                SymbolType::Bool,
                &cond.ty,
            ));
        }

        self.code_gen.emit_if_not(cond.operand, &end_label);
        self.visit_stmt(body)?;
        self.code_gen.emit_goto(&start_label);
        self.code_gen.emit_label(&end_label);
        Ok(())
    }

    fn visit_block(&mut self, Block(stmts): &Block) -> Result<()> {
        self.symbol_table.push_scope();
        let result = stmts.iter().try_for_each(|stmt| self.visit_stmt(stmt));
        self.symbol_table.pop_scope();
        result
    }

    fn visit_binary(&mut self, kind: BinOpKind, left: &Expr, right: &Expr) -> Result<ExprValue> {
        let left = self.visit_expr(left)?;
        let right = self.visit_expr(right)?;
        let ty = binary_result_type(kind, &left.ty, &right.ty)?;

        let temp = Operand::name(self.code_gen.new_temp());
        self.code_gen.emit(
            Op::Binary(kind),
            left.operand,
            right.operand,
            Some(temp.clone()),
        );
        Ok(ExprValue::new(temp, ty))
    }

    fn visit_unary(&mut self, kind: UnaryOpKind, operand: &Expr) -> Result<ExprValue> {
        let operand = self.visit_expr(operand)?;
        let ty = unary_result_type(kind, &operand.ty)?;

        let temp = Operand::name(self.code_gen.new_temp());
        self.code_gen
            .emit(Op::Unary(kind), operand.operand, None, Some(temp.clone()));
        Ok(ExprValue::new(temp, ty))
    }

    /// Returns the element type of array `name` indexed by a value of `index_ty`.
    fn check_array_access(&self, name: &str, index_ty: &SymbolInfo) -> Result<SymbolType> {
        let SymbolInfo::Array(array) = &self.symbol_table.resolve(name)?.ty else {
            return Err(Error::NotAnArray {
                name: name.to_string(),
            });
        };
        if !index_ty.is_scalar(SymbolType::Int) {
            return Err(Error::mismatch(
                format!("index of array '{}'", name),
                SymbolType::Int,
                index_ty,
            ));
        }
        Ok(array.base)
    }

    fn visit_array_access(&mut self, name: &str, index: &Expr) -> Result<ExprValue> {
        self.symbol_table.resolve(name)?;
        let index = self.visit_expr(index)?;
        let base = self.check_array_access(name, &index.ty)?;

        let temp = Operand::name(self.code_gen.new_temp());
        self.code_gen.emit(
            Op::ArrayLoad,
            Some(Operand::name(name)),
            index.operand,
            Some(temp.clone()),
        );
        Ok(ExprValue::new(temp, base))
    }

    /// Arguments are evaluated before the callee is looked up.
    fn visit_call(&mut self, name: &str, args: &[Expr]) -> Result<ExprValue> {
        let args = args
            .iter()
            .map(|arg| self.visit_expr(arg))
            .collect::<Result<Vec<_>>>()?;

        let Some(func) = self.functions.get(name).cloned() else {
            return Err(Error::UndeclaredFunction {
                name: name.to_string(),
            });
        };

        if args.len() != func.params.len() {
            return Err(Error::ArityMismatch {
                name: name.to_string(),
                expected: func.params.len(),
                found: args.len(),
            });
        }
        for (i, (arg, param)) in args.iter().zip(func.params.iter()).enumerate() {
            if !arg.ty.is_scalar(*param) {
                return Err(Error::mismatch(
                    format!("argument {} of call to '{}'", i + 1, name),
                    param,
                    &arg.ty,
                ));
            }
        }

        let callee = Some(Operand::name(name));
        let operands = Some(Operand::Args(args.into_iter().map(|a| a.operand).collect()));

        // Only int-returning calls capture a result, every other return type
        // is lowered like a void call.
        if func.return_type != SymbolType::Int {
            self.code_gen.emit(Op::Call, callee, operands, None);
            return Ok(ExprValue {
                operand: None,
                ty: func.return_type.into(),
            });
        }

        let temp = Operand::name(self.code_gen.new_temp());
        self.code_gen
            .emit(Op::Call, callee, operands, Some(temp.clone()));
        Ok(ExprValue::new(temp, SymbolType::Int))
    }

    fn visit_variable(&self, name: &str) -> Result<ExprValue> {
        let symbol = self.symbol_table.resolve(name)?;
        Ok(ExprValue::new(Operand::name(name), symbol.ty.clone()))
    }
}

fn visit_literal(literal: &Literal) -> Result<ExprValue> {
    match literal {
        Literal::Int(v) => Ok(ExprValue::new(Operand::Int(*v), SymbolType::Int)),
        Literal::Float(v) => Ok(ExprValue::new(Operand::Float(*v), SymbolType::Float)),
        Literal::Bool(v) => Ok(ExprValue::new(Operand::Bool(*v), SymbolType::Bool)),
        Literal::Text(s) => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(ExprValue::new(Operand::Char(c), SymbolType::Char)),
                _ => Err(Error::InvalidLiteral {
                    value: literal.to_string(),
                }),
            }
        }
    }
}

pub fn binary_result_type(
    kind: BinOpKind,
    left: &SymbolInfo,
    right: &SymbolInfo,
) -> Result<SymbolType> {
    let invalid = || Error::InvalidOperands {
        op: kind.to_string(),
        left: left.to_string(),
        right: right.to_string(),
    };

    if kind.is_arithmetic() {
        if !left.is_numeric() || !right.is_numeric() {
            return Err(invalid());
        }
        if left.is_scalar(SymbolType::Float) || right.is_scalar(SymbolType::Float) {
            return Ok(SymbolType::Float);
        }
        return Ok(SymbolType::Int);
    }

    if kind.is_relational() {
        if left == right || (left.is_numeric() && right.is_numeric()) {
            return Ok(SymbolType::Bool);
        }
        return Err(invalid());
    }

    // && and ||
    if left.is_scalar(SymbolType::Bool) && right.is_scalar(SymbolType::Bool) {
        Ok(SymbolType::Bool)
    } else {
        Err(invalid())
    }
}

pub fn unary_result_type(kind: UnaryOpKind, operand: &SymbolInfo) -> Result<SymbolType> {
    match (kind, operand.as_scalar()) {
        (UnaryOpKind::LogicalNot, Some(SymbolType::Bool)) => Ok(SymbolType::Bool),
        (UnaryOpKind::Neg, Some(ty)) if ty.is_numeric() => Ok(ty),
        _ => Err(Error::InvalidOperand {
            op: kind.to_string(),
            operand: operand.to_string(),
        }),
    }
}
