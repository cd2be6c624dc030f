//! AST node definitions and the debug dump.

/// A statement-level node.
#[derive(Clone, Debug, PartialEq)]
pub enum Statement {
    /// A braced sequence of statements.
    Scope(Vec<Statement>),
    /// `while (condition) body`
    While {
        condition: Expression,
        body: Box<Statement>,
    },
    /// `return;` or `return expression;`
    Return(Option<Expression>),
    /// An expression evaluated for its effect.
    Expression(Expression),
    /// `type name(parameters) body`
    FunctionDeclaration {
        name: String,
        parameters: Vec<Parameter>,
        body: Box<Statement>,
    },
}

/// One formal parameter of a function declaration.
#[derive(Clone, Debug, PartialEq)]
pub struct Parameter {
    pub type_name: String,
    pub name: String,
}

/// An expression-level node.
#[derive(Clone, Debug, PartialEq)]
pub enum Expression {
    Literal(Literal),
    Identifier(String),
    Unary {
        operation: UnaryOperation,
        operand: Box<Expression>,
    },
    Binary {
        operation: BinaryOperation,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    /// `target = value`; the target may itself be a declaration
    /// (`int x = ...`).
    Assignment {
        target: Box<Expression>,
        value: Box<Expression>,
    },
    Call {
        callee: String,
        arguments: Vec<Expression>,
    },
    VariableDeclaration {
        type_name: String,
        name: String,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum UnaryOperation {
    Negative,
    Positive,
    PreIncrement,
    PostIncrement,
    PreDecrement,
    PostDecrement,
    LogicalNot,
    BitwiseNot,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BinaryOperation {
    Add,
    Subtract,
    Multiply,
    Divide,
    LogicalAnd,
    LogicalOr,
    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,
    LeftShift,
    RightShift,
    CompareLess,
    CompareLessOrEqual,
    CompareGreater,
    CompareGreaterOrEqual,
}

/// A literal value as written in source.
#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    UnsignedInteger(u64),
    SignedInteger(i64),
    FloatingPoint(f64),
    Character(char),
    String(String),
}

impl UnaryOperation {
    pub fn name(self) -> &'static str {
        match self {
            UnaryOperation::Negative => "Negative",
            UnaryOperation::Positive => "Positive",
            UnaryOperation::PreIncrement => "PreIncrement",
            UnaryOperation::PostIncrement => "PostIncrement",
            UnaryOperation::PreDecrement => "PreDecrement",
            UnaryOperation::PostDecrement => "PostDecrement",
            UnaryOperation::LogicalNot => "LogicalNot",
            UnaryOperation::BitwiseNot => "BitwiseNot",
        }
    }
}

impl BinaryOperation {
    pub fn name(self) -> &'static str {
        match self {
            BinaryOperation::Add => "Add",
            BinaryOperation::Subtract => "Subtract",
            BinaryOperation::Multiply => "Multiply",
            BinaryOperation::Divide => "Divide",
            BinaryOperation::LogicalAnd => "LogicalAnd",
            BinaryOperation::LogicalOr => "LogicalOr",
            BinaryOperation::BitwiseAnd => "BitwiseAnd",
            BinaryOperation::BitwiseOr => "BitwiseOr",
            BinaryOperation::BitwiseXor => "BitwiseXor",
            BinaryOperation::LeftShift => "LeftShift",
            BinaryOperation::RightShift => "RightShift",
            BinaryOperation::CompareLess => "CompareLess",
            BinaryOperation::CompareLessOrEqual => "CompareLessOrEqual",
            BinaryOperation::CompareGreater => "CompareGreater",
            BinaryOperation::CompareGreaterOrEqual => "CompareGreaterOrEqual",
        }
    }
}

impl Literal {
    pub fn type_name(&self) -> &'static str {
        match self {
            Literal::UnsignedInteger(_) => "UnsignedInteger",
            Literal::SignedInteger(_) => "SignedInteger",
            Literal::FloatingPoint(_) => "FloatingPoint",
            Literal::Character(_) => "Character",
            Literal::String(_) => "String",
        }
    }
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

impl Statement {
    /// Returns the node kind name used by the dump.
    ///
    /// An expression statement reports its concrete expression kind.
    pub fn class_name(&self) -> &'static str {
        match self {
            Statement::Scope(_) => "Scope",
            Statement::While { .. } => "While",
            Statement::Return(_) => "Return",
            Statement::Expression(expression) => expression.class_name(),
            Statement::FunctionDeclaration { .. } => "FunctionDeclaration",
        }
    }

    /// Renders the subtree as indented text, one node per line.
    pub fn dump_as_string(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("({})\n", self.class_name()));
        self.dump_fields(&mut out, 1);
        out
    }

    fn dump_fields(&self, out: &mut String, depth: usize) {
        match self {
            Statement::Scope(children) => {
                for (index, child) in children.iter().enumerate() {
                    indent(out, depth);
                    out.push_str(&format!("({}) [{}]\n", child.class_name(), index));
                    child.dump_fields(out, depth + 1);
                }
            }
            Statement::While { condition, body } => {
                indent(out, depth);
                out.push_str(&format!("Condition: ({})\n", condition.class_name()));
                condition.dump_fields(out, depth + 1);
                indent(out, depth);
                out.push_str(&format!("Body: ({})\n", body.class_name()));
                body.dump_fields(out, depth + 1);
            }
            Statement::Return(value) => {
                if let Some(value) = value {
                    indent(out, depth);
                    out.push_str(&format!("Value: ({})\n", value.class_name()));
                    value.dump_fields(out, depth + 1);
                }
            }
            Statement::Expression(expression) => expression.dump_fields(out, depth),
            Statement::FunctionDeclaration {
                name,
                parameters,
                body,
            } => {
                indent(out, depth);
                out.push_str(&format!("Name: {name}\n"));
                for parameter in parameters {
                    indent(out, depth);
                    out.push_str(&format!(
                        "Parameter: {} {}\n",
                        parameter.type_name, parameter.name
                    ));
                }
                indent(out, depth);
                out.push_str(&format!("Body: ({})\n", body.class_name()));
                body.dump_fields(out, depth + 1);
            }
        }
    }
}

impl Expression {
    /// Returns the node kind name used by the dump.
    pub fn class_name(&self) -> &'static str {
        match self {
            Expression::Literal(_) => "Literal",
            Expression::Identifier(_) => "Identifier",
            Expression::Unary { .. } => "Unary",
            Expression::Binary { .. } => "Binary",
            Expression::Assignment { .. } => "Assignment",
            Expression::Call { .. } => "Call",
            Expression::VariableDeclaration { .. } => "VariableDeclaration",
        }
    }

    /// Renders the subtree as indented text, one node per line.
    pub fn dump_as_string(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("({})\n", self.class_name()));
        self.dump_fields(&mut out, 1);
        out
    }

    fn dump_fields(&self, out: &mut String, depth: usize) {
        match self {
            Expression::Literal(literal) => {
                indent(out, depth);
                out.push_str(&format!("Type: {}\n", literal.type_name()));
                indent(out, depth);
                match literal {
                    Literal::UnsignedInteger(value) => out.push_str(&format!("Value: {value}\n")),
                    Literal::SignedInteger(value) => out.push_str(&format!("Value: {value}\n")),
                    Literal::FloatingPoint(value) => out.push_str(&format!("Value: {value}\n")),
                    Literal::Character(value) => out.push_str(&format!("Value: '{value}'\n")),
                    Literal::String(value) => out.push_str(&format!("Value: \"{value}\"\n")),
                }
            }
            Expression::Identifier(name) => {
                indent(out, depth);
                out.push_str(&format!("Name: {name}\n"));
            }
            Expression::Unary { operation, operand } => {
                indent(out, depth);
                out.push_str(&format!("Operation: {}\n", operation.name()));
                indent(out, depth);
                out.push_str(&format!("Operand: ({})\n", operand.class_name()));
                operand.dump_fields(out, depth + 1);
            }
            Expression::Binary {
                operation,
                left,
                right,
            } => {
                indent(out, depth);
                out.push_str(&format!("Operation: {}\n", operation.name()));
                indent(out, depth);
                out.push_str(&format!("Left operand: ({})\n", left.class_name()));
                left.dump_fields(out, depth + 1);
                indent(out, depth);
                out.push_str(&format!("Right operand: ({})\n", right.class_name()));
                right.dump_fields(out, depth + 1);
            }
            Expression::Assignment { target, value } => {
                indent(out, depth);
                out.push_str(&format!("Target: ({})\n", target.class_name()));
                target.dump_fields(out, depth + 1);
                indent(out, depth);
                out.push_str(&format!("Value: ({})\n", value.class_name()));
                value.dump_fields(out, depth + 1);
            }
            Expression::Call { callee, arguments } => {
                indent(out, depth);
                out.push_str(&format!("Callee: {callee}\n"));
                for (index, argument) in arguments.iter().enumerate() {
                    indent(out, depth);
                    out.push_str(&format!("Argument: ({}) [{}]\n", argument.class_name(), index));
                    argument.dump_fields(out, depth + 1);
                }
            }
            Expression::VariableDeclaration { type_name, name } => {
                indent(out, depth);
                out.push_str(&format!("Type: {type_name}\n"));
                indent(out, depth);
                out.push_str(&format!("Name: {name}\n"));
            }
        }
    }
}
