use crate::core::error::{EstimatorError, Result};

const STACK_SIZE: usize = 32;

/// Compact bytecode instruction
#[derive(Debug, Clone, Copy, PartialEq)]
enum OpCode {
    LoadVar(u16),
    LoadConst(u16),
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Neg,
    Call(Function),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Function {
    Log2,
    Sqrt,
    Floor,
    Ceil,
}

impl Function {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "log2" => Some(Self::Log2),
            "sqrt" => Some(Self::Sqrt),
            "floor" => Some(Self::Floor),
            "ceil" => Some(Self::Ceil),
            _ => None,
        }
    }

    fn apply(self, x: f64) -> f64 {
        match self {
            Self::Log2 => x.log2(),
            Self::Sqrt => x.sqrt(),
            Self::Floor => x.floor(),
            Self::Ceil => x.ceil(),
        }
    }
}

/// Arithmetic expression over named variables, compiled to a small stack program.
///
/// Used for range constraints (`l <= n - k - w + 2*p`) and user supplied memory access
/// formulas (`m/2`).
#[derive(Clone, Debug)]
pub struct CompiledExpression {
    source: String,
    variables: Vec<String>,
    instructions: Vec<OpCode>,
    constants: Vec<f64>,
}

impl CompiledExpression {
    pub fn new(expr: &str, variables: &[String]) -> Result<Self> {
        Compiler::new(variables)
            .compile(expr)
            .map_err(|e| EstimatorError::Expression(format!("'{}': {}", expr, e)))
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Evaluate with one value per declared variable, in declaration order.
    #[inline]
    pub fn evaluate(&self, values: &[f64]) -> std::result::Result<f64, &'static str> {
        if values.len() != self.variables.len() {
            return Err("Variable count mismatch");
        }

        let mut stack = [0.0f64; STACK_SIZE];
        let mut sp = 0usize;

        for &inst in &self.instructions {
            match inst {
                OpCode::LoadVar(idx) => {
                    stack[sp] = values[idx as usize];
                    sp += 1;
                }
                OpCode::LoadConst(idx) => {
                    stack[sp] = self.constants[idx as usize];
                    sp += 1;
                }
                OpCode::Add | OpCode::Sub | OpCode::Mul | OpCode::Div | OpCode::Pow => {
                    sp -= 1;
                    let (lhs, rhs) = (stack[sp - 1], stack[sp]);
                    stack[sp - 1] = match inst {
                        OpCode::Add => lhs + rhs,
                        OpCode::Sub => lhs - rhs,
                        OpCode::Mul => lhs * rhs,
                        OpCode::Div if rhs == 0.0 => return Err("Division by zero"),
                        OpCode::Div => lhs / rhs,
                        _ => lhs.powf(rhs),
                    };
                }
                OpCode::Neg => stack[sp - 1] = -stack[sp - 1],
                OpCode::Call(f) => stack[sp - 1] = f.apply(stack[sp - 1]),
            }
        }

        if sp != 1 {
            return Err("Invalid expression");
        }

        Ok(stack[0])
    }

    /// Evaluate with values looked up by name.
    pub fn evaluate_with<F>(&self, lookup: F) -> Result<f64>
    where
        F: Fn(&str) -> Option<f64>,
    {
        let values = self
            .variables
            .iter()
            .map(|name| {
                lookup(name).ok_or_else(|| {
                    EstimatorError::Expression(format!(
                        "'{}': no value for '{}'",
                        self.source, name
                    ))
                })
            })
            .collect::<Result<Vec<f64>>>()?;

        self.evaluate(&values)
            .map_err(|e| EstimatorError::Expression(format!("'{}': {}", self.source, e)))
    }

    /// Variables the expression actually reads.
    pub fn referenced_variables(&self) -> Vec<&str> {
        let mut used: Vec<&str> = Vec::new();
        for inst in &self.instructions {
            if let OpCode::LoadVar(idx) = inst {
                let name = self.variables[*idx as usize].as_str();
                if !used.contains(&name) {
                    used.push(name);
                }
            }
        }
        used
    }
}

/// Binary operator precedence, loosest first.
#[derive(Clone, Copy, Debug)]
enum Level {
    Sum,
    Product,
    Power,
}

impl Level {
    fn operators(self) -> &'static [char] {
        match self {
            Self::Sum => &['+', '-'],
            Self::Product => &['*', '/'],
            Self::Power => &['^'],
        }
    }

    fn tighter(self) -> Option<Level> {
        match self {
            Self::Sum => Some(Self::Product),
            Self::Product => Some(Self::Power),
            Self::Power => None,
        }
    }

    fn opcode(op: u8) -> OpCode {
        match op {
            b'+' => OpCode::Add,
            b'-' => OpCode::Sub,
            b'*' => OpCode::Mul,
            b'/' => OpCode::Div,
            _ => OpCode::Pow,
        }
    }
}

struct Compiler<'a> {
    variables: &'a [String],
    instructions: Vec<OpCode>,
    constants: Vec<f64>,
}

impl<'a> Compiler<'a> {
    fn new(variables: &'a [String]) -> Self {
        Self {
            variables,
            instructions: Vec::with_capacity(32),
            constants: Vec::with_capacity(8),
        }
    }

    fn compile(mut self, expr: &str) -> std::result::Result<CompiledExpression, String> {
        let cleaned: String = expr.chars().filter(|c| !c.is_whitespace()).collect();

        if cleaned.is_empty() {
            return Err("Expression cannot be empty".into());
        }
        if !is_balanced(&cleaned) {
            return Err("Unbalanced parentheses".into());
        }

        self.parse_level(&cleaned, Level::Sum)?;

        if max_stack_depth(&self.instructions) > STACK_SIZE {
            return Err("Expression too deeply nested".into());
        }

        Ok(CompiledExpression {
            source: expr.to_string(),
            variables: self.variables.to_vec(),
            instructions: self.instructions,
            constants: self.constants,
        })
    }

    fn add_const(&mut self, val: f64) -> u16 {
        if let Some(idx) = self.constants.iter().position(|&v| v == val) {
            return idx as u16;
        }
        let idx = self.constants.len();
        self.constants.push(val);
        idx as u16
    }

    fn parse_level(&mut self, s: &str, level: Level) -> std::result::Result<(), String> {
        let Some(pos) = find_op(s, level.operators()) else {
            return match level.tighter() {
                Some(next) => self.parse_level(s, next),
                None => self.parse_atom(s),
            };
        };
        match level.tighter() {
            Some(next) => {
                self.parse_level(&s[..pos], level)?;
                self.parse_level(&s[pos + 1..], next)?;
            }
            // `^` only joins atoms: `a^b^c` is rejected instead of guessing associativity.
            None => {
                self.parse_atom(&s[..pos])?;
                self.parse_atom(&s[pos + 1..])?;
            }
        }
        self.instructions.push(Level::opcode(s.as_bytes()[pos]));
        Ok(())
    }

    fn parse_atom(&mut self, s: &str) -> std::result::Result<(), String> {
        if s.is_empty() {
            return Err("Empty sub-expression".into());
        }

        if let Some(rest) = s.strip_prefix('-') {
            self.parse_level(rest, Level::Power)?;
            self.instructions.push(OpCode::Neg);
            return Ok(());
        }

        if s.starts_with('(') && s.ends_with(')') && is_balanced(&s[1..s.len() - 1]) {
            return self.parse_level(&s[1..s.len() - 1], Level::Sum);
        }

        // Function call: name(...)
        if let Some(open) = s.find('(') {
            if !s.ends_with(')') {
                return Err(format!("Unmatched parentheses in '{}'", s));
            }
            let name = &s[..open];
            let function =
                Function::parse(name).ok_or_else(|| format!("Unknown function '{}'", name))?;
            self.parse_level(&s[open + 1..s.len() - 1], Level::Sum)?;
            self.instructions.push(OpCode::Call(function));
            return Ok(());
        }

        if !s
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '.')
        {
            return Err(format!("Invalid characters in '{}'", s));
        }

        if let Ok(num) = s.parse::<f64>() {
            if !num.is_finite() {
                return Err(format!("Number '{}' is not finite", s));
            }
            let idx = self.add_const(num);
            self.instructions.push(OpCode::LoadConst(idx));
            return Ok(());
        }

        if let Some(idx) = self.variables.iter().position(|p| p == s) {
            self.instructions.push(OpCode::LoadVar(idx as u16));
            return Ok(());
        }

        Err(format!(
            "Unknown identifier '{}'. Available variables: [{}]",
            s,
            self.variables.join(", ")
        ))
    }
}

/// Position of the right-most top-level binary operator from `ops`.
///
/// A `+`/`-` at the start or right after another operator is unary and skipped.
#[inline]
fn find_op(s: &str, ops: &[char]) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut depth = 0;

    for i in (0..bytes.len()).rev() {
        match bytes[i] {
            b')' => depth += 1,
            b'(' => depth -= 1,
            c if depth == 0 && ops.contains(&(c as char)) => {
                let unary = (c == b'-' || c == b'+')
                    && (i == 0 || matches!(bytes[i - 1], b'+' | b'-' | b'*' | b'/' | b'^' | b'('));
                if !unary {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

#[inline]
fn is_balanced(s: &str) -> bool {
    let mut depth = 0;
    for c in s.chars() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0
}

fn max_stack_depth(instructions: &[OpCode]) -> usize {
    let mut depth = 0usize;
    let mut max = 0usize;
    for inst in instructions {
        match inst {
            OpCode::LoadVar(_) | OpCode::LoadConst(_) => depth += 1,
            OpCode::Add | OpCode::Sub | OpCode::Mul | OpCode::Div | OpCode::Pow => {
                depth = depth.saturating_sub(1)
            }
            OpCode::Neg | OpCode::Call(_) => {}
        }
        max = max.max(depth);
    }
    max
}
