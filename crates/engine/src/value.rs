//! Cell value resolution.
//!
//! Formula cells arrive with the source text and, when the producing
//! application saved one, a cached result. Resolution prefers the cached
//! result, then falls back to evaluating the formula locally when it fits
//! a restricted arithmetic grammar, and otherwise reports the cell as an
//! uncalculated formula.

use importval_doc::cell::format_number;
use importval_doc::CellValue;

use crate::finding::Finding;

/// Outcome of resolving one cell for rule evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    /// Trimmed text the rules see.
    pub text: String,
    /// True when the text came from a cached result or local evaluation
    /// rather than the literal cell content.
    pub from_formula: bool,
}

/// Resolve a cell value to the text the field rules consume.
pub fn resolve(value: &CellValue) -> Resolved {
    match value {
        CellValue::Formula { source, cached } => {
            if let Some(cached) = cached {
                return Resolved { text: cached.trim().to_string(), from_formula: true };
            }
            let body = source.trim_start_matches('=');
            if let Some(n) = eval_simple(body) {
                return Resolved { text: format_number(n), from_formula: true };
            }
            Resolved { text: String::new(), from_formula: true }
        }
        other => Resolved { text: other.to_text(), from_formula: false },
    }
}

/// Resolve a cell for a named field, attaching the advisory the row will
/// carry when a formula had to be substituted or could not be calculated.
pub fn resolve_field(value: &CellValue, field: &str) -> (String, Option<Finding>) {
    match value {
        CellValue::Formula { source, cached } => {
            if let Some(cached) = cached {
                let text = cached.trim().to_string();
                let note = Finding::warning(format!(
                    "Advertencia: {field} fórmula avaliada para '{text}'"
                ));
                return (text, Some(note));
            }
            let body = source.trim_start_matches('=');
            if let Some(n) = eval_simple(body) {
                let text = format_number(n);
                let note = Finding::warning(format!(
                    "Advertencia: {field} fórmula avaliada para '{text}'"
                ));
                return (text, Some(note));
            }
            let note = Finding::warning(format!(
                "Advertencia: {field} contém fórmula não calculada - abra o arquivo no Excel para recalcular"
            ));
            (String::new(), Some(note))
        }
        other => (other.to_text(), None),
    }
}

/// Evaluate a plain arithmetic expression: numbers (decimal comma or dot),
/// `+ - * /`, unary minus and parentheses. Anything else, including cell
/// references, is rejected.
pub fn eval_simple(expr: &str) -> Option<f64> {
    let src: Vec<char> = expr.trim().chars().collect();
    if src.is_empty() {
        return None;
    }
    let mut p = Parser { src, pos: 0 };
    let v = p.expr()?;
    p.skip_ws();
    if p.pos == p.src.len() && v.is_finite() {
        Some(v)
    } else {
        None
    }
}

struct Parser {
    src: Vec<char>,
    pos: usize,
}

impl Parser {
    fn skip_ws(&mut self) {
        while self.src.get(self.pos).is_some_and(|c| c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.skip_ws();
        self.src.get(self.pos).copied()
    }

    fn expr(&mut self) -> Option<f64> {
        let mut acc = self.term()?;
        while let Some(op) = self.peek() {
            match op {
                '+' => {
                    self.pos += 1;
                    acc += self.term()?;
                }
                '-' => {
                    self.pos += 1;
                    acc -= self.term()?;
                }
                _ => break,
            }
        }
        Some(acc)
    }

    fn term(&mut self) -> Option<f64> {
        let mut acc = self.factor()?;
        while let Some(op) = self.peek() {
            match op {
                '*' => {
                    self.pos += 1;
                    acc *= self.factor()?;
                }
                '/' => {
                    self.pos += 1;
                    acc /= self.factor()?;
                }
                _ => break,
            }
        }
        Some(acc)
    }

    fn factor(&mut self) -> Option<f64> {
        match self.peek()? {
            '-' => {
                self.pos += 1;
                Some(-self.factor()?)
            }
            '(' => {
                self.pos += 1;
                let v = self.expr()?;
                if self.peek()? != ')' {
                    return None;
                }
                self.pos += 1;
                Some(v)
            }
            c if c.is_ascii_digit() => self.number(),
            _ => None,
        }
    }

    fn number(&mut self) -> Option<f64> {
        let start = self.pos;
        let mut buf = String::new();
        while let Some(&c) = self.src.get(self.pos) {
            match c {
                '0'..='9' => buf.push(c),
                // Decimal comma is accepted alongside the dot.
                ',' | '.' => buf.push('.'),
                _ => break,
            }
            self.pos += 1;
        }
        if self.pos == start {
            return None;
        }
        buf.parse().ok()
    }
}
