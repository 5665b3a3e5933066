//! Cross-sheet reference registry.
//!
//! Sheets run in dependency order; each one publishes the codes of its
//! rows that validated, and later sheets check membership against them.
//! A code that failed its own row's validation is never published, so a
//! bad branch code also shows up as missing wherever it is referenced.

use std::collections::{HashMap, HashSet};

/// Main product code discipline declared on the company sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeKind {
    Numeric,
    Alphanumeric,
}

/// Auxiliary product code discipline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuxCodeKind {
    Unused,
    Numeric,
    Alphanumeric,
}

/// Facts extracted from the company sheet that later validators consume.
#[derive(Debug, Clone)]
pub struct CompanyProfile {
    pub name: String,
    pub code_kind: CodeKind,
    pub code_len: usize,
    pub aux_kind: AuxCodeKind,
    pub aux_len: usize,
    pub default_title1: String,
    pub default_title2: String,
}

impl Default for CompanyProfile {
    fn default() -> Self {
        CompanyProfile {
            name: String::new(),
            code_kind: CodeKind::Numeric,
            code_len: 6,
            aux_kind: AuxCodeKind::Unused,
            aux_len: 0,
            default_title1: String::new(),
            default_title2: String::new(),
        }
    }
}

#[derive(Debug, Default)]
pub struct Registry {
    pub company: CompanyProfile,
    branches: Vec<String>,
    branch_set: HashSet<String>,
    reps: HashSet<String>,
    payment_terms: HashSet<String>,
    carriers: HashMap<String, String>,
    families: HashSet<String>,
    styles: HashSet<String>,
}

impl Registry {
    pub fn new() -> Self {
        Registry::default()
    }

    pub fn add_branch(&mut self, code: &str) {
        if self.branch_set.insert(code.to_string()) {
            self.branches.push(code.to_string());
        }
    }

    pub fn has_branch(&self, code: &str) -> bool {
        self.branch_set.contains(code)
    }

    /// The only branch code, when exactly one was published. Drives the
    /// product sheet's branch autofill.
    pub fn single_branch(&self) -> Option<&str> {
        match self.branches.as_slice() {
            [one] => Some(one),
            _ => None,
        }
    }

    pub fn add_rep(&mut self, code: &str) {
        self.reps.insert(code.to_string());
    }

    pub fn has_rep(&self, code: &str) -> bool {
        self.reps.contains(code)
    }

    pub fn add_payment_term(&mut self, code: &str) {
        self.payment_terms.insert(code.to_string());
    }

    pub fn has_payment_term(&self, code: &str) -> bool {
        self.payment_terms.contains(code)
    }

    pub fn add_carrier(&mut self, code: &str, name: &str) {
        self.carriers.insert(code.to_string(), name.to_string());
    }

    pub fn has_carrier(&self, code: &str) -> bool {
        self.carriers.contains_key(code)
    }

    pub fn carrier_name(&self, code: &str) -> Option<&str> {
        self.carriers.get(code).map(String::as_str)
    }

    pub fn add_family(&mut self, code: &str) {
        self.families.insert(code.to_string());
    }

    pub fn has_family(&self, code: &str) -> bool {
        self.families.contains(code)
    }

    pub fn add_style(&mut self, code: &str) {
        self.styles.insert(code.to_string());
    }

    pub fn has_style(&self, code: &str) -> bool {
        self.styles.contains(code)
    }
}
