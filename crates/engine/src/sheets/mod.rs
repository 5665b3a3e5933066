//! Per-sheet validators, one module per staging sheet. They run in
//! dependency order: the company profile first, then the registries
//! (branches, representatives, payment terms, carriers), then the sheets
//! that reference them, with products last.

pub mod branches;
pub mod carriers;
pub mod company;
pub mod customers;
pub mod families;
pub mod payment;
pub mod payment_branch;
pub mod products;
pub mod reps;
pub mod states;
pub mod styles;
