//! Error type shared by the boundary operations of the symbolic module.
//!
//! The rewriting core (matching, substitution, rewriting, integration) never fails: an
//! integral that cannot be solved is returned as an `Expr::Integral` sentinel. Errors only
//! appear where a caller asks for something the tree cannot give: numeric evaluation of an
//! unbound symbol, a malformed rule, a settings document with a bad key, or an ODE without
//! a `dy/dx` term.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum SymbolicError {
    /// numeric evaluation met a symbol without a value
    UnboundVariable(String),
    /// numeric evaluation met a node that has no numeric meaning (placeholders, template variables)
    UnsupportedNode(String),
    /// a rule template uses a template variable its pattern never binds
    UnboundTemplateVariable { rule: String, name: String },
    /// the ODE could not be brought to the form M + N*dy/dx = 0
    NormalizationFailed(String),
    /// settings document contains an unknown key or an ill-typed value
    InvalidSetting { key: String, value: String },
}

impl fmt::Display for SymbolicError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SymbolicError::UnboundVariable(name) => {
                write!(f, "no value given for variable '{}'", name)
            }
            SymbolicError::UnsupportedNode(node) => {
                write!(f, "expression {} cannot be evaluated numerically", node)
            }
            SymbolicError::UnboundTemplateVariable { rule, name } => write!(
                f,
                "rule '{}' uses template variable '{}' that its pattern does not bind",
                rule, name
            ),
            SymbolicError::NormalizationFailed(ode) => {
                write!(f, "cannot isolate dy/dx term in {} = 0", ode)
            }
            SymbolicError::InvalidSetting { key, value } => {
                write!(f, "invalid setting {}: {}", key, value)
            }
        }
    }
}

impl std::error::Error for SymbolicError {}
