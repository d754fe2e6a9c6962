// Symbol table: the variable names a formula may reference

use super::CompileError;
use regex::Regex;

/// Name under which the response value is bound
pub const RESPONSE_VAR: &str = "Y";

/// Immutable set of variable names permitted in a formula, in declaration
/// order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolTable {
    names: Vec<String>,
}

impl SymbolTable {
    /// Build a table from an explicit list of names; repeats keep their
    /// first position
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::default();
        for name in names {
            table.push(name.into());
        }
        table
    }

    fn push(&mut self, name: String) {
        if !self.contains(&name) {
            self.names.push(name);
        }
    }

    /// Build a table from the named capture groups of `pattern`
    ///
    /// Fails if a group is named after the reserved response variable.
    ///
    /// # Example
    /// ```
    /// use benchls::expr::SymbolTable;
    /// use regex::Regex;
    ///
    /// let re = Regex::new(r"(?P<M>\d+)x(?P<N>\d+)-\d+$").unwrap();
    /// let symbols = SymbolTable::from_pattern(&re).unwrap();
    /// assert!(symbols.contains("M"));
    /// assert!(symbols.contains("N"));
    /// assert!(!symbols.contains("Y"));
    /// ```
    pub fn from_pattern(pattern: &Regex) -> Result<Self, CompileError> {
        let table = Self::new(pattern.capture_names().flatten());
        table.check_reserved()?;
        Ok(table)
    }

    /// Reject tables that already claim the response variable
    pub fn check_reserved(&self) -> Result<(), CompileError> {
        if self.contains(RESPONSE_VAR) {
            return Err(CompileError::ReservedName(RESPONSE_VAR.to_string()));
        }
        Ok(())
    }

    /// Copy of this table with the response variable added
    pub fn with_response(&self) -> Self {
        let mut table = self.clone();
        table.push(RESPONSE_VAR.to_string());
        table
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
