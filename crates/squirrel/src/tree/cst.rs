use super::{AstNode, SYNTAX_ERROR_LABEL};
use crate::error::CstError;
use compact_str::CompactString;
use hashbrown::HashMap;

type Factory<'f, T> = Box<dyn Fn(&AstNode, Vec<T>) -> T + 'f>;

/// Per-label constructors for user CST nodes.
///
/// A factory receives the AST node and the already-built children. Register
/// one factory per rule name that can appear in the AST, one for
/// [`TERMINAL_LABEL`](super::TERMINAL_LABEL), and, when syntax errors are
/// allowed, one for [`SYNTAX_ERROR_LABEL`].
///
/// # Example
///
/// ```rust
/// use squirrel::tree::{CstFactories, TERMINAL_LABEL};
///
/// // Count nodes.
/// let factories = CstFactories::<usize>::new()
///     .with("Sum", |_, children| 1 + children.iter().sum::<usize>())?
///     .with(TERMINAL_LABEL, |_, _| 1)?;
/// assert!(factories.contains("Sum"));
/// # Ok::<(), squirrel::error::CstError>(())
/// ```
pub struct CstFactories<'f, T> {
    factories: HashMap<CompactString, Factory<'f, T>, ahash::RandomState>,
}

impl<T> Default for CstFactories<'_, T> {
    fn default() -> Self {
        Self {
            factories: HashMap::default(),
        }
    }
}

impl<'f, T> CstFactories<'f, T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the factory for `label`.
    ///
    /// # Errors
    ///
    /// Returns [`CstError::DuplicateFactory`] if `label` already has one.
    pub fn add<F>(&mut self, label: &str, factory: F) -> Result<(), CstError>
    where
        F: Fn(&AstNode, Vec<T>) -> T + 'f,
    {
        if self.factories.contains_key(label) {
            return Err(CstError::DuplicateFactory(label.to_string()));
        }
        self.factories
            .insert(CompactString::from(label), Box::new(factory));
        Ok(())
    }

    /// Builder form of [`add`](Self::add).
    ///
    /// # Errors
    ///
    /// Returns [`CstError::DuplicateFactory`] if `label` already has one.
    pub fn with<F>(mut self, label: &str, factory: F) -> Result<Self, CstError>
    where
        F: Fn(&AstNode, Vec<T>) -> T + 'f,
    {
        self.add(label, factory)?;
        Ok(self)
    }

    #[must_use]
    pub fn contains(&self, label: &str) -> bool {
        self.factories.contains_key(label)
    }

    fn get(&self, label: &str) -> Option<&Factory<'f, T>> {
        self.factories.get(label)
    }
}

/// Build a CST bottom-up from `ast`.
///
/// # Errors
///
/// - [`CstError::SyntaxError`] for the first syntax error met when
///   `allow_syntax_errors` is false
/// - [`CstError::MissingFactory`] when a label (or `<SyntaxError>`, when
///   errors are allowed) has no factory
pub fn build_cst<T>(
    ast: &AstNode,
    factories: &CstFactories<'_, T>,
    allow_syntax_errors: bool,
) -> Result<T, CstError> {
    if let Some(error) = &ast.syntax_error {
        if !allow_syntax_errors {
            return Err(CstError::SyntaxError(error.to_string()));
        }
        let factory = factories
            .get(SYNTAX_ERROR_LABEL)
            .ok_or_else(|| CstError::MissingFactory(SYNTAX_ERROR_LABEL.to_string()))?;
        return Ok(factory(ast, Vec::new()));
    }

    let factory = factories
        .get(&ast.label)
        .ok_or_else(|| CstError::MissingFactory(ast.label.to_string()))?;

    let children = ast
        .children
        .iter()
        .map(|child| build_cst(child, factories, allow_syntax_errors))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(factory(ast, children))
}
