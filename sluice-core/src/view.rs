//! View models and the renderer collaborator.

use crate::error::BoxError;
use std::collections::BTreeMap;

/// Data a controller hands to the render phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewModel {
    template: Option<String>,
    variables: BTreeMap<String, String>,
    terminal: bool,
}

impl ViewModel {
    /// An empty view model with no template.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the template name.
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    /// Set a variable.
    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    /// Mark the model terminal (rendered without a surrounding layout).
    pub fn terminal(mut self) -> Self {
        self.terminal = true;
        self
    }

    /// The template name, if one was chosen.
    pub fn template(&self) -> Option<&str> {
        self.template.as_deref()
    }

    /// Replace the template name.
    pub fn set_template(&mut self, template: impl Into<String>) {
        self.template = Some(template.into());
    }

    /// Look up a variable.
    pub fn variable(&self, name: &str) -> Option<&str> {
        self.variables.get(name).map(String::as_str)
    }

    /// Set a variable.
    pub fn set_variable(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(name.into(), value.into());
    }

    /// All variables, ordered by name.
    pub fn variables(&self) -> &BTreeMap<String, String> {
        &self.variables
    }

    /// Whether the model is terminal.
    pub fn is_terminal(&self) -> bool {
        self.terminal
    }
}

/// Turns a [`ViewModel`] into response content.
///
/// Template resolution lives behind this trait; the pipeline only hands it
/// the model chosen by the dispatch or error phase.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `Renderer`",
    label = "missing `Renderer` implementation",
    note = "Renderers must implement `render` for a `ViewModel`."
)]
pub trait Renderer: Send + Sync {
    /// Render the model to a string.
    fn render(&self, view: &ViewModel) -> Result<String, BoxError>;
}
