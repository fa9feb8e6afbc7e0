//! Render callback contract.
//!
//! The host turns one item into a renderable node. The engine clones the
//! template once per materialization and hands it over together with the
//! item and the slot the node will occupy.

use super::viewport::Placement;

/// Error type returned by a failing render callback.
pub type RenderError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Everything the renderer gets for one materialization.
#[derive(Debug)]
pub struct RenderRequest<'a, T, Tpl> {
    /// Current index of the item. Not a stable identity; do not retain it
    /// across recompute passes.
    pub index: usize,
    pub item: &'a T,
    /// Fresh clone of the list template.
    pub template: Tpl,
    /// Where the node will be placed in the viewport.
    pub slot: Placement,
}

/// Produces rendered nodes for list items.
///
/// Implementations only see `&T`, so they cannot mutate the collection while
/// a recompute is running.
pub trait ItemRenderer<T> {
    /// Rendered representation. Cloning must be cheap (a handle), because the
    /// cache keeps one copy while the viewport holds another.
    type Node: Clone;

    /// Reusable template cloned for each materialization.
    type Template: Clone;

    fn template(&self) -> &Self::Template;

    fn render(
        &mut self,
        request: RenderRequest<'_, T, Self::Template>,
    ) -> Result<Self::Node, RenderError>;
}

/// Closure-backed [`ItemRenderer`]. Build one with [`render_fn`].
pub struct FnRenderer<Tpl, F> {
    template: Tpl,
    render: F,
}

impl<Tpl, F> std::fmt::Debug for FnRenderer<Tpl, F>
where
    Tpl: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnRenderer")
            .field("template", &self.template)
            .finish_non_exhaustive()
    }
}

/// Wraps a template and a closure into an [`ItemRenderer`].
///
/// ```rust,ignore
/// let renderer = render_fn(String::from("row"), |req: RenderRequest<'_, Task, String>| {
///     Ok(format!("{} #{}: {}", req.template, req.index, req.item.title))
/// });
/// ```
pub fn render_fn<T, Tpl, N, F>(template: Tpl, render: F) -> FnRenderer<Tpl, F>
where
    Tpl: Clone,
    N: Clone,
    F: FnMut(RenderRequest<'_, T, Tpl>) -> Result<N, RenderError>,
{
    FnRenderer { template, render }
}

impl<T, Tpl, N, F> ItemRenderer<T> for FnRenderer<Tpl, F>
where
    Tpl: Clone,
    N: Clone,
    F: FnMut(RenderRequest<'_, T, Tpl>) -> Result<N, RenderError>,
{
    type Node = N;
    type Template = Tpl;

    fn template(&self) -> &Tpl {
        &self.template
    }

    fn render(&mut self, request: RenderRequest<'_, T, Tpl>) -> Result<N, RenderError> {
        (self.render)(request)
    }
}
