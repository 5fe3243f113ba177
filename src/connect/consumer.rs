use std::fmt;
use std::marker::PhantomData;

/// Something that renders itself from props.
///
/// What rendering means is up to the implementor; the bridge only promises
/// to call [`render`](Self::render) with fresh props after every change.
pub trait Consumer: Send + 'static {
    type Props;

    fn render(&mut self, props: &Self::Props);
}

/// Consumer backed by a closure. See [`render_fn`].
pub struct RenderFn<P, F> {
    render: F,
    _props: PhantomData<fn(&P)>,
}

/// Wrap a closure as a [`Consumer`].
pub fn render_fn<P, F>(render: F) -> RenderFn<P, F>
where
    F: FnMut(&P) + Send + 'static,
{
    RenderFn {
        render,
        _props: PhantomData,
    }
}

impl<P, F> Consumer for RenderFn<P, F>
where
    P: 'static,
    F: FnMut(&P) + Send + 'static,
{
    type Props = P;

    fn render(&mut self, props: &P) {
        (self.render)(props)
    }
}

impl<P, F> fmt::Debug for RenderFn<P, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderFn").finish_non_exhaustive()
    }
}
