/// Props handed to a connected consumer.
///
/// Each source keeps its own field. `own` is whatever the parent passed at
/// mount or through [`Bridge::set_own_props`](super::Bridge::set_own_props).
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectedProps<S, D, O> {
    /// Projected from store state, recomputed on every notification.
    pub state: S,
    /// Projected from the dispatcher, computed once per mount.
    pub dispatch: D,
    pub own: O,
}
