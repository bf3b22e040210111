use std::any::TypeId;

/// A typed payload attached to an entity.
///
/// Each component type gets its own [`ComponentMap`] instance. The
/// associated `Update` type is the delta merged into a stored value by
/// an update op; for simple components it is often the component type
/// itself (replace-wholesale semantics).
///
/// [`ComponentMap`]: crate::ComponentMap
pub trait Component: 'static {
    /// Delta applied in place by an update op.
    type Update: 'static;

    /// Merge `update` into this value.
    fn apply_update(&mut self, update: Self::Update);

    fn kind() -> ComponentKind
    where
        Self: Sized,
    {
        ComponentKind::of::<Self>()
    }
}

// ComponentKind
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ComponentKind(TypeId);

impl ComponentKind {
    pub fn of<C: Component>() -> Self {
        Self(TypeId::of::<C>())
    }
}
