//! Component-layer error types.

/// Errors raised while reading capabilities out of a [`ComponentSet`](crate::ComponentSet).
#[derive(Debug, thiserror::Error)]
pub enum ComponentError {
    /// The set does not contain the requested capability.
    #[error("component `{0}` is not present")]
    Missing(&'static str),

    /// The set holds an entry under the capability's ID whose handle is of a
    /// different type (a name-hash collision or a mis-keyed insert).
    #[error("component `{0}` is stored with a mismatched handle type")]
    Mismatched(&'static str),
}
