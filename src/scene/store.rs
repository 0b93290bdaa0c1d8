//! The object store seam between the model history and the scene graph.

use std::fmt;

use thiserror::Error;

/// Failure of a primitive store operation.
///
/// The history never retries or rolls back after one of these; callers
/// propagate it to the host.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The handle no longer refers to a live object.
    #[error("object {object} does not exist in the scene")]
    MissingObject { object: String },

    /// The handle refers to something that cannot be cloned as a model.
    #[error("object {object} is not a surface model")]
    NotAModel { object: String },
}

impl StoreError {
    pub fn missing(object: impl fmt::Debug) -> Self {
        Self::MissingObject {
            object: format!("{object:?}"),
        }
    }

    pub fn not_a_model(object: impl fmt::Debug) -> Self {
        Self::NotAModel {
            object: format!("{object:?}"),
        }
    }
}

/// Primitive operations the history needs from the scene that owns the models.
///
/// An object is either *current* (visible, editable, untagged) or *archived*
/// (hidden, non-editable, tagged as history).
pub trait ObjectStore {
    /// Identifier of a container whose direct children are tracked.
    type Folder: Copy + PartialEq + fmt::Debug;
    /// Handle to a single model object.
    type Object: Copy + PartialEq + fmt::Debug;

    /// Direct children of `folder`, in the store's order.
    fn enumerate_children(&self, folder: Self::Folder) -> Vec<Self::Object>;

    /// Create an independent copy of `object` in the same folder, with the
    /// same name, geometry and archive state.
    fn clone_object(&mut self, object: Self::Object) -> Result<Self::Object, StoreError>;

    /// Permanently remove `object` from the store.
    fn delete_object(&mut self, object: Self::Object) -> Result<(), StoreError>;

    /// Hide `object`, make it non-editable and tag it as history.
    fn archive(&mut self, object: Self::Object) -> Result<(), StoreError>;

    /// Inverse of [`ObjectStore::archive`].
    fn restore(&mut self, object: Self::Object) -> Result<(), StoreError>;

    /// Whether `object` is current, i.e. not tagged as history.
    fn is_current(&self, object: Self::Object) -> bool;
}

impl<S: ObjectStore + ?Sized> ObjectStore for &mut S {
    type Folder = S::Folder;
    type Object = S::Object;

    fn enumerate_children(&self, folder: Self::Folder) -> Vec<Self::Object> {
        (**self).enumerate_children(folder)
    }

    fn clone_object(&mut self, object: Self::Object) -> Result<Self::Object, StoreError> {
        (**self).clone_object(object)
    }

    fn delete_object(&mut self, object: Self::Object) -> Result<(), StoreError> {
        (**self).delete_object(object)
    }

    fn archive(&mut self, object: Self::Object) -> Result<(), StoreError> {
        (**self).archive(object)
    }

    fn restore(&mut self, object: Self::Object) -> Result<(), StoreError> {
        (**self).restore(object)
    }

    fn is_current(&self, object: Self::Object) -> bool {
        (**self).is_current(object)
    }
}
