//! [`ObjectStore`] over the Bevy world.
//!
//! Folders are entities carrying [`ModelFolder`]; models are entities
//! carrying [`SurfaceModel`] and a `ChildOf` pointing at their folder.

use bevy::prelude::*;

use super::components::{ModelState, SurfaceModel};
use super::store::{ObjectStore, StoreError};

impl ObjectStore for World {
    type Folder = Entity;
    type Object = Entity;

    fn enumerate_children(&self, folder: Entity) -> Vec<Entity> {
        let Some(children) = self.get::<Children>(folder) else {
            return Vec::new();
        };

        // Only models take part in the plan; helper entities are skipped
        children
            .to_vec()
            .into_iter()
            .filter(|child| self.get::<SurfaceModel>(*child).is_some())
            .collect()
    }

    fn clone_object(&mut self, object: Entity) -> Result<Entity, StoreError> {
        let source = self
            .get_entity(object)
            .map_err(|_| StoreError::missing(object))?;

        let model = source
            .get::<SurfaceModel>()
            .cloned()
            .ok_or_else(|| StoreError::not_a_model(object))?;
        let name = source.get::<Name>().cloned();
        let transform = source.get::<Transform>().copied().unwrap_or_default();
        let state = source.get::<ModelState>().copied().unwrap_or_default();
        let parent = source.get::<ChildOf>().map(ChildOf::parent);

        let mut clone = self.spawn((model, transform, state, state.visibility()));
        if let Some(name) = name {
            clone.insert(name);
        }
        if let Some(parent) = parent {
            clone.insert(ChildOf(parent));
        }

        let id = clone.id();
        debug!("Cloned model {:?} into {:?}", object, id);
        Ok(id)
    }

    fn delete_object(&mut self, object: Entity) -> Result<(), StoreError> {
        if self.get_entity(object).is_err() {
            return Err(StoreError::missing(object));
        }
        self.despawn(object);
        Ok(())
    }

    fn archive(&mut self, object: Entity) -> Result<(), StoreError> {
        set_model_state(self, object, ModelState::Archived)
    }

    fn restore(&mut self, object: Entity) -> Result<(), StoreError> {
        set_model_state(self, object, ModelState::Current)
    }

    fn is_current(&self, object: Entity) -> bool {
        self.get::<ModelState>(object)
            .is_none_or(|state| *state == ModelState::Current)
    }
}

fn set_model_state(world: &mut World, object: Entity, state: ModelState) -> Result<(), StoreError> {
    let mut entity = world
        .get_entity_mut(object)
        .map_err(|_| StoreError::missing(object))?;
    entity.insert((state, state.visibility()));
    Ok(())
}
