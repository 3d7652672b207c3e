//! Named behaviors that elements opt into with their `is` attribute.
//!
//! A behavior runs once, right after its element is configured and placed.
//! It receives the game and the new element's id and usually subscribes
//! handlers, starts collision watching or sets speeds.

#[cfg(test)]
#[path = "registry_test.rs"]
mod registry_test;

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::element::ElementId;
use crate::error::GameError;
use crate::game::Game;

pub type Behavior = Rc<dyn Fn(&mut Game, ElementId) -> Result<(), GameError>>;

#[derive(Default, Clone)]
pub struct Registry {
    behaviors: HashMap<String, Behavior>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `behavior` under `name`.
    ///
    /// # Errors
    ///
    /// [`GameError::UnnamedBehavior`] for a blank name,
    /// [`GameError::DuplicateBehavior`] if `name` is taken.
    pub fn define(
        &mut self,
        name: &str,
        behavior: impl Fn(&mut Game, ElementId) -> Result<(), GameError> + 'static,
    ) -> Result<(), GameError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GameError::UnnamedBehavior);
        }
        if self.behaviors.contains_key(name) {
            return Err(GameError::DuplicateBehavior(name.to_owned()));
        }
        self.behaviors.insert(name.to_owned(), Rc::new(behavior));
        Ok(())
    }

    /// # Errors
    ///
    /// [`GameError::UnknownBehavior`] if nothing is registered as `name`.
    pub fn get(&self, name: &str) -> Result<Behavior, GameError> {
        self.behaviors.get(name.trim()).cloned().ok_or_else(|| GameError::UnknownBehavior(name.to_owned()))
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.behaviors.contains_key(name.trim())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.behaviors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.behaviors.is_empty()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.behaviors.keys().collect();
        names.sort();
        f.debug_struct("Registry").field("behaviors", &names).finish()
    }
}
