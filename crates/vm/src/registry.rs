//! Program registry: name -> shared, immutable program tape.
//!
//! Registration is first-wins. Registering an existing name, an empty
//! name or an empty program is a logged no-op, never an overwrite and
//! never an error. After startup the registry is only read, so a frozen
//! [`Library`] can be shared by reference with every interpreter.

use std::collections::HashMap;
use std::sync::Arc;

use danmaku_common::{check, BulletOp, EnemyOp, OpKind, Program, ShotOp};
use tracing::{debug, warn};

use crate::cursor::Cursor;

/// Programs of one vocabulary, keyed by name.
#[derive(Debug)]
pub struct Registry<K> {
    programs: HashMap<String, Arc<Program<K>>>,
}

impl<K: OpKind> Registry<K> {
    pub fn new() -> Self {
        Self {
            programs: HashMap::new(),
        }
    }

    /// Register `program` under `name`.
    ///
    /// Returns `true` if the program was stored. Static check findings are
    /// logged but do not prevent registration.
    pub fn register(&mut self, name: &str, program: Program<K>) -> bool {
        if name.is_empty() {
            warn!(vocabulary = %K::VOCABULARY, "ignoring program with empty name");
            return false;
        }
        if program.is_empty() {
            warn!(vocabulary = %K::VOCABULARY, name, "ignoring empty program");
            return false;
        }
        if self.programs.contains_key(name) {
            warn!(vocabulary = %K::VOCABULARY, name, "program already registered, keeping the first");
            return false;
        }

        for finding in check(&program) {
            warn!(vocabulary = %K::VOCABULARY, name, %finding, "program check");
        }

        debug!(vocabulary = %K::VOCABULARY, name, len = program.len(), "program registered");
        self.programs.insert(name.to_string(), Arc::new(program));
        true
    }

    /// A fresh cursor bound to the program registered as `name`.
    pub fn clone_cursor(&self, name: &str) -> Option<Cursor<K>> {
        match self.programs.get(name) {
            Some(program) => Some(Cursor::new(Arc::clone(program))),
            None => {
                debug!(vocabulary = %K::VOCABULARY, name, "clone of unknown program");
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<Program<K>>> {
        self.programs.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.programs.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.programs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.programs.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl<K: OpKind> Default for Registry<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// The three registries, one per vocabulary.
#[derive(Debug, Default)]
pub struct Library {
    pub bullets: Registry<BulletOp>,
    pub enemies: Registry<EnemyOp>,
    pub shots: Registry<ShotOp>,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }
}
