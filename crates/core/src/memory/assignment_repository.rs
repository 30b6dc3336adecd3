// In-memory AssignmentRepository

use crate::domain::{Assignment, AssignmentKey};
use crate::error::Result;
use crate::port::AssignmentRepository;
use async_trait::async_trait;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct MemoryAssignmentRepository {
    assignments: RwLock<HashMap<AssignmentKey, Assignment>>,
}

impl MemoryAssignmentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AssignmentRepository for MemoryAssignmentRepository {
    async fn find(&self, key: &AssignmentKey) -> Result<Option<Assignment>> {
        Ok(self.assignments.read().await.get(key).cloned())
    }

    async fn insert_if_absent(&self, assignment: &Assignment) -> Result<bool> {
        let mut assignments = self.assignments.write().await;
        match assignments.entry(assignment.key.clone()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(assignment.clone());
                Ok(true)
            }
        }
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.assignments.read().await.len() as i64)
    }
}
