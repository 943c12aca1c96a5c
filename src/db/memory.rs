//! In-process student store.
//!
//! Mirrors the PostgreSQL backend's observable behaviour: ids increase
//! monotonically and are never reused, names are unique, listing follows
//! insertion order.

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{now, NewStudent, Student, StoreError, StudentStore};

#[derive(Debug, Default)]
struct Table {
    last_id: i32,
    rows: Vec<Student>,
}

/// Student store held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryStudentStore {
    table: RwLock<Table>,
}

impl MemoryStudentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StudentStore for MemoryStudentStore {
    async fn init_schema(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn create(&self, student: NewStudent) -> Result<Student, StoreError> {
        let mut table = self.table.write().await;
        if table.rows.iter().any(|s| s.name == student.name) {
            return Err(StoreError::Duplicate(student.name));
        }

        let id = table
            .last_id
            .checked_add(1)
            .ok_or_else(|| StoreError::Unavailable("student id sequence exhausted".to_string()))?;
        let created_at = now();
        let row = Student {
            id,
            name: student.name,
            age: student.age,
            created_at,
            updated_at: created_at,
        };

        table.last_id = id;
        table.rows.push(row.clone());
        Ok(row)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Student>, StoreError> {
        let table = self.table.read().await;
        Ok(table.rows.iter().find(|s| s.name == name).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Student>, StoreError> {
        Ok(self.table.read().await.rows.clone())
    }

    async fn delete_by_name(&self, name: &str) -> Result<Option<Student>, StoreError> {
        let mut table = self.table.write().await;
        let position = table.rows.iter().position(|s| s.name == name);
        Ok(position.map(|i| table.rows.remove(i)))
    }

    async fn exists(&self, name: &str) -> Result<bool, StoreError> {
        Ok(self.table.read().await.rows.iter().any(|s| s.name == name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(name: &str, age: i32) -> NewStudent {
        NewStudent {
            name: name.to_string(),
            age,
        }
    }

    #[tokio::test]
    async fn test_create_assigns_ids_and_timestamps() {
        let store = MemoryStudentStore::new();
        let alice = store.create(student("Alice", 30)).await.unwrap();
        let bob = store.create(student("Bob", 22)).await.unwrap();

        assert_eq!(alice.id, 1);
        assert_eq!(bob.id, 2);
        assert_eq!(alice.created_at, alice.updated_at);
        assert!(alice.created_at <= bob.created_at);
    }

    #[tokio::test]
    async fn test_duplicate_name_leaves_original_untouched() {
        let store = MemoryStudentStore::new();
        let original = store.create(student("Alice", 30)).await.unwrap();

        let err = store.create(student("Alice", 99)).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(ref name) if name == "Alice"));

        let found = store.find_by_name("Alice").await.unwrap().unwrap();
        assert_eq!(found, original);
        assert_eq!(store.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        let store = MemoryStudentStore::new();
        store.create(student("Alice", 30)).await.unwrap();
        assert!(store.delete_by_name("Alice").await.unwrap().is_some());

        let again = store.create(student("Alice", 31)).await.unwrap();
        assert_eq!(again.id, 2);
    }

    #[tokio::test]
    async fn test_delete_returns_removed_row_once() {
        let store = MemoryStudentStore::new();
        store.create(student("Alice", 30)).await.unwrap();

        assert!(store.exists("Alice").await.unwrap());
        let removed = store.delete_by_name("Alice").await.unwrap().unwrap();
        assert_eq!(removed.age, 30);
        assert!(store.delete_by_name("Alice").await.unwrap().is_none());
        assert!(!store.exists("Alice").await.unwrap());
        assert!(store.find_by_name("Alice").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_all_keeps_insertion_order() {
        let store = MemoryStudentStore::new();
        for (name, age) in [("Carol", 40), ("Alice", 30), ("Bob", 22)] {
            store.create(student(name, age)).await.unwrap();
        }

        let names: Vec<_> = store
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, ["Carol", "Alice", "Bob"]);
    }

    #[tokio::test]
    async fn test_schema_init_and_ping_succeed() {
        let store = MemoryStudentStore::new();
        store.init_schema().await.unwrap();
        store.init_schema().await.unwrap();
        store.ping().await.unwrap();
    }
}
