use super::datastore::MemoryDatastore;
use crate::errors::StorageError;
use crate::model::{Entity, Page, QueryParams};
use crate::spi::repo::Repository;
use async_trait::async_trait;
use serde_json::Value;
use std::cmp::Ordering;
use std::marker::PhantomData;

#[derive(Clone)]
pub struct InMemoryRepository<E: Entity> {
    store: MemoryDatastore,
    table: &'static str,
    _marker: PhantomData<E>,
}

impl<E: Entity> InMemoryRepository<E> {
    pub fn new(store: &MemoryDatastore) -> Self {
        Self {
            store: store.clone(),
            table: E::TABLE,
            _marker: PhantomData,
        }
    }
}

fn matches_filter(value: &Value, filter: &Value) -> bool {
    match (value, filter) {
        (Value::Object(data), Value::Object(filter_map)) => filter_map.iter().all(|(k, expected)| {
            data.get(k)
                .map(|actual| actual == expected)
                .unwrap_or(false)
        }),
        (_, Value::Null) => true,
        _ => true,
    }
}

fn compare_field(a: &Value, b: &Value, field: &str) -> Ordering {
    let left = a.get(field);
    let right = b.get(field);
    match (left.and_then(Value::as_i64), right.and_then(Value::as_i64)) {
        (Some(l), Some(r)) => l.cmp(&r),
        _ => match (left.and_then(Value::as_str), right.and_then(Value::as_str)) {
            (Some(l), Some(r)) => l.cmp(r),
            _ => Ordering::Equal,
        },
    }
}

#[async_trait]
impl<E> Repository<E> for InMemoryRepository<E>
where
    E: Entity + Send + Sync,
{
    async fn create(&self, entity: &E) -> Result<(), StorageError> {
        if self.store.fetch(self.table, entity.id()).is_some() {
            return Err(StorageError::conflict("entity already exists"));
        }
        let value =
            serde_json::to_value(entity).map_err(|e| StorageError::internal(&e.to_string()))?;
        self.store.store(self.table, entity.id(), value);
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<E>, StorageError> {
        match self.store.fetch(self.table, id) {
            Some(value) => Ok(Some(
                serde_json::from_value(value).map_err(|e| StorageError::internal(&e.to_string()))?,
            )),
            None => Ok(None),
        }
    }

    async fn select(&self, params: QueryParams) -> Result<Page<E>, StorageError> {
        let mut rows: Vec<Value> = self
            .store
            .list(self.table)
            .into_iter()
            .filter(|value| matches_filter(value, &params.filter))
            .collect();

        // Stable sort: ties keep insertion order.
        if let Some(field) = params.order_by.as_deref() {
            if params.descending {
                rows.sort_by(|a, b| compare_field(b, a, field));
            } else {
                rows.sort_by(|a, b| compare_field(a, b, field));
            }
        }

        let total = rows.len() as u64;
        let offset = params.offset.unwrap_or(0) as usize;
        let limit = params.limit.map(|l| l as usize).unwrap_or(usize::MAX);

        let mut items = Vec::new();
        for value in rows.into_iter().skip(offset).take(limit) {
            let entity: E = serde_json::from_value(value)
                .map_err(|e| StorageError::internal(&e.to_string()))?;
            items.push(entity);
        }
        Ok(Page { items, total })
    }

    async fn delete(&self, id: &str) -> Result<(), StorageError> {
        self.store
            .remove(self.table, id)
            .ok_or_else(|| StorageError::not_found("entity not found"))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    #[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
    struct Doc {
        id: String,
        title: String,
        rank: i64,
    }

    impl Entity for Doc {
        const TABLE: &'static str = "doc";

        fn id(&self) -> &str {
            &self.id
        }
    }

    fn doc(id: &str, title: &str, rank: i64) -> Doc {
        Doc {
            id: id.into(),
            title: title.into(),
            rank,
        }
    }

    #[test]
    fn matches_filter_honors_missing_keys() {
        let value = json!({"id": "1", "title": "t"});
        assert!(!matches_filter(&value, &json!({"title": "other"})));
        assert!(!matches_filter(&value, &json!({"absent": "x"})));
        assert!(matches_filter(&value, &json!({"title": "t"})));
        assert!(matches_filter(&value, &json!({})));
    }

    #[tokio::test]
    async fn create_detects_conflict() {
        let store = MemoryDatastore::new();
        let repo: InMemoryRepository<Doc> = InMemoryRepository::new(&store);
        repo.create(&doc("doc-1", "hello", 1)).await.unwrap();
        let err = repo
            .create(&doc("doc-1", "again", 2))
            .await
            .expect_err("conflict");
        assert!(err.to_string().contains("entity already exists"));
    }

    #[tokio::test]
    async fn select_orders_desc_with_stable_ties() {
        let store = MemoryDatastore::new();
        let repo: InMemoryRepository<Doc> = InMemoryRepository::new(&store);
        repo.create(&doc("a", "first", 1)).await.unwrap();
        repo.create(&doc("b", "tied-early", 5)).await.unwrap();
        repo.create(&doc("c", "tied-late", 5)).await.unwrap();
        repo.create(&doc("d", "last", 9)).await.unwrap();

        let page = repo
            .select(QueryParams {
                order_by: Some("rank".into()),
                descending: true,
                ..Default::default()
            })
            .await
            .unwrap();
        let ids: Vec<&str> = page.items.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["d", "b", "c", "a"]);
        assert_eq!(page.total, 4);
    }

    #[tokio::test]
    async fn select_total_ignores_offset_and_limit() {
        let store = MemoryDatastore::new();
        let repo: InMemoryRepository<Doc> = InMemoryRepository::new(&store);
        for idx in 0..7 {
            repo.create(&doc(&format!("doc-{idx}"), "t", idx)).await.unwrap();
        }

        let page = repo
            .select(QueryParams {
                limit: Some(3),
                offset: Some(5),
                order_by: Some("rank".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total, 7);

        let past_end = repo
            .select(QueryParams {
                limit: Some(3),
                offset: Some(100),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(past_end.items.is_empty());
        assert_eq!(past_end.total, 7);
    }

    #[tokio::test]
    async fn delete_errors_when_missing() {
        let store = MemoryDatastore::new();
        let repo: InMemoryRepository<Doc> = InMemoryRepository::new(&store);
        let err = repo.delete("missing").await.expect_err("not found");
        assert!(err.is_not_found());
    }
}
