use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::RepositoryResult;
use crate::todos::repo_types::Task;

/// Row access for tasks. Every mutating call is scoped by owner; rows that
/// belong to someone else are never touched.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn insert(&self, id: Uuid, owner: Uuid, text: &str) -> RepositoryResult<Task>;
    /// Newest first.
    async fn list_by_owner(&self, owner: Uuid) -> RepositoryResult<Vec<Task>>;
    /// `None` when no row with this id is owned by `owner`.
    async fn update_owned(
        &self,
        owner: Uuid,
        id: Uuid,
        text: &str,
        completed: bool,
    ) -> RepositoryResult<Option<Task>>;
    /// `true` when a row was removed.
    async fn delete_owned(&self, owner: Uuid, id: Uuid) -> RepositoryResult<bool>;
    async fn owner_of(&self, id: Uuid) -> RepositoryResult<Option<Uuid>>;
}

#[derive(Clone)]
pub struct PgTaskStore {
    db: PgPool,
}

impl PgTaskStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TaskStore for PgTaskStore {
    async fn insert(&self, id: Uuid, owner: Uuid, text: &str) -> RepositoryResult<Task> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO todos (id, task, user_id)
            VALUES ($1, $2, $3)
            RETURNING id, task, completed, user_id, created_at
            "#,
        )
        .bind(id)
        .bind(text)
        .bind(owner)
        .fetch_one(&self.db)
        .await?;
        Ok(task)
    }

    async fn list_by_owner(&self, owner: Uuid) -> RepositoryResult<Vec<Task>> {
        let rows = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, task, completed, user_id, created_at
            FROM todos
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(owner)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn update_owned(
        &self,
        owner: Uuid,
        id: Uuid,
        text: &str,
        completed: bool,
    ) -> RepositoryResult<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE todos
               SET task = $1, completed = $2
             WHERE id = $3 AND user_id = $4
            RETURNING id, task, completed, user_id, created_at
            "#,
        )
        .bind(text)
        .bind(completed)
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.db)
        .await?;
        Ok(task)
    }

    async fn delete_owned(&self, owner: Uuid, id: Uuid) -> RepositoryResult<bool> {
        let res = sqlx::query(r#"DELETE FROM todos WHERE id = $1 AND user_id = $2"#)
            .bind(id)
            .bind(owner)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn owner_of(&self, id: Uuid) -> RepositoryResult<Option<Uuid>> {
        let owner = sqlx::query_scalar::<_, Uuid>(r#"SELECT user_id FROM todos WHERE id = $1"#)
            .bind(id)
            .fetch_optional(&self.db)
            .await?;
        Ok(owner)
    }
}
