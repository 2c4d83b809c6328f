use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::repo_types::{NewUser, RepoError, User};

/// Storage boundary for the users resource.
#[async_trait]
pub trait UserRepo: Send + Sync {
    /// Every stored user, in storage order.
    async fn list(&self) -> Result<Vec<User>, RepoError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepoError>;
    /// Insert in a single transaction; nothing is persisted on error.
    async fn create(&self, new_user: NewUser) -> Result<User, RepoError>;
}

#[derive(Clone)]
pub struct PgUserRepo {
    db: PgPool,
}

impl PgUserRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepo for PgUserRepo {
    async fn list(&self) -> Result<Vec<User>, RepoError> {
        let rows = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepoError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn create(&self, new_user: NewUser) -> Result<User, RepoError> {
        let mut tx = self.db.begin().await?;

        let inserted = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email)
            VALUES ($1, $2)
            RETURNING id, username, email
            "#,
        )
        .bind(&new_user.username)
        .bind(&new_user.email)
        .fetch_one(&mut *tx)
        .await;

        match inserted {
            Ok(user) => {
                tx.commit().await?;
                debug!(user_id = user.id, "user row committed");
                Ok(user)
            }
            Err(e) => {
                if let Err(rb) = tx.rollback().await {
                    warn!(error = %rb, "rollback after failed insert also failed");
                }
                Err(e.into())
            }
        }
    }
}

#[derive(Default)]
struct MemoryTable {
    last_id: i64,
    rows: Vec<User>,
}

/// In-process store with the same column rules as the `users` table.
#[derive(Default)]
pub struct InMemoryUserRepo {
    table: RwLock<MemoryTable>,
}

impl InMemoryUserRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

fn check_not_empty(column: &str, value: &str) -> Result<(), RepoError> {
    if value.is_empty() {
        return Err(RepoError::Constraint(format!(
            "NOT NULL constraint failed: users.{column}"
        )));
    }
    Ok(())
}

#[async_trait]
impl UserRepo for InMemoryUserRepo {
    async fn list(&self) -> Result<Vec<User>, RepoError> {
        Ok(self.table.read().await.rows.clone())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepoError> {
        let table = self.table.read().await;
        Ok(table.rows.iter().find(|u| u.id == id).cloned())
    }

    async fn create(&self, new_user: NewUser) -> Result<User, RepoError> {
        check_not_empty("username", &new_user.username)?;
        check_not_empty("email", &new_user.email)?;

        let mut table = self.table.write().await;
        table.last_id += 1;
        let user = User {
            id: table.last_id,
            username: new_user.username,
            email: new_user.email,
        };
        table.rows.push(user.clone());
        Ok(user)
    }
}
