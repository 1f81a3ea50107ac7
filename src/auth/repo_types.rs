use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,                             // unique
    pub password_hash: String,                     // Argon2 PHC string
    pub reset_token: Option<String>,               // hex, single use
    pub reset_token_expiry: Option<OffsetDateTime>,
    // Maintained by the store.
    #[allow(dead_code)]
    pub created_at: OffsetDateTime,
    #[allow(dead_code)]
    pub updated_at: OffsetDateTime,
}

/// Fields supplied on signup; the store fills in the rest.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}
