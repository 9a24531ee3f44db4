//! User Storage
//! Mission: Store and manage user accounts with SQLite

use crate::users::models::{NewUser, User, UserUpdate};
use anyhow::Result;
use bcrypt::{hash, DEFAULT_COST};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{info, warn};

/// Store-level failures, mapped to HTTP statuses by the API layer.
#[derive(Debug)]
pub enum StoreError {
    NotFound,
    DuplicateEmail,
    InvalidInput(&'static str),
    Internal(anyhow::Error),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::NotFound => write!(f, "User not found"),
            StoreError::DuplicateEmail => write!(f, "Email already in use"),
            StoreError::InvalidInput(msg) => write!(f, "{}", msg),
            StoreError::Internal(e) => write!(f, "Storage error: {}", e),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Internal(e.into())
    }
}

impl From<bcrypt::BcryptError> for StoreError {
    fn from(e: bcrypt::BcryptError) -> Self {
        StoreError::Internal(e.into())
    }
}

/// User storage with SQLite backend.
///
/// Opens a fresh connection per call; the store itself holds no mutable
/// state, so it is freely shared across request handlers.
pub struct UserStore {
    db_path: String,
}

impl UserStore {
    /// Create a new user store and initialize the database.
    pub fn new(db_path: &str) -> Result<Self> {
        let store = Self {
            db_path: db_path.to_string(),
        };
        store.init_db()?;
        Ok(store)
    }

    fn init_db(&self) -> Result<()> {
        let conn = Connection::open(&self.db_path)?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL,
                email TEXT UNIQUE NOT NULL,
                password_hash TEXT NOT NULL DEFAULT '',
                role TEXT NOT NULL DEFAULT 'USER',
                enabled INTEGER NOT NULL DEFAULT 1,
                created_at TEXT NOT NULL
            )",
            [],
        )?;

        self.create_default_admin(&conn)?;

        Ok(())
    }

    /// Seed a default admin account for initial setup.
    fn create_default_admin(&self, conn: &Connection) -> Result<()> {
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;

        if count == 0 {
            let password_hash = hash("admin123", DEFAULT_COST)?;

            conn.execute(
                "INSERT INTO users (username, email, password_hash, role, enabled, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    "admin",
                    "admin@example.com",
                    password_hash,
                    "ADMIN",
                    1,
                    Utc::now().to_rfc3339(),
                ],
            )?;

            info!("Default admin user created (username: admin, password: admin123)");
            warn!("Change the default password before deploying!");
        }

        Ok(())
    }

    fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
        Ok(User {
            id: row.get(0)?,
            username: row.get(1)?,
            email: row.get(2)?,
            password_hash: row.get(3)?,
            role: row.get(4)?,
            enabled: row.get::<_, i64>(5)? != 0,
            created_at: row.get(6)?,
        })
    }

    const USER_COLUMNS: &'static str =
        "id, username, email, password_hash, role, enabled, created_at";

    /// Get a user by id.
    pub fn get_user(&self, id: i64) -> Result<Option<User>, StoreError> {
        let conn = Connection::open(&self.db_path)?;

        let user = conn
            .query_row(
                &format!("SELECT {} FROM users WHERE id = ?1", Self::USER_COLUMNS),
                params![id],
                Self::row_to_user,
            )
            .optional()?;

        Ok(user)
    }

    /// Get a user by username.
    pub fn get_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let conn = Connection::open(&self.db_path)?;

        let user = conn
            .query_row(
                &format!(
                    "SELECT {} FROM users WHERE username = ?1",
                    Self::USER_COLUMNS
                ),
                params![username],
                Self::row_to_user,
            )
            .optional()?;

        Ok(user)
    }

    /// List all users.
    pub fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let conn = Connection::open(&self.db_path)?;

        let mut stmt =
            conn.prepare(&format!("SELECT {} FROM users ORDER BY id", Self::USER_COLUMNS))?;

        let users = stmt
            .query_map([], Self::row_to_user)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(users)
    }

    /// Create a new user. Username and email are required; the password,
    /// when supplied, is stored bcrypt-hashed.
    pub fn create_user(&self, new_user: &NewUser) -> Result<User, StoreError> {
        if new_user.username.trim().is_empty() {
            return Err(StoreError::InvalidInput("Username must not be empty"));
        }
        if new_user.email.trim().is_empty() {
            return Err(StoreError::InvalidInput("Email must not be empty"));
        }

        let conn = Connection::open(&self.db_path)?;

        let existing: Option<i64> = conn
            .query_row(
                "SELECT id FROM users WHERE email = ?1",
                params![new_user.email],
                |row| row.get(0),
            )
            .optional()?;
        if existing.is_some() {
            return Err(StoreError::DuplicateEmail);
        }

        let password_hash = match new_user.password.as_deref() {
            Some(p) if !p.is_empty() => hash(p, DEFAULT_COST)?,
            _ => String::new(),
        };

        let role = new_user.role.clone().unwrap_or_else(|| "USER".to_string());
        let created_at = Utc::now().to_rfc3339();

        conn.execute(
            "INSERT INTO users (username, email, password_hash, role, enabled, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                new_user.username,
                new_user.email,
                password_hash,
                role,
                1,
                created_at,
            ],
        )?;

        let id = conn.last_insert_rowid();

        info!("Created user: {} (id {})", new_user.username, id);

        Ok(User {
            id,
            username: new_user.username.clone(),
            email: new_user.email.clone(),
            password_hash,
            role,
            enabled: true,
            created_at,
        })
    }

    /// Apply a partial update to an existing user. Blank username/email
    /// values are ignored rather than written.
    pub fn update_user(&self, id: i64, changes: &UserUpdate) -> Result<User, StoreError> {
        let mut user = self.get_user(id)?.ok_or(StoreError::NotFound)?;

        if let Some(username) = changes.username.as_deref() {
            if !username.trim().is_empty() {
                user.username = username.to_string();
            }
        }

        if let Some(email) = changes.email.as_deref() {
            if !email.trim().is_empty() && email != user.email {
                let conn = Connection::open(&self.db_path)?;
                let taken: Option<i64> = conn
                    .query_row(
                        "SELECT id FROM users WHERE email = ?1 AND id != ?2",
                        params![email, id],
                        |row| row.get(0),
                    )
                    .optional()?;
                if taken.is_some() {
                    return Err(StoreError::DuplicateEmail);
                }
                user.email = email.to_string();
            }
        }

        if let Some(role) = changes.role.clone() {
            user.role = role;
        }
        if let Some(enabled) = changes.enabled {
            user.enabled = enabled;
        }

        let conn = Connection::open(&self.db_path)?;
        conn.execute(
            "UPDATE users SET username = ?1, email = ?2, role = ?3, enabled = ?4 WHERE id = ?5",
            params![user.username, user.email, user.role, user.enabled as i64, id],
        )?;

        info!("Updated user: {} (id {})", user.username, id);

        Ok(user)
    }

    /// Delete a user by id.
    pub fn delete_user(&self, id: i64) -> Result<(), StoreError> {
        let conn = Connection::open(&self.db_path)?;

        let rows_affected = conn.execute("DELETE FROM users WHERE id = ?1", params![id])?;

        if rows_affected == 0 {
            return Err(StoreError::NotFound);
        }

        info!("Deleted user: id {}", id);
        Ok(())
    }
}
