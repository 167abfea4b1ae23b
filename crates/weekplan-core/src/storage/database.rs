//! SQLite-based storage for containers and their work items.
//!
//! The store is the collaborator that owns persistence; the planner only
//! ever sees the [`PlanInput`] snapshot produced by [`Database::load_snapshot`].

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::str::FromStr;

use super::{data_dir, migrations};
use crate::container::{Container, PlanInput};
use crate::error::{CoreError, DatabaseError, Result, ValidationError};
use crate::item::catalog::KindCatalog;
use crate::item::{ItemKind, ItemStatus, WorkItem};

const CONTAINER_COLUMNS: &str = "c.id, c.user_id, c.label, c.deadline, c.url";

const ITEM_COLUMNS: &str = "w.id, w.container_id, w.kind, w.title, w.description, w.url, \
     w.hour_estimate, w.status, w.completed_at, w.sequence_position, w.global_position, w.created_at";

/// Fields supplied when creating a work item.
#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    pub kind: ItemKind,
    pub title: String,
    pub description: Option<String>,
    /// Falls back to the container url
    pub url: Option<String>,
    /// Falls back to the catalog default for `kind`
    pub hour_estimate: Option<f64>,
    pub sequence_position: Option<i64>,
}

impl NewItem {
    pub fn new(kind: ItemKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            description: None,
            url: None,
            hour_estimate: None,
            sequence_position: None,
        }
    }

    pub fn with_hours(mut self, hours: f64) -> Self {
        self.hour_estimate = Some(hours);
        self
    }

    pub fn with_sequence(mut self, position: i64) -> Self {
        self.sequence_position = Some(position);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

// === Helper Functions ===

/// Fixed-width UTC timestamps so text ordering matches time ordering.
fn format_timestamp(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_timestamp(idx: usize, raw: String) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

fn parse_column<T>(idx: usize, raw: String) -> rusqlite::Result<T>
where
    T: FromStr<Err = ValidationError>,
{
    raw.parse::<T>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn row_to_container(row: &Row) -> rusqlite::Result<Container> {
    Ok(Container {
        id: row.get(0)?,
        user_id: row.get(1)?,
        label: row.get(2)?,
        deadline: Some(parse_timestamp(3, row.get(3)?)?),
        url: row.get(4)?,
        items: Vec::new(),
    })
}

fn row_to_item(row: &Row) -> rusqlite::Result<WorkItem> {
    let completed_at: Option<String> = row.get(8)?;
    Ok(WorkItem {
        id: row.get(0)?,
        container_id: row.get(1)?,
        kind: parse_column(2, row.get(2)?)?,
        title: row.get(3)?,
        description: row.get(4)?,
        url: row.get(5)?,
        hour_estimate: row.get(6)?,
        status: parse_column(7, row.get(7)?)?,
        completed_at: completed_at.map(|raw| parse_timestamp(8, raw)).transpose()?,
        sequence_position: row.get(9)?,
        global_position: row.get(10)?,
        created_at: parse_timestamp(11, row.get(11)?)?,
    })
}

fn not_found(entity: &'static str, id: &str) -> CoreError {
    DatabaseError::NotFound {
        entity,
        id: id.to_string(),
    }
    .into()
}

/// SQLite database for containers and work items.
pub struct Database {
    conn: Connection,
    catalog: KindCatalog,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `<data dir>/weekplan.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("weekplan.db");
        Self::open_at(&path)
    }

    /// Open (or create) the database at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::init(conn)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        migrations::migrate(&conn).map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(Self {
            conn,
            catalog: KindCatalog::default(),
        })
    }

    /// Use `catalog` for estimates omitted at item creation.
    pub fn with_catalog(mut self, catalog: KindCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    // === Container CRUD ===

    /// Create a container together with its initial items.
    ///
    /// Items without a url inherit the container's.
    ///
    /// # Errors
    /// Returns a validation error for a blank label or a bad item; nothing
    /// is written in that case.
    pub fn create_container(
        &self,
        user_id: &str,
        label: &str,
        deadline: DateTime<Utc>,
        url: Option<&str>,
        items: Vec<NewItem>,
    ) -> Result<Container> {
        let label = label.trim();
        if label.is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "label".to_string(),
                message: "label is required".to_string(),
            }
            .into());
        }

        let mut container = Container::new(user_id, label, deadline);
        container.url = url.map(str::to_string);

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO containers (id, user_id, label, deadline, url, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                container.id,
                container.user_id,
                container.label,
                format_timestamp(deadline),
                container.url,
                format_timestamp(Utc::now()),
            ],
        )?;
        for new_item in items {
            let item = insert_item(&tx, &self.catalog, &container, new_item)?;
            container.items.push(item);
        }
        tx.commit()?;

        tracing::debug!(
            container = %container.id,
            items = container.items.len(),
            "created container"
        );
        Ok(container)
    }

    /// Containers owned by `user_id` with their items, deadline ascending.
    pub fn list_containers(&self, user_id: &str) -> Result<Vec<Container>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {CONTAINER_COLUMNS} FROM containers c
             WHERE c.user_id = ?1
             ORDER BY c.deadline ASC, c.created_at ASC"
        ))?;
        let mut containers = stmt
            .query_map(params![user_id], row_to_container)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        for container in &mut containers {
            container.items = self.items_for(&container.id)?;
        }
        Ok(containers)
    }

    /// A single container, only if `user_id` owns it.
    pub fn get_container(&self, id: &str, user_id: &str) -> Result<Container> {
        let container = self
            .conn
            .query_row(
                &format!(
                    "SELECT {CONTAINER_COLUMNS} FROM containers c
                     WHERE c.id = ?1 AND c.user_id = ?2"
                ),
                params![id, user_id],
                row_to_container,
            )
            .optional()?;

        let mut container = container.ok_or_else(|| not_found("container", id))?;
        container.items = self.items_for(&container.id)?;
        Ok(container)
    }

    /// Delete a container and, through the foreign key, all of its items.
    pub fn delete_container(&self, id: &str, user_id: &str) -> Result<()> {
        let deleted = self.conn.execute(
            "DELETE FROM containers WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;
        if deleted == 0 {
            return Err(not_found("container", id));
        }
        tracing::debug!(container = %id, "deleted container");
        Ok(())
    }

    fn items_for(&self, container_id: &str) -> Result<Vec<WorkItem>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {ITEM_COLUMNS} FROM work_items w
             WHERE w.container_id = ?1
             ORDER BY w.sequence_position IS NULL, w.sequence_position,
                      w.global_position IS NULL, w.global_position,
                      w.created_at"
        ))?;
        let items = stmt
            .query_map(params![container_id], row_to_item)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(items)
    }

    // === Item CRUD ===

    /// Add an item to a container owned by `user_id`.
    ///
    /// # Errors
    /// Rejects blank or duplicate titles and invalid estimates.
    pub fn add_item(&self, container_id: &str, user_id: &str, new_item: NewItem) -> Result<WorkItem> {
        let container = self.get_container(container_id, user_id)?;
        let tx = self.conn.unchecked_transaction()?;
        let item = insert_item(&tx, &self.catalog, &container, new_item)?;
        tx.commit()?;
        tracing::debug!(item = %item.id, container = %container_id, "added item");
        Ok(item)
    }

    /// A single item, only if its container belongs to `user_id`.
    pub fn get_item(&self, id: &str, user_id: &str) -> Result<WorkItem> {
        self.conn
            .query_row(
                &format!(
                    "SELECT {ITEM_COLUMNS} FROM work_items w
                     JOIN containers c ON c.id = w.container_id
                     WHERE w.id = ?1 AND c.user_id = ?2"
                ),
                params![id, user_id],
                row_to_item,
            )
            .optional()?
            .ok_or_else(|| not_found("item", id))
    }

    pub fn delete_item(&self, id: &str, user_id: &str) -> Result<()> {
        let item = self.get_item(id, user_id)?;
        self.conn
            .execute("DELETE FROM work_items WHERE id = ?1", params![item.id])?;
        Ok(())
    }

    /// Mark an item completed or pending, keeping `completed_at` in step.
    pub fn set_item_status(
        &self,
        id: &str,
        user_id: &str,
        status: ItemStatus,
        now: DateTime<Utc>,
    ) -> Result<WorkItem> {
        let mut item = self.get_item(id, user_id)?;
        item.set_status(status, now);
        self.conn.execute(
            "UPDATE work_items SET status = ?1, completed_at = ?2 WHERE id = ?3",
            params![
                item.status.as_str(),
                item.completed_at.map(format_timestamp),
                item.id,
            ],
        )?;
        Ok(item)
    }

    /// Replace an item's hour estimate. `None` clears it.
    pub fn update_estimate(&self, id: &str, user_id: &str, hours: Option<f64>) -> Result<WorkItem> {
        let mut item = self.get_item(id, user_id)?;
        item.hour_estimate = hours;
        item.validate()?;
        self.conn.execute(
            "UPDATE work_items SET hour_estimate = ?1 WHERE id = ?2",
            params![item.hour_estimate, item.id],
        )?;
        Ok(item)
    }

    /// Consistent read of everything `user_id` owns, ready for the planner.
    pub fn load_snapshot(&self, user_id: &str) -> Result<PlanInput> {
        let tx = self.conn.unchecked_transaction()?;
        let containers = self.list_containers(user_id)?;
        tx.commit()?;
        Ok(PlanInput::new(user_id, containers))
    }
}

fn insert_item(
    conn: &Connection,
    catalog: &KindCatalog,
    container: &Container,
    new_item: NewItem,
) -> Result<WorkItem> {
    let title = new_item.title.trim();
    if title.is_empty() {
        return Err(ValidationError::EmptyTitle.into());
    }

    let duplicates: i64 = conn.query_row(
        "SELECT COUNT(*) FROM work_items WHERE container_id = ?1 AND title = ?2",
        params![container.id, title],
        |row| row.get(0),
    )?;
    if duplicates > 0 {
        return Err(ValidationError::DuplicateTitle {
            container: container.label.clone(),
            title: title.to_string(),
        }
        .into());
    }

    let global_position: i64 = conn.query_row(
        "SELECT COALESCE(MAX(w.global_position), 0) + 1 FROM work_items w
         JOIN containers c ON c.id = w.container_id
         WHERE c.user_id = ?1",
        params![container.user_id],
        |row| row.get(0),
    )?;

    let mut item = WorkItem::new(container.id.clone(), new_item.kind, title)
        .with_global_position(global_position);
    item.description = new_item.description;
    item.url = new_item.url.or_else(|| container.url.clone());
    item.hour_estimate = new_item
        .hour_estimate
        .or_else(|| catalog.default_hours(new_item.kind));
    item.sequence_position = new_item.sequence_position;
    item.validate()?;

    conn.execute(
        "INSERT INTO work_items (id, container_id, kind, title, description, url, hour_estimate,
                                 status, completed_at, sequence_position, global_position, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            item.id,
            item.container_id,
            item.kind.as_str(),
            item.title,
            item.description,
            item.url,
            item.hour_estimate,
            item.status.as_str(),
            item.completed_at.map(format_timestamp),
            item.sequence_position,
            item.global_position,
            format_timestamp(item.created_at),
        ],
    )?;
    Ok(item)
}
