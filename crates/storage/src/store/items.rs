#![forbid(unsafe_code)]

use super::error::classify_insert_error;
use super::{InsertItemRequest, ItemStore, StoreError, now_ms};
use dk_core::lifecycle::{Transition, validate_create, validate_transition};
use dk_core::model::{Category, DEFAULT_SERVICE_TYPE, Item, Urgency};
use rusqlite::{OptionalExtension, Row, params};

const ITEM_COLUMNS: &str = "id, title, description, category, service_type, urgency, \
                            scheduled_at_ms, completed_by, created_at_ms, completed_at_ms";

/// Row image before enum parsing; rows are only written through the typed
/// path, so an unparseable category/urgency means a corrupted table.
struct RawItem {
    id: i64,
    title: String,
    description: Option<String>,
    category: String,
    service_type: Option<String>,
    urgency: Option<String>,
    scheduled_at_ms: Option<i64>,
    completed_by: Option<String>,
    created_at_ms: Option<i64>,
    completed_at_ms: Option<i64>,
}

fn raw_from_row(row: &Row<'_>) -> rusqlite::Result<RawItem> {
    Ok(RawItem {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        category: row.get(3)?,
        service_type: row.get(4)?,
        urgency: row.get(5)?,
        scheduled_at_ms: row.get(6)?,
        completed_by: row.get(7)?,
        created_at_ms: row.get(8)?,
        completed_at_ms: row.get(9)?,
    })
}

fn item_from_raw(raw: RawItem) -> Result<Item, StoreError> {
    let category = Category::parse(&raw.category)
        .ok_or(StoreError::InvalidInput("unknown category in items row"))?;
    let urgency = match raw.urgency {
        None => Urgency::default(),
        Some(value) => Urgency::parse(&value)
            .ok_or(StoreError::InvalidInput("unknown urgency in items row"))?,
    };
    Ok(Item {
        id: raw.id,
        title: raw.title,
        description: raw.description.unwrap_or_default(),
        category,
        service_type: raw
            .service_type
            .unwrap_or_else(|| DEFAULT_SERVICE_TYPE.to_string()),
        urgency,
        scheduled_at_ms: raw.scheduled_at_ms,
        completed_by: raw.completed_by,
        created_at_ms: raw.created_at_ms,
        completed_at_ms: raw.completed_at_ms,
    })
}

impl ItemStore {
    /// Storage-natural order; read-only.
    pub fn list_items(&self) -> Result<Vec<Item>, StoreError> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {ITEM_COLUMNS} FROM items"))?;
        let raws = stmt
            .query_map([], raw_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        raws.into_iter().map(item_from_raw).collect()
    }

    pub fn get_item(&self, id: i64) -> Result<Option<Item>, StoreError> {
        let raw = self
            .conn
            .query_row(
                &format!("SELECT {ITEM_COLUMNS} FROM items WHERE id = ?1"),
                params![id],
                raw_from_row,
            )
            .optional()?;
        raw.map(item_from_raw).transpose()
    }

    pub fn insert_item(&mut self, request: InsertItemRequest) -> Result<Item, StoreError> {
        let InsertItemRequest {
            id,
            title,
            description,
            category,
            service_type,
            urgency,
            scheduled_at_ms,
        } = request;

        validate_create(&title)?;

        let item = Item {
            id,
            title,
            description: description.unwrap_or_default(),
            category: category.unwrap_or_else(Category::initial),
            service_type: service_type.unwrap_or_else(|| DEFAULT_SERVICE_TYPE.to_string()),
            urgency: urgency.unwrap_or_default(),
            scheduled_at_ms,
            completed_by: None,
            created_at_ms: Some(now_ms()),
            completed_at_ms: None,
        };

        self.conn
            .execute(
                r#"
                INSERT INTO items(id, title, description, category, service_type,
                                  urgency, scheduled_at_ms, created_at_ms)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
                params![
                    item.id,
                    item.title,
                    item.description,
                    item.category.as_str(),
                    item.service_type,
                    item.urgency.as_str(),
                    item.scheduled_at_ms,
                    item.created_at_ms,
                ],
            )
            .map_err(|err| classify_insert_error(err, id))?;

        Ok(item)
    }

    /// Validates against the row's current category, then applies exactly
    /// one UPDATE for the transition's field-set.
    pub fn apply_transition(&mut self, id: i64, transition: &Transition) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;

        let current = tx
            .query_row(
                "SELECT category, urgency, scheduled_at_ms FROM items WHERE id = ?1",
                params![id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, Option<String>>(1)?,
                        row.get::<_, Option<i64>>(2)?,
                    ))
                },
            )
            .optional()?;

        let Some((raw_category, raw_urgency, current_scheduled)) = current else {
            return Err(StoreError::UnknownId);
        };
        let current_category = Category::parse(&raw_category)
            .ok_or(StoreError::InvalidInput("unknown category in items row"))?;

        validate_transition(current_category, transition)?;

        match transition {
            Transition::Move { category } => {
                tx.execute(
                    "UPDATE items SET category = ?2 WHERE id = ?1",
                    params![id, category.as_str()],
                )?;
            }
            Transition::Conclude { attestor, at_ms } => {
                let completed_at_ms = at_ms.unwrap_or_else(now_ms);
                tx.execute(
                    r#"
                    UPDATE items
                    SET category = ?2, completed_by = ?3, completed_at_ms = ?4
                    WHERE id = ?1
                    "#,
                    params![
                        id,
                        Category::Done.as_str(),
                        attestor.trim(),
                        completed_at_ms
                    ],
                )?;
            }
            Transition::UpdateDetails {
                urgency,
                scheduled_at_ms,
            } => {
                let current_urgency = match raw_urgency {
                    None => Urgency::default(),
                    Some(value) => Urgency::parse(&value)
                        .ok_or(StoreError::InvalidInput("unknown urgency in items row"))?,
                };
                let new_urgency = urgency.unwrap_or(current_urgency);
                let new_scheduled = scheduled_at_ms.or(current_scheduled);
                tx.execute(
                    "UPDATE items SET urgency = ?2, scheduled_at_ms = ?3 WHERE id = ?1",
                    params![id, new_urgency.as_str(), new_scheduled],
                )?;
            }
        }

        tx.commit()?;
        Ok(())
    }

    /// Idempotent: deleting an absent id is not an error; the count lets
    /// callers distinguish "0 removed" from "1 removed".
    pub fn delete_item(&mut self, id: i64) -> Result<usize, StoreError> {
        let removed = self
            .conn
            .execute("DELETE FROM items WHERE id = ?1", params![id])?;
        Ok(removed)
    }
}
