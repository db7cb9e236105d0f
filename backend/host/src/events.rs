//! Event rows written to and read from the event log.
//!
//! Amounts and ids are stored as decimal strings: amounts are 18-decimal
//! fixed point and routinely exceed SQLite's 64-bit integers.

use launchpad_pool::{LaunchpadEvent, Timestamp};
use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// A decoded engine event, ready to be stored in the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredEvent {
    pub event_type: String,
    pub pool_id: Option<String>,
    pub proposal_id: Option<String>,
    pub actor: String,
    pub amount: Option<String>,
    /// Full event as JSON.
    pub payload: String,
    /// Engine clock at commit.
    pub timestamp: i64,
}

impl StoredEvent {
    pub fn from_engine(event: &LaunchpadEvent, now: Timestamp) -> Result<Self> {
        Ok(Self {
            event_type: event.topic().to_string(),
            pool_id: event.pool_id().map(|id| id.to_string()),
            proposal_id: event.proposal_id().map(|id| id.to_string()),
            actor: event.actor().to_string(),
            amount: event.amount().map(|a| a.to_string()),
            payload: serde_json::to_string(event)?,
            timestamp: now as i64,
        })
    }
}

/// A raw event record as stored in / read from the database.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EventRecord {
    pub id: i64,
    pub event_type: String,
    pub pool_id: Option<String>,
    pub proposal_id: Option<String>,
    pub actor: String,
    pub amount: Option<String>,
    pub payload: String,
    pub timestamp: i64,
    pub created_at: i64,
}

impl EventRecord {
    /// Decode the stored payload back into the engine event.
    pub fn event(&self) -> Result<LaunchpadEvent> {
        Ok(serde_json::from_str(&self.payload)?)
    }
}
