//! Local event calendar (festivals, wedding season, school reopening...).
//!
//! Events are loaded from a JSON array:
//!
//! ```json
//! [
//!   { "name": "Diwali", "start_date": "2026-11-06", "end_date": "2026-11-10",
//!     "impact": 0.9, "categories": ["dry_cleaning", "ironing"] }
//! ]
//! ```
//!
//! An event with no categories applies to every service.

use crate::error::{PricingError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalEvent {
    pub name: String,
    pub start_date: NaiveDate,
    /// Inclusive
    pub end_date: NaiveDate,
    /// Strength of the demand bump, in [0, 1]
    pub impact: f64,
    #[serde(default)]
    pub categories: Vec<String>,
}

impl LocalEvent {
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    pub fn applies_to(&self, category: &str) -> bool {
        self.categories.is_empty()
            || self
                .categories
                .iter()
                .any(|c| c.trim().eq_ignore_ascii_case(category.trim()))
    }
}

#[derive(Debug, Clone, Default)]
pub struct EventCalendar {
    events: Vec<LocalEvent>,
}

impl EventCalendar {
    pub fn new(events: Vec<LocalEvent>) -> Result<Self> {
        for event in &events {
            if !(0.0..=1.0).contains(&event.impact) {
                return Err(PricingError::EventCalendar(format!(
                    "event {} has impact {} outside [0, 1]",
                    event.name, event.impact
                )));
            }
            if event.end_date < event.start_date {
                return Err(PricingError::EventCalendar(format!(
                    "event {} ends ({}) before it starts ({})",
                    event.name, event.end_date, event.start_date
                )));
            }
        }
        Ok(Self { events })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let events: Vec<LocalEvent> = serde_json::from_str(content)
            .map_err(|e| PricingError::EventCalendar(format!("invalid calendar JSON: {}", e)))?;
        Self::new(events)
    }

    /// Load from a JSON file. A missing file is an error: a configured
    /// calendar path that does not exist is a deployment mistake.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            PricingError::EventCalendar(format!("cannot read {}: {}", path.display(), e))
        })?;
        let calendar = Self::from_json(&content)?;
        tracing::info!(
            "Loaded {} local events from {}",
            calendar.len(),
            path.display()
        );
        Ok(calendar)
    }

    /// Strongest impact among events active on `date` for `category`; 0.0 if none.
    pub fn factor_for(&self, category: &str, date: NaiveDate) -> f64 {
        self.events
            .iter()
            .filter(|e| e.is_active_on(date) && e.applies_to(category))
            .map(|e| e.impact)
            .fold(0.0, f64::max)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
