use bson::oid::ObjectId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily activity record per (owner, calendar date).
///
/// Uniqueness on (user_id, report_date) is enforced by a unique index; the
/// application pre-check alone cannot close the check-then-insert race.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyReport {
    #[serde(rename = "_id")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    pub report_date: NaiveDate,
    pub region: String,

    // Doctor visits by professional category
    pub dentists: u32,
    pub general_practitioners: u32,
    pub pediatricians: u32,
    pub gynecologists: u32,
    pub dermatologists: u32,
    pub cardiologists: u32,
    pub orthopedists: u32,

    // Facility visits
    pub pharmacies: u32,
    pub dispensaries: u32,

    // Order metrics
    pub orders_count: u32,
    pub orders_value: f64,

    pub summary: Option<String>,

    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl DailyReport {
    /// Sum of the seven professional-category counters. Always derived,
    /// never stored; every aggregate recomputes through this one method.
    pub fn total_doctors(&self) -> u32 {
        self.dentists
            + self.general_practitioners
            + self.pediatricians
            + self.gynecologists
            + self.dermatologists
            + self.cardiologists
            + self.orthopedists
    }

    /// Doctor visits plus facility visits.
    pub fn total_visits(&self) -> u32 {
        self.total_doctors() + self.pharmacies + self.dispensaries
    }
}
