//! EV-charging demo records and their column layouts.
//!
//! Records live in a [`RecordStore`] shared with background threads; the
//! table only ever sees snapshots of it.

use crate::bulk::BulkActionError;
use crate::cell::CellValue;
use crate::column::ColumnDef;
use crate::error::Result;
use crate::options::BulkDeleteFn;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Which demo dataset to show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum DatasetKind {
    #[default]
    Stations,
    Connectors,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StationStatus {
    Available,
    Charging,
    Offline,
    Maintenance,
}

impl StationStatus {
    pub fn label(&self) -> &'static str {
        match self {
            StationStatus::Available => "Available",
            StationStatus::Charging => "Charging",
            StationStatus::Offline => "Offline",
            StationStatus::Maintenance => "Maintenance",
        }
    }
}

impl fmt::Display for StationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub id: u32,
    pub name: String,
    pub city: String,
    pub status: StationStatus,
    pub power_kw: f64,
    pub chargers: u32,
    pub price_per_kwh: f64,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CurrentType {
    AC,
    DC,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectorType {
    pub id: u32,
    pub name: String,
    pub standard: String,
    pub current: CurrentType,
    pub max_power_kw: f64,
}

/// A record the demo store can delete by id.
pub trait StoreRecord: Clone + Send + Sync + 'static {
    fn record_id(&self) -> u32;

    /// Why this record must not be deleted, if it must not.
    fn delete_blocker(&self) -> Option<String> {
        None
    }
}

impl StoreRecord for Station {
    fn record_id(&self) -> u32 {
        self.id
    }

    fn delete_blocker(&self) -> Option<String> {
        (self.status == StationStatus::Charging)
            .then(|| format!("station '{}' has an active charging session", self.name))
    }
}

impl StoreRecord for ConnectorType {
    fn record_id(&self) -> u32 {
        self.id
    }
}

/// In-memory record collection standing in for the backend.
pub struct RecordStore<R> {
    records: Arc<RwLock<Vec<R>>>,
    latency: Duration,
}

impl<R> Clone for RecordStore<R> {
    fn clone(&self) -> Self {
        Self {
            records: Arc::clone(&self.records),
            latency: self.latency,
        }
    }
}

impl<R: StoreRecord> RecordStore<R> {
    pub fn new(records: Vec<R>) -> Self {
        Self {
            records: Arc::new(RwLock::new(records)),
            latency: Duration::ZERO,
        }
    }

    /// Delay every delete, so the busy state is visible.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn snapshot(&self) -> Vec<R> {
        self.records.read().clone()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Delete all of `targets`, or none of them if any is blocked.
    pub fn delete(&self, targets: &[R]) -> std::result::Result<(), BulkActionError> {
        if !self.latency.is_zero() {
            thread::sleep(self.latency);
        }

        if let Some(reason) = targets.iter().find_map(|t| t.delete_blocker()) {
            return Err(BulkActionError::new(reason));
        }

        let mut records = self.records.write();
        let before = records.len();
        records.retain(|r| !targets.iter().any(|t| t.record_id() == r.record_id()));
        log::info!("store deleted {} of {} requested records", before - records.len(), targets.len());
        Ok(())
    }

    /// Bulk-delete callback bound to this store.
    pub fn bulk_delete_fn(&self) -> BulkDeleteFn<R> {
        let store = self.clone();
        Arc::new(move |records: Vec<R>| store.delete(&records))
    }
}

fn load_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Vec<T>> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

pub fn load_stations(path: &Path) -> Result<Vec<Station>> {
    load_json(path)
}

pub fn load_connectors(path: &Path) -> Result<Vec<ConnectorType>> {
    load_json(path)
}

pub fn station_columns() -> Vec<ColumnDef<Station>> {
    vec![
        ColumnDef::new("id", "ID")
            .accessor(|s: &Station| s.id.into())
            .width(5),
        ColumnDef::new("name", "Station")
            .text(|s: &Station| s.name.clone())
            .width(24),
        ColumnDef::new("city", "City")
            .text(|s: &Station| s.city.clone())
            .width(14),
        ColumnDef::new("status", "Status")
            .text(|s: &Station| s.status.label().to_string())
            .width(12),
        ColumnDef::new("power", "Power")
            .accessor(|s: &Station| s.power_kw.into())
            .cell(|s: &Station| format!("{:.0} kW", s.power_kw))
            .width(8),
        ColumnDef::new("chargers", "Chargers")
            .accessor(|s: &Station| s.chargers.into())
            .width(9),
        ColumnDef::new("price", "Price")
            .accessor(|s: &Station| s.price_per_kwh.into())
            .cell(|s: &Station| format!("${:.2}/kWh", s.price_per_kwh))
            .width(11),
        ColumnDef::new("updated", "Updated")
            .accessor(|s: &Station| CellValue::Int(s.updated_at.timestamp()))
            .cell(|s: &Station| s.updated_at.format("%Y-%m-%d %H:%M").to_string())
            .hidden()
            .width(17),
        ColumnDef::display("actions", "")
            .cell(|_: &Station| "\u{22EF}".to_string())
            .width(3),
    ]
}

pub fn connector_columns() -> Vec<ColumnDef<ConnectorType>> {
    vec![
        ColumnDef::new("id", "ID")
            .accessor(|c: &ConnectorType| c.id.into())
            .width(5),
        ColumnDef::new("name", "Connector")
            .text(|c: &ConnectorType| c.name.clone())
            .width(20),
        ColumnDef::new("standard", "Standard")
            .text(|c: &ConnectorType| c.standard.clone())
            .width(16),
        ColumnDef::new("current", "Current")
            .text(|c: &ConnectorType| format!("{:?}", c.current))
            .width(8),
        ColumnDef::new("max_power", "Max Power")
            .accessor(|c: &ConnectorType| c.max_power_kw.into())
            .cell(|c: &ConnectorType| format!("{:.0} kW", c.max_power_kw))
            .width(10),
    ]
}

/// Built-in stations used when no data file is given.
pub fn sample_stations() -> Vec<Station> {
    const SITES: &[(&str, &str, StationStatus, f64, u32, f64)] = &[
        ("Harbour Point", "Lisbon", StationStatus::Available, 150.0, 6, 0.39),
        ("Ridgeway Plaza", "Porto", StationStatus::Charging, 50.0, 4, 0.32),
        ("Airport Long Stay", "Lisbon", StationStatus::Available, 350.0, 12, 0.49),
        ("Riverside Depot", "Coimbra", StationStatus::Offline, 22.0, 2, 0.28),
        ("Central Station", "Porto", StationStatus::Charging, 150.0, 8, 0.41),
        ("Old Town Garage", "Braga", StationStatus::Maintenance, 22.0, 3, 0.27),
        ("Motorway A1 North", "Leiria", StationStatus::Available, 350.0, 10, 0.52),
        ("Motorway A1 South", "Santarem", StationStatus::Available, 350.0, 10, 0.52),
        ("University Campus", "Coimbra", StationStatus::Charging, 50.0, 6, 0.30),
        ("Marina Quay", "Faro", StationStatus::Available, 75.0, 4, 0.35),
        ("Shopping Park East", "Lisbon", StationStatus::Offline, 150.0, 8, 0.38),
        ("Hospital Visitors", "Braga", StationStatus::Available, 22.0, 4, 0.25),
        ("Stadium Lot B", "Porto", StationStatus::Maintenance, 75.0, 6, 0.36),
        ("Vineyard Rest Stop", "Viseu", StationStatus::Available, 150.0, 4, 0.40),
        ("Beachfront Kiosk", "Lagos", StationStatus::Charging, 22.0, 2, 0.31),
        ("Tech Park Gate 2", "Aveiro", StationStatus::Available, 50.0, 6, 0.29),
        ("Cathedral Square", "Evora", StationStatus::Available, 22.0, 2, 0.26),
        ("Ferry Terminal", "Setubal", StationStatus::Offline, 75.0, 4, 0.34),
        ("Mountain Lodge", "Covilha", StationStatus::Available, 50.0, 2, 0.33),
        ("Logistics Hub", "Leiria", StationStatus::Charging, 350.0, 16, 0.45),
        ("Riverside Mall", "Porto", StationStatus::Available, 150.0, 8, 0.39),
        ("Harbour Point II", "Lisbon", StationStatus::Maintenance, 150.0, 6, 0.39),
    ];

    let base = DateTime::from_timestamp(1_767_225_600, 0).unwrap_or_default();
    SITES
        .iter()
        .enumerate()
        .map(|(i, &(name, city, status, power_kw, chargers, price_per_kwh))| Station {
            id: i as u32 + 1,
            name: name.to_string(),
            city: city.to_string(),
            status,
            power_kw,
            chargers,
            price_per_kwh,
            updated_at: base + chrono::Duration::minutes(i as i64 * 97),
        })
        .collect()
}

/// Built-in connector types used when no data file is given.
pub fn sample_connectors() -> Vec<ConnectorType> {
    const TYPES: &[(&str, &str, CurrentType, f64)] = &[
        ("Type 2", "IEC 62196-2", CurrentType::AC, 43.0),
        ("CCS2", "IEC 62196-3", CurrentType::DC, 350.0),
        ("CHAdeMO", "IEC 62196-3", CurrentType::DC, 100.0),
        ("Type 1", "SAE J1772", CurrentType::AC, 19.2),
        ("CCS1", "SAE J1772 Combo", CurrentType::DC, 350.0),
        ("NACS", "SAE J3400", CurrentType::DC, 250.0),
        ("GB/T AC", "GB/T 20234.2", CurrentType::AC, 27.7),
        ("GB/T DC", "GB/T 20234.3", CurrentType::DC, 237.5),
        ("Schuko", "CEE 7/4", CurrentType::AC, 3.7),
    ];

    TYPES
        .iter()
        .enumerate()
        .map(|(i, &(name, standard, current, max_power_kw))| ConnectorType {
            id: i as u32 + 1,
            name: name.to_string(),
            standard: standard.to_string(),
            current,
            max_power_kw,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn charging_stations_block_the_whole_delete() {
        let stations = sample_stations();
        let store = RecordStore::new(stations.clone());
        let targets = vec![stations[0].clone(), stations[1].clone()];
        let err = store.delete(&targets).unwrap_err();
        assert!(err.message().contains("Ridgeway Plaza"));
        assert_eq!(store.len(), stations.len());
    }

    #[test]
    fn delete_removes_by_id() {
        let connectors = sample_connectors();
        let store = RecordStore::new(connectors.clone());
        let action = store.bulk_delete_fn();
        action(vec![connectors[2].clone(), connectors[5].clone()]).unwrap();
        let names: Vec<String> = store.snapshot().into_iter().map(|c| c.name).collect();
        assert!(!names.contains(&"CHAdeMO".to_string()));
        assert!(!names.contains(&"NACS".to_string()));
        assert_eq!(names.len(), connectors.len() - 2);
    }

    #[test]
    fn stations_load_from_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let json = serde_json::to_string(&sample_stations()[..2]).unwrap();
        file.write_all(json.as_bytes()).unwrap();
        let loaded = load_stations(file.path()).unwrap();
        assert_eq!(loaded, sample_stations()[..2].to_vec());
    }

    #[test]
    fn power_renders_with_unit_but_searches_raw() {
        let columns = station_columns();
        let power = columns.iter().find(|c| c.id() == "power").unwrap();
        let station = &sample_stations()[0];
        assert_eq!(power.render(station), "150 kW");
        assert_eq!(power.search_text(station).as_deref(), Some("150"));
    }
}
