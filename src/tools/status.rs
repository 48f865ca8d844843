//! Scrapless Status Tool
//!
//! Provides runtime status information about the Scrapless service.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;
use crate::db::migrations::get_schema_version;
use crate::db::{Database, DbResult};
use crate::models::{PantryItem, WasteEntry};

/// Waste and pantry logging instructions for AI assistants
pub const WASTE_INSTRUCTIONS: &str = r#"
# Scrapless Logging Instructions

Scrapless values wasted and stored food in pesos (PHP) and kg CO2e.

## Amounts

Every logging tool takes an `item_name` and an `amount` string:

| amount | read as |
|--------|---------|
| `2 kg` | 2 kilograms |
| `500g` | 500 grams |
| `1 1/2 cups` | 1.5 cups |
| `½ cup` | 0.5 cup |
| `3` | 3 pieces |

Known units, by base unit:

- **g**: g, gram, kg, kilogram, kilo, mg, milligram, oz, ounce, lb, pound
- **ml**: ml, milliliter, l, liter, tsp, teaspoon, tbsp, tablespoon, fl oz, cup, pint, quart, gallon
- **piece**: piece, pc, item, each, unit, whole, pair (2), dozen (12), tray (30)
- **clove** (garlic only): clove, bulb (10), head (10)
- **leaf** (display only): leaf, sprig (5), bunch (30)

A trailing "s" is dropped ("cups" = "cup"). Irregular plurals are NOT understood:
write "leaf", not "leaves". Unknown units are rejected; ask the user for a known
unit instead of guessing.

## How values are estimated

Each item name is matched against a keyword table (first match wins, e.g.
"pineapple" before "apple"). Constants are per portion:

- count items: per piece / clove / leaf
- mass: per 100 g
- volume: per 100 ml

Unmatched items use PHP 5, 0.1 kg CO2e and a 7 day shelf life per portion.
Call `lookup_impact` to see what an item resolves to.

## Waste workflow

1. `log_waste(item_name, amount, reason?, wasted_on?)`
   reason: spoiled, leftover, expired, overcooked, other
2. `waste_summary(start_date?, end_date?)` for totals, reasons and top items

## Pantry workflow

1. `add_pantry_item(item_name, amount, stored_on?, expires_on?)`
   expiry is predicted from shelf life when omitted
2. `list_expiring_pantry_items(within_days)` to plan meals
3. `consume_pantry_item(id, amount)` when food is used; any unit of the same
   kind works ("500 g" from a "2 kg" bag)
4. `discard_pantry_item(id, reason?)` moves the item into the waste log

Dates use ISO format: YYYY-MM-DD. Omitted dates default to today.
"#;

/// Row counts read from the store
#[derive(Debug, Clone, Serialize)]
pub struct StoreStatus {
    pub schema_version: i32,
    pub waste_entries: i64,
    pub pantry_items: i64,
}

/// Runtime status of the Scrapless service
#[derive(Debug, Clone, Serialize)]
pub struct ScraplessStatus {
    #[serde(flatten)]
    pub build: BuildInfo,

    pub database_path: String,
    pub database_size_bytes: Option<u64>,
    /// Absent when the store cannot be read
    pub store: Option<StoreStatus>,
    pub store_error: Option<String>,

    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
    system: System,
}

impl StatusTracker {
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
            system: System::new(),
        }
    }

    /// Snapshot build, store and process state
    pub fn get_status(&mut self, db: &Database) -> ScraplessStatus {
        let database_size_bytes = std::fs::metadata(&self.database_path).ok().map(|m| m.len());

        let (store, store_error) = match read_store_status(db) {
            Ok(store) => (Some(store), None),
            Err(e) => {
                tracing::warn!("Status could not read store: {}", e);
                (None, Some(e.to_string()))
            }
        };

        let pid = Pid::from_u32(std::process::id());
        self.system.refresh_processes(ProcessesToUpdate::Some(&[pid]));
        let memory_usage_bytes = self.system.process(pid).map(|p| p.memory()).unwrap_or(0);

        ScraplessStatus {
            build: BuildInfo::current(),
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            store,
            store_error,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid.as_u32(),
            memory_usage_bytes,
        }
    }
}

fn read_store_status(db: &Database) -> DbResult<StoreStatus> {
    db.with_conn(|conn| {
        Ok(StoreStatus {
            schema_version: get_schema_version(conn)?,
            waste_entries: WasteEntry::count(conn, None, None)?,
            pantry_items: PantryItem::count(conn, None)?,
        })
    })
}
