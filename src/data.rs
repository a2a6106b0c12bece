use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

/// Rental durations offered, in weeks. Prices are quoted per day, so revenue
/// conversion multiplies by [`DAYS_PER_WEEK`].
pub const DURATIONS_WEEKS: [usize; 4] = [1, 4, 8, 16];
pub const NUM_DURATIONS: usize = DURATIONS_WEEKS.len();
pub const DAYS_PER_WEEK: f64 = 7.0;

/// The sheet layout carries three banner/header rows before the data rows.
const HEADER_ROWS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Equipment {
    Excavators,
    Cranes,
    Bulldozers,
}

impl Equipment {
    pub const ALL: [Equipment; 3] = [
        Equipment::Excavators,
        Equipment::Cranes,
        Equipment::Bulldozers,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Equipment::Excavators => "Excavators",
            Equipment::Cranes => "Cranes",
            Equipment::Bulldozers => "Bulldozers",
        }
    }

    /// Fleet size at the start of the planning horizon.
    pub fn initial_inventory(self) -> f64 {
        match self {
            Equipment::Excavators => 760.0,
            Equipment::Cranes => 830.0,
            Equipment::Bulldozers => 900.0,
        }
    }

    fn sheet_file(self) -> &'static str {
        match self {
            Equipment::Excavators => "excavators.csv",
            Equipment::Cranes => "cranes.csv",
            Equipment::Bulldozers => "bulldozers.csv",
        }
    }
}

/// One data row of a sheet: week label, four demand columns, four daily
/// price columns, in duration-bucket order.
#[derive(Debug, Deserialize)]
struct SheetRow {
    #[allow(dead_code)]
    week: String,
    d1: f64,
    d4: f64,
    d8: f64,
    d16: f64,
    p1: f64,
    p4: f64,
    p8: f64,
    p16: f64,
}

/// Demand and price matrices for one equipment type, indexed
/// `[week][duration]`.
#[derive(Debug, Clone, Default)]
pub struct RentalTable {
    pub demand: Vec<[f64; NUM_DURATIONS]>,
    pub price: Vec<[f64; NUM_DURATIONS]>,
}

impl RentalTable {
    pub fn num_weeks(&self) -> usize {
        self.demand.len()
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut table = RentalTable::default();
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);
        for (idx, record) in rdr.records().enumerate() {
            let record = record.with_context(|| format!("reading row {}", idx + 1))?;
            if idx < HEADER_ROWS {
                continue;
            }
            let row: SheetRow = record
                .deserialize(None)
                .with_context(|| format!("parsing row {}", idx + 1))?;
            table.demand.push([row.d1, row.d4, row.d8, row.d16]);
            table.price.push([row.p1, row.p4, row.p8, row.p16]);
        }
        if table.demand.is_empty() {
            bail!("sheet contains no data rows");
        }
        Ok(table)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file =
            File::open(path).with_context(|| format!("opening sheet {}", path.display()))?;
        Self::from_reader(file).with_context(|| format!("loading sheet {}", path.display()))
    }
}

/// All three demand/price tables plus the initial fleet sizes, validated to
/// cover the same planning horizon.
#[derive(Debug, Clone)]
pub struct MarketData {
    tables: [RentalTable; 3],
    pub initial_inventory: [f64; 3],
}

impl MarketData {
    pub fn new(tables: [RentalTable; 3]) -> Result<Self> {
        let weeks = tables[0].num_weeks();
        for (equipment, table) in Equipment::ALL.iter().zip(tables.iter()) {
            if table.num_weeks() != weeks {
                bail!(
                    "sheet layout mismatch: {} covers {} weeks, expected {}",
                    equipment.name(),
                    table.num_weeks(),
                    weeks
                );
            }
        }
        let initial_inventory = Equipment::ALL.map(Equipment::initial_inventory);
        Ok(MarketData {
            tables,
            initial_inventory,
        })
    }

    pub fn load(dir: &Path) -> Result<Self> {
        let load_one = |equipment: Equipment| RentalTable::load(&dir.join(equipment.sheet_file()));
        let tables = [
            load_one(Equipment::Excavators)?,
            load_one(Equipment::Cranes)?,
            load_one(Equipment::Bulldozers)?,
        ];
        Self::new(tables)
    }

    pub fn table(&self, equipment: Equipment) -> &RentalTable {
        &self.tables[equipment as usize]
    }

    pub fn num_weeks(&self) -> usize {
        self.tables[0].num_weeks()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHEET: &str = "\
BuildMax weekly demand and prices,,,,,,,,
,Demand (units),,,,Price (GBP/day),,,
Week,1 wk,4 wk,8 wk,16 wk,1 wk,4 wk,8 wk,16 wk
1,34,21,12,5,420,390,360,330
2,36,19,11,6,425,392,361,328
";

    fn uniform_table(weeks: usize, demand: f64, price: f64) -> RentalTable {
        RentalTable {
            demand: vec![[demand; NUM_DURATIONS]; weeks],
            price: vec![[price; NUM_DURATIONS]; weeks],
        }
    }

    #[test]
    fn parses_sheet_rows_after_headers() {
        let table = RentalTable::from_reader(SHEET.as_bytes()).unwrap();
        assert_eq!(table.num_weeks(), 2);
        assert_eq!(table.demand[0], [34.0, 21.0, 12.0, 5.0]);
        assert_eq!(table.price[0], [420.0, 390.0, 360.0, 330.0]);
        assert_eq!(table.demand[1][3], 6.0);
        assert_eq!(table.price[1][0], 425.0);
    }

    #[test]
    fn rejects_sheet_with_only_headers() {
        let header_only = "a,b\nc,d\ne,f\n";
        assert!(RentalTable::from_reader(header_only.as_bytes()).is_err());
    }

    #[test]
    fn rejects_non_numeric_data_row() {
        let bad = format!("{SHEET}3,high,19,11,6,425,392,361,328\n");
        assert!(RentalTable::from_reader(bad.as_bytes()).is_err());
    }

    #[test]
    fn rejects_misaligned_week_counts() {
        let tables = [
            uniform_table(4, 10.0, 100.0),
            uniform_table(4, 10.0, 100.0),
            uniform_table(3, 10.0, 100.0),
        ];
        let err = MarketData::new(tables).unwrap_err();
        assert!(err.to_string().contains("Bulldozers"));
    }

    #[test]
    fn accepts_aligned_tables() {
        let tables = [
            uniform_table(4, 10.0, 100.0),
            uniform_table(4, 8.0, 90.0),
            uniform_table(4, 6.0, 80.0),
        ];
        let market = MarketData::new(tables).unwrap();
        assert_eq!(market.num_weeks(), 4);
        assert_eq!(market.initial_inventory, [760.0, 830.0, 900.0]);
        assert_eq!(market.table(Equipment::Cranes).demand[0][0], 8.0);
    }
}
