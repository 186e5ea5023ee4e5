//! Per-profile table storage.

use tracing::debug;
use vfr_config::{ClimbRow, CruiseRow, PerformanceProfile, TableKind, TakeoffLandingRow};

use crate::TableError;
use crate::interpolate::Table;

/// The four performance tables of one profile, validated and sorted.
#[derive(Debug, Clone)]
pub struct PerformanceTableStore {
    profile_id: u32,
    takeoff: Table<TakeoffLandingRow>,
    landing: Table<TakeoffLandingRow>,
    climb: Table<ClimbRow>,
    cruise: Table<CruiseRow>,
}

/// Borrowed view of one table of a store.
#[derive(Debug, Clone, Copy)]
pub enum TableRef<'a> {
    TakeoffLanding(&'a Table<TakeoffLandingRow>),
    Climb(&'a Table<ClimbRow>),
    Cruise(&'a Table<CruiseRow>),
}

impl TableRef<'_> {
    pub fn len(&self) -> usize {
        match self {
            TableRef::TakeoffLanding(table) => table.len(),
            TableRef::Climb(table) => table.len(),
            TableRef::Cruise(table) => table.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PerformanceTableStore {
    /// Index the profile's tables. Empty tables are accepted here and
    /// reported as [`TableError::IncompleteProfile`] when first requested.
    pub fn from_profile(profile: &PerformanceProfile) -> Result<Self, TableError> {
        let tables = &profile.tables;
        let store = Self {
            profile_id: profile.id,
            takeoff: Table::new(TableKind::Takeoff, tables.takeoff.clone())?,
            landing: Table::new(TableKind::Landing, tables.landing.clone())?,
            climb: Table::new(TableKind::Climb, tables.climb.clone())?,
            cruise: Table::new(TableKind::Cruise, tables.cruise.clone())?,
        };
        debug!(
            profile_id = profile.id,
            takeoff = store.takeoff.len(),
            landing = store.landing.len(),
            climb = store.climb.len(),
            cruise = store.cruise.len(),
            "indexed performance tables"
        );
        Ok(store)
    }

    pub fn profile_id(&self) -> u32 {
        self.profile_id
    }

    pub fn takeoff(&self) -> Result<&Table<TakeoffLandingRow>, TableError> {
        self.non_empty(&self.takeoff)
    }

    pub fn landing(&self) -> Result<&Table<TakeoffLandingRow>, TableError> {
        self.non_empty(&self.landing)
    }

    pub fn climb(&self) -> Result<&Table<ClimbRow>, TableError> {
        self.non_empty(&self.climb)
    }

    pub fn cruise(&self) -> Result<&Table<CruiseRow>, TableError> {
        self.non_empty(&self.cruise)
    }

    pub fn table_for(&self, kind: TableKind) -> Result<TableRef<'_>, TableError> {
        Ok(match kind {
            TableKind::Takeoff => TableRef::TakeoffLanding(self.takeoff()?),
            TableKind::Landing => TableRef::TakeoffLanding(self.landing()?),
            TableKind::Climb => TableRef::Climb(self.climb()?),
            TableKind::Cruise => TableRef::Cruise(self.cruise()?),
        })
    }

    /// Fail unless every listed table holds at least one row.
    pub fn require(&self, kinds: &[TableKind]) -> Result<(), TableError> {
        kinds.iter().try_for_each(|&kind| self.table_for(kind).map(|_| ()))
    }

    fn non_empty<'a, R>(&self, table: &'a Table<R>) -> Result<&'a Table<R>, TableError>
    where
        R: crate::interpolate::TableRow,
    {
        if table.is_empty() {
            Err(TableError::IncompleteProfile {
                profile_id: self.profile_id,
                table: table.kind(),
            })
        } else {
            Ok(table)
        }
    }
}
