//! Per-day record of which actions were already performed.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::catalog::{ActionCatalog, ActionId};

/// Used-today flags keyed by every action the catalog defines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct DailyLedger {
    used: BTreeMap<ActionId, bool>,
}

impl DailyLedger {
    /// Ledger with one unused entry per catalog action.
    #[must_use]
    pub fn for_catalog(catalog: &ActionCatalog) -> Self {
        Self {
            used: catalog.ids().map(|id| (id, false)).collect(),
        }
    }

    #[must_use]
    pub fn is_used(&self, id: ActionId) -> bool {
        self.used.get(&id).copied().unwrap_or(false)
    }

    /// Flag an action as used. Identifiers outside the catalog are ignored so
    /// the key set never drifts.
    pub fn mark_used(&mut self, id: ActionId) -> bool {
        match self.used.get_mut(&id) {
            Some(flag) => {
                *flag = true;
                true
            }
            None => false,
        }
    }

    /// Clear every flag; called once per day rollover.
    pub fn reset(&mut self) {
        self.used.values_mut().for_each(|flag| *flag = false);
    }

    pub fn entries(&self) -> impl Iterator<Item = (ActionId, bool)> + '_ {
        self.used.iter().map(|(id, used)| (*id, *used))
    }

    #[must_use]
    pub fn used_count(&self) -> usize {
        self.used.values().filter(|used| **used).count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.used.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }
}
