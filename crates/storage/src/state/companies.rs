//! Pure helpers over the company map. Kept free of `MaterializedState` so
//! they're trivial to unit test in isolation.

use iq_core::{Company, CompanyId};
use std::collections::HashMap;

pub fn all_ids(companies: &HashMap<CompanyId, Company>) -> Vec<CompanyId> {
    companies.keys().copied().collect()
}

pub fn active_ids(companies: &HashMap<CompanyId, Company>) -> Vec<CompanyId> {
    companies.values().filter(|c| c.active).map(|c| c.id).collect()
}
