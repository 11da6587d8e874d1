//! Materialized state: the current row-set the store serves reads from
//! and applies transaction writes to.

mod companies;
mod entries;

use iq_core::{Company, CompanyId, EntryId, QueueEntry, StudentId};
use std::collections::HashMap;

/// Current state plus one version counter per company.
///
/// The version counter is the unit of optimistic concurrency: every
/// committed write to a company's record or to any entry referencing it
/// bumps the counter (design note, §9: single-document-per-company
/// representation, bounded by the company's queue length).
#[derive(Debug, Default, Clone)]
pub struct MaterializedState {
    pub companies: HashMap<CompanyId, Company>,
    pub entries: HashMap<EntryId, QueueEntry>,
    pub versions: HashMap<CompanyId, u64>,
}

impl MaterializedState {
    pub fn version_of(&self, company_id: &CompanyId) -> u64 {
        self.versions.get(company_id).copied().unwrap_or(0)
    }

    pub fn bump_version(&mut self, company_id: &CompanyId) -> u64 {
        let v = self.versions.entry(*company_id).or_insert(0);
        *v += 1;
        *v
    }

    pub fn insert_company(&mut self, company: Company) {
        self.versions.entry(company.id).or_insert(0);
        self.companies.insert(company.id, company);
    }

    pub fn get_company(&self, id: &CompanyId) -> Option<&Company> {
        self.companies.get(id)
    }

    pub fn get_entry(&self, id: &EntryId) -> Option<&QueueEntry> {
        self.entries.get(id)
    }

    pub fn put_entry(&mut self, entry: QueueEntry) {
        self.entries.insert(entry.id, entry);
    }

    /// All entries (any status) referencing a company, snapshot order is
    /// unspecified — callers sort as needed.
    pub fn entries_for_company(&self, company_id: &CompanyId) -> Vec<QueueEntry> {
        entries::for_company(&self.entries, company_id)
    }

    /// Waiting entries for a company, ordered by `queue_position` ascending.
    pub fn waiting_queue(&self, company_id: &CompanyId) -> Vec<QueueEntry> {
        entries::waiting_ordered(&self.entries, company_id)
    }

    /// U1: the at-most-one active (waiting/in_progress) entry for
    /// (student, company), if any.
    pub fn active_entry_for(&self, student_id: &StudentId, company_id: &CompanyId) -> Option<QueueEntry> {
        entries::active_for_student(&self.entries, student_id, company_id)
    }

    /// U2: the at-most-one in-progress entry for a company, if any.
    pub fn in_progress_entry_for(&self, company_id: &CompanyId) -> Option<QueueEntry> {
        entries::in_progress_for_company(&self.entries, company_id)
    }

    pub fn all_company_ids(&self) -> Vec<CompanyId> {
        companies::all_ids(&self.companies)
    }

    pub fn active_company_ids(&self) -> Vec<CompanyId> {
        companies::active_ids(&self.companies)
    }

    /// §4.6 check 4: duplicate active (student, company) pairs that drifted
    /// in from historical bugs or manual edits (U1 should otherwise make
    /// this impossible through normal operation).
    pub fn duplicate_active_groups(&self, company_id: &CompanyId) -> Vec<Vec<QueueEntry>> {
        entries::duplicate_active_groups(&self.entries, company_id)
    }

    /// §4.6 check 1: every in-progress entry for a company, for detecting
    /// U2 drift (more than one).
    pub fn all_in_progress_for_company(&self, company_id: &CompanyId) -> Vec<QueueEntry> {
        entries::all_in_progress(&self.entries, company_id)
    }

    pub fn entries_for_missing_companies(&self) -> Vec<EntryId> {
        entries::orphaned(&self.entries, &self.companies)
            .into_iter()
            .filter(|e| e.status.is_active())
            .map(|e| e.id)
            .collect()
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
