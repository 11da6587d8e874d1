//! Stable opaque identifiers for the entities the coordination core owns
//! or refers to.
//!
//! Students and operators are owned by external systems (auth/user CRUD);
//! the core only ever holds their identifiers, never their records.

crate::define_id! {
    /// Identifies a company (booth) running interviews in a room.
    pub struct CompanyId("cmp-");
}

crate::define_id! {
    /// Identifies a single queue entry across its whole lifecycle.
    pub struct EntryId("ent-");
}

crate::define_id! {
    /// Identifies a student. Source of truth for the student's profile
    /// (and thus their [`crate::entry::StudentCategory`]) is external.
    pub struct StudentId("stu-");
}

crate::define_id! {
    /// Identifies the committee member/admin driving an operation.
    pub struct OperatorId("opr-");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_carry_distinct_prefixes() {
        assert!(CompanyId::new().as_str().starts_with("cmp-"));
        assert!(EntryId::new().as_str().starts_with("ent-"));
        assert!(StudentId::new().as_str().starts_with("stu-"));
        assert!(OperatorId::new().as_str().starts_with("opr-"));
    }
}
