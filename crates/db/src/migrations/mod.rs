//! Database migrations.
//!
//! Schema migrations for the database. The foreign key actions declared here
//! carry the ownership policy of each relationship.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20250301_000001_create_identity_tables;
mod m20250301_000002_create_catalog_tables;
mod m20250301_000003_create_chat_tables;
mod m20250301_000004_create_rating_tables;
mod m20250301_000005_create_meeting_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_identity_tables::Migration),
            Box::new(m20250301_000002_create_catalog_tables::Migration),
            Box::new(m20250301_000003_create_chat_tables::Migration),
            Box::new(m20250301_000004_create_rating_tables::Migration),
            Box::new(m20250301_000005_create_meeting_tables::Migration),
        ]
    }
}
