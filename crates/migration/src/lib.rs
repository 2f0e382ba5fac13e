pub use sea_orm_migration::prelude::*;

mod m20250801_create_catalog_tables;
mod m20250802_create_semester_tables;
mod m20250803_add_enrollment_indexes;
mod m20250804_create_notifications_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250801_create_catalog_tables::Migration),
            Box::new(m20250802_create_semester_tables::Migration),
            Box::new(m20250803_add_enrollment_indexes::Migration),
            Box::new(m20250804_create_notifications_table::Migration),
        ]
    }
}
