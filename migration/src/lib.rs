pub use sea_orm_migration::prelude::*;

mod m20250810_000001_create_users_table;
mod m20250810_000002_create_profiles_table;
mod m20250810_000003_create_contracts_table;
mod m20250810_000004_create_events_table;
mod m20250810_000005_create_accommodations_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250810_000001_create_users_table::Migration),
            Box::new(m20250810_000002_create_profiles_table::Migration),
            Box::new(m20250810_000003_create_contracts_table::Migration),
            Box::new(m20250810_000004_create_events_table::Migration),
            Box::new(m20250810_000005_create_accommodations_table::Migration),
        ]
    }
}
