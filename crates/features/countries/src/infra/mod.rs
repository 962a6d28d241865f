pub mod seed;
pub mod surreal_repo;

use atlas_database::Migration;

/// Schema owned by this slice, in application order.
pub const MIGRATIONS: [Migration; 1] = [Migration::new(
    "countries",
    "0001-country",
    include_str!("../../migrations/0001-country.surql"),
)];
