mod audit;
mod inventory;
mod location;
mod movement;
mod product;
mod profile;

pub use audit::AuditEntry;
pub use inventory::{InventoryItem, InventoryKind};
pub use location::Location;
pub use movement::{Movement, MovementKind};
pub use product::Product;
pub use profile::{Profile, ProfileRole};

fn default_true() -> bool {
    true
}
