//! Location models: branches, warehouses and tills

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A consumption site (sucursal). A client may operate several branches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Branch {
    pub id: Uuid,
    pub name: String,
    pub rfc: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
}

/// A bar or storeroom (almacén) where bottles live. Belongs to a branch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Warehouse {
    pub id: Uuid,
    pub branch_id: Uuid,
    pub name: String,
    pub number: i32,
}

/// A POS register (caja). Sales attribute to a warehouse through their till.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Till {
    pub id: Uuid,
    pub warehouse_id: Uuid,
    pub number: i32,
    pub name: Option<String>,
}
