pub mod inventory;
pub mod menu;
pub mod product;
pub mod rbac;
pub mod user;
pub mod warehouse;

pub use inventory::{
    CreateInventory, CreateTransaction, CreateTransactionType, UpdateInventory, UpdateTransaction,
};
pub use menu::{CreateMenu, MenuNode, UpdateMenu};
pub use product::{
    CreateProduct, CreateProductImage, CreateProductMetadata, UpdateProduct, UpdateProductImage,
    UpdateProductMetadata,
};
pub use rbac::{AssignRolePermission, CreatePermission, CreateRole, UpdatePermission, UpdateRole};
pub use user::{CreateUser, LoginRequest, UpdateUser};
pub use warehouse::{
    CreateLocation, CreateWarehouse, CreateZone, UpdateLocation, UpdateWarehouse, UpdateZone,
};
