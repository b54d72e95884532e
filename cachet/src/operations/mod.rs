pub mod item_operations;
pub mod operation;

pub use item_operations::ItemOperationsService;
pub use operation::ItemOperations;
