pub mod todo;

pub use todo::TodoRow;
