pub mod agenda;
pub mod collection;
pub mod record;
pub mod utils;

// Re-export handler functions for use in routing
pub use collection::list as todos_list;
pub use collection::create as todos_create;

pub use agenda::get as agenda_get;

pub use record::get as todo_get;
pub use record::put as todo_put;
pub use record::delete as todo_delete;
