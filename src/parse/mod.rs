pub mod todo_parser;
pub mod todo_serializer;

pub use todo_parser::{ParsedTodo, load_store, parse_todos};
pub use todo_serializer::{serialize_todos, write_line};
