mod schema;

pub use schema::LineSchema;
