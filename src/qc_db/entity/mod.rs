use super::schema;

// Row mappings of the QC tables, kept in line with schema.rs.
pub mod component;
pub use self::component::Component;
pub mod image;
pub use self::image::Image;
pub mod qc_entity;
pub use self::qc_entity::Entity;
pub mod qc_status;
pub use self::qc_status::QcStatus;
pub mod rating;
pub use self::rating::Rating;
pub mod table_column;
pub use self::table_column::TableColumn;
pub mod table_row;
pub use self::table_row::TableRow;
