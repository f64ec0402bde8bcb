pub mod case;
pub mod source_info;
pub mod type_map;
pub mod visit;
