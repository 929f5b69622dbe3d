mod classify;
mod import_map;

pub use classify::{
    classify, validate, validate_path, validate_required, Category, Location, RequiredCategory,
    ValidationError,
};
pub use import_map::ImportMap;

pub(crate) use classify::check_category;
