pub mod dialog;
pub mod restaurant;
pub mod slots;
pub mod work_item;
