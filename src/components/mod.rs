pub mod dialog;
pub mod form_modal;
