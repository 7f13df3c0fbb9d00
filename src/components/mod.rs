pub mod api_key_form;
pub mod new_variant_modal;
pub mod property_control;
pub mod removal_warning_modal;
pub mod sidebar;
pub mod status_badge;
pub mod test_view;
pub mod variant_config;
pub mod variant_tabs;
