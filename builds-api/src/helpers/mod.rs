pub mod client_address;
pub mod clock;
pub mod database;
pub mod email_templates;
pub mod spam_filter;
pub mod validation;
