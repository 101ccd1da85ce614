pub mod home_controller;
pub mod commands_controller;
pub mod telegram_controller;
