pub mod home_controller;
pub mod message_controller;
pub mod realtime_controller;
pub mod embed_controller;
