pub mod bot_data;
pub mod locale;
pub mod playlist;
