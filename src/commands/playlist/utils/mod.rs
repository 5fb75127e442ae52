pub mod component_handlers;
pub mod playlist_buttons;
pub mod playlist_views;
