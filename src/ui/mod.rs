pub mod dialogs;
pub mod options;
pub mod theme;
pub mod theme_loader;
