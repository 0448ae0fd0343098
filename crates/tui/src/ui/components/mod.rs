pub mod common;
pub mod component;
pub mod entry_list;
pub mod hint_bar;
pub mod notices;
pub mod settings;

pub use hint_bar::HintBarComponent;
pub use notices::NoticesComponent;
pub use settings::SettingsComponent;
