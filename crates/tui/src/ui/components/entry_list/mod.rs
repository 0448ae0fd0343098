mod entry_list_component;
mod state;

pub use entry_list_component::EntryListComponent;
pub use state::EntryListViewState;
