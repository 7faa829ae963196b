pub mod detail_pane;
pub mod list_pane;
pub mod search_bar;
pub mod spinner;
pub mod toast;

pub use detail_pane::{DetailPane, ViewerBody};
pub use list_pane::{no_results_message, ListPane};
pub use search_bar::{highlight_matches, SearchBar};
pub use spinner::Spinner;
pub use toast::{Toast, ToastManager, ToastType};
