pub mod chromium_page;
pub mod credential_store;
pub mod page_adapter;
pub mod resilient_caller;

pub use chromium_page::{ChromiumPageAdapter, LayoutProfile};
pub use credential_store::{CredentialStore, FileCredentialStore, MemoryCredentialStore};
pub use page_adapter::{ContainerKind, Control, MenuLabelMatcher, PageAdapter};
pub use resilient_caller::ResilientCaller;
