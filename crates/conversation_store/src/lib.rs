mod error;
mod paths;
mod schema;
mod store;

pub use error::StoreError;
pub use paths::{data_root, database_path, DATA_DIR_ENV, DB_FILE_NAME};
pub use schema::{ConversationSummary, Message, Role};
pub use store::ConversationStore;
