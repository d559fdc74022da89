pub mod session;
pub mod storage;

pub use session::SessionState;
pub use storage::{CookieStorage, FileStorage, MemoryStorage, SessionStorage};
