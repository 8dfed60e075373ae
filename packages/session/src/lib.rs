pub mod clock;
pub mod config;
pub mod guard;
pub mod route;
pub mod state;
pub mod storage;

mod memory;
pub use memory::MemoryStorage;

#[cfg(all(target_arch = "wasm32", feature = "web"))]
mod local;
#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub use local::LocalStorage;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, GuardConfig, NavigationConfig, SessionConfig};
pub use guard::{decide, Decision, Navigation, NavigationGuard};
pub use route::{Resolution, RouteDescriptor, RouteTable};
pub use state::{SessionRecord, SessionState, SessionStatus};
pub use storage::{KeyValueStore, StorageError};
