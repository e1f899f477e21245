//! Client-side state slices
//!
//! Each slice owns its draft, library page and busy flags. Services hold the
//! slices behind `tokio::sync::RwLock` and never keep a lock across an API call.

mod busy;
mod character;
mod drafts;
mod library;
mod preview;
mod session;

pub use busy::{BusyFlag, BusyGuard};
pub use character::{CharacterState, CharacterView, ProgressionOptions};
pub use drafts::{CreatureDraft, DraftSlot};
pub use library::{LibraryParams, LibraryState, RequestToken};
pub use preview::{PortraitCache, PreviewHandle, PreviewStore};
pub use session::{from_query_string, to_query_string, SessionSnapshot};

#[cfg(test)]
pub(crate) use character::fixtures;
