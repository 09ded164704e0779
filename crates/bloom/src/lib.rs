//! Bloom
//!
//! Shareable flower gifts: a sender encodes a [`GiftDescriptor`] into a link,
//! the recipient waters the flower through a [`WateringSession`] until it
//! blooms, and the completed gift is planted in their garden through a
//! [`GardenDatabase`].

#![warn(missing_docs)]
#![warn(rustdoc::bare_urls)]

pub mod context;
pub mod database;
pub mod error;
pub mod garden;
pub mod gift;
pub mod identity;
pub mod util;
pub mod watering;

#[doc(hidden)]
pub use self::context::{GiftContext, GiftContextBuilder};
#[doc(hidden)]
pub use self::database::GardenDatabase;
#[doc(hidden)]
pub use self::error::Error;
#[doc(hidden)]
pub use self::garden::{EntryId, GardenEntry, GardenLayout, OwnerId};
#[doc(hidden)]
pub use self::gift::{FlowerKind, GiftDescriptor, GiftReference, Theme};
#[doc(hidden)]
pub use self::identity::{IdentityProvider, StaticIdentity};
#[doc(hidden)]
pub use self::watering::{CompletionEvent, Phase, Progress, ProgressObserver, WateringSession};
