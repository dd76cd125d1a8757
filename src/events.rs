use std::fmt;

use crate::types::{ItemId, UserId};

/// The three kinds of behaviour we derive ratings from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Play,
    Download,
    Collection,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            EventKind::Play => "play",
            EventKind::Download => "download",
            EventKind::Collection => "collection",
        };
        write!(f, "{}", name)
    }
}

/// Anything which links a user to an item. Fields are optional because records decoded from
/// upstream data can lack either of them.
pub trait Interaction {
    const KIND: EventKind;

    fn user_id(&self) -> Option<UserId>;
    fn item_id(&self) -> Option<ItemId>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingField {
    UserId,
    ItemId,
}

impl fmt::Display for MissingField {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MissingField::UserId => write!(f, "user id"),
            MissingField::ItemId => write!(f, "item id"),
        }
    }
}

/// A record which was left out of the aggregation, `position` is its index in the input list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkippedRecord {
    pub kind: EventKind,
    pub position: usize,
    pub missing: MissingField,
}

macro_rules! event_record {
    ($(#[$attr:meta])* $name:ident, $kind:expr) => {
        $(#[$attr])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        pub struct $name {
            pub user_id: Option<UserId>,
            pub song_id: Option<ItemId>,
        }

        impl $name {
            pub fn new(user_id: UserId, song_id: ItemId) -> Self {
                $name { user_id: Some(user_id), song_id: Some(song_id) }
            }
        }

        impl Interaction for $name {
            const KIND: EventKind = $kind;

            fn user_id(&self) -> Option<UserId> {
                self.user_id
            }

            fn item_id(&self) -> Option<ItemId> {
                self.song_id
            }
        }

        impl From<(Option<UserId>, Option<ItemId>)> for $name {
            fn from((user_id, song_id): (Option<UserId>, Option<ItemId>)) -> Self {
                $name { user_id, song_id }
            }
        }
    };
}

event_record!(
    /// A user actively played a song.
    PlayRecord, EventKind::Play);
event_record!(
    /// A user downloaded a song.
    DownloadRecord, EventKind::Download);
event_record!(
    /// A user added a song to their favorites.
    CollectionRecord, EventKind::Collection);

/// Extracts both identifiers, reporting the first one which is missing.
pub(crate) fn extract<R: Interaction>(record: &R) -> Result<(UserId, ItemId), MissingField> {
    let user = record.user_id().ok_or(MissingField::UserId)?;
    let item = record.item_id().ok_or(MissingField::ItemId)?;
    Ok((user, item))
}
