use chrono::prelude::*;
use minion_match_core::{GameError, KeyValueStore, RecordStamp};
use yew::prelude::*;

/// `window.localStorage`, degrading to "nothing stored" where the browser refuses access.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub(crate) struct BrowserStore;

impl BrowserStore {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window().and_then(|window| window.local_storage().ok().flatten())
    }
}

impl KeyValueStore for BrowserStore {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: String) -> minion_match_core::Result<()> {
        let storage = Self::storage().ok_or(GameError::StorageUnavailable)?;
        storage.set_item(key, &value).map_err(|err| {
            log::debug!("set_item({}) failed: {:?}", key, err);
            GameError::StorageUnavailable
        })
    }
}

#[derive(Properties, PartialEq)]
pub(crate) struct ModalProps {
    #[prop_or_default]
    pub children: Html,
}

/// Helper component to attatch the contents into the document.body instead of in the place where it's used.
#[function_component]
pub(crate) fn Modal(props: &ModalProps) -> Html {
    let modal_host = gloo::utils::body();
    create_portal(props.children.clone(), modal_host.into())
}

/// Helper function to use JavaScript's Math.random
pub(crate) fn js_random_seed() -> u64 {
    use js_sys::Math::random;
    u64::from_be_bytes([
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
    ])
}

pub(crate) fn utc_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(js_sys::Date::now() as i64).unwrap_or_default()
}

/// Record id from the millisecond timestamp, display date as `YYYY-MM-DD`.
pub(crate) fn record_stamp(now: DateTime<Utc>) -> RecordStamp {
    RecordStamp {
        id: now.timestamp_millis().to_string(),
        date: now.format("%Y-%m-%d").to_string(),
    }
}
