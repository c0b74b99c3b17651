/// Fresh opaque note id. UUID v4, generated on the client so the note has
/// its identity before the server ever sees it.
pub(crate) fn new_note_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// RFC 3339 timestamp from the browser clock.
pub(crate) fn now_iso() -> String {
    String::from(js_sys::Date::new_0().to_iso_string())
}
