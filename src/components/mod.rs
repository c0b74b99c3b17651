pub(crate) mod hooks;
pub(crate) mod note;
pub(crate) mod note_form;
pub(crate) mod ui;

pub(crate) use note::NoteCard;
pub(crate) use note_form::NoteForm;

/// Grow a textarea to fit its content (collapse first so it can shrink too).
pub(crate) fn autosize(el: &web_sys::HtmlTextAreaElement) {
    let style = el.style();
    let _ = style.set_property("height", "0px");
    let _ = style.set_property("height", &format!("{}px", el.scroll_height()));
}
