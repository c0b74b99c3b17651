pub(crate) mod use_click_outside;

pub(crate) use use_click_outside::{use_click_outside, ClickBoundary};
